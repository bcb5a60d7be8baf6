use pulldown_cmark::{Event, Options, Parser, html};

use crate::document::Document;
use crate::parsing::Block;

/// Turns one block's markdown into an HTML fragment.
///
/// Sanitization, if any, is the renderer's business.
pub trait BlockRenderer {
    fn render(&self, markdown: &str) -> String;
}

/// GFM-flavoured rendering via pulldown-cmark. Soft line breaks are kept as
/// `<br />` so line structure survives translation.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS,
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRenderer for MarkdownRenderer {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options).map(|event| match event {
            Event::SoftBreak => Event::HardBreak,
            other => other,
        });
        let mut out = String::new();
        html::push_html(&mut out, parser);
        out
    }
}

/// One block of the rendered pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockFragment {
    pub index: usize,
    pub block: Block,
    pub html: String,
}

impl BlockFragment {
    /// The fragment wrapped in a container the host can measure.
    pub fn to_html(&self) -> String {
        format!(
            "<div class=\"md-block\" data-block-index=\"{}\">{}</div>",
            self.index, self.html
        )
    }
}

pub fn render_fragments(document: &Document, renderer: &impl BlockRenderer) -> Vec<BlockFragment> {
    document
        .blocks()
        .iter()
        .zip(document.block_texts())
        .enumerate()
        .map(|(index, (&block, text))| BlockFragment {
            index,
            block,
            html: renderer.render(&text),
        })
        .collect()
}
