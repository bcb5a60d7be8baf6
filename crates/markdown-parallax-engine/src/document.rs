use std::cell::OnceCell;
use std::ops::Range;

use xi_rope::{Rope, delta::Builder};

use crate::index::BlockIndex;
use crate::parsing::{Block, lines_with_spans};

/// One pane's document text.
///
/// The text lives in a single `xi_rope::Rope`. Segmentation is computed
/// lazily and cached until the next mutation; every mutation bumps
/// [`Document::version`], so hosts that memoize derived data (rendered
/// fragments, measured offsets) can key it on the version.
///
/// Block numbering is positional: inserting or removing a line renumbers all
/// later blocks.
#[derive(Debug, Clone)]
pub struct Document {
    buffer: Rope,
    version: u64,
    index: OnceCell<BlockIndex>,
}

impl Document {
    pub fn new(text: &str) -> Self {
        Self::from_rope(Rope::from(text))
    }

    pub fn from_rope(buffer: Rope) -> Self {
        Self {
            buffer,
            version: 0,
            index: OnceCell::new(),
        }
    }

    pub fn rope(&self) -> &Rope {
        &self.buffer
    }

    /// Get the current text content
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn line_count(&self) -> usize {
        self.index().line_count()
    }

    pub fn blocks(&self) -> &[Block] {
        self.index().blocks()
    }

    pub fn block_index_of(&self, line: usize) -> Option<usize> {
        self.index().index_of(line)
    }

    pub fn block_range_of(&self, index: usize) -> Option<Block> {
        self.index().range_of(index)
    }

    /// The text of block `index`, lines joined with `\n`.
    pub fn block_text(&self, index: usize) -> Option<String> {
        let block = self.block_range_of(index)?;
        Some(join_lines(&self.line_texts(), block))
    }

    /// Text of every block in order. Splits the buffer once.
    pub fn block_texts(&self) -> Vec<String> {
        let lines = self.line_texts();
        self.blocks()
            .iter()
            .map(|&block| join_lines(&lines, block))
            .collect()
    }

    fn line_texts(&self) -> Vec<String> {
        lines_with_spans(&self.buffer)
            .into_iter()
            .map(|l| l.text.into_owned())
            .collect()
    }

    /// Replaces the whole text.
    pub fn replace(&mut self, text: &str) {
        self.buffer = Rope::from(text);
        self.invalidate();
    }

    /// Replaces the bytes in `range` with `text`.
    ///
    /// The range is clamped to the buffer and each end is moved back to the
    /// nearest char boundary.
    pub fn edit(&mut self, range: Range<usize>, text: &str) {
        let len = self.buffer.len();
        let start = self.floor_char_boundary(range.start.min(len));
        let end = self.floor_char_boundary(range.end.min(len)).max(start);

        let mut builder = Builder::new(len);
        builder.replace(start..end, Rope::from(text));
        let delta = builder.build();
        self.buffer = delta.apply(&self.buffer);
        self.invalidate();
    }

    fn floor_char_boundary(&self, offset: usize) -> usize {
        self.buffer
            .at_or_prev_codepoint_boundary(offset)
            .unwrap_or(0)
    }

    fn index(&self) -> &BlockIndex {
        self.index.get_or_init(|| BlockIndex::from_rope(&self.buffer))
    }

    fn invalidate(&mut self) {
        self.index = OnceCell::new();
        self.version += 1;
    }
}

fn join_lines(lines: &[String], block: Block) -> String {
    lines
        .get(block.start_line - 1..block.end_line)
        .map(|lines| lines.join("\n"))
        .unwrap_or_default()
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}
