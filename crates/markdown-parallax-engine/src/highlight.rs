use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::parsing::Block;
use crate::viewport::LineLayout;

/// Source lines matching the block selected in the rendered pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HighlightRange {
    pub start_line: usize,
    pub end_line: usize,
}

impl HighlightRange {
    pub fn contains(self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }
}

impl From<Block> for HighlightRange {
    fn from(b: Block) -> Self {
        Self {
            start_line: b.start_line,
            end_line: b.end_line,
        }
    }
}

/// Maps a rendered-pane line to the source range of the same block.
pub fn highlight_for_rendered_line(
    source: &Document,
    rendered: &Document,
    line: usize,
) -> Option<HighlightRange> {
    let index = rendered.block_index_of(line)?;
    source.block_range_of(index).map(HighlightRange::from)
}

/// Scroll offset that centers `range` in the source pane, or `None` when the
/// range is already fully visible. Ranges taller than the pane are aligned
/// to their first line instead.
pub fn reveal_offset(
    range: HighlightRange,
    layout: &LineLayout,
    scroll_top: f64,
    client_height: f64,
) -> Option<f64> {
    let (top, bottom) = layout.extent(range.start_line, range.end_line);
    let client = client_height.max(0.0);
    if top >= scroll_top && bottom <= scroll_top + client {
        return None;
    }
    let height = bottom - top;
    let target = if height >= client {
        top
    } else {
        top + height / 2.0 - client / 2.0
    };
    Some(target.max(0.0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GutterLine {
    pub number: usize,
    pub active: bool,
}

/// Line-number gutter for the source pane. Always at least one line.
pub fn gutter_lines(line_count: usize, highlight: Option<HighlightRange>) -> Vec<GutterLine> {
    (1..=line_count.max(1))
        .map(|number| GutterLine {
            number,
            active: highlight.is_some_and(|h| h.contains(number)),
        })
        .collect()
}
