//! Line ↔ block lookups.
//!
//! The free functions re-segment the text on every call. [`BlockIndex`] holds
//! a segmentation so repeated lookups against unchanged text are cheap; a
//! [`crate::Document`] keeps one per version.

use crate::parsing::{Block, line_count, lines_with_spans, segment, segment_lines};
use xi_rope::Rope;

/// Index of the block containing `line` (1-indexed), or `None` when the line
/// falls in a blank gap or outside the document.
pub fn block_index_of(text: &str, line: usize) -> Option<usize> {
    BlockIndex::new(text).index_of(line)
}

/// The block at `index`, or `None` when `index` is past the last block.
pub fn block_range_of(text: &str, index: usize) -> Option<Block> {
    segment(text).get(index).copied()
}

/// A segmentation of one version of a document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockIndex {
    blocks: Vec<Block>,
    line_count: usize,
}

impl BlockIndex {
    pub fn new(text: &str) -> Self {
        Self {
            blocks: segment(text),
            line_count: line_count(text),
        }
    }

    pub fn from_rope(rope: &Rope) -> Self {
        let lines = lines_with_spans(rope);
        let line_count = lines.len();
        Self {
            blocks: segment_lines(lines),
            line_count,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn index_of(&self, line: usize) -> Option<usize> {
        if line == 0 || line > self.line_count {
            return None;
        }
        // First block that has not ended before `line`.
        let i = self.blocks.partition_point(|b| b.end_line < line);
        self.blocks
            .get(i)
            .filter(|b| b.contains(line))
            .map(|_| i)
    }

    pub fn range_of(&self, index: usize) -> Option<Block> {
        self.blocks.get(index).copied()
    }
}
