use serde::{Deserialize, Serialize};

/// A contiguous range of lines treated as one scrollable unit.
///
/// Lines are 1-indexed and both ends are inclusive, so a single-line block
/// has `start_line == end_line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Block {
    /// First line of the block (1-indexed).
    pub start_line: usize,
    /// Last line of the block (1-indexed, inclusive).
    pub end_line: usize,
}

impl Block {
    pub fn new(start_line: usize, end_line: usize) -> Self {
        debug_assert!(start_line >= 1 && start_line <= end_line);
        Self {
            start_line,
            end_line,
        }
    }

    /// Number of lines spanned. Always at least one.
    #[must_use]
    pub fn line_count(self) -> usize {
        self.end_line - self.start_line + 1
    }

    #[must_use]
    pub fn contains(self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }
}
