//! # Block Segmentation
//!
//! Splits a document into blocks: maximal runs of lines delimited by blank
//! lines, except inside fenced regions where blank lines are kept.
//!
//! ## Phases
//!
//! 1. **Line splitting** (`lines`): `\n`-separated lines, `\r` before the
//!    terminator dropped, 1-indexed
//! 2. **Line classification** (`classify`): blank status and fence detection
//!    (`fence`) for each line in isolation
//! 3. **Block construction** (`builder`): a `BlockBuilder` tracks the open
//!    block and the fence toggle and emits [`Block`]s as they close
//!
//! ## Key Invariants
//!
//! - Blocks are strictly increasing in `start_line` and never overlap
//! - Blank lines outside fences belong to no block
//! - An unterminated fence extends to the last line of the document
//! - Only enough markdown is understood to delimit blocks

pub mod block;
pub mod builder;
pub mod classify;
pub mod fence;
pub mod lines;

#[cfg(test)]
mod tests;

use xi_rope::Rope;

pub use block::Block;
pub use builder::BlockBuilder;
pub use classify::{LineClass, LineClassifier};
pub use lines::{LineRef, lines_with_spans, split_lines};

/// Segments `text` into blocks. Recomputed in full on every call.
pub fn segment(text: &str) -> Vec<Block> {
    segment_lines(split_lines(text))
}

/// Segments a rope-backed document; identical output to [`segment`] for the
/// same text.
pub fn segment_rope(rope: &Rope) -> Vec<Block> {
    segment_lines(lines_with_spans(rope))
}

/// Segments an already split sequence of lines.
pub fn segment_lines<'a>(lines: impl IntoIterator<Item = LineRef<'a>>) -> Vec<Block> {
    let classifier = LineClassifier;
    let mut builder = BlockBuilder::new();

    for lr in lines {
        let lc = classifier.classify(&lr);
        builder.push(&lc);
    }

    builder.finish()
}

/// Number of lines in `text` as counted by the segmenter.
pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

/// Normalizes translator input and output: CRLF becomes LF and surrounding
/// whitespace is trimmed.
pub fn normalize_text(text: &str) -> String {
    text.replace("\r\n", "\n").trim().to_string()
}
