use super::fence::{CodeFence, FenceSig};
use super::lines::LineRef;

/// Classification of a single line containing only local facts.
///
/// This is phase 1 of segmentation: each line is classified independently
/// without reference to surrounding context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineClass {
    /// 1-indexed line number.
    pub line: usize,
    /// Whether the line is blank (whitespace only).
    pub is_blank: bool,
    /// If the line looks like a fence opener/closer.
    pub fence_sig: Option<FenceSig>,
}

/// Classifies individual lines for the segmentation phase.
pub struct LineClassifier;

impl LineClassifier {
    pub fn classify(&self, lr: &LineRef<'_>) -> LineClass {
        LineClass {
            line: lr.number,
            is_blank: lr.text.trim().is_empty(),
            fence_sig: CodeFence::sig(&lr.text),
        }
    }
}
