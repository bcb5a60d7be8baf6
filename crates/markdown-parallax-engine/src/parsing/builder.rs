use super::{block::Block, classify::LineClass};

#[derive(Debug, Clone, Copy)]
enum OpenState {
    None,
    Open { start: usize, last: usize },
}

/// Push-based segmentation state machine.
///
/// Feed every line of a document in order through [`BlockBuilder::push`],
/// then call [`BlockBuilder::finish`] to collect the blocks.
pub struct BlockBuilder {
    open: OpenState,
    in_fence: bool,
    out: Vec<Block>,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self {
            open: OpenState::None,
            in_fence: false,
            out: vec![],
        }
    }

    pub fn push(&mut self, c: &LineClass) {
        // Any delimiter toggles; backtick and tilde fences are not paired.
        if c.fence_sig.is_some() {
            self.extend(c.line);
            self.in_fence = !self.in_fence;
            return;
        }

        if self.in_fence {
            self.extend(c.line);
            return;
        }

        if c.is_blank {
            self.flush();
            return;
        }

        self.extend(c.line);
    }

    pub fn finish(mut self) -> Vec<Block> {
        // EOF flush, an unterminated fence included
        self.flush();
        self.out
    }

    fn extend(&mut self, line: usize) {
        self.open = match self.open {
            OpenState::Open { start, .. } => OpenState::Open { start, last: line },
            OpenState::None => OpenState::Open {
                start: line,
                last: line,
            },
        };
    }

    fn flush(&mut self) {
        if let OpenState::Open { start, last } =
            std::mem::replace(&mut self.open, OpenState::None)
        {
            self.out.push(Block::new(start, last));
        }
    }
}

impl Default for BlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::fence::FenceSig;

    fn line(line: usize, is_blank: bool) -> LineClass {
        LineClass {
            line,
            is_blank,
            fence_sig: None,
        }
    }

    fn fence(line: usize) -> LineClass {
        LineClass {
            line,
            is_blank: false,
            fence_sig: Some(FenceSig::Backticks),
        }
    }

    #[test]
    fn blank_line_closes_block() {
        let mut b = BlockBuilder::new();
        b.push(&line(1, false));
        b.push(&line(2, false));
        b.push(&line(3, true));
        b.push(&line(4, false));
        assert_eq!(b.finish(), vec![Block::new(1, 2), Block::new(4, 4)]);
    }

    #[test]
    fn blanks_inside_fence_do_not_close() {
        let mut b = BlockBuilder::new();
        b.push(&fence(1));
        b.push(&line(2, true));
        b.push(&line(3, false));
        b.push(&fence(4));
        b.push(&line(5, true));
        assert_eq!(b.finish(), vec![Block::new(1, 4)]);
    }

    #[test]
    fn unterminated_fence_runs_to_last_line() {
        let mut b = BlockBuilder::new();
        b.push(&fence(1));
        b.push(&line(2, false));
        b.push(&line(3, true));
        assert_eq!(b.finish(), vec![Block::new(1, 3)]);
    }

    #[test]
    fn nothing_pushed_yields_nothing() {
        assert!(BlockBuilder::new().finish().is_empty());
    }
}
