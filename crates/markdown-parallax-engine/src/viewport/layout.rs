/// Maps a pane's units (lines or block fragments) to vertical offsets.
///
/// Units are 0-indexed and their tops must be non-decreasing.
pub trait UnitLayout {
    fn unit_count(&self) -> usize;

    /// Top offset of `unit`, or `None` past the last unit.
    fn unit_top(&self, unit: usize) -> Option<f64>;

    /// Last unit whose top is at or above `offset`: the unit straddling (or
    /// starting exactly at) that offset.
    fn unit_at(&self, offset: f64) -> Option<usize> {
        let (mut lo, mut hi) = (0usize, self.unit_count());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.unit_top(mid) {
                Some(top) if top <= offset => lo = mid + 1,
                _ => hi = mid,
            }
        }
        lo.checked_sub(1)
    }
}

/// Fixed line-height layout for the source pane.
///
/// Line `n` (1-indexed) is unit `n - 1` and starts at `(n - 1) * line_height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineLayout {
    line_height: f64,
    line_count: usize,
}

impl LineLayout {
    pub const FALLBACK_LINE_HEIGHT: f64 = 20.0;

    pub fn new(line_height: f64, line_count: usize) -> Self {
        let line_height = if line_height.is_finite() && line_height > 0.0 {
            line_height
        } else {
            Self::FALLBACK_LINE_HEIGHT
        };
        Self {
            line_height,
            line_count,
        }
    }

    pub fn line_height(&self) -> f64 {
        self.line_height
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn set_line_count(&mut self, line_count: usize) {
        self.line_count = line_count;
    }

    /// Vertical extent `[top, bottom)` of the inclusive line range.
    pub fn extent(&self, start_line: usize, end_line: usize) -> (f64, f64) {
        let top = start_line.saturating_sub(1) as f64 * self.line_height;
        let bottom = end_line as f64 * self.line_height;
        (top, bottom)
    }
}

impl UnitLayout for LineLayout {
    fn unit_count(&self) -> usize {
        self.line_count
    }

    fn unit_top(&self, unit: usize) -> Option<f64> {
        (unit < self.line_count).then(|| unit as f64 * self.line_height)
    }

    fn unit_at(&self, offset: f64) -> Option<usize> {
        if self.line_count == 0 || offset < 0.0 {
            return None;
        }
        let unit = (offset / self.line_height).floor() as usize;
        Some(unit.min(self.line_count - 1))
    }
}

/// Measured offsets of the rendered pane's per-block fragments.
///
/// The host re-measures after every layout and replaces the tops wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FragmentLayout {
    tops: Vec<f64>,
}

impl FragmentLayout {
    pub fn new(tops: Vec<f64>) -> Self {
        Self { tops }
    }

    pub fn tops(&self) -> &[f64] {
        &self.tops
    }

    pub fn set_tops(&mut self, tops: Vec<f64>) {
        self.tops = tops;
    }
}

impl UnitLayout for FragmentLayout {
    fn unit_count(&self) -> usize {
        self.tops.len()
    }

    fn unit_top(&self, unit: usize) -> Option<f64> {
        self.tops.get(unit).copied()
    }
}
