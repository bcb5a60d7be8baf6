//! # Viewport Controllers
//!
//! One [`ViewportController`] per pane. The controller knows how the pane
//! lays out its units ([`UnitLayout`]) and holds the host's scroll handle
//! ([`ScrollSurface`]); it answers "what is at the top edge" and performs
//! programmatic scrolls.
//!
//! ## Echo suppression
//!
//! A programmatic scroll makes the host fire a native scroll event just like
//! a user gesture would. Every `scroll_to_*` call therefore sets a
//! suppression flag *before* touching the surface, and [`handle_scroll`]
//! reports nothing while it is set. The host clears it on the next rendering
//! frame via [`on_frame`].
//!
//! The controller also remembers the last unit its pane reported, so the
//! coordinator can drop native events that leave the top edge unchanged.
//! Programmatic scrolls forget it.
//!
//! [`handle_scroll`]: ViewportController::handle_scroll
//! [`on_frame`]: ViewportController::on_frame

pub mod layout;

use serde::{Deserialize, Serialize};

pub use layout::{FragmentLayout, LineLayout, UnitLayout};

/// The host's handle on one scrollable pane.
pub trait ScrollSurface {
    fn scroll_top(&self) -> f64;
    fn set_scroll_top(&mut self, top: f64);
    /// Total content height.
    fn scroll_height(&self) -> f64;
    /// Visible height of the pane.
    fn client_height(&self) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaneId {
    /// Left pane: raw source text, fixed line height.
    Source,
    /// Right pane: rendered translation, one fragment per block.
    Rendered,
}

impl PaneId {
    pub fn other(self) -> Self {
        match self {
            PaneId::Source => PaneId::Rendered,
            PaneId::Rendered => PaneId::Source,
        }
    }
}

/// What a pane reports as visible at its top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisibleUnit {
    /// 1-indexed source line.
    Line(usize),
    /// 0-indexed rendered block.
    Block(usize),
    /// Scroll position as a fraction of the scrollable extent.
    Ratio(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityChange {
    pub pane: PaneId,
    pub unit: VisibleUnit,
}

/// Fraction of the scrollable extent already scrolled past; 0 when the
/// content fits in the viewport.
pub fn scroll_ratio(surface: &impl ScrollSurface) -> f64 {
    let max = surface.scroll_height() - surface.client_height();
    if max <= 0.0 {
        return 0.0;
    }
    (surface.scroll_top() / max).clamp(0.0, 1.0)
}

fn max_scroll_top(surface: &impl ScrollSurface) -> f64 {
    (surface.scroll_height() - surface.client_height()).max(0.0)
}

pub struct ViewportController<V, L> {
    pane: PaneId,
    surface: Option<V>,
    layout: L,
    epsilon: f64,
    suppressed: bool,
    reported: Option<VisibleUnit>,
}

impl<V: ScrollSurface, L: UnitLayout> ViewportController<V, L> {
    /// Creates an unmounted controller; every operation is a no-op until
    /// [`mount`](Self::mount).
    pub fn new(pane: PaneId, layout: L, epsilon: f64) -> Self {
        Self {
            pane,
            surface: None,
            layout,
            epsilon,
            suppressed: false,
            reported: None,
        }
    }

    pub fn pane(&self) -> PaneId {
        self.pane
    }

    pub fn mount(&mut self, surface: V) {
        self.surface = Some(surface);
    }

    /// Detaches the surface and drops any pending suppression.
    pub fn unmount(&mut self) -> Option<V> {
        self.suppressed = false;
        self.reported = None;
        self.surface.take()
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&V> {
        self.surface.as_ref()
    }

    /// Mutable access for host-driven (user) scrolling. Does not suppress.
    pub fn surface_mut(&mut self) -> Option<&mut V> {
        self.surface.as_mut()
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut L {
        &mut self.layout
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Unit this pane last reported, or was last moved to by a sync.
    pub fn last_reported(&self) -> Option<VisibleUnit> {
        self.reported
    }

    pub fn set_reported(&mut self, unit: Option<VisibleUnit>) {
        self.reported = unit;
    }

    /// Topmost unit at least partially visible at the top edge.
    pub fn visible_unit(&self) -> Option<usize> {
        let surface = self.surface.as_ref()?;
        self.layout.unit_at(surface.scroll_top() + self.epsilon)
    }

    /// Native scroll event hook. Returns the visible unit for a user-driven
    /// scroll, `None` for the echo of a programmatic one.
    pub fn handle_scroll(&self) -> Option<usize> {
        if self.suppressed {
            return None;
        }
        self.visible_unit()
    }

    /// Ratio variant of [`handle_scroll`](Self::handle_scroll).
    pub fn handle_scroll_ratio(&self) -> Option<f64> {
        if self.suppressed {
            return None;
        }
        self.surface.as_ref().map(scroll_ratio)
    }

    pub fn scroll_ratio(&self) -> f64 {
        self.surface.as_ref().map_or(0.0, scroll_ratio)
    }

    pub fn scroll_to_unit(&mut self, unit: usize) -> bool {
        match self.layout.unit_top(unit) {
            Some(top) => self.scroll_to_offset(top),
            None => false,
        }
    }

    /// Absolute positioning, clamped to the scrollable extent.
    pub fn scroll_to_offset(&mut self, top: f64) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        self.suppressed = true;
        self.reported = None;
        let top = top.clamp(0.0, max_scroll_top(surface));
        surface.set_scroll_top(top);
        true
    }

    pub fn scroll_to_ratio(&mut self, ratio: f64) -> bool {
        let Some(surface) = self.surface.as_ref() else {
            return false;
        };
        let ratio = if ratio.is_finite() {
            ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let top = max_scroll_top(surface) * ratio;
        self.scroll_to_offset(top)
    }

    /// Next rendering frame: programmatic scrolls have settled.
    pub fn on_frame(&mut self) {
        self.suppressed = false;
    }
}

impl<V: ScrollSurface> ViewportController<V, LineLayout> {
    pub fn visible_line(&self) -> Option<usize> {
        self.visible_unit().map(|unit| unit + 1)
    }

    /// Scrolls so that `line` (1-indexed) is at the top edge.
    pub fn scroll_to_line(&mut self, line: usize) -> bool {
        match line.checked_sub(1) {
            Some(unit) => self.scroll_to_unit(unit),
            None => false,
        }
    }
}

impl<V: ScrollSurface> ViewportController<V, FragmentLayout> {
    pub fn visible_block(&self) -> Option<usize> {
        self.visible_unit()
    }

    pub fn scroll_to_block(&mut self, index: usize) -> bool {
        self.scroll_to_unit(index)
    }
}
