//! # Scroll Synchronization
//!
//! A single [`SyncCoordinator`] owns both panes' controllers and documents
//! and decides which pane follows which.
//!
//! ## State machine
//!
//! ```text
//!   Idle ──(pane P reports)──▶ Locked(P) ──(lock window elapses)──▶ Idle
//!                                 │  ▲
//!                                 └──┘ P reports again: re-arm window
//!                                      other pane reports: ignored
//! ```
//!
//! The lock and the per-pane suppression flag in [`crate::viewport`] are
//! independent: suppression swallows the echo of our own write, the lock
//! swallows the other pane's settling events.
//!
//! Time only enters through the `now` argument, and the host calls
//! [`SyncCoordinator::tick`] and [`SyncCoordinator::on_frame`] from its
//! event loop.

pub mod options;

use std::ops::Range;
use std::time::Instant;

use log::{debug, trace};

use crate::document::Document;
use crate::highlight::{GutterLine, HighlightRange, gutter_lines, reveal_offset};
use crate::viewport::{
    FragmentLayout, LineLayout, PaneId, ScrollSurface, UnitLayout, ViewportController,
    VisibilityChange, VisibleUnit,
};

pub use options::{SyncMode, SyncOptions, SyncStrategy};

/// Host hooks for what the coordinator reports outward.
///
/// Injected once; both methods default to doing nothing.
pub trait SyncObserver {
    /// A pane was scrolled by the user (never fired for suppressed echoes).
    fn visibility_changed(&mut self, _change: VisibilityChange) {}

    /// The source-pane highlight was set or cleared.
    fn highlight_changed(&mut self, _highlight: Option<HighlightRange>) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    /// `by` initiated the current interaction; `mode` is fixed until unlock.
    Locked { by: PaneId, mode: SyncMode },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The other pane was scrolled.
    Synced { target: PaneId },
    /// The lock was taken but there was nothing to scroll to.
    Missed,
    /// The other pane holds the lock.
    Ignored,
}

pub struct SyncCoordinator<S, R> {
    options: SyncOptions,
    source: ViewportController<S, LineLayout>,
    rendered: ViewportController<R, FragmentLayout>,
    source_doc: Document,
    rendered_doc: Document,
    state: SyncState,
    unlock_at: Option<Instant>,
    highlight: Option<HighlightRange>,
    observer: Option<Box<dyn SyncObserver>>,
}

impl<S: ScrollSurface, R: ScrollSurface> SyncCoordinator<S, R> {
    pub fn new(options: SyncOptions) -> Self {
        let source_doc = Document::default();
        let source = ViewportController::new(
            PaneId::Source,
            LineLayout::new(options.line_height, source_doc.line_count()),
            options.visibility_epsilon,
        );
        let rendered = ViewportController::new(
            PaneId::Rendered,
            FragmentLayout::default(),
            options.visibility_epsilon,
        );
        Self {
            options,
            source,
            rendered,
            source_doc,
            rendered_doc: Document::default(),
            state: SyncState::Idle,
            unlock_at: None,
            highlight: None,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn SyncObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn mount(&mut self, source: S, rendered: R) {
        self.source.mount(source);
        self.rendered.mount(rendered);
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Pane that initiated the active sync, if any.
    pub fn sync_source(&self) -> Option<PaneId> {
        match self.state {
            SyncState::Idle => None,
            SyncState::Locked { by, .. } => Some(by),
        }
    }

    pub fn source(&self) -> &ViewportController<S, LineLayout> {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut ViewportController<S, LineLayout> {
        &mut self.source
    }

    pub fn rendered(&self) -> &ViewportController<R, FragmentLayout> {
        &self.rendered
    }

    pub fn rendered_mut(&mut self) -> &mut ViewportController<R, FragmentLayout> {
        &mut self.rendered
    }

    pub fn source_document(&self) -> &Document {
        &self.source_doc
    }

    pub fn rendered_document(&self) -> &Document {
        &self.rendered_doc
    }

    pub fn highlight(&self) -> Option<HighlightRange> {
        self.highlight
    }

    pub fn set_source_text(&mut self, text: &str) {
        self.source_doc.replace(text);
        self.source_changed();
    }

    pub fn edit_source(&mut self, range: Range<usize>, text: &str) {
        self.source_doc.edit(range, text);
        self.source_changed();
    }

    /// Replaces the rendered document. Fragment offsets from the previous
    /// text are dropped; the host reports new ones after layout.
    pub fn set_rendered_text(&mut self, text: &str) {
        self.rendered_doc.replace(text);
        self.rendered.layout_mut().set_tops(Vec::new());
        self.forget_reported();
        self.set_highlight(None);
    }

    /// Measured top offsets of the rendered fragments, one per block.
    pub fn set_fragment_tops(&mut self, tops: Vec<f64>) {
        self.rendered.layout_mut().set_tops(tops);
        self.forget_reported();
    }

    fn source_changed(&mut self) {
        let lines = self.source_doc.line_count();
        self.source.layout_mut().set_line_count(lines);
        self.forget_reported();
        self.set_highlight(None);
    }

    /// Strategy for a new interaction.
    pub fn resolve_mode(&self) -> SyncMode {
        match self.options.strategy {
            SyncStrategy::Blocks => SyncMode::Blocks,
            SyncStrategy::Ratio => SyncMode::Ratio,
            SyncStrategy::Auto => {
                let segmentable = !self.source_doc.blocks().is_empty()
                    && !self.rendered_doc.blocks().is_empty()
                    && self.rendered.layout().unit_count() > 0;
                if segmentable {
                    SyncMode::Blocks
                } else {
                    SyncMode::Ratio
                }
            }
        }
    }

    /// Native scroll event from `pane`.
    ///
    /// Returns `None` when the pane is suppressed (the event is the echo of
    /// a programmatic scroll), unmounted, or still shows the unit it last
    /// reported. A repeat from the pane holding the lock re-arms the lock.
    pub fn on_scroll(&mut self, pane: PaneId, now: Instant) -> Option<SyncOutcome> {
        self.tick(now);
        let mode = match self.state {
            SyncState::Locked { mode, .. } => mode,
            SyncState::Idle => self.resolve_mode(),
        };

        let unit = match (pane, mode) {
            (PaneId::Source, SyncMode::Blocks) => self
                .source
                .handle_scroll()
                .map(|unit| VisibleUnit::Line(unit + 1)),
            (PaneId::Rendered, SyncMode::Blocks) => {
                self.rendered.handle_scroll().map(VisibleUnit::Block)
            }
            (PaneId::Source, SyncMode::Ratio) => {
                self.source.handle_scroll_ratio().map(VisibleUnit::Ratio)
            }
            (PaneId::Rendered, SyncMode::Ratio) => {
                self.rendered.handle_scroll_ratio().map(VisibleUnit::Ratio)
            }
        }?;

        if self.last_reported(pane) == Some(unit) {
            if self.sync_source() == Some(pane) {
                self.unlock_at = Some(now + self.options.lock_window());
            }
            trace!("{pane:?} still at {unit:?}");
            return None;
        }

        let change = VisibilityChange { pane, unit };
        if let Some(observer) = self.observer.as_mut() {
            observer.visibility_changed(change);
        }
        let outcome = self.handle_visibility(change, now);
        if outcome != SyncOutcome::Ignored {
            self.set_last_reported(pane, Some(unit));
        }
        Some(outcome)
    }

    pub fn handle_visibility(&mut self, change: VisibilityChange, now: Instant) -> SyncOutcome {
        self.tick(now);

        let mode = match self.state {
            SyncState::Locked { by, .. } if by != change.pane => {
                trace!("ignoring {:?} while locked by {by:?}", change.pane);
                return SyncOutcome::Ignored;
            }
            SyncState::Locked { mode, .. } => mode,
            SyncState::Idle => {
                let mode = self.resolve_mode();
                debug!("sync locked by {:?} ({mode:?})", change.pane);
                mode
            }
        };
        self.state = SyncState::Locked {
            by: change.pane,
            mode,
        };
        self.unlock_at = Some(now + self.options.lock_window());

        let synced = match (change.pane, change.unit, mode) {
            (PaneId::Source, VisibleUnit::Line(line), SyncMode::Blocks) => self
                .source_doc
                .block_index_of(line)
                .is_some_and(|index| self.rendered.scroll_to_block(index)),
            (PaneId::Rendered, VisibleUnit::Block(index), SyncMode::Blocks) => self
                .source_doc
                .block_range_of(index)
                .is_some_and(|block| self.source.scroll_to_line(block.start_line)),
            (PaneId::Source, VisibleUnit::Ratio(ratio), SyncMode::Ratio) => {
                self.rendered.scroll_to_ratio(ratio)
            }
            (PaneId::Rendered, VisibleUnit::Ratio(ratio), SyncMode::Ratio) => {
                self.source.scroll_to_ratio(ratio)
            }
            _ => false,
        };

        if synced {
            let target = change.pane.other();
            let landed = self.current_unit(target, mode);
            self.set_last_reported(target, landed);
            SyncOutcome::Synced { target }
        } else {
            trace!("no sync target for {change:?}");
            SyncOutcome::Missed
        }
    }

    /// What `pane` shows at its top edge, expressed for `mode`.
    fn current_unit(&self, pane: PaneId, mode: SyncMode) -> Option<VisibleUnit> {
        match (pane, mode) {
            (PaneId::Source, SyncMode::Blocks) => self.source.visible_line().map(VisibleUnit::Line),
            (PaneId::Rendered, SyncMode::Blocks) => {
                self.rendered.visible_block().map(VisibleUnit::Block)
            }
            (PaneId::Source, SyncMode::Ratio) => self
                .source
                .is_mounted()
                .then(|| VisibleUnit::Ratio(self.source.scroll_ratio())),
            (PaneId::Rendered, SyncMode::Ratio) => self
                .rendered
                .is_mounted()
                .then(|| VisibleUnit::Ratio(self.rendered.scroll_ratio())),
        }
    }

    fn last_reported(&self, pane: PaneId) -> Option<VisibleUnit> {
        match pane {
            PaneId::Source => self.source.last_reported(),
            PaneId::Rendered => self.rendered.last_reported(),
        }
    }

    fn set_last_reported(&mut self, pane: PaneId, unit: Option<VisibleUnit>) {
        match pane {
            PaneId::Source => self.source.set_reported(unit),
            PaneId::Rendered => self.rendered.set_reported(unit),
        }
    }

    /// Units change meaning when either document or the layout changes.
    fn forget_reported(&mut self) {
        self.source.set_reported(None);
        self.rendered.set_reported(None);
    }

    /// Releases the lock once its window has elapsed. Returns whether it did.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.unlock_at {
            Some(at) if now >= at => {
                self.unlock_at = None;
                self.state = SyncState::Idle;
                debug!("sync unlocked");
                true
            }
            _ => false,
        }
    }

    /// Next rendering frame: releases both panes' scroll suppression.
    pub fn on_frame(&mut self) {
        self.source.on_frame();
        self.rendered.on_frame();
    }

    /// Imperative positioning of the source pane (suppressed).
    pub fn scroll_to_line(&mut self, line: usize) -> bool {
        self.source.scroll_to_line(line)
    }

    /// Imperative positioning of the rendered pane (suppressed).
    pub fn scroll_to_block(&mut self, index: usize) -> bool {
        self.rendered.scroll_to_block(index)
    }

    /// A line of the rendered document was selected.
    ///
    /// Highlights the source block with the same index and, if it is not
    /// fully on screen, centers it in the source pane once.
    pub fn click_rendered_line(&mut self, line: usize) -> Option<HighlightRange> {
        let range = crate::highlight::highlight_for_rendered_line(
            &self.source_doc,
            &self.rendered_doc,
            line,
        );
        self.set_highlight(range);

        if let Some(range) = range
            && let Some(surface) = self.source.surface()
            && let Some(top) = reveal_offset(
                range,
                self.source.layout(),
                surface.scroll_top(),
                surface.client_height(),
            )
        {
            self.source.scroll_to_offset(top);
        }
        range
    }

    pub fn clear_highlight(&mut self) {
        self.set_highlight(None);
    }

    fn set_highlight(&mut self, highlight: Option<HighlightRange>) {
        if self.highlight == highlight {
            return;
        }
        self.highlight = highlight;
        if let Some(observer) = self.observer.as_mut() {
            observer.highlight_changed(highlight);
        }
    }

    pub fn gutter(&self) -> Vec<GutterLine> {
        gutter_lines(self.source_doc.line_count(), self.highlight)
    }

    /// The view is going away: drop the pending unlock, suppression and
    /// highlight, and hand back both surfaces.
    pub fn teardown(&mut self) -> (Option<S>, Option<R>) {
        self.unlock_at = None;
        self.state = SyncState::Idle;
        self.set_highlight(None);
        (self.source.unmount(), self.rendered.unmount())
    }
}
