//! Drives the coordinator the way a host event loop would: programmatic
//! scrolls raise native scroll events that are delivered back before the
//! next frame.

use std::time::{Duration, Instant};

use markdown_parallax_engine::{
    MarkdownRenderer, PaneId, ScrollSurface, SyncCoordinator, SyncOptions, SyncOutcome,
    render_fragments,
};

#[derive(Debug, Default)]
struct HostPane {
    top: f64,
    height: f64,
    client: f64,
    pending_event: bool,
}

impl ScrollSurface for HostPane {
    fn scroll_top(&self) -> f64 {
        self.top
    }
    fn set_scroll_top(&mut self, top: f64) {
        if top != self.top {
            self.pending_event = true;
        }
        self.top = top;
    }
    fn scroll_height(&self) -> f64 {
        self.height
    }
    fn client_height(&self) -> f64 {
        self.client
    }
}

struct Host {
    coordinator: SyncCoordinator<HostPane, HostPane>,
    now: Instant,
    synced: usize,
}

impl Host {
    fn new(source: &str, translated: &str) -> Self {
        let mut coordinator = SyncCoordinator::new(SyncOptions::default());
        coordinator.set_source_text(source);
        coordinator.set_rendered_text(translated);

        // Lay out fragments: 24 per line of block text plus a 16 margin.
        let fragments = render_fragments(coordinator.rendered_document(), &MarkdownRenderer::new());
        let mut tops = Vec::new();
        let mut y = 0.0;
        for f in &fragments {
            tops.push(y);
            y += f.block.line_count() as f64 * 24.0 + 16.0;
        }
        coordinator.set_fragment_tops(tops);

        let source_height = coordinator.source_document().line_count() as f64 * 20.0;
        coordinator.mount(
            HostPane {
                height: source_height,
                client: 100.0,
                ..Default::default()
            },
            HostPane {
                height: y,
                client: 100.0,
                ..Default::default()
            },
        );
        Self {
            coordinator,
            now: Instant::now(),
            synced: 0,
        }
    }

    fn user_scroll(&mut self, pane: PaneId, top: f64) {
        match pane {
            PaneId::Source => self.coordinator.source_mut().surface_mut().unwrap().top = top,
            PaneId::Rendered => self.coordinator.rendered_mut().surface_mut().unwrap().top = top,
        }
        self.deliver(pane);
        self.run_frame();
    }

    fn deliver(&mut self, pane: PaneId) {
        if let Some(SyncOutcome::Synced { .. }) = self.coordinator.on_scroll(pane, self.now) {
            self.synced += 1;
        }
    }

    /// Native events raised by programmatic scrolls, then the frame.
    fn run_frame(&mut self) {
        for pane in [PaneId::Source, PaneId::Rendered] {
            let pending = match pane {
                PaneId::Source => self.coordinator.source_mut().surface_mut(),
                PaneId::Rendered => self.coordinator.rendered_mut().surface_mut(),
            }
            .map(|p| std::mem::take(&mut p.pending_event))
            .unwrap_or(false);
            if pending {
                self.deliver(pane);
            }
        }
        self.coordinator.on_frame();
        self.advance(16);
    }

    fn advance(&mut self, ms: u64) {
        self.now += Duration::from_millis(ms);
        self.coordinator.tick(self.now);
    }
}

fn source_doc() -> String {
    (0..20)
        .map(|i| format!("Paragraph {i} first line\nParagraph {i} second line"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn translated_doc() -> String {
    (0..20)
        .map(|i| format!("Absatz {i}"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[test]
fn scrolling_source_aligns_rendered_block_without_feedback() {
    let mut host = Host::new(&source_doc(), &translated_doc());

    // Source block 7 starts at line 22, i.e. offset 420.
    host.user_scroll(PaneId::Source, 420.0);

    // Rendered fragments are 40 tall: block 7 at 280.
    assert_eq!(host.coordinator.rendered().surface().unwrap().top, 280.0);
    assert_eq!(host.coordinator.rendered().visible_block(), Some(7));
    // Exactly one sync: the echo from the rendered pane was swallowed.
    assert_eq!(host.synced, 1);
    assert_eq!(host.coordinator.source().surface().unwrap().top, 420.0);
}

#[test]
fn panes_can_take_turns_after_the_quiet_window() {
    let mut host = Host::new(&source_doc(), &translated_doc());

    host.user_scroll(PaneId::Source, 420.0);
    host.advance(200);

    // Now the user scrolls the translation to block 12.
    host.user_scroll(PaneId::Rendered, 480.0);
    assert_eq!(host.coordinator.sync_source(), Some(PaneId::Rendered));
    // Block 12 starts at source line 37.
    assert_eq!(host.coordinator.source().visible_line(), Some(37));
    assert_eq!(host.synced, 2);
}

#[test]
fn continuous_scrolling_keeps_rendered_pane_following() {
    let mut host = Host::new(&source_doc(), &translated_doc());

    let mut top = 0.0;
    while top < 600.0 {
        host.user_scroll(PaneId::Source, top);
        top += 30.0;
    }
    let line = host.coordinator.source().visible_line().unwrap();
    let block = host.coordinator.source_document().block_index_of(line);
    if let Some(block) = block {
        assert_eq!(host.coordinator.rendered().visible_block(), Some(block));
    }
    assert_eq!(host.coordinator.sync_source(), Some(PaneId::Source));
}
