use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use markdown_parallax_config::Config;
use markdown_parallax_engine::{
    Document, PaneId, ScrollSurface, SyncCoordinator, SyncOptions, SyncOutcome,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env, fs,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
    time::{Duration, Instant},
};

const FRAME: Duration = Duration::from_millis(16);
const WHEEL_STEP: f64 = 3.0;

/// A scrollable terminal pane measured in rows.
///
/// Writes through [`ScrollSurface::set_scroll_top`] raise a native scroll
/// event that the main loop delivers before the next frame.
#[derive(Debug, Default)]
struct TerminalPane {
    top: f64,
    height: f64,
    client: f64,
    pending_event: bool,
}

impl TerminalPane {
    fn max_top(&self) -> f64 {
        (self.height - self.client).max(0.0)
    }

    fn row(&self) -> u16 {
        self.top.clamp(0.0, f64::from(u16::MAX)) as u16
    }
}

impl ScrollSurface for TerminalPane {
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

/// One row of the translated pane. Separator rows between blocks carry no
/// document line.
#[derive(Debug, Clone)]
struct RenderedRow {
    line: Option<usize>,
    text: String,
}

/// Lays the translated blocks out one after another with a blank row
/// between them. Returns the rows and each block's first row.
fn layout_rendered(document: &Document) -> (Vec<RenderedRow>, Vec<f64>) {
    let mut rows = Vec::new();
    let mut tops = Vec::with_capacity(document.blocks().len());

    let texts = document.block_texts();
    for (index, (block, text)) in document.blocks().iter().zip(&texts).enumerate() {
        if index > 0 {
            rows.push(RenderedRow {
                line: None,
                text: String::new(),
            });
        }
        tops.push(rows.len() as f64);
        for (offset, line) in text.split('\n').enumerate() {
            rows.push(RenderedRow {
                line: Some(block.start_line + offset),
                text: line.trim_end_matches('\r').to_string(),
            });
        }
    }
    (rows, tops)
}

fn split_source(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

struct App {
    coordinator: SyncCoordinator<TerminalPane, TerminalPane>,
    source_path: PathBuf,
    rendered_path: PathBuf,
    source_lines: Vec<String>,
    rendered_rows: Vec<RenderedRow>,
    selected_block: Option<usize>,
    focus: PaneId,
    source_area: Rect,
    rendered_area: Rect,
}

impl App {
    fn new(options: SyncOptions, source_path: PathBuf, rendered_path: PathBuf) -> Result<Self> {
        let mut coordinator = SyncCoordinator::new(options);
        coordinator.set_source_text(&read_markdown(&source_path)?);
        coordinator.set_rendered_text(&read_markdown(&rendered_path)?);
        coordinator.mount(TerminalPane::default(), TerminalPane::default());

        let mut app = Self {
            coordinator,
            source_path,
            rendered_path,
            source_lines: Vec::new(),
            rendered_rows: Vec::new(),
            selected_block: None,
            focus: PaneId::Source,
            source_area: Rect::default(),
            rendered_area: Rect::default(),
        };
        app.relayout();
        Ok(app)
    }

    /// Re-reads both files from disk and lays them out again.
    fn reload(&mut self) -> Result<()> {
        let source = read_markdown(&self.source_path)?;
        let rendered = read_markdown(&self.rendered_path)?;
        self.coordinator.set_source_text(&source);
        self.coordinator.set_rendered_text(&rendered);
        self.selected_block = None;
        self.relayout();
        log::info!(
            "reloaded {} and {}",
            self.source_path.display(),
            self.rendered_path.display()
        );
        Ok(())
    }

    fn relayout(&mut self) {
        self.source_lines = split_source(&self.coordinator.source_document().text());
        let (rows, tops) = layout_rendered(self.coordinator.rendered_document());
        log::debug!("{} rendered rows, {} fragments", rows.len(), tops.len());
        self.rendered_rows = rows;
        self.coordinator.set_fragment_tops(tops);

        let source_height = self.source_lines.len();
        let rendered_height = self.rendered_rows.len();
        if let Some(pane) = self.coordinator.source_mut().surface_mut() {
            pane.height = source_height as f64;
            pane.top = pane.top.min(pane.max_top());
        }
        if let Some(pane) = self.coordinator.rendered_mut().surface_mut() {
            pane.height = rendered_height as f64;
            pane.top = pane.top.min(pane.max_top());
        }
    }

    /// Viewport sizes follow the terminal; called on every draw.
    fn resize(&mut self, source_area: Rect, rendered_area: Rect) {
        self.source_area = source_area;
        self.rendered_area = rendered_area;
        if let Some(pane) = self.coordinator.source_mut().surface_mut() {
            pane.client = f64::from(source_area.height.saturating_sub(2));
        }
        if let Some(pane) = self.coordinator.rendered_mut().surface_mut() {
            pane.client = f64::from(rendered_area.height.saturating_sub(2));
        }
    }

    fn pane_mut(&mut self, pane: PaneId) -> Option<&mut TerminalPane> {
        match pane {
            PaneId::Source => self.coordinator.source_mut().surface_mut(),
            PaneId::Rendered => self.coordinator.rendered_mut().surface_mut(),
        }
    }

    /// User scroll: moves the pane and reports it right away.
    fn scroll_by(&mut self, pane: PaneId, delta: f64) {
        let Some(surface) = self.pane_mut(pane) else {
            return;
        };
        let top = (surface.top + delta).clamp(0.0, surface.max_top());
        if top == surface.top {
            return;
        }
        surface.top = top;
        self.deliver(pane);
    }

    fn scroll_to_edge(&mut self, pane: PaneId, end: bool) {
        let Some(surface) = self.pane_mut(pane) else {
            return;
        };
        let delta = if end {
            surface.max_top() - surface.top
        } else {
            -surface.top
        };
        self.scroll_by(pane, delta);
    }

    fn page(&mut self, pane: PaneId, down: bool) {
        let client = self.pane_mut(pane).map_or(1.0, |p| p.client.max(1.0));
        self.scroll_by(pane, if down { client } else { -client });
    }

    fn deliver(&mut self, pane: PaneId) {
        match self.coordinator.on_scroll(pane, Instant::now()) {
            Some(SyncOutcome::Synced { target }) => log::trace!("{pane:?} moved {target:?}"),
            Some(outcome) => log::trace!("{pane:?} scroll: {outcome:?}"),
            None => {}
        }
    }

    /// Delivers the scroll events raised by programmatic writes.
    fn deliver_pending(&mut self) {
        for pane in [PaneId::Source, PaneId::Rendered] {
            let pending = self
                .pane_mut(pane)
                .map(|p| std::mem::take(&mut p.pending_event))
                .unwrap_or(false);
            if pending {
                self.deliver(pane);
            }
        }
    }

    fn click(&mut self, column: u16, row: u16) {
        if contains(self.rendered_area, column, row) {
            self.focus = PaneId::Rendered;
            let inner_y = row.saturating_sub(self.rendered_area.y.saturating_add(1));
            let top = self
                .coordinator
                .rendered()
                .surface()
                .map_or(0, TerminalPane::row);
            let index = usize::from(top) + usize::from(inner_y);
            let line = self.rendered_rows.get(index).and_then(|r| r.line);

            match line {
                Some(line) => {
                    let range = self.coordinator.click_rendered_line(line);
                    self.selected_block = range
                        .and_then(|_| self.coordinator.rendered_document().block_index_of(line));
                }
                None => self.clear_selection(),
            }
        } else if contains(self.source_area, column, row) {
            self.focus = PaneId::Source;
        }
    }

    fn clear_selection(&mut self) {
        self.selected_block = None;
        self.coordinator.clear_highlight();
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Esc => self.clear_selection(),
            KeyCode::Tab => self.focus = self.focus.other(),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(self.focus, 1.0),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(self.focus, -1.0),
            KeyCode::PageDown | KeyCode::Char(' ') => self.page(self.focus, true),
            KeyCode::PageUp => self.page(self.focus, false),
            KeyCode::Home | KeyCode::Char('g') => self.scroll_to_edge(self.focus, false),
            KeyCode::End | KeyCode::Char('G') => self.scroll_to_edge(self.focus, true),
            KeyCode::Char('r') => self.reload()?,
            _ => {}
        }
        Ok(false)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let pane = if contains(self.rendered_area, mouse.column, mouse.row) {
            PaneId::Rendered
        } else {
            PaneId::Source
        };
        match mouse.kind {
            MouseEventKind::ScrollDown => self.scroll_by(pane, WHEEL_STEP),
            MouseEventKind::ScrollUp => self.scroll_by(pane, -WHEEL_STEP),
            MouseEventKind::Down(MouseButton::Left) => self.click(mouse.column, mouse.row),
            _ => {}
        }
    }
}

fn read_markdown(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    // stderr belongs to the terminal UI, so only log when a file is configured
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <source.md> <translated.md>", args[0]);
        process::exit(1);
    }
    let source_path = PathBuf::from(&args[1]);
    let rendered_path = PathBuf::from(&args[2]);

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Fix or remove {}", Config::config_path().display());
            process::exit(1);
        }
    };
    init_logging(config.log_file.as_deref())?;
    log::info!("markdown-parallax starting, sync {:?}", config.sync.strategy);

    // Terminal panes scroll by whole rows
    let options = SyncOptions {
        line_height: 1.0,
        visibility_epsilon: 0.0,
        ..config.sync
    };

    let mut app = match App::new(options, source_path, rendered_path) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);
    app.coordinator.teardown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    log::info!("markdown-parallax exiting");
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.deliver_pending();
        terminal.draw(|f| ui(f, app))?;
        app.coordinator.on_frame();

        if event::poll(FRAME)? {
            match event::read()? {
                Event::Key(key) => {
                    if app.handle_key(key)? {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
        app.coordinator.tick(Instant::now());
    }
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

fn ui(f: &mut Frame, app: &mut App) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(vertical[0]);
    app.resize(chunks[0], chunks[1]);

    // Source panel with line-number gutter
    let gutter = app.coordinator.gutter();
    let width = gutter.len().to_string().len();
    let source_text: Vec<Line> = gutter
        .iter()
        .map(|g| {
            let number_style = if g.active {
                Style::default().bg(Color::Yellow).fg(Color::Black)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let text = app
                .source_lines
                .get(g.number - 1)
                .cloned()
                .unwrap_or_default();
            Line::from(vec![
                Span::styled(format!("{:>width$} ", g.number), number_style),
                Span::raw(text),
            ])
        })
        .collect();
    let source_top = app.coordinator.source().surface().map_or(0, TerminalPane::row);
    let source = Paragraph::new(source_text)
        .block(pane_block(
            app.source_path.display().to_string(),
            app.focus == PaneId::Source,
        ))
        .scroll((source_top, 0));
    f.render_widget(source, chunks[0]);

    // Translated panel, one fragment per block
    let rendered_doc = app.coordinator.rendered_document();
    let rendered_text: Vec<Line> = app
        .rendered_rows
        .iter()
        .map(|row| {
            let selected = row.line.is_some_and(|line| {
                app.selected_block.is_some()
                    && rendered_doc.block_index_of(line) == app.selected_block
            });
            let mut style = Style::default();
            if row.text.trim_start().starts_with('#') {
                style = style.add_modifier(Modifier::BOLD);
            }
            if selected {
                style = style.bg(Color::DarkGray);
            }
            Line::from(Span::styled(row.text.clone(), style))
        })
        .collect();
    let rendered_top = app
        .coordinator
        .rendered()
        .surface()
        .map_or(0, TerminalPane::row);
    let rendered = Paragraph::new(rendered_text)
        .block(pane_block(
            app.rendered_path.display().to_string(),
            app.focus == PaneId::Rendered,
        ))
        .scroll((rendered_top, 0));
    f.render_widget(rendered, chunks[1]);

    // Instructions
    let lock = match app.coordinator.sync_source() {
        Some(pane) => format!("sync: {pane:?}"),
        None => "sync: idle".to_string(),
    };
    let help_text = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("Tab: Switch pane | "),
        Span::raw("↑/k ↓/j: Scroll | "),
        Span::raw("Click: Find source | "),
        Span::raw("Esc: Clear | "),
        Span::raw("r: Reload | "),
        Span::styled(lock, Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(vec![help_text]), vertical[1]);
}
