//! Interactive card stack.
//!
//! Owns the terminal, maps crossterm mouse and key events onto the deck's
//! gesture contract, ticks the deck from a frame clock and draws every
//! frame from [`SwipeDeck::frame`].

use std::collections::HashMap;
use std::io::{stdout, Stdout};
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use image::DynamicImage;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use tracing::{debug, info, warn};

use crate::config::{DeckConfig, LayoutConfig};
use crate::deck::{DeckEvent, SwipeDeck, SwipeStats};
use crate::error::Result;
use crate::geometry::{Vec2, Viewport};
use crate::gesture::GestureOutcome;
use crate::motion::FrameClock;
use crate::profile::Profile;
use crate::ui::card_image::{load_image, CellImage};
use crate::ui::colors::Theme;

use super::widgets::{
    BackdropWidget, CardRaster, CardTransform, CardWidget, EmptyStackWidget, FooterWidget,
    HeaderWidget, Stamps,
};

/// How long to block for input while nothing is moving.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Converts between terminal cells and reference units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMapper {
    pub units_per_column: f64,
    pub units_per_row: f64,
}

impl CellMapper {
    pub fn from_layout(layout: &LayoutConfig) -> Self {
        Self {
            units_per_column: layout.units_per_column,
            units_per_row: layout.units_per_row,
        }
    }

    /// Viewport of a cell area in reference units.
    pub fn viewport(&self, area: Rect) -> Viewport {
        Viewport::new(
            area.width as f64 * self.units_per_column,
            area.height as f64 * self.units_per_row,
        )
    }

    /// Cumulative drag offset between two cell positions.
    pub fn offset(&self, anchor: (u16, u16), current: (u16, u16)) -> Vec2 {
        Vec2::new(
            (current.0 as f64 - anchor.0 as f64) * self.units_per_column,
            (current.1 as f64 - anchor.1 as f64) * self.units_per_row,
        )
    }
}

/// Screen regions, recomputed each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Regions {
    pub header: Rect,
    pub content: Rect,
    pub footer: Rect,
    /// The active card's rest position.
    pub card: Rect,
}

impl Regions {
    pub fn compute(area: Rect, layout: &LayoutConfig) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(layout.header_rows),
                Constraint::Min(0),
                Constraint::Length(layout.footer_rows),
            ])
            .split(area);
        let content = chunks[1];
        let pad = layout.card_padding;
        let card = Rect {
            x: content.x.saturating_add(pad),
            y: content.y.saturating_add(pad),
            width: content.width.saturating_sub(pad.saturating_mul(2)),
            height: content.height.saturating_sub(pad.saturating_mul(2)),
        };
        Self {
            header: chunks[0],
            content,
            footer: chunks[2],
            card,
        }
    }
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

/// Cell where the current pointer drag started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DragAnchor {
    start: (u16, u16),
}

/// The interactive application.
pub struct App {
    deck: SwipeDeck,
    layout: LayoutConfig,
    mapper: CellMapper,
    theme: Theme,
    clock: FrameClock,
    images: HashMap<u32, DynamicImage>,
    cell_images: HashMap<u32, CellImage>,
    regions: Regions,
    drag: Option<DragAnchor>,
    running: bool,
}

impl App {
    /// Build the app, decoding every profile picture up front. Pictures
    /// that fail to load are drawn as placeholders.
    pub fn new(config: &DeckConfig) -> Result<Self> {
        let mapper = CellMapper::from_layout(&config.layout);
        let deck = SwipeDeck::from_config(config, Viewport::default())?;

        let mut images = HashMap::new();
        for profile in deck.profiles().iter() {
            match load_image(&profile.image) {
                Ok(img) => {
                    images.insert(profile.id, img);
                }
                Err(err) => warn!(id = profile.id, error = %err, "using placeholder card"),
            }
        }

        Ok(Self {
            deck,
            layout: config.layout,
            mapper,
            theme: Theme::default(),
            clock: FrameClock::new(config.motion.fps),
            images,
            cell_images: HashMap::new(),
            regions: Regions::default(),
            drag: None,
            running: true,
        })
    }

    pub fn deck(&self) -> &SwipeDeck {
        &self.deck
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Regions from the most recent render.
    pub fn regions(&self) -> Regions {
        self.regions
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false
            }
            KeyCode::Left | KeyCode::Char('h') if self.drag.is_none() => {
                self.swipe(GestureOutcome::Reject)
            }
            KeyCode::Right | KeyCode::Char('l') if self.drag.is_none() => {
                self.swipe(GestureOutcome::Accept)
            }
            _ => {}
        }
    }

    fn swipe(&mut self, outcome: GestureOutcome) {
        if self.deck.swipe(outcome).is_some() {
            self.clock.tick();
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let position = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if contains(self.regions.card, mouse.column, mouse.row)
                    && self.deck.on_drag_start()
                {
                    self.drag = Some(DragAnchor { start: position });
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(anchor) = self.drag {
                    let offset = self.mapper.offset(anchor.start, position);
                    self.deck.on_drag_move(offset.x, offset.y);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(anchor) = self.drag.take() {
                    let offset = self.mapper.offset(anchor.start, position);
                    if self.deck.on_drag_end(offset.x, offset.y).is_some() {
                        self.clock.tick();
                    }
                }
            }
            _ => {}
        }
    }

    /// Advance animations by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        match self.deck.tick(dt) {
            Some(DeckEvent::Dismissed { id, outcome }) => {
                debug!(id, ?outcome, "swipe animation finished");
            }
            Some(DeckEvent::Restored { id }) => debug!(id, "snapped back"),
            None => {}
        }
    }

    /// Resample the picture for `id` when the card size changed.
    fn refresh_cell_image(&mut self, id: u32, width: u16, height: u16) {
        let stale = self
            .cell_images
            .get(&id)
            .map_or(true, |img| img.width() != width || img.height() != height);
        if !stale {
            return;
        }
        if let Some(img) = self.images.get(&id) {
            self.cell_images
                .insert(id, CellImage::from_image(img, width, height));
        }
    }

    fn raster(&mut self, profile: &Profile, stamps: Stamps) -> CardRaster {
        let card = self.regions.card;
        self.refresh_cell_image(
            profile.id,
            card.width.saturating_sub(2),
            card.height.saturating_sub(2),
        );
        CardRaster::compose(
            profile,
            self.cell_images.get(&profile.id),
            card.width,
            card.height,
            stamps,
            &self.theme,
        )
    }

    /// Draw one frame.
    pub fn render(&mut self, frame: &mut Frame) {
        self.regions = Regions::compute(frame.area(), &self.layout);
        let viewport = self.mapper.viewport(self.regions.content);
        if viewport != self.deck.viewport() {
            self.deck.resize(viewport);
        }

        let regions = self.regions;
        let theme = self.theme;
        frame.render_widget(BackdropWidget::new(theme.background), frame.area());

        let snapshot = self.deck.frame();
        let stats = self.deck.stats();
        let total = self.deck.profiles().len();
        let presentation = snapshot.presentation;
        let next = snapshot.next.cloned();
        let active = snapshot.active.cloned();
        frame.render_widget(HeaderWidget::new(&snapshot, stats, total, theme), regions.header);
        frame.render_widget(FooterWidget::new(theme), regions.footer);

        if active.is_none() {
            frame.render_widget(EmptyStackWidget::new(stats, theme), regions.content);
            return;
        }

        let identity = CardTransform::identity(self.mapper.units_per_column, self.mapper.units_per_row);

        // Next card first so the active card paints over it.
        if let Some(profile) = next {
            let raster = self.raster(&profile, Stamps::default());
            let transform = CardTransform {
                scale: presentation.next_scale,
                opacity: presentation.next_opacity,
                ..identity
            };
            frame.render_widget(
                CardWidget::new(&raster, transform, theme.background),
                regions.content,
            );
        }

        if let Some(profile) = active {
            let stamps = Stamps {
                accept: presentation.accept_opacity,
                reject: presentation.reject_opacity,
            };
            let raster = self.raster(&profile, stamps);
            let transform = CardTransform {
                translation: presentation.translation,
                rotation_deg: presentation.rotation_deg,
                ..identity
            };
            frame.render_widget(
                CardWidget::new(&raster, transform, theme.background),
                regions.content,
            );
        }
    }

    /// Draw, wait for input or the next frame, repeat until quit.
    pub fn run_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            let timeout = if self.deck.is_animating() {
                self.clock.until_next_frame()
            } else {
                IDLE_POLL
            };
            if event::poll(timeout)? {
                self.handle_event(event::read()?);
                // Coalesce bursts of drag samples; only the latest matters.
                while self.running && event::poll(Duration::ZERO)? {
                    self.handle_event(event::read()?);
                }
            }

            if self.deck.is_animating() && self.clock.should_tick() {
                let dt = self.clock.tick();
                self.tick(dt);
            }
        }
        Ok(())
    }
}

/// Initialize terminal for TUI mode with mouse capture.
pub fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

/// Restore terminal from TUI mode.
pub fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the interactive deck until the user quits. Returns the session
/// counts.
pub fn run(config: &DeckConfig) -> Result<SwipeStats> {
    let mut app = App::new(config)?;
    let mut terminal = init_terminal()?;
    let result = app.run_loop(&mut terminal);
    restore_terminal(&mut terminal)?;
    result?;

    let stats = app.deck().stats();
    info!(
        accepted = stats.accepted,
        rejected = stats.rejected,
        cancelled = stats.cancelled,
        "session finished"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn render(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol().to_string())
            .collect()
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn settle(app: &mut App) {
        for _ in 0..5_000 {
            if !app.deck().is_animating() {
                return;
            }
            app.tick(Duration::from_millis(16));
        }
        panic!("deck did not settle");
    }

    #[test]
    fn test_cell_mapper() {
        let mapper = CellMapper::from_layout(&LayoutConfig::default());
        assert_eq!(mapper.viewport(Rect::new(0, 0, 100, 20)), Viewport::new(400.0, 160.0));
        assert_eq!(mapper.offset((10, 10), (40, 12)), Vec2::new(120.0, 16.0));
        assert_eq!(mapper.offset((40, 10), (9, 10)), Vec2::new(-124.0, 0.0));
    }

    #[test]
    fn test_regions() {
        let regions = Regions::compute(Rect::new(0, 0, 60, 30), &LayoutConfig::default());
        assert_eq!(regions.header, Rect::new(0, 0, 60, 1));
        assert_eq!(regions.footer, Rect::new(0, 29, 60, 1));
        assert_eq!(regions.content, Rect::new(0, 1, 60, 28));
        assert_eq!(regions.card, Rect::new(1, 2, 58, 26));
    }

    #[test]
    fn test_first_render_shows_first_card() {
        let mut app = App::new(&DeckConfig::default()).unwrap();
        let screen = render(&mut app);
        assert!(screen.contains("swipedeck"));
        assert!(screen.contains("#1"));
        assert_eq!(app.deck().viewport(), Viewport::new(240.0, 224.0));
    }

    #[test]
    fn test_mouse_drag_accepts_card() {
        let mut app = App::new(&DeckConfig::default()).unwrap();
        render(&mut app);

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 20, 15));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 40, 16));
        assert_eq!(app.deck().offset(), Vec2::new(80.0, 8.0));
        render(&mut app);

        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 52, 16));
        assert!(app.deck().is_animating());
        settle(&mut app);
        assert_eq!(app.deck().cursor(), 2);
        assert!(render(&mut app).contains("#2"));
    }

    #[test]
    fn test_mouse_down_outside_card_is_ignored() {
        let mut app = App::new(&DeckConfig::default()).unwrap();
        render(&mut app);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 0, 0));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 50, 0));
        assert_eq!(app.deck().offset(), Vec2::ZERO);
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 50, 0));
        assert!(!app.deck().is_animating());
    }

    #[test]
    fn test_short_drag_snaps_back() {
        let mut app = App::new(&DeckConfig::default()).unwrap();
        render(&mut app);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 30, 15));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 20, 15));
        settle(&mut app);
        assert_eq!(app.deck().cursor(), 1);
        assert_eq!(app.deck().stats().cancelled, 1);
    }

    #[test]
    fn test_keys_swipe_until_empty() {
        let mut app = App::new(&DeckConfig::default()).unwrap();
        render(&mut app);
        for code in [KeyCode::Right, KeyCode::Left, KeyCode::Char('l'), KeyCode::Char('h')] {
            app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
            settle(&mut app);
        }
        assert!(app.deck().is_exhausted());
        assert_eq!(app.deck().stats().accepted, 2);
        assert!(render(&mut app).contains("No more profiles"));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new(&DeckConfig::default()).unwrap();
        app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(!app.is_running());

        let mut app = App::new(&DeckConfig::default()).unwrap();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.is_running());
    }

    #[test]
    fn test_missing_image_uses_placeholder() {
        let config = DeckConfig {
            profiles: vec![Profile::new(1, "missing.png"), Profile::new(2, "2.png")],
            ..DeckConfig::default()
        };
        let mut app = App::new(&config).unwrap();
        let screen = render(&mut app);
        assert!(screen.contains('?'));
    }
}
