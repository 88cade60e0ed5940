use std::io::{Stdout, stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Clear, Paragraph},
};
use utopia_core::fade::hero_height;
use utopia_core::image::QrState;
use utopia_core::{HostEvent, Page, PageConfig, SimulatedHost};
use utopia_protocol::{ElementId, ImageDimensions, RenderCommand, ThemeToken};

use crate::scene::Scene;

/// Avatar edge length at scale 1, in CSS pixels.
const AVATAR_PX: f64 = 256.0;
/// Natural size reported for the QR code when the simulated fetch succeeds.
const QR_DIMENSIONS: ImageDimensions = ImageDimensions {
    width: 430,
    height: 430,
};
/// One presented frame per tick.
const TICK: Duration = Duration::from_millis(16);
const LINE_STEP_PX: f64 = 20.0;
/// Scrollable page height, in viewport heights.
const PAGE_HEIGHT_VIEWPORTS: f64 = 4.0;

pub struct Options {
    pub px_per_col: f64,
    pub px_per_row: f64,
    pub offline: bool,
}

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::Primary50 => Color::Rgb(0xee, 0xf6, 0xff),
        ThemeToken::Primary200 => Color::Rgb(0xbf, 0xdc, 0xfe),
        ThemeToken::Primary300 => Color::Rgb(0x93, 0xc5, 0xfd),
        ThemeToken::Primary500 => Color::Rgb(0x3b, 0x82, 0xf6),
        ThemeToken::Primary700 => Color::Rgb(0x1d, 0x4e, 0xd8),
        ThemeToken::Primary800 => Color::Rgb(0x1e, 0x40, 0xaf),
        ThemeToken::Primary900 => Color::Rgb(0x1e, 0x3a, 0x8a),
        ThemeToken::Primary950 => Color::Rgb(0x17, 0x25, 0x54),
        ThemeToken::Heart => Color::Rgb(0xef, 0x44, 0x44),
    }
}

/// Terminals have no alpha; pick between the full color and a muted one.
fn faded(token: ThemeToken, opacity: f64) -> Option<Color> {
    if opacity <= 0.05 {
        None
    } else if opacity < 0.5 {
        Some(Color::DarkGray)
    } else {
        Some(theme_to_color(token))
    }
}

/// Raw mode + alternate screen for as long as this value lives.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture);
    }
}

struct Preview {
    host: SimulatedHost,
    page: Page<SimulatedHost>,
    scene: Scene,
    options: Options,
    scroll_y: f64,
    scroll_events: u64,
}

impl Preview {
    fn new(config: PageConfig, options: Options, cols: u16, rows: u16) -> Self {
        let (width, height) = viewport_px(&options, cols, rows);
        let host = SimulatedHost::with_window(width, height);
        let page = Page::mount(host.clone(), config);
        let mut scene = Scene::default();
        scene.apply(&page.initial_commands());
        Self {
            host,
            page,
            scene,
            options,
            scroll_y: 0.0,
            scroll_events: 0,
        }
    }

    fn apply(&mut self, commands: &[RenderCommand]) {
        if let Some(top) = self.scene.apply(commands) {
            self.scroll_to(top);
        }
    }

    fn dispatch(&mut self, event: HostEvent) {
        let commands = self.page.dispatch(event);
        self.apply(&commands);
    }

    fn max_scroll(&self) -> f64 {
        self.page.viewport().height * (PAGE_HEIGHT_VIEWPORTS - 1.0)
    }

    fn scroll_to(&mut self, y: f64) {
        let y = y.clamp(0.0, self.max_scroll().max(0.0));
        if y == self.scroll_y {
            return;
        }
        self.scroll_y = y;
        self.scroll_events += 1;
        self.host.set_scroll_y(y);
        self.dispatch(HostEvent::Scroll);
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        let (width, height) = viewport_px(&self.options, cols, rows);
        self.host.resize(width, height);
        self.dispatch(HostEvent::Resize);
        let clamped = self.scroll_y.min(self.max_scroll().max(0.0));
        self.scroll_to(clamped);
    }

    /// Present pending frames and settle simulated image fetches.
    fn tick(&mut self) {
        while let Some(frame) = self.host.next_frame() {
            self.dispatch(frame);
        }
        for src in self.host.take_image_requests() {
            let event = if self.options.offline {
                tracing::info!(%src, "offline: failing QR fetch");
                HostEvent::ImageFailed
            } else {
                tracing::info!(%src, "serving QR fetch");
                HostEvent::ImageLoaded(QR_DIMENSIONS)
            };
            self.dispatch(event);
        }
    }
}

fn viewport_px(options: &Options, cols: u16, rows: u16) -> (f64, f64) {
    let content_rows = rows.saturating_sub(2);
    (
        f64::from(cols) * options.px_per_col,
        f64::from(content_rows) * options.px_per_row,
    )
}

pub fn run_tui(config: PageConfig, options: Options) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let size = terminal.size()?;
    let mut preview = Preview::new(config, options, size.width, size.height);
    tracing::info!(cols = size.width, rows = size.height, "preview started");

    let result = event_loop(&mut terminal, &mut preview);
    terminal.show_cursor()?;
    tracing::info!("preview stopped");
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    preview: &mut Preview,
) -> Result<()> {
    loop {
        preview.tick();
        terminal.draw(|frame| draw(frame, preview))?;

        if !event::poll(TICK)? {
            continue;
        }
        let page_step = preview.page.viewport().height;
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => {
                    preview.scroll_to(preview.scroll_y + LINE_STEP_PX);
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    preview.scroll_to(preview.scroll_y - LINE_STEP_PX);
                }
                KeyCode::PageDown => preview.scroll_to(preview.scroll_y + page_step),
                KeyCode::PageUp => preview.scroll_to(preview.scroll_y - page_step),
                KeyCode::Home => preview.scroll_to(0.0),
                KeyCode::End => preview.scroll_to(preview.max_scroll()),
                KeyCode::Enter | KeyCode::Char(' ') => {
                    let commands = preview.page.scroll_hint_clicked();
                    preview.apply(&commands);
                }
                KeyCode::Char('c') => {
                    let commands = preview.page.toggle_contact();
                    preview.apply(&commands);
                }
                KeyCode::Char('r') => {
                    let commands = preview.page.retry_qr();
                    preview.apply(&commands);
                }
                _ => {}
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => preview.scroll_to(preview.scroll_y + LINE_STEP_PX),
                MouseEventKind::ScrollUp => preview.scroll_to(preview.scroll_y - LINE_STEP_PX),
                _ => {}
            },
            Event::Resize(cols, rows) => preview.resize(cols, rows),
            _ => {}
        }
    }
}

/// Clip a pixel-space box centered at (`cx`, `cy`) to terminal cells inside
/// `area`.
fn cell_rect(area: Rect, options: &Options, cx: f64, cy: f64, w: f64, h: f64) -> Option<Rect> {
    let left = ((cx - w / 2.0) / options.px_per_col).round() as i32 + i32::from(area.x);
    let top = ((cy - h / 2.0) / options.px_per_row).round() as i32 + i32::from(area.y);
    let width = (w / options.px_per_col).round().max(2.0) as i32;
    let height = (h / options.px_per_row).round().max(2.0) as i32;

    let x0 = left.max(i32::from(area.x));
    let y0 = top.max(i32::from(area.y));
    let x1 = (left + width).min(i32::from(area.x) + i32::from(area.width));
    let y1 = (top + height).min(i32::from(area.y) + i32::from(area.height));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Rect::new(
        u16::try_from(x0).ok()?,
        u16::try_from(y0).ok()?,
        u16::try_from(x1 - x0).ok()?,
        u16::try_from(y1 - y0).ok()?,
    ))
}

fn draw(frame: &mut Frame, preview: &Preview) {
    let area = frame.area();
    let page = &preview.page;
    let scene = &preview.scene;
    let options = &preview.options;
    let config = page.config();
    let viewport = page.viewport();
    let scroll_y = page.scroll().scroll_y;

    // Sticky header
    let header_area = Rect::new(area.x, area.y, area.width, area.height.min(1));
    let title_style = match faded(ThemeToken::Primary50, scene.opacity(ElementId::HeaderTitle)) {
        Some(fg) => Style::default()
            .fg(fg)
            .bg(theme_to_color(ThemeToken::Primary900))
            .add_modifier(Modifier::BOLD),
        None => Style::default().bg(theme_to_color(ThemeToken::Primary900)),
    };
    let title = if scene.opacity(ElementId::HeaderTitle) > 0.05 {
        config.content.title.as_str()
    } else {
        ""
    };
    frame.render_widget(
        Paragraph::new(Line::from(title).centered()).style(title_style),
        header_area,
    );

    let content = Rect::new(
        area.x,
        area.y + 1,
        area.width,
        area.height.saturating_sub(2),
    );
    frame.render_widget(
        Block::default().style(Style::default().bg(theme_to_color(ThemeToken::Primary950))),
        content,
    );

    // Hero section scrolls away with the page.
    let hero_px = hero_height(&viewport, &config.fade) - scroll_y;
    if hero_px > 0.0 {
        let rows = ((hero_px / options.px_per_row).ceil() as u16).min(content.height);
        let hero = Rect::new(content.x, content.y, content.width, rows);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme_to_color(ThemeToken::Primary500))),
            hero,
        );
        if let Some(fg) = faded(ThemeToken::Primary50, scene.opacity(ElementId::ScrollHint)) {
            let hint_y = hero_px - 64.0;
            if hint_y > 0.0 {
                let row = content.y + (hint_y / options.px_per_row) as u16;
                if row < content.y + rows {
                    frame.render_widget(
                        Paragraph::new(Line::from("\u{25bc}\u{25bc}").centered())
                            .style(Style::default().fg(fg)),
                        Rect::new(content.x, row, content.width, 1),
                    );
                }
            }
        }
    }

    // Floating avatar
    let t = page.transform();
    let size = AVATAR_PX * t.scale;
    let cx = viewport.width / 2.0 + t.translate_x;
    let cy = viewport.height / 2.0 + t.translate_y;
    if let Some(rect) = cell_rect(content, options, cx, cy, size, size) {
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(Line::from("avatar").centered()).block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme_to_color(ThemeToken::Primary300))),
            ),
            rect,
        );
    }

    // Live numbers
    let tracker = page.scroll_tracker();
    let stats = vec![
        Line::from(format!("viewport   {:.0} x {:.0} px", viewport.width, viewport.height)),
        Line::from(format!("scroll_y   {scroll_y:.0} px")),
        Line::from(format!("scale      {:.3}", t.scale)),
        Line::from(format!("translate  ({:.1}, {:.1})", t.translate_x, t.translate_y)),
        Line::from(format!(
            "events     {} scroll / {} frames / {} coalesced",
            preview.scroll_events,
            tracker.updates(),
            tracker.coalesced()
        )),
        Line::from(format!("contact    {}", describe_qr(page, scene))),
    ];
    let stats_height = (stats.len() as u16 + 2).min(content.height);
    let stats_width = content.width.min(52);
    let stats_area = Rect::new(
        content.x + content.width - stats_width,
        content.y + content.height - stats_height,
        stats_width,
        stats_height,
    );
    frame.render_widget(Clear, stats_area);
    frame.render_widget(
        Paragraph::new(stats).block(Block::bordered().title(" transform ")),
        stats_area,
    );

    if scene.is_visible(ElementId::ContactCard) {
        let qr_line = if scene.is_visible(ElementId::QrCode) {
            "[QR code]"
        } else if scene.is_visible(ElementId::QrRetry) {
            "load failed, press r"
        } else {
            "loading..."
        };
        let card_width = content.width.min(28);
        let card_height = content.height.min(4);
        let card = Rect::new(
            content.x,
            content.y + content.height - card_height,
            card_width,
            card_height,
        );
        frame.render_widget(Clear, card);
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(config.content.contact_phone.as_str()),
                Line::from(qr_line),
            ])
            .block(Block::bordered().title(" contact ")),
            card,
        );
    }

    // Footer help
    let footer = Rect::new(area.x, area.y + area.height.saturating_sub(1), area.width, 1);
    frame.render_widget(
        Paragraph::new(" \u{2191}\u{2193}/wheel scroll | PgUp/PgDn | Enter hint | c contact | r retry | q quit ")
            .style(Style::default().fg(Color::White).bg(Color::DarkGray)),
        footer,
    );
}

fn describe_qr(page: &Page<SimulatedHost>, scene: &Scene) -> String {
    let shown = if page.contact_visible() {
        "shown"
    } else {
        "hidden"
    };
    match page.qr_state() {
        QrState::Idle => format!("{shown}, not requested"),
        QrState::Loading { attempt } => format!("{shown}, loading (attempt {attempt})"),
        QrState::Loaded(d) => format!(
            "{shown}, loaded {}x{} ({})",
            d.width,
            d.height,
            scene.card_width.as_deref().unwrap_or("auto")
        ),
        QrState::Failed { attempts } => format!("{shown}, failed x{attempts}, press r"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Options {
        Options {
            px_per_col: 8.0,
            px_per_row: 16.0,
            offline: false,
        }
    }

    #[test]
    fn centered_box_maps_to_cells() {
        let area = Rect::new(0, 1, 100, 40);
        let rect = cell_rect(area, &options(), 400.0, 320.0, 256.0, 256.0);
        assert_eq!(rect, Some(Rect::new(34, 13, 32, 16)));
    }

    #[test]
    fn box_outside_area_is_dropped() {
        let area = Rect::new(0, 1, 100, 40);
        assert_eq!(cell_rect(area, &options(), -500.0, 320.0, 64.0, 64.0), None);
    }

    #[test]
    fn box_is_clipped_at_edges() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = cell_rect(area, &options(), 0.0, 0.0, 160.0, 160.0);
        assert_eq!(rect, Some(Rect::new(0, 0, 10, 5)));
    }

    #[test]
    fn viewport_excludes_header_and_footer_rows() {
        assert_eq!(viewport_px(&options(), 100, 42), (800.0, 640.0));
    }

    #[test]
    fn offline_preview_ends_in_failed_state() {
        let mut preview = Preview::new(
            PageConfig::default(),
            Options {
                offline: true,
                ..options()
            },
            100,
            42,
        );
        let commands = preview.page.toggle_contact();
        preview.apply(&commands);
        preview.tick();
        assert_eq!(preview.page.qr_state(), QrState::Failed { attempts: 1 });
        assert_eq!(
            describe_qr(&preview.page, &preview.scene),
            "shown, failed x1, press r"
        );
    }

    #[test]
    fn scrolling_is_presented_on_tick() {
        let mut preview = Preview::new(PageConfig::default(), options(), 100, 42);
        preview.scroll_to(60.0);
        preview.scroll_to(120.0);
        assert_eq!(preview.page.scroll().scroll_y, 0.0);
        preview.tick();
        assert_eq!(preview.page.scroll().scroll_y, 120.0);
        assert_eq!(preview.page.scroll_tracker().updates(), 1);
        assert!(preview.scene.avatar_transform.contains("translateY(-120px)"));
    }
}
