//! Terminal renderer
//!
//! Paints a [`HomeView`] with crossterm: status bar on top, the game row
//! scrolled to the session's target, the dock near the bottom, and the help,
//! banner and modal overlays. Layout units from the tile geometry map to
//! terminal columns at [`UNITS_PER_COLUMN`].

use crate::error::{Error, Result};
use crate::input::PointerTarget;
use crate::navigation::Section;
use crate::session::HomeView;
use crate::viewport::TileGeometry;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use std::io::{self, Write};

/// Layout units per terminal column
pub const UNITS_PER_COLUMN: f64 = 8.0;

const TILES_TOP: u16 = 2;
const TILE_HEIGHT: u16 = 7;
const ICON_WIDTH: u16 = 13;
const ICON_GAP: u16 = 1;

const EXIT_LABEL: &str = "[ Exit ]";

const HELP_TEXT: &str =
    "Press any key to start   \u{2190}/\u{2192} move   \u{2191}/\u{2193} switch row   Enter launch   Ctrl+C quit";

/// Paints views and answers pointer hit tests
pub trait Renderer {
    fn render(&mut self, view: &HomeView) -> Result<()>;

    fn hit_test(&self, column: u16, row: u16) -> Option<PointerTarget>;

    /// Visible width in layout units
    fn viewport_width(&self) -> f64;

    fn resize(&mut self, width: u16, height: u16);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    Plain,
    Dim,
    Focus,
    Accent,
    Banner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    style: CellStyle,
}

/// Character grid composed before painting
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![
                Cell {
                    ch: ' ',
                    style: CellStyle::Plain,
                };
                usize::from(width) * usize::from(height)
            ],
        }
    }

    fn set(&mut self, x: i32, y: i32, ch: char, style: CellStyle) {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return;
        }
        let index = y as usize * usize::from(self.width) + x as usize;
        self.cells[index] = Cell { ch, style };
    }

    pub fn put_str(&mut self, x: i32, y: u16, text: &str, style: CellStyle) {
        for (offset, ch) in text.chars().enumerate() {
            self.set(x + offset as i32, i32::from(y), ch, style);
        }
    }

    pub fn put_centered(&mut self, y: u16, text: &str, style: CellStyle) {
        let len = text.chars().count() as i32;
        let x = (i32::from(self.width) - len) / 2;
        self.put_str(x.max(0), y, text, style);
    }

    pub fn draw_box(&mut self, x: i32, y: u16, width: u16, height: u16, style: CellStyle) {
        if width < 2 || height < 2 {
            return;
        }
        let (w, h) = (i32::from(width), i32::from(height));
        let y = i32::from(y);
        for dx in 1..w - 1 {
            self.set(x + dx, y, '\u{2500}', style);
            self.set(x + dx, y + h - 1, '\u{2500}', style);
        }
        for dy in 1..h - 1 {
            self.set(x, y + dy, '\u{2502}', style);
            self.set(x + w - 1, y + dy, '\u{2502}', style);
        }
        self.set(x, y, '\u{250c}', style);
        self.set(x + w - 1, y, '\u{2510}', style);
        self.set(x, y + h - 1, '\u{2514}', style);
        self.set(x + w - 1, y + h - 1, '\u{2518}', style);
    }

    /// Text of one row with trailing spaces removed
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = usize::from(y) * usize::from(self.width);
        let row: String = self.cells[start..start + usize::from(self.width)]
            .iter()
            .map(|cell| cell.ch)
            .collect();
        row.trim_end().to_string()
    }

    pub fn style_at(&self, x: u16, y: u16) -> Option<CellStyle> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)].style)
    }
}

/// One dock button on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSlot {
    pub index: usize,
    pub x: u16,
    pub y: u16,
    pub width: u16,
}

/// Clickable single-row region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Hitbox {
    x: u16,
    y: u16,
    width: u16,
}

impl Hitbox {
    fn contains(&self, column: u16, row: u16) -> bool {
        self.y == row && column >= self.x && column < self.x.saturating_add(self.width)
    }
}

fn dock_row(height: u16) -> u16 {
    height.saturating_sub(4).max(TILES_TOP + TILE_HEIGHT + 3)
}

/// Dock button positions, centred horizontally
pub fn dock_slots(width: u16, height: u16, icon_count: usize) -> Vec<IconSlot> {
    let count = u16::try_from(icon_count).unwrap_or(u16::MAX);
    let total = count
        .saturating_mul(ICON_WIDTH + ICON_GAP)
        .saturating_sub(ICON_GAP);
    let start = width.saturating_sub(total) / 2;
    let y = dock_row(height);
    (0..icon_count)
        .map(|index| IconSlot {
            index,
            x: start.saturating_add((index as u16).saturating_mul(ICON_WIDTH + ICON_GAP)),
            y,
            width: ICON_WIDTH,
        })
        .collect()
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max.saturating_sub(1)).collect();
    short.push('\u{2026}');
    short
}

/// crossterm renderer writing to any `Write`
pub struct TerminalRenderer<W: Write> {
    out: W,
    geometry: TileGeometry,
    width: u16,
    height: u16,
    dock: Vec<IconSlot>,
    exit_button: Option<Hitbox>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, geometry: TileGeometry, width: u16, height: u16) -> Self {
        Self {
            out,
            geometry,
            width,
            height,
            dock: Vec::new(),
            exit_button: None,
        }
    }

    /// Lay out `view` without painting it
    pub fn compose(&mut self, view: &HomeView) -> Canvas {
        let mut canvas = Canvas::new(self.width, self.height);
        let nav = view.navigation;

        canvas.put_str(1, 0, &view.status.clock, CellStyle::Plain);
        let battery = format!("{}%", view.status.battery_percent);
        let battery_x = i32::from(self.width) - battery.len() as i32 - 1;
        canvas.put_str(battery_x, 0, &battery, CellStyle::Plain);

        let tile_cols = (self.geometry.tile_width / UNITS_PER_COLUMN).round() as u16;
        let pitch = self.geometry.tile_width + self.geometry.tile_gap;
        for (index, game) in view.catalog.games().iter().enumerate() {
            let left_units = index as f64 * pitch - view.scroll_target;
            let x = (left_units / UNITS_PER_COLUMN).round() as i32;
            let selected = index == nav.selected_game_index;
            let style = match (selected, nav.focused_section) {
                (true, Section::Games) => CellStyle::Focus,
                (true, Section::Icons) => CellStyle::Plain,
                _ => CellStyle::Dim,
            };
            canvas.draw_box(x, TILES_TOP, tile_cols, TILE_HEIGHT, style);
            let label = truncate(&game.name, usize::from(tile_cols.saturating_sub(4)));
            canvas.put_str(x + 2, TILES_TOP + TILE_HEIGHT / 2, &label, style);
        }

        if let Some(game) = view.catalog.game(nav.selected_game_index) {
            canvas.put_centered(TILES_TOP + TILE_HEIGHT + 1, &game.name, CellStyle::Plain);
        }

        self.dock = dock_slots(self.width, self.height, view.catalog.icon_count());
        for slot in &self.dock {
            let Some(icon) = view.catalog.icon(slot.index) else {
                continue;
            };
            let focused = nav.focused_section == Section::Icons && nav.selected_icon_index == slot.index;
            let style = if focused {
                CellStyle::Focus
            } else if icon.accent.as_deref() == Some("red") {
                CellStyle::Accent
            } else {
                CellStyle::Dim
            };
            let label = truncate(&icon.label, usize::from(slot.width.saturating_sub(2)));
            let text = format!("[{:^width$}]", label, width = usize::from(slot.width - 2));
            canvas.put_str(i32::from(slot.x), slot.y, &text, style);
        }

        if let Some(index) = view.launching_game {
            if let Some(game) = view.catalog.game(index) {
                let text = format!(" Launching {}... ", game.name);
                canvas.put_centered(self.height / 2, &text, CellStyle::Banner);
            }
        }

        self.exit_button = None;
        if view.embedded_game_open {
            let width = self.width.saturating_sub(8).min(60);
            let height = self.height.saturating_sub(4).min(16);
            let x = i32::from((self.width - width) / 2);
            let y = (self.height - height) / 2;
            canvas.draw_box(x, y, width, height, CellStyle::Focus);
            canvas.put_centered(y + 1, "Embedded game", CellStyle::Focus);
            if let Some(status) = &view.game_status {
                canvas.put_centered(y + height.saturating_sub(2), status, CellStyle::Plain);
            }
            let exit = Hitbox {
                x: self.width.saturating_sub(EXIT_LABEL.len() as u16) / 2,
                y: y + height.saturating_sub(3),
                width: EXIT_LABEL.len() as u16,
            };
            canvas.put_str(i32::from(exit.x), exit.y, EXIT_LABEL, CellStyle::Accent);
            self.exit_button = Some(exit);
        }

        if view.help_visible {
            canvas.put_centered(self.height.saturating_sub(1), HELP_TEXT, CellStyle::Dim);
        }

        canvas
    }

    fn paint(&mut self, canvas: &Canvas) -> io::Result<()> {
        queue!(self.out, MoveTo(0, 0), Clear(ClearType::All))?;
        for y in 0..canvas.height {
            queue!(self.out, MoveTo(0, y))?;
            let mut style = None;
            let start = usize::from(y) * usize::from(canvas.width);
            for cell in &canvas.cells[start..start + usize::from(canvas.width)] {
                if style != Some(cell.style) {
                    queue_style(&mut self.out, cell.style)?;
                    style = Some(cell.style);
                }
                queue!(self.out, Print(cell.ch))?;
            }
        }
        queue!(self.out, SetAttribute(Attribute::Reset))?;
        self.out.flush()
    }
}

fn queue_style<W: Write>(out: &mut W, style: CellStyle) -> io::Result<()> {
    queue!(out, SetAttribute(Attribute::Reset))?;
    match style {
        CellStyle::Plain => queue!(out, SetForegroundColor(Color::Reset)),
        CellStyle::Dim => queue!(out, SetForegroundColor(Color::DarkGrey)),
        CellStyle::Focus => queue!(
            out,
            SetForegroundColor(Color::Cyan),
            SetAttribute(Attribute::Bold)
        ),
        CellStyle::Accent => queue!(out, SetForegroundColor(Color::Red)),
        CellStyle::Banner => queue!(
            out,
            SetForegroundColor(Color::White),
            SetAttribute(Attribute::Reverse)
        ),
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, view: &HomeView) -> Result<()> {
        let canvas = self.compose(view);
        self.paint(&canvas)
            .map_err(|e| Error::Terminal(format!("render frame: {}", e)))
    }

    fn hit_test(&self, column: u16, row: u16) -> Option<PointerTarget> {
        // The modal covers the dock; only its exit button is live
        if let Some(exit) = self.exit_button {
            return exit.contains(column, row).then_some(PointerTarget::ExitGame);
        }
        self.dock
            .iter()
            .find(|slot| slot.y == row && column >= slot.x && column < slot.x + slot.width)
            .map(|slot| PointerTarget::Icon(slot.index))
    }

    fn viewport_width(&self) -> f64 {
        f64::from(self.width) * UNITS_PER_COLUMN
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }
}

/// Raw mode, alternate screen and mouse capture for the lifetime of the value
pub struct TerminalGuard {
    stdout: io::Stdout,
}

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode().map_err(|e| Error::Terminal(format!("enable raw mode: {}", e)))?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            Hide,
            Clear(ClearType::All),
            MoveTo(0, 0)
        )
        .map_err(|e| Error::Terminal(format!("enter alternate screen: {}", e)))?;
        Ok(Self { stdout })
    }

    pub fn size() -> Result<(u16, u16)> {
        terminal::size().map_err(|e| Error::Terminal(format!("read terminal size: {}", e)))
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            self.stdout,
            SetAttribute(Attribute::Reset),
            DisableMouseCapture,
            LeaveAlternateScreen,
            Show,
            MoveTo(0, 0)
        );
        let _ = terminal::disable_raw_mode();
    }
}
