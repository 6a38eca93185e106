/// Terminal renderer.  All terminal output for a frame goes through here.
///
/// Each function receives a mutable writer and an immutable view of the
/// driver.  No game logic is performed; this module only translates the
/// wave's drawables into terminal commands.  Arena y grows upward, terminal
/// rows grow downward, so every position goes through `Viewport`.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use alien_invaders::driver::{Banner, Driver};
use alien_invaders::entities::{AlienVariant, Bounds};
use alien_invaders::wave::{Drawable, Sprite};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_SCORE_MID: Color = Color::Red;
const C_HUD_SCORE_HIGH: Color = Color::Green;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_BEST: Color = Color::DarkYellow;
const C_SHIP: Color = Color::White;
const C_ALIENS: [Color; 3] = [Color::Green, Color::Cyan, Color::Magenta];
const C_BOLT_PLAYER: Color = Color::Cyan;
const C_BOLT_ENEMY: Color = Color::Magenta;
const C_DEFENSE_LINE: Color = Color::DarkRed;
const C_HINT: Color = Color::DarkGrey;

const ALIEN_SPRITES: [&str; 3] = ["<▼>", "(◉)", "/o\\"];

/// Maps arena coordinates onto the terminal cells inside the border.
struct Viewport {
    arena_width: f32,
    arena_height: f32,
    /// Terminal size.
    cols: u16,
    rows: u16,
}

impl Viewport {
    // Play area: columns 1..cols-1, rows 2..rows-2 (row 0 is the HUD,
    // row 1 and rows-2 are the border, rows-1 is the hint line).
    fn inner_cols(&self) -> f32 {
        self.cols.saturating_sub(2).max(1) as f32
    }

    fn inner_rows(&self) -> f32 {
        self.rows.saturating_sub(4).max(1) as f32
    }

    fn col(&self, x: f32) -> u16 {
        let cell = (x / self.arena_width * self.inner_cols()).floor();
        1 + cell.clamp(0.0, self.inner_cols() - 1.0) as u16
    }

    fn row(&self, y: f32) -> u16 {
        let cell = ((self.arena_height - y) / self.arena_height * self.inner_rows()).floor();
        2 + cell.clamp(0.0, self.inner_rows() - 1.0) as u16
    }

    fn visible(&self, bounds: &Bounds) -> bool {
        bounds.y >= 0.0 && bounds.y <= self.arena_height
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, driver: &Driver, cols: u16, rows: u16) -> std::io::Result<()> {
    let config = driver.config();
    let view = Viewport {
        arena_width: config.arena_width,
        arena_height: config.arena_height,
        cols,
        rows,
    };

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &view)?;
    draw_hud(out, driver, &view)?;

    if let Some(wave) = driver.wave() {
        for drawable in wave.drawables() {
            draw_item(out, &drawable, &view)?;
        }
    }

    draw_controls_hint(out, &view)?;

    if let Some(banner) = driver.banner() {
        draw_banner(out, banner, driver, &view)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

/// Score colour by tier: over 500 and over 100 get their own colours.
fn score_color(score: u32) -> Color {
    match score {
        s if s > 500 => C_HUD_SCORE_HIGH,
        s if s > 100 => C_HUD_SCORE_MID,
        _ => C_HUD_SCORE,
    }
}

fn draw_hud<W: Write>(out: &mut W, driver: &Driver, view: &Viewport) -> std::io::Result<()> {
    let (score, lives) = driver
        .wave()
        .map(|wave| (wave.score(), wave.lives()))
        .unwrap_or((0, driver.config().lives));

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(score_color(score)))?;
    out.queue(Print(format!("Score: {:>6}", score)))?;

    let best = format!("Best: {}", driver.best_score());
    let bx = (view.cols / 2).saturating_sub(best.len() as u16 / 2);
    out.queue(cursor::MoveTo(bx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_BEST))?;
    out.queue(Print(&best))?;

    let hearts: String = "♥".repeat(lives as usize);
    let lives_text = format!("Lives: {}", hearts);
    let rx = view.cols.saturating_sub(lives_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_text))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_item<W: Write>(out: &mut W, item: &Drawable, view: &Viewport) -> std::io::Result<()> {
    let b = &item.bounds;
    match item.sprite {
        Sprite::DefenseLine => {
            let row = view.row(b.y);
            out.queue(cursor::MoveTo(1, row))?;
            out.queue(style::SetForegroundColor(C_DEFENSE_LINE))?;
            out.queue(Print("╌".repeat(view.inner_cols() as usize)))?;
        }
        Sprite::Ship => {
            // Sprite (1 row, 3 cols):  /▲\
            let col = view.col(b.x).saturating_sub(1).max(1);
            out.queue(cursor::MoveTo(col, view.row(b.y)))?;
            out.queue(style::SetForegroundColor(C_SHIP))?;
            out.queue(Print("/▲\\"))?;
        }
        Sprite::Alien(AlienVariant(v)) => {
            let i = v as usize % ALIEN_SPRITES.len();
            let col = view.col(b.x).saturating_sub(1).max(1);
            out.queue(cursor::MoveTo(col, view.row(b.y)))?;
            out.queue(style::SetForegroundColor(C_ALIENS[i]))?;
            out.queue(Print(ALIEN_SPRITES[i]))?;
        }
        Sprite::PlayerBolt | Sprite::EnemyBolt => {
            if !view.visible(b) {
                return Ok(());
            }
            let (glyph, color) = if item.sprite == Sprite::PlayerBolt {
                ("║", C_BOLT_PLAYER)
            } else {
                ("↓", C_BOLT_ENEMY)
            };
            out.queue(cursor::MoveTo(view.col(b.x), view.row(b.y)))?;
            out.queue(style::SetForegroundColor(color))?;
            out.queue(Print(glyph))?;
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Fire   S : Start   Q : Quit"))?;
    Ok(())
}

// ── Banner overlay ────────────────────────────────────────────────────────────

fn draw_banner<W: Write>(
    out: &mut W,
    banner: Banner,
    driver: &Driver,
    view: &Viewport,
) -> std::io::Result<()> {
    let score = driver.wave().map(|wave| wave.score()).unwrap_or(0);
    let score_line = format!("Score: {}", score);
    let lines: Vec<(&str, Color)> = match banner {
        Banner::Title => vec![
            ("╔══════════════════════╗", Color::Cyan),
            ("║    ALIEN  INVADERS   ║", Color::Cyan),
            ("╚══════════════════════╝", Color::Cyan),
            ("Press 'S' to Play", Color::White),
        ],
        Banner::Resume => vec![
            ("Ship destroyed!", Color::Red),
            ("Press 'S' to Resume", Color::White),
        ],
        Banner::Won => vec![
            ("╔══════════════════════╗", Color::Green),
            ("║   WAVE  CLEARED!     ║", Color::Green),
            ("╚══════════════════════╝", Color::Green),
            (score_line.as_str(), Color::Yellow),
            ("S - Title   Q - Quit", Color::White),
        ],
        Banner::Lost => vec![
            ("╔══════════════════════╗", Color::Red),
            ("║      GAME  OVER      ║", Color::Red),
            ("╚══════════════════════╝", Color::Red),
            (score_line.as_str(), Color::Yellow),
            ("S - Title   Q - Quit", Color::White),
        ],
    };

    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
