//! Rendering layer: all terminal output lives here.
//!
//! The game draws onto a 1600×900 logical screen. `Screen` scales each draw
//! request onto the terminal grid, stamps glyph art in place of the sprite
//! sheets, and writes the whole grid out on `present`.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use kuinvaders::driver::{Sheet, SpriteRect};
use kuinvaders::entities::{BREACH_LINE, SCREEN_HEIGHT, SCREEN_WIDTH};
use kuinvaders::render::Sprite;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_BREACH: Color = Color::DarkRed;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BEAM_PLAYER: Color = Color::Cyan;
const C_BEAM_ENEMY: Color = Color::Magenta;
const C_TITLE: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

// ── Glyph art ─────────────────────────────────────────────────────────────────

// Spaces are transparent.
const PLAYER_ART: [&[&str]; 3] = [
    &[" ▲ ", "/█\\", " ' "],
    &[" ▲ ", "/█\\", " \" "],
    &[" ▲ ", "/█\\", " ^ "],
];
const ENEMY_ART: [&[&str]; 3] = [
    &["«▼»", "╚═╝"],
    &["«▽»", "╚═╝"],
    &["«▼»", "╝═╚"],
];
const BEAM_ART: &[&str] = &["║"];
const ENEMY_BEAM_ART: &[&str] = &["↓"];
const TITLE_ART: &[&str] = &[
    "╦╔═ ╦ ╦ ╦ ╔╗╔ ╦  ╦ ╔═╗ ╔╦╗ ╔═╗ ╦═╗ ╔═╗",
    "╠╩╗ ║ ║ ║ ║║║ ╚╗╔╝ ╠═╣  ║║ ║╣  ╠╦╝ ╚═╗",
    "╩ ╩ ╚═╝ ╩ ╝╚╝  ╚╝  ╩ ╩ ═╩╝ ╚═╝ ╩╚═ ╚═╝",
];

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    color: Color,
}

const BLANK: Cell = Cell { ch: ' ', color: Color::Reset };

/// Off-screen character grid the frame is composed on.
pub struct Screen {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    fire_label: char,
}

impl Screen {
    pub fn new(width: u16, height: u16, fire_key: char) -> Self {
        Self {
            width,
            height,
            cells: vec![BLANK; width as usize * height as usize],
            fire_label: fire_key.to_ascii_uppercase(),
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        if (width, height) != (self.width, self.height) {
            *self = Screen::new(width, height, self.fire_label);
        }
    }

    // ── Coordinate mapping ────────────────────────────────────────────────────

    fn col(&self, x: f32) -> i32 {
        (x.round() * self.width as f32 / SCREEN_WIDTH).round() as i32
    }

    fn row(&self, y: f32) -> i32 {
        (y.round() * self.height as f32 / SCREEN_HEIGHT).round() as i32
    }

    fn put(&mut self, col: i32, row: i32, ch: char, color: Color) {
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return;
        }
        self.cells[row as usize * self.width as usize + col as usize] = Cell { ch, color };
    }

    fn put_str(&mut self, col: i32, row: i32, text: &str, color: Color) {
        for (i, ch) in text.chars().enumerate() {
            if ch != ' ' {
                self.put(col + i as i32, row, ch, color);
            }
        }
    }

    /// Stamp `art` centred on the logical point (`cx`, `cy`).
    fn stamp(&mut self, cx: f32, cy: f32, art: &[&str], color: Color) {
        let col = self.col(cx);
        let row = self.row(cy);
        let top = row - art.len() as i32 / 2;
        for (i, line) in art.iter().enumerate() {
            let left = col - line.chars().count() as i32 / 2;
            self.put_str(left, top + i as i32, line, color);
        }
    }

    fn centered(&mut self, row: i32, text: &str, color: Color) {
        let left = (self.width as i32 - text.chars().count() as i32) / 2;
        self.put_str(left, row, text, color);
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    /// Draw one sprite-sheet region. Regions the atlas does not know are skipped.
    pub fn draw(&mut self, sheet: Sheet, dst_x: f32, dst_y: f32, src: SpriteRect) {
        let Some(sprite) = Sprite::identify(sheet, src) else {
            log::warn!("unknown sprite region {:?} on {:?}", src, sheet);
            return;
        };
        let cx = dst_x + src.w / 2.0;
        let cy = dst_y + src.h / 2.0;
        match sprite {
            Sprite::Background => self.draw_background(),
            Sprite::Title => self.draw_title(),
            Sprite::Player(anim) => {
                self.stamp(cx, cy, PLAYER_ART[anim as usize % 3], C_PLAYER)
            }
            Sprite::Enemy(anim) => self.stamp(cx, cy, ENEMY_ART[anim as usize % 3], C_ENEMY),
            Sprite::Beam => self.stamp(cx, cy, BEAM_ART, C_BEAM_PLAYER),
            Sprite::EnemyBeam => self.stamp(cx, cy, ENEMY_BEAM_ART, C_BEAM_ENEMY),
        }
    }

    /// Full-screen layer: wipes the grid, then border, breach line and hint.
    fn draw_background(&mut self) {
        self.cells.fill(BLANK);
        let w = self.width as i32;
        let h = self.height as i32;

        self.put_str(0, 0, &format!("┌{}┐", "─".repeat((w - 2).max(0) as usize)), C_BORDER);
        self.put_str(0, h - 2, &format!("└{}┘", "─".repeat((w - 2).max(0) as usize)), C_BORDER);
        for row in 1..h - 2 {
            self.put(0, row, '│', C_BORDER);
            self.put(w - 1, row, '│', C_BORDER);
        }

        let breach = self.row(BREACH_LINE);
        for col in 1..w - 1 {
            self.put(col, breach, '┄', C_BREACH);
        }

        let hint = format!(
            "← → ↑ ↓ : Move   {} / SPACE : Shoot / Continue   Q : Quit",
            self.fire_label
        );
        self.put_str(1, h - 1, &hint, C_HINT);
    }

    fn draw_title(&mut self) {
        self.cells.fill(BLANK);
        let mid = self.height as i32 / 2;
        let top = mid - TITLE_ART.len() as i32 - 1;
        for (i, line) in TITLE_ART.iter().enumerate() {
            self.centered(top + i as i32, line, C_TITLE);
        }
        let prompt = format!("Hold {} or SPACE to start", self.fire_label);
        self.centered(mid + 1, &prompt, Color::White);
        self.centered(mid + 3, "Q : Quit", C_HINT);
    }

    // ── Output ────────────────────────────────────────────────────────────────

    /// Write the composed grid to the terminal and flush.
    pub fn present<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let width = self.width as usize;
        for (row, line) in self.cells.chunks(width.max(1)).enumerate() {
            out.queue(cursor::MoveTo(0, row as u16))?;
            let mut color = None;
            let mut run = String::with_capacity(width);
            for cell in line {
                if color != Some(cell.color) && cell.ch != ' ' {
                    if let Some(c) = color {
                        out.queue(style::SetForegroundColor(c))?;
                        out.queue(Print(&run))?;
                        run.clear();
                    }
                    color = Some(cell.color);
                }
                run.push(cell.ch);
            }
            out.queue(style::SetForegroundColor(color.unwrap_or(Color::Reset)))?;
            out.queue(Print(&run))?;
        }
        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, self.height.saturating_sub(1)))?;
        out.flush()
    }

    /// Blank the real terminal, e.g. after a resize.
    pub fn clear<W: Write>(out: &mut W) -> std::io::Result<()> {
        out.queue(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }
}
