//! Contracts for the collaborators the simulation core talks to.
//!
//! The core never opens a window, loads an image or reads a keyboard. It asks
//! an [`Input`] which keys are held, hands draw requests to a [`Canvas`], and
//! calls [`FrameDriver::tick`] once at the top of every loop iteration.

use std::io;

use crate::entities::FrameInput;

/// Keys the game understands, independent of the physical binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    Left,
    Right,
    Up,
    Down,
    Fire,
}

/// Sprite sheets the draw side refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sheet {
    /// Title screen image.
    Title,
    /// Background and UI sheet.
    Back,
    /// Player, enemy and beam sprites.
    Game,
}

/// Source rectangle on a sprite sheet, in sheet pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl SpriteRect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

pub trait Input {
    fn is_held(&self, key: LogicalKey) -> bool;

    /// Sample all five logical keys at once.
    fn sample(&self) -> FrameInput {
        FrameInput {
            left: self.is_held(LogicalKey::Left),
            right: self.is_held(LogicalKey::Right),
            up: self.is_held(LogicalKey::Up),
            down: self.is_held(LogicalKey::Down),
            fire: self.is_held(LogicalKey::Fire),
        }
    }
}

pub trait Canvas {
    /// Draw `src` from `sheet` with its top-left corner at (`dst_x`, `dst_y`).
    /// Implementations round coordinates to the nearest pixel.
    fn draw_sprite(&mut self, sheet: Sheet, dst_x: f32, dst_y: f32, src: SpriteRect);
}

pub trait FrameDriver: Input + Canvas {
    /// Present the frame drawn since the last tick, wait for the next
    /// refresh, and drain pending input events.
    ///
    /// Returns `true` once a close has been requested.
    fn tick(&mut self) -> io::Result<bool>;
}
