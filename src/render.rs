//! Draw-side sub-steps of a frame.
//!
//! Only reads [`StageState`]; every pixel goes out through [`Canvas`].

use crate::driver::{Canvas, Sheet, SpriteRect};
use crate::entities::{
    Outcome, StageState, BEAM_SIZE, ENEMY_BEAM_HEIGHT, ENEMY_BEAM_WIDTH, ENEMY_HEIGHT,
    ENEMY_WIDTH, PLAYER_HEIGHT, PLAYER_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH,
};

// ── Sprite atlas ──────────────────────────────────────────────────────────────

/// Every region the game draws, with its animation sub-frame where it has one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sprite {
    Title,
    Background,
    Player(u32),
    Enemy(u32),
    Beam,
    EnemyBeam,
}

const BEAM_COLUMN_X: f32 = 420.0;

impl Sprite {
    pub fn sheet(self) -> Sheet {
        match self {
            Sprite::Title => Sheet::Title,
            Sprite::Background => Sheet::Back,
            _ => Sheet::Game,
        }
    }

    pub fn rect(self) -> SpriteRect {
        match self {
            Sprite::Title | Sprite::Background => {
                SpriteRect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT)
            }
            Sprite::Player(anim) => {
                SpriteRect::new(anim as f32 * PLAYER_WIDTH, 0.0, PLAYER_WIDTH, PLAYER_HEIGHT)
            }
            Sprite::Enemy(anim) => SpriteRect::new(
                anim as f32 * ENEMY_WIDTH,
                PLAYER_HEIGHT,
                ENEMY_WIDTH,
                ENEMY_HEIGHT,
            ),
            Sprite::Beam => SpriteRect::new(BEAM_COLUMN_X, 0.0, BEAM_SIZE, BEAM_SIZE),
            Sprite::EnemyBeam => {
                SpriteRect::new(BEAM_COLUMN_X, BEAM_SIZE, ENEMY_BEAM_WIDTH, ENEMY_BEAM_HEIGHT)
            }
        }
    }

    /// Reverse lookup from a draw request to the sprite it names.
    pub fn identify(sheet: Sheet, src: SpriteRect) -> Option<Sprite> {
        let candidate = match sheet {
            Sheet::Title => Sprite::Title,
            Sheet::Back => Sprite::Background,
            Sheet::Game if src.x >= BEAM_COLUMN_X && src.y < BEAM_SIZE => Sprite::Beam,
            Sheet::Game if src.x >= BEAM_COLUMN_X => Sprite::EnemyBeam,
            Sheet::Game if src.y >= PLAYER_HEIGHT => {
                Sprite::Enemy((src.x / ENEMY_WIDTH).round() as u32)
            }
            Sheet::Game => Sprite::Player((src.x / PLAYER_WIDTH).round() as u32),
        };
        (candidate.rect() == src).then_some(candidate)
    }
}

fn draw<C: Canvas + ?Sized>(canvas: &mut C, sprite: Sprite, dst_x: f32, dst_y: f32) {
    canvas.draw_sprite(sprite.sheet(), dst_x, dst_y, sprite.rect());
}

// ── Frame layers ──────────────────────────────────────────────────────────────

pub fn draw_title<C: Canvas + ?Sized>(canvas: &mut C) {
    draw(canvas, Sprite::Title, 0.0, 0.0);
}

pub fn draw_background<C: Canvas + ?Sized>(canvas: &mut C) {
    draw(canvas, Sprite::Background, 0.0, 0.0);
}

/// The ship disappears once it has been destroyed.
pub fn draw_player<C: Canvas + ?Sized>(state: &StageState, canvas: &mut C) {
    if state.outcome == Outcome::Dead {
        return;
    }
    let p = &state.player;
    draw(
        canvas,
        Sprite::Player(state.anim_frame()),
        p.x - PLAYER_WIDTH / 2.0,
        p.y - PLAYER_HEIGHT / 2.0,
    );
}

pub fn draw_enemies<C: Canvas + ?Sized>(state: &StageState, canvas: &mut C) {
    let sprite = Sprite::Enemy(state.anim_frame());
    for (row, col) in state.formation.live_cells() {
        let (x, y) = state.formation.cell_position(row, col);
        draw(canvas, sprite, x - ENEMY_WIDTH / 2.0, y - ENEMY_HEIGHT / 2.0);
    }
}

pub fn draw_beams<C: Canvas + ?Sized>(state: &StageState, canvas: &mut C) {
    for beam in &state.beams {
        draw(canvas, Sprite::Beam, beam.x - BEAM_SIZE / 2.0, beam.y - BEAM_SIZE / 2.0);
    }
}

pub fn draw_enemy_beams<C: Canvas + ?Sized>(state: &StageState, canvas: &mut C) {
    for beam in &state.enemy_beams {
        draw(
            canvas,
            Sprite::EnemyBeam,
            beam.x - ENEMY_BEAM_WIDTH / 2.0,
            beam.y - ENEMY_BEAM_HEIGHT / 2.0,
        );
    }
}
