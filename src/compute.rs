//! Per-frame stage simulation.
//!
//! Each sub-step takes the [`StageState`] by mutable reference and advances
//! one concern by exactly one frame. [`step_frame`] runs them in the fixed
//! order the game depends on: later steps read what earlier ones wrote
//! (alive-bounds renewal, for instance, must see this frame's kills).
//! All randomness comes through the injected `rng`.

use log::{debug, info};
use rand::Rng;

use crate::driver::Canvas;
use crate::entities::{
    Beam, Formation, FrameInput, Outcome, Player, StageState, BEAM_HIT_DISTANCE, BEAM_SPEED,
    BEAM_TOP_LIMIT, BREACH_LINE, CELL_SPACING_X, DESCENT_DEPTH, DESCENT_STEP,
    ENEMY_BEAM_BOTTOM_LIMIT, ENEMY_BEAM_HIT_DISTANCE, ENEMY_BEAM_SPEED, ENEMY_COLUMNS, ENEMY_ROWS,
    FIRE_RATE_STAGE_CAP, FORMATION_LEFT_EDGE, FORMATION_RIGHT_EDGE, PLAYER_HEIGHT, PLAYER_MAX_X,
    PLAYER_MAX_Y, PLAYER_MIN_X, PLAYER_MIN_Y, PLAYER_STEP,
};
use crate::render;

/// What the stage loop should do after a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameSignal {
    Continue,
    /// Fire pressed after a clear.
    NextStage,
    /// Fire pressed after death.
    ReturnToTitle,
}

fn distance(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    ((ax - bx) * (ax - bx) + (ay - by) * (ay - by)).sqrt()
}

// ── Player ────────────────────────────────────────────────────────────────────

/// Diagonals apply both deltas unnormalised, so they cover more ground.
pub fn move_player(player: &mut Player, input: &FrameInput) {
    if input.left {
        player.x -= PLAYER_STEP;
    }
    if input.right {
        player.x += PLAYER_STEP;
    }
    if input.up {
        player.y -= PLAYER_STEP;
    }
    if input.down {
        player.y += PLAYER_STEP;
    }
    player.x = player.x.clamp(PLAYER_MIN_X, PLAYER_MAX_X);
    player.y = player.y.clamp(PLAYER_MIN_Y, PLAYER_MAX_Y);
}

/// Act on a fire press edge. Holding the key does nothing after the first frame.
pub fn interpret_fire(state: &mut StageState, input: &FrameInput) -> FrameSignal {
    if input.fire && !state.prev_fire {
        match state.outcome {
            Outcome::Cleared => return FrameSignal::NextStage,
            Outcome::Dead => return FrameSignal::ReturnToTitle,
            Outcome::Playing => state.beams.push(Beam {
                x: state.player.x,
                y: state.player.y - PLAYER_HEIGHT / 2.0,
            }),
        }
    }
    state.prev_fire = input.fire;
    FrameSignal::Continue
}

// ── Formation motion ──────────────────────────────────────────────────────────

/// Sweep speed after bouncing off an edge. Fewer survivors move faster.
pub fn rebound_speed(stage: u32, remaining: u32) -> f32 {
    2.0 + stage as f32 + 30.0 / remaining as f32
}

pub fn move_formation(state: &mut StageState) {
    if state.outcome != Outcome::Playing {
        return;
    }
    let stage = state.stage;
    let f = &mut state.formation;

    match f.descent_target {
        Some(target) => {
            f.y += DESCENT_STEP;
            if f.y >= target {
                f.descent_target = None;
            }
        }
        None => {
            f.x += f.velocity_x;

            let left_edge = FORMATION_LEFT_EDGE - f.left as f32 * CELL_SPACING_X;
            if f.x <= left_edge {
                f.x = left_edge;
                f.velocity_x = rebound_speed(stage, f.remaining);
                f.descent_target = Some(f.y + DESCENT_DEPTH);
                debug!("formation hit left edge, velocity now {}", f.velocity_x);
            }
            let right_edge = FORMATION_RIGHT_EDGE - f.right as f32 * CELL_SPACING_X;
            if f.x >= right_edge {
                f.x = right_edge;
                f.velocity_x = -rebound_speed(stage, f.remaining);
                f.descent_target = Some(f.y + DESCENT_DEPTH);
                debug!("formation hit right edge, velocity now {}", f.velocity_x);
            }
        }
    }

    let bottom_y = f.bottom_y();
    if bottom_y > BREACH_LINE {
        info!("stage {}: formation breached the line at y={}", stage, bottom_y);
        state.outcome = Outcome::Dead;
    }
}

// ── Enemy fire ────────────────────────────────────────────────────────────────

/// Each live cell fires with probability `1 / fire_odds(..)` per frame.
pub fn fire_odds(remaining: u32, stage: u32) -> u32 {
    60 * remaining / stage.clamp(1, FIRE_RATE_STAGE_CAP) + 1
}

pub fn add_enemy_beams<R: Rng + ?Sized>(state: &mut StageState, rng: &mut R) {
    let odds = fire_odds(state.formation.remaining, state.stage);
    for (row, col) in state.formation.live_cells() {
        if rng.gen_ratio(1, odds) {
            let (x, y) = state.formation.cell_position(row, col);
            state.enemy_beams.push(Beam { x, y });
        }
    }
}

// ── Beams & collision ─────────────────────────────────────────────────────────

/// First live cell (row-major scan) within contact distance of (`x`, `y`).
/// Overlapping cells further along the scan are never reported.
pub fn first_hit(formation: &Formation, x: f32, y: f32) -> Option<(usize, usize)> {
    formation.live_cells().find(|&(row, col)| {
        let (cx, cy) = formation.cell_position(row, col);
        distance(cx, cy, x, y) <= BEAM_HIT_DISTANCE
    })
}

fn damage_cell(formation: &mut Formation, row: usize, col: usize) {
    let cell = &mut formation.cells[row][col];
    *cell = cell.saturating_sub(1);
    if *cell == 0 {
        formation.remaining = formation.remaining.saturating_sub(1);
    }
}

/// Advance player beams. A beam that leaves the top is dropped without a
/// collision test; a beam that hits is spent on one cell.
pub fn move_beams(state: &mut StageState) {
    let formation = &mut state.formation;
    state.beams.retain_mut(|beam| {
        beam.y -= BEAM_SPEED;
        if beam.y < BEAM_TOP_LIMIT {
            return false;
        }
        match first_hit(formation, beam.x, beam.y) {
            Some((row, col)) => {
                damage_cell(formation, row, col);
                false
            }
            None => true,
        }
    });
}

/// Advance enemy beams. A hit only counts while playing and does not consume
/// the beam; beams past the bottom go regardless of outcome.
pub fn move_enemy_beams(state: &mut StageState) {
    let player = state.player;
    let stage = state.stage;
    let outcome = &mut state.outcome;
    state.enemy_beams.retain_mut(|beam| {
        beam.y += ENEMY_BEAM_SPEED;
        if *outcome == Outcome::Playing
            && distance(beam.x, beam.y, player.x, player.y) <= ENEMY_BEAM_HIT_DISTANCE
        {
            info!("stage {}: player destroyed", stage);
            *outcome = Outcome::Dead;
        }
        beam.y <= ENEMY_BEAM_BOTTOM_LIMIT
    });
}

// ── Alive bounds ──────────────────────────────────────────────────────────────

fn column_is_empty(formation: &Formation, col: usize) -> bool {
    (0..ENEMY_ROWS).all(|row| !formation.is_alive(row, col))
}

fn row_is_empty(formation: &Formation, row: usize) -> bool {
    (0..ENEMY_COLUMNS).all(|col| !formation.is_alive(row, col))
}

/// Move each edge index inward past empty columns/rows. Edges never move back out.
pub fn renew_bounds(formation: &mut Formation) {
    while formation.left < ENEMY_COLUMNS - 1 && column_is_empty(formation, formation.left) {
        formation.left += 1;
    }
    while formation.right > 0 && column_is_empty(formation, formation.right) {
        formation.right -= 1;
    }
    while formation.bottom > 0 && row_is_empty(formation, formation.bottom) {
        formation.bottom -= 1;
    }
}

/// Clear the stage once nobody is left, otherwise shrink the alive bounds.
/// A clear overrides a death decided earlier in the stage.
pub fn settle_formation(state: &mut StageState) {
    if state.formation.remaining == 0 {
        if state.outcome != Outcome::Cleared {
            info!("stage {} cleared", state.stage);
        }
        state.outcome = Outcome::Cleared;
    } else {
        renew_bounds(&mut state.formation);
    }
}

// ── Frame ─────────────────────────────────────────────────────────────────────

/// Run one frame: input, motion, fire, collision, bounds, in that order,
/// interleaved with the draw calls for each layer.
pub fn step_frame<C, R>(
    state: &mut StageState,
    input: &FrameInput,
    canvas: &mut C,
    rng: &mut R,
) -> FrameSignal
where
    C: Canvas + ?Sized,
    R: Rng + ?Sized,
{
    render::draw_background(canvas);
    move_player(&mut state.player, input);

    match interpret_fire(state, input) {
        FrameSignal::Continue => {}
        signal => return signal,
    }

    render::draw_player(state, canvas);
    move_formation(state);
    add_enemy_beams(state, rng);
    render::draw_enemies(state, canvas);
    move_beams(state);
    render::draw_beams(state, canvas);
    settle_formation(state);
    move_enemy_beams(state);
    render::draw_enemy_beams(state, canvas);

    state.frame += 1;
    FrameSignal::Continue
}
