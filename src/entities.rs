//! Stage entity types. Plain data and constructors; per-frame logic lives in `compute`.
//!
//! Coordinates live on a fixed 1600×900 logical screen with +y pointing down.

// ── Screen & geometry ────────────────────────────────────────────────────────

pub const SCREEN_WIDTH: f32 = 1600.0;
pub const SCREEN_HEIGHT: f32 = 900.0;

pub const ENEMY_ROWS: usize = 5;
pub const ENEMY_COLUMNS: usize = 6;
pub const ENEMY_COUNT: u32 = (ENEMY_ROWS * ENEMY_COLUMNS) as u32;

/// Horizontal / vertical distance between neighbouring formation cells.
pub const CELL_SPACING_X: f32 = 100.0;
pub const CELL_SPACING_Y: f32 = 45.0;

pub const PLAYER_WIDTH: f32 = 140.0;
pub const PLAYER_HEIGHT: f32 = 220.0;
pub const PLAYER_MIN_X: f32 = PLAYER_WIDTH / 2.0;
pub const PLAYER_MAX_X: f32 = SCREEN_WIDTH - PLAYER_WIDTH / 2.0;
pub const PLAYER_MIN_Y: f32 = 700.0;
pub const PLAYER_MAX_Y: f32 = 900.0;
pub const PLAYER_STEP: f32 = 12.0;

pub const ENEMY_WIDTH: f32 = 200.0;
pub const ENEMY_HEIGHT: f32 = 120.0;

pub const BEAM_SIZE: f32 = 90.0;
pub const ENEMY_BEAM_WIDTH: f32 = 70.0;
pub const ENEMY_BEAM_HEIGHT: f32 = 100.0;

pub const BEAM_SPEED: f32 = 20.0;
pub const ENEMY_BEAM_SPEED: f32 = 10.0;

/// Player beams above this line are gone.
pub const BEAM_TOP_LIMIT: f32 = -BEAM_SIZE / 2.0;
/// Enemy beams below this line are gone.
pub const ENEMY_BEAM_BOTTOM_LIMIT: f32 = SCREEN_HEIGHT + ENEMY_BEAM_HEIGHT / 2.0;

/// Player beam ↔ enemy cell contact distance (120/2 + 90/2).
pub const BEAM_HIT_DISTANCE: f32 = 120.0 / 2.0 + BEAM_SIZE / 2.0;
/// Enemy beam ↔ player contact distance (70/2 + 140/2).
pub const ENEMY_BEAM_HIT_DISTANCE: f32 = ENEMY_BEAM_WIDTH / 2.0 + PLAYER_WIDTH / 2.0;

/// A formation row whose derived y passes this line has reached the player.
pub const BREACH_LINE: f32 = 700.0;
pub const DESCENT_STEP: f32 = 8.0;
pub const DESCENT_DEPTH: f32 = 60.0;

/// Leftmost anchor x when column 0 is still alive.
pub const FORMATION_LEFT_EDGE: f32 = ENEMY_WIDTH / 2.0;
/// Rightmost anchor x when column 0 would be the right edge.
pub const FORMATION_RIGHT_EDGE: f32 = SCREEN_WIDTH - ENEMY_WIDTH / 2.0;

/// Stage number past which the enemy-fire rate stops growing.
pub const FIRE_RATE_STAGE_CAP: u32 = 30;

// ── Outcome ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Playing,
    Cleared,
    Dead,
}

// ── Per-frame input ───────────────────────────────────────────────────────────

/// Held state of the five logical keys, sampled once at the start of a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
}

// ── Player & projectiles ──────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self { x: 800.0, y: 800.0 }
    }
}

/// A projectile. Player beams and enemy beams share the shape and live in
/// separate collections on [`StageState`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Beam {
    pub x: f32,
    pub y: f32,
}

// ── Enemy formation ───────────────────────────────────────────────────────────

/// The 5×6 enemy grid and the state it shares: one anchor, one velocity,
/// one pending descent.
#[derive(Clone, Debug, PartialEq)]
pub struct Formation {
    /// Health per cell, `cells[row][col]`. Zero means destroyed.
    pub cells: [[u8; ENEMY_COLUMNS]; ENEMY_ROWS],
    /// Screen position of cell (0, 0).
    pub x: f32,
    pub y: f32,
    /// Horizontal velocity in px/frame; the sign is the sweep direction.
    pub velocity_x: f32,
    /// Anchor y the formation is descending towards, if any.
    pub descent_target: Option<f32>,
    /// Leftmost column that still has a live cell.
    pub left: usize,
    /// Rightmost column that still has a live cell.
    pub right: usize,
    /// Bottommost row that still has a live cell.
    pub bottom: usize,
    /// Number of live cells.
    pub remaining: u32,
}

impl Formation {
    pub fn new(stage: u32) -> Self {
        Self {
            cells: [[1; ENEMY_COLUMNS]; ENEMY_ROWS],
            x: FORMATION_LEFT_EDGE,
            y: 100.0,
            velocity_x: 1.0 + stage as f32 + 30.0 / ENEMY_COUNT as f32,
            descent_target: None,
            left: 0,
            right: ENEMY_COLUMNS - 1,
            bottom: ENEMY_ROWS - 1,
            remaining: ENEMY_COUNT,
        }
    }

    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.cells[row][col] > 0
    }

    /// Screen position of the centre of cell (`row`, `col`).
    pub fn cell_position(&self, row: usize, col: usize) -> (f32, f32) {
        (
            self.x + col as f32 * CELL_SPACING_X,
            self.y + row as f32 * CELL_SPACING_Y,
        )
    }

    /// Live cells in row-major order.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..ENEMY_ROWS)
            .flat_map(|row| (0..ENEMY_COLUMNS).map(move |col| (row, col)))
            .filter(|&(row, col)| self.is_alive(row, col))
    }

    /// Derived y of the bottommost live row.
    pub fn bottom_y(&self) -> f32 {
        self.y + self.bottom as f32 * CELL_SPACING_Y
    }

    pub fn is_descending(&self) -> bool {
        self.descent_target.is_some()
    }
}

// ── Stage state ───────────────────────────────────────────────────────────────

/// Everything one stage attempt mutates. Owned by the active stage loop and
/// handed by reference to each per-frame sub-step.
#[derive(Clone, Debug, PartialEq)]
pub struct StageState {
    /// 1-based stage number; scales difficulty.
    pub stage: u32,
    pub player: Player,
    /// Player beams, travelling up.
    pub beams: Vec<Beam>,
    pub formation: Formation,
    /// Enemy beams, travelling down.
    pub enemy_beams: Vec<Beam>,
    pub outcome: Outcome,
    /// Frames elapsed in this stage. Only drives sprite animation.
    pub frame: u64,
    /// Fire key state of the previous frame, for press-edge detection.
    pub prev_fire: bool,
}

impl StageState {
    pub fn new(stage: u32) -> Self {
        Self {
            stage,
            player: Player::default(),
            beams: Vec::new(),
            formation: Formation::new(stage),
            enemy_beams: Vec::new(),
            outcome: Outcome::Playing,
            frame: 0,
            prev_fire: false,
        }
    }

    /// Sprite animation sub-frame: 0, 1 or 2, advancing every 10 frames.
    pub fn anim_frame(&self) -> u32 {
        ((self.frame / 10) % 3) as u32
    }
}
