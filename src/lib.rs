//! Kuinvaders - a fixed-timestep Space-Invaders-style shooter.
//!
//! Core modules:
//! - `entities`: stage state, formation, player and beam data
//! - `compute`: per-frame simulation and collision
//! - `render`: draw-side layers and the sprite atlas
//! - `controller`: title / stage / run loops
//! - `driver`: contracts for the frame driver, input and canvas
//! - `settings`: startup configuration

pub mod compute;
pub mod controller;
pub mod driver;
pub mod entities;
pub mod render;
pub mod settings;

pub use settings::Settings;
