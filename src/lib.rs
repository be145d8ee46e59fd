//! Code Blaster - a live-coding arcade shooter
//!
//! Core modules:
//! - `sim`: Simulation (entities, collisions, session state machine, tick)
//! - `config`: Tunable parameters, the strict `GAME_CONFIG` parser, challenge presets
//! - `renderer`: 2D drawing surface abstraction consumed by the simulation
//! - `game`: Host-facing context tying config, session and input together
//! - `platform`: HUD/overlay display sinks, plus DOM helpers on wasm32

pub mod config;
pub mod error;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::{Challenge, Config, ConfigPatch};
pub use error::ConfigError;
pub use game::Game;

/// Game configuration constants
pub mod consts {
    /// Horizontal space the host layout reserves around the canvas
    pub const CONTAINER_MARGIN_X: f32 = 30.0;
    /// Vertical space the host layout reserves (header + controls)
    pub const CONTAINER_MARGIN_Y: f32 = 80.0;

    /// Fraction of the canvas height above which the player may not fly
    pub const PLAYABLE_TOP_FRACTION: f32 = 0.75;
    /// Distance from the canvas bottom to the player's lowest center line
    pub const PLAYABLE_BOTTOM_INSET: f32 = 60.0;

    /// Invulnerability flicker frequency (radians per tick)
    pub const FLICKER_FREQUENCY: f32 = 0.3;

    /// Outline drawn around every entity
    pub const OUTLINE_COLOR: &str = "#fff";
    pub const BACKGROUND_COLOR: &str = "#000";
    pub const STAR_COLOR: &str = "#fff";
    pub const STAR_COUNT: u32 = 50;
    /// Pixels the starfield scrolls per tick
    pub const STAR_SCROLL_SPEED: f32 = 0.5;
}
