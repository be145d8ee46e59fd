//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - One step per `tick` call, whatever cadence the host picks
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - Drawing only through the `Surface` trait

pub mod entity;
pub mod geometry;
pub mod input;
pub mod state;
pub mod tick;
pub mod world;

pub use entity::{Bullet, DrawContext, Enemy, Entity, Intent, Player};
pub use geometry::{Playfield, Rect, collides};
pub use input::{InputState, Key};
pub use state::{GameEvent, GamePhase, GameState, LOSS_MESSAGE, WIN_MESSAGE};
pub use tick::{spawn_due, tick};
pub use world::{Body, EntityId, World};
