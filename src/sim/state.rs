//! Session state and the start / pause / end / reset transitions
//!
//! The host never presents UI from here: HUD values and the end-of-game
//! overlay are published as `GameEvent`s for it to drain.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::Player;
use super::geometry::Playfield;
use super::world::World;
use crate::config::Config;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No session
    Idle,
    /// Active gameplay
    Running,
    /// Ticks keep arriving but do nothing
    Paused,
    /// Session over; waits for restart or reset
    Ended { won: bool },
}

/// Notifications for the host's display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    /// Score or lives changed
    HudChanged { score: u64, lives: u32 },
    /// Show the end-of-game overlay with a restart button
    OverlayShown { won: bool, message: String },
    OverlayHidden,
}

pub const WIN_MESSAGE: &str = "🎉 You Won! 🎉";
pub const LOSS_MESSAGE: &str = "Game Over!";

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    /// Ticks simulated this session
    pub frame_count: u64,
    pub invulnerable: bool,
    /// Ticks since the last hit while invulnerable
    pub invulnerable_timer: u32,
    pub player: Option<Player>,
    /// Enemies and bullets
    pub world: World,
    pub playfield: Playfield,
    /// Host timestamp of the previous frame (ms)
    pub last_frame_time: Option<f64>,
    /// Gap between the last two frames (ms), for the host's FPS readout
    pub last_delta_ms: f64,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Idle state; nothing happens until `start`
    pub fn new(playfield: Playfield, seed: u64) -> Self {
        Self {
            phase: GamePhase::Idle,
            score: 0,
            lives: 0,
            frame_count: 0,
            invulnerable: false,
            invulnerable_timer: 0,
            player: None,
            world: World::new(),
            playfield,
            last_frame_time: None,
            last_delta_ms: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Simulation is live (paused sessions count as running)
    pub fn is_running(&self) -> bool {
        matches!(self.phase, GamePhase::Running | GamePhase::Paused)
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, GamePhase::Ended { .. })
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Publish the current score and lives
    pub fn publish_hud(&mut self) {
        self.events.push(GameEvent::HudChanged {
            score: self.score,
            lives: self.lives,
        });
    }

    /// Begin a fresh session. No-op while one is already running or paused
    pub fn start(&mut self, config: &Config) {
        if self.is_running() {
            log::debug!("start ignored: session already running");
            return;
        }

        self.phase = GamePhase::Running;
        self.score = 0;
        self.lives = config.starting_lives();
        self.frame_count = 0;
        self.invulnerable = false;
        self.invulnerable_timer = 0;
        self.player = Some(Player::spawn(config, &self.playfield));
        self.world.clear();
        self.last_frame_time = None;
        self.last_delta_ms = 0.0;

        self.publish_hud();
        self.events.push(GameEvent::OverlayHidden);
        log::info!(
            "Session started ({} lives, {}x{} playfield)",
            self.lives,
            self.playfield.width,
            self.playfield.height
        );
    }

    /// Toggle Running ⇄ Paused
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            other => {
                log::debug!("pause ignored in {:?}", other);
                other
            }
        };
        log::info!("Phase now {:?}", self.phase);
    }

    /// Finish the session and raise the overlay signal
    pub fn end(&mut self, won: bool) {
        self.phase = GamePhase::Ended { won };
        let message = if won { WIN_MESSAGE } else { LOSS_MESSAGE };
        self.events.push(GameEvent::OverlayShown {
            won,
            message: message.to_string(),
        });
        log::info!(
            "Session ended ({}) at frame {} with score {}",
            if won { "won" } else { "lost" },
            self.frame_count,
            self.score
        );
    }

    /// Tear down to Idle
    pub fn reset(&mut self, config: &Config) {
        self.phase = GamePhase::Idle;
        self.player = None;
        self.world.clear();
        self.score = 0;
        self.lives = config.starting_lives();
        self.invulnerable = false;
        self.invulnerable_timer = 0;

        self.events.push(GameEvent::OverlayHidden);
        self.publish_hud();
        log::info!("Session reset");
    }

    /// Re-derive the player from the current config and republish the HUD.
    ///
    /// A live session keeps its score and remaining lives; without one the
    /// HUD shows the configured starting lives.
    pub fn apply_config(&mut self, config: &Config) {
        if let Some(player) = self.player.as_mut() {
            *player = Player::spawn(config, &self.playfield);
            log::debug!("Player respawned from new config");
        }
        if self.phase == GamePhase::Idle {
            self.lives = config.starting_lives();
        }
        self.publish_hud();
    }

    /// Note a host frame timestamp (ms)
    pub fn record_frame_time(&mut self, timestamp_ms: f64) {
        if let Some(last) = self.last_frame_time {
            self.last_delta_ms = timestamp_ms - last;
        }
        self.last_frame_time = Some(timestamp_ms);
    }
}
