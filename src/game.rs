//! Host-facing game context
//!
//! `Game` owns the config store, the session and the held keys. Every host
//! entry point (buttons, editor, keyboard, refresh callback) goes through a
//! `&mut Game` method, so config edits and input always land between ticks.

use crate::config::{Challenge, Config, ConfigPatch};
use crate::error::ConfigError;
use crate::renderer::Surface;
use crate::sim::{GameEvent, GameState, InputState, Playfield, tick};

pub struct Game {
    config: Config,
    state: GameState,
    input: InputState,
}

impl Game {
    /// Idle game with the built-in default config
    pub fn new(playfield: Playfield, seed: u64) -> Self {
        Self::with_config(Config::default(), playfield, seed)
    }

    pub fn with_config(config: Config, playfield: Playfield, seed: u64) -> Self {
        log::info!(
            "Game created ({}x{} playfield, seed {})",
            playfield.width,
            playfield.height,
            seed
        );
        Self {
            config,
            state: GameState::new(playfield, seed),
            input: InputState::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn start_game(&mut self) {
        self.state.start(&self.config);
    }

    pub fn pause_game(&mut self) {
        self.state.toggle_pause();
    }

    pub fn end_game(&mut self, won: bool) {
        self.state.end(won);
    }

    pub fn reset_game(&mut self) {
        self.input.clear();
        self.state.reset(&self.config);
    }

    /// Push the current config into the live session
    pub fn apply_config(&mut self) {
        self.state.apply_config(&self.config);
    }

    /// Field-wise merge; the next tick reads the new values
    pub fn merge_config(&mut self, patch: ConfigPatch) {
        self.config.merge(patch);
    }

    /// Apply learner code: parse, merge, apply, then start if idle or ended.
    ///
    /// On error nothing changes; the previous config stays in effect.
    pub fn apply_source(&mut self, source: &str) -> Result<(), ConfigError> {
        let patch = match ConfigPatch::from_source(source) {
            Ok(patch) => patch,
            Err(e) => {
                log::warn!("Config rejected: {}", e);
                return Err(e);
            }
        };

        if !patch.extra.is_empty() {
            log::debug!(
                "Keeping unrecognized settings: {:?}",
                patch.extra.keys().collect::<Vec<_>>()
            );
        }
        self.merge_config(patch);
        self.apply_config();
        if !self.is_running() {
            self.start_game();
        }
        log::info!("Config applied");
        Ok(())
    }

    /// Load a challenge preset as if the learner had typed it
    pub fn apply_preset(&mut self, challenge: Challenge) -> Result<String, ConfigError> {
        log::info!("Challenge selected: {}", challenge.name());
        let source = challenge.source();
        self.apply_source(&source)?;
        Ok(source)
    }

    /// Restore the editor's starter code and apply it
    pub fn apply_starter(&mut self) -> Result<String, ConfigError> {
        let source = Config::starter().to_source();
        self.apply_source(&source)?;
        Ok(source)
    }

    /// Returns true if the key is a game key
    pub fn key_down(&mut self, key: &str) -> bool {
        self.input.key_down(key)
    }

    pub fn key_up(&mut self, key: &str) {
        self.input.key_up(key);
    }

    /// Release all held keys (focus lost)
    pub fn release_keys(&mut self) {
        self.input.clear();
    }

    /// Track the host container size. Takes effect for entities spawned
    /// afterwards; the current player keeps its band until it respawns.
    pub fn resize(&mut self, container_width: f32, container_height: f32) {
        self.set_playfield(Playfield::from_container(container_width, container_height));
    }

    /// Use an already measured playfield
    pub fn set_playfield(&mut self, playfield: Playfield) {
        if playfield != self.state.playfield {
            log::debug!("Playfield resized to {}x{}", playfield.width, playfield.height);
            self.state.playfield = playfield;
        }
    }

    /// One refresh-callback step
    pub fn frame(&mut self, surface: &mut dyn Surface, timestamp_ms: f64) {
        self.state.record_frame_time(timestamp_ms);
        tick(&mut self.state, &self.config, &self.input, surface);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}
