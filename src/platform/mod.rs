//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - HUD and overlay display (DOM on web, log lines natively)
//! - Container measurement and key wiring (web only)

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::sim::GameEvent;

/// Where the host shows score, lives and the end-of-game overlay
pub trait HudSink {
    fn set_hud(&mut self, score: u64, lives: u32);
    fn show_overlay(&mut self, won: bool, message: &str);
    fn hide_overlay(&mut self);
}

/// Forward drained game events to the display
pub fn dispatch_events(events: &[GameEvent], sink: &mut dyn HudSink) {
    for event in events {
        match event {
            GameEvent::HudChanged { score, lives } => sink.set_hud(*score, *lives),
            GameEvent::OverlayShown { won, message } => sink.show_overlay(*won, message),
            GameEvent::OverlayHidden => sink.hide_overlay(),
        }
    }
}

/// Frames per second for a frame gap, rounded; 0 when unknown
pub fn fps(delta_ms: f64) -> u32 {
    if delta_ms > 0.0 {
        (1000.0 / delta_ms).round() as u32
    } else {
        0
    }
}

/// Sink that just remembers the latest values (headless runs and tests)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HudSnapshot {
    pub score: u64,
    pub lives: u32,
    /// Message of the visible overlay, if any
    pub overlay: Option<String>,
    pub won: Option<bool>,
}

impl HudSink for HudSnapshot {
    fn set_hud(&mut self, score: u64, lives: u32) {
        self.score = score;
        self.lives = lives;
    }

    fn show_overlay(&mut self, won: bool, message: &str) {
        self.overlay = Some(message.to_string());
        self.won = Some(won);
    }

    fn hide_overlay(&mut self) {
        self.overlay = None;
        self.won = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::LOSS_MESSAGE;

    #[test]
    fn test_dispatch_keeps_latest_values() {
        let mut hud = HudSnapshot::default();
        dispatch_events(
            &[
                GameEvent::HudChanged { score: 10, lives: 3 },
                GameEvent::HudChanged { score: 20, lives: 2 },
                GameEvent::OverlayShown {
                    won: false,
                    message: LOSS_MESSAGE.to_string(),
                },
            ],
            &mut hud,
        );
        assert_eq!(hud.score, 20);
        assert_eq!(hud.lives, 2);
        assert_eq!(hud.overlay.as_deref(), Some(LOSS_MESSAGE));

        dispatch_events(&[GameEvent::OverlayHidden], &mut hud);
        assert_eq!(hud.overlay, None);
    }

    #[test]
    fn test_fps() {
        assert_eq!(fps(16.0), 63);
        assert_eq!(fps(0.0), 0);
    }
}
