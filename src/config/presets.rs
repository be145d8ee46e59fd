//! Challenge presets offered in the editor's challenge menu
//!
//! Each challenge is the starter config with a handful of values changed.

use super::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Challenge {
    SuperSpeed,
    RainbowMode,
    RapidFire,
    BiggerShip,
    SlowMotion,
    DoublePoints,
}

impl Challenge {
    pub const ALL: [Challenge; 6] = [
        Challenge::SuperSpeed,
        Challenge::RainbowMode,
        Challenge::RapidFire,
        Challenge::BiggerShip,
        Challenge::SlowMotion,
        Challenge::DoublePoints,
    ];

    /// Identifier used by the challenge menu markup
    pub fn as_str(&self) -> &'static str {
        match self {
            Challenge::SuperSpeed => "superSpeed",
            Challenge::RainbowMode => "rainbowMode",
            Challenge::RapidFire => "rapidFire",
            Challenge::BiggerShip => "biggerShip",
            Challenge::SlowMotion => "slowMotion",
            Challenge::DoublePoints => "doublePoints",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Human-readable title
    pub fn name(&self) -> &'static str {
        match self {
            Challenge::SuperSpeed => "Super Speed",
            Challenge::RainbowMode => "Rainbow Mode",
            Challenge::RapidFire => "Rapid Fire",
            Challenge::BiggerShip => "Bigger Ship",
            Challenge::SlowMotion => "Slow Motion",
            Challenge::DoublePoints => "Double Points",
        }
    }

    pub fn config(&self) -> Config {
        let mut config = Config::starter();
        match self {
            Challenge::SuperSpeed => config.player_speed = 20.0,
            Challenge::RainbowMode => config.rainbow_mode = true,
            Challenge::RapidFire => {
                config.bullet_speed = 12.0;
                config.bullet_cooldown = 5.0;
            }
            Challenge::BiggerShip => config.player_size = 80.0,
            Challenge::SlowMotion => {
                config.enemy_speed = 0.5;
                config.game_speed = 0.5;
            }
            Challenge::DoublePoints => config.score_multiplier = 100.0,
        }
        config
    }

    /// The code the editor shows when this challenge is picked
    pub fn source(&self) -> String {
        self.config().to_source()
    }
}
