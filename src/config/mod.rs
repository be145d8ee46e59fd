//! Game configuration
//!
//! A single record of tunables that the learner edits as `GAME_CONFIG`. It is
//! read live by the simulation every tick, so merged edits apply immediately.

pub mod literal;
pub mod presets;

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

pub use presets::Challenge;

/// Every tunable the simulation reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    // === Player ===
    /// Pixels per tick
    pub player_speed: f32,
    /// Any CSS color
    pub player_color: String,
    /// Width and height of the ship
    pub player_size: f32,

    // === Enemies ===
    /// Pixels per tick
    pub enemy_speed: f32,
    /// Ticks between spawns
    pub enemy_spawn_rate: f32,
    pub enemy_size: f32,
    pub enemy_color: String,

    // === Bullets ===
    pub bullet_speed: f32,
    pub bullet_size: f32,
    pub bullet_color: String,
    /// Ticks between shots
    pub bullet_cooldown: f32,

    // === Game ===
    /// Points per enemy destroyed
    pub score_multiplier: f32,
    /// Global multiplier on every entity speed
    pub game_speed: f32,
    /// Starting lives
    pub lives: f32,
    /// Ticks of invulnerability after being hit
    pub invulnerability_time: f32,
    pub rainbow_mode: bool,

    /// Fields the game doesn't know about, kept as the learner wrote them
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player_speed: 5.0,
            player_color: "green".to_string(),
            player_size: 40.0,

            enemy_speed: 0.8,
            enemy_spawn_rate: 60.0,
            enemy_size: 30.0,
            enemy_color: "red".to_string(),

            bullet_speed: 8.0,
            bullet_size: 5.0,
            bullet_color: "yellow".to_string(),
            bullet_cooldown: 15.0,

            score_multiplier: 10.0,
            game_speed: 1.0,
            lives: 3.0,
            invulnerability_time: 120.0,
            rainbow_mode: false,

            extra: Map::new(),
        }
    }
}

/// A partial update: every `None` field keeps its current value on merge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enemy_speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enemy_spawn_rate: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enemy_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enemy_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullet_speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullet_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullet_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullet_cooldown: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_multiplier: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lives: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invulnerability_time: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rainbow_mode: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigPatch {
    /// Validate a parsed object against the field schema.
    ///
    /// Either the whole object is accepted or nothing is.
    pub fn from_object(object: Map<String, Value>) -> Result<Self, ConfigError> {
        serde_json::from_value(Value::Object(object))
            .map_err(|e| ConfigError::Schema(e.to_string()))
    }

    /// Parse learner code containing a `GAME_CONFIG` declaration
    pub fn from_source(source: &str) -> Result<Self, ConfigError> {
        let object = literal::parse_game_config(source)?;
        Self::from_object(object)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

macro_rules! merge_fields {
    ($config:expr, $patch:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $patch.$field {
                $config.$field = value;
            }
        )+
    };
}

impl Config {
    /// The values the editor starts with (and the base of every challenge)
    pub fn starter() -> Self {
        Self {
            player_color: "#00ff00".to_string(),
            enemy_speed: 2.0,
            enemy_color: "#ff0000".to_string(),
            bullet_color: "#ffff00".to_string(),
            ..Self::default()
        }
    }

    /// Overwrite only the fields present in `patch`
    pub fn merge(&mut self, patch: ConfigPatch) {
        merge_fields!(self, patch;
            player_speed,
            player_color,
            player_size,
            enemy_speed,
            enemy_spawn_rate,
            enemy_size,
            enemy_color,
            bullet_speed,
            bullet_size,
            bullet_color,
            bullet_cooldown,
            score_multiplier,
            game_speed,
            lives,
            invulnerability_time,
            rainbow_mode,
        );
        self.extra.extend(patch.extra);
    }

    /// Lives a fresh session starts with (fractions truncate, negatives become 0)
    pub fn starting_lives(&self) -> u32 {
        self.lives.max(0.0) as u32
    }

    /// Points awarded per kill, rounded to a whole number
    pub fn points_per_kill(&self) -> i64 {
        self.score_multiplier.round() as i64
    }

    /// Render as the learner-facing `GAME_CONFIG` source
    pub fn to_source(&self) -> String {
        let mut lines = vec![
            Line::Section("Player settings"),
            Line::field("playerSpeed", number(self.player_speed)),
            Line::field("playerColor", quoted(&self.player_color)),
            Line::field("playerSize", number(self.player_size)),
            Line::Section("Enemy settings"),
            Line::field("enemySpeed", number(self.enemy_speed)),
            Line::field("enemySpawnRate", number(self.enemy_spawn_rate)),
            Line::field("enemySize", number(self.enemy_size)),
            Line::field("enemyColor", quoted(&self.enemy_color)),
            Line::Section("Bullet settings"),
            Line::field("bulletSpeed", number(self.bullet_speed)),
            Line::field("bulletSize", number(self.bullet_size)),
            Line::field("bulletColor", quoted(&self.bullet_color)),
            Line::field("bulletCooldown", number(self.bullet_cooldown)),
            Line::Section("Game settings"),
            Line::field("scoreMultiplier", number(self.score_multiplier)),
            Line::field("gameSpeed", number(self.game_speed)),
            Line::field("lives", number(self.lives)),
            Line::field("invulnerabilityTime", number(self.invulnerability_time)),
            Line::field("rainbowMode", self.rainbow_mode.to_string()),
        ];
        if !self.extra.is_empty() {
            lines.push(Line::Section("Extra settings"));
            for (key, value) in &self.extra {
                lines.push(Line::Field(property_key(key), value.to_string()));
            }
        }

        let field_count = lines.iter().filter(|l| matches!(l, Line::Field(..))).count();
        let mut out = String::new();
        out.push_str("// Game Configuration - MODIFY THESE VALUES TO CHANGE THE GAME!\n");
        out.push_str("const GAME_CONFIG = {\n");
        let mut written = 0;
        for line in lines {
            match line {
                Line::Section(title) => {
                    let _ = writeln!(out, "    // {title}");
                }
                Line::Field(key, value) => {
                    written += 1;
                    let comma = if written < field_count { "," } else { "" };
                    let _ = writeln!(out, "    {key}: {value}{comma}");
                }
            }
        }
        out.push_str("};\n");
        out
    }
}

/// One line of rendered source
enum Line {
    Section(&'static str),
    Field(String, String),
}

impl Line {
    fn field(key: &str, value: String) -> Self {
        Line::Field(key.to_string(), value)
    }
}

fn number(value: f32) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        // Not representable in the literal grammar; fall back to zero
        "0".to_string()
    }
}

fn quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn property_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        key.to_string()
    } else {
        Value::String(key.to_string()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    const FIELDS: [&str; 16] = [
        "playerSpeed",
        "playerColor",
        "playerSize",
        "enemySpeed",
        "enemySpawnRate",
        "enemySize",
        "enemyColor",
        "bulletSpeed",
        "bulletSize",
        "bulletColor",
        "bulletCooldown",
        "scoreMultiplier",
        "gameSpeed",
        "lives",
        "invulnerabilityTime",
        "rainbowMode",
    ];

    proptest! {
        #[test]
        fn prop_merge_touches_only_the_patched_field(
            index in 0usize..16,
            n in -1000i32..1000,
            text in "[a-z0-9#]{1,8}",
            flag in any::<bool>(),
        ) {
            let key = FIELDS[index];
            let value = match key {
                "playerColor" | "enemyColor" | "bulletColor" => json!(text),
                "rainbowMode" => json!(flag),
                _ => json!(f64::from(n)),
            };
            let mut object = Map::new();
            object.insert(key.to_string(), value.clone());
            let patch = ConfigPatch::from_object(object).unwrap();

            let before = serde_json::to_value(Config::default()).unwrap();
            let mut config = Config::default();
            config.merge(patch);
            let after = serde_json::to_value(&config).unwrap();

            for field in FIELDS {
                if field == key {
                    prop_assert_eq!(&after[field], &value);
                } else {
                    prop_assert_eq!(&after[field], &before[field]);
                }
            }
            prop_assert!(config.extra.is_empty());
        }
    }

    #[test]
    fn test_merge_single_field() {
        let mut config = Config::default();
        let patch = ConfigPatch {
            player_speed: Some(9.0),
            ..Default::default()
        };
        config.merge(patch);

        let expected = Config {
            player_speed: 9.0,
            ..Config::default()
        };
        assert_eq!(config, expected);
    }

    #[test]
    fn test_merge_empty_patch_is_noop() {
        let mut config = Config::starter();
        config.merge(ConfigPatch::default());
        assert_eq!(config, Config::starter());
    }

    #[test]
    fn test_merge_keeps_prior_values_not_defaults() {
        let mut config = Config::default();
        config.merge(ConfigPatch {
            enemy_speed: Some(4.0),
            ..Default::default()
        });
        config.merge(ConfigPatch {
            lives: Some(7.0),
            ..Default::default()
        });
        assert_eq!(config.enemy_speed, 4.0);
        assert_eq!(config.lives, 7.0);
    }

    #[test]
    fn test_merge_accepts_degenerate_values() {
        let mut config = Config::default();
        config.merge(ConfigPatch {
            player_speed: Some(-3.0),
            bullet_cooldown: Some(0.0),
            ..Default::default()
        });
        assert_eq!(config.player_speed, -3.0);
        assert_eq!(config.bullet_cooldown, 0.0);
    }

    #[test]
    fn test_unknown_fields_retained() {
        let object = json!({ "playerSpeed": 6, "bossMode": true, "theme": { "dark": 1 } });
        let Value::Object(object) = object else { unreachable!() };
        let patch = ConfigPatch::from_object(object).unwrap();
        assert_eq!(patch.player_speed, Some(6.0));

        let mut config = Config::default();
        config.merge(patch);
        assert_eq!(config.extra.get("bossMode"), Some(&json!(true)));
        assert_eq!(config.extra.get("theme"), Some(&json!({ "dark": 1 })));
    }

    #[test]
    fn test_schema_error_on_wrong_type() {
        let Value::Object(object) = json!({ "playerSpeed": "fast", "lives": 5 }) else {
            unreachable!()
        };
        let err = ConfigPatch::from_object(object).unwrap_err();
        assert!(matches!(err, ConfigError::Schema(_)));
    }

    #[test]
    fn test_null_leaves_field_unset() {
        let Value::Object(object) = json!({ "playerColor": null }) else { unreachable!() };
        let patch = ConfigPatch::from_object(object).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_starting_lives_conversion() {
        let mut config = Config::default();
        assert_eq!(config.starting_lives(), 3);
        config.lives = 2.7;
        assert_eq!(config.starting_lives(), 2);
        config.lives = -4.0;
        assert_eq!(config.starting_lives(), 0);
    }

    #[test]
    fn test_to_source_parses_back() {
        let mut config = Config::starter();
        config.enemy_speed = 0.5;
        config.rainbow_mode = true;
        config.player_color = "it's green".to_string();
        config.extra.insert("bonus-round".to_string(), json!([1, 2]));

        let patch = ConfigPatch::from_source(&config.to_source()).unwrap();
        let mut rebuilt = Config::default();
        rebuilt.merge(patch);
        assert_eq!(rebuilt, config);
    }

    #[test]
    fn test_to_source_layout() {
        let source = Config::starter().to_source();
        assert!(source.contains("const GAME_CONFIG = {"));
        assert!(source.contains("    playerColor: '#00ff00',"));
        assert!(source.contains("    rainbowMode: false\n};"));
    }
}
