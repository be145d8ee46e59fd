//! Errors surfaced to the host when learner code cannot be applied
//!
//! None of these touch a running session: the previous config stays in effect.

use thiserror::Error;

/// Why a `GAME_CONFIG` source could not be turned into a config update.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No recognizable configuration literal, or the literal is malformed.
    #[error("could not read GAME_CONFIG: {0}")]
    Parse(String),
    /// The declaration exists but its value is not an object literal.
    #[error("GAME_CONFIG must be an object, found {found}")]
    NotARecord { found: &'static str },
    /// The literal contains an expression instead of a plain value.
    #[error("cannot evaluate {0}")]
    Evaluation(String),
    /// A recognized field holds a value of the wrong type.
    #[error("invalid GAME_CONFIG field: {0}")]
    Schema(String),
}

impl ConfigError {
    /// Hint shown alongside the message in the editor's error panel
    pub fn hint(&self) -> &'static str {
        match self {
            ConfigError::Parse(_) | ConfigError::NotARecord { .. } => {
                "Make sure your code starts with `const GAME_CONFIG = {` and ends with `};`"
            }
            ConfigError::Evaluation(_) => {
                "Only plain numbers, strings, true and false are allowed as values"
            }
            ConfigError::Schema(_) => "Check that each setting has the right kind of value",
        }
    }
}
