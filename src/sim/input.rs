//! Keyboard state shared between the host's key events and the tick
//!
//! The held set stores DOM key names, not logical keys: a direction stays
//! held while any of its keys is down.

use std::collections::HashSet;

/// Logical game keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Fire,
}

impl Key {
    /// DOM key names bound to this key. Letters are stored lowercase.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Key::Left => &["ArrowLeft", "a"],
            Key::Right => &["ArrowRight", "d"],
            Key::Up => &["ArrowUp", "w"],
            Key::Down => &["ArrowDown", "s"],
            Key::Fire => &[" ", "Space"],
        }
    }

    /// Map a DOM `KeyboardEvent.key` value (arrows, WASD in either case, space)
    pub fn from_dom(key: &str) -> Option<Self> {
        let name = normalize(key);
        [Key::Left, Key::Right, Key::Up, Key::Down, Key::Fire]
            .into_iter()
            .find(|k| k.aliases().contains(&name.as_str()))
    }
}

/// Letter keys report their shifted form while Shift is held; fold them so
/// that `A` down followed by `a` up releases the key
fn normalize(key: &str) -> String {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_lowercase().collect(),
        _ => key.to_string(),
    }
}

/// Keys currently held down
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `key` through its primary binding
    pub fn press(&mut self, key: Key) {
        self.held.insert(key.aliases()[0].to_string());
    }

    /// Release every binding of `key`
    pub fn release(&mut self, key: Key) {
        for alias in key.aliases() {
            self.held.remove(*alias);
        }
    }

    /// Record a DOM keydown. Returns true if the key is a game key (the host
    /// should then suppress the browser default, e.g. space scrolling)
    pub fn key_down(&mut self, key: &str) -> bool {
        if Key::from_dom(key).is_none() {
            return false;
        }
        self.held.insert(normalize(key));
        true
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.remove(&normalize(key));
    }

    /// True while any binding of `key` is held
    pub fn is_pressed(&self, key: Key) -> bool {
        key.aliases().iter().any(|alias| self.held.contains(*alias))
    }

    /// Release everything (e.g. when the window loses focus)
    pub fn clear(&mut self) {
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_mapping() {
        assert_eq!(Key::from_dom("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_dom("D"), Some(Key::Right));
        assert_eq!(Key::from_dom("w"), Some(Key::Up));
        assert_eq!(Key::from_dom(" "), Some(Key::Fire));
        assert_eq!(Key::from_dom("Space"), Some(Key::Fire));
        assert_eq!(Key::from_dom("Enter"), None);
        assert_eq!(Key::from_dom("arrowleft"), None);
    }

    #[test]
    fn test_case_variants_share_state() {
        let mut input = InputState::new();
        assert!(input.key_down("A"));
        input.key_up("a");
        assert!(!input.is_pressed(Key::Left));
        assert!(!input.key_down("Shift"));
    }

    #[test]
    fn test_direction_held_while_any_binding_is_down() {
        let mut input = InputState::new();
        input.key_down("a");
        input.key_down("ArrowLeft");
        input.key_up("ArrowLeft");
        assert!(input.is_pressed(Key::Left));
        input.key_up("a");
        assert!(!input.is_pressed(Key::Left));
    }

    #[test]
    fn test_release_drops_every_binding() {
        let mut input = InputState::new();
        input.key_down(" ");
        input.key_down("Space");
        input.release(Key::Fire);
        assert!(!input.is_pressed(Key::Fire));
    }

    #[test]
    fn test_non_game_keys_are_not_held() {
        let mut input = InputState::new();
        input.key_down("q");
        input.key_down("Q");
        assert!(input.held.is_empty());
    }
}
