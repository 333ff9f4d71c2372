//! Key names as stored in the key bindings, and their crossterm key codes.
//!
//! Named keys use their crossterm spelling (`Left`, `Enter`, `Esc`, ...),
//! `Space` stands for the space bar, and any other single character names
//! itself (case-sensitive).

use blocktris_engine::Command;
use blocktris_profile::KeyBindings;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("Left", KeyCode::Left),
    ("Right", KeyCode::Right),
    ("Up", KeyCode::Up),
    ("Down", KeyCode::Down),
    ("Space", KeyCode::Char(' ')),
    ("Enter", KeyCode::Enter),
    ("Esc", KeyCode::Esc),
    ("Tab", KeyCode::Tab),
    ("Backspace", KeyCode::Backspace),
    ("Delete", KeyCode::Delete),
    ("Insert", KeyCode::Insert),
    ("Home", KeyCode::Home),
    ("End", KeyCode::End),
    ("PageUp", KeyCode::PageUp),
    ("PageDown", KeyCode::PageDown),
];

pub fn parse_key(name: &str) -> Option<KeyCode> {
    if let Some((_, code)) = NAMED_KEYS.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
        return Some(*code);
    }
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_whitespace() && !c.is_control() => Some(KeyCode::Char(c)),
        _ => None,
    }
}

pub fn key_name(code: KeyCode) -> Option<String> {
    if let Some((name, _)) = NAMED_KEYS.iter().find(|(_, c)| *c == code) {
        return Some((*name).to_owned());
    }
    match code {
        KeyCode::Char(c) => Some(c.to_string()),
        _ => None,
    }
}

/// Resolves key presses to commands through the player's bindings.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: Vec<(KeyCode, Command)>,
}

impl KeyMap {
    /// Builds the map; bindings whose key name is not recognized are skipped.
    pub fn new(bindings: &KeyBindings) -> Self {
        let bindings = bindings
            .iter()
            .filter_map(|(command, key)| {
                let code = parse_key(key);
                if code.is_none() {
                    tracing::warn!(%command, key, "ignoring binding to unknown key");
                }
                Some((code?, command))
            })
            .collect();
        Self { bindings }
    }

    pub fn command_for(&self, event: &KeyEvent) -> Option<Command> {
        if event.kind != KeyEventKind::Press
            || event.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return None;
        }
        self.bindings
            .iter()
            .find(|(code, _)| *code == event.code)
            .map(|(_, command)| *command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_names() {
        assert_eq!(parse_key("Left"), Some(KeyCode::Left));
        assert_eq!(parse_key("space"), Some(KeyCode::Char(' ')));
        assert_eq!(parse_key("c"), Some(KeyCode::Char('c')));
        assert_eq!(parse_key("C"), Some(KeyCode::Char('C')));
        assert_eq!(parse_key(""), None);
        assert_eq!(parse_key("Hyper"), None);
    }

    #[test]
    fn test_key_names_round_trip() {
        for (name, code) in NAMED_KEYS {
            assert_eq!(key_name(*code).as_deref(), Some(*name));
        }
        assert_eq!(key_name(KeyCode::Char('x')).as_deref(), Some("x"));
        assert_eq!(key_name(KeyCode::F(1)), None);
    }

    #[test]
    fn test_default_bindings_resolve() {
        let map = KeyMap::new(&KeyBindings::default());
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(map.command_for(&press(KeyCode::Left)), Some(Command::MoveLeft));
        assert_eq!(map.command_for(&press(KeyCode::Char(' '))), Some(Command::HardDrop));
        assert_eq!(map.command_for(&press(KeyCode::Char('c'))), Some(Command::Hold));
        assert_eq!(map.command_for(&press(KeyCode::Char('q'))), None);
        assert_eq!(
            map.command_for(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn test_rebound_key() {
        let mut bindings = KeyBindings::default();
        bindings.set(Command::RotateCw, "x");
        let map = KeyMap::new(&bindings);
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(map.command_for(&press(KeyCode::Char('x'))), Some(Command::RotateCw));
        assert_eq!(map.command_for(&press(KeyCode::Up)), None);
    }
}
