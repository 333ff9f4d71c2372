use std::{collections::BTreeMap, fmt, str::FromStr};

use blocktris_engine::{Command, ScoringPolicy};
use serde::{Deserialize, Serialize};

/// Colour theme of the play screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    Neon,
    Pastel,
    #[default]
    Retro,
    Vaporwave,
    Mono,
}

impl Theme {
    pub const ALL: [Theme; 7] = [
        Theme::Light,
        Theme::Dark,
        Theme::Neon,
        Theme::Pastel,
        Theme::Retro,
        Theme::Vaporwave,
        Theme::Mono,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Neon => "neon",
            Theme::Pastel => "pastel",
            Theme::Retro => "retro",
            Theme::Vaporwave => "vaporwave",
            Theme::Mono => "mono",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown theme {name:?} (expected one of: light, dark, neon, pastel, retro, vaporwave, mono)")]
pub struct ParseThemeError {
    #[error(not(source))]
    name: String,
}

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Theme::ALL
            .into_iter()
            .find(|theme| theme.name() == lower)
            .ok_or_else(|| ParseThemeError { name: s.to_owned() })
    }
}

/// Key name bound to each [`Command`].
///
/// Key names are free-form strings interpreted by the front-end (for example
/// `"Left"`, `"Space"` or `"c"`). Commands missing from the stored map fall
/// back to their default key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    keys: BTreeMap<Command, String>,
}

impl KeyBindings {
    #[must_use]
    pub const fn default_key(command: Command) -> &'static str {
        match command {
            Command::MoveLeft => "Left",
            Command::MoveRight => "Right",
            Command::SoftDrop => "Down",
            Command::HardDrop => "Space",
            Command::RotateCw => "Up",
            Command::Hold => "c",
            Command::Pause => "p",
        }
    }

    #[must_use]
    pub fn key(&self, command: Command) -> &str {
        self.keys
            .get(&command)
            .map_or(Self::default_key(command), String::as_str)
    }

    pub fn set(&mut self, command: Command, key: impl Into<String>) {
        let key = key.into();
        if key == Self::default_key(command) {
            self.keys.remove(&command);
        } else {
            self.keys.insert(command, key);
        }
    }

    /// Every command with its effective key, in [`Command::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Command, &str)> {
        Command::ALL
            .into_iter()
            .map(|command| (command, self.key(command)))
    }

    /// Returns the command bound to `key`, if any.
    #[must_use]
    pub fn command_for(&self, key: &str) -> Option<Command> {
        self.iter()
            .find(|(_, bound)| *bound == key)
            .map(|(command, _)| command)
    }
}

/// Player preferences stored in the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub theme: Theme,
    pub sound: bool,
    pub music: bool,
    pub bindings: KeyBindings,
    pub scoring: ScoringPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            sound: true,
            music: true,
            bindings: KeyBindings::default(),
            scoring: ScoringPolicy::default(),
        }
    }
}
