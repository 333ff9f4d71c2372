use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Player commands accepted by [`GameSession::apply`](super::GameSession::apply).
///
/// The set is fixed; front-ends only decide which keys produce which command.
/// Commands serialize (and parse) as kebab-case names such as `move-left`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCw,
    Hold,
    Pause,
}

impl Command {
    pub const ALL: [Command; 7] = [
        Command::MoveLeft,
        Command::MoveRight,
        Command::SoftDrop,
        Command::HardDrop,
        Command::RotateCw,
        Command::Hold,
        Command::Pause,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Command::MoveLeft => "move-left",
            Command::MoveRight => "move-right",
            Command::SoftDrop => "soft-drop",
            Command::HardDrop => "hard-drop",
            Command::RotateCw => "rotate-cw",
            Command::Hold => "hold",
            Command::Pause => "pause",
        }
    }

    /// Short human-readable label used in help lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Command::MoveLeft => "Left",
            Command::MoveRight => "Right",
            Command::SoftDrop => "Soft drop",
            Command::HardDrop => "Hard drop",
            Command::RotateCw => "Rotate",
            Command::Hold => "Hold",
            Command::Pause => "Pause",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown command: {name:?}")]
pub struct ParseCommandError {
    #[error(not(source))]
    name: String,
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|command| command.name() == s)
            .ok_or_else(|| ParseCommandError { name: s.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match_serde() {
        for command in Command::ALL {
            let json = serde_json::to_string(&command).unwrap();
            assert_eq!(json, format!("\"{}\"", command.name()));
            assert_eq!(command.name().parse::<Command>(), Ok(command));
        }
    }

    #[test]
    fn test_parse_unknown_command() {
        let err = "rotate-ccw".parse::<Command>().unwrap_err();
        assert_eq!(err.to_string(), "unknown command: \"rotate-ccw\"");
    }
}
