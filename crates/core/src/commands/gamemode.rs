//! Game modes an admin can put players in

use std::fmt;
use std::str::FromStr;

/// Mode set with `.gm <players> <mode>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Back to playing
    Normal,
    /// Moved to the spectator team
    Spectator,
}

/// Error for mode names other than the accepted spellings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid mode: {0}")]
pub struct UnknownGameMode(pub String);

impl FromStr for GameMode {
    type Err = UnknownGameMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" | "n" | "0" => Ok(Self::Normal),
            "spectator" | "spec" | "s" | "1" => Ok(Self::Spectator),
            _ => Err(UnknownGameMode(s.to_string())),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "normal mode",
            Self::Spectator => "spectator mode",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_spellings() {
        for text in ["normal", "N", "0"] {
            assert_eq!(text.parse::<GameMode>(), Ok(GameMode::Normal));
        }
        for text in ["Spectator", "spec", "s", "1"] {
            assert_eq!(text.parse::<GameMode>(), Ok(GameMode::Spectator));
        }
        assert_eq!(
            "2".parse::<GameMode>(),
            Err(UnknownGameMode("2".to_string()))
        );
    }
}
