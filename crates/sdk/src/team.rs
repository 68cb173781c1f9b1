//! Team numbers as reported by the host

use std::fmt;

/// A player's team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Team {
    /// Not assigned
    #[default]
    None = 0,
    /// Spectators
    Spectator = 1,
    /// Terrorists
    Terrorist = 2,
    /// Counter-Terrorists
    CounterTerrorist = 3,
}

impl Team {
    /// Map a raw team number, falling back to `None`
    pub const fn from_num(num: u8) -> Self {
        match num {
            1 => Self::Spectator,
            2 => Self::Terrorist,
            3 => Self::CounterTerrorist,
            _ => Self::None,
        }
    }

    /// Parse the chat shorthand `ct` / `t` (case-insensitive)
    pub fn from_side(side: &str) -> Option<Self> {
        if side.eq_ignore_ascii_case("ct") {
            Some(Self::CounterTerrorist)
        } else if side.eq_ignore_ascii_case("t") {
            Some(Self::Terrorist)
        } else {
            None
        }
    }

    /// Chat shorthand for playable teams
    pub const fn side(&self) -> Option<&'static str> {
        match self {
            Self::Terrorist => Some("t"),
            Self::CounterTerrorist => Some("ct"),
            _ => None,
        }
    }

    /// Console command that adds a bot to this team
    pub const fn bot_add_command(&self) -> &'static str {
        match self {
            Self::Terrorist => "bot_add_t",
            Self::CounterTerrorist => "bot_add_ct",
            _ => "bot_add",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Spectator => "spectator",
            Self::Terrorist => "t",
            Self::CounterTerrorist => "ct",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_side() {
        assert_eq!(Team::from_side("CT"), Some(Team::CounterTerrorist));
        assert_eq!(Team::from_side("t"), Some(Team::Terrorist));
        assert_eq!(Team::from_side("spec"), None);
    }

    #[test]
    fn test_bot_add_command() {
        assert_eq!(Team::CounterTerrorist.bot_add_command(), "bot_add_ct");
        assert_eq!(Team::Terrorist.bot_add_command(), "bot_add_t");
        assert_eq!(Team::None.bot_add_command(), "bot_add");
    }

    #[test]
    fn test_from_num() {
        assert_eq!(Team::from_num(3), Team::CounterTerrorist);
        assert_eq!(Team::from_num(9), Team::None);
    }
}
