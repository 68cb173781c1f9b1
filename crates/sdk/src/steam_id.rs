//! SteamID64 identity type
//!
//! Every human player is identified by a stable 64-bit Steam account id.
//! The textual form used in config files is exactly 17 ASCII digits.

use std::fmt;
use std::str::FromStr;

/// Number of digits in the textual SteamID64 form
pub const STEAM_ID_DIGITS: usize = 17;

/// A player's 64-bit Steam identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SteamId(u64);

/// Error returned when a string is not a 17-digit SteamID64
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSteamIdError;

impl fmt::Display for ParseSteamIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {} ASCII digits", STEAM_ID_DIGITS)
    }
}

impl std::error::Error for ParseSteamIdError {}

impl SteamId {
    /// Wrap a raw 64-bit value
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw 64-bit value
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Check whether `s` has the textual SteamID64 shape (17 ASCII digits)
    pub fn is_valid_str(s: &str) -> bool {
        s.len() == STEAM_ID_DIGITS && s.bytes().all(|b| b.is_ascii_digit())
    }

    /// Parse the 17-digit textual form
    pub fn parse(s: &str) -> Result<Self, ParseSteamIdError> {
        if !Self::is_valid_str(s) {
            return Err(ParseSteamIdError);
        }
        s.parse::<u64>().map(Self).map_err(|_| ParseSteamIdError)
    }
}

impl FromStr for SteamId {
    type Err = ParseSteamIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u64> for SteamId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
