//! `.tp` argument parsing and player selectors
//!
//! ```text
//! .tp player=Bob facing=true
//! .tp pos=100,-250.5,64
//! .tp player=Alice,Bob        (admin: move Alice to Bob)
//! ```

use cs2prac_sdk::Vector;

/// Usage errors reported back to the caller
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TeleportArgError {
    #[error("coordinates must be x,y,z")]
    BadCoordinates,
    #[error("facing must be true/false or 1/0")]
    BadFacing,
    #[error("either player or pos is required")]
    MissingTarget,
    #[error("player and pos cannot be used together")]
    PlayerAndPos,
    #[error("facing requires player")]
    FacingWithoutPlayer,
}

/// Where `.tp` should send the caller
#[derive(Debug, Clone, PartialEq)]
pub enum TeleportTarget {
    /// Raw `player=` list, resolved by the host
    Players(String),
    /// Fixed world position
    Position(Vector),
}

/// Validated `.tp` arguments
#[derive(Debug, Clone, PartialEq)]
pub struct TeleportArgs {
    pub target: TeleportTarget,
    /// Face the target player after arriving
    pub facing: bool,
}

impl TeleportArgs {
    /// Parse `.tp` tokens
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, TeleportArgError> {
        let mut player = None;
        let mut pos = None;
        let mut facing = false;

        for arg in args {
            let arg = arg.as_ref();
            if let Some(value) = arg.strip_prefix("player=") {
                player = Some(value.to_string());
            } else if let Some(value) = arg.strip_prefix("pos=") {
                pos = Some(parse_coordinates(value).ok_or(TeleportArgError::BadCoordinates)?);
            } else if let Some(value) = arg.strip_prefix("facing=") {
                facing = match value.to_lowercase().as_str() {
                    "true" | "1" => true,
                    "false" | "0" => false,
                    _ => return Err(TeleportArgError::BadFacing),
                };
            }
        }

        let target = match (player, pos) {
            (None, None) => return Err(TeleportArgError::MissingTarget),
            (Some(_), Some(_)) => return Err(TeleportArgError::PlayerAndPos),
            (Some(names), None) => TeleportTarget::Players(names),
            (None, Some(pos)) => {
                if facing {
                    return Err(TeleportArgError::FacingWithoutPlayer);
                }
                TeleportTarget::Position(pos)
            }
        };

        Ok(Self { target, facing })
    }
}

/// Parse `x,y,z` into a position
pub fn parse_coordinates(text: &str) -> Option<Vector> {
    let mut parts = text.split(',');
    let x = parts.next()?.trim().parse().ok()?;
    let y = parts.next()?.trim().parse().ok()?;
    let z = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Vector::new(x, y, z))
}

/// One entry of a comma-separated player list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerSelector {
    /// `@a`: every human player
    AllHumans,
    /// `@e`: every player the selector can address
    Everyone,
    /// `@p`: the player the caller is looking at
    InSight,
    /// `@s`: the caller
    Caller,
    /// `@r`: a random human player
    Random,
    /// Case-insensitive name fragment
    Name(String),
}

impl PlayerSelector {
    /// Parse a single selector token
    pub fn parse(token: &str) -> Self {
        match token.to_lowercase().as_str() {
            "@a" => Self::AllHumans,
            "@e" => Self::Everyone,
            "@p" => Self::InSight,
            "@s" => Self::Caller,
            "@r" => Self::Random,
            _ => Self::Name(token.to_string()),
        }
    }

    /// Parse a comma-separated list, skipping empty entries
    pub fn parse_list(list: &str) -> Vec<Self> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::parse)
            .collect()
    }
}

/// Split an admin `source,destination` pair
///
/// Returns `None` unless the list holds exactly two non-empty entries.
pub fn parse_player_pair(list: &str) -> Option<(String, String)> {
    let names: Vec<&str> = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    match names.as_slice() {
        [source, destination] => Some((source.to_string(), destination.to_string())),
        _ => None,
    }
}
