//! `.sp` / `.s` argument parsing
//!
//! ```text
//! .sp index=2 side=ct
//! .sp type=best
//! .sp random
//! ```

use cs2prac_sdk::Team;

use crate::spawns::SpawnType;

/// Usage errors reported back to the caller
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpawnArgError {
    #[error("index must be a number of at least 1")]
    BadIndex,
    #[error("side must be ct or t")]
    BadSide,
    #[error("type must be best or worst")]
    BadType,
    #[error("one of index, type or random is required")]
    MissingSelection,
    #[error("index, type and random cannot be used together")]
    Conflicting,
    #[error("side can only be used with index")]
    SideWithoutIndex,
}

/// Which spawn point to pick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnSelection {
    /// Numbered point, of `side` or the caller's team
    Index { index: usize, side: Option<Team> },
    /// Best or worst point of the caller's team
    Type(SpawnType),
    /// Any point of the caller's team
    Random,
}

/// Parse `.sp` tokens
///
/// Unrecognised tokens are ignored.
pub fn parse_spawn_args<S: AsRef<str>>(args: &[S]) -> Result<SpawnSelection, SpawnArgError> {
    let mut index = None;
    let mut side = None;
    let mut spawn_type = None;
    let mut random = false;

    for arg in args {
        let arg = arg.as_ref();
        if arg.eq_ignore_ascii_case("random") {
            random = true;
        } else if let Some(value) = arg.strip_prefix("index=") {
            match value.parse::<usize>() {
                Ok(n) if n >= 1 => index = Some(n),
                _ => return Err(SpawnArgError::BadIndex),
            }
        } else if let Some(value) = arg.strip_prefix("side=") {
            side = Some(Team::from_side(value).ok_or(SpawnArgError::BadSide)?);
        } else if let Some(value) = arg.strip_prefix("type=") {
            spawn_type = Some(value.parse().map_err(|_| SpawnArgError::BadType)?);
        }
    }

    let chosen = usize::from(index.is_some()) + usize::from(spawn_type.is_some()) + usize::from(random);
    if chosen == 0 {
        return Err(SpawnArgError::MissingSelection);
    }
    if chosen > 1 {
        return Err(SpawnArgError::Conflicting);
    }

    match (index, spawn_type) {
        (Some(index), _) => Ok(SpawnSelection::Index { index, side }),
        _ if side.is_some() => Err(SpawnArgError::SideWithoutIndex),
        (None, Some(spawn_type)) => Ok(SpawnSelection::Type(spawn_type)),
        (None, None) => Ok(SpawnSelection::Random),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selections() {
        assert_eq!(
            parse_spawn_args(&["index=2", "side=CT"]),
            Ok(SpawnSelection::Index {
                index: 2,
                side: Some(Team::CounterTerrorist)
            })
        );
        assert_eq!(
            parse_spawn_args(&["type=worst"]),
            Ok(SpawnSelection::Type(SpawnType::Worst))
        );
        assert_eq!(parse_spawn_args(&["Random", "extra"]), Ok(SpawnSelection::Random));
    }

    #[test]
    fn test_usage_errors() {
        assert_eq!(parse_spawn_args(&["index=0"]), Err(SpawnArgError::BadIndex));
        assert_eq!(parse_spawn_args(&["index=x"]), Err(SpawnArgError::BadIndex));
        assert_eq!(parse_spawn_args(&["side=spec"]), Err(SpawnArgError::BadSide));
        assert_eq!(parse_spawn_args(&["type=mid"]), Err(SpawnArgError::BadType));
        assert_eq!(
            parse_spawn_args::<&str>(&[]),
            Err(SpawnArgError::MissingSelection)
        );
        assert_eq!(
            parse_spawn_args(&["index=1", "random"]),
            Err(SpawnArgError::Conflicting)
        );
        assert_eq!(
            parse_spawn_args(&["type=best", "side=t"]),
            Err(SpawnArgError::SideWithoutIndex)
        );
    }
}
