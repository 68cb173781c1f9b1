//! Grenade throw history
//!
//! Every throw by a human player is recorded with the pose needed to replay
//! it. Records are kept newest first with contiguous indices `1..=N`.

mod history;
mod kind;

pub use history::{GrenadeHistory, ThrowRecord, ThrowSnapshot, DEFAULT_HISTORY_CAPACITY};
pub use kind::{projectile_weapon_name, GrenadeKind, ALL_KINDS};
