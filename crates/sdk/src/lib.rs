//! cs2prac SDK - Game Value Types
//!
//! This crate contains the plain value types exchanged between the practice
//! plugin core and the game host. It has no dependencies and compiles quickly,
//! allowing parallel compilation of dependent crates.
//!
//! # Modules
//!
//! - [`steam_id`] - 64-bit player identity
//! - [`math`] - World positions and view angles
//! - [`handle`] - Transient entity handles
//! - [`team`] - Team numbers

pub mod handle;
pub mod math;
pub mod steam_id;
pub mod team;

pub use handle::EntityHandle;
pub use math::{QAngle, Vector};
pub use steam_id::{ParseSteamIdError, SteamId};
pub use team::Team;
