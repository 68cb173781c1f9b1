//! Player statistics persistence
//!
//! Two tables back the playtime and language features:
//!
//! ```text
//! players          steamid PK, name, total_playtime_seconds, language, last_seen
//! player_sessions  id PK, steamid FK, connect_time, disconnect_time, session_playtime_seconds
//! ```
//!
//! [`Database`] holds the async queries; [`StoreWorker`] runs them on a
//! background thread so the game thread never blocks on disk.

mod db;
mod queries;
mod worker;

pub use db::{open_pool, open_pool_in_memory, unix_timestamp, Database, StoreError};
pub use queries::PlayerData;
pub use worker::{StoreHandle, StoreWorker};
