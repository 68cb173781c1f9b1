//! cs2prac - Core Logic
//!
//! Host-independent bookkeeping for the CS2 practice plugin: command
//! parsing, grenade history, playtime accounting, teleport and watch
//! requests, localization, the admin list, managed bots, map spawn points
//! and persistence.
//!
//! Every component is a plain struct mutated through `&mut self` on the main
//! thread. Background work (SQLite) rejoins through [`tasks::TaskQueue`], and
//! periodic work is driven by [`timers::Timers`].
//!
//! # Re-exports
//!
//! - [`sdk`] - identity, handle and math value types

pub use cs2prac_sdk as sdk;

pub mod admins;
pub mod bots;
pub mod commands;
pub mod config;
pub mod grenades;
pub mod localization;
pub mod playtime;
pub mod requests;
pub mod settings;
pub mod spawns;
pub mod store;
pub mod tasks;
pub mod timers;
pub mod world;

// Re-export commonly used items
pub use admins::{AdminError, AdminStore};
pub use bots::{BotRegistry, BotSpawnInfo, RespawnPlan};
pub use commands::{
    BotSpawnArgs, CommandContext, CommandInfo, CommandResult, GameMode, RethrowArgs, RethrowPlan,
    SpawnSelection, TeleportArgs,
};
pub use config::{ConfigError, ConfigResult, PluginConfig, PracticeConfig};
pub use grenades::{GrenadeHistory, GrenadeKind, ThrowRecord, ThrowSnapshot};
pub use localization::{Catalog, Language, Localizer};
pub use playtime::{PlaytimeDelta, PlaytimeTracker, SessionEnd};
pub use requests::{Accepted, PendingRequest, RequestError, RequestKind, RequestRegistry};
pub use settings::{PlayerSettings, PracticeFlags};
pub use spawns::{SpawnPoint, SpawnTable, SpawnType};
pub use store::{Database, PlayerData, StoreError, StoreHandle, StoreWorker};
pub use tasks::{QueueError, TaskQueue, TaskSender};
pub use timers::{TimerFlags, TimerKey, Timers};

#[cfg(test)]
mod tests {
    #[test]
    fn test_sdk_types_exist() {
        use crate::sdk::{EntityHandle, SteamId};
        assert!(!EntityHandle::invalid().is_valid());
        assert_eq!(SteamId::new(1).as_u64(), 1);
    }
}
