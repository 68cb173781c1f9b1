//! Managed practice bots
//!
//! Bots spawned with `.bot spawn` are remembered with their position,
//! stance and weapon, and are put back in place every time they die.

mod info;
mod registry;

pub use info::{BotSpawnInfo, CROUCH_DROP, DEFAULT_BOT_WEAPON};
pub use registry::{BotRegistry, RespawnPlan, PENDING_SPAWN_WINDOW};
