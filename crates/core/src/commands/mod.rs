//! Chat command recognition and argument parsing
//!
//! Chat messages are matched against the trigger characters in [`chat`],
//! split into a [`CommandInfo`], and the arguments of the structured
//! commands are parsed here:
//!
//! - [`BotSpawnArgs`] for `.bot spawn`
//! - [`RethrowArgs`] for `.rethrow` / `.rt` / `.ct`
//! - [`TeleportArgs`] for `.tp`
//! - [`parse_spawn_args`] for `.sp` / `.s`
//! - [`GameMode`] for `.gm`
//!
//! # Example
//!
//! ```ignore
//! use cs2prac_core::commands::{chat, BotSpawnArgs};
//!
//! if let Some((_silent, text)) = chat::check_chat_trigger(".bot spawn Alpha side ct") {
//!     let (name, args) = chat::parse_chat_command(text);
//!     assert_eq!(name, "bot");
//!     let spawn = BotSpawnArgs::parse(&args[2..]);
//!     assert_eq!(spawn.name.as_deref(), Some("Alpha"));
//! }
//! ```

mod bot;
pub mod chat;
mod gamemode;
mod info;
mod rethrow;
mod spawn;
mod teleport;

pub use bot::BotSpawnArgs;
pub use gamemode::{GameMode, UnknownGameMode};
pub use info::{CommandContext, CommandInfo, CommandResult};
pub use rethrow::{RethrowArgs, RethrowConflict, RethrowPlan};
pub use spawn::{parse_spawn_args, SpawnArgError, SpawnSelection};
pub use teleport::{
    parse_coordinates, parse_player_pair, PlayerSelector, TeleportArgError, TeleportArgs,
    TeleportTarget,
};
