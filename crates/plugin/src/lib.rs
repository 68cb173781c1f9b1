//! cs2prac - Practice server plugin
//!
//! Wires the core bookkeeping to the game through the [`GameHost`] trait.
//! The engine binding forwards events to [`PracticePlugin`] (directly or
//! through the [`runtime`] slot) and implements [`GameHost`] on top of the
//! engine API.

mod commands;
pub mod host;
mod plugin;
pub mod runtime;
pub mod state;

#[cfg(test)]
mod mock;

pub use host::{GameHost, LiveBot, Pose};
pub use plugin::{PracticePlugin, RESPAWN_DELAY};
pub use state::{PracticeState, CHAT_PREFIX};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins when set. Repeated calls are harmless.
pub fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
