//! Process-wide plugin slot
//!
//! The engine binding calls these from its exported hooks. The plugin lives
//! behind a mutex so load, unload and the per-frame entry points can be
//! called from free functions.

use std::path::Path;
use std::time::Instant;

use parking_lot::Mutex;

use cs2prac_core::config::{plugin_config_path, PluginConfig, PracticeConfig};

use crate::host::GameHost;
use crate::plugin::PracticePlugin;

static PLUGIN: Mutex<Option<PracticePlugin>> = Mutex::new(None);

/// Load the config and start the plugin
///
/// A missing config file is created with defaults; an unreadable one falls
/// back to defaults. Any running instance is shut down first.
pub fn load(host: Box<dyn GameHost>, base_dir: &Path) {
    let config_path = plugin_config_path(base_dir, PracticeConfig::PLUGIN_NAME);
    let config = match PracticeConfig::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config, using defaults: {}", e);
            PracticeConfig::default()
        }
    };

    crate::init_logging(config.debug);

    let now = Instant::now();
    let mut slot = PLUGIN.lock();
    if let Some(mut old) = slot.take() {
        old.shutdown(now);
    }
    *slot = Some(PracticePlugin::load(config, host, base_dir, now));
}

/// Shut the plugin down, flushing playtime and stopping the store
pub fn unload() {
    if let Some(mut plugin) = PLUGIN.lock().take() {
        plugin.shutdown(Instant::now());
    }
}

/// Whether a plugin instance is running
pub fn is_loaded() -> bool {
    PLUGIN.lock().is_some()
}

/// Run `f` against the running plugin
///
/// Returns `None` when the plugin is not loaded.
pub fn with_plugin<R>(f: impl FnOnce(&mut PracticePlugin) -> R) -> Option<R> {
    PLUGIN.lock().as_mut().map(f)
}
