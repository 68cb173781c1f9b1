//! Config path resolution
//!
//! Handles resolving paths for configuration and data files relative to the
//! plugin's install directory.

use std::path::{Path, PathBuf};

use super::{ConfigError, ConfigResult};

/// Returns the plugin base directory by navigating up from the loaded binary.
///
/// The plugin is loaded from:
/// `game/csgo/addons/cs2prac/bin/linuxsteamrt64/cs2prac.so`
///
/// This navigates up 3 levels to reach:
/// `game/csgo/addons/cs2prac/`
pub fn plugin_base_dir() -> ConfigResult<PathBuf> {
    let exe = std::env::current_exe().map_err(ConfigError::IoError)?;

    // Navigate: cs2prac.so -> linuxsteamrt64 -> bin -> cs2prac
    exe.parent() // linuxsteamrt64/
        .and_then(|p| p.parent()) // bin/
        .and_then(|p| p.parent()) // cs2prac/
        .map(PathBuf::from)
        .ok_or(ConfigError::NoConfigDirectory)
}

/// Returns the configs directory under a base directory.
///
/// Path: `{base}/configs/`
pub fn configs_dir(base: &Path) -> PathBuf {
    base.join("configs")
}

/// Returns the directory holding one plugin's files.
///
/// Path: `{base}/configs/plugins/{plugin_name}/`
pub fn plugin_dir(base: &Path, plugin_name: &str) -> PathBuf {
    configs_dir(base).join("plugins").join(plugin_name)
}

/// Returns the path for a plugin's TOML config file.
///
/// Path: `{base}/configs/plugins/{plugin_name}/{plugin_name}.toml`
pub fn plugin_config_path(base: &Path, plugin_name: &str) -> PathBuf {
    plugin_dir(base, plugin_name).join(format!("{}.toml", plugin_name))
}

/// Resolve a data file named in the config.
///
/// Absolute paths are kept as-is; relative ones land in the plugin directory.
pub fn resolve_data_path(base: &Path, plugin_name: &str, file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        plugin_dir(base, plugin_name).join(path)
    }
}
