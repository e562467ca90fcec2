//! Well-known filesystem locations
//!
//! Everything lives under a per-user `hudconfig` directory. Setting
//! `HUDCONFIG_DIR` relocates the store and the logs, which is how the
//! configurator and the renderer are pointed at a scratch profile.

use std::path::PathBuf;

/// Directory name under the platform config and runtime directories
pub const APP_DIR_NAME: &str = "hudconfig";

/// Environment variable overriding [`config_dir`]
pub const CONFIG_DIR_ENV: &str = "HUDCONFIG_DIR";

/// File name of the JSON store
pub const STORE_FILE_NAME: &str = "widgets.json";

/// Base directory for the store
pub fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Path of the JSON store
pub fn store_path() -> PathBuf {
    config_dir().join(STORE_FILE_NAME)
}

/// Directory for log files
pub fn log_dir() -> PathBuf {
    config_dir().join("logs")
}

/// Directory where reload listeners bind their sockets
///
/// Prefers the per-session runtime directory; platforms without one fall
/// back to the cache directory.
pub fn reload_socket_dir() -> PathBuf {
    dirs::runtime_dir()
        .or_else(dirs::cache_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
        .join("reload")
}
