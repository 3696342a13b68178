//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "formwork";
const APPLICATION: &str = "formwork-login";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory for logs.
///
/// - Linux: `$XDG_CACHE_HOME/formwork-login` or `~/.cache/formwork-login`
/// - macOS: `~/Library/Caches/dev.formwork.formwork-login`
/// - Windows: `C:\Users\<User>\AppData\Local\formwork\formwork-login\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the config directory for the message catalog.
///
/// - Linux: `$XDG_CONFIG_HOME/formwork-login` or `~/.config/formwork-login`
/// - macOS: `~/Library/Application Support/dev.formwork.formwork-login`
/// - Windows: `C:\Users\<User>\AppData\Roaming\formwork\formwork-login\config`
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the optional message catalog override.
pub fn messages_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("messages.json"))
}

/// Get the path to the latest log file.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("latest.log"))
}
