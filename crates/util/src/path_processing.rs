//! Path helpers for files Aisle keeps under the user's config directory.

use std::env;
use std::path::PathBuf;

use dirs_next::{config_dir, home_dir};

/// Directory name used under the platform config directory.
pub const APP_DIR_NAME: &str = "aisle";

/// Expand a leading `~` (Unix or Windows separator) to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    if trimmed == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = trimmed.strip_prefix("~/").or_else(|| trimmed.strip_prefix("~\\")) {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(trimmed)
}

/// `<config_dir>/aisle`, falling back to `./aisle` when no config dir exists.
pub fn app_config_dir() -> PathBuf {
    config_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR_NAME)
}

/// Resolve a file location: a non-blank `env_var` wins, otherwise
/// `<config_dir>/aisle/<file_name>`.
pub fn path_from_env_or_config(env_var: &str, file_name: &str) -> PathBuf {
    if let Ok(value) = env::var(env_var)
        && !value.trim().is_empty()
    {
        return expand_tilde(&value);
    }
    app_config_dir().join(file_name)
}
