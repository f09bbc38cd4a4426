//! XDG-style path utilities for the configuration directory.
//!
//! `XDG_CONFIG_HOME` is honoured on every platform so the layout matches
//! other terminal tools instead of OS-specific application folders.

use std::path::PathBuf;

use anyhow::{Result, anyhow};

const APP_DIR: &str = "havo-speak";

/// Returns the configuration directory for havo-speak.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/havo-speak` if `XDG_CONFIG_HOME` is set and non-empty
/// 2. `~/.config/havo-speak` otherwise
pub fn config_dir() -> Result<PathBuf> {
    match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => Ok(PathBuf::from(xdg).join(APP_DIR)),
        _ => Ok(home_dir()?.join(".config").join(APP_DIR)),
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow!("Failed to determine home directory"))
}
