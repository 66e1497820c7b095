//! Configuration module for SearchBox-RS
//!
//! Handles loading and validating settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

/// Global settings instance
static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Environment variable pointing at a settings file
pub const SETTINGS_PATH_ENV: &str = "SEARCHBOX_SETTINGS_PATH";

/// Initialize global settings, returning the stored copy
pub fn init(settings: Settings) -> Result<&'static Settings> {
    SETTINGS
        .set(settings)
        .map_err(|_| anyhow::anyhow!("Settings already initialized"))?;
    Ok(get())
}

/// Get a reference to the global settings.
///
/// Falls back to defaults when [`init`] was never called.
pub fn get() -> &'static Settings {
    SETTINGS.get_or_init(Settings::default)
}

/// Read settings from `path`, or the built-in defaults when there is none,
/// then apply env overrides and validate.
pub fn load(path: Option<&Path>) -> Result<Settings> {
    let mut settings = match path {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };

    settings.merge_env();
    settings.validate()?;
    Ok(settings)
}

/// Find the settings file: an explicit path, the environment, then the
/// usual locations.
pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(SETTINGS_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let mut candidates = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("searchbox-rs/settings.yml"));
    }

    candidates.into_iter().find(|p| p.exists())
}
