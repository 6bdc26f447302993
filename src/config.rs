use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ViewError;

pub const SETTINGS_FILE: &str = "settings.json";

/// Viewer preferences stored between runs
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ViewSettings {
    /// Identity of the local user (e.g. "alice@"), used for the memo budget
    #[serde(default)]
    pub local_identity: Option<String>,
    /// Render times in UTC instead of the local timezone
    #[serde(default)]
    pub use_utc: bool,
}

pub fn settings_path() -> Option<PathBuf> {
    if let Some(proj) = ProjectDirs::from("com", "memochat", "memochat-view") {
        let dir = proj.config_dir();
        if let Err(e) = fs::create_dir_all(dir) {
            log::warn!("Failed to create config dir {}: {}", dir.display(), e);
            return None;
        }
        return Some(dir.join(SETTINGS_FILE));
    }
    None
}

pub fn load_settings() -> ViewSettings {
    match settings_path() {
        Some(path) => load_settings_from(&path),
        None => ViewSettings::default(),
    }
}

/// Load settings from `path`, falling back to defaults when missing or invalid.
pub fn load_settings_from(path: &Path) -> ViewSettings {
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<ViewSettings>(&content) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Failed to parse settings file {}: {err}", path.display());
                ViewSettings::default()
            }
        },
        Err(err) => {
            log::info!(
                "Settings file {} not found ({err}); using defaults",
                path.display()
            );
            ViewSettings::default()
        }
    }
}

pub fn save_settings(settings: &ViewSettings) -> Result<(), ViewError> {
    let path = settings_path().ok_or(ViewError::NoConfigDir)?;
    save_settings_to(&path, settings)
}

pub fn save_settings_to(path: &Path, settings: &ViewSettings) -> Result<(), ViewError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let data = serde_json::to_string_pretty(settings)?;
    fs::write(path, data)?;
    Ok(())
}
