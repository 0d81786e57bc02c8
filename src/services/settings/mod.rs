//! Persisted application settings.
//!
//! Small TOML file in the platform config directory: which clinic is
//! active, which agenda view was last used. A missing or corrupt file is
//! replaced by defaults, never a startup failure.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub active_clinic: String,
    pub current_view: String,
    pub theme: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            active_clinic: "clinic-main".to_string(),
            current_view: "Day".to_string(),
            theme: "light".to_string(),
        }
    }
}

pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Settings file under the platform config dir, or `None` when the
    /// platform provides no home (headless CI).
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "clinic-agenda")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
    }

    /// Directory holding per-clinic schedule documents.
    pub fn schedule_config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "clinic-agenda")
            .map(|dirs| dirs.config_dir().join("clinics"))
    }

    /// Load settings, falling back to defaults on any problem.
    pub fn load(&self) -> AppSettings {
        match self.try_load() {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Using default settings: {err:#}");
                AppSettings::default()
            }
        }
    }

    fn try_load(&self) -> Result<AppSettings> {
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings file {:?}", self.path))?;
        let settings: AppSettings =
            toml::from_str(&raw).context("Failed to parse settings file")?;
        Ok(settings)
    }

    /// Persist settings, creating parent directories as needed.
    pub fn save(&self, settings: &AppSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir {parent:?}"))?;
        }
        let raw = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write settings file {:?}", self.path))?;
        Ok(())
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
