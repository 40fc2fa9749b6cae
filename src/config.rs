//! Application paths and persisted settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Resolved configuration directory.
#[derive(Clone, Debug)]
pub struct PathConfig {
    pub config_dir: PathBuf,
}

impl PathConfig {
    /// Resolve from a CLI override, falling back to the platform config
    /// dir, then to the current directory.
    pub fn from_env_and_cli(cli_override: Option<PathBuf>) -> Self {
        let config_dir = cli_override
            .or_else(|| dirs_next::config_dir().map(|d| d.join("showreel")))
            .unwrap_or_else(|| PathBuf::from("."));
        Self { config_dir }
    }
}

/// Path of a config file, creating the directory if needed.
pub fn config_file(name: &str, config: &PathConfig) -> PathBuf {
    ensure_dir(&config.config_dir);
    config.config_dir.join(name)
}

/// Path of a data file (logs etc.); same root as config for this app.
pub fn data_file(name: &str, config: &PathConfig) -> PathBuf {
    config_file(name, config)
}

fn ensure_dir(dir: &Path) {
    if let Err(e) = std::fs::create_dir_all(dir) {
        log::warn!("Could not create config dir {}: {}", dir.display(), e);
    }
}

/// Settings persisted through eframe storage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Debug readout of the reel indices on the stage.
    pub show_clip_numbers: bool,
    /// Extra scroll range below the stage, as a multiple of its height.
    pub page_tail_factor: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            show_clip_numbers: false,
            page_tail_factor: 1.0,
        }
    }
}
