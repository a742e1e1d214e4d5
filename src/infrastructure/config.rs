//! Configuration management

use crate::error::{LifeosError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DATA_DIR: &str = ".lifeos";
const CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_UPCOMING_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub owner: String,
    /// Window used by `upcoming` when no `--days` is given
    #[serde(default = "default_upcoming_days")]
    pub upcoming_days: u32,
    pub created: DateTime<Utc>,
}

fn default_upcoming_days() -> u32 {
    DEFAULT_UPCOMING_DAYS
}

impl Config {
    /// Create a new config; the owner falls back to the login name
    pub fn new(owner: Option<String>) -> Self {
        Config {
            owner: owner.unwrap_or_else(Self::detect_owner),
            upcoming_days: DEFAULT_UPCOMING_DAYS,
            created: Utc::now(),
        }
    }

    /// Load config from .lifeos/config.toml in the given directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(DATA_DIR).join(CONFIG_FILE);

        let contents = fs::read_to_string(&config_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LifeosError::NotLifeosDirectory(path.to_path_buf())
            } else {
                LifeosError::Io(e)
            }
        })?;

        toml::from_str(&contents)
            .map_err(|e| LifeosError::Config(format!("Failed to parse config.toml: {}", e)))
    }

    /// Save config to .lifeos/config.toml in the given directory
    pub fn save_to_dir(&self, path: &Path) -> Result<()> {
        let data_dir = path.join(DATA_DIR);
        if !data_dir.exists() {
            fs::create_dir(&data_dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(data_dir.join(CONFIG_FILE), contents)?;

        Ok(())
    }

    fn detect_owner() -> String {
        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "me".to_string())
    }
}
