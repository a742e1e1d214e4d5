//! Config management use case

use crate::error::{LifeosError, Result};
use crate::infrastructure::{Config, FileSystemRepository, WorkspaceRepository};

const KEYS: &str = "owner, upcoming_days";

/// Service for reading and changing workspace configuration
pub struct ConfigService {
    repository: FileSystemRepository,
}

impl ConfigService {
    /// Create a new config service
    pub fn new(repository: FileSystemRepository) -> Self {
        ConfigService { repository }
    }

    /// Get a single config value
    pub fn get(&self, key: &str) -> Result<String> {
        let config = self.repository.load_config()?;

        match key {
            "owner" => Ok(config.owner),
            "upcoming_days" => Ok(config.upcoming_days.to_string()),
            _ => Err(unknown_key(key)),
        }
    }

    /// Set a config value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut config = self.repository.load_config()?;

        match key {
            "owner" => {
                let owner = value.trim();
                if owner.is_empty() {
                    return Err(LifeosError::Config("Owner cannot be empty".to_string()));
                }
                config.owner = owner.to_string();
            }
            "upcoming_days" => {
                config.upcoming_days = value.trim().parse().map_err(|_| {
                    LifeosError::Config(format!(
                        "Invalid upcoming_days: '{}'. Expected a whole number of days",
                        value
                    ))
                })?;
            }
            "created" => {
                return Err(LifeosError::Config(
                    "Cannot modify 'created' field (read-only)".to_string(),
                ));
            }
            _ => return Err(unknown_key(key)),
        }

        self.repository.save_config(&config)?;
        Ok(())
    }

    /// List all config values
    pub fn list(&self) -> Result<Config> {
        self.repository.load_config()
    }
}

fn unknown_key(key: &str) -> LifeosError {
    LifeosError::Config(format!(
        "Unknown config key: '{}'. Valid keys are: {}",
        key, KEYS
    ))
}
