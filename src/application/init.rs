//! Initialize workspace use case

use crate::application::seed::{seed_workspace, SeedReport};
use crate::error::Result;
use crate::infrastructure::{Config, FileSystemRepository, WorkspaceRepository};
use chrono::Utc;
use std::fs;
use std::path::Path;

/// Outcome of `init`
#[derive(Debug)]
pub struct Initialized {
    pub config: Config,
    pub seeded: Option<SeedReport>,
}

/// Initialize a new workspace at the specified path, optionally filling
/// every store with sample data.
pub fn init(path: &Path, owner: Option<String>, seed: bool) -> Result<Initialized> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    let repo = FileSystemRepository::new(path.to_path_buf());
    repo.initialize()?;

    let config = Config::new(owner);
    repo.save_config(&config)?;

    let seeded = if seed {
        Some(seed_workspace(&repo, false, Utc::now())?)
    } else {
        None
    };

    Ok(Initialized { config, seeded })
}
