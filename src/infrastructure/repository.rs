//! File system repository
//!
//! Layout of a workspace:
//!
//! ```text
//! <root>/.lifeos/config.toml
//! <root>/.lifeos/stores/<key>.json
//! ```

use crate::domain::Persisted;
use crate::error::{LifeosError, Result};
use crate::infrastructure::config::DATA_DIR;
use crate::infrastructure::{snapshot, Config};
use chrono::Utc;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

const STORES_DIR: &str = "stores";
pub const ROOT_ENV: &str = "LIFEOS_ROOT";

/// Abstract repository for workspace-level operations
pub trait WorkspaceRepository {
    /// Get the root directory of this workspace
    fn root(&self) -> &Path;

    /// Load configuration from .lifeos/config.toml
    fn load_config(&self) -> Result<Config>;

    /// Save configuration to .lifeos/config.toml
    fn save_config(&self, config: &Config) -> Result<()>;

    /// Check if .lifeos directory exists
    fn is_initialized(&self) -> bool;

    /// Create .lifeos directory structure
    fn initialize(&self) -> Result<()>;
}

/// File system implementation of WorkspaceRepository
#[derive(Debug, Clone)]
pub struct FileSystemRepository {
    pub root: PathBuf,
}

impl FileSystemRepository {
    /// Create a new repository with the given root directory
    pub fn new(root: PathBuf) -> Self {
        FileSystemRepository { root }
    }

    /// Discover workspace root.
    /// LIFEOS_ROOT wins; otherwise walk up from the current directory.
    pub fn discover() -> Result<Self> {
        if let Ok(root_path) = std::env::var(ROOT_ENV) {
            let path = PathBuf::from(root_path);
            if Self::has_data_dir(&path) {
                return Ok(FileSystemRepository::new(path));
            }
            return Err(LifeosError::Config(format!(
                "LIFEOS_ROOT is set to '{}' but no .lifeos directory found. \
                Run 'lifeos init' in that directory or unset LIFEOS_ROOT.",
                path.display()
            )));
        }

        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    /// Discover workspace root by walking up from a specific starting directory
    pub fn discover_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();

        loop {
            if Self::has_data_dir(&current) {
                debug!("event=discover status=ok root={}", current.display());
                return Ok(FileSystemRepository::new(current));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Err(LifeosError::NotLifeosDirectory(start.to_path_buf())),
            }
        }
    }

    fn has_data_dir(path: &Path) -> bool {
        path.join(DATA_DIR).is_dir()
    }

    fn stores_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR).join(STORES_DIR)
    }

    /// Snapshot file for a store key
    pub fn snapshot_path(&self, key: &str) -> PathBuf {
        self.stores_dir().join(format!("{}.json", key))
    }

    pub fn has_snapshot(&self, key: &str) -> bool {
        self.snapshot_path(key).is_file()
    }

    /// Load a store state; a store never written loads empty
    pub fn load<S: Persisted>(&self) -> Result<S> {
        let path = self.snapshot_path(S::KEY);
        if !path.exists() {
            debug!("event=load key={} status=empty", S::KEY);
            return Ok(S::default());
        }

        let text = fs::read_to_string(&path)?;
        let state: S = snapshot::decode(S::KEY, &text)?;
        debug!(
            "event=load key={} status=ok records={}",
            S::KEY,
            state.record_count()
        );
        Ok(state)
    }

    /// Persist the whole state under its key
    pub fn save<S: Persisted>(&self, state: &S) -> Result<()> {
        let text = snapshot::encode(state, Utc::now())?;
        self.write_atomic(&self.snapshot_path(S::KEY), &text)?;
        info!(
            "event=save key={} status=ok records={}",
            S::KEY,
            state.record_count()
        );
        Ok(())
    }

    /// Load, apply `f`, and persist only if `f` succeeds
    pub fn mutate<S, T, F>(&self, f: F) -> Result<T>
    where
        S: Persisted,
        F: FnOnce(&mut S) -> Result<T>,
    {
        let mut state: S = self.load()?;
        let outcome = f(&mut state)?;
        self.save(&state)?;
        Ok(outcome)
    }

    /// Write via a temp file in the same directory, then rename into place.
    ///
    /// On Windows, `rename` does not overwrite existing files, so the
    /// destination is removed first.
    fn write_atomic(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_name = format!(
            "{}.lifeos-tmp-{}",
            path.file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("store.json"),
            std::process::id()
        );
        let tmp_path = path.with_file_name(tmp_name);

        fs::write(&tmp_path, content)?;

        if cfg!(windows) && path.exists() {
            fs::remove_file(path)?;
        }

        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

impl WorkspaceRepository for FileSystemRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn load_config(&self) -> Result<Config> {
        Config::load_from_dir(&self.root)
    }

    fn save_config(&self, config: &Config) -> Result<()> {
        config.save_to_dir(&self.root)
    }

    fn is_initialized(&self) -> bool {
        Self::has_data_dir(&self.root)
    }

    fn initialize(&self) -> Result<()> {
        let data_dir = self.root.join(DATA_DIR);

        if data_dir.exists() {
            return Err(LifeosError::Config(format!(
                "Directory already initialized: {}",
                self.root.display()
            )));
        }

        fs::create_dir_all(self.stores_dir())?;
        info!("event=initialize status=ok root={}", self.root.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::network::{NetworkState, RelationshipDraft};
    use crate::domain::productivity::{TaskDraft, TaskStore};
    use std::ffi::OsString;
    use std::sync::{Mutex, OnceLock};
    use tempfile::TempDir;

    fn env_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    struct EnvVarRestore {
        key: &'static str,
        previous: Option<OsString>,
    }

    impl EnvVarRestore {
        fn capture(key: &'static str) -> Self {
            Self {
                key,
                previous: std::env::var_os(key),
            }
        }
    }

    impl Drop for EnvVarRestore {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                std::env::set_var(self.key, value);
            } else {
                std::env::remove_var(self.key);
            }
        }
    }

    fn initialized() -> (TempDir, FileSystemRepository) {
        let temp = TempDir::new().unwrap();
        let repo = FileSystemRepository::new(temp.path().to_path_buf());
        repo.initialize().unwrap();
        (temp, repo)
    }

    fn task(title: &str) -> TaskDraft {
        serde_json::from_value(serde_json::json!({ "title": title })).unwrap()
    }

    #[test]
    fn test_initialize_creates_data_dirs() {
        let temp = TempDir::new().unwrap();
        let repo = FileSystemRepository::new(temp.path().to_path_buf());
        assert!(!repo.is_initialized());

        repo.initialize().unwrap();
        assert!(repo.is_initialized());
        assert!(temp.path().join(".lifeos/stores").is_dir());
    }

    #[test]
    fn test_initialize_twice_fails() {
        let (_temp, repo) = initialized();
        assert!(repo.initialize().is_err());
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let (temp, _repo) = initialized();
        let nested = temp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();

        let found = FileSystemRepository::discover_from(&nested).unwrap();
        assert_eq!(found.root, temp.path());
    }

    #[test]
    fn test_discover_fails_without_workspace() {
        let temp = TempDir::new().unwrap();
        match FileSystemRepository::discover_from(temp.path()) {
            Err(LifeosError::NotLifeosDirectory(path)) => assert_eq!(path, temp.path()),
            other => panic!("Expected NotLifeosDirectory, got {:?}", other),
        }
    }

    #[test]
    fn test_discover_prefers_env_root() {
        let _guard = env_test_lock().lock().unwrap();
        let _restore = EnvVarRestore::capture(ROOT_ENV);
        let (temp, _repo) = initialized();

        std::env::set_var(ROOT_ENV, temp.path());
        let found = FileSystemRepository::discover().unwrap();
        assert_eq!(found.root, temp.path());
    }

    #[test]
    fn test_discover_rejects_env_root_without_workspace() {
        let _guard = env_test_lock().lock().unwrap();
        let _restore = EnvVarRestore::capture(ROOT_ENV);
        let temp = TempDir::new().unwrap();

        std::env::set_var(ROOT_ENV, temp.path());
        match FileSystemRepository::discover() {
            Err(LifeosError::Config(msg)) => assert!(msg.contains("LIFEOS_ROOT")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_store_is_empty() {
        let (_temp, repo) = initialized();
        let store: TaskStore = repo.load().unwrap();
        assert!(store.is_empty());
        assert!(!repo.has_snapshot("productivity"));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (_temp, repo) = initialized();
        let mut store = TaskStore::new();
        store.add(task("one"), Utc::now());
        store.add(task("two"), Utc::now());

        repo.save(&store).unwrap();
        assert!(repo.has_snapshot("productivity"));

        let loaded: TaskStore = repo.load().unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_mutate_persists_on_success() {
        let (_temp, repo) = initialized();
        let id = repo
            .mutate(|store: &mut TaskStore| Ok(store.add(task("persist me"), Utc::now()).id.clone()))
            .unwrap();

        let loaded: TaskStore = repo.load().unwrap();
        assert_eq!(loaded.get(id.as_str()).unwrap().title, "persist me");
    }

    #[test]
    fn test_mutate_discards_on_error() {
        let (_temp, repo) = initialized();
        let result = repo.mutate(|state: &mut NetworkState| {
            state.relationships.add(
                RelationshipDraft {
                    name: "Ghost".to_string(),
                    circle: Default::default(),
                    email: None,
                    phone: None,
                    last_contact: None,
                    tags: Vec::new(),
                },
                Utc::now(),
            );
            state.delete_relationship("missing").map(|_| ())
        });

        assert!(result.is_err());
        assert!(!repo.has_snapshot("network"));
    }

    #[test]
    fn test_corrupt_snapshot_is_reported() {
        let (_temp, repo) = initialized();
        fs::write(repo.snapshot_path("productivity"), "{ nope").unwrap();

        match repo.load::<TaskStore>() {
            Err(LifeosError::Snapshot { key, .. }) => assert_eq!(key, "productivity"),
            other => panic!("Expected Snapshot error, got {:?}", other),
        }
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_files() {
        let (_temp, repo) = initialized();
        repo.save(&TaskStore::new()).unwrap();
        repo.save(&TaskStore::new()).unwrap();

        let names: Vec<String> = fs::read_dir(repo.stores_dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["productivity.json".to_string()]);
    }
}
