//! Error types for lifeos

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for lifeos
#[derive(Debug, Error)]
pub enum LifeosError {
    #[error("Not a lifeos directory: {0}")]
    NotLifeosDirectory(PathBuf),

    #[error("No {kind} with id '{id}'")]
    RecordNotFound { kind: &'static str, id: String },

    #[error("Id prefix '{prefix}' matches {matches} {kind} records")]
    AmbiguousId {
        kind: &'static str,
        prefix: String,
        matches: usize,
    },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Unknown store kind: {0}")]
    UnknownKind(String),

    #[error("Operation '{operation}' is not supported for {kind}")]
    Unsupported {
        kind: &'static str,
        operation: &'static str,
    },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Snapshot '{key}' is unreadable: {message}")]
    Snapshot { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl LifeosError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            LifeosError::NotLifeosDirectory(_) => 2,
            LifeosError::RecordNotFound { .. } | LifeosError::AmbiguousId { .. } => 3,
            LifeosError::InvalidRecord(_) | LifeosError::InvalidQuery(_) => 4,
            LifeosError::UnknownKind(_) => 5,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            LifeosError::NotLifeosDirectory(path) => {
                format!(
                    "Not a lifeos directory: {}\n\n\
                    Suggestions:\n\
                    • Run 'lifeos init' in this directory to create a workspace\n\
                    • Navigate to an existing lifeos directory\n\
                    • Set LIFEOS_ROOT environment variable to your workspace path",
                    path.display()
                )
            }
            LifeosError::RecordNotFound { .. } => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Run 'lifeos list <kind>' to see existing ids\n\
                    • Ids may be abbreviated to any unique prefix",
                    self
                )
            }
            LifeosError::AmbiguousId { .. } => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Type more characters of the id",
                    self
                )
            }
            LifeosError::UnknownKind(_) => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Run 'lifeos kinds' to see available store kinds\n\
                    • Examples: tasks, events, relationships, signals",
                    self
                )
            }
            LifeosError::InvalidRecord(_) => {
                format!(
                    "{}\n\n\
                    Records are passed as JSON objects, for example:\n\
                    lifeos add tasks '{{\"title\": \"Renew passport\", \"priority\": \"high\"}}'\n\
                    lifeos update tasks 3f2a '{{\"status\": \"in-progress\"}}'",
                    self
                )
            }
            LifeosError::InvalidQuery(_) => {
                format!(
                    "{}\n\n\
                    Tag queries combine tags with AND, OR and NOT.\n\
                    Example: lifeos list tasks --tag 'work AND NOT someday'",
                    self
                )
            }
            LifeosError::Config(msg) => {
                if msg.contains("date format") {
                    format!(
                        "{}\n\n\
                        Expected format: DD-MM-YYYY\n\
                        Example: lifeos balance --from 01-01-2025 --to 31-01-2025",
                        msg
                    )
                } else {
                    msg.clone()
                }
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using LifeosError
pub type Result<T> = std::result::Result<T, LifeosError>;
