//! User-facing system log entries kept as records

use crate::domain::record::{merge, Record, RecordId, Timestamps};
use crate::domain::store::{Persisted, Store};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!(
                "Invalid log level: '{}'. Valid levels are: debug, info, warn, error",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: RecordId,
    pub level: LogLevel,
    pub source: String,
    pub message: String,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogEntryDraft {
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default = "default_source")]
    pub source: String,
    pub message: String,
}

fn default_source() -> String {
    "user".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogEntryPatch {
    pub level: Option<LogLevel>,
    pub source: Option<String>,
    pub message: Option<String>,
}

impl Record for LogEntry {
    type Draft = LogEntryDraft;
    type Patch = LogEntryPatch;
    const KIND: &'static str = "log entry";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn create(id: RecordId, draft: LogEntryDraft, now: DateTime<Utc>) -> Self {
        LogEntry {
            id,
            level: draft.level,
            source: draft.source,
            message: draft.message,
            stamps: Timestamps::new(now),
        }
    }

    fn apply(&mut self, patch: LogEntryPatch) {
        merge(&mut self.level, patch.level);
        merge(&mut self.source, patch.source);
        merge(&mut self.message, patch.message);
    }

    fn timestamps(&self) -> &Timestamps {
        &self.stamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }

    fn summary(&self) -> String {
        format!(
            "{} {:<5} [{}] {}",
            self.stamps.created_at.format("%d-%m-%Y %H:%M"),
            format!("{:?}", self.level).to_uppercase(),
            self.source,
            self.message
        )
    }
}

pub type LogStore = Store<LogEntry>;

impl Persisted for Store<LogEntry> {
    const KEY: &'static str = "system-logs";

    fn seed(now: DateTime<Utc>) -> Self {
        let mut store = Store::new();
        let entries = [
            (LogLevel::Info, "sync", "Calendar sync completed", 3),
            (LogLevel::Warn, "backup", "Backup drive nearly full", 2),
            (LogLevel::Error, "thermostat", "Device did not respond", 1),
        ];
        for (level, source, message, hours_ago) in entries {
            store.add(
                LogEntryDraft {
                    level,
                    source: source.to_string(),
                    message: message.to_string(),
                },
                now - Duration::hours(hours_ago),
            );
        }
        store
    }

    fn record_count(&self) -> usize {
        self.len()
    }
}

impl Store<LogEntry> {
    /// Entries at or above `level`, newest first
    pub fn at_or_above(&self, level: LogLevel) -> Vec<&LogEntry> {
        let mut found = self.filter(|e| e.level >= level);
        found.sort_by(|a, b| b.stamps.created_at.cmp(&a.stamps.created_at));
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 2, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_level_parse() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_at_or_above_newest_first() {
        let store = LogStore::seed(now());
        let warn: Vec<LogLevel> = store
            .at_or_above(LogLevel::Warn)
            .iter()
            .map(|e| e.level)
            .collect();
        assert_eq!(warn, vec![LogLevel::Error, LogLevel::Warn]);
        assert_eq!(store.at_or_above(LogLevel::Debug).len(), 3);
    }

    #[test]
    fn test_clear() {
        let mut store = LogStore::seed(now());
        assert_eq!(store.clear(), 3);
        assert!(store.is_empty());
    }
}
