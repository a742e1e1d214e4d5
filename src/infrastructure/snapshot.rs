//! Versioned JSON envelope around a persisted store state

use crate::error::{LifeosError, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct Envelope<'a, S> {
    version: u32,
    saved_at: DateTime<Utc>,
    state: &'a S,
}

/// Serialize `state` into a pretty-printed snapshot document
pub fn encode<S: Serialize>(state: &S, saved_at: DateTime<Utc>) -> Result<String> {
    let envelope = Envelope {
        version: SNAPSHOT_VERSION,
        saved_at,
        state,
    };
    let mut text = serde_json::to_string_pretty(&envelope)?;
    text.push('\n');
    Ok(text)
}

/// Parse a snapshot document written under `key`
pub fn decode<S: DeserializeOwned>(key: &str, text: &str) -> Result<S> {
    let corrupt = |message: String| LifeosError::Snapshot {
        key: key.to_string(),
        message,
    };

    let mut document: serde_json::Value =
        serde_json::from_str(text).map_err(|e| corrupt(e.to_string()))?;

    let version = document
        .get("version")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| corrupt("missing version".to_string()))?;
    if version != u64::from(SNAPSHOT_VERSION) {
        return Err(corrupt(format!(
            "unsupported version {} (expected {})",
            version, SNAPSHOT_VERSION
        )));
    }

    let state = document
        .get_mut("state")
        .map(serde_json::Value::take)
        .ok_or_else(|| corrupt("missing state".to_string()))?;

    serde_json::from_value(state).map_err(|e| corrupt(e.to_string()))
}
