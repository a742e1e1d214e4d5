//! Record identity, timestamps and the trait every stored entity implements

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Randomly generated record identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generate a fresh v4 identifier
    pub fn generate() -> Self {
        RecordId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId(value)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for RecordId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Creation and modification times carried by every record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Timestamps {
    pub fn new(now: DateTime<Utc>) -> Self {
        Timestamps {
            created_at: now,
            updated_at: now,
        }
    }
}

/// A stored entity with a draft shape for creation and a patch shape for
/// shallow-merge updates.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Fields accepted when creating a record
    type Draft: DeserializeOwned;

    /// Optional fields merged over an existing record
    type Patch: DeserializeOwned + Default;

    /// Singular human name of the record kind (e.g. "task")
    const KIND: &'static str;

    fn id(&self) -> &RecordId;

    /// Build a record from a draft. Timestamps are both set to `now`.
    fn create(id: RecordId, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Merge every supplied patch field over the current value.
    /// Nested values are replaced whole.
    fn apply(&mut self, patch: Self::Patch);

    fn timestamps(&self) -> &Timestamps;

    fn timestamps_mut(&mut self) -> &mut Timestamps;

    /// One line used by list output
    fn summary(&self) -> String;

    fn tags(&self) -> &[String] {
        &[]
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.timestamps_mut().updated_at = now;
    }
}

/// Records with a terminal state reachable through `complete`
pub trait Completable: Record {
    fn is_complete(&self) -> bool;

    /// Move the record into its terminal state. Already complete records
    /// keep their original completion data.
    fn complete(&mut self, now: DateTime<Utc>);
}

/// Overwrite `target` when the patch supplies a value
pub(crate) fn merge<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Merge a nullable patch field: absent keeps `target`, `null` clears it
pub(crate) fn merge_opt<T>(target: &mut Option<T>, value: Option<Option<T>>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Patch field deserializer that tells `null` apart from an absent key.
/// Pair with `#[serde(default)]` so a missing key stays `None`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_differ() {
        let a = RecordId::generate();
        let b = RecordId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_record_id_serializes_as_plain_string() {
        let id = RecordId::from("abc-123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc-123\"");
    }

    #[test]
    fn test_merge_only_overwrites_supplied_values() {
        let mut value = 3;
        merge(&mut value, None);
        assert_eq!(value, 3);
        merge(&mut value, Some(9));
        assert_eq!(value, 9);

        let mut note = Some("keep".to_string());
        merge_opt(&mut note, None);
        assert_eq!(note.as_deref(), Some("keep"));
        merge_opt(&mut note, Some(Some("new".to_string())));
        assert_eq!(note.as_deref(), Some("new"));
        merge_opt(&mut note, Some(None));
        assert_eq!(note, None);
    }

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        note: Option<Option<String>>,
    }

    #[test]
    fn test_nullable_distinguishes_null_from_missing() {
        let missing: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.note, None);

        let cleared: Patch = serde_json::from_str(r#"{"note": null}"#).unwrap();
        assert_eq!(cleared.note, Some(None));

        let set: Patch = serde_json::from_str(r#"{"note": "hi"}"#).unwrap();
        assert_eq!(set.note, Some(Some("hi".to_string())));
    }
}
