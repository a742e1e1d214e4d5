//! Legacy planning: letters, wishes, asset notes, instructions

use crate::domain::record::{
    merge, merge_opt, nullable, Completable, Record, RecordId, Timestamps,
};
use crate::domain::store::{Persisted, Store};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegacyKind {
    Letter,
    Wish,
    Asset,
    Instruction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyEntry {
    pub id: RecordId,
    pub title: String,
    pub kind: LegacyKind,
    pub recipient: Option<String>,
    pub content: String,
    pub sealed: bool,
    pub sealed_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegacyEntryDraft {
    pub title: String,
    pub kind: LegacyKind,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegacyEntryPatch {
    pub title: Option<String>,
    pub kind: Option<LegacyKind>,
    #[serde(default, deserialize_with = "nullable")]
    pub recipient: Option<Option<String>>,
    pub content: Option<String>,
}

impl Record for LegacyEntry {
    type Draft = LegacyEntryDraft;
    type Patch = LegacyEntryPatch;
    const KIND: &'static str = "legacy entry";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn create(id: RecordId, draft: LegacyEntryDraft, now: DateTime<Utc>) -> Self {
        LegacyEntry {
            id,
            title: draft.title,
            kind: draft.kind,
            recipient: draft.recipient,
            content: draft.content,
            sealed: false,
            sealed_at: None,
            stamps: Timestamps::new(now),
        }
    }

    fn apply(&mut self, patch: LegacyEntryPatch) {
        merge(&mut self.title, patch.title);
        merge(&mut self.kind, patch.kind);
        merge_opt(&mut self.recipient, patch.recipient);
        merge(&mut self.content, patch.content);
    }

    fn timestamps(&self) -> &Timestamps {
        &self.stamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }

    fn summary(&self) -> String {
        let to = self
            .recipient
            .as_deref()
            .map(|r| format!(" for {}", r))
            .unwrap_or_default();
        let seal = if self.sealed { ", sealed" } else { "" };
        format!("{}{} ({:?}{})", self.title, to, self.kind, seal)
    }
}

impl Completable for LegacyEntry {
    fn is_complete(&self) -> bool {
        self.sealed
    }

    fn complete(&mut self, now: DateTime<Utc>) {
        if !self.sealed {
            self.sealed = true;
            self.sealed_at = Some(now);
        }
    }
}

pub type LegacyStore = Store<LegacyEntry>;

impl Persisted for Store<LegacyEntry> {
    const KEY: &'static str = "legacy";

    fn seed(now: DateTime<Utc>) -> Self {
        let drafts = vec![
            LegacyEntryDraft {
                title: "Letter to Leo at 18".to_string(),
                kind: LegacyKind::Letter,
                recipient: Some("Leo".to_string()),
                content: String::new(),
            },
            LegacyEntryDraft {
                title: "Where the insurance papers are".to_string(),
                kind: LegacyKind::Instruction,
                recipient: Some("Ana".to_string()),
                content: "Blue folder, top drawer of the office desk".to_string(),
            },
        ];
        Store::seeded(drafts, now)
    }

    fn record_count(&self) -> usize {
        self.len()
    }
}

impl Store<LegacyEntry> {
    pub fn for_recipient(&self, recipient: &str) -> Vec<&LegacyEntry> {
        self.filter(|e| {
            e.recipient
                .as_deref()
                .is_some_and(|r| r.eq_ignore_ascii_case(recipient))
        })
    }
}
