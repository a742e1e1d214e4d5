//! Prayer journal

use crate::domain::record::{merge, Completable, Record, RecordId, Timestamps};
use crate::domain::store::{Persisted, Store};
use crate::domain::tags::normalize_tags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrayerCategory {
    Gratitude,
    #[default]
    Petition,
    Intercession,
    Confession,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prayer {
    pub id: RecordId,
    pub title: String,
    pub body: String,
    pub category: PrayerCategory,
    pub answered: bool,
    pub answered_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrayerDraft {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub category: PrayerCategory,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrayerPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub category: Option<PrayerCategory>,
    pub tags: Option<Vec<String>>,
}

impl Record for Prayer {
    type Draft = PrayerDraft;
    type Patch = PrayerPatch;
    const KIND: &'static str = "prayer";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn create(id: RecordId, draft: PrayerDraft, now: DateTime<Utc>) -> Self {
        Prayer {
            id,
            title: draft.title,
            body: draft.body,
            category: draft.category,
            answered: false,
            answered_at: None,
            tags: normalize_tags(draft.tags),
            stamps: Timestamps::new(now),
        }
    }

    fn apply(&mut self, patch: PrayerPatch) {
        merge(&mut self.title, patch.title);
        merge(&mut self.body, patch.body);
        merge(&mut self.category, patch.category);
        merge(&mut self.tags, patch.tags.map(normalize_tags));
    }

    fn timestamps(&self) -> &Timestamps {
        &self.stamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }

    fn summary(&self) -> String {
        let mark = if self.answered { "answered" } else { "open" };
        format!("{} ({:?}, {})", self.title, self.category, mark)
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Completable for Prayer {
    fn is_complete(&self) -> bool {
        self.answered
    }

    fn complete(&mut self, now: DateTime<Utc>) {
        if !self.answered {
            self.answered = true;
            self.answered_at = Some(now);
        }
    }
}

pub type PrayerStore = Store<Prayer>;

impl Persisted for Store<Prayer> {
    const KEY: &'static str = "spirituality";

    fn seed(now: DateTime<Utc>) -> Self {
        let drafts = vec![
            PrayerDraft {
                title: "Thanks for a restful weekend".to_string(),
                body: String::new(),
                category: PrayerCategory::Gratitude,
                tags: vec!["family".to_string()],
            },
            PrayerDraft {
                title: "Healing for Grandma".to_string(),
                body: "Recovery after surgery".to_string(),
                category: PrayerCategory::Intercession,
                tags: vec!["family".to_string(), "health".to_string()],
            },
        ];
        Store::seeded(drafts, now)
    }

    fn record_count(&self) -> usize {
        self.len()
    }
}

impl Store<Prayer> {
    pub fn unanswered(&self) -> Vec<&Prayer> {
        self.filter(|p| !p.answered)
    }
}
