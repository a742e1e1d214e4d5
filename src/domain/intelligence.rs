//! World-intelligence signals

use crate::domain::record::{
    merge, merge_opt, nullable, Completable, Record, RecordId, Timestamps,
};
use crate::domain::store::{Persisted, Store};
use crate::domain::tags::normalize_tags;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalCategory {
    Geopolitics,
    Markets,
    Technology,
    Health,
    Climate,
    Local,
}

impl SignalCategory {
    pub const ALL: [SignalCategory; 6] = [
        SignalCategory::Geopolitics,
        SignalCategory::Markets,
        SignalCategory::Technology,
        SignalCategory::Health,
        SignalCategory::Climate,
        SignalCategory::Local,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalCategory::Geopolitics => "geopolitics",
            SignalCategory::Markets => "markets",
            SignalCategory::Technology => "technology",
            SignalCategory::Health => "health",
            SignalCategory::Climate => "climate",
            SignalCategory::Local => "local",
        }
    }
}

impl fmt::Display for SignalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SignalCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = SignalCategory::ALL.iter().map(|c| c.as_str()).collect();
                format!(
                    "Invalid signal category: '{}'. Valid categories are: {}",
                    s,
                    valid.join(", ")
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub id: RecordId,
    pub title: String,
    pub source: String,
    pub category: SignalCategory,
    pub severity: Severity,
    pub summary: Option<String>,
    pub url: Option<String>,
    pub observed_at: DateTime<Utc>,
    pub acknowledged: bool,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignalDraft {
    pub title: String,
    pub category: SignalCategory,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub observed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignalPatch {
    pub title: Option<String>,
    pub source: Option<String>,
    pub category: Option<SignalCategory>,
    pub severity: Option<Severity>,
    #[serde(default, deserialize_with = "nullable")]
    pub summary: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub url: Option<Option<String>>,
    pub acknowledged: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl Record for Signal {
    type Draft = SignalDraft;
    type Patch = SignalPatch;
    const KIND: &'static str = "signal";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn create(id: RecordId, draft: SignalDraft, now: DateTime<Utc>) -> Self {
        Signal {
            id,
            title: draft.title,
            source: draft.source,
            category: draft.category,
            severity: draft.severity,
            summary: draft.summary,
            url: draft.url,
            observed_at: draft.observed_at.unwrap_or(now),
            acknowledged: false,
            tags: normalize_tags(draft.tags),
            stamps: Timestamps::new(now),
        }
    }

    fn apply(&mut self, patch: SignalPatch) {
        merge(&mut self.title, patch.title);
        merge(&mut self.source, patch.source);
        merge(&mut self.category, patch.category);
        merge(&mut self.severity, patch.severity);
        merge_opt(&mut self.summary, patch.summary);
        merge_opt(&mut self.url, patch.url);
        merge(&mut self.acknowledged, patch.acknowledged);
        merge(&mut self.tags, patch.tags.map(normalize_tags));
    }

    fn timestamps(&self) -> &Timestamps {
        &self.stamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }

    fn summary(&self) -> String {
        let ack = if self.acknowledged { " (ack)" } else { "" };
        format!("[{:?}] {} / {}{}", self.severity, self.category, self.title, ack)
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Completable for Signal {
    fn is_complete(&self) -> bool {
        self.acknowledged
    }

    fn complete(&mut self, _now: DateTime<Utc>) {
        self.acknowledged = true;
    }
}

pub type SignalStore = Store<Signal>;

impl Persisted for Store<Signal> {
    const KEY: &'static str = "intelligence";

    fn seed(now: DateTime<Utc>) -> Self {
        let signal = |title: &str, source: &str, category, severity, hours_ago: i64| SignalDraft {
            title: title.to_string(),
            category,
            source: source.to_string(),
            severity,
            summary: None,
            url: None,
            observed_at: Some(now - Duration::hours(hours_ago)),
            tags: Vec::new(),
        };
        let drafts = vec![
            signal("Central bank holds rates", "Reuters", SignalCategory::Markets, Severity::Medium, 5),
            signal("Heatwave advisory issued", "Met Office", SignalCategory::Climate, Severity::High, 2),
            signal("New open-weight model released", "Hacker News", SignalCategory::Technology, Severity::Low, 20),
            signal("Flu season peaking early", "WHO", SignalCategory::Health, Severity::Medium, 30),
            signal("Road closures downtown", "City council", SignalCategory::Local, Severity::Low, 1),
        ];
        Store::seeded(drafts, now)
    }

    fn record_count(&self) -> usize {
        self.len()
    }
}

impl Store<Signal> {
    /// Signals in `category`, newest observation first
    pub fn by_category(&self, category: SignalCategory) -> Vec<&Signal> {
        let mut found = self.filter(|s| s.category == category);
        found.sort_by(|a, b| b.observed_at.cmp(&a.observed_at));
        found
    }

    /// Every non-empty category with its signals, newest first
    pub fn grouped(&self) -> BTreeMap<SignalCategory, Vec<&Signal>> {
        let mut groups: BTreeMap<SignalCategory, Vec<&Signal>> = BTreeMap::new();
        for signal in self.iter() {
            groups.entry(signal.category).or_default().push(signal);
        }
        for list in groups.values_mut() {
            list.sort_by(|a, b| b.observed_at.cmp(&a.observed_at));
        }
        groups
    }

    pub fn unacknowledged(&self) -> Vec<&Signal> {
        self.filter(|s| !s.acknowledged)
    }
}
