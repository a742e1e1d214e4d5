//! Mind-guard: distraction blocking rules
//!
//! A rule pattern is a host glob where `*` matches any run of characters,
//! e.g. `*.reddit.com` or `news.*`. Matching is case-insensitive and
//! anchored to the whole host.

use crate::domain::record::{merge, merge_opt, nullable, Record, RecordId, Timestamps};
use crate::domain::store::{Persisted, Store};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GuardCategory {
    Social,
    News,
    Entertainment,
    Shopping,
    #[default]
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardRule {
    pub id: RecordId,
    pub pattern: String,
    pub category: GuardCategory,
    pub active: bool,
    pub daily_limit_minutes: Option<u32>,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardRuleDraft {
    pub pattern: String,
    #[serde(default)]
    pub category: GuardCategory,
    #[serde(default = "enabled")]
    pub active: bool,
    #[serde(default)]
    pub daily_limit_minutes: Option<u32>,
}

fn enabled() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardRulePatch {
    pub pattern: Option<String>,
    pub category: Option<GuardCategory>,
    pub active: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub daily_limit_minutes: Option<Option<u32>>,
}

/// Compile a host glob into an anchored, case-insensitive regex
pub fn compile_pattern(pattern: &str) -> Option<Regex> {
    let body = pattern
        .trim()
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    if body.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i)^{}$", body)).ok()
}

impl GuardRule {
    pub fn blocks(&self, host: &str) -> bool {
        self.active
            && compile_pattern(&self.pattern).is_some_and(|re| re.is_match(host.trim()))
    }
}

impl Record for GuardRule {
    type Draft = GuardRuleDraft;
    type Patch = GuardRulePatch;
    const KIND: &'static str = "guard rule";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn create(id: RecordId, draft: GuardRuleDraft, now: DateTime<Utc>) -> Self {
        GuardRule {
            id,
            pattern: draft.pattern.trim().to_lowercase(),
            category: draft.category,
            active: draft.active,
            daily_limit_minutes: draft.daily_limit_minutes,
            stamps: Timestamps::new(now),
        }
    }

    fn apply(&mut self, patch: GuardRulePatch) {
        merge(&mut self.pattern, patch.pattern.map(|p| p.trim().to_lowercase()));
        merge(&mut self.category, patch.category);
        merge(&mut self.active, patch.active);
        merge_opt(&mut self.daily_limit_minutes, patch.daily_limit_minutes);
    }

    fn timestamps(&self) -> &Timestamps {
        &self.stamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }

    fn summary(&self) -> String {
        let state = if self.active { "active" } else { "paused" };
        match self.daily_limit_minutes {
            Some(limit) => format!("{} ({:?}, {}, {} min/day)", self.pattern, self.category, state, limit),
            None => format!("{} ({:?}, {})", self.pattern, self.category, state),
        }
    }
}

pub type GuardStore = Store<GuardRule>;

impl Persisted for Store<GuardRule> {
    const KEY: &'static str = "mind-guard";

    fn seed(now: DateTime<Utc>) -> Self {
        let rule = |pattern: &str, category, daily_limit_minutes| GuardRuleDraft {
            pattern: pattern.to_string(),
            category,
            active: true,
            daily_limit_minutes,
        };
        let drafts = vec![
            rule("*.reddit.com", GuardCategory::Social, Some(15)),
            rule("twitter.com", GuardCategory::Social, None),
            rule("news.*", GuardCategory::News, Some(20)),
        ];
        Store::seeded(drafts, now)
    }

    fn record_count(&self) -> usize {
        self.len()
    }
}

impl Store<GuardRule> {
    pub fn active_rules(&self) -> Vec<&GuardRule> {
        self.filter(|r| r.active)
    }

    /// Active rules that block `host`
    pub fn matching(&self, host: &str) -> Vec<&GuardRule> {
        self.filter(|r| r.blocks(host))
    }
}
