//! Health metrics

use crate::domain::record::{merge, merge_opt, nullable, Record, RecordId, Timestamps};
use crate::domain::store::{Persisted, Store};
use crate::domain::tags::normalize_tags;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricKind {
    Weight,
    Sleep,
    Steps,
    HeartRate,
    Water,
    Mood,
}

impl MetricKind {
    /// Unit recorded when the draft leaves it out
    pub fn default_unit(&self) -> &'static str {
        match self {
            MetricKind::Weight => "kg",
            MetricKind::Sleep => "h",
            MetricKind::Steps => "steps",
            MetricKind::HeartRate => "bpm",
            MetricKind::Water => "l",
            MetricKind::Mood => "/10",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthMetric {
    pub id: RecordId,
    pub kind: MetricKind,
    pub value: f64,
    pub unit: String,
    pub recorded_on: NaiveDate,
    pub note: Option<String>,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthMetricDraft {
    pub kind: MetricKind,
    pub value: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub recorded_on: Option<NaiveDate>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthMetricPatch {
    pub kind: Option<MetricKind>,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub recorded_on: Option<NaiveDate>,
    #[serde(default, deserialize_with = "nullable")]
    pub note: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

impl Record for HealthMetric {
    type Draft = HealthMetricDraft;
    type Patch = HealthMetricPatch;
    const KIND: &'static str = "health metric";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn create(id: RecordId, draft: HealthMetricDraft, now: DateTime<Utc>) -> Self {
        HealthMetric {
            id,
            kind: draft.kind,
            value: draft.value,
            unit: draft
                .unit
                .unwrap_or_else(|| draft.kind.default_unit().to_string()),
            recorded_on: draft.recorded_on.unwrap_or_else(|| now.date_naive()),
            note: draft.note,
            tags: normalize_tags(draft.tags),
            stamps: Timestamps::new(now),
        }
    }

    fn apply(&mut self, patch: HealthMetricPatch) {
        merge(&mut self.kind, patch.kind);
        merge(&mut self.value, patch.value);
        merge(&mut self.unit, patch.unit);
        merge(&mut self.recorded_on, patch.recorded_on);
        merge_opt(&mut self.note, patch.note);
        merge(&mut self.tags, patch.tags.map(normalize_tags));
    }

    fn timestamps(&self) -> &Timestamps {
        &self.stamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }

    fn summary(&self) -> String {
        format!(
            "{}  {:?} {} {}",
            self.recorded_on.format("%d-%m-%Y"),
            self.kind,
            self.value,
            self.unit
        )
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

pub type HealthStore = Store<HealthMetric>;

impl Persisted for Store<HealthMetric> {
    const KEY: &'static str = "health";

    fn seed(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let metric = |kind, value, days_ago: i64| HealthMetricDraft {
            kind,
            value,
            unit: None,
            recorded_on: Some(today - Duration::days(days_ago)),
            note: None,
            tags: Vec::new(),
        };
        let drafts = vec![
            metric(MetricKind::Weight, 78.4, 7),
            metric(MetricKind::Weight, 77.9, 0),
            metric(MetricKind::Sleep, 7.5, 1),
            metric(MetricKind::Sleep, 6.0, 0),
            metric(MetricKind::Steps, 9500.0, 0),
            metric(MetricKind::HeartRate, 62.0, 0),
        ];
        Store::seeded(drafts, now)
    }

    fn record_count(&self) -> usize {
        self.len()
    }
}

impl Store<HealthMetric> {
    /// Most recent reading of `kind` (ties resolved by insertion order)
    pub fn latest(&self, kind: MetricKind) -> Option<&HealthMetric> {
        self.iter()
            .filter(|m| m.kind == kind)
            .fold(None, |best: Option<&HealthMetric>, m| match best {
                Some(b) if b.recorded_on > m.recorded_on => Some(b),
                _ => Some(m),
            })
    }

    /// Mean value of `kind` recorded on or after `since`
    pub fn average_since(&self, kind: MetricKind, since: NaiveDate) -> Option<f64> {
        let values: Vec<f64> = self
            .iter()
            .filter(|m| m.kind == kind && m.recorded_on >= since)
            .map(|m| m.value)
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 7, 30, 0).unwrap()
    }

    #[test]
    fn test_draft_fills_unit_and_date() {
        let draft: HealthMetricDraft =
            serde_json::from_value(serde_json::json!({ "kind": "heart-rate", "value": 58 }))
                .unwrap();
        let mut store = HealthStore::new();
        let metric = store.add(draft, now());
        assert_eq!(metric.unit, "bpm");
        assert_eq!(metric.recorded_on, now().date_naive());
    }

    #[test]
    fn test_latest_prefers_newest_date() {
        let store = HealthStore::seed(now());
        let latest = store.latest(MetricKind::Weight).unwrap();
        assert_eq!(latest.value, 77.9);
        assert!(store.latest(MetricKind::Water).is_none());
    }

    #[test]
    fn test_average_since_window() {
        let store = HealthStore::seed(now());
        let today = now().date_naive();
        assert_eq!(
            store.average_since(MetricKind::Sleep, today - Duration::days(1)),
            Some(6.75)
        );
        assert_eq!(store.average_since(MetricKind::Sleep, today), Some(6.0));
        assert_eq!(store.average_since(MetricKind::Mood, today), None);
    }
}
