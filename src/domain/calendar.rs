//! Calendar events

use crate::domain::record::{merge, merge_opt, nullable, Record, RecordId, Timestamps};
use crate::domain::store::{Persisted, Store};
use crate::domain::tags::normalize_tags;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: RecordId,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub attendees: Vec<String>,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalendarEventDraft {
    pub title: String,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalendarEventPatch {
    pub title: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable")]
    pub ends_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "nullable")]
    pub location: Option<Option<String>>,
    pub attendees: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl Record for CalendarEvent {
    type Draft = CalendarEventDraft;
    type Patch = CalendarEventPatch;
    const KIND: &'static str = "event";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn create(id: RecordId, draft: CalendarEventDraft, now: DateTime<Utc>) -> Self {
        CalendarEvent {
            id,
            title: draft.title,
            starts_at: draft.starts_at,
            ends_at: draft.ends_at,
            location: draft.location,
            attendees: draft.attendees,
            tags: normalize_tags(draft.tags),
            stamps: Timestamps::new(now),
        }
    }

    fn apply(&mut self, patch: CalendarEventPatch) {
        merge(&mut self.title, patch.title);
        merge(&mut self.starts_at, patch.starts_at);
        merge_opt(&mut self.ends_at, patch.ends_at);
        merge_opt(&mut self.location, patch.location);
        merge(&mut self.attendees, patch.attendees);
        merge(&mut self.tags, patch.tags.map(normalize_tags));
    }

    fn timestamps(&self) -> &Timestamps {
        &self.stamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }

    fn summary(&self) -> String {
        let when = self.starts_at.format("%d-%m-%Y %H:%M");
        match &self.location {
            Some(place) => format!("{}  {} @ {}", when, self.title, place),
            None => format!("{}  {}", when, self.title),
        }
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

pub type CalendarStore = Store<CalendarEvent>;

impl Persisted for Store<CalendarEvent> {
    const KEY: &'static str = "calendar";

    fn seed(now: DateTime<Utc>) -> Self {
        let event = |title: &str, hours_ahead: i64, location: Option<&str>| CalendarEventDraft {
            title: title.to_string(),
            starts_at: now + Duration::hours(hours_ahead),
            ends_at: Some(now + Duration::hours(hours_ahead + 1)),
            location: location.map(str::to_string),
            attendees: Vec::new(),
            tags: Vec::new(),
        };
        let drafts = vec![
            event("Team standup", 20, None),
            event("Doctor checkup", 72, Some("Riverside Clinic")),
            event("Dinner with Tom", 130, Some("Luigi's")),
            event("Conference talk", 24 * 21, Some("Berlin")),
        ];
        Store::seeded(drafts, now)
    }

    fn record_count(&self) -> usize {
        self.len()
    }
}

impl Store<CalendarEvent> {
    /// Events starting within `[now, now + days]`, soonest first
    pub fn upcoming(&self, now: DateTime<Utc>, days: u32) -> Vec<&CalendarEvent> {
        let end = now.checked_add_signed(Duration::days(i64::from(days)));
        let mut events =
            self.filter(|e| e.starts_at >= now && end.map_or(true, |end| e.starts_at <= end));
        events.sort_by_key(|e| e.starts_at);
        events
    }
}
