//! Family members and family events
//!
//! Members and events live in one snapshot but are not linked: removing a
//! member leaves events that mention it untouched.

use crate::domain::record::{merge, merge_opt, nullable, Record, RecordId, Timestamps};
use crate::domain::store::{Persisted, Store};
use crate::domain::tags::normalize_tags;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub id: RecordId,
    pub name: String,
    pub relation: String,
    pub birthday: Option<NaiveDate>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FamilyMemberDraft {
    pub name: String,
    pub relation: String,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FamilyMemberPatch {
    pub name: Option<String>,
    pub relation: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub birthday: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

impl FamilyMember {
    /// Next date on or after `today` the birthday is observed.
    /// Feb 29 birthdays fall on Feb 28 in common years.
    pub fn next_birthday(&self, today: NaiveDate) -> Option<NaiveDate> {
        let birthday = self.birthday?;
        let observed = |year: i32| {
            NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day())
                .or_else(|| NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day() - 1))
        };
        let this_year = observed(today.year())?;
        if this_year >= today {
            Some(this_year)
        } else {
            observed(today.year() + 1)
        }
    }
}

impl Record for FamilyMember {
    type Draft = FamilyMemberDraft;
    type Patch = FamilyMemberPatch;
    const KIND: &'static str = "family member";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn create(id: RecordId, draft: FamilyMemberDraft, now: DateTime<Utc>) -> Self {
        FamilyMember {
            id,
            name: draft.name,
            relation: draft.relation,
            birthday: draft.birthday,
            notes: draft.notes,
            tags: normalize_tags(draft.tags),
            stamps: Timestamps::new(now),
        }
    }

    fn apply(&mut self, patch: FamilyMemberPatch) {
        merge(&mut self.name, patch.name);
        merge(&mut self.relation, patch.relation);
        merge_opt(&mut self.birthday, patch.birthday);
        merge_opt(&mut self.notes, patch.notes);
        merge(&mut self.tags, patch.tags.map(normalize_tags));
    }

    fn timestamps(&self) -> &Timestamps {
        &self.stamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }

    fn summary(&self) -> String {
        match self.birthday {
            Some(b) => format!("{} ({}, born {})", self.name, self.relation, b.format("%d-%m-%Y")),
            None => format!("{} ({})", self.name, self.relation),
        }
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyEvent {
    pub id: RecordId,
    pub title: String,
    pub date: NaiveDate,
    /// Ids of attending members; not checked against the member list
    pub member_ids: Vec<String>,
    pub notes: Option<String>,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FamilyEventDraft {
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub member_ids: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FamilyEventPatch {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub member_ids: Option<Vec<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

impl Record for FamilyEvent {
    type Draft = FamilyEventDraft;
    type Patch = FamilyEventPatch;
    const KIND: &'static str = "family event";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn create(id: RecordId, draft: FamilyEventDraft, now: DateTime<Utc>) -> Self {
        FamilyEvent {
            id,
            title: draft.title,
            date: draft.date,
            member_ids: draft.member_ids,
            notes: draft.notes,
            stamps: Timestamps::new(now),
        }
    }

    fn apply(&mut self, patch: FamilyEventPatch) {
        merge(&mut self.title, patch.title);
        merge(&mut self.date, patch.date);
        merge(&mut self.member_ids, patch.member_ids);
        merge_opt(&mut self.notes, patch.notes);
    }

    fn timestamps(&self) -> &Timestamps {
        &self.stamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }

    fn summary(&self) -> String {
        format!("{}  {}", self.date.format("%d-%m-%Y"), self.title)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyState {
    pub members: Store<FamilyMember>,
    pub events: Store<FamilyEvent>,
}

impl FamilyState {
    pub fn members_mut(&mut self) -> &mut Store<FamilyMember> {
        &mut self.members
    }

    pub fn events_mut(&mut self) -> &mut Store<FamilyEvent> {
        &mut self.events
    }

    /// Events dated within `[today, today + days]`, soonest first
    pub fn upcoming_events(&self, today: NaiveDate, days: u32) -> Vec<&FamilyEvent> {
        let end = window_end(today, days);
        let mut events = self.events.filter(|e| e.date >= today && e.date <= end);
        events.sort_by_key(|e| e.date);
        events
    }

    /// Members whose next birthday falls within `[today, today + days]`
    pub fn upcoming_birthdays(&self, today: NaiveDate, days: u32) -> Vec<(NaiveDate, &FamilyMember)> {
        let end = window_end(today, days);
        let mut birthdays: Vec<(NaiveDate, &FamilyMember)> = self
            .members
            .iter()
            .filter_map(|m| m.next_birthday(today).map(|d| (d, m)))
            .filter(|(d, _)| *d <= end)
            .collect();
        birthdays.sort_by_key(|(d, _)| *d);
        birthdays
    }
}

/// Last day of a `days`-long window, clamped to the calendar's end
fn window_end(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

impl Persisted for FamilyState {
    const KEY: &'static str = "family";

    fn seed(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let birthday_in = |days: i64, born: i32| {
            let next = today + Duration::days(days);
            NaiveDate::from_ymd_opt(born, next.month(), next.day().min(28))
        };

        let members = Store::seeded(
            vec![
                FamilyMemberDraft {
                    name: "Ana".to_string(),
                    relation: "partner".to_string(),
                    birthday: birthday_in(5, 1990),
                    notes: None,
                    tags: Vec::new(),
                },
                FamilyMemberDraft {
                    name: "Leo".to_string(),
                    relation: "son".to_string(),
                    birthday: birthday_in(60, 2018),
                    notes: Some("Allergic to peanuts".to_string()),
                    tags: vec!["kids".to_string()],
                },
            ],
            now,
        );
        let events = Store::seeded(
            vec![
                FamilyEventDraft {
                    title: "School play".to_string(),
                    date: today + Duration::days(3),
                    member_ids: Vec::new(),
                    notes: None,
                },
                FamilyEventDraft {
                    title: "Grandparents visit".to_string(),
                    date: today + Duration::days(20),
                    member_ids: Vec::new(),
                    notes: None,
                },
            ],
            now,
        );
        FamilyState { members, events }
    }

    fn record_count(&self) -> usize {
        self.members.len() + self.events.len()
    }
}
