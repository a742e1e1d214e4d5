//! Relationships and the interactions logged against them
//!
//! The only cascading store: removing a relationship removes every
//! interaction that references it.

use crate::domain::record::{merge, merge_opt, nullable, Record, RecordId, Timestamps};
use crate::domain::store::{Persisted, Store};
use crate::domain::tags::normalize_tags;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Circle {
    Family,
    Friend,
    Colleague,
    Mentor,
    #[default]
    Acquaintance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RecordId,
    pub name: String,
    pub circle: Circle,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub last_contact: Option<NaiveDate>,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationshipDraft {
    pub name: String,
    #[serde(default)]
    pub circle: Circle,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub last_contact: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationshipPatch {
    pub name: Option<String>,
    pub circle: Option<Circle>,
    #[serde(default, deserialize_with = "nullable")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub last_contact: Option<Option<NaiveDate>>,
    pub tags: Option<Vec<String>>,
}

impl Record for Relationship {
    type Draft = RelationshipDraft;
    type Patch = RelationshipPatch;
    const KIND: &'static str = "relationship";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn create(id: RecordId, draft: RelationshipDraft, now: DateTime<Utc>) -> Self {
        Relationship {
            id,
            name: draft.name,
            circle: draft.circle,
            email: draft.email,
            phone: draft.phone,
            last_contact: draft.last_contact,
            tags: normalize_tags(draft.tags),
            stamps: Timestamps::new(now),
        }
    }

    fn apply(&mut self, patch: RelationshipPatch) {
        merge(&mut self.name, patch.name);
        merge(&mut self.circle, patch.circle);
        merge_opt(&mut self.email, patch.email);
        merge_opt(&mut self.phone, patch.phone);
        merge_opt(&mut self.last_contact, patch.last_contact);
        merge(&mut self.tags, patch.tags.map(normalize_tags));
    }

    fn timestamps(&self) -> &Timestamps {
        &self.stamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }

    fn summary(&self) -> String {
        match self.last_contact {
            Some(d) => format!("{} ({:?}, last contact {})", self.name, self.circle, d.format("%d-%m-%Y")),
            None => format!("{} ({:?}, never contacted)", self.name, self.circle),
        }
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Call,
    Message,
    Meeting,
    Email,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: RecordId,
    pub relationship_id: String,
    pub kind: InteractionKind,
    pub date: NaiveDate,
    pub notes: Option<String>,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InteractionDraft {
    pub relationship_id: String,
    pub kind: InteractionKind,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InteractionPatch {
    pub kind: Option<InteractionKind>,
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

impl Record for Interaction {
    type Draft = InteractionDraft;
    type Patch = InteractionPatch;
    const KIND: &'static str = "interaction";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn create(id: RecordId, draft: InteractionDraft, now: DateTime<Utc>) -> Self {
        Interaction {
            id,
            relationship_id: draft.relationship_id,
            kind: draft.kind,
            date: draft.date.unwrap_or_else(|| now.date_naive()),
            notes: draft.notes,
            stamps: Timestamps::new(now),
        }
    }

    fn apply(&mut self, patch: InteractionPatch) {
        merge(&mut self.kind, patch.kind);
        merge(&mut self.date, patch.date);
        merge_opt(&mut self.notes, patch.notes);
    }

    fn timestamps(&self) -> &Timestamps {
        &self.stamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }

    fn summary(&self) -> String {
        format!(
            "{}  {:?} with {}",
            self.date.format("%d-%m-%Y"),
            self.kind,
            self.relationship_id
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkState {
    pub relationships: Store<Relationship>,
    pub interactions: Store<Interaction>,
}

impl NetworkState {
    pub fn relationships_mut(&mut self) -> &mut Store<Relationship> {
        &mut self.relationships
    }

    pub fn interactions_mut(&mut self) -> &mut Store<Interaction> {
        &mut self.interactions
    }

    /// Remove a relationship and every interaction referencing it
    pub fn delete_relationship(&mut self, id: &str) -> crate::error::Result<(Relationship, usize)> {
        let removed = self.relationships.remove(id)?;
        let cascaded = self.after_remove(Relationship::KIND, &removed.id);
        Ok((removed, cascaded))
    }

    pub fn interactions_for(&self, relationship_id: &str) -> Vec<&Interaction> {
        let mut found = self
            .interactions
            .filter(|i| i.relationship_id == relationship_id);
        found.sort_by(|a, b| b.date.cmp(&a.date));
        found
    }

    /// Relationships not contacted within `days` of `today`. Never
    /// contacted counts as due.
    pub fn due_for_contact(&self, today: NaiveDate, days: u32) -> Vec<&Relationship> {
        let cutoff = today
            .checked_sub_signed(Duration::days(i64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        let mut due = self
            .relationships
            .filter(|r| r.last_contact.map_or(true, |d| d < cutoff));
        due.sort_by_key(|r| r.last_contact);
        due
    }
}

impl Persisted for NetworkState {
    const KEY: &'static str = "network";

    fn seed(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let mut state = NetworkState::default();
        let people = [
            ("Maya Chen", Circle::Mentor, Some(40)),
            ("Tom Okafor", Circle::Friend, Some(3)),
            ("Priya Nair", Circle::Colleague, None),
        ];
        for (name, circle, _) in people {
            state.relationships.add(
                RelationshipDraft {
                    name: name.to_string(),
                    circle,
                    email: None,
                    phone: None,
                    last_contact: None,
                    tags: Vec::new(),
                },
                now,
            );
        }

        let targets: Vec<(String, i64)> = state
            .relationships
            .iter()
            .zip(people.iter())
            .filter_map(|(r, (_, _, ago))| ago.map(|days| (r.id.to_string(), days)))
            .collect();
        for (relationship_id, days_ago) in targets {
            let id = state
                .interactions
                .add(
                    InteractionDraft {
                        relationship_id,
                        kind: InteractionKind::Call,
                        date: Some(today - Duration::days(days_ago)),
                        notes: None,
                    },
                    now,
                )
                .id
                .clone();
            state.after_insert(Interaction::KIND, &id);
        }
        state
    }

    fn record_count(&self) -> usize {
        self.relationships.len() + self.interactions.len()
    }

    /// A new interaction is linked to its relationship by full id and
    /// advances the relationship's last contact date. Unknown or ambiguous
    /// references are stored as given.
    fn after_insert(&mut self, kind: &'static str, id: &RecordId) {
        if kind != Interaction::KIND {
            return;
        }
        let Some(interaction) = self.interactions.get_mut(id.as_str()) else {
            return;
        };
        let Ok(relationship_id) = self.relationships.resolve(&interaction.relationship_id) else {
            return;
        };
        interaction.relationship_id = relationship_id.to_string();
        let date = interaction.date;
        let now = interaction.stamps.created_at;

        if let Some(rel) = self.relationships.get_mut(relationship_id.as_str()) {
            if rel.last_contact.map_or(true, |d| d < date) {
                rel.last_contact = Some(date);
                rel.touch(now);
            }
        }
    }

    fn after_remove(&mut self, kind: &'static str, id: &RecordId) -> usize {
        if kind != Relationship::KIND {
            return 0;
        }
        self.interactions
            .retain(|i| i.relationship_id != id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_seed_sets_last_contact_from_interactions() {
        let state = NetworkState::seed(now());
        let today = now().date_naive();
        let maya = &state.relationships.records()[0];
        assert_eq!(maya.last_contact, Some(today - Duration::days(40)));
        assert_eq!(state.interactions.len(), 2);
        assert!(state.relationships.records()[2].last_contact.is_none());
    }

    #[test]
    fn test_delete_relationship_cascades_to_interactions() {
        let mut state = NetworkState::seed(now());
        let maya = state.relationships.records()[0].id.clone();
        let tom = state.relationships.records()[1].id.clone();
        state.interactions.add(
            InteractionDraft {
                relationship_id: maya.to_string(),
                kind: InteractionKind::Email,
                date: None,
                notes: None,
            },
            now(),
        );
        assert_eq!(state.interactions_for(maya.as_str()).len(), 2);

        let (removed, cascaded) = state.delete_relationship(maya.as_str()).unwrap();
        assert_eq!(removed.name, "Maya Chen");
        assert_eq!(cascaded, 2);
        assert!(state.interactions_for(maya.as_str()).is_empty());
        assert_eq!(state.interactions_for(tom.as_str()).len(), 1);
    }

    #[test]
    fn test_delete_missing_relationship_changes_nothing() {
        let mut state = NetworkState::seed(now());
        let before = state.clone();
        assert!(state.delete_relationship("missing").is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn test_older_interaction_does_not_rewind_last_contact() {
        let mut state = NetworkState::seed(now());
        let tom = state.relationships.records()[1].id.clone();
        let id = state
            .interactions
            .add(
                InteractionDraft {
                    relationship_id: tom.to_string(),
                    kind: InteractionKind::Meeting,
                    date: Some(now().date_naive() - Duration::days(100)),
                    notes: None,
                },
                now(),
            )
            .id
            .clone();
        state.after_insert(Interaction::KIND, &id);
        assert_eq!(
            state.relationships.get(tom.as_str()).unwrap().last_contact,
            Some(now().date_naive() - Duration::days(3))
        );
    }

    #[test]
    fn test_interaction_for_unknown_relationship_is_accepted() {
        let mut state = NetworkState::default();
        let id = state
            .interactions
            .add(
                InteractionDraft {
                    relationship_id: "ghost".to_string(),
                    kind: InteractionKind::Call,
                    date: None,
                    notes: None,
                },
                now(),
            )
            .id
            .clone();
        state.after_insert(Interaction::KIND, &id);
        assert_eq!(state.interactions.len(), 1);
    }

    #[test]
    fn test_due_for_contact() {
        let state = NetworkState::seed(now());
        let due = state.due_for_contact(now().date_naive(), 30);
        let names: Vec<&str> = due.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Priya Nair", "Maya Chen"]);
    }

    #[test]
    fn test_interaction_by_id_prefix_links_to_relationship() {
        let mut state = NetworkState::seed(now());
        let priya = state.relationships.records()[2].id.clone();
        let later = now() + Duration::hours(2);
        let id = state
            .interactions
            .add(
                InteractionDraft {
                    relationship_id: priya.as_str()[..8].to_string(),
                    kind: InteractionKind::Message,
                    date: None,
                    notes: None,
                },
                later,
            )
            .id
            .clone();
        state.after_insert(Interaction::KIND, &id);

        let interaction = state.interactions.get(id.as_str()).unwrap();
        assert_eq!(interaction.relationship_id, priya.as_str());
        let rel = state.relationships.get(priya.as_str()).unwrap();
        assert_eq!(rel.last_contact, Some(later.date_naive()));
        assert_eq!(rel.stamps.updated_at, later);

        let (_, cascaded) = state.delete_relationship(priya.as_str()).unwrap();
        assert_eq!(cascaded, 1);
        assert!(state.interactions.get(id.as_str()).is_none());
    }

    #[test]
    fn test_due_for_contact_window_edges() {
        let state = NetworkState::seed(now());
        let today = now().date_naive();
        // Nobody was contacted before the start of the calendar
        let names: Vec<&str> = state
            .due_for_contact(today, u32::MAX)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Priya Nair"]);
        assert_eq!(state.due_for_contact(today, 0).len(), 3);
    }
}
