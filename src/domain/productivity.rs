//! Tasks

use crate::domain::record::{
    merge, merge_opt, nullable, Completable, Record, RecordId, Timestamps,
};
use crate::domain::store::{Persisted, Store};
use crate::domain::tags::normalize_tags;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskPatch {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "nullable")]
    pub due: Option<Option<NaiveDate>>,
    pub tags: Option<Vec<String>>,
}

impl Record for Task {
    type Draft = TaskDraft;
    type Patch = TaskPatch;
    const KIND: &'static str = "task";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn create(id: RecordId, draft: TaskDraft, now: DateTime<Utc>) -> Self {
        Task {
            id,
            title: draft.title,
            description: draft.description,
            status: TaskStatus::Todo,
            priority: draft.priority,
            due: draft.due,
            tags: normalize_tags(draft.tags),
            completed_at: None,
            stamps: Timestamps::new(now),
        }
    }

    fn apply(&mut self, patch: TaskPatch) {
        merge(&mut self.title, patch.title);
        merge_opt(&mut self.description, patch.description);
        merge(&mut self.status, patch.status);
        merge(&mut self.priority, patch.priority);
        merge_opt(&mut self.due, patch.due);
        merge(&mut self.tags, patch.tags.map(normalize_tags));
        // Reopening via status clears the completion stamp
        if self.status != TaskStatus::Done {
            self.completed_at = None;
        }
    }

    fn timestamps(&self) -> &Timestamps {
        &self.stamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }

    fn summary(&self) -> String {
        let mark = match self.status {
            TaskStatus::Todo => "[ ]",
            TaskStatus::InProgress => "[~]",
            TaskStatus::Done => "[x]",
        };
        match self.due {
            Some(due) => format!(
                "{} {} ({:?}, due {})",
                mark,
                self.title,
                self.priority,
                due.format("%d-%m-%Y")
            ),
            None => format!("{} {} ({:?})", mark, self.title, self.priority),
        }
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Completable for Task {
    fn is_complete(&self) -> bool {
        self.status == TaskStatus::Done
    }

    fn complete(&mut self, now: DateTime<Utc>) {
        if !self.is_complete() {
            self.status = TaskStatus::Done;
            self.completed_at = Some(now);
        }
    }
}

pub type TaskStore = Store<Task>;

impl Persisted for Store<Task> {
    const KEY: &'static str = "productivity";

    fn seed(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let drafts = vec![
            TaskDraft {
                title: "Review quarterly budget".to_string(),
                description: Some("Compare spending against plan".to_string()),
                priority: Priority::High,
                due: Some(today + Duration::days(2)),
                tags: vec!["finance".to_string(), "work".to_string()],
            },
            TaskDraft {
                title: "Book dentist appointment".to_string(),
                description: None,
                priority: Priority::Medium,
                due: Some(today + Duration::days(7)),
                tags: vec!["health".to_string(), "errands".to_string()],
            },
            TaskDraft {
                title: "Sketch garden layout".to_string(),
                description: None,
                priority: Priority::Low,
                due: None,
                tags: vec!["home".to_string(), "someday".to_string()],
            },
        ];
        Store::seeded(drafts, now)
    }

    fn record_count(&self) -> usize {
        self.len()
    }
}

impl Store<Task> {
    /// Tasks not yet done, highest priority first
    pub fn open_tasks(&self) -> Vec<&Task> {
        let mut open = self.filter(|t| !t.is_complete());
        open.sort_by(|a, b| b.priority.cmp(&a.priority));
        open
    }

    /// Open tasks whose due date is before `today`
    pub fn overdue(&self, today: NaiveDate) -> Vec<&Task> {
        self.filter(|t| !t.is_complete() && t.due.is_some_and(|due| due < today))
    }
}
