//! Reading list

use crate::domain::record::{
    merge, merge_opt, nullable, Completable, Record, RecordId, Timestamps,
};
use crate::domain::store::{Persisted, Store};
use crate::domain::tags::normalize_tags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReadingStatus {
    #[default]
    Want,
    Reading,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: RecordId,
    pub title: String,
    pub author: String,
    pub status: ReadingStatus,
    pub pages: Option<u32>,
    pub current_page: u32,
    /// 1 to 5
    pub rating: Option<u8>,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookDraft {
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub status: ReadingStatus,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub status: Option<ReadingStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub pages: Option<Option<u32>>,
    pub current_page: Option<u32>,
    #[serde(default, deserialize_with = "nullable")]
    pub rating: Option<Option<u8>>,
    pub tags: Option<Vec<String>>,
}

impl Book {
    /// Percent read, when the page count is known
    pub fn progress(&self) -> Option<u8> {
        let pages = self.pages.filter(|p| *p > 0)?;
        let read = self.current_page.min(pages);
        Some((u64::from(read) * 100 / u64::from(pages)) as u8)
    }
}

impl Record for Book {
    type Draft = BookDraft;
    type Patch = BookPatch;
    const KIND: &'static str = "book";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn create(id: RecordId, draft: BookDraft, now: DateTime<Utc>) -> Self {
        Book {
            id,
            title: draft.title,
            author: draft.author,
            status: draft.status,
            pages: draft.pages,
            current_page: 0,
            rating: None,
            tags: normalize_tags(draft.tags),
            stamps: Timestamps::new(now),
        }
    }

    fn apply(&mut self, patch: BookPatch) {
        merge(&mut self.title, patch.title);
        merge(&mut self.author, patch.author);
        merge(&mut self.status, patch.status);
        merge_opt(&mut self.pages, patch.pages);
        merge(&mut self.current_page, patch.current_page);
        merge_opt(&mut self.rating, patch.rating.map(|r| r.map(|r| r.clamp(1, 5))));
        merge(&mut self.tags, patch.tags.map(normalize_tags));
    }

    fn timestamps(&self) -> &Timestamps {
        &self.stamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }

    fn summary(&self) -> String {
        let by = if self.author.is_empty() {
            String::new()
        } else {
            format!(" by {}", self.author)
        };
        match self.progress() {
            Some(pct) => format!("{}{} ({:?}, {}%)", self.title, by, self.status, pct),
            None => format!("{}{} ({:?})", self.title, by, self.status),
        }
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Completable for Book {
    fn is_complete(&self) -> bool {
        self.status == ReadingStatus::Finished
    }

    fn complete(&mut self, _now: DateTime<Utc>) {
        self.status = ReadingStatus::Finished;
        if let Some(pages) = self.pages {
            self.current_page = pages;
        }
    }
}

pub type BookStore = Store<Book>;

impl Persisted for Store<Book> {
    const KEY: &'static str = "knowledge";

    fn seed(now: DateTime<Utc>) -> Self {
        let book = |title: &str, author: &str, status, pages| BookDraft {
            title: title.to_string(),
            author: author.to_string(),
            status,
            pages,
            tags: Vec::new(),
        };
        let drafts = vec![
            book("Deep Work", "Cal Newport", ReadingStatus::Reading, Some(296)),
            book("The Rust Programming Language", "Klabnik & Nichols", ReadingStatus::Want, Some(560)),
            book("Meditations", "Marcus Aurelius", ReadingStatus::Finished, None),
        ];
        let mut store: BookStore = Store::seeded(drafts, now);
        let first = store.records().first().map(|b| b.id.clone());
        if let Some(book) = first.and_then(|id| store.get_mut(id.as_str())) {
            book.current_page = 120;
        }
        store
    }

    fn record_count(&self) -> usize {
        self.len()
    }
}

impl Store<Book> {
    pub fn currently_reading(&self) -> Vec<&Book> {
        self.filter(|b| b.status == ReadingStatus::Reading)
    }
}
