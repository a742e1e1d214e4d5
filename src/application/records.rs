//! Record CRUD use cases
//!
//! Every mutation loads the owning snapshot, applies the change and writes
//! the whole snapshot back before returning.

use crate::application::catalog::{dispatch, whole, CollectionVisitor};
use crate::domain::intelligence::Signal;
use crate::domain::knowledge::Book;
use crate::domain::legacy::LegacyEntry;
use crate::domain::productivity::Task;
use crate::domain::spirituality::Prayer;
use crate::domain::tags::TagQuery;
use crate::domain::{Completable, Persisted, Record, Store, StoreKind};
use crate::error::{LifeosError, Result};
use crate::infrastructure::FileSystemRepository;
use chrono::Utc;
use log::info;

/// One line of list output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    pub id: String,
    pub summary: String,
}

impl RecordRow {
    pub fn of<R: Record>(record: &R) -> Self {
        RecordRow {
            id: record.id().to_string(),
            summary: record.summary(),
        }
    }
}

/// Result of a delete, including cascaded removals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deleted {
    pub row: RecordRow,
    pub cascaded: usize,
}

/// Filters applied by `list`
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub tags: Option<TagQuery>,
    pub limit: Option<usize>,
}

fn parse_json<T: serde::de::DeserializeOwned>(kind: &str, json: &str) -> Result<T> {
    serde_json::from_str(json).map_err(|e| LifeosError::InvalidRecord(format!("{}: {}", kind, e)))
}

/// Service for adding, changing and reading records of any kind
pub struct RecordService {
    repository: FileSystemRepository,
}

impl RecordService {
    pub fn new(repository: FileSystemRepository) -> Self {
        RecordService { repository }
    }

    pub fn add(&self, kind: StoreKind, json: &str) -> Result<RecordRow> {
        dispatch(
            kind,
            AddRecord {
                repository: &self.repository,
                json,
            },
        )
    }

    pub fn update(&self, kind: StoreKind, id: &str, json: &str) -> Result<RecordRow> {
        dispatch(
            kind,
            UpdateRecord {
                repository: &self.repository,
                needle: id,
                json,
            },
        )
    }

    pub fn delete(&self, kind: StoreKind, id: &str) -> Result<Deleted> {
        dispatch(
            kind,
            DeleteRecord {
                repository: &self.repository,
                needle: id,
            },
        )
    }

    /// Pretty JSON of one record
    pub fn show(&self, kind: StoreKind, id: &str) -> Result<String> {
        dispatch(
            kind,
            ShowRecord {
                repository: &self.repository,
                needle: id,
            },
        )
    }

    pub fn list(&self, kind: StoreKind, options: &ListOptions) -> Result<Vec<RecordRow>> {
        dispatch(
            kind,
            ListRecords {
                repository: &self.repository,
                options,
            },
        )
    }

    pub fn count(&self, kind: StoreKind) -> Result<usize> {
        dispatch(
            kind,
            CountRecords {
                repository: &self.repository,
            },
        )
    }

    /// Move a record into its terminal state (done, answered, finished, ...)
    pub fn complete(&self, kind: StoreKind, id: &str) -> Result<RecordRow> {
        match kind {
            StoreKind::Tasks => self.complete_in(whole::<Task>, id),
            StoreKind::Prayers => self.complete_in(whole::<Prayer>, id),
            StoreKind::Books => self.complete_in(whole::<Book>, id),
            StoreKind::Signals => self.complete_in(whole::<Signal>, id),
            StoreKind::Legacy => self.complete_in(whole::<LegacyEntry>, id),
            other => Err(LifeosError::Unsupported {
                kind: other.name(),
                operation: "complete",
            }),
        }
    }

    fn complete_in<S, R>(&self, select: fn(&mut S) -> &mut Store<R>, needle: &str) -> Result<RecordRow>
    where
        S: Persisted,
        R: Completable,
    {
        self.repository.mutate(|state: &mut S| {
            let store = select(state);
            let id = store.resolve(needle)?;
            let now = Utc::now();
            let record = store.modify(id.as_str(), now, |r| r.complete(now))?;
            info!("event=complete kind={} key={}", R::KIND, S::KEY);
            Ok(RecordRow::of(record))
        })
    }
}

struct AddRecord<'a> {
    repository: &'a FileSystemRepository,
    json: &'a str,
}

impl CollectionVisitor for AddRecord<'_> {
    type Output = RecordRow;

    fn visit<S, R>(self, select: fn(&mut S) -> &mut Store<R>) -> Result<RecordRow>
    where
        S: Persisted,
        R: Record,
    {
        let draft: R::Draft = parse_json(R::KIND, self.json)?;
        self.repository.mutate(|state: &mut S| {
            let record = select(state).add(draft, Utc::now());
            let id = record.id().clone();
            state.after_insert(R::KIND, &id);
            info!("event=add kind={} key={}", R::KIND, S::KEY);
            select(state)
                .get(id.as_str())
                .map(RecordRow::of)
                .ok_or_else(|| LifeosError::RecordNotFound {
                kind: R::KIND,
                id: id.to_string(),
            })
        })
    }
}

struct UpdateRecord<'a> {
    repository: &'a FileSystemRepository,
    needle: &'a str,
    json: &'a str,
}

impl CollectionVisitor for UpdateRecord<'_> {
    type Output = RecordRow;

    fn visit<S, R>(self, select: fn(&mut S) -> &mut Store<R>) -> Result<RecordRow>
    where
        S: Persisted,
        R: Record,
    {
        let patch: R::Patch = parse_json(R::KIND, self.json)?;
        self.repository.mutate(|state: &mut S| {
            let store = select(state);
            let id = store.resolve(self.needle)?;
            let record = store.update(id.as_str(), patch, Utc::now())?;
            info!("event=update kind={} key={}", R::KIND, S::KEY);
            Ok(RecordRow::of(record))
        })
    }
}

struct DeleteRecord<'a> {
    repository: &'a FileSystemRepository,
    needle: &'a str,
}

impl CollectionVisitor for DeleteRecord<'_> {
    type Output = Deleted;

    fn visit<S, R>(self, select: fn(&mut S) -> &mut Store<R>) -> Result<Deleted>
    where
        S: Persisted,
        R: Record,
    {
        self.repository.mutate(|state: &mut S| {
            let store = select(state);
            let id = store.resolve(self.needle)?;
            let removed = store.remove(id.as_str())?;
            let cascaded = state.after_remove(R::KIND, &id);
            info!(
                "event=delete kind={} key={} cascaded={}",
                R::KIND,
                S::KEY,
                cascaded
            );
            Ok(Deleted {
                row: RecordRow::of(&removed),
                cascaded,
            })
        })
    }
}

struct ShowRecord<'a> {
    repository: &'a FileSystemRepository,
    needle: &'a str,
}

impl CollectionVisitor for ShowRecord<'_> {
    type Output = String;

    fn visit<S, R>(self, select: fn(&mut S) -> &mut Store<R>) -> Result<String>
    where
        S: Persisted,
        R: Record,
    {
        let mut state: S = self.repository.load()?;
        let store = select(&mut state);
        let id = store.resolve(self.needle)?;
        let record = store.get(id.as_str()).ok_or_else(|| LifeosError::RecordNotFound {
            kind: R::KIND,
            id: id.to_string(),
        })?;
        Ok(serde_json::to_string_pretty(record)?)
    }
}

struct ListRecords<'a> {
    repository: &'a FileSystemRepository,
    options: &'a ListOptions,
}

impl CollectionVisitor for ListRecords<'_> {
    type Output = Vec<RecordRow>;

    fn visit<S, R>(self, select: fn(&mut S) -> &mut Store<R>) -> Result<Vec<RecordRow>>
    where
        S: Persisted,
        R: Record,
    {
        let mut state: S = self.repository.load()?;
        let store = select(&mut state);
        let matching = store.iter().filter(|r| {
            self.options
                .tags
                .as_ref()
                .map_or(true, |query| query.matches(r.tags()))
        });
        let rows = match self.options.limit {
            Some(limit) => matching.take(limit).map(RecordRow::of).collect(),
            None => matching.map(RecordRow::of).collect(),
        };
        Ok(rows)
    }
}

struct CountRecords<'a> {
    repository: &'a FileSystemRepository,
}

impl CollectionVisitor for CountRecords<'_> {
    type Output = usize;

    fn visit<S, R>(self, select: fn(&mut S) -> &mut Store<R>) -> Result<usize>
    where
        S: Persisted,
        R: Record,
    {
        let mut state: S = self.repository.load()?;
        Ok(select(&mut state).len())
    }
}
