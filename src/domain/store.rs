//! Generic in-memory record store and the persisted-state contract
//!
//! A `Store<R>` owns one ordered list of records. Mutations are synchronous
//! and either succeed or report an error leaving the list untouched.

use crate::domain::record::{Record, RecordId};
use crate::error::{LifeosError, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Ordered list of records of one kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Store<R> {
    records: Vec<R>,
}

impl<R> Default for Store<R> {
    fn default() -> Self {
        Store {
            records: Vec::new(),
        }
    }
}

impl<R: Record> Store<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store by adding each draft in order
    pub fn seeded(drafts: Vec<R::Draft>, now: DateTime<Utc>) -> Self {
        let mut store = Self::new();
        for draft in drafts {
            store.add(draft, now);
        }
        store
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.iter()
    }

    /// Exact id lookup
    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut R> {
        self.records.iter_mut().find(|r| r.id() == id)
    }

    /// Resolve a full id or a unique id prefix to the stored id
    pub fn resolve(&self, needle: &str) -> Result<RecordId> {
        if let Some(record) = self.get(needle) {
            return Ok(record.id().clone());
        }

        let mut matches = self
            .records
            .iter()
            .filter(|r| !needle.is_empty() && r.id().as_str().starts_with(needle));

        match (matches.next(), matches.count()) {
            (Some(record), 0) => Ok(record.id().clone()),
            (Some(_), rest) => Err(LifeosError::AmbiguousId {
                kind: R::KIND,
                prefix: needle.to_string(),
                matches: rest + 1,
            }),
            (None, _) => Err(not_found::<R>(needle)),
        }
    }

    /// Append a new record with a fresh id
    pub fn add(&mut self, draft: R::Draft, now: DateTime<Utc>) -> &R {
        let record = R::create(RecordId::generate(), draft, now);
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Shallow-merge `patch` into the record with `id`
    pub fn update(&mut self, id: &str, patch: R::Patch, now: DateTime<Utc>) -> Result<&R> {
        let record = self.get_mut(id).ok_or_else(|| not_found::<R>(id))?;
        record.apply(patch);
        record.touch(now);
        Ok(record)
    }

    /// Run `f` against the record with `id` and refresh its update time
    pub fn modify<F>(&mut self, id: &str, now: DateTime<Utc>, f: F) -> Result<&R>
    where
        F: FnOnce(&mut R),
    {
        let record = self.get_mut(id).ok_or_else(|| not_found::<R>(id))?;
        f(record);
        record.touch(now);
        Ok(record)
    }

    /// Remove and return the record with `id`
    pub fn remove(&mut self, id: &str) -> Result<R> {
        let index = self
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| not_found::<R>(id))?;
        Ok(self.records.remove(index))
    }

    /// Keep only records matching `keep`, returning how many were dropped
    pub fn retain<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&R) -> bool,
    {
        let before = self.records.len();
        self.records.retain(keep);
        before - self.records.len()
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.records.len();
        self.records.clear();
        removed
    }

    /// Records matching `predicate`, in store order
    pub fn filter<F>(&self, predicate: F) -> Vec<&R>
    where
        F: Fn(&R) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).collect()
    }
}

fn not_found<R: Record>(id: &str) -> LifeosError {
    LifeosError::RecordNotFound {
        kind: R::KIND,
        id: id.to_string(),
    }
}

/// Whole state of one domain, persisted as a single snapshot under `KEY`
pub trait Persisted: Serialize + DeserializeOwned + Default {
    /// Fixed storage key (also the snapshot file stem)
    const KEY: &'static str;

    /// Sample data for a fresh workspace
    fn seed(now: DateTime<Utc>) -> Self;

    fn record_count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    /// Called after a record of `kind` was added
    fn after_insert(&mut self, _kind: &'static str, _id: &RecordId) {}

    /// Called after a record of `kind` was removed. Returns the number of
    /// dependent records removed with it.
    fn after_remove(&mut self, _kind: &'static str, _id: &RecordId) -> usize {
        0
    }
}
