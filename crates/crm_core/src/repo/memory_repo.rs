//! In-memory record repository.
//!
//! # Responsibility
//! - Back the mock mode with a plain vector guarded by an `RwLock`.
//! - Optionally simulate backend latency on every call.
//!
//! # Invariants
//! - The id high-water mark starts at the max seeded id and never decreases.
//! - Mutations are never written back to seed files.

use crate::model::record::{Record, RecordId};
use crate::repo::{RecordRepository, RepoError, RepoResult};
use log::debug;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

struct MemoryState<R> {
    records: Vec<R>,
    last_id: RecordId,
}

/// Vector-backed repository for tests, demos and mock mode.
pub struct MemoryRepository<R: Record> {
    state: RwLock<MemoryState<R>>,
    latency: Duration,
}

impl<R: Record> Default for MemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> MemoryRepository<R> {
    /// Creates an empty repository; the first created record gets id `1`.
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Creates a repository pre-loaded with `records` in the given order.
    pub fn with_records(records: Vec<R>) -> Self {
        let last_id = records.iter().map(Record::id).max().unwrap_or(0);
        Self {
            state: RwLock::new(MemoryState { records, last_id }),
            latency: Duration::ZERO,
        }
    }

    /// Sleeps for `latency` before serving each call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn len(&self) -> usize {
        self.read().map(|state| state.records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, MemoryState<R>>> {
        self.state
            .read()
            .map_err(|_| RepoError::Storage("lock poisoned".into()))
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, MemoryState<R>>> {
        self.state
            .write()
            .map_err(|_| RepoError::Storage("lock poisoned".into()))
    }
}

impl<R: Record> RecordRepository<R> for MemoryRepository<R> {
    fn list_records(&self) -> RepoResult<Vec<R>> {
        self.simulate_latency();
        Ok(self.read()?.records.clone())
    }

    fn get_record(&self, id: RecordId) -> RepoResult<Option<R>> {
        self.simulate_latency();
        Ok(self
            .read()?
            .records
            .iter()
            .find(|record| record.id() == id)
            .cloned())
    }

    fn insert_record(&self, mut record: R) -> RepoResult<R> {
        self.simulate_latency();
        let mut state = self.write()?;
        let id = state.last_id + 1;
        record.assign_id(id);
        state.records.push(record.clone());
        state.last_id = id;
        debug!(
            "event=record_insert module=repo status=ok backend=memory collection={} id={}",
            R::COLLECTION,
            id
        );
        Ok(record)
    }

    fn update_record(&self, record: &R) -> RepoResult<R> {
        self.simulate_latency();
        let mut state = self.write()?;
        let slot = state
            .records
            .iter_mut()
            .find(|stored| stored.id() == record.id())
            .ok_or_else(|| RepoError::not_found::<R>(record.id()))?;
        *slot = record.clone();
        debug!(
            "event=record_update module=repo status=ok backend=memory collection={} id={}",
            R::COLLECTION,
            record.id()
        );
        Ok(record.clone())
    }

    fn delete_record(&self, id: RecordId) -> RepoResult<()> {
        self.simulate_latency();
        let mut state = self.write()?;
        let index = state
            .records
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| RepoError::not_found::<R>(id))?;
        state.records.remove(index);
        debug!(
            "event=record_delete module=repo status=ok backend=memory collection={} id={}",
            R::COLLECTION,
            id
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryRepository;
    use crate::model::contact::{Contact, ContactPatch};
    use crate::model::record::Record;
    use crate::repo::RecordRepository;

    fn contact(name: &str) -> Contact {
        Contact::from_patch(ContactPatch::new(name, format!("{name}@example.com")), 0)
    }

    #[test]
    fn ids_are_not_reused_after_deleting_the_newest_record() {
        let repo = MemoryRepository::new();
        let first = repo.insert_record(contact("a")).unwrap();
        let second = repo.insert_record(contact("b")).unwrap();
        repo.delete_record(second.id).unwrap();

        let third = repo.insert_record(contact("c")).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(third.id, 3);
    }

    #[test]
    fn seeded_repository_continues_after_max_id() {
        let mut seeded = contact("seed");
        seeded.id = 41;
        let repo = MemoryRepository::with_records(vec![seeded]);
        let created = repo.insert_record(contact("new")).unwrap();
        assert_eq!(created.id, 42);
        assert_eq!(repo.len(), 2);
    }
}
