//! Generic resource service.
//!
//! # Responsibility
//! - Provide the CRUD entry points every CRM screen calls.
//! - Apply defaults, validation and shallow merge before delegating storage.
//!
//! # Invariants
//! - Service APIs never bypass record validation.
//! - `update` never changes a record id.
//! - Service layer remains storage-agnostic.

use crate::model::record::{now_epoch_ms, Record, RecordId, Staged};
use crate::repo::{RecordRepository, RepoError, RepoResult};
use log::{info, warn};
use std::marker::PhantomData;

/// CRUD service for one record type over any repository.
pub struct ResourceService<R: Record, S: RecordRepository<R>> {
    repo: S,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record, S: RecordRepository<R>> ResourceService<R, S> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: S) -> Self {
        Self {
            repo,
            _record: PhantomData,
        }
    }

    pub fn repo(&self) -> &S {
        &self.repo
    }

    /// Returns a fresh copy of every record.
    pub fn get_all(&self) -> RepoResult<Vec<R>> {
        self.repo.list_records()
    }

    /// Returns one record or `NotFound`.
    pub fn get_by_id(&self, id: RecordId) -> RepoResult<R> {
        self.repo
            .get_record(id)?
            .ok_or_else(|| RepoError::not_found::<R>(id))
    }

    /// Returns records matching `predicate`, in stored order.
    pub fn find(&self, predicate: impl Fn(&R) -> bool) -> RepoResult<Vec<R>> {
        Ok(self
            .repo
            .list_records()?
            .into_iter()
            .filter(|record| predicate(record))
            .collect())
    }

    /// Validates `patch`, merges it over entity defaults and stores the result.
    ///
    /// # Errors
    /// - `Validation` when a required field is missing.
    /// - Repository errors unchanged.
    pub fn create(&self, patch: R::Patch) -> RepoResult<R> {
        if let Err(err) = R::validate_new(&patch) {
            warn!(
                "event=record_create module=service status=rejected collection={} reason=validation",
                R::COLLECTION
            );
            return Err(err.into());
        }

        let record = R::from_patch(patch, now_epoch_ms());
        record.validate()?;
        let stored = self.repo.insert_record(record)?;
        info!(
            "event=record_create module=service status=ok collection={} id={}",
            R::COLLECTION,
            stored.id()
        );
        Ok(stored)
    }

    /// Shallow-merges `patch` over the stored record.
    ///
    /// Fields absent from `patch` are preserved; the id never changes.
    pub fn update(&self, id: RecordId, patch: R::Patch) -> RepoResult<R> {
        let mut record = self.get_by_id(id)?;
        record.merge_patch(patch, now_epoch_ms());
        record.assign_id(id);
        record.validate()?;
        let stored = self.repo.update_record(&record)?;
        info!(
            "event=record_update module=service status=ok collection={} id={}",
            R::COLLECTION,
            id
        );
        Ok(stored)
    }

    /// Removes one record; returns `true` on success and `NotFound` if absent.
    pub fn delete(&self, id: RecordId) -> RepoResult<bool> {
        self.repo.delete_record(id)?;
        info!(
            "event=record_delete module=service status=ok collection={} id={}",
            R::COLLECTION,
            id
        );
        Ok(true)
    }
}

impl<R: Staged, S: RecordRepository<R>> ResourceService<R, S> {
    /// Changes only the stage/status field of one record.
    pub fn update_stage(&self, id: RecordId, stage: R::Stage) -> RepoResult<R> {
        self.update(id, R::stage_patch(stage))
    }

    /// Returns records whose stage equals `stage`.
    pub fn get_by_stage(&self, stage: R::Stage) -> RepoResult<Vec<R>> {
        self.find(|record| record.stage() == stage)
    }
}
