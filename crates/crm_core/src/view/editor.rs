//! Create/edit form session.
//!
//! # Invariants
//! - A failed submit keeps the draft so the user can fix and resubmit.
//! - After a successful submit the session edits the stored record.

use crate::model::record::{Record, RecordId};
use crate::repo::{RecordRepository, RepoResult};
use crate::service::resource_service::ResourceService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(RecordId),
}

/// Draft patch plus the record it will be applied to.
pub struct EditorSession<R: Record> {
    mode: EditorMode,
    record: Option<R>,
    draft: R::Patch,
    last_error: Option<String>,
}

impl<R: Record> Default for EditorSession<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> EditorSession<R> {
    /// Session for a record that does not exist yet.
    pub fn new() -> Self {
        Self {
            mode: EditorMode::Create,
            record: None,
            draft: R::Patch::default(),
            last_error: None,
        }
    }

    /// Session editing `record`; the draft starts empty.
    pub fn edit(record: R) -> Self {
        Self {
            mode: EditorMode::Edit(record.id()),
            record: Some(record),
            draft: R::Patch::default(),
            last_error: None,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Last stored version, if any.
    pub fn record(&self) -> Option<&R> {
        self.record.as_ref()
    }

    pub fn draft(&self) -> &R::Patch {
        &self.draft
    }

    pub fn patch_mut(&mut self) -> &mut R::Patch {
        &mut self.draft
    }

    /// Display message of the last failed submit.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Creates or updates through `service`.
    pub fn submit<S: RecordRepository<R>>(
        &mut self,
        service: &ResourceService<R, S>,
    ) -> RepoResult<R> {
        let draft = self.draft.clone();
        let result = match self.mode {
            EditorMode::Create => service.create(draft),
            EditorMode::Edit(id) => service.update(id, draft),
        };

        match result {
            Ok(stored) => {
                self.mode = EditorMode::Edit(stored.id());
                self.record = Some(stored.clone());
                self.draft = R::Patch::default();
                self.last_error = None;
                Ok(stored)
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }
}
