//! Drag-and-drop stage board.
//!
//! # Responsibility
//! - Bucket staged records into one column per stage.
//! - Move a record between columns and persist the new stage.
//!
//! # Invariants
//! - Columns follow `Staged::STAGES` order and always include empty stages.
//! - A failed move restores the record's previous stage.

use crate::model::record::{RecordId, Staged};
use crate::repo::{RecordRepository, RepoResult};
use crate::service::resource_service::ResourceService;
use log::{info, warn};

/// One rendered column.
#[derive(Debug)]
pub struct PipelineColumn<'a, R: Staged> {
    pub stage: R::Stage,
    pub records: Vec<&'a R>,
}

/// Result of a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// Unknown id or the record already sits in the target stage.
    Unchanged,
}

pub struct PipelineBoard<R: Staged> {
    records: Vec<R>,
}

impl<R: Staged> PipelineBoard<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self { records }
    }

    /// Builds a board from every record the service returns.
    pub fn load<S: RecordRepository<R>>(service: &ResourceService<R, S>) -> RepoResult<Self> {
        Ok(Self::new(service.get_all()?))
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Columns recomputed from the current local records.
    pub fn columns(&self) -> Vec<PipelineColumn<'_, R>> {
        R::STAGES
            .iter()
            .map(|stage| PipelineColumn {
                stage: *stage,
                records: self
                    .records
                    .iter()
                    .filter(|record| record.stage() == *stage)
                    .collect(),
            })
            .collect()
    }

    /// Moves one record to `to_stage`, optimistically.
    ///
    /// # Errors
    /// - Returns the service error after restoring the previous stage.
    pub fn move_record<S: RecordRepository<R>>(
        &mut self,
        id: RecordId,
        to_stage: R::Stage,
        service: &ResourceService<R, S>,
    ) -> RepoResult<MoveOutcome> {
        let Some(index) = self.records.iter().position(|record| record.id() == id) else {
            return Ok(MoveOutcome::Unchanged);
        };
        let previous = self.records[index].stage();
        if previous == to_stage {
            return Ok(MoveOutcome::Unchanged);
        }

        self.records[index].set_stage(to_stage);
        match service.update_stage(id, to_stage) {
            Ok(stored) => {
                self.records[index] = stored;
                info!(
                    "event=pipeline_move module=view status=ok collection={} id={} to={:?}",
                    R::COLLECTION,
                    id,
                    to_stage
                );
                Ok(MoveOutcome::Moved)
            }
            Err(err) => {
                self.records[index].set_stage(previous);
                warn!(
                    "event=pipeline_move module=view status=rolled_back collection={} id={} error={}",
                    R::COLLECTION,
                    id,
                    err
                );
                Err(err)
            }
        }
    }
}
