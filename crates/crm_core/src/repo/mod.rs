//! Repository layer abstractions and storage implementations.
//!
//! # Responsibility
//! - Define one generic data access contract shared by every CRM entity.
//! - Provide in-memory (mock), SQLite and remote-backend implementations.
//! - Isolate storage details from service orchestration.
//!
//! # Invariants
//! - `insert_record` assigns an id strictly greater than every id previously
//!   assigned in the same collection.
//! - `update_record` and `delete_record` return `NotFound` for absent ids.
//! - Read paths return owned copies; callers never alias stored state.

pub mod memory_repo;
pub mod remote_repo;
pub mod seed;
pub mod sqlite_repo;

use crate::db::DbError;
use crate::model::record::{Record, RecordId, ValidationError};
use remote_repo::RemoteError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error covering every storage flavor.
#[derive(Debug)]
pub enum RepoError {
    /// Requested id is absent from the collection.
    NotFound {
        collection: &'static str,
        id: RecordId,
    },
    /// Required field missing or malformed before the write was attempted.
    Validation(ValidationError),
    /// Remote backend reported failure.
    Remote(RemoteError),
    Db(DbError),
    /// Stored or received payload does not decode into the record schema.
    InvalidData(String),
    /// In-process storage is unusable (poisoned lock).
    Storage(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { collection, id } => write!(f, "{collection} record not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Remote(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid record data: {message}"),
            Self::Storage(message) => write!(f, "record storage error: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Remote(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::InvalidData(_) | Self::Storage(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RemoteError> for RepoError {
    fn from(value: RemoteError) -> Self {
        Self::Remote(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidData(value.to_string())
    }
}

impl RepoError {
    pub fn not_found<R: Record>(id: RecordId) -> Self {
        Self::NotFound {
            collection: R::COLLECTION,
            id,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Repository interface for one record collection.
pub trait RecordRepository<R: Record> {
    /// Returns every record in stored order.
    fn list_records(&self) -> RepoResult<Vec<R>>;
    /// Returns one record, or `None` when absent.
    fn get_record(&self, id: RecordId) -> RepoResult<Option<R>>;
    /// Stores a new record and returns the stored copy with its assigned id.
    fn insert_record(&self, record: R) -> RepoResult<R>;
    /// Replaces an existing record and returns the stored copy.
    fn update_record(&self, record: &R) -> RepoResult<R>;
    /// Removes one record.
    fn delete_record(&self, id: RecordId) -> RepoResult<()>;
}

impl<R: Record, T: RecordRepository<R> + ?Sized> RecordRepository<R> for &T {
    fn list_records(&self) -> RepoResult<Vec<R>> {
        (**self).list_records()
    }

    fn get_record(&self, id: RecordId) -> RepoResult<Option<R>> {
        (**self).get_record(id)
    }

    fn insert_record(&self, record: R) -> RepoResult<R> {
        (**self).insert_record(record)
    }

    fn update_record(&self, record: &R) -> RepoResult<R> {
        (**self).update_record(record)
    }

    fn delete_record(&self, id: RecordId) -> RepoResult<()> {
        (**self).delete_record(id)
    }
}

impl<R: Record, T: RecordRepository<R> + ?Sized> RecordRepository<R> for Arc<T> {
    fn list_records(&self) -> RepoResult<Vec<R>> {
        (**self).list_records()
    }

    fn get_record(&self, id: RecordId) -> RepoResult<Option<R>> {
        (**self).get_record(id)
    }

    fn insert_record(&self, record: R) -> RepoResult<R> {
        (**self).insert_record(record)
    }

    fn update_record(&self, record: &R) -> RepoResult<R> {
        (**self).update_record(record)
    }

    fn delete_record(&self, id: RecordId) -> RepoResult<()> {
        (**self).delete_record(id)
    }
}
