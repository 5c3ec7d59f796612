//! Remote backend repository adapter.
//!
//! # Responsibility
//! - Forward record CRUD to a hosted backend through the `RemoteClient` seam.
//! - Translate backend envelopes (success flags, per-record results and
//!   field errors) into `RepoError::Remote`.
//!
//! # Invariants
//! - A `success = false` envelope never yields data.
//! - The first field-level error wins and is reported as `label: message`.
//! - The transport itself is out of scope; clients own it.

use crate::model::record::{Record, RecordId};
use crate::repo::{RecordRepository, RepoError, RepoResult};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

/// Backend-reported failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    pub collection: &'static str,
    pub operation: &'static str,
    pub message: String,
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "remote {} on {} failed: {}",
            self.operation, self.collection, self.message
        )
    }
}

impl Error for RemoteError {}

/// Field-level validation error returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteFieldError {
    #[serde(alias = "fieldLabel")]
    pub field_label: String,
    pub message: String,
}

/// Outcome for one record in a batch write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteRecordResult {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<Value>,
    pub errors: Vec<RemoteFieldError>,
}

/// Response envelope returned by every backend call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteEnvelope {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<Value>,
    pub results: Vec<RemoteRecordResult>,
}

impl RemoteEnvelope {
    /// Successful envelope carrying `data`.
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            ..Self::default()
        }
    }

    /// Failed envelope carrying a top-level message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Transport seam for the hosted backend.
///
/// `table` is the record collection name. Payloads are plain JSON objects.
pub trait RemoteClient {
    fn fetch_records(&self, table: &str) -> RemoteEnvelope;
    fn get_record_by_id(&self, table: &str, id: RecordId) -> RemoteEnvelope;
    fn create_record(&self, table: &str, record: Value) -> RemoteEnvelope;
    fn update_record(&self, table: &str, id: RecordId, record: Value) -> RemoteEnvelope;
    fn delete_record(&self, table: &str, id: RecordId) -> RemoteEnvelope;
}

/// Repository that forwards every call to a `RemoteClient`.
pub struct RemoteRepository<C: RemoteClient, R: Record> {
    client: C,
    _record: PhantomData<fn() -> R>,
}

impl<C: RemoteClient, R: Record> RemoteRepository<C, R> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            _record: PhantomData,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn check(
        &self,
        operation: &'static str,
        envelope: RemoteEnvelope,
    ) -> RepoResult<RemoteEnvelope> {
        if !envelope.success {
            return Err(self.fail(
                operation,
                envelope
                    .message
                    .unwrap_or_else(|| "backend reported failure".to_string()),
            ));
        }

        if let Some(failed) = envelope.results.iter().find(|result| !result.success) {
            let message = failed
                .errors
                .first()
                .map(|err| format!("{}: {}", err.field_label, err.message))
                .or_else(|| failed.message.clone())
                .unwrap_or_else(|| "record rejected by backend".to_string());
            return Err(self.fail(operation, message));
        }

        Ok(envelope)
    }

    fn fail(&self, operation: &'static str, message: String) -> RepoError {
        warn!(
            "event=remote_call module=repo status=error collection={} operation={}",
            R::COLLECTION,
            operation
        );
        RepoError::Remote(RemoteError {
            collection: R::COLLECTION,
            operation,
            message,
        })
    }

    /// Record payload from the first successful result, else the envelope.
    fn written_record(&self, operation: &'static str, envelope: RemoteEnvelope) -> RepoResult<R> {
        let data = envelope
            .results
            .into_iter()
            .find_map(|result| result.data)
            .or(envelope.data)
            .filter(|value| !value.is_null())
            .ok_or_else(|| self.fail(operation, "backend returned no record".to_string()))?;
        Ok(serde_json::from_value(data)?)
    }
}

impl<C: RemoteClient, R: Record> RecordRepository<R> for RemoteRepository<C, R> {
    fn list_records(&self) -> RepoResult<Vec<R>> {
        let envelope = self.check("fetch", self.client.fetch_records(R::COLLECTION))?;
        match envelope.data {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(data) => Ok(serde_json::from_value(data)?),
        }
    }

    fn get_record(&self, id: RecordId) -> RepoResult<Option<R>> {
        let envelope = self.check("get", self.client.get_record_by_id(R::COLLECTION, id))?;
        match envelope.data {
            None | Some(Value::Null) => Ok(None),
            Some(data) => Ok(Some(serde_json::from_value(data)?)),
        }
    }

    fn insert_record(&self, record: R) -> RepoResult<R> {
        let mut payload = serde_json::to_value(&record)?;
        if let Value::Object(fields) = &mut payload {
            fields.remove("id");
        }
        let envelope = self.check("create", self.client.create_record(R::COLLECTION, payload))?;
        self.written_record("create", envelope)
    }

    fn update_record(&self, record: &R) -> RepoResult<R> {
        let payload = serde_json::to_value(record)?;
        let envelope = self.check(
            "update",
            self.client.update_record(R::COLLECTION, record.id(), payload),
        )?;
        let mut stored: R = self.written_record("update", envelope)?;
        stored.assign_id(record.id());
        Ok(stored)
    }

    fn delete_record(&self, id: RecordId) -> RepoResult<()> {
        self.check("delete", self.client.delete_record(R::COLLECTION, id))?;
        Ok(())
    }
}
