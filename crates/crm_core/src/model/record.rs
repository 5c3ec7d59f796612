//! Record contracts shared by every CRM entity.
//!
//! # Responsibility
//! - Describe how an entity is created from a patch, merged and validated.
//! - Describe stage/status bucketing for pipeline and lifecycle views.
//!
//! # Invariants
//! - `assign_id` is only called by repositories when a record is first stored.
//! - `merge_patch` never touches the record id.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Numeric record identifier, unique per collection.
pub type RecordId = i64;

/// Placeholder id carried by records that have not been stored yet.
pub const UNASSIGNED_ID: RecordId = 0;

/// Field-level validation failure raised before any repository call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is absent or blank.
    MissingField {
        collection: &'static str,
        field: &'static str,
    },
    /// Time range ends before it starts.
    InvalidRange {
        collection: &'static str,
        start: i64,
        end: i64,
    },
    /// Field is present but malformed.
    InvalidValue {
        collection: &'static str,
        field: &'static str,
        message: String,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { collection, field } => {
                write!(f, "{collection}: `{field}` is required")
            }
            Self::InvalidRange {
                collection,
                start,
                end,
            } => write!(f, "{collection}: end {end} is earlier than start {start}"),
            Self::InvalidValue {
                collection,
                field,
                message,
            } => write!(f, "{collection}: invalid `{field}`: {message}"),
        }
    }
}

impl Error for ValidationError {}

/// Canonical entity stored in one collection.
pub trait Record:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Partial update shape. Every field is optional; present fields win.
    type Patch: Clone + Debug + Default + Serialize + DeserializeOwned + Send + Sync;

    /// Stable collection name, also used as the seed file stem.
    const COLLECTION: &'static str;

    fn id(&self) -> RecordId;

    /// Sets the id of a freshly created record.
    fn assign_id(&mut self, id: RecordId);

    /// Checks that a create patch carries every required field.
    fn validate_new(patch: &Self::Patch) -> Result<(), ValidationError>;

    /// Builds an unstored record by merging `patch` over entity defaults.
    ///
    /// The returned record carries `UNASSIGNED_ID`.
    fn from_patch(patch: Self::Patch, now_ms: i64) -> Self;

    /// Shallow-merges `patch` over this record.
    fn merge_patch(&mut self, patch: Self::Patch, now_ms: i64);

    /// Whole-record invariants checked on every write.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Text fields matched by client-side search.
    fn search_fields(&self) -> Vec<&str>;
}

/// Record bucketed into ordered stage/status columns.
pub trait Staged: Record {
    type Stage: Copy + Debug + Eq + Send + Sync + 'static;

    /// Every stage in column order.
    const STAGES: &'static [Self::Stage];

    fn stage(&self) -> Self::Stage;

    fn set_stage(&mut self, stage: Self::Stage);

    /// Patch that changes only the stage field.
    fn stage_patch(stage: Self::Stage) -> Self::Patch;
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

/// Fails when a required text field is absent or blank.
pub(crate) fn require_text(
    collection: &'static str,
    field: &'static str,
    value: Option<&str>,
) -> Result<(), ValidationError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(()),
        _ => Err(ValidationError::MissingField { collection, field }),
    }
}

/// Fails when a required non-text field is absent.
pub(crate) fn require_present<T>(
    collection: &'static str,
    field: &'static str,
    value: Option<&T>,
) -> Result<(), ValidationError> {
    match value {
        Some(_) => Ok(()),
        None => Err(ValidationError::MissingField { collection, field }),
    }
}

/// Overwrites `target` when the patch carries a value.
pub(crate) fn merge_field<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

#[cfg(test)]
mod tests {
    use super::{merge_field, require_text, ValidationError};

    #[test]
    fn require_text_rejects_blank_values() {
        let err = require_text("contacts", "name", Some("   ")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                collection: "contacts",
                field: "name"
            }
        );
        assert!(require_text("contacts", "name", Some("Ada")).is_ok());
    }

    #[test]
    fn merge_field_keeps_value_without_patch() {
        let mut value = 3;
        merge_field(&mut value, None);
        assert_eq!(value, 3);
        merge_field(&mut value, Some(7));
        assert_eq!(value, 7);
    }
}
