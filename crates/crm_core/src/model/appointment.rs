//! Calendar appointment domain model.
//!
//! # Invariants
//! - `end` is never earlier than `start`.
//! - The contact link is a denormalized `contact_id`/`contact_name` pair and
//!   is not checked against the contacts collection.

use crate::model::normalize::{epoch_ms, opt_epoch_ms, opt_string_list, string_list};
use crate::model::record::{
    merge_field, require_present, require_text, Record, RecordId, Staged, ValidationError,
    UNASSIGNED_ID,
};
use serde::{Deserialize, Serialize};

/// Appointment confirmation state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    #[serde(alias = "Pending")]
    Pending,
    #[serde(alias = "Confirmed")]
    Confirmed,
    #[serde(alias = "Completed")]
    Completed,
    #[serde(alias = "Cancelled")]
    Cancelled,
}

/// Canonical appointment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(alias = "Id")]
    pub id: RecordId,
    pub title: String,
    /// Unix epoch milliseconds.
    #[serde(deserialize_with = "epoch_ms")]
    pub start: i64,
    /// Unix epoch milliseconds, `>= start`.
    #[serde(deserialize_with = "epoch_ms")]
    pub end: i64,
    /// Meeting flavor such as `call`, `demo` or `meeting`.
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default, alias = "contactId")]
    pub contact_id: Option<RecordId>,
    #[serde(default, alias = "contactName")]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "string_list")]
    pub attendees: Vec<String>,
}

/// Partial appointment update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(deserialize_with = "opt_epoch_ms", skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(deserialize_with = "opt_epoch_ms", skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(alias = "contactId", skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<RecordId>,
    #[serde(alias = "contactName", skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(
        deserialize_with = "opt_string_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub attendees: Option<Vec<String>>,
}

impl Appointment {
    /// Returns whether this appointment lies fully inside `[start, end]`.
    pub fn within(&self, start: i64, end: i64) -> bool {
        self.start >= start && self.end <= end
    }
}

impl Record for Appointment {
    type Patch = AppointmentPatch;
    const COLLECTION: &'static str = "appointments";

    fn id(&self) -> RecordId {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate_new(patch: &AppointmentPatch) -> Result<(), ValidationError> {
        require_text(Self::COLLECTION, "title", patch.title.as_deref())?;
        require_present(Self::COLLECTION, "start", patch.start.as_ref())?;
        require_present(Self::COLLECTION, "end", patch.end.as_ref())
    }

    fn from_patch(patch: AppointmentPatch, _now_ms: i64) -> Self {
        Self {
            id: UNASSIGNED_ID,
            title: patch.title.unwrap_or_default(),
            start: patch.start.unwrap_or(0),
            end: patch.end.unwrap_or(0),
            kind: patch.kind.unwrap_or_default(),
            status: patch.status.unwrap_or_default(),
            contact_id: patch.contact_id,
            contact_name: patch.contact_name,
            description: patch.description.unwrap_or_default(),
            location: patch.location.unwrap_or_default(),
            attendees: patch.attendees.unwrap_or_default(),
        }
    }

    fn merge_patch(&mut self, patch: AppointmentPatch, _now_ms: i64) {
        merge_field(&mut self.title, patch.title);
        merge_field(&mut self.start, patch.start);
        merge_field(&mut self.end, patch.end);
        merge_field(&mut self.kind, patch.kind);
        merge_field(&mut self.status, patch.status);
        if patch.contact_id.is_some() {
            self.contact_id = patch.contact_id;
        }
        if patch.contact_name.is_some() {
            self.contact_name = patch.contact_name;
        }
        merge_field(&mut self.description, patch.description);
        merge_field(&mut self.location, patch.location);
        merge_field(&mut self.attendees, patch.attendees);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.end < self.start {
            return Err(ValidationError::InvalidRange {
                collection: Self::COLLECTION,
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.location.as_str()];
        if let Some(contact_name) = self.contact_name.as_deref() {
            fields.push(contact_name);
        }
        fields
    }
}

impl Staged for Appointment {
    type Stage = AppointmentStatus;
    const STAGES: &'static [AppointmentStatus] = &[
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    fn stage(&self) -> AppointmentStatus {
        self.status
    }

    fn set_stage(&mut self, stage: AppointmentStatus) {
        self.status = stage;
    }

    fn stage_patch(stage: AppointmentStatus) -> AppointmentPatch {
        AppointmentPatch {
            status: Some(stage),
            ..AppointmentPatch::default()
        }
    }
}
