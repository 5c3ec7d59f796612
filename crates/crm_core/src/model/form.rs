//! Lead-capture form domain model.

use crate::model::normalize::{embedded_json, epoch_ms, opt_embedded_json};
use crate::model::record::{
    merge_field, require_text, Record, RecordId, Staged, ValidationError, UNASSIGNED_ID,
};
use serde::{Deserialize, Serialize};

/// Draft/active lifecycle shared by forms and automation workflows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PublishStatus {
    #[default]
    #[serde(alias = "draft")]
    Draft,
    #[serde(alias = "active")]
    Active,
    #[serde(alias = "inactive")]
    Inactive,
}

pub(crate) const PUBLISH_STAGES: &[PublishStatus] = &[
    PublishStatus::Draft,
    PublishStatus::Active,
    PublishStatus::Inactive,
];

/// One input rendered by a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormField {
    pub id: String,
    pub label: String,
    /// Input widget such as `text`, `email` or `select`.
    #[serde(rename = "type")]
    pub kind: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// Canonical form record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    #[serde(alias = "Id")]
    pub id: RecordId,
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(default, deserialize_with = "embedded_json")]
    pub fields: Vec<FormField>,
    #[serde(default)]
    pub submissions: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(default, alias = "conversionRate")]
    pub conversion_rate: f64,
    #[serde(default)]
    pub status: PublishStatus,
    #[serde(default, alias = "createdAt", deserialize_with = "epoch_ms")]
    pub created_at: i64,
}

/// Partial form update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormPatch {
    #[serde(alias = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        deserialize_with = "opt_embedded_json",
        skip_serializing_if = "Option::is_none"
    )]
    pub fields: Option<Vec<FormField>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submissions: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(alias = "conversionRate", skip_serializing_if = "Option::is_none")]
    pub conversion_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PublishStatus>,
}

impl Record for Form {
    type Patch = FormPatch;
    const COLLECTION: &'static str = "forms";

    fn id(&self) -> RecordId {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate_new(patch: &FormPatch) -> Result<(), ValidationError> {
        require_text(Self::COLLECTION, "name", patch.name.as_deref())
    }

    fn from_patch(patch: FormPatch, now_ms: i64) -> Self {
        Self {
            id: UNASSIGNED_ID,
            name: patch.name.unwrap_or_default(),
            fields: patch.fields.unwrap_or_default(),
            submissions: patch.submissions.unwrap_or(0),
            views: patch.views.unwrap_or(0),
            conversion_rate: patch.conversion_rate.unwrap_or(0.0),
            status: patch.status.unwrap_or_default(),
            created_at: now_ms,
        }
    }

    fn merge_patch(&mut self, patch: FormPatch, _now_ms: i64) {
        merge_field(&mut self.name, patch.name);
        merge_field(&mut self.fields, patch.fields);
        merge_field(&mut self.submissions, patch.submissions);
        merge_field(&mut self.views, patch.views);
        merge_field(&mut self.conversion_rate, patch.conversion_rate);
        merge_field(&mut self.status, patch.status);
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl Staged for Form {
    type Stage = PublishStatus;
    const STAGES: &'static [PublishStatus] = PUBLISH_STAGES;

    fn stage(&self) -> PublishStatus {
        self.status
    }

    fn set_stage(&mut self, stage: PublishStatus) {
        self.status = stage;
    }

    fn stage_patch(stage: PublishStatus) -> FormPatch {
        FormPatch {
            status: Some(stage),
            ..FormPatch::default()
        }
    }
}
