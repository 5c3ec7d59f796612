//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical contact record used by lists and the sales pipeline.
//!
//! # Invariants
//! - `name` and `email` are required on create.
//! - `stage` always holds one of the four pipeline stages.

use crate::model::normalize::{epoch_ms, opt_epoch_ms, opt_string_list, string_list};
use crate::model::record::{
    merge_field, require_text, Record, RecordId, Staged, ValidationError, UNASSIGNED_ID,
};
use serde::{Deserialize, Serialize};

/// Sales pipeline stage, in column order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactStage {
    #[default]
    #[serde(alias = "lead")]
    Lead,
    #[serde(alias = "qualified")]
    Qualified,
    #[serde(alias = "proposal")]
    Proposal,
    #[serde(alias = "customer")]
    Customer,
}

/// Canonical contact record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(alias = "Id")]
    pub id: RecordId,
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub source: String,
    #[serde(default, alias = "Owner")]
    pub owner: String,
    #[serde(default, alias = "Tags", deserialize_with = "string_list")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub stage: ContactStage,
    #[serde(default)]
    pub score: u32,
    /// Unix epoch milliseconds of the last interaction.
    #[serde(default, alias = "lastActivity", deserialize_with = "epoch_ms")]
    pub last_activity: i64,
}

/// Partial contact update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactPatch {
    #[serde(alias = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(alias = "Owner", skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(
        alias = "Tags",
        deserialize_with = "opt_string_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<ContactStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(
        alias = "lastActivity",
        deserialize_with = "opt_epoch_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_activity: Option<i64>,
}

impl ContactPatch {
    /// Patch carrying the two required create fields.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            ..Self::default()
        }
    }
}

impl Record for Contact {
    type Patch = ContactPatch;
    const COLLECTION: &'static str = "contacts";

    fn id(&self) -> RecordId {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate_new(patch: &ContactPatch) -> Result<(), ValidationError> {
        require_text(Self::COLLECTION, "name", patch.name.as_deref())?;
        require_text(Self::COLLECTION, "email", patch.email.as_deref())
    }

    fn from_patch(patch: ContactPatch, now_ms: i64) -> Self {
        Self {
            id: UNASSIGNED_ID,
            name: patch.name.unwrap_or_default(),
            email: patch.email.unwrap_or_default(),
            phone: patch.phone.unwrap_or_default(),
            company: patch.company.unwrap_or_default(),
            position: patch.position.unwrap_or_default(),
            source: patch.source.unwrap_or_default(),
            owner: patch.owner.unwrap_or_default(),
            tags: patch.tags.unwrap_or_default(),
            stage: patch.stage.unwrap_or_default(),
            score: patch.score.unwrap_or(0),
            last_activity: patch.last_activity.unwrap_or(now_ms),
        }
    }

    fn merge_patch(&mut self, patch: ContactPatch, _now_ms: i64) {
        merge_field(&mut self.name, patch.name);
        merge_field(&mut self.email, patch.email);
        merge_field(&mut self.phone, patch.phone);
        merge_field(&mut self.company, patch.company);
        merge_field(&mut self.position, patch.position);
        merge_field(&mut self.source, patch.source);
        merge_field(&mut self.owner, patch.owner);
        merge_field(&mut self.tags, patch.tags);
        merge_field(&mut self.stage, patch.stage);
        merge_field(&mut self.score, patch.score);
        merge_field(&mut self.last_activity, patch.last_activity);
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.email.as_str(),
            self.company.as_str(),
        ]
    }
}

impl Staged for Contact {
    type Stage = ContactStage;
    const STAGES: &'static [ContactStage] = &[
        ContactStage::Lead,
        ContactStage::Qualified,
        ContactStage::Proposal,
        ContactStage::Customer,
    ];

    fn stage(&self) -> ContactStage {
        self.stage
    }

    fn set_stage(&mut self, stage: ContactStage) {
        self.stage = stage;
    }

    fn stage_patch(stage: ContactStage) -> ContactPatch {
        ContactPatch {
            stage: Some(stage),
            ..ContactPatch::default()
        }
    }
}
