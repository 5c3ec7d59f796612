//! Email campaign domain model.

use crate::model::normalize::epoch_ms;
use crate::model::record::{
    merge_field, require_text, Record, RecordId, Staged, ValidationError, UNASSIGNED_ID,
};
use serde::{Deserialize, Serialize};

/// Campaign lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CampaignStatus {
    #[default]
    #[serde(alias = "draft")]
    Draft,
    #[serde(alias = "scheduled")]
    Scheduled,
    #[serde(alias = "active")]
    Active,
    #[serde(alias = "paused")]
    Paused,
    #[serde(alias = "completed")]
    Completed,
}

/// Canonical email campaign record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    #[serde(alias = "Id")]
    pub id: RecordId,
    #[serde(alias = "Name")]
    pub name: String,
    /// Campaign flavor such as `newsletter` or `promotional`.
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub status: CampaignStatus,
    #[serde(default)]
    pub recipients: u64,
    #[serde(default)]
    pub sent: u64,
    #[serde(default)]
    pub delivered: u64,
    #[serde(default)]
    pub bounced: u64,
    /// Percentage in `0.0..=100.0`.
    #[serde(default, alias = "openRate")]
    pub open_rate: f64,
    /// Percentage in `0.0..=100.0`.
    #[serde(default, alias = "clickRate")]
    pub click_rate: f64,
    #[serde(default, alias = "createdAt", deserialize_with = "epoch_ms")]
    pub created_at: i64,
}

/// Partial campaign update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignPatch {
    #[serde(alias = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CampaignStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipients: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounced: Option<u64>,
    #[serde(alias = "openRate", skip_serializing_if = "Option::is_none")]
    pub open_rate: Option<f64>,
    #[serde(alias = "clickRate", skip_serializing_if = "Option::is_none")]
    pub click_rate: Option<f64>,
}

impl Record for Campaign {
    type Patch = CampaignPatch;
    const COLLECTION: &'static str = "campaigns";

    fn id(&self) -> RecordId {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate_new(patch: &CampaignPatch) -> Result<(), ValidationError> {
        require_text(Self::COLLECTION, "name", patch.name.as_deref())
    }

    fn from_patch(patch: CampaignPatch, now_ms: i64) -> Self {
        Self {
            id: UNASSIGNED_ID,
            name: patch.name.unwrap_or_default(),
            kind: patch.kind.unwrap_or_default(),
            subject: patch.subject.unwrap_or_default(),
            template: patch.template.unwrap_or_default(),
            status: patch.status.unwrap_or_default(),
            recipients: patch.recipients.unwrap_or(0),
            sent: patch.sent.unwrap_or(0),
            delivered: patch.delivered.unwrap_or(0),
            bounced: patch.bounced.unwrap_or(0),
            open_rate: patch.open_rate.unwrap_or(0.0),
            click_rate: patch.click_rate.unwrap_or(0.0),
            created_at: now_ms,
        }
    }

    fn merge_patch(&mut self, patch: CampaignPatch, _now_ms: i64) {
        merge_field(&mut self.name, patch.name);
        merge_field(&mut self.kind, patch.kind);
        merge_field(&mut self.subject, patch.subject);
        merge_field(&mut self.template, patch.template);
        merge_field(&mut self.status, patch.status);
        merge_field(&mut self.recipients, patch.recipients);
        merge_field(&mut self.sent, patch.sent);
        merge_field(&mut self.delivered, patch.delivered);
        merge_field(&mut self.bounced, patch.bounced);
        merge_field(&mut self.open_rate, patch.open_rate);
        merge_field(&mut self.click_rate, patch.click_rate);
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.subject.as_str()]
    }
}

impl Staged for Campaign {
    type Stage = CampaignStatus;
    const STAGES: &'static [CampaignStatus] = &[
        CampaignStatus::Draft,
        CampaignStatus::Scheduled,
        CampaignStatus::Active,
        CampaignStatus::Paused,
        CampaignStatus::Completed,
    ];

    fn stage(&self) -> CampaignStatus {
        self.status
    }

    fn set_stage(&mut self, stage: CampaignStatus) {
        self.status = stage;
    }

    fn stage_patch(stage: CampaignStatus) -> CampaignPatch {
        CampaignPatch {
            status: Some(stage),
            ..CampaignPatch::default()
        }
    }
}
