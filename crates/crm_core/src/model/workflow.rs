//! Automation workflow domain model.
//!
//! Trigger conditions and actions are opaque JSON documents owned by the
//! automation editor; core only stores them.

use crate::model::form::{PublishStatus, PUBLISH_STAGES};
use crate::model::normalize::{embedded_json, epoch_ms, opt_embedded_json};
use crate::model::record::{
    merge_field, require_text, Record, RecordId, Staged, ValidationError, UNASSIGNED_ID,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical workflow record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(alias = "Id")]
    pub id: RecordId,
    #[serde(alias = "Name")]
    pub name: String,
    /// Event that starts the workflow, e.g. `form_submitted`.
    #[serde(default, alias = "triggerType")]
    pub trigger_type: String,
    #[serde(default, alias = "triggerConditions", deserialize_with = "embedded_json")]
    pub trigger_conditions: Value,
    #[serde(default, deserialize_with = "embedded_json")]
    pub actions: Vec<Value>,
    #[serde(default)]
    pub status: PublishStatus,
    #[serde(default)]
    pub executions: u64,
    #[serde(default, alias = "createdAt", deserialize_with = "epoch_ms")]
    pub created_at: i64,
}

/// Partial workflow update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowPatch {
    #[serde(alias = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(alias = "triggerType", skip_serializing_if = "Option::is_none")]
    pub trigger_type: Option<String>,
    #[serde(
        alias = "triggerConditions",
        deserialize_with = "opt_embedded_json",
        skip_serializing_if = "Option::is_none"
    )]
    pub trigger_conditions: Option<Value>,
    #[serde(
        deserialize_with = "opt_embedded_json",
        skip_serializing_if = "Option::is_none"
    )]
    pub actions: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PublishStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executions: Option<u64>,
}

impl Record for Workflow {
    type Patch = WorkflowPatch;
    const COLLECTION: &'static str = "workflows";

    fn id(&self) -> RecordId {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate_new(patch: &WorkflowPatch) -> Result<(), ValidationError> {
        require_text(Self::COLLECTION, "name", patch.name.as_deref())
    }

    fn from_patch(patch: WorkflowPatch, now_ms: i64) -> Self {
        Self {
            id: UNASSIGNED_ID,
            name: patch.name.unwrap_or_default(),
            trigger_type: patch.trigger_type.unwrap_or_default(),
            trigger_conditions: patch
                .trigger_conditions
                .unwrap_or_else(|| Value::Object(Default::default())),
            actions: patch.actions.unwrap_or_default(),
            status: patch.status.unwrap_or_default(),
            executions: patch.executions.unwrap_or(0),
            created_at: now_ms,
        }
    }

    fn merge_patch(&mut self, patch: WorkflowPatch, _now_ms: i64) {
        merge_field(&mut self.name, patch.name);
        merge_field(&mut self.trigger_type, patch.trigger_type);
        merge_field(&mut self.trigger_conditions, patch.trigger_conditions);
        merge_field(&mut self.actions, patch.actions);
        merge_field(&mut self.status, patch.status);
        merge_field(&mut self.executions, patch.executions);
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.trigger_type.as_str()]
    }
}

impl Staged for Workflow {
    type Stage = PublishStatus;
    const STAGES: &'static [PublishStatus] = PUBLISH_STAGES;

    fn stage(&self) -> PublishStatus {
        self.status
    }

    fn set_stage(&mut self, stage: PublishStatus) {
        self.status = stage;
    }

    fn stage_patch(stage: PublishStatus) -> WorkflowPatch {
        WorkflowPatch {
            status: Some(stage),
            ..WorkflowPatch::default()
        }
    }
}
