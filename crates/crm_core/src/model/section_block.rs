//! Reusable page-builder section block model.

use crate::model::normalize::{epoch_ms, opt_embedded_json};
use crate::model::record::{
    merge_field, require_text, Record, RecordId, ValidationError, UNASSIGNED_ID,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical section block record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionBlock {
    #[serde(alias = "Id")]
    pub id: RecordId,
    #[serde(alias = "Name")]
    pub name: String,
    /// Block family such as `hero`, `features` or `testimonials`.
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: Value,
    #[serde(default, alias = "createdAt", deserialize_with = "epoch_ms")]
    pub created_at: i64,
    #[serde(default, alias = "updatedAt", deserialize_with = "epoch_ms")]
    pub updated_at: i64,
}

/// Partial section block update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionBlockPatch {
    #[serde(alias = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(
        deserialize_with = "opt_embedded_json",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<Value>,
}

impl Record for SectionBlock {
    type Patch = SectionBlockPatch;
    const COLLECTION: &'static str = "section_blocks";

    fn id(&self) -> RecordId {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate_new(patch: &SectionBlockPatch) -> Result<(), ValidationError> {
        require_text(Self::COLLECTION, "name", patch.name.as_deref())
    }

    fn from_patch(patch: SectionBlockPatch, now_ms: i64) -> Self {
        Self {
            id: UNASSIGNED_ID,
            name: patch.name.unwrap_or_default(),
            kind: patch.kind.unwrap_or_default(),
            content: patch.content.unwrap_or(Value::Null),
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    fn merge_patch(&mut self, patch: SectionBlockPatch, now_ms: i64) {
        merge_field(&mut self.name, patch.name);
        merge_field(&mut self.kind, patch.kind);
        merge_field(&mut self.content, patch.content);
        self.updated_at = now_ms;
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.kind.as_str()]
    }
}
