//! SMS conversation and message models.
//!
//! # Invariants
//! - Messages belong to exactly one conversation via `conversation_id`.
//! - A conversation's `last_message` mirrors the newest sent message.

use crate::model::normalize::{epoch_ms, opt_epoch_ms};
use crate::model::record::{
    merge_field, require_text, Record, RecordId, Staged, ValidationError, UNASSIGNED_ID,
};
use serde::{Deserialize, Serialize};

/// Conversation triage state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    #[default]
    #[serde(alias = "New")]
    New,
    #[serde(alias = "Active")]
    Active,
    #[serde(alias = "Closed")]
    Closed,
}

/// Canonical SMS conversation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsConversation {
    #[serde(alias = "Id")]
    pub id: RecordId,
    #[serde(default, alias = "Name")]
    pub name: String,
    #[serde(alias = "customerName")]
    pub customer_name: String,
    #[serde(alias = "phoneNumber")]
    pub phone_number: String,
    #[serde(default, alias = "lastMessage")]
    pub last_message: String,
    #[serde(default, alias = "lastMessageTime", deserialize_with = "epoch_ms")]
    pub last_message_time: i64,
    #[serde(default, alias = "unreadCount")]
    pub unread_count: u32,
    #[serde(default)]
    pub status: ConversationStatus,
}

/// Partial conversation update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmsConversationPatch {
    #[serde(alias = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(alias = "customerName", skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(alias = "phoneNumber", skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(alias = "lastMessage", skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    #[serde(
        alias = "lastMessageTime",
        deserialize_with = "opt_epoch_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_message_time: Option<i64>,
    #[serde(alias = "unreadCount", skip_serializing_if = "Option::is_none")]
    pub unread_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ConversationStatus>,
}

impl Record for SmsConversation {
    type Patch = SmsConversationPatch;
    const COLLECTION: &'static str = "sms_conversations";

    fn id(&self) -> RecordId {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate_new(patch: &SmsConversationPatch) -> Result<(), ValidationError> {
        require_text(
            Self::COLLECTION,
            "customer_name",
            patch.customer_name.as_deref(),
        )?;
        require_text(Self::COLLECTION, "phone_number", patch.phone_number.as_deref())
    }

    fn from_patch(patch: SmsConversationPatch, now_ms: i64) -> Self {
        let customer_name = patch.customer_name.unwrap_or_default();
        let name = patch
            .name
            .unwrap_or_else(|| format!("Conversation with {customer_name}"));
        Self {
            id: UNASSIGNED_ID,
            name,
            customer_name,
            phone_number: patch.phone_number.unwrap_or_default(),
            last_message: patch.last_message.unwrap_or_default(),
            last_message_time: patch.last_message_time.unwrap_or(now_ms),
            unread_count: patch.unread_count.unwrap_or(0),
            status: patch.status.unwrap_or_default(),
        }
    }

    fn merge_patch(&mut self, patch: SmsConversationPatch, _now_ms: i64) {
        merge_field(&mut self.name, patch.name);
        merge_field(&mut self.customer_name, patch.customer_name);
        merge_field(&mut self.phone_number, patch.phone_number);
        merge_field(&mut self.last_message, patch.last_message);
        merge_field(&mut self.last_message_time, patch.last_message_time);
        merge_field(&mut self.unread_count, patch.unread_count);
        merge_field(&mut self.status, patch.status);
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.customer_name.as_str(),
            self.phone_number.as_str(),
            self.last_message.as_str(),
        ]
    }
}

impl Staged for SmsConversation {
    type Stage = ConversationStatus;
    const STAGES: &'static [ConversationStatus] = &[
        ConversationStatus::New,
        ConversationStatus::Active,
        ConversationStatus::Closed,
    ];

    fn stage(&self) -> ConversationStatus {
        self.status
    }

    fn set_stage(&mut self, stage: ConversationStatus) {
        self.status = stage;
    }

    fn stage_patch(stage: ConversationStatus) -> SmsConversationPatch {
        SmsConversationPatch {
            status: Some(stage),
            ..SmsConversationPatch::default()
        }
    }
}

/// Author side of one SMS message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSender {
    Customer,
    Agent,
}

/// One message inside a conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsMessage {
    #[serde(alias = "Id")]
    pub id: RecordId,
    #[serde(alias = "conversationId")]
    pub conversation_id: RecordId,
    pub content: String,
    pub sender: MessageSender,
    /// Unix epoch milliseconds.
    #[serde(deserialize_with = "epoch_ms")]
    pub timestamp: i64,
}

/// Caller input for sending a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub conversation_id: RecordId,
    pub content: String,
    pub sender: MessageSender,
}

impl OutgoingMessage {
    /// Agent-authored message, the common case for the SMS inbox.
    pub fn from_agent(conversation_id: RecordId, content: impl Into<String>) -> Self {
        Self {
            conversation_id,
            content: content.into(),
            sender: MessageSender::Agent,
        }
    }
}
