//! SMS inbox use-case service.
//!
//! # Responsibility
//! - Provide conversation CRUD plus per-conversation message threads.
//! - Own every delete path so no thread outlives its conversation.
//! - Keep a conversation's `last_message` in step with sent messages.
//!
//! # Invariants
//! - Message ids come from one counter starting at 100 and are never reused.
//! - Deleting a conversation drops its thread.
//! - Messages are only accepted for existing conversations.
//! - A failed conversation refresh after sending never fails the send.

use crate::model::record::{now_epoch_ms, RecordId, ValidationError};
use crate::model::sms::{
    ConversationStatus, OutgoingMessage, SmsConversation, SmsConversationPatch, SmsMessage,
};
use crate::repo::{RecordRepository, RepoError, RepoResult};
use crate::service::resource_service::ResourceService;
use log::{info, warn};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockWriteGuard};

const FIRST_MESSAGE_ID: RecordId = 100;

struct MessageLog {
    threads: BTreeMap<RecordId, Vec<SmsMessage>>,
    last_id: RecordId,
}

/// Conversation service with an in-process message store.
pub struct SmsService<S: RecordRepository<SmsConversation>> {
    conversations: ResourceService<SmsConversation, S>,
    messages: RwLock<MessageLog>,
}

impl<S: RecordRepository<SmsConversation>> SmsService<S> {
    pub fn new(repo: S) -> Self {
        Self::with_messages(repo, Vec::new())
    }

    /// Creates the service with pre-existing message history.
    pub fn with_messages(repo: S, history: Vec<SmsMessage>) -> Self {
        let last_id = history
            .iter()
            .map(|message| message.id)
            .max()
            .unwrap_or(0)
            .max(FIRST_MESSAGE_ID - 1);
        let mut threads: BTreeMap<RecordId, Vec<SmsMessage>> = BTreeMap::new();
        for message in history {
            threads
                .entry(message.conversation_id)
                .or_default()
                .push(message);
        }

        Self {
            conversations: ResourceService::new(repo),
            messages: RwLock::new(MessageLog { threads, last_id }),
        }
    }

    pub fn get_conversations(&self) -> RepoResult<Vec<SmsConversation>> {
        self.conversations.get_all()
    }

    pub fn get_conversation(&self, id: RecordId) -> RepoResult<SmsConversation> {
        self.conversations.get_by_id(id)
    }

    pub fn create_conversation(&self, patch: SmsConversationPatch) -> RepoResult<SmsConversation> {
        self.conversations.create(patch)
    }

    pub fn update_conversation(
        &self,
        id: RecordId,
        patch: SmsConversationPatch,
    ) -> RepoResult<SmsConversation> {
        self.conversations.update(id, patch)
    }

    pub fn update_status(
        &self,
        id: RecordId,
        status: ConversationStatus,
    ) -> RepoResult<SmsConversation> {
        self.conversations.update_stage(id, status)
    }

    pub fn get_by_status(&self, status: ConversationStatus) -> RepoResult<Vec<SmsConversation>> {
        self.conversations.get_by_stage(status)
    }

    /// Returns a copy of one conversation's thread; empty when none exists.
    pub fn get_messages(&self, conversation_id: RecordId) -> RepoResult<Vec<SmsMessage>> {
        let log = self
            .messages
            .read()
            .map_err(|_| RepoError::Storage("lock poisoned".into()))?;
        Ok(log
            .threads
            .get(&conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    /// Appends a message and refreshes the conversation preview.
    pub fn send_message(&self, outgoing: OutgoingMessage) -> RepoResult<SmsMessage> {
        if outgoing.content.trim().is_empty() {
            return Err(ValidationError::MissingField {
                collection: "sms_messages",
                field: "content",
            }
            .into());
        }
        self.conversations.get_by_id(outgoing.conversation_id)?;

        let message = {
            let mut log = self.write_log()?;
            let id = log.last_id + 1;
            let message = SmsMessage {
                id,
                conversation_id: outgoing.conversation_id,
                content: outgoing.content,
                sender: outgoing.sender,
                timestamp: now_epoch_ms(),
            };
            log.threads
                .entry(message.conversation_id)
                .or_default()
                .push(message.clone());
            log.last_id = id;
            message
        };

        let refresh = SmsConversationPatch {
            last_message: Some(message.content.clone()),
            last_message_time: Some(message.timestamp),
            ..SmsConversationPatch::default()
        };
        if let Err(err) = self.conversations.update(message.conversation_id, refresh) {
            warn!(
                "event=sms_send module=service status=degraded conversation_id={} error={}",
                message.conversation_id, err
            );
        }

        info!(
            "event=sms_send module=service status=ok conversation_id={} message_id={}",
            message.conversation_id, message.id
        );
        Ok(message)
    }

    /// Deletes a conversation together with its thread.
    pub fn delete_conversation(&self, id: RecordId) -> RepoResult<bool> {
        let deleted = self.conversations.delete(id)?;
        self.write_log()?.threads.remove(&id);
        Ok(deleted)
    }

    fn write_log(&self) -> RepoResult<RwLockWriteGuard<'_, MessageLog>> {
        self.messages
            .write()
            .map_err(|_| RepoError::Storage("lock poisoned".into()))
    }
}
