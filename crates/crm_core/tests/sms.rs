use crm_core::model::sms::{ConversationStatus, MessageSender, SmsConversationPatch};
use crm_core::{
    MemoryRepository, OutgoingMessage, RepoError, SmsConversation, SmsMessage, SmsService,
};
use serde_json::json;

fn service() -> SmsService<MemoryRepository<SmsConversation>> {
    let conversations: Vec<SmsConversation> = serde_json::from_value(json!([
        {"id": 1, "customerName": "Ada", "phoneNumber": "+15550001", "lastMessage": "Hi"}
    ]))
    .unwrap();
    let history: Vec<SmsMessage> = serde_json::from_value(json!([
        {"id": 100, "conversationId": 1, "content": "Hi", "sender": "customer", "timestamp": 1}
    ]))
    .unwrap();
    SmsService::with_messages(MemoryRepository::with_records(conversations), history)
}

#[test]
fn send_appends_message_and_refreshes_conversation() {
    let service = service();
    let sent = service
        .send_message(OutgoingMessage::from_agent(1, "Thanks for reaching out"))
        .unwrap();

    assert_eq!(sent.id, 101);
    assert_eq!(sent.sender, MessageSender::Agent);
    let thread = service.get_messages(1).unwrap();
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[1], sent);

    let conversation = service.get_conversation(1).unwrap();
    assert_eq!(conversation.last_message, "Thanks for reaching out");
    assert_eq!(conversation.last_message_time, sent.timestamp);
}

#[test]
fn first_message_id_is_one_hundred() {
    let service = SmsService::new(MemoryRepository::<SmsConversation>::new());
    let conversation = service
        .create_conversation(SmsConversationPatch {
            customer_name: Some("Grace".into()),
            phone_number: Some("+15550002".into()),
            ..SmsConversationPatch::default()
        })
        .unwrap();
    assert_eq!(conversation.name, "Conversation with Grace");
    assert_eq!(conversation.status, ConversationStatus::New);

    let sent = service
        .send_message(OutgoingMessage::from_agent(conversation.id, "Hello"))
        .unwrap();
    assert_eq!(sent.id, 100);
}

#[test]
fn send_to_unknown_conversation_is_rejected() {
    let service = service();
    let err = service
        .send_message(OutgoingMessage::from_agent(42, "Anyone there?"))
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(service.get_messages(42).unwrap().is_empty());
}

#[test]
fn blank_message_is_rejected() {
    let service = service();
    let err = service
        .send_message(OutgoingMessage::from_agent(1, "   "))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(service.get_messages(1).unwrap().len(), 1);
}

#[test]
fn deleting_conversation_drops_its_thread() {
    let service = service();
    assert!(service.delete_conversation(1).unwrap());
    assert!(service.get_messages(1).unwrap().is_empty());
    assert!(service.delete_conversation(1).unwrap_err().is_not_found());
}

#[test]
fn new_conversation_never_inherits_a_deleted_thread() {
    let service = service();
    service
        .send_message(OutgoingMessage::from_agent(1, "Following up"))
        .unwrap();
    service.delete_conversation(1).unwrap();

    let fresh = service
        .create_conversation(SmsConversationPatch {
            customer_name: Some("Linus".into()),
            ..SmsConversationPatch::default()
        })
        .unwrap();
    assert_ne!(fresh.id, 1);
    assert!(service.get_messages(fresh.id).unwrap().is_empty());
    assert!(service.get_messages(1).unwrap().is_empty());
    assert_eq!(service.get_conversations().unwrap(), vec![fresh]);
}

#[test]
fn history_accepts_iso_timestamps() {
    let history: Vec<SmsMessage> = serde_json::from_value(json!([
        {"Id": 1, "conversationId": 1, "content": "Hi, I'm interested in your CRM solution.",
         "sender": "customer", "timestamp": "2024-01-15T10:00:00Z"}
    ]))
    .unwrap();
    assert_eq!(history[0].timestamp, 1_705_312_800_000);

    let service = SmsService::with_messages(MemoryRepository::<SmsConversation>::new(), history);
    assert_eq!(service.get_messages(1).unwrap().len(), 1);
}

#[test]
fn status_moves_through_update_stage() {
    let service = service();
    let closed = service.update_status(1, ConversationStatus::Closed).unwrap();
    assert_eq!(closed.status, ConversationStatus::Closed);
    assert_eq!(closed.last_message, "Hi");
    assert_eq!(
        service.get_by_status(ConversationStatus::Closed).unwrap(),
        vec![closed]
    );
    assert!(service
        .get_by_status(ConversationStatus::Active)
        .unwrap()
        .is_empty());
}
