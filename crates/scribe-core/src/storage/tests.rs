use super::*;
use crate::types::{
    ChatMessage, ChatRole, NewTranscriptMessage, Session, SessionStatus, TranscriptMessage,
};
use chrono::{Duration, Utc};
use tempfile::TempDir;

fn create_test_storage() -> (RedbStorage, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.redb");
    let storage = RedbStorage::open(&db_path).unwrap();
    (storage, temp_dir)
}

fn create_test_message(session: &Session, content: &str, minutes_ago: i64) -> TranscriptMessage {
    TranscriptMessage::from_input(NewTranscriptMessage {
        session_id: session.id,
        content: content.to_string(),
        confidence: 0.8,
        is_final: true,
        speaker_id: None,
        timestamp: Some(Utc::now() - Duration::minutes(minutes_ago)),
    })
}

#[test]
fn test_session_crud() {
    let (storage, _temp) = create_test_storage();

    let session = Session::new("Weekly sync".to_string(), "default".to_string());
    storage.put_session(&session).unwrap();

    let retrieved = storage.get_session(session.id).unwrap().unwrap();
    assert_eq!(retrieved.title, "Weekly sync");
    assert_eq!(retrieved.status, SessionStatus::Active);

    let mut updated = session.clone();
    updated.status = SessionStatus::Stopped;
    storage.put_session(&updated).unwrap();

    let retrieved = storage.get_session(session.id).unwrap().unwrap();
    assert_eq!(retrieved.status, SessionStatus::Stopped);

    storage.delete_session(session.id).unwrap();
    assert!(storage.get_session(session.id).unwrap().is_none());
}

#[test]
fn test_session_persistence_across_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.redb");

    let session_id = {
        let storage = RedbStorage::open(&db_path).unwrap();
        let session = Session::new("Persistence Test".to_string(), "default".to_string());
        storage.put_session(&session).unwrap();
        session.id
    };

    // Reopen storage and verify data survived
    let storage = RedbStorage::open(&db_path).unwrap();
    let session = storage
        .get_session(session_id)
        .unwrap()
        .expect("Session should survive reopen");
    assert_eq!(session.title, "Persistence Test");
}

#[test]
fn test_delete_session_cascades_to_owned_records() {
    let (storage, _temp) = create_test_storage();

    let session = Session::new("Doomed".to_string(), "default".to_string());
    let survivor = Session::new("Survivor".to_string(), "default".to_string());
    storage.put_session(&session).unwrap();
    storage.put_session(&survivor).unwrap();

    let doomed_message = create_test_message(&session, "going away", 1);
    let kept_message = create_test_message(&survivor, "staying", 1);
    storage.put_message(&doomed_message).unwrap();
    storage.put_message(&kept_message).unwrap();

    let doomed_chat = ChatMessage::new(
        session.id,
        ChatRole::User,
        "question".to_string(),
        Vec::new(),
    );
    storage.put_chat_message(&doomed_chat).unwrap();

    storage.delete_session(session.id).unwrap();

    assert!(storage.get_message(doomed_message.id).unwrap().is_none());
    assert!(storage.get_chat_message(doomed_chat.id).unwrap().is_none());
    assert!(storage
        .list_messages(MessageFilter::new(session.id))
        .unwrap()
        .is_empty());

    // The other session's records are untouched
    assert!(storage.get_message(kept_message.id).unwrap().is_some());
    assert_eq!(
        storage
            .list_messages(MessageFilter::new(survivor.id))
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_delete_missing_session_errors() {
    let (storage, _temp) = create_test_storage();
    let err = storage.delete_session(uuid::Uuid::now_v7()).unwrap_err();
    assert!(matches!(err, crate::ScribeError::SessionNotFound(_)));
}

#[test]
fn test_list_messages_newest_first_with_pagination() {
    let (storage, _temp) = create_test_storage();

    let session = Session::new("Paged".to_string(), "default".to_string());
    storage.put_session(&session).unwrap();

    for i in 0..5 {
        storage
            .put_message(&create_test_message(&session, &format!("message {}", i), i))
            .unwrap();
    }

    let all = storage.list_messages(MessageFilter::new(session.id)).unwrap();
    assert_eq!(all.len(), 5);
    // minutes_ago 0 is the newest
    assert_eq!(all[0].content, "message 0");
    assert_eq!(all[4].content, "message 4");

    let page = storage
        .list_messages(MessageFilter::new(session.id).with_limit(2).with_offset(2))
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].content, "message 2");
    assert_eq!(page[1].content, "message 3");
}

#[test]
fn test_message_filters() {
    let (storage, _temp) = create_test_storage();

    let session = Session::new("Filtered".to_string(), "default".to_string());
    storage.put_session(&session).unwrap();

    let mut interim = create_test_message(&session, "interim", 1);
    interim.is_final = false;
    storage.put_message(&interim).unwrap();
    storage
        .put_message(&create_test_message(&session, "recent final", 1))
        .unwrap();
    storage
        .put_message(&create_test_message(&session, "old final", 60))
        .unwrap();

    let finals = storage
        .list_messages(MessageFilter::new(session.id).final_only())
        .unwrap();
    assert_eq!(finals.len(), 2);

    let interims = storage
        .list_messages(MessageFilter::new(session.id).with_is_final(false))
        .unwrap();
    assert_eq!(interims.len(), 1);
    assert_eq!(interims[0].content, "interim");

    let recent = storage
        .list_messages(
            MessageFilter::new(session.id)
                .final_only()
                .after(Utc::now() - Duration::minutes(5)),
        )
        .unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].content, "recent final");

    assert_eq!(
        storage
            .count_messages(MessageFilter::new(session.id).final_only().with_limit(1))
            .unwrap(),
        2,
        "count ignores limit"
    );
}

#[test]
fn test_messages_are_scoped_to_their_session() {
    let (storage, _temp) = create_test_storage();

    let a = Session::new("A".to_string(), "default".to_string());
    let b = Session::new("B".to_string(), "default".to_string());
    storage.put_session(&a).unwrap();
    storage.put_session(&b).unwrap();

    storage.put_message(&create_test_message(&a, "for a", 1)).unwrap();
    storage.put_message(&create_test_message(&b, "for b", 1)).unwrap();

    let for_a = storage.list_messages(MessageFilter::new(a.id)).unwrap();
    assert_eq!(for_a.len(), 1);
    assert_eq!(for_a[0].content, "for a");
}

#[test]
fn test_chat_history_round_trip() {
    let (storage, _temp) = create_test_storage();

    let session = Session::new("Chatty".to_string(), "default".to_string());
    storage.put_session(&session).unwrap();

    let message = create_test_message(&session, "context", 1);
    storage.put_message(&message).unwrap();

    let user = ChatMessage::new(
        session.id,
        ChatRole::User,
        "What happened?".to_string(),
        Vec::new(),
    );
    let assistant = ChatMessage::new(
        session.id,
        ChatRole::Assistant,
        "Context happened.".to_string(),
        vec![message.id],
    );
    storage.put_chat_message(&user).unwrap();
    storage.put_chat_message(&assistant).unwrap();

    let history = storage
        .list_chat_messages(ChatFilter::new(session.id))
        .unwrap();
    assert_eq!(history.len(), 2);

    let retrieved = storage.get_chat_message(assistant.id).unwrap().unwrap();
    assert_eq!(retrieved.context_ids, vec![message.id]);
    assert_eq!(retrieved.role, ChatRole::Assistant);
}

#[test]
fn test_metadata_round_trip() {
    let (storage, _temp) = create_test_storage();

    storage.put_metadata("test_key", b"test_value").unwrap();
    let value = storage.get_metadata("test_key").unwrap().unwrap();
    assert_eq!(value, b"test_value");

    assert!(storage.get_metadata("missing").unwrap().is_none());
}

#[test]
fn test_schema_version_written_on_create() {
    let (storage, _temp) = create_test_storage();

    let raw = storage.get_metadata("schema_version").unwrap().unwrap();
    let version: u32 = std::str::from_utf8(&raw).unwrap().parse().unwrap();
    assert_eq!(version, CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_stats() {
    let (storage, _temp) = create_test_storage();

    let session = Session::new("Stats".to_string(), "default".to_string());
    storage.put_session(&session).unwrap();

    let mut interim = create_test_message(&session, "interim", 1);
    interim.is_final = false;
    storage.put_message(&interim).unwrap();
    storage
        .put_message(&create_test_message(&session, "final", 1))
        .unwrap();
    storage
        .put_chat_message(&ChatMessage::new(
            session.id,
            ChatRole::User,
            "hello".to_string(),
            Vec::new(),
        ))
        .unwrap();

    let stats = storage.stats().unwrap();
    assert_eq!(stats.session_count, 1);
    assert_eq!(stats.message_count, 2);
    assert_eq!(stats.final_message_count, 1);
    assert_eq!(stats.interim_message_count, 1);
    assert_eq!(stats.chat_count, 1);
    assert_eq!(stats.sessions_by_status[&SessionStatus::Active], 1);
}

#[test]
fn test_snapshot_copies_database_file() {
    let (storage, temp) = create_test_storage();

    let session = Session::new("Snapshot".to_string(), "default".to_string());
    storage.put_session(&session).unwrap();

    let dest = temp.path().join("backup.redb");
    storage.snapshot(&dest).unwrap();

    let restored = RedbStorage::open(&dest).unwrap();
    assert!(restored.get_session(session.id).unwrap().is_some());
}
