use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use secrecy::SecretString;
use tempfile::TempDir;

use notevault_core::crypto::DerivedKey;
use notevault_core::{
    CancellationToken, CipherEngine, EncryptionSettings, MemoryNoteStore, NoteId, NoteService,
    NoteStore, SqliteNoteStore, VaultError,
};

fn cipher() -> Arc<CipherEngine> {
    Arc::new(CipherEngine::new(DerivedKey::from_bytes([11u8; 32])))
}

async fn sqlite_service() -> (TempDir, NoteService<SqliteNoteStore>) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteNoteStore::open(dir.path().join("notes.db"))
        .await
        .unwrap();
    (dir, NoteService::new(store, cipher()))
}

fn memory_service() -> NoteService<MemoryNoteStore> {
    NoteService::new(MemoryNoteStore::new(), cipher())
}

/// Store a note sealed under a different key in the same store.
async fn add_foreign_note<S: NoteStore + Clone>(store: &S, owner: &str) -> NoteId {
    let other = Arc::new(CipherEngine::new(DerivedKey::from_bytes([99u8; 32])));
    NoteService::new(store.clone(), other)
        .create("sealed elsewhere", owner, &CancellationToken::new())
        .await
        .unwrap()
        .id
}

fn overwrite_ciphertext(db_path: &Path, id: NoteId, ciphertext: &str) {
    let conn = rusqlite::Connection::open(db_path).unwrap();
    let changed = conn
        .execute(
            "UPDATE notes SET ciphertext = ?1 WHERE id = ?2",
            rusqlite::params![ciphertext, id],
        )
        .unwrap();
    assert_eq!(changed, 1);
}

fn count_rows(db_path: &Path) -> i64 {
    let conn = rusqlite::Connection::open(db_path).unwrap();
    conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))
        .unwrap()
}

async fn check_crud<S: NoteStore>(service: &NoteService<S>) {
    let cancel = CancellationToken::new();

    let created = service
        .create("groceries: eggs, naïve café beans", "alice", &cancel)
        .await
        .unwrap();
    let fetched = service.get(created.id, &cancel).await.unwrap();
    assert_eq!(fetched.content, "groceries: eggs, naïve café beans");
    assert!(fetched.updated_at.is_none());

    service.update(created.id, "x", &cancel).await.unwrap();
    let fetched = service.get(created.id, &cancel).await.unwrap();
    assert_eq!(fetched.content, "x");
    assert!(fetched.updated_at.unwrap() >= fetched.created_at);

    assert!(service.delete(created.id, &cancel).await.unwrap());
    assert!(matches!(
        service.get(created.id, &cancel).await,
        Err(VaultError::NotFound(_))
    ));
    assert!(matches!(
        service.delete(created.id, &cancel).await,
        Err(VaultError::NotFound(_))
    ));
}

async fn check_list_skips_undecryptable<S: NoteStore + Clone>(service: &NoteService<S>) {
    let cancel = CancellationToken::new();

    let oldest = service.create("first", "alice", &cancel).await.unwrap();
    let broken = add_foreign_note(service.store(), "alice").await;
    let newest = service.create("third", "alice", &cancel).await.unwrap();
    service.create("not alice", "bob", &cancel).await.unwrap();

    let notes = service.list("alice", &cancel).await.unwrap();
    let ids: Vec<NoteId> = notes.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![newest.id, oldest.id]);
    assert_eq!(notes[0].content, "third");

    let report = service.list_report("alice", &cancel).await.unwrap();
    assert_eq!(report.notes.len(), 2);
    assert_eq!(report.skipped, vec![broken]);

    assert!(matches!(
        service.get(broken, &cancel).await,
        Err(VaultError::DecryptionFailure(_))
    ));
}

#[tokio::test]
async fn test_memory_crud() {
    check_crud(&memory_service()).await;
}

#[tokio::test]
async fn test_sqlite_crud() {
    let (_dir, service) = sqlite_service().await;
    check_crud(&service).await;
}

#[tokio::test]
async fn test_memory_list_skips_undecryptable() {
    check_list_skips_undecryptable(&memory_service()).await;
}

#[tokio::test]
async fn test_sqlite_list_skips_undecryptable() {
    let (_dir, service) = sqlite_service().await;
    check_list_skips_undecryptable(&service).await;
}

#[tokio::test]
async fn test_sqlite_list_survives_damaged_rows() {
    // (stored text, error a direct read reports)
    let damage: [(&str, fn(&VaultError) -> bool); 4] = [
        ("    ", |e| matches!(e, VaultError::MalformedEnvelope(_))),
        ("not base64 at all!", |e| matches!(e, VaultError::MalformedEnvelope(_))),
        ("AAAAAAAAAAAAAA==", |e| matches!(e, VaultError::MalformedEnvelope(_))),
        (
            "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
            |e| matches!(e, VaultError::DecryptionFailure(_)),
        ),
    ];

    for (stored, expected) in damage {
        let (dir, service) = sqlite_service().await;
        let db_path = dir.path().join("notes.db");
        let cancel = CancellationToken::new();

        let oldest = service.create("first", "alice", &cancel).await.unwrap();
        let broken = service.create("second", "alice", &cancel).await.unwrap();
        let newest = service.create("third", "alice", &cancel).await.unwrap();
        overwrite_ciphertext(&db_path, broken.id, stored);

        let report = service.list_report("alice", &cancel).await.unwrap();
        let ids: Vec<NoteId> = report.notes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![newest.id, oldest.id], "stored {:?}", stored);
        assert_eq!(report.skipped, vec![broken.id]);

        let err = service.get(broken.id, &cancel).await.unwrap_err();
        assert!(expected(&err), "stored {:?} gave {:?}", stored, err);

        assert_eq!(service.get(oldest.id, &cancel).await.unwrap().content, "first");
    }
}

#[tokio::test]
async fn test_sqlite_cancel_during_commit_reports_what_was_written() {
    let (dir, service) = sqlite_service().await;
    let db_path = dir.path().join("notes.db");
    let service = Arc::new(service);
    let cancel = CancellationToken::new();

    // A reader holding a shared lock keeps the writer's COMMIT waiting
    let reader = rusqlite::Connection::open(&db_path).unwrap();
    reader.execute_batch("BEGIN").unwrap();
    let _: i64 = reader
        .query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))
        .unwrap();

    let task = {
        let service = Arc::clone(&service);
        let cancel = cancel.clone();
        tokio::spawn(async move { service.create("in flight", "alice", &cancel).await })
    };

    tokio::time::sleep(Duration::from_millis(300)).await;
    cancel.cancel();
    tokio::time::sleep(Duration::from_millis(200)).await;
    reader.execute_batch("COMMIT").unwrap();

    let result = task.await.unwrap();
    let rows = count_rows(&db_path);
    match result {
        Ok(note) => {
            assert_eq!(rows, 1);
            assert_eq!(note.content, "in flight");
        }
        Err(VaultError::Cancelled) => assert_eq!(rows, 0),
        Err(other) => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_sqlite_rows_hold_only_ciphertext() {
    let (dir, service) = sqlite_service().await;
    let cancel = CancellationToken::new();
    let secret_text = "the vault combination is 12-34-56";
    service.create(secret_text, "alice", &cancel).await.unwrap();

    let conn = rusqlite::Connection::open(dir.path().join("notes.db")).unwrap();
    let stored: String = conn
        .query_row("SELECT ciphertext FROM notes", [], |row| row.get(0))
        .unwrap();
    assert!(!stored.contains("combination"));
    assert!(STANDARD.decode(&stored).is_ok());
}

#[tokio::test]
async fn test_sqlite_cancelled_create_leaves_no_row() {
    let (dir, service) = sqlite_service().await;
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert!(matches!(
        service.create("never stored", "alice", &cancel).await,
        Err(VaultError::Cancelled)
    ));

    assert_eq!(count_rows(&dir.path().join("notes.db")), 0);
}

#[tokio::test]
async fn test_notes_readable_after_reopen_with_same_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");
    let settings = || {
        EncryptionSettings::new(SecretString::from("reopen-secret".to_string()))
            .with_salt(b"per-install-salt-0001".to_vec())
    };
    let cancel = CancellationToken::new();

    let id = {
        let engine = CipherEngine::from_settings(&settings()).unwrap();
        let store = SqliteNoteStore::open(&path).await.unwrap();
        let service = NoteService::new(store, Arc::new(engine));
        service.create("persisted", "alice", &cancel).await.unwrap().id
    };

    let engine = CipherEngine::from_settings(&settings()).unwrap();
    let store = SqliteNoteStore::open(&path).await.unwrap();
    let service = NoteService::new(store, Arc::new(engine));
    assert_eq!(service.get(id, &cancel).await.unwrap().content, "persisted");
}

#[tokio::test]
async fn test_wrong_key_get_is_decryption_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");
    let cancel = CancellationToken::new();

    let store = SqliteNoteStore::open(&path).await.unwrap();
    let id = NoteService::new(store, cipher())
        .create("locked", "alice", &cancel)
        .await
        .unwrap()
        .id;

    let other = Arc::new(CipherEngine::new(DerivedKey::from_bytes([12u8; 32])));
    let service = NoteService::new(SqliteNoteStore::open(&path).await.unwrap(), other);

    assert!(matches!(
        service.get(id, &cancel).await,
        Err(VaultError::DecryptionFailure(_))
    ));
    assert!(service.list("alice", &cancel).await.unwrap().is_empty());
}
