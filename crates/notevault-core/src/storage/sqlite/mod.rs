//! SQLite storage backend.
//!
//! Each unit of work owns its own connection. Reads run in autocommit
//! mode; the first write opens a `BEGIN IMMEDIATE` transaction that lives
//! until `commit`. A unit dropped before committing closes its connection,
//! which rolls the transaction back.
//!
//! All SQLite calls run on the blocking thread pool.

mod row;
mod schema;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Result, VaultError};
use crate::note::{NewNote, Note, NoteId};
use crate::storage::traits::{NoteStore, UnitOfWork};

use row::{format_timestamp, NoteRow, NOTE_COLUMNS};

pub use schema::latest_version as latest_schema_version;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

fn open_connection(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(conn)
}

/// File-backed note store.
#[derive(Debug, Clone)]
pub struct SqliteNoteStore {
    path: PathBuf,
}

impl SqliteNoteStore {
    /// Open (or create) the database at `path` and apply pending migrations.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let setup_path = path.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            if let Some(parent) = setup_path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let mut conn = open_connection(&setup_path)?;
            schema::apply_migrations(&mut conn)
        })
        .await??;

        info!(path = %path.display(), "opened note database");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl NoteStore for SqliteNoteStore {
    type Work = SqliteUnitOfWork;

    async fn begin(&self) -> Result<Self::Work> {
        let path = self.path.clone();
        let conn = tokio::task::spawn_blocking(move || open_connection(&path)).await??;

        Ok(SqliteUnitOfWork {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

/// Unit of work backed by a dedicated SQLite connection.
pub struct SqliteUnitOfWork {
    conn: Arc<Mutex<Connection>>,
}

/// Lock the database connection, returning an error if the mutex is poisoned.
fn lock_conn(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| VaultError::Persistence("SQLite connection poisoned".to_string()))
}

impl SqliteUnitOfWork {
    async fn read<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = lock_conn(&conn)?;
            f(&guard)
        })
        .await?
    }

    async fn write<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = lock_conn(&conn)?;
            if guard.is_autocommit() {
                guard.execute_batch("BEGIN IMMEDIATE")?;
            }
            f(&guard)
        })
        .await?
    }
}

#[async_trait]
impl UnitOfWork for SqliteUnitOfWork {
    async fn get_by_id(&mut self, id: NoteId) -> Result<Option<Note>> {
        self.read(move |conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {} FROM notes WHERE id = ?1", NOTE_COLUMNS),
                    params![id],
                    NoteRow::from_row,
                )
                .optional()?;
            row.map(Note::try_from).transpose()
        })
        .await
    }

    async fn get_by_owner(&mut self, owner_id: &str) -> Result<Vec<Note>> {
        let owner_id = owner_id.to_string();
        self.read(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM notes WHERE owner_id = ?1 ORDER BY created_at DESC, id DESC",
                NOTE_COLUMNS
            ))?;
            let rows = stmt
                .query_map(params![owner_id], NoteRow::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows.into_iter().map(Note::try_from).collect()
        })
        .await
    }

    async fn add(&mut self, note: NewNote) -> Result<Note> {
        self.write(move |conn| {
            conn.execute(
                "INSERT INTO notes (ciphertext, owner_id, created_at) VALUES (?1, ?2, ?3)",
                params![
                    note.ciphertext(),
                    note.owner_id(),
                    format_timestamp(note.created_at())
                ],
            )?;
            let id = conn.last_insert_rowid();
            debug!(note_id = id, "staged note insert");
            Ok(note.into_note(id))
        })
        .await
    }

    async fn update(&mut self, note: Note) -> Result<Note> {
        self.write(move |conn| {
            let changed = conn.execute(
                "UPDATE notes SET ciphertext = ?1, owner_id = ?2, updated_at = ?3 WHERE id = ?4",
                params![
                    note.ciphertext(),
                    note.owner_id(),
                    note.updated_at().map(format_timestamp),
                    note.id()
                ],
            )?;
            if changed == 0 {
                return Err(VaultError::Persistence(format!(
                    "Cannot update note {}: no such row",
                    note.id()
                )));
            }
            Ok(note)
        })
        .await
    }

    async fn delete(&mut self, id: NoteId) -> Result<bool> {
        self.write(move |conn| {
            let removed = conn.execute("DELETE FROM notes WHERE id = ?1", params![id])?;
            Ok(removed > 0)
        })
        .await
    }

    async fn exists(&mut self, id: NoteId) -> Result<bool> {
        self.read(move |conn| {
            Ok(conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM notes WHERE id = ?1)",
                params![id],
                |row| row.get(0),
            )?)
        })
        .await
    }

    async fn commit(&mut self) -> Result<()> {
        self.read(|conn| {
            if !conn.is_autocommit() {
                conn.execute_batch("COMMIT")?;
                debug!("committed note transaction");
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn temp_store() -> (TempDir, SqliteNoteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteNoteStore::open(dir.path().join("notes.db"))
            .await
            .unwrap();
        (dir, store)
    }

    fn new_note(owner: &str, ciphertext: &str) -> NewNote {
        NewNote::new(ciphertext, owner).unwrap()
    }

    #[tokio::test]
    async fn test_open_creates_parent_dirs_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("notes.db");

        let store = SqliteNoteStore::open(&path).await.unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), path.as_path());

        let conn = Connection::open(&path).unwrap();
        assert_eq!(schema::current_version(&conn).unwrap(), latest_schema_version());
    }

    #[tokio::test]
    async fn test_add_commit_and_read_back() {
        let (_dir, store) = temp_store().await;

        let mut work = store.begin().await.unwrap();
        let note = work.add(new_note("alice", "Y2lwaGVy")).await.unwrap();
        work.commit().await.unwrap();

        let mut reader = store.begin().await.unwrap();
        let loaded = reader.get_by_id(note.id()).await.unwrap().unwrap();
        assert_eq!(loaded, note);
        assert!(reader.exists(note.id()).await.unwrap());
        assert!(reader.get_by_id(note.id() + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_uncommitted_work_rolls_back() {
        let (_dir, store) = temp_store().await;
        let id = {
            let mut work = store.begin().await.unwrap();
            work.add(new_note("alice", "Y2lwaGVy")).await.unwrap().id()
        };

        let mut reader = store.begin().await.unwrap();
        assert!(!reader.exists(id).await.unwrap());
        assert!(reader.get_by_owner("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_owner_orders_newest_first() {
        let (_dir, store) = temp_store().await;
        let mut work = store.begin().await.unwrap();
        let first = work.add(new_note("alice", "MQ==")).await.unwrap();
        work.add(new_note("bob", "Mg==")).await.unwrap();
        let third = work.add(new_note("alice", "Mw==")).await.unwrap();
        work.commit().await.unwrap();

        let mut reader = store.begin().await.unwrap();
        let notes = reader.get_by_owner("alice").await.unwrap();
        let ids: Vec<NoteId> = notes.iter().map(|n| n.id()).collect();

        // Same-microsecond inserts fall back to id ordering
        assert_eq!(ids, vec![third.id(), first.id()]);
    }

    #[tokio::test]
    async fn test_blank_stored_ciphertext_still_loads() {
        let (_dir, store) = temp_store().await;
        let mut work = store.begin().await.unwrap();
        let first = work.add(new_note("alice", "MQ==")).await.unwrap();
        let blank = work.add(new_note("alice", "Mg==")).await.unwrap();
        work.commit().await.unwrap();

        let conn = Connection::open(store.path()).unwrap();
        conn.execute(
            "UPDATE notes SET ciphertext = '    ' WHERE id = ?1",
            params![blank.id()],
        )
        .unwrap();

        let mut reader = store.begin().await.unwrap();
        let notes = reader.get_by_owner("alice").await.unwrap();
        let ids: Vec<NoteId> = notes.iter().map(|n| n.id()).collect();
        assert_eq!(ids, vec![blank.id(), first.id()]);

        let loaded = reader.get_by_id(blank.id()).await.unwrap().unwrap();
        assert_eq!(loaded.ciphertext(), "    ");
    }

    #[tokio::test]
    async fn test_update_and_delete_round_trip() {
        let (_dir, store) = temp_store().await;
        let mut work = store.begin().await.unwrap();
        let mut note = work.add(new_note("alice", "b2xk")).await.unwrap();
        work.commit().await.unwrap();

        note.replace_ciphertext("bmV3").unwrap();
        let mut work = store.begin().await.unwrap();
        work.update(note.clone()).await.unwrap();
        work.commit().await.unwrap();

        let mut work = store.begin().await.unwrap();
        let loaded = work.get_by_id(note.id()).await.unwrap().unwrap();
        assert_eq!(loaded.ciphertext(), "bmV3");
        assert_eq!(loaded.updated_at(), note.updated_at());

        assert!(work.delete(note.id()).await.unwrap());
        assert!(!work.delete(note.id()).await.unwrap());
        work.commit().await.unwrap();

        let mut reader = store.begin().await.unwrap();
        assert!(!reader.exists(note.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_row_fails() {
        let (_dir, store) = temp_store().await;
        let ghost = new_note("alice", "Z2hvc3Q=").into_note(42);

        let mut work = store.begin().await.unwrap();
        assert!(matches!(
            work.update(ghost).await,
            Err(VaultError::Persistence(_))
        ));
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let (_dir, store) = temp_store().await;
        let mut work = store.begin().await.unwrap();
        let first = work.add(new_note("alice", "YQ==")).await.unwrap();
        work.commit().await.unwrap();

        let mut work = store.begin().await.unwrap();
        work.delete(first.id()).await.unwrap();
        let second = work.add(new_note("alice", "Yg==")).await.unwrap();
        work.commit().await.unwrap();

        assert!(second.id() > first.id());
    }

    #[tokio::test]
    async fn test_reopen_keeps_notes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.db");

        let id = {
            let store = SqliteNoteStore::open(&path).await.unwrap();
            let mut work = store.begin().await.unwrap();
            let note = work.add(new_note("alice", "a2VlcA==")).await.unwrap();
            work.commit().await.unwrap();
            note.id()
        };

        let store = SqliteNoteStore::open(&path).await.unwrap();
        let mut reader = store.begin().await.unwrap();
        assert!(reader.exists(id).await.unwrap());
    }
}
