//! Schema migrations for the SQLite backend.
//!
//! Migrations are applied in order inside one transaction. The applied
//! version is mirrored to `PRAGMA user_version`.

use rusqlite::Connection;

use crate::error::{Result, VaultError};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: r#"
        CREATE TABLE notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ciphertext TEXT NOT NULL
                CHECK (length(ciphertext) BETWEEN 1 AND 4000),
            owner_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT
        );

        CREATE INDEX idx_notes_owner_id ON notes (owner_id);
        CREATE INDEX idx_notes_created_at ON notes (created_at);
        CREATE INDEX idx_notes_owner_created ON notes (owner_id, created_at);
    "#,
}];

/// Latest schema version known to this build.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Bring the database up to the latest schema version.
pub fn apply_migrations(conn: &mut Connection) -> Result<()> {
    let current = current_version(conn)?;
    let latest = latest_version();

    if current > latest {
        return Err(VaultError::Persistence(format!(
            "Database schema version {} is newer than supported version {}",
            current, latest
        )));
    }
    if current == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        tracing::debug!(version = migration.version, "applying notes migration");
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    Ok(())
}

pub fn current_version(conn: &Connection) -> Result<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}
