//! Note row type for database queries.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;

use crate::error::{Result, VaultError};
use crate::note::{Note, NoteId};

/// Columns selected for every note query, in [`NoteRow::from_row`] order.
pub const NOTE_COLUMNS: &str = "id, ciphertext, owner_id, created_at, updated_at";

/// Raw row data from the notes table, before parsing into domain types.
#[derive(Debug)]
pub struct NoteRow {
    pub id: NoteId,
    pub ciphertext: String,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl NoteRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            ciphertext: row.get(1)?,
            owner_id: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

/// Fixed-width UTC text so lexical order matches chronological order.
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| VaultError::Persistence(format!("Invalid timestamp: {}", e)))?
        .with_timezone(&Utc))
}

impl TryFrom<NoteRow> for Note {
    type Error = VaultError;

    fn try_from(row: NoteRow) -> Result<Self> {
        let created_at = parse_timestamp(&row.created_at)?;
        let updated_at = row.updated_at.as_deref().map(parse_timestamp).transpose()?;

        Ok(Note::restore(
            row.id,
            row.ciphertext,
            row.owner_id,
            created_at,
            updated_at,
        ))
    }
}
