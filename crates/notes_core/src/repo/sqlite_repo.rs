//! SQLite-backed note store.
//!
//! # Responsibility
//! - Implement `NoteRepository` over an in-memory SQLite connection.
//! - Keep SQL details behind the same contract the in-memory store serves.
//!
//! # Invariants
//! - Insertion order is the `seq` autoincrement column.
//! - Timestamps are stored as epoch microseconds.
//! - Read paths reject rows that violate note invariants instead of masking them.

use crate::model::note::{now, NewNote, Note, NoteId, NotePatch};
use crate::repo::note_repo::{NoteRepository, RepoError, RepoResult};
use chrono::{DateTime, Utc};
use log::{debug, info};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

const NOTE_SCHEMA_SQL: &str = include_str!("sqlite_schema.sql");

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    created_at,
    updated_at
FROM notes";

/// SQLite implementation of `NoteRepository`.
///
/// The connection sits behind a mutex, so each contract call runs alone.
pub struct SqliteNoteRepository {
    conn: Mutex<Connection>,
}

impl SqliteNoteRepository {
    /// Opens a fresh in-memory database with the note schema applied.
    pub fn open_in_memory() -> RepoResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    /// Wraps `conn`, creating the `notes` table when it is missing.
    pub fn with_connection(conn: Connection) -> RepoResult<Self> {
        conn.execute_batch(NOTE_SCHEMA_SQL)?;
        info!("event=store_open module=repo backend=sqlite status=ok");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl NoteRepository for SqliteNoteRepository {
    fn create(&self, input: NewNote) -> RepoResult<Note> {
        let note = Note::from_new(NoteId::generate(), input, now());
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO notes (id, title, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                note.id.as_str(),
                note.title.as_str(),
                note.content.as_str(),
                note.created_at.timestamp_micros(),
                note.updated_at.timestamp_micros(),
            ],
        )?;

        debug!(
            "event=note_create module=repo backend=sqlite status=ok id={}",
            note.id
        );
        Ok(note)
    }

    fn find_all(&self) -> RepoResult<Vec<Note>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("{NOTE_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn find_by_id(&self, id: &str) -> RepoResult<Option<Note>> {
        let conn = self.conn.lock();
        select_note(&conn, id)
    }

    fn update(&self, id: &str, patch: NotePatch) -> RepoResult<Option<Note>> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let Some(existing) = select_note(&tx, id)? else {
            debug!("event=note_update module=repo backend=sqlite status=miss id={id}");
            return Ok(None);
        };

        let merged = existing.merged(&patch, now());
        tx.execute(
            "UPDATE notes
             SET
                title = ?2,
                content = ?3,
                updated_at = ?4
             WHERE id = ?1;",
            params![
                id,
                merged.title.as_str(),
                merged.content.as_str(),
                merged.updated_at.timestamp_micros(),
            ],
        )?;
        tx.commit()?;

        debug!("event=note_update module=repo backend=sqlite status=ok id={id}");
        Ok(Some(merged))
    }

    fn delete(&self, id: &str) -> RepoResult<bool> {
        let conn = self.conn.lock();
        let changed = conn.execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        let status = if changed == 0 { "miss" } else { "ok" };
        debug!("event=note_delete module=repo backend=sqlite status={status} id={id}");
        Ok(changed > 0)
    }
}

fn select_note(conn: &Connection, id: &str) -> RepoResult<Option<Note>> {
    let mut stmt = conn.prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
    let row = stmt
        .query_row([id], |row| {
            Ok((
                row.get::<_, String>("id")?,
                row.get::<_, String>("title")?,
                row.get::<_, String>("content")?,
                row.get::<_, i64>("created_at")?,
                row.get::<_, i64>("updated_at")?,
            ))
        })
        .optional()?;

    row.map(|(id, title, content, created_at, updated_at)| {
        build_note(id, title, content, created_at, updated_at)
    })
    .transpose()
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    build_note(
        row.get("id")?,
        row.get("title")?,
        row.get("content")?,
        row.get("created_at")?,
        row.get("updated_at")?,
    )
}

fn build_note(
    id: String,
    title: String,
    content: String,
    created_at: i64,
    updated_at: i64,
) -> RepoResult<Note> {
    let created_at = parse_micros(created_at, "created_at")?;
    let updated_at = parse_micros(updated_at, "updated_at")?;
    if updated_at < created_at {
        return Err(RepoError::InvalidData(format!(
            "note `{id}` has updated_at earlier than created_at"
        )));
    }

    Ok(Note {
        id: NoteId::from(id),
        title,
        content,
        created_at,
        updated_at,
    })
}

fn parse_micros(value: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_micros(value).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid timestamp `{value}` in notes.{column}"))
    })
}
