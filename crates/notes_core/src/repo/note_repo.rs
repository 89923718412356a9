//! Note repository contract.
//!
//! # Responsibility
//! - Define the five storage operations every note backend provides.
//! - Keep absence a value (`None`/`false`), never an error.
//!
//! # Invariants
//! - Returned notes are independent copies of stored state.
//! - `find_all` returns notes in insertion order.
//! - `RepoError` is reserved for backend transport failures.

use crate::model::note::{NewNote, Note, NotePatch};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Backend failure raised by fallible note stores.
#[derive(Debug)]
pub enum RepoError {
    Db(rusqlite::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(value)
    }
}

/// Storage contract shared by use-cases and note stores.
pub trait NoteRepository: Send + Sync {
    /// Stores a new note; the store assigns id and timestamps.
    fn create(&self, input: NewNote) -> RepoResult<Note>;
    /// Returns a snapshot of all notes in insertion order.
    fn find_all(&self) -> RepoResult<Vec<Note>>;
    /// Returns the matching note, or `None` when no note has this id.
    fn find_by_id(&self, id: &str) -> RepoResult<Option<Note>>;
    /// Replaces supplied fields and refreshes `updated_at`; `None` when absent.
    fn update(&self, id: &str, patch: NotePatch) -> RepoResult<Option<Note>>;
    /// Removes the note; `false` when no note had this id.
    fn delete(&self, id: &str) -> RepoResult<bool>;
}
