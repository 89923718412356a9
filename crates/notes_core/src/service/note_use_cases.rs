//! Note use-cases.
//!
//! # Responsibility
//! - Expose one operation per note use-case over the repository contract.
//! - Translate store-level absence into `NoteUseCaseError::NotFound`.
//!
//! # Invariants
//! - Use-cases depend on `dyn NoteRepository` only, never a concrete store.
//! - A not-found result from the store is never swallowed.
//! - Successful results are passed through unchanged.

use crate::model::note::{NewNote, Note, NoteId, NotePatch};
use crate::repo::note_repo::{NoteRepository, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Failure returned by note use-cases.
#[derive(Debug)]
pub enum NoteUseCaseError {
    /// No live note has the requested id.
    NotFound(NoteId),
    /// Storage backend failure.
    Repo(RepoError),
}

impl NoteUseCaseError {
    /// HTTP status an adapter should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Repo(_) => 500,
        }
    }
}

impl Display for NoteUseCaseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "Note with ID {id} not found"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteUseCaseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<RepoError> for NoteUseCaseError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type UseCaseResult<T> = Result<T, NoteUseCaseError>;

fn not_found(operation: &str, id: &str) -> NoteUseCaseError {
    warn!("event={operation} module=service status=not_found id={id}");
    NoteUseCaseError::NotFound(NoteId::from(id))
}

/// Creates a note. No failure path beyond storage faults.
#[derive(Clone)]
pub struct CreateNoteUseCase {
    repo: Arc<dyn NoteRepository>,
}

impl CreateNoteUseCase {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    pub fn execute(&self, input: NewNote) -> UseCaseResult<Note> {
        let note = self.repo.create(input)?;
        info!("event=note_create module=service status=ok id={}", note.id);
        Ok(note)
    }
}

/// Lists every note in insertion order; an empty list is a valid result.
#[derive(Clone)]
pub struct GetAllNotesUseCase {
    repo: Arc<dyn NoteRepository>,
}

impl GetAllNotesUseCase {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    pub fn execute(&self) -> UseCaseResult<Vec<Note>> {
        Ok(self.repo.find_all()?)
    }
}

/// Fetches one note by id.
#[derive(Clone)]
pub struct GetNoteByIdUseCase {
    repo: Arc<dyn NoteRepository>,
}

impl GetNoteByIdUseCase {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    /// # Errors
    /// - `NotFound` when no note has `id`.
    pub fn execute(&self, id: &str) -> UseCaseResult<Note> {
        self.repo
            .find_by_id(id)?
            .ok_or_else(|| not_found("note_get", id))
    }
}

/// Applies a partial update to one note.
#[derive(Clone)]
pub struct UpdateNoteUseCase {
    repo: Arc<dyn NoteRepository>,
}

impl UpdateNoteUseCase {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    /// # Errors
    /// - `NotFound` when no note has `id`.
    pub fn execute(&self, id: &str, patch: NotePatch) -> UseCaseResult<Note> {
        let note = self
            .repo
            .update(id, patch)?
            .ok_or_else(|| not_found("note_update", id))?;
        info!("event=note_update module=service status=ok id={id}");
        Ok(note)
    }
}

/// Permanently removes one note.
#[derive(Clone)]
pub struct DeleteNoteUseCase {
    repo: Arc<dyn NoteRepository>,
}

impl DeleteNoteUseCase {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    /// # Errors
    /// - `NotFound` when no note has `id`, including a second delete of the
    ///   same id.
    pub fn execute(&self, id: &str) -> UseCaseResult<()> {
        if !self.repo.delete(id)? {
            return Err(not_found("note_delete", id));
        }
        info!("event=note_delete module=service status=ok id={id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::NoteUseCaseError;
    use crate::model::note::NoteId;
    use crate::repo::note_repo::RepoError;
    use std::error::Error;

    #[test]
    fn not_found_message_uses_fixed_format() {
        let err = NoteUseCaseError::NotFound(NoteId::from("abc-123"));
        assert_eq!(err.to_string(), "Note with ID abc-123 not found");
        assert_eq!(err.status_code(), 404);
        assert!(err.source().is_none());
    }

    #[test]
    fn repo_errors_keep_their_source() {
        let err = NoteUseCaseError::from(RepoError::Db(rusqlite::Error::QueryReturnedNoRows));
        assert_eq!(err.status_code(), 500);
        assert!(err.source().is_some());
    }
}
