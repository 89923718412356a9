//! Note service facade.
//!
//! # Responsibility
//! - Wire the five note use-cases over one shared repository.
//! - Give adapters a single entry point per operation.

use crate::model::note::{NewNote, Note, NotePatch};
use crate::repo::note_repo::NoteRepository;
use crate::service::note_use_cases::{
    CreateNoteUseCase, DeleteNoteUseCase, GetAllNotesUseCase, GetNoteByIdUseCase,
    UpdateNoteUseCase, UseCaseResult,
};
use std::sync::Arc;

/// Note service facade over a repository implementation.
#[derive(Clone)]
pub struct NoteService {
    create: CreateNoteUseCase,
    get_all: GetAllNotesUseCase,
    get_by_id: GetNoteByIdUseCase,
    update: UpdateNoteUseCase,
    delete: DeleteNoteUseCase,
}

impl NoteService {
    /// Creates a service whose use-cases all share `repo`.
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self {
            create: CreateNoteUseCase::new(Arc::clone(&repo)),
            get_all: GetAllNotesUseCase::new(Arc::clone(&repo)),
            get_by_id: GetNoteByIdUseCase::new(Arc::clone(&repo)),
            update: UpdateNoteUseCase::new(Arc::clone(&repo)),
            delete: DeleteNoteUseCase::new(repo),
        }
    }

    pub fn create_note(&self, input: NewNote) -> UseCaseResult<Note> {
        self.create.execute(input)
    }

    pub fn list_notes(&self) -> UseCaseResult<Vec<Note>> {
        self.get_all.execute()
    }

    pub fn get_note(&self, id: &str) -> UseCaseResult<Note> {
        self.get_by_id.execute(id)
    }

    pub fn update_note(&self, id: &str, patch: NotePatch) -> UseCaseResult<Note> {
        self.update.execute(id, patch)
    }

    pub fn delete_note(&self, id: &str) -> UseCaseResult<()> {
        self.delete.execute(id)
    }
}
