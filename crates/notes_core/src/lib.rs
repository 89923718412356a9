//! Core of the notes backend.
//! Domain model, repository contract, note stores and use-cases live here;
//! transport adapters only translate requests into `NoteService` calls.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{build_repository, ConfigError, NotesConfig, StoreBackend};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{NewNote, Note, NoteId, NotePatch};
pub use repo::memory_repo::InMemoryNoteRepository;
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult};
pub use repo::sqlite_repo::SqliteNoteRepository;
pub use service::note_service::NoteService;
pub use service::note_use_cases::{
    CreateNoteUseCase, DeleteNoteUseCase, GetAllNotesUseCase, GetNoteByIdUseCase,
    NoteUseCaseError, UpdateNoteUseCase, UseCaseResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
