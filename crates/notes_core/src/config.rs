//! Runtime configuration for the notes backend.
//!
//! # Responsibility
//! - Resolve log level, log directory and store backend from `NOTES_*`
//!   environment variables.
//! - Build the configured `NoteRepository`.
//!
//! # Invariants
//! - Missing or empty variables fall back to defaults; malformed ones are errors.

use crate::logging::default_log_level;
use crate::repo::memory_repo::InMemoryNoteRepository;
use crate::repo::note_repo::{NoteRepository, RepoResult};
use crate::repo::sqlite_repo::SqliteNoteRepository;
use config::{Config, Environment, Map};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

pub const ENV_PREFIX: &str = "NOTES";
pub const ENV_BACKEND: &str = "NOTES_BACKEND";

/// Storage engine selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum StoreBackend {
    #[default]
    Memory,
    Sqlite,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(ConfigError::InvalidValue {
                key: ENV_BACKEND,
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for StoreBackend {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
    Load(config::ConfigError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => write!(f, "invalid value `{value}` for {key}"),
            Self::Load(err) => write!(f, "failed to load configuration: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(value: config::ConfigError) -> Self {
        Self::Load(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    pub log_level: String,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
    pub backend: StoreBackend,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            backend: StoreBackend::default(),
        }
    }
}

impl NotesConfig {
    /// Reads `NOTES_LOG_LEVEL`, `NOTES_LOG_DIR` and `NOTES_BACKEND` from the
    /// process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Resolves configuration from `vars` in place of the process environment.
    pub fn from_vars(vars: Map<String, String>) -> Result<Self, ConfigError> {
        Self::load(Some(vars))
    }

    fn load(vars: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .ignore_empty(true)
                    .source(vars),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }
}

/// Builds the note store selected by `config`.
pub fn build_repository(config: &NotesConfig) -> RepoResult<Arc<dyn NoteRepository>> {
    let repo: Arc<dyn NoteRepository> = match config.backend {
        StoreBackend::Memory => Arc::new(InMemoryNoteRepository::new()),
        StoreBackend::Sqlite => Arc::new(SqliteNoteRepository::open_in_memory()?),
    };
    Ok(repo)
}
