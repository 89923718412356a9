//! Repository contract and note store implementations.
//!
//! # Responsibility
//! - Define the storage-agnostic `NoteRepository` contract.
//! - Provide the in-memory store and an SQLite-backed alternative.
//!
//! # Invariants
//! - Stores signal absence with values; translating absence into a domain
//!   failure belongs to the service layer.

pub mod memory_repo;
pub mod note_repo;
pub mod sqlite_repo;
