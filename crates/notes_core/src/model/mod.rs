//! Domain model for the notes backend.
//!
//! # Responsibility
//! - Define the canonical `Note` record and its request shapes.
//! - Keep identity and timestamp rules next to the data they govern.
//!
//! # Invariants
//! - Every note is identified by a `NoteId` that is never reassigned.
//! - `created_at <= updated_at` holds for every record.
//! - Deletion is a hard delete; there are no tombstones.

pub mod note;
