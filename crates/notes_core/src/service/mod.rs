//! Application-tier use-cases.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep adapters decoupled from storage details.

pub mod note_service;
pub mod note_use_cases;
