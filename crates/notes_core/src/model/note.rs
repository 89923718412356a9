//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record plus create/patch request shapes.
//! - Provide the construction and merge rules shared by every store.
//!
//! # Invariants
//! - `id` and `created_at` never change after construction.
//! - `updated_at` never moves backwards and never precedes `created_at`.
//! - Timestamps carry microsecond precision so stores round-trip them exactly.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque identifier for one note.
///
/// Generated ids are random v4 UUIDs, but lookups accept any string so an
/// unknown or empty key is a plain miss instead of a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NoteId {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Canonical note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Assigned by the store at creation time.
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Equal to `created_at` until the first successful update.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
}

impl NewNote {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Partial replacement for an existing note.
///
/// `None` keeps the stored value; `Some` replaces it, empty strings included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl NotePatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: None,
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            title: None,
            content: Some(content.into()),
        }
    }

    /// Returns whether the patch replaces no field.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

impl Note {
    /// Builds a fresh record with `created_at == updated_at == now`.
    pub fn from_new(id: NoteId, input: NewNote, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            content: input.content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns a copy with supplied patch fields replaced and `updated_at`
    /// refreshed.
    ///
    /// # Invariants
    /// - `id` and `created_at` are carried over unchanged.
    /// - `updated_at` is clamped to the previous value when the clock lags.
    pub fn merged(&self, patch: &NotePatch, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id.clone(),
            title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
            content: patch.content.clone().unwrap_or_else(|| self.content.clone()),
            created_at: self.created_at,
            updated_at: now.max(self.updated_at),
        }
    }
}

/// Current wall-clock time truncated to microseconds.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[cfg(test)]
mod tests {
    use super::{now, NewNote, Note, NoteId, NotePatch};
    use chrono::Duration;

    #[test]
    fn generated_ids_are_non_empty_and_distinct() {
        let first = NoteId::generate();
        let second = NoteId::generate();
        assert!(!first.as_str().is_empty());
        assert_ne!(first, second);
    }

    #[test]
    fn from_new_sets_equal_timestamps() {
        let stamp = now();
        let note = Note::from_new(NoteId::from("n1"), NewNote::new("A", "B"), stamp);
        assert_eq!(note.created_at, note.updated_at);
        assert_eq!(note.title, "A");
        assert_eq!(note.content, "B");
    }

    #[test]
    fn merged_replaces_only_supplied_fields() {
        let stamp = now();
        let note = Note::from_new(NoteId::from("n1"), NewNote::new("A", "B"), stamp);
        let later = stamp + Duration::milliseconds(5);

        let merged = note.merged(&NotePatch::content("C"), later);
        assert_eq!(merged.title, "A");
        assert_eq!(merged.content, "C");
        assert_eq!(merged.id, note.id);
        assert_eq!(merged.created_at, stamp);
        assert_eq!(merged.updated_at, later);
    }

    #[test]
    fn merged_never_moves_updated_at_backwards() {
        let stamp = now();
        let note = Note::from_new(NoteId::from("n1"), NewNote::new("A", "B"), stamp);
        let earlier = stamp - Duration::seconds(30);

        let merged = note.merged(&NotePatch::title("T"), earlier);
        assert_eq!(merged.updated_at, stamp);
        assert!(merged.created_at <= merged.updated_at);
    }

    #[test]
    fn note_serializes_with_camel_case_timestamps() {
        let note = Note::from_new(NoteId::from("n1"), NewNote::new("A", "B"), now());
        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["id"], "n1");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
    }

    #[test]
    fn patch_deserializes_missing_fields_as_none() {
        let patch: NotePatch = serde_json::from_str(r#"{"content":"C"}"#).unwrap();
        assert_eq!(patch.title, None);
        assert_eq!(patch.content.as_deref(), Some("C"));
        assert!(!patch.is_empty());
        assert!(NotePatch::default().is_empty());
    }
}
