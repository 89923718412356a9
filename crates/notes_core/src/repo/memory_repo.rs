//! In-memory note store.
//!
//! # Responsibility
//! - Own the authoritative note collection for the process lifetime.
//! - Serve every contract operation as one critical section.
//!
//! # Invariants
//! - `order` iterates in insertion order; `index` maps each live id to its
//!   sequence key in `order`, and both always hold the same id set.
//! - Every value handed to a caller is a clone; callers never alias storage.
//! - Operations never fail; the `RepoResult` wrapper is always `Ok`.

use crate::model::note::{now, NewNote, Note, NoteId, NotePatch};
use crate::repo::note_repo::{NoteRepository, RepoResult};
use log::{debug, error};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default)]
struct NoteTable {
    next_seq: u64,
    order: BTreeMap<u64, Note>,
    index: HashMap<NoteId, u64>,
}

impl NoteTable {
    fn get(&self, id: &str) -> Option<&Note> {
        let seq = self.index.get(id)?;
        self.order.get(seq)
    }
}

/// Thread-safe in-memory implementation of `NoteRepository`.
///
/// Reads share the lock, writes take it exclusively, so concurrent updates
/// and deletes on the same id serialize and readers never see a half-applied
/// write.
#[derive(Debug, Default)]
pub struct InMemoryNoteRepository {
    table: RwLock<NoteTable>,
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live notes.
    pub fn len(&self) -> usize {
        self.table.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().order.is_empty()
    }
}

impl NoteRepository for InMemoryNoteRepository {
    fn create(&self, input: NewNote) -> RepoResult<Note> {
        let mut table = self.table.write();
        let mut id = NoteId::generate();
        while table.index.contains_key(&id) {
            id = NoteId::generate();
        }

        let note = Note::from_new(id, input, now());
        let seq = table.next_seq;
        table.next_seq += 1;
        table.index.insert(note.id.clone(), seq);
        table.order.insert(seq, note.clone());

        debug!(
            "event=note_create module=repo backend=memory status=ok id={}",
            note.id
        );
        Ok(note)
    }

    fn find_all(&self) -> RepoResult<Vec<Note>> {
        Ok(self.table.read().order.values().cloned().collect())
    }

    fn find_by_id(&self, id: &str) -> RepoResult<Option<Note>> {
        Ok(self.table.read().get(id).cloned())
    }

    fn update(&self, id: &str, patch: NotePatch) -> RepoResult<Option<Note>> {
        let mut table = self.table.write();
        let Some(&seq) = table.index.get(id) else {
            debug!("event=note_update module=repo backend=memory status=miss id={id}");
            return Ok(None);
        };
        let Some(stored) = table.order.get_mut(&seq) else {
            error!("event=note_update module=repo backend=memory status=error error_code=index_without_row id={id}");
            table.index.remove(id);
            return Ok(None);
        };

        *stored = stored.merged(&patch, now());
        debug!("event=note_update module=repo backend=memory status=ok id={id}");
        Ok(Some(stored.clone()))
    }

    fn delete(&self, id: &str) -> RepoResult<bool> {
        let mut table = self.table.write();
        let Some(seq) = table.index.remove(id) else {
            debug!("event=note_delete module=repo backend=memory status=miss id={id}");
            return Ok(false);
        };

        if table.order.remove(&seq).is_none() {
            error!("event=note_delete module=repo backend=memory status=error error_code=index_without_row id={id}");
            return Ok(false);
        }
        debug!("event=note_delete module=repo backend=memory status=ok id={id}");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryNoteRepository;
    use crate::model::note::{NewNote, NoteId, NotePatch};
    use crate::repo::note_repo::NoteRepository;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn len_tracks_creates_and_deletes() {
        let repo = InMemoryNoteRepository::new();
        assert!(repo.is_empty());

        let note = repo.create(NewNote::new("A", "B")).unwrap();
        repo.create(NewNote::new("C", "D")).unwrap();
        assert_eq!(repo.len(), 2);

        assert!(repo.delete(note.id.as_str()).unwrap());
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn index_and_order_stay_in_sync_after_delete() {
        let repo = InMemoryNoteRepository::new();
        let first = repo.create(NewNote::new("1", "x")).unwrap();
        let second = repo.create(NewNote::new("2", "x")).unwrap();
        let third = repo.create(NewNote::new("3", "x")).unwrap();

        repo.delete(second.id.as_str()).unwrap();
        let updated = repo
            .update(third.id.as_str(), NotePatch::title("3b"))
            .unwrap()
            .unwrap();

        let ids: Vec<_> = repo.find_all().unwrap().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![first.id, updated.id]);
    }

    #[test]
    fn concurrent_deletes_of_one_id_succeed_exactly_once() {
        let repo = Arc::new(InMemoryNoteRepository::new());
        let note = repo.create(NewNote::new("A", "B")).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = Arc::clone(&repo);
                let id = note.id.clone();
                thread::spawn(move || repo.delete(id.as_str()).unwrap())
            })
            .collect();

        let removed = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|deleted| *deleted)
            .count();
        assert_eq!(removed, 1);
        assert!(repo.is_empty());
    }

    #[test]
    fn concurrent_creates_keep_every_note() {
        let repo = Arc::new(InMemoryNoteRepository::new());
        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || {
                    for idx in 0..25 {
                        repo.create(NewNote::new(format!("{worker}-{idx}"), ""))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(repo.len(), 100);
    }

    #[test]
    fn racing_updates_on_disjoint_fields_keep_both_changes() {
        for _ in 0..50 {
            let repo = Arc::new(InMemoryNoteRepository::new());
            let note = repo.create(NewNote::new("A", "B")).unwrap();

            let patches = [NotePatch::title("T"), NotePatch::content("C")];
            let handles: Vec<_> = patches
                .into_iter()
                .map(|patch| {
                    let repo = Arc::clone(&repo);
                    let id = note.id.clone();
                    thread::spawn(move || repo.update(id.as_str(), patch).unwrap().unwrap())
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }

            let stored = repo.find_by_id(note.id.as_str()).unwrap().unwrap();
            assert_eq!((stored.title.as_str(), stored.content.as_str()), ("T", "C"));
        }
    }

    #[test]
    fn snapshots_taken_during_updates_are_consistent() {
        let repo = Arc::new(InMemoryNoteRepository::new());
        let ids: Vec<_> = (0..4)
            .map(|idx| repo.create(NewNote::new(format!("n{idx}"), "")).unwrap().id)
            .collect();

        let writers: Vec<_> = ids
            .iter()
            .cloned()
            .map(|id| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || {
                    for round in 0..100 {
                        repo.update(id.as_str(), NotePatch::content(format!("r{round}")))
                            .unwrap();
                    }
                })
            })
            .collect();

        for _ in 0..200 {
            let snapshot = repo.find_all().unwrap();
            assert_eq!(snapshot.len(), ids.len());
            for note in &snapshot {
                assert!(note.created_at <= note.updated_at);
            }
        }
        for writer in writers {
            writer.join().unwrap();
        }

        for note in repo.find_all().unwrap() {
            assert_eq!(note.content, "r99");
        }
    }

    #[test]
    fn dangling_index_entry_is_reported_as_a_miss_and_dropped() {
        let repo = InMemoryNoteRepository::new();
        repo.table.write().index.insert(NoteId::from("ghost"), 42);

        assert_eq!(repo.update("ghost", NotePatch::title("T")).unwrap(), None);
        assert!(!repo.table.read().index.contains_key("ghost"));

        repo.table.write().index.insert(NoteId::from("ghost"), 43);
        assert!(!repo.delete("ghost").unwrap());
        assert!(repo.find_by_id("ghost").unwrap().is_none());
    }
}
