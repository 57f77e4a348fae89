//! In-memory storage backend.
//!
//! Committed notes live behind a shared async mutex. Each unit of work
//! keeps its own staged changes and applies them in one step on commit.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{Result, VaultError};
use crate::note::{NewNote, Note, NoteId};
use crate::storage::traits::{NoteStore, UnitOfWork};

#[derive(Debug, Default)]
struct MemoryState {
    notes: BTreeMap<NoteId, Note>,
    last_id: NoteId,
}

/// Shared in-memory note store.
///
/// Cloning the store shares the same underlying notes.
#[derive(Debug, Clone, Default)]
pub struct MemoryNoteStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed notes.
    pub async fn len(&self) -> usize {
        self.state.lock().await.notes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    type Work = MemoryUnitOfWork;

    async fn begin(&self) -> Result<Self::Work> {
        Ok(MemoryUnitOfWork {
            state: Arc::clone(&self.state),
            staged: BTreeMap::new(),
        })
    }
}

#[derive(Debug, Clone)]
enum Staged {
    Insert(Note),
    Update(Note),
    Delete,
}

/// Unit of work over a [`MemoryNoteStore`].
///
/// Reads see committed notes overlaid with this unit's own staged changes.
#[derive(Debug)]
pub struct MemoryUnitOfWork {
    state: Arc<Mutex<MemoryState>>,
    staged: BTreeMap<NoteId, Staged>,
}

impl MemoryUnitOfWork {
    async fn visible(&self, id: NoteId) -> Option<Note> {
        match self.staged.get(&id) {
            Some(Staged::Insert(note)) | Some(Staged::Update(note)) => Some(note.clone()),
            Some(Staged::Delete) => None,
            None => self.state.lock().await.notes.get(&id).cloned(),
        }
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn get_by_id(&mut self, id: NoteId) -> Result<Option<Note>> {
        Ok(self.visible(id).await)
    }

    async fn get_by_owner(&mut self, owner_id: &str) -> Result<Vec<Note>> {
        let mut view: BTreeMap<NoteId, Note> = {
            let state = self.state.lock().await;
            state
                .notes
                .iter()
                .filter(|(_, note)| note.owner_id() == owner_id)
                .map(|(id, note)| (*id, note.clone()))
                .collect()
        };

        for (id, change) in &self.staged {
            match change {
                Staged::Insert(note) | Staged::Update(note) => {
                    if note.owner_id() == owner_id {
                        view.insert(*id, note.clone());
                    } else {
                        view.remove(id);
                    }
                }
                Staged::Delete => {
                    view.remove(id);
                }
            }
        }

        let mut notes: Vec<Note> = view.into_values().collect();
        notes.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(notes)
    }

    async fn add(&mut self, note: NewNote) -> Result<Note> {
        let id = {
            let mut state = self.state.lock().await;
            state.last_id += 1;
            state.last_id
        };

        let note = note.into_note(id);
        self.staged.insert(id, Staged::Insert(note.clone()));
        Ok(note)
    }

    async fn update(&mut self, note: Note) -> Result<Note> {
        let id = note.id();
        let change = match self.staged.get(&id) {
            Some(Staged::Insert(_)) => Staged::Insert(note.clone()),
            Some(Staged::Update(_)) => Staged::Update(note.clone()),
            Some(Staged::Delete) => {
                return Err(VaultError::Persistence(format!(
                    "Cannot update note {}: deleted in this unit of work",
                    id
                )))
            }
            None => {
                if !self.state.lock().await.notes.contains_key(&id) {
                    return Err(VaultError::Persistence(format!(
                        "Cannot update note {}: no such row",
                        id
                    )));
                }
                Staged::Update(note.clone())
            }
        };

        self.staged.insert(id, change);
        Ok(note)
    }

    async fn delete(&mut self, id: NoteId) -> Result<bool> {
        if matches!(self.staged.get(&id), Some(Staged::Insert(_))) {
            self.staged.remove(&id);
            return Ok(true);
        }

        let existed = match self.staged.get(&id) {
            Some(Staged::Insert(_)) | Some(Staged::Update(_)) => true,
            Some(Staged::Delete) => false,
            None => self.state.lock().await.notes.contains_key(&id),
        };

        if existed {
            self.staged.insert(id, Staged::Delete);
        }
        Ok(existed)
    }

    async fn exists(&mut self, id: NoteId) -> Result<bool> {
        Ok(self.visible(id).await.is_some())
    }

    async fn commit(&mut self) -> Result<()> {
        let mut state = self.state.lock().await;

        // Another unit may have removed a row this one updates.
        for (id, change) in &self.staged {
            if matches!(change, Staged::Update(_)) && !state.notes.contains_key(id) {
                return Err(VaultError::Persistence(format!(
                    "Note {} was removed before commit",
                    id
                )));
            }
        }

        for (id, change) in std::mem::take(&mut self.staged) {
            match change {
                Staged::Insert(note) | Staged::Update(note) => {
                    state.notes.insert(id, note);
                }
                Staged::Delete => {
                    state.notes.remove(&id);
                }
            }
        }
        Ok(())
    }
}
