//! In-memory todo state backed by a best-effort store
//!
//! [`TodoState`] is the single authority for the todo list and the current
//! error message. Mutations follow [`SyncPolicy::MemoryFirst`]: the in-memory
//! list always changes, then the store is asked to mirror the change. A store
//! failure is recorded as the error message and the memory change stays.
//!
//! # Lifecycle
//!
//! ```text
//! initialize()
//!   ├─ surface unsupported → error set, empty list, memory-only from now on
//!   ├─ load_all() fails    → error set, empty list, store still attempted
//!   └─ load_all() ok       → list = stored records
//! ```
//!
//! There is no way to observe or mutate a container before it is loaded.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::store::TodoStore;
use crate::surface::KvSurface;
use crate::todo::{TodoId, TodoPatch, TodoRecord};

/// How in-memory mutations relate to persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Commit to memory always; report store failures through the error
    /// message without rolling memory back
    MemoryFirst,
}

/// What `add_todo` does with an id already in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateIds {
    /// Append anyway; the list then holds several records with that id
    #[default]
    Allow,
    /// Leave memory and store untouched and record a `DuplicateId` error
    Reject,
}

/// Whether mutations are mirrored to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Persistence {
    Store,
    MemoryOnly,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StateOptions {
    pub duplicate_ids: DuplicateIds,
}

/// Todo list state shared with the presentation layer
#[derive(Debug)]
pub struct TodoState<S> {
    store: TodoStore<S>,
    todos: Vec<TodoRecord>,
    error: Option<String>,
    persistence: Persistence,
    options: StateOptions,
}

impl<S: KvSurface> TodoState<S> {
    /// Load the initial list from `store`
    ///
    /// Never fails: an unusable store leaves an empty list and an error
    /// message.
    pub fn initialize(store: TodoStore<S>, options: StateOptions) -> Self {
        let mut state = Self {
            store,
            todos: Vec::new(),
            error: None,
            persistence: Persistence::Store,
            options,
        };

        if !state.store.is_supported() {
            tracing::warn!(key = %state.store.key(), "storage unsupported; running memory-only");
            state.persistence = Persistence::MemoryOnly;
            state.set_error(&Error::StorageUnsupported);
            return state;
        }

        match state.store.load_all() {
            Ok(todos) => {
                tracing::info!(key = %state.store.key(), count = todos.len(), "todos loaded");
                state.todos = todos;
            }
            Err(err) => state.set_error(&err),
        }

        state
    }

    pub fn todos(&self) -> &[TodoRecord] {
        &self.todos
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn persistence(&self) -> Persistence {
        self.persistence
    }

    pub fn policy(&self) -> SyncPolicy {
        SyncPolicy::MemoryFirst
    }

    pub fn store(&self) -> &TodoStore<S> {
        &self.store
    }

    pub fn find(&self, id: TodoId) -> Option<&TodoRecord> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn add_todo(&mut self, record: TodoRecord) {
        if self.options.duplicate_ids == DuplicateIds::Reject && self.find(record.id).is_some() {
            self.set_error(&Error::DuplicateId(record.id));
            return;
        }

        self.todos.push(record.clone());
        self.mirror("add", |store| store.add(&record));
    }

    /// Merge `patch` into every record with its id
    pub fn update_todo(&mut self, patch: TodoPatch) {
        let mut matched = false;
        for todo in self.todos.iter_mut().filter(|todo| todo.id == patch.id) {
            todo.merge(&patch);
            matched = true;
        }

        if !matched {
            tracing::debug!(id = patch.id, "update for unknown todo ignored");
            return;
        }
        self.mirror("update", |store| store.update(&patch));
    }

    pub fn remove_todo(&mut self, id: TodoId) {
        self.todos.retain(|todo| todo.id != id);
        self.mirror("remove", |store| store.remove(id));
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn mirror<F>(&mut self, op: &'static str, write: F)
    where
        F: FnOnce(&TodoStore<S>) -> crate::error::Result<()>,
    {
        if self.persistence == Persistence::MemoryOnly {
            return;
        }

        if let Err(err) = write(&self.store) {
            tracing::warn!(op, error = %err, "change kept in memory only");
            self.set_error(&err);
        }
    }

    fn set_error(&mut self, err: &Error) {
        self.error = Some(err.to_string());
    }
}
