//! Persistent todo store
//!
//! Maps the whole todo list onto a single slot of a [`KvSurface`]. The slot
//! holds a compact JSON array of records; every mutation reads the full list,
//! edits it and writes it back. Lists are small and there is one writer, so
//! there is no incremental format.

use crate::error::{Error, Result};
use crate::surface::KvSurface;
use crate::todo::{TodoId, TodoPatch, TodoRecord};

/// Slot name used when no key is configured
pub const DEFAULT_STORAGE_KEY: &str = "TaskFlow_todos";

/// Todo list persisted under one key of a surface
#[derive(Debug, Clone)]
pub struct TodoStore<S> {
    surface: S,
    key: String,
}

impl<S: KvSurface> TodoStore<S> {
    pub fn new(surface: S, key: impl Into<String>) -> Self {
        Self {
            surface,
            key: key.into(),
        }
    }

    /// Store under [`DEFAULT_STORAGE_KEY`]
    pub fn with_default_key(surface: S) -> Self {
        Self::new(surface, DEFAULT_STORAGE_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Whether the underlying surface accepts writes
    pub fn is_supported(&self) -> bool {
        self.surface.is_supported()
    }

    /// Read every record; an absent slot is an empty list
    pub fn load_all(&self) -> Result<Vec<TodoRecord>> {
        let raw = self
            .surface
            .get_item(&self.key)
            .map_err(|err| self.read_error(err))?;

        let Some(raw) = raw else {
            tracing::debug!(key = %self.key, "slot empty");
            return Ok(Vec::new());
        };

        let todos: Vec<TodoRecord> =
            serde_json::from_str(&raw).map_err(|err| self.read_error(err))?;
        tracing::debug!(key = %self.key, count = todos.len(), "loaded todos");
        Ok(todos)
    }

    /// Replace the slot with `todos`
    pub fn save_all(&self, todos: &[TodoRecord]) -> Result<()> {
        let json = serde_json::to_string(todos).map_err(|err| self.write_error(err))?;
        self.surface
            .set_item(&self.key, &json)
            .map_err(|err| self.write_error(err))?;
        tracing::debug!(key = %self.key, count = todos.len(), "saved todos");
        Ok(())
    }

    pub fn add(&self, record: &TodoRecord) -> Result<()> {
        let mut todos = self.load_all()?;
        todos.push(record.clone());
        self.save_all(&todos)
    }

    /// Merge `patch` into every stored record with its id
    ///
    /// Each match keeps its own unpatched fields. No match leaves the slot
    /// untouched.
    pub fn update(&self, patch: &TodoPatch) -> Result<()> {
        let mut todos = self.load_all()?;
        let mut matched = false;
        for todo in todos.iter_mut().filter(|todo| todo.id == patch.id) {
            todo.merge(patch);
            matched = true;
        }
        if !matched {
            return Ok(());
        }
        self.save_all(&todos)
    }

    /// Drop records with `id`; no match leaves the slot untouched
    pub fn remove(&self, id: TodoId) -> Result<()> {
        let mut todos = self.load_all()?;
        let before = todos.len();
        todos.retain(|todo| todo.id != id);
        if todos.len() == before {
            return Ok(());
        }
        self.save_all(&todos)
    }

    fn read_error(&self, err: impl std::fmt::Display) -> Error {
        tracing::warn!(key = %self.key, error = %err, "todo read failed");
        Error::StorageRead {
            key: self.key.clone(),
            reason: err.to_string(),
        }
    }

    fn write_error(&self, err: impl std::fmt::Display) -> Error {
        tracing::warn!(key = %self.key, error = %err, "todo write failed");
        Error::StorageWrite {
            key: self.key.clone(),
            reason: err.to_string(),
        }
    }
}
