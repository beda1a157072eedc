//! Persistent key-value surfaces
//!
//! A surface is the host storage the todo store writes into: a flat map of
//! string keys to string values where any call may fail. Two backends:
//!
//! - [`MemorySurface`]: in-process map shared between clones, with an
//!   optional byte quota and a switch that makes every call fail
//! - [`FileSurface`]: one `<key>.json` file per key under a data directory,
//!   read and written under an advisory lock

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};

/// Key written and removed by [`KvSurface::is_supported`]
pub const PROBE_KEY: &str = "__taskflow_probe__";

/// A fallible string key-value store
pub trait KvSurface {
    /// Read a value; `Ok(None)` when the key is absent
    fn get_item(&self, key: &str) -> io::Result<Option<String>>;

    /// Store a value, replacing any previous one
    fn set_item(&self, key: &str, value: &str) -> io::Result<()>;

    /// Delete a key; deleting an absent key succeeds
    fn remove_item(&self, key: &str) -> io::Result<()>;

    /// Whether the surface accepts writes at all
    ///
    /// Writes and removes [`PROBE_KEY`]; any failure means unsupported.
    fn is_supported(&self) -> bool {
        self.set_item(PROBE_KEY, PROBE_KEY).is_ok() && self.remove_item(PROBE_KEY).is_ok()
    }
}

impl<T: KvSurface + ?Sized> KvSurface for Box<T> {
    fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> io::Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> io::Result<()> {
        (**self).remove_item(key)
    }

    fn is_supported(&self) -> bool {
        (**self).is_supported()
    }
}

// =========================================================================
// In-memory surface
// =========================================================================

#[derive(Debug, Default)]
struct MemoryInner {
    items: HashMap<String, String>,
    quota_bytes: Option<usize>,
    disabled: bool,
}

impl MemoryInner {
    fn used_bytes_without(&self, key: &str) -> usize {
        self.items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

/// In-process surface; clones share the same map
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface that rejects writes pushing total key+value bytes over `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        let surface = Self::new();
        surface.lock().quota_bytes = Some(bytes);
        surface
    }

    /// Surface on which every call fails
    pub fn disabled() -> Self {
        let surface = Self::new();
        surface.set_disabled(true);
        surface
    }

    /// Toggle failure of every call at runtime
    pub fn set_disabled(&self, disabled: bool) {
        self.lock().disabled = disabled;
    }

    /// Raw value under `key`, bypassing the disabled switch
    pub fn peek(&self, key: &str) -> Option<String> {
        self.lock().items.get(key).cloned()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        // A panicked holder cannot leave the map half-updated.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn guard(&self) -> io::Result<MutexGuard<'_, MemoryInner>> {
        let inner = self.lock();
        if inner.disabled {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "storage is disabled",
            ));
        }
        Ok(inner)
    }
}

impl KvSurface for MemorySurface {
    fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.guard()?.items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> io::Result<()> {
        let mut inner = self.guard()?;
        if let Some(quota) = inner.quota_bytes {
            let needed = inner.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("quota exceeded ({needed} > {quota} bytes)"),
                ));
            }
        }
        inner.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> io::Result<()> {
        self.guard()?.items.remove(key);
        Ok(())
    }
}

// =========================================================================
// File-backed surface
// =========================================================================

/// Surface storing each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileSurface {
    dir: PathBuf,
    lock_timeout_ms: u64,
}

impl FileSurface {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`, or `InvalidInput` for keys that are not plain names
    pub fn slot_path(&self, key: &str) -> io::Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'));
        if !valid {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid storage key '{key}'"),
            ));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn into_io(err: crate::error::Error) -> io::Error {
    match err {
        crate::error::Error::Io(e) => e,
        other => io::Error::new(io::ErrorKind::Other, other.to_string()),
    }
}

impl KvSurface for FileSurface {
    fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        let path = self.slot_path(key)?;
        lock::read_locked(&path, self.lock_timeout_ms).map_err(into_io)
    }

    fn set_item(&self, key: &str, value: &str) -> io::Result<()> {
        let path = self.slot_path(key)?;
        tracing::trace!(path = %path.display(), bytes = value.len(), "writing slot");
        lock::write_atomic_locked(&path, value.as_bytes(), self.lock_timeout_ms).map_err(into_io)
    }

    fn remove_item(&self, key: &str) -> io::Result<()> {
        let path = self.slot_path(key)?;
        lock::remove_locked(&path, self.lock_timeout_ms).map_err(into_io)
    }

    /// Write and delete the probe file directly, leaving no lock file behind
    fn is_supported(&self) -> bool {
        let Ok(path) = self.slot_path(PROBE_KEY) else {
            return false;
        };
        if let Err(err) = lock::write_atomic(&path, PROBE_KEY.as_bytes()) {
            tracing::debug!(dir = %self.dir.display(), error = %err, "storage probe failed");
            return false;
        }

        match fs::remove_file(&path) {
            Ok(()) => true,
            // Another session probing the same directory removed it first.
            Err(err) if err.kind() == io::ErrorKind::NotFound => true,
            Err(err) => {
                tracing::debug!(dir = %self.dir.display(), error = %err, "storage probe failed");
                false
            }
        }
    }
}
