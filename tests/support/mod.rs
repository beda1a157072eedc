#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

use taskflow::{MemorySurface, StateOptions, TodoState, TodoStore, DEFAULT_STORAGE_KEY};

/// Temporary data directory for CLI runs
pub struct TestData {
    dir: TempDir,
}

impl TestData {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn slot_file(&self, key: &str) -> PathBuf {
        self.dir.path().join(format!("{key}.json"))
    }

    pub fn write_slot(&self, key: &str, contents: &str) {
        fs::write(self.slot_file(key), contents).expect("write slot");
    }

    pub fn read_slot(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.slot_file(key)).ok()
    }

    pub fn write_config(&self, contents: &str) {
        fs::write(self.dir.path().join("taskflow.toml"), contents).expect("write config");
    }

    /// `taskflow` with an isolated data dir and no inherited settings
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskflow").expect("binary");
        cmd.env_remove("TASKFLOW_CONFIG")
            .env_remove("TASKFLOW_KEY")
            .env_remove("RUST_LOG")
            .env("TASKFLOW_DATA_DIR", self.dir.path());
        cmd
    }
}

/// Memory surface with `json` already stored under the default key
pub fn seeded_surface(json: &str) -> MemorySurface {
    let surface = MemorySurface::new();
    taskflow::KvSurface::set_item(&surface, DEFAULT_STORAGE_KEY, json).expect("seed slot");
    surface
}

pub fn open(surface: &MemorySurface) -> TodoState<MemorySurface> {
    TodoState::initialize(
        TodoStore::with_default_key(surface.clone()),
        StateOptions::default(),
    )
}
