//! taskflow - todo list state with fallible local persistence
//!
//! The library keeps an in-memory todo list in sync with a key-value
//! storage slot, and keeps working in memory when that storage is missing,
//! full or corrupt.
//!
//! # Core Concepts
//!
//! - **Surface**: host key-value storage where any call may fail
//! - **Store**: the todo list serialized as JSON under one surface key
//! - **State**: the in-memory list and the current error message; changes
//!   land in memory first and are mirrored to the store best-effort
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `taskflow.toml`
//! - `error`: Error types and result aliases
//! - `lock`: File locking and atomic writes for the file surface
//! - `output`: Human and JSON output for CLI commands
//! - `state`: The todo state container
//! - `store`: JSON persistence of the todo list
//! - `surface`: Key-value storage backends (memory and files)
//! - `todo`: Todo records, patches and id generation
//! - `view`: Input rules and display grouping for front ends

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod output;
pub mod state;
pub mod store;
pub mod surface;
pub mod todo;
pub mod view;

pub use error::{Error, Result};
pub use state::{DuplicateIds, Persistence, StateOptions, SyncPolicy, TodoState};
pub use store::{TodoStore, DEFAULT_STORAGE_KEY};
pub use surface::{FileSurface, KvSurface, MemorySurface};
pub use todo::{TodoId, TodoPatch, TodoRecord};
