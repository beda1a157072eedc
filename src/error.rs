//! Error types for taskflow
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, unknown todo, invalid config)
//! - 4: Operation failed (storage, I/O, serialization)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the taskflow CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskflow operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Todo not found: {0}")]
    TodoNotFound(i64),

    #[error("Duplicate todo id: {0}")]
    DuplicateId(i64),

    // Storage failures (exit code 4)
    #[error("Persistent storage is not supported here. Data will not be saved.")]
    StorageUnsupported,

    #[error("Unable to fetch todos from storage slot '{key}': {reason}")]
    StorageRead { key: String, reason: String },

    #[error("Unable to save todos to storage slot '{key}': {reason}")]
    StorageWrite { key: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_)
            | Error::InvalidConfig(_)
            | Error::TodoNotFound(_)
            | Error::DuplicateId(_) => exit_codes::USER_ERROR,

            Error::StorageUnsupported
            | Error::StorageRead { .. }
            | Error::StorageWrite { .. }
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::LockFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for taskflow operations
pub type Result<T> = std::result::Result<T, Error>;
