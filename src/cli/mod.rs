//! Command-line interface for taskflow
//!
//! This module defines the CLI structure using clap derive macros. Every
//! invocation is one session: the state is initialized from storage, one
//! command runs against it, and any storage problem is reported as a warning.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{self, Config, CONFIG_FILENAME};
use crate::error::Result;
use crate::state::TodoState;
use crate::store::TodoStore;
use crate::surface::FileSurface;
use crate::todo::TodoId;

mod todo;

/// taskflow - a small todo list
///
/// Add, edit, toggle and remove short tasks. The list is kept in a local
/// data directory; when storage is unavailable changes still apply for the
/// current command and a warning is printed.
#[derive(Parser, Debug)]
#[command(name = "taskflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to taskflow.toml in the data directory)
    #[arg(long, global = true, env = "TASKFLOW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the todo storage
    #[arg(long, global = true, env = "TASKFLOW_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Storage key for the todo list (overrides the config file)
    #[arg(long, global = true, env = "TASKFLOW_KEY")]
    pub key: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new todo
    Add {
        /// Todo text; multiple words are joined with spaces
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// List todos, incomplete first
    #[command(alias = "ls")]
    List,

    /// Mark a todo complete, or incomplete again
    Toggle {
        /// Todo id
        id: TodoId,
    },

    /// Change the text of a todo
    Edit {
        /// Todo id
        id: TodoId,

        /// New text; multiple words are joined with spaces
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Delete a todo
    Rm {
        /// Todo id
        id: TodoId,
    },
}

/// Resolved settings for one session
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub data_dir: PathBuf,
    pub config: Config,
}

impl Cli {
    /// Resolve data directory and configuration from flags, env and file
    pub fn settings(&self) -> Result<SessionSettings> {
        let data_dir = config::resolve_data_dir(self.data_dir.as_deref());

        let mut config = match &self.config {
            // An explicitly named config must load cleanly.
            Some(path) => Config::load(path)?,
            None => Config::load_or_default(&data_dir.join(CONFIG_FILENAME)),
        };
        if let Some(key) = &self.key {
            let key = key.trim();
            if key.is_empty() {
                return Err(crate::error::Error::InvalidArgument(
                    "--key cannot be empty".to_string(),
                ));
            }
            config.storage.key = key.to_string();
        }

        Ok(SessionSettings { data_dir, config })
    }

    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let settings = self.settings()?;
        tracing::debug!(
            data_dir = %settings.data_dir.display(),
            key = %settings.config.storage.key,
            "starting session"
        );

        let surface = FileSurface::new(&settings.data_dir)
            .with_lock_timeout(settings.config.storage.lock_timeout_ms);
        let store = TodoStore::new(surface, settings.config.storage.key.clone());
        let mut state = TodoState::initialize(store, settings.config.state_options());

        let output = todo::CommandOutput {
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Add { text } => todo::run_add(&mut state, todo::AddOptions { text }, output),
            Commands::List => todo::run_list(&mut state, output),
            Commands::Toggle { id } => {
                todo::run_toggle(&mut state, todo::ToggleOptions { id }, output)
            }
            Commands::Edit { id, text } => {
                todo::run_edit(&mut state, todo::EditOptions { id, text }, output)
            }
            Commands::Rm { id } => todo::run_rm(&mut state, todo::RmOptions { id }, output),
        }
    }
}
