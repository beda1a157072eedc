//! taskflow todo commands
//!
//! Each handler applies the view-layer input rules, calls the state
//! container, and renders the result. A storage error left on the state is
//! shown as a warning and dismissed.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::state::{Persistence, TodoState};
use crate::surface::KvSurface;
use crate::todo::{TodoId, TodoRecord};
use crate::view::{self, EditOutcome};

#[derive(Debug, Clone, Copy)]
pub struct CommandOutput {
    pub json: bool,
    pub quiet: bool,
}

impl From<CommandOutput> for OutputOptions {
    fn from(output: CommandOutput) -> Self {
        OutputOptions {
            json: output.json,
            quiet: output.quiet,
        }
    }
}

/// Options for `taskflow add`
pub struct AddOptions {
    pub text: Vec<String>,
}

/// Options for `taskflow toggle`
pub struct ToggleOptions {
    pub id: TodoId,
}

/// Options for `taskflow edit`
pub struct EditOptions {
    pub id: TodoId,
    pub text: Vec<String>,
}

/// Options for `taskflow rm`
pub struct RmOptions {
    pub id: TodoId,
}

#[derive(Serialize)]
struct TodoReport {
    todo: TodoRecord,
    persistence: Persistence,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    unchanged: bool,
}

#[derive(Serialize)]
struct RemoveReport {
    id: TodoId,
    remaining: usize,
    persistence: Persistence,
}

#[derive(Serialize)]
struct ListReport {
    todos: Vec<TodoRecord>,
    total: usize,
    completed: usize,
    persistence: Persistence,
}

pub fn run_add<S: KvSurface>(
    state: &mut TodoState<S>,
    options: AddOptions,
    output: CommandOutput,
) -> Result<()> {
    let input = options.text.join(" ");
    let record = view::submit_new(&input, state.todos())
        .ok_or_else(|| Error::InvalidArgument("todo text cannot be empty".to_string()))?;

    state.add_todo(record.clone());

    let mut human = HumanOutput::new(format!("taskflow add: {}", record.text));
    human.push_summary("id", record.id.to_string());
    human.push_next_step("taskflow list");
    take_storage_warning(state, &mut human);

    let report = TodoReport {
        todo: record,
        persistence: state.persistence(),
        unchanged: false,
    };
    emit_success(output.into(), "add", &report, Some(&human))
}

pub fn run_list<S: KvSurface>(state: &mut TodoState<S>, output: CommandOutput) -> Result<()> {
    let grouped = view::group_for_display(state.todos());

    let header = if grouped.is_empty() {
        "No todos available.".to_string()
    } else {
        format!("taskflow: {} todos", state.todos().len())
    };
    let mut human = HumanOutput::new(header);
    human.push_section(
        "To do",
        grouped.incomplete.iter().map(|todo| format_line(todo)).collect(),
    );
    human.push_section(
        "Completed",
        grouped.completed.iter().map(|todo| format_line(todo)).collect(),
    );
    let completed = grouped.completed.len();
    take_storage_warning(state, &mut human);

    let report = ListReport {
        todos: state.todos().to_vec(),
        total: state.todos().len(),
        completed,
        persistence: state.persistence(),
    };
    emit_success(output.into(), "list", &report, Some(&human))
}

pub fn run_toggle<S: KvSurface>(
    state: &mut TodoState<S>,
    options: ToggleOptions,
    output: CommandOutput,
) -> Result<()> {
    let todo = existing(state, options.id)?;
    state.update_todo(view::toggle(&todo));
    let updated = existing(state, options.id)?;

    let verb = if updated.completed { "done" } else { "reopened" };
    let mut human = HumanOutput::new(format!("taskflow toggle: {verb} {}", updated.text));
    human.push_summary("id", updated.id.to_string());
    take_storage_warning(state, &mut human);

    let report = TodoReport {
        todo: updated,
        persistence: state.persistence(),
        unchanged: false,
    };
    emit_success(output.into(), "toggle", &report, Some(&human))
}

pub fn run_edit<S: KvSurface>(
    state: &mut TodoState<S>,
    options: EditOptions,
    output: CommandOutput,
) -> Result<()> {
    let todo = existing(state, options.id)?;
    let input = options.text.join(" ");

    let unchanged = match view::submit_edit(&todo, &input) {
        EditOutcome::Rejected => {
            return Err(Error::InvalidArgument(
                "todo text cannot be empty".to_string(),
            ))
        }
        EditOutcome::Unchanged => true,
        EditOutcome::Changed(patch) => {
            state.update_todo(patch);
            false
        }
    };
    let updated = existing(state, options.id)?;

    let header = if unchanged {
        format!("taskflow edit: unchanged {}", updated.text)
    } else {
        format!("taskflow edit: {}", updated.text)
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("id", updated.id.to_string());
    take_storage_warning(state, &mut human);

    let report = TodoReport {
        todo: updated,
        persistence: state.persistence(),
        unchanged,
    };
    emit_success(output.into(), "edit", &report, Some(&human))
}

pub fn run_rm<S: KvSurface>(
    state: &mut TodoState<S>,
    options: RmOptions,
    output: CommandOutput,
) -> Result<()> {
    let todo = existing(state, options.id)?;
    state.remove_todo(todo.id);

    let mut human = HumanOutput::new(format!("taskflow rm: {}", todo.text));
    human.push_summary("remaining", state.todos().len().to_string());
    take_storage_warning(state, &mut human);

    let report = RemoveReport {
        id: todo.id,
        remaining: state.todos().len(),
        persistence: state.persistence(),
    };
    emit_success(output.into(), "rm", &report, Some(&human))
}

fn existing<S: KvSurface>(state: &TodoState<S>, id: TodoId) -> Result<TodoRecord> {
    state.find(id).cloned().ok_or(Error::TodoNotFound(id))
}

fn format_line(todo: &TodoRecord) -> String {
    let mark = if todo.completed { "x" } else { " " };
    format!("[{mark}] {} {}", todo.id, todo.text)
}

/// Move the state's error into `human` as a warning and dismiss it
fn take_storage_warning<S: KvSurface>(state: &mut TodoState<S>, human: &mut HumanOutput) {
    if let Some(message) = state.error() {
        human.push_warning(message.to_string());
        state.clear_error();
    }
}
