//! Input handling and display grouping for presentation code
//!
//! The state container accepts whatever it is given. Front ends run user
//! input through these helpers first so empty or unchanged text never
//! reaches it.

use crate::todo::{next_id, TodoPatch, TodoRecord};

/// Build a new record from raw form input, or `None` if it trims to nothing
pub fn submit_new(input: &str, existing: &[TodoRecord]) -> Option<TodoRecord> {
    let text = input.trim();
    if text.is_empty() {
        return None;
    }
    Some(TodoRecord::new(next_id(existing), text))
}

/// Result of submitting an edit form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Input was blank; the editor stays open
    Rejected,
    /// Trimmed text equals the current text; close without updating
    Unchanged,
    /// Send this patch to the container
    Changed(TodoPatch),
}

pub fn submit_edit(todo: &TodoRecord, input: &str) -> EditOutcome {
    let text = input.trim();
    if text.is_empty() {
        EditOutcome::Rejected
    } else if text == todo.text {
        EditOutcome::Unchanged
    } else {
        EditOutcome::Changed(TodoPatch::new(todo.id).text(text))
    }
}

/// Patch flipping the completion flag of `todo`
pub fn toggle(todo: &TodoRecord) -> TodoPatch {
    TodoPatch::new(todo.id).completed(!todo.completed)
}

/// Incomplete todos, then completed ones, each in insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouped<'a> {
    pub incomplete: Vec<&'a TodoRecord>,
    pub completed: Vec<&'a TodoRecord>,
}

impl Grouped<'_> {
    pub fn is_empty(&self) -> bool {
        self.incomplete.is_empty() && self.completed.is_empty()
    }
}

pub fn group_for_display(todos: &[TodoRecord]) -> Grouped<'_> {
    let (completed, incomplete): (Vec<_>, Vec<_>) =
        todos.iter().partition(|todo| todo.completed);
    Grouped {
        incomplete,
        completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_input_is_trimmed_and_blank_rejected() {
        assert_eq!(submit_new("   \t ", &[]), None);

        let record = submit_new("  Buy milk  ", &[]).unwrap();
        assert_eq!(record.text, "Buy milk");
        assert!(!record.completed);
    }

    #[test]
    fn new_ids_stay_unique() {
        let first = submit_new("a", &[]).unwrap();
        let second = submit_new("b", std::slice::from_ref(&first)).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn edit_outcomes() {
        let todo = TodoRecord::new(1, "Buy milk");
        assert_eq!(submit_edit(&todo, "  "), EditOutcome::Rejected);
        assert_eq!(submit_edit(&todo, " Buy milk "), EditOutcome::Unchanged);
        assert_eq!(
            submit_edit(&todo, "Buy bread "),
            EditOutcome::Changed(TodoPatch::new(1).text("Buy bread"))
        );
    }

    #[test]
    fn grouping_preserves_relative_order() {
        let mut todos = vec![
            TodoRecord::new(1, "a"),
            TodoRecord::new(2, "b"),
            TodoRecord::new(3, "c"),
            TodoRecord::new(4, "d"),
        ];
        todos[0].completed = true;
        todos[2].completed = true;

        let grouped = group_for_display(&todos);
        let ids = |items: &[&TodoRecord]| items.iter().map(|t| t.id).collect::<Vec<_>>();
        assert_eq!(ids(&grouped.incomplete), vec![2, 4]);
        assert_eq!(ids(&grouped.completed), vec![1, 3]);
        assert!(group_for_display(&[]).is_empty());
    }

    #[test]
    fn toggle_flips_completion() {
        let todo = TodoRecord::new(1, "a");
        assert_eq!(toggle(&todo), TodoPatch::new(1).completed(true));
    }
}
