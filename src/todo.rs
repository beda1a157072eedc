//! Todo records and partial updates

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Todo identifier; creation time in milliseconds unless bumped for uniqueness
pub type TodoId = i64;

/// One todo item as stored and displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRecord {
    pub id: TodoId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl TodoRecord {
    pub fn new(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }

    /// Shallow merge: fields present in `patch` override, others are kept
    ///
    /// The id never changes, even if the patch targets another record.
    pub fn merge(&mut self, patch: &TodoPatch) {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

/// Partial record for updates; `None` fields are left untouched
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TodoPatch {
    pub id: TodoId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn new(id: TodoId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }
}

/// Next id for a new record in `existing`
///
/// Uses the current time in milliseconds, bumped past the largest existing id
/// so ids stay unique and increasing even within one millisecond.
pub fn next_id(existing: &[TodoRecord]) -> TodoId {
    next_id_at(Utc::now().timestamp_millis(), existing)
}

pub(crate) fn next_id_at(now_ms: i64, existing: &[TodoRecord]) -> TodoId {
    match existing.iter().map(|record| record.id).max() {
        Some(max) if max >= now_ms => max.saturating_add(1),
        _ => now_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_overrides_only_present_fields() {
        let mut record = TodoRecord::new(1, "Buy milk");
        record.merge(&TodoPatch::new(1).completed(true));
        assert_eq!(record, TodoRecord { id: 1, text: "Buy milk".into(), completed: true });

        record.merge(&TodoPatch::new(1).text("Buy oat milk"));
        assert_eq!(record.text, "Buy oat milk");
        assert!(record.completed);
    }

    #[test]
    fn merge_keeps_id() {
        let mut record = TodoRecord::new(1, "a");
        record.merge(&TodoPatch::new(7).text("b"));
        assert_eq!(record.id, 1);
        assert_eq!(record.text, "b");
    }

    #[test]
    fn missing_completed_defaults_to_false() {
        let record: TodoRecord = serde_json::from_str(r#"{"id":3,"text":"x"}"#).unwrap();
        assert!(!record.completed);
    }

    #[test]
    fn serializes_in_storage_field_order() {
        let json = serde_json::to_string(&TodoRecord::new(1, "Buy milk")).unwrap();
        assert_eq!(json, r#"{"id":1,"text":"Buy milk","completed":false}"#);
    }

    #[test]
    fn patch_serialization_skips_absent_fields() {
        let json = serde_json::to_string(&TodoPatch::new(1).completed(true)).unwrap();
        assert_eq!(json, r#"{"id":1,"completed":true}"#);
    }

    #[test]
    fn next_id_uses_clock_or_bumps_past_max() {
        assert_eq!(next_id_at(1_000, &[]), 1_000);
        assert_eq!(next_id_at(1_000, &[TodoRecord::new(5, "a")]), 1_000);
        assert_eq!(next_id_at(1_000, &[TodoRecord::new(1_000, "a")]), 1_001);
        assert_eq!(
            next_id_at(1_000, &[TodoRecord::new(2_000, "a"), TodoRecord::new(10, "b")]),
            2_001
        );
    }
}
