use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Page;

/// Lifecycle state of a task.
///
/// The states are flat: any state may be set from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Draft,
    #[default]
    Todo,
    Doing,
    Done,
    Trash,
}

impl TaskState {
    pub const ALL: [TaskState; 5] = [
        TaskState::Draft,
        TaskState::Todo,
        TaskState::Doing,
        TaskState::Done,
        TaskState::Trash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Draft => "draft",
            TaskState::Todo => "todo",
            TaskState::Doing => "doing",
            TaskState::Done => "done",
            TaskState::Trash => "trash",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task state: {0}")]
pub struct ParseTaskStateError(pub String);

impl FromStr for TaskState {
    type Err = ParseTaskStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| ParseTaskStateError(s.to_string()))
    }
}

/// Task entity - a todo item owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub state: TaskState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Apply a partial update, leaving absent fields untouched.
    ///
    /// Returns `true` when at least one field was present.
    pub fn apply(&mut self, patch: TaskPatch) -> bool {
        let changed = !patch.is_empty();

        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(state) = patch.state {
            self.state = state;
        }
        if changed {
            self.updated_at = Utc::now();
        }

        changed
    }
}

/// A task that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub state: TaskState,
}

/// Partial update of a task. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub state: Option<TaskState>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.state.is_none()
    }
}

/// Listing criteria for a single owner's tasks.
///
/// Text filters are case-sensitive substring matches, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub state: Option<TaskState>,
    pub page: Page,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        let title_ok = self
            .title
            .as_deref()
            .is_none_or(|needle| task.title.contains(needle));
        let description_ok = self
            .description
            .as_deref()
            .is_none_or(|needle| task.description.contains(needle));
        let state_ok = self.state.is_none_or(|state| task.state == state);

        title_ok && description_ok && state_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str, description: &str, state: TaskState) -> Task {
        let now = Utc::now();
        Task {
            id: 1,
            owner_id: 1,
            title: title.to_string(),
            description: description.to_string(),
            state,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_state_parses_every_lowercase_name() {
        for state in TaskState::ALL {
            assert_eq!(state.as_str().parse::<TaskState>().unwrap(), state);
        }
    }

    #[test]
    fn test_state_rejects_unknown_names() {
        assert!("archived".parse::<TaskState>().is_err());
        assert!("Todo".parse::<TaskState>().is_err());
    }

    #[test]
    fn test_state_defaults_to_todo() {
        assert_eq!(TaskState::default(), TaskState::Todo);
    }

    #[test]
    fn test_state_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TaskState::Doing).unwrap(), "\"doing\"");
        let parsed: TaskState = serde_json::from_str("\"trash\"").unwrap();
        assert_eq!(parsed, TaskState::Trash);
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        let mut todo = task("Title", "Description", TaskState::Draft);
        let before = todo.updated_at;

        let changed = todo.apply(TaskPatch {
            state: Some(TaskState::Done),
            ..Default::default()
        });

        assert!(changed);
        assert_eq!(todo.title, "Title");
        assert_eq!(todo.description, "Description");
        assert_eq!(todo.state, TaskState::Done);
        assert!(todo.updated_at >= before);
    }

    #[test]
    fn test_apply_empty_patch_changes_nothing() {
        let mut todo = task("Title", "Description", TaskState::Draft);
        let original = todo.clone();

        assert!(!todo.apply(TaskPatch::default()));
        assert_eq!(todo, original);
    }

    #[test]
    fn test_filter_is_case_sensitive_substring() {
        let filter = TaskFilter {
            title: Some("Test".to_string()),
            ..Default::default()
        };

        assert!(filter.matches(&task("Test Todo", "", TaskState::Todo)));
        assert!(filter.matches(&task("My Test", "", TaskState::Todo)));
        assert!(!filter.matches(&task("test todo", "", TaskState::Todo)));
    }

    #[test]
    fn test_filter_combines_with_and() {
        let filter = TaskFilter {
            title: Some("Test".to_string()),
            description: Some("combined".to_string()),
            state: Some(TaskState::Done),
            ..Default::default()
        };

        assert!(filter.matches(&task("Test", "a combined one", TaskState::Done)));
        assert!(!filter.matches(&task("Test", "a combined one", TaskState::Todo)));
        assert!(!filter.matches(&task("Test", "other", TaskState::Done)));
    }
}
