//! Task record data structure.

use serde::{Deserialize, Serialize};

use crate::fields::{format_status, Priority};

/// A single entry in the task list.
///
/// The on-disk key for the description is `task`; `completed` may be missing
/// from older files and then reads as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "task")]
    pub description: String,
    #[serde(default)]
    pub due_date: String,
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Create a pending task.
    pub fn new(description: impl Into<String>, due_date: impl Into<String>, priority: Priority) -> Self {
        Self {
            description: description.into(),
            due_date: due_date.into(),
            priority,
            completed: false,
        }
    }

    /// "Done" or "Pending".
    pub fn status_label(&self) -> &'static str {
        format_status(self.completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_file_field_names() {
        let task = Task::new("Buy milk", "2025-03-01", Priority::High);
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["task"], "Buy milk");
        assert_eq!(value["due_date"], "2025-03-01");
        assert_eq!(value["priority"], "High");
        assert_eq!(value["completed"], false);
    }

    #[test]
    fn test_missing_completed_defaults_to_false() {
        let task: Task =
            serde_json::from_str(r#"{"task": "Call Bob", "due_date": "", "priority": "Low"}"#).unwrap();
        assert!(!task.completed);
        assert_eq!(task.status_label(), "Pending");
    }

    #[test]
    fn test_new_task_is_pending() {
        let task = Task::new("Buy milk", "", Priority::Medium);
        assert!(!task.completed);
        assert_eq!(task.status_label(), "Pending");
    }
}
