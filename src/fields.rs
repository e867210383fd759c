//! Enumerated field types for task records.
//!
//! Values are persisted with their display spelling (`"High"`, `"Medium"`,
//! `"Low"`), so the file stays readable and editable by hand.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Priority classification for a task.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// All priorities in the order the form cycles through them.
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Display label, identical to the persisted spelling.
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Position of this priority within [`Priority::ALL`].
    pub fn position(self) -> usize {
        Self::ALL.iter().position(|&p| p == self).unwrap_or(1)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derived completion label shown in the status column.
pub fn format_status(completed: bool) -> &'static str {
    if completed {
        "Done"
    } else {
        "Pending"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_uses_display_spelling_on_disk() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"High\"");
        let p: Priority = serde_json::from_str("\"Low\"").unwrap();
        assert_eq!(p, Priority::Low);
        assert!(serde_json::from_str::<Priority>("\"Urgent\"").is_err());
    }

    #[test]
    fn test_default_priority_is_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!(Priority::default().position(), 1);
    }

    #[test]
    fn test_status_label_follows_completion() {
        assert_eq!(format_status(true), "Done");
        assert_eq!(format_status(false), "Pending");
    }
}
