//! Enumerations for TUI state management.

/// Which screen receives key presses.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    TaskList,
    TaskForm,
}

/// Severity of a modal notice.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A blocking message; all input is held until it is dismissed.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    /// A warning for input the user can correct.
    pub fn warning(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    /// An error from loading or saving the task file.
    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Dialog title for this level.
    pub fn title(&self) -> &'static str {
        match self.level {
            NoticeLevel::Warning => "Warning",
            NoticeLevel::Error => "Error",
        }
    }
}
