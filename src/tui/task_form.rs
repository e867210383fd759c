//! Modal task form for adding and editing tasks.
//!
//! The form owns a working draft and never touches the store. Each key press
//! returns a [`FormOutcome`]; the caller applies a submitted task itself, so
//! opening the form is a plain request/response exchange.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::{error::ValidationError, fields::Priority, task::Task, tui::input::InputField};

/// Field order for keyboard navigation.
pub const DESCRIPTION_GLOBAL_ORDER: usize = 0;
pub const DUE_DATE_GLOBAL_ORDER: usize = 1;
pub const PRIORITY_GLOBAL_ORDER: usize = 2;
const FIELD_COUNT: usize = 3;

/// Accepted due date layout.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Where a submitted task goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    New,
    Existing(usize),
}

/// A validated task ready to be applied to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub target: FormTarget,
    pub task: Task,
}

/// Result of feeding one key to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// Still editing.
    Pending,
    /// Save attempted but input was invalid; the form stays open.
    Rejected(ValidationError),
    /// Closed without saving.
    Cancelled,
    /// Closed with a valid task.
    Submitted(FormSubmission),
}

/// Draft state of the add/edit form.
#[derive(Debug, Clone)]
pub struct TaskForm {
    pub description: InputField,
    pub due_date: InputField,
    pub priority: usize,
    pub current_field: usize,
    target: FormTarget,
}

impl TaskForm {
    /// Empty form for a new task, priority preset to Medium.
    pub fn new() -> Self {
        Self {
            description: InputField::new(),
            due_date: InputField::new(),
            priority: Priority::default().position(),
            current_field: DESCRIPTION_GLOBAL_ORDER,
            target: FormTarget::New,
        }
    }

    /// Form pre-filled from the task at `index`.
    pub fn from_task(task: &Task, index: usize) -> Self {
        Self {
            description: InputField::with_value(&task.description),
            due_date: InputField::with_value(&task.due_date),
            priority: task.priority.position(),
            current_field: DESCRIPTION_GLOBAL_ORDER,
            target: FormTarget::Existing(index),
        }
    }

    /// Whether the form adds a new task or overwrites an existing one.
    pub fn target(&self) -> FormTarget {
        self.target
    }

    /// Dialog title.
    pub fn title(&self) -> &'static str {
        match self.target {
            FormTarget::New => "Add Task",
            FormTarget::Existing(_) => "Edit Task",
        }
    }

    /// Priority currently shown in the selector.
    pub fn selected_priority(&self) -> Priority {
        Priority::ALL[self.priority % Priority::ALL.len()]
    }

    /// Focus the next field, wrapping to the first.
    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
    }

    /// Focus the previous field, wrapping to the last.
    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            FIELD_COUNT - 1
        } else {
            self.current_field - 1
        };
    }

    /// The text field under focus, if focus is not on the priority selector.
    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            DESCRIPTION_GLOBAL_ORDER => Some(&mut self.description),
            DUE_DATE_GLOBAL_ORDER => Some(&mut self.due_date),
            _ => None,
        }
    }

    /// Type into the focused text field.
    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.active_input() {
            field.handle_char(c);
        }
    }

    /// Delete left of the cursor in the focused text field.
    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_backspace();
        }
    }

    /// Delete under the cursor in the focused text field.
    pub fn handle_delete(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_delete();
        }
    }

    /// Move the cursor, or cycle the priority when the selector has focus.
    pub fn handle_left_right(&mut self, right: bool) {
        if self.current_field == PRIORITY_GLOBAL_ORDER {
            let n = Priority::ALL.len();
            self.priority = if right {
                (self.priority + 1) % n
            } else {
                (self.priority + n - 1) % n
            };
        } else if let Some(field) = self.active_input() {
            if right {
                field.move_cursor_right();
            } else {
                field.move_cursor_left();
            }
        }
    }

    /// Jump to the start or end of the focused text field.
    pub fn handle_home_end(&mut self, end: bool) {
        if let Some(field) = self.active_input() {
            if end {
                field.move_cursor_end();
            } else {
                field.move_cursor_home();
            }
        }
    }

    /// Validate the draft and build the task it describes.
    ///
    /// `completed` is always `false`, also when editing: saving an edited
    /// task marks it pending again.
    pub fn submit(&self) -> Result<FormSubmission, ValidationError> {
        let description = validate_description(&self.description.value)?;
        let due_date = validate_due_date(&self.due_date.value)?;
        Ok(FormSubmission {
            target: self.target,
            task: Task::new(description, due_date, self.selected_priority()),
        })
    }

    /// Feed one key press to the form.
    pub fn handle_key(&mut self, key: KeyEvent) -> FormOutcome {
        match key.code {
            KeyCode::Esc => return FormOutcome::Cancelled,
            KeyCode::Enter => {
                return match self.submit() {
                    Ok(submission) => FormOutcome::Submitted(submission),
                    Err(e) => {
                        debug!(error = %e, "form input rejected");
                        FormOutcome::Rejected(e)
                    }
                };
            }
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.prev_field(),
            KeyCode::Left => self.handle_left_right(false),
            KeyCode::Right => self.handle_left_right(true),
            KeyCode::Home => self.handle_home_end(false),
            KeyCode::End => self.handle_home_end(true),
            KeyCode::Backspace => self.handle_backspace(),
            KeyCode::Delete => self.handle_delete(),
            KeyCode::Char(_)
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {}
            KeyCode::Char(c) => self.handle_char(c),
            _ => {}
        }
        FormOutcome::Pending
    }
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim a description, rejecting it when nothing is left.
pub fn validate_description(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    Ok(trimmed.to_string())
}

/// Trim a due date; empty is allowed, anything else must be a real calendar date.
///
/// The year must be exactly four ASCII digits; month and day may drop their
/// leading zero (`2025-1-5`).
pub fn validate_due_date(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    let invalid = || ValidationError::InvalidDueDate(trimmed.to_string());
    let year = trimmed.split('-').next().unwrap_or_default();
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(trimmed, DUE_DATE_FORMAT)
        .map(|_| trimmed.to_string())
        .map_err(|_| invalid())
}
