//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the task store, turns key
//! presses into store mutations, and renders the task table together with the
//! modal task form and notices.

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use tracing::{error, info, warn};

use crate::{
    error::StoreError,
    fields::{format_status, Priority},
    store::TaskStore,
    task::Task,
    tui::{
        colors::{priority_color, AMBER, DARK_BLUE, DARK_RED, GOLD},
        enums::{AppState, Notice, NoticeLevel},
        task_form::{
            FormOutcome, FormSubmission, FormTarget, TaskForm, DESCRIPTION_GLOBAL_ORDER,
            DUE_DATE_GLOBAL_ORDER, PRIORITY_GLOBAL_ORDER,
        },
        utils::centered_rect,
    },
};

/// Key hints shown in the always-visible action bar.
const ACTIONS: [(&str, &str); 6] = [
    ("a", "Add"),
    ("e", "Edit"),
    ("c", "Toggle Complete"),
    ("d", "Delete"),
    ("x", "Clear Completed"),
    ("q", "Quit"),
];

/// One table row, derived from a task and rebuilt after every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub description: String,
    pub due_date: String,
    pub priority: Priority,
    pub status: &'static str,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        TaskRow {
            description: task.description.clone(),
            due_date: task.due_date.clone(),
            priority: task.priority,
            status: task.status_label(),
        }
    }
}

/// Main application state for the terminal user interface.
pub struct App {
    state: AppState,
    store: TaskStore,
    rows: Vec<TaskRow>,
    table_state: TableState,
    task_form: TaskForm,
    notice: Option<Notice>,
    status_message: String,
}

impl App {
    /// Open the task file at `path`. A load failure is kept as an error
    /// notice, shown on the first frame, over an empty list.
    pub fn open(path: &Path) -> Self {
        let (store, load_error) = TaskStore::open(path);
        let mut app = App::new(store);
        if let Some(e) = load_error {
            app.notice = Some(Notice::error(format!("Error loading tasks: {e}")));
        }
        app
    }

    /// Wrap an already loaded store.
    pub fn new(store: TaskStore) -> Self {
        let mut app = App {
            state: AppState::TaskList,
            store,
            rows: Vec::new(),
            table_state: TableState::default(),
            task_form: TaskForm::new(),
            notice: None,
            status_message: String::new(),
        };
        app.rebuild_rows();
        app
    }

    /// The backing store.
    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Rows as currently displayed.
    pub fn rows(&self) -> &[TaskRow] {
        &self.rows
    }

    /// Which screen has focus.
    pub fn state(&self) -> AppState {
        self.state
    }

    /// The notice blocking input, if any.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Selected row index.
    pub fn selected(&self) -> Option<usize> {
        self.table_state.selected()
    }

    /// Select a row, or clear the selection with `None`.
    pub fn select(&mut self, index: Option<usize>) {
        self.table_state
            .select(index.filter(|&i| i < self.rows.len()));
    }

    /// Rebuild every row from the store and drop a selection that no longer points at a row.
    fn rebuild_rows(&mut self) {
        self.rows = self.store.tasks().iter().map(TaskRow::from).collect();
        if self.selected().is_some_and(|i| i >= self.rows.len()) {
            self.table_state.select(None);
        }
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    fn warn_user(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        warn!(text = %msg, "warning shown");
        self.notice = Some(Notice::warning(msg));
    }

    fn report_store_error(&mut self, e: StoreError) {
        error!(error = %e, "store operation failed");
        let message = match e {
            StoreError::IndexOutOfRange { .. } => format!("Internal error: {e}"),
            _ => format!("Error saving tasks: {e}"),
        };
        self.notice = Some(Notice::error(message));
    }

    /// Current selection, or a warning naming the attempted action.
    fn require_selection(&mut self, verb: &str) -> Option<usize> {
        let selected = self.selected();
        if selected.is_none() {
            self.warn_user(format!("Please select a task to {verb}."));
        }
        selected
    }

    /// Open an empty form.
    pub fn add_task(&mut self) {
        self.task_form = TaskForm::new();
        self.state = AppState::TaskForm;
    }

    /// Open the form pre-filled with the selected task.
    pub fn edit_selected(&mut self) {
        let Some(index) = self.require_selection("edit") else {
            return;
        };
        if let Some(task) = self.store.get(index) {
            self.task_form = TaskForm::from_task(task, index);
            self.state = AppState::TaskForm;
        }
    }

    /// Flip completion of the selected task.
    pub fn toggle_selected(&mut self) {
        let Some(index) = self.require_selection("toggle") else {
            return;
        };
        let result = self.store.toggle(index);
        self.rebuild_rows();
        match result {
            Ok(completed) => {
                info!(index, completed, "toggled task");
                self.set_status_message(format!("Task marked {}", format_status(completed)));
            }
            Err(e) => self.report_store_error(e),
        }
    }

    /// Remove the selected task and clear the selection.
    pub fn delete_selected(&mut self) {
        let Some(index) = self.require_selection("delete") else {
            return;
        };
        let result = self.store.remove(index);
        self.table_state.select(None);
        self.rebuild_rows();
        match result {
            Ok(task) => {
                info!(index, description = %task.description, "deleted task");
                self.set_status_message(format!("Deleted \"{}\"", task.description));
            }
            Err(e) => self.report_store_error(e),
        }
    }

    /// Remove every completed task.
    pub fn clear_completed(&mut self) {
        let result = self.store.remove_all_completed();
        self.table_state.select(None);
        self.rebuild_rows();
        match result {
            Ok(removed) => {
                info!(removed, "cleared completed tasks");
                self.set_status_message(format!("Cleared {removed} completed task(s)"));
            }
            Err(e) => self.report_store_error(e),
        }
    }

    /// Apply a task handed back by the form.
    fn apply_submission(&mut self, submission: FormSubmission) {
        let FormSubmission { target, task } = submission;
        let result = match target {
            FormTarget::New => self.store.append(task).map(|_| {
                let last = self.store.len().saturating_sub(1);
                info!(index = last, "added task");
                self.set_status_message("Task added");
                last
            }),
            FormTarget::Existing(index) => self.store.replace(index, task).map(|_| {
                info!(index, "updated task");
                self.set_status_message("Task updated");
                index
            }),
        };
        self.rebuild_rows();
        match result {
            Ok(index) => self.select(Some(index)),
            Err(e) => self.report_store_error(e),
        }
    }

    /// Handle keyboard input when in the task list view.
    ///
    /// Returns true if the application should quit.
    fn handle_task_list_input(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return matches!(key.code, KeyCode::Char('c' | 'q'))
                && key.modifiers.contains(KeyModifiers::CONTROL);
        }
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                if self.selected().is_some() {
                    self.table_state.select(None);
                } else {
                    return true;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => match self.selected() {
                Some(i) => self.select(Some(i.saturating_sub(1))),
                None => self.select(Some(0)),
            },
            KeyCode::Down | KeyCode::Char('j') => match self.selected() {
                Some(i) if i + 1 < self.rows.len() => self.select(Some(i + 1)),
                Some(_) => {}
                None => self.select(Some(0)),
            },
            KeyCode::Home | KeyCode::Char('g') => self.select(Some(0)),
            KeyCode::End | KeyCode::Char('G') => {
                self.select(self.rows.len().checked_sub(1));
            }
            KeyCode::Char('a') => self.add_task(),
            KeyCode::Char('e') | KeyCode::Enter => self.edit_selected(),
            KeyCode::Char('c') | KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('x') => self.clear_completed(),
            _ => {}
        }
        false
    }

    fn handle_form_input(&mut self, key: KeyEvent) {
        match self.task_form.handle_key(key) {
            FormOutcome::Pending => {}
            FormOutcome::Rejected(e) => self.warn_user(e.to_string()),
            FormOutcome::Cancelled => {
                self.state = AppState::TaskList;
                self.set_status_message("Cancelled");
            }
            FormOutcome::Submitted(submission) => {
                self.state = AppState::TaskList;
                self.apply_submission(submission);
            }
        }
    }

    /// Dispatch one key press. Returns true if the application should quit.
    ///
    /// Ctrl+C quits from the task list and from the form, but not while a
    /// notice is up.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.notice = None;
            }
            return false;
        }

        self.status_message.clear();
        match self.state {
            AppState::TaskList => self.handle_task_list_input(key),
            AppState::TaskForm => {
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    return true;
                }
                self.handle_form_input(key);
                false
            }
        }
    }

    /// Poll for and handle one keyboard event.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key));
                }
            }
        }
        Ok(false)
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let header_text = Line::from(vec![
            Span::styled("TASKMASTER", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                self.store.path().display().to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ]);
        let header = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_action_bar(&self, f: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        for (i, (key, label)) in ACTIONS.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(
                format!("[{key}]"),
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(format!(" {label}")));
        }
        let bar = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title("Actions"));
        f.render_widget(bar, area);
    }

    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let header_cells = ["Task", "Due Date", "Priority", "Status"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells)
            .style(Style::default().bg(DARK_BLUE).fg(Color::White))
            .height(1);

        let rows: Vec<Row> = self
            .rows
            .iter()
            .map(|row| {
                let style = if row.status == format_status(true) {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default().fg(Color::White)
                };
                Row::new(vec![
                    Cell::from(row.description.as_str()),
                    Cell::from(row.due_date.as_str()),
                    Cell::from(row.priority.label())
                        .style(Style::default().fg(priority_color(row.priority))),
                    Cell::from(row.status),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Min(30),    // Task
            Constraint::Length(12), // Due Date
            Constraint::Length(10), // Priority
            Constraint::Length(9),  // Status
        ];

        let done = self.store.tasks().iter().filter(|t| t.completed).count();
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Tasks ({} total, {} done)",
                self.rows.len(),
                done
            )))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_task_form(&self, f: &mut Frame, area: Rect) {
        let area = centered_rect(60, 60, area);
        f.render_widget(Clear, area);

        let block = Block::default()
            .title(self.task_form.title())
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_BLUE).fg(Color::White));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Description
                Constraint::Length(3), // Due date
                Constraint::Length(3), // Priority
                Constraint::Min(1),    // Instructions
            ])
            .split(inner);

        let field_style = |order: usize| {
            if self.task_form.current_field == order {
                Style::default().fg(GOLD)
            } else {
                Style::default()
            }
        };

        // Text fields scroll horizontally to keep the cursor inside the border.
        let text_width = |rect: Rect| usize::from(rect.width.saturating_sub(2));
        let (description_text, description_x) =
            self.task_form.description.visible_window(text_width(chunks[0]));
        let (due_text, due_x) = self.task_form.due_date.visible_window(text_width(chunks[1]));

        let description = Paragraph::new(description_text).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Task Description *")
                .border_style(field_style(DESCRIPTION_GLOBAL_ORDER)),
        );
        f.render_widget(description, chunks[0]);

        let due = Paragraph::new(due_text).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Due Date (YYYY-MM-DD)")
                .border_style(field_style(DUE_DATE_GLOBAL_ORDER)),
        );
        f.render_widget(due, chunks[1]);

        let priority = self.task_form.selected_priority();
        let selector = Paragraph::new(Line::from(vec![
            Span::raw("< "),
            Span::styled(priority.label(), Style::default().fg(priority_color(priority))),
            Span::raw(" >"),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Priority")
                .border_style(field_style(PRIORITY_GLOBAL_ORDER)),
        );
        f.render_widget(selector, chunks[2]);

        let instructions = Paragraph::new(
            "Tab/Up/Down: switch field  Left/Right: move cursor or change priority  Enter: save  Esc: cancel",
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        f.render_widget(instructions, chunks[3]);

        if self.notice.is_none() {
            let (cursor_x, rect) = match self.task_form.current_field {
                DESCRIPTION_GLOBAL_ORDER => (description_x, chunks[0]),
                DUE_DATE_GLOBAL_ORDER => (due_x, chunks[1]),
                _ => return,
            };
            let max_x = rect.width.saturating_sub(2);
            let x = u16::try_from(cursor_x).unwrap_or(max_x).min(max_x);
            f.set_cursor_position((rect.x + 1 + x, rect.y + 1));
        }
    }

    fn render_notice(&self, f: &mut Frame, area: Rect, notice: &Notice) {
        let bg = match notice.level {
            NoticeLevel::Warning => AMBER,
            NoticeLevel::Error => DARK_RED,
        };
        let block = Block::default()
            .title(notice.title())
            .borders(Borders::ALL)
            .style(Style::default().bg(bg).fg(Color::White));

        let area = centered_rect(50, 25, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                notice.message.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Press Enter to continue"),
        ];
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::TaskList => match self.selected() {
                    Some(i) => format!("Tasks: {} | Row {} selected", self.rows.len(), i + 1),
                    None => format!("Tasks: {} | Up/Down to select a task", self.rows.len()),
                },
                AppState::TaskForm => self.task_form.title().to_string(),
            }
        };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(DARK_BLUE).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Draw one frame.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Actions
                Constraint::Min(0),    // Table
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_action_bar(f, chunks[1]);
        self.render_task_list(f, chunks[2]);
        self.render_status_bar(f, chunks[3]);

        let area = f.area();
        if self.state == AppState::TaskForm {
            self.render_task_form(f, area);
        }
        if let Some(notice) = &self.notice {
            self.render_notice(f, area, notice);
        }
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
