//! TUI entry point and terminal setup.

use std::{io, path::Path};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};
use tracing::info;

use crate::tui::app::App;

/// Initialise the terminal, run the task list UI on `tasks_file`, and restore
/// the terminal afterwards even if the event loop failed.
pub fn run_tui(tasks_file: &Path) -> io::Result<()> {
    let mut app = App::open(tasks_file);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        restore_terminal();
        return Err(e);
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(terminal) => terminal,
        Err(e) => {
            restore_terminal();
            return Err(e);
        }
    };

    info!(path = %tasks_file.display(), "ui started");
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("ui closed");
    result
}

/// Best-effort undo of raw mode and the alternate screen after a failed setup.
fn restore_terminal() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    let _ = disable_raw_mode();
}
