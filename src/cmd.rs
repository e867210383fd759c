//! Command implementations.

use std::path::Path;

use anyhow::Context;
use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::tui::run::run_tui;

/// Launch the terminal UI on `tasks_file`.
pub fn cmd_ui(tasks_file: &Path) -> anyhow::Result<()> {
    run_tui(tasks_file).with_context(|| format!("UI error on {}", tasks_file.display()))
}

/// Print completion script for `shell` to stdout.
pub fn cmd_completions(shell: Shell) {
    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
