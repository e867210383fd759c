//! # TaskMaster
//!
//! A small keyboard-driven task list manager with a terminal user interface.
//!
//! Each task has a description, an optional due date (`YYYY-MM-DD`), a priority
//! (High, Medium or Low) and a completion flag. The whole list is stored in a
//! single JSON file that is rewritten after every change.
//!
//! ## Quick Start
//!
//! ```bash
//! # Open ./tasks.json
//! taskmaster
//!
//! # Use another file
//! taskmaster --file ~/notes/tasks.json
//!
//! # Shell completions
//! taskmaster completions zsh
//! ```
//!
//! ## Keys
//!
//! - `a` add, `e`/`Enter` edit, `c`/`Space` toggle complete, `d`/`Del` delete,
//!   `x` clear completed, `q` quit
//! - `Up`/`Down` (or `k`/`j`) select a row, `Esc` clears the selection
//! - In the form: `Tab` switches field, `Left`/`Right` changes priority,
//!   `Enter` saves, `Esc` cancels
//!
//! Log output goes to `<tmp>/taskmaster/taskmaster.log` unless `--no-log` is given.

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod error;
pub mod fields;
pub mod logging;
pub mod store;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::{Cli, Commands};
use cmd::*;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            cmd_completions(shell);
            Ok(())
        }
        Some(Commands::Ui) | None => {
            if !cli.no_log {
                let dir = cli.log_dir.clone().unwrap_or_else(logging::default_log_dir);
                // Logging failures are not fatal.
                if let Err(e) = logging::init_tracing(&dir, &cli.log_level) {
                    eprintln!("Logging disabled: {e}");
                }
            }
            tracing::info!(file = %cli.file.display(), "starting taskmaster");
            cmd_ui(&cli.file)
        }
    }
}
