use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::store::DEFAULT_TASKS_FILE;

/// Keyboard-driven task list manager.
/// Tasks live in ./tasks.json unless --file (or TASKMASTER_FILE) points elsewhere.
#[derive(Parser, Debug)]
#[command(name = "taskmaster", version, about = "Task list manager with a terminal UI")]
pub struct Cli {
    /// Path to the JSON task file.
    #[arg(long, short, global = true, env = "TASKMASTER_FILE", default_value = DEFAULT_TASKS_FILE)]
    pub file: PathBuf,

    /// Directory for the log file (defaults to <tmp>/taskmaster).
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Disable file logging.
    #[arg(long, global = true)]
    pub no_log: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the task list (default when no subcommand is given).
    Ui,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_file_flag_and_defaults_to_ui() {
        let cli = Cli::try_parse_from(["taskmaster", "--file", "tasks.json"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("tasks.json"));
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level, "info");
        assert!(!cli.no_log);
    }

    #[test]
    fn test_parses_completions_subcommand() {
        let cli = Cli::try_parse_from(["taskmaster", "completions", "bash"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Completions { shell: Shell::Bash })));
    }
}
