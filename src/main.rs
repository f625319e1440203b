mod cmd;
mod data;
mod picker;
mod ui;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "datepick", about = "calendar date picker")]
struct Cli {
    /// Path to the directory holding settings.yaml (default: ./config)
    #[arg(long, default_value = "./config")]
    data_dir: PathBuf,

    /// Append logs to this file (the interactive picker logs nowhere else)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the 42-cell calendar grid for a month
    Grid {
        /// Month to show (e.g. 2024-01); defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
        /// Date to mark as selected (e.g. 2024-01-05)
        #[arg(short, long)]
        selected: Option<String>,
        /// Emit the cells as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the display and value forms of a date (e.g. 2024-01-05)
    Format { date: String },
    /// Write a default settings.yaml into the data directory
    Init,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    data::persistence::set_data_dir(data_dir);

    init_logging(cli.log_file.as_deref(), cli.command.is_none())?;

    match cli.command {
        None => cmd::root::run(),
        Some(Commands::Grid {
            month,
            selected,
            json,
        }) => cmd::grid::run(month.as_deref(), selected.as_deref(), json),
        Some(Commands::Format { date }) => cmd::format::run(&date),
        Some(Commands::Init) => cmd::init::run(),
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the default `info` level.
/// The interactive picker owns the terminal, so without a log file it stays silent.
fn init_logging(log_file: Option<&Path>, interactive: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if !interactive => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults_to_interactive() {
        let cli = Cli::try_parse_from(["datepick"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.data_dir, PathBuf::from("./config"));
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn test_cli_parses_grid_options() {
        let cli =
            Cli::try_parse_from(["datepick", "grid", "-m", "2024-01", "--selected", "2024-01-05", "--json"])
                .unwrap();
        match cli.command {
            Some(Commands::Grid {
                month,
                selected,
                json,
            }) => {
                assert_eq!(month.as_deref(), Some("2024-01"));
                assert_eq!(selected.as_deref(), Some("2024-01-05"));
                assert!(json);
            }
            _ => panic!("expected grid command"),
        }
    }

    #[test]
    fn test_cli_format_requires_date() {
        assert!(Cli::try_parse_from(["datepick", "format"]).is_err());
    }
}
