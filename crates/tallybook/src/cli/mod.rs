//! Command-line interface for tallybook.
//!
//! This module provides the CLI structure and command handlers for the
//! `tally` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    BreakdownCommand, CategoryCommand, ConfigCommand, ExportCommand, ImportCommand,
    OutputFormat, RecordCommand, RecordTypeArg, StatusCommand, SummaryCommand, TrendCommand,
};

/// tally - Keep track of where your money goes
///
/// Record income and expenses against your own categories, then review
/// monthly summaries, per-category breakdowns and yearly trends.
#[derive(Debug, Parser)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Use this ledger database instead of the configured one
    #[arg(long, global = true, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "plain")]
    pub format: OutputFormat,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage categories
    #[command(subcommand)]
    Category(CategoryCommand),

    /// Manage income and expense records
    #[command(subcommand)]
    Record(RecordCommand),

    /// Show income, expense and balance for a month
    Summary(SummaryCommand),

    /// Show per-category totals for a month
    Breakdown(BreakdownCommand),

    /// Show month-by-month totals for a year
    Trend(TrendCommand),

    /// Show ledger status
    Status(StatusCommand),

    /// Write the whole ledger to a JSON file
    Export(ExportCommand),

    /// Merge a previously exported JSON file into the ledger
    Import(ImportCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "tally");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(
            parse(&["tally", "-q", "status"]).verbosity(),
            crate::logging::Verbosity::Quiet
        );
        assert_eq!(
            parse(&["tally", "status"]).verbosity(),
            crate::logging::Verbosity::Normal
        );
        assert_eq!(
            parse(&["tally", "-v", "status"]).verbosity(),
            crate::logging::Verbosity::Verbose
        );
        assert_eq!(
            parse(&["tally", "-vv", "status"]).verbosity(),
            crate::logging::Verbosity::Trace
        );
    }

    #[test]
    fn test_parse_category_add() {
        let cli = parse(&["tally", "category", "add", "Food", "--type", "expense", "--icon", "🍜"]);
        match cli.command {
            Command::Category(CategoryCommand::Add {
                name,
                record_type,
                icon,
            }) => {
                assert_eq!(name, "Food");
                assert_eq!(record_type, RecordTypeArg::Expense);
                assert_eq!(icon, "🍜");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_category_reorder() {
        let cli = parse(&["tally", "category", "reorder", "3", "1", "2"]);
        assert!(matches!(
            cli.command,
            Command::Category(CategoryCommand::Reorder { ref ids }) if ids == &[3, 1, 2]
        ));
    }

    #[test]
    fn test_parse_record_add() {
        let cli = parse(&[
            "tally", "record", "add", "12.50", "--category", "4", "--date", "2024-01-15", "--note",
            "lunch",
        ]);
        match cli.command {
            Command::Record(RecordCommand::Add {
                amount,
                category,
                date,
                note,
                record_type,
            }) => {
                assert!((amount - 12.5).abs() < f64::EPSILON);
                assert_eq!(category, 4);
                assert_eq!(date.as_deref(), Some("2024-01-15"));
                assert_eq!(note, "lunch");
                assert!(record_type.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_summary_with_month() {
        let cli = parse(&["tally", "summary", "--month", "2024-03"]);
        assert!(matches!(
            cli.command,
            Command::Summary(SummaryCommand { month: Some(ref m) }) if m.to_string() == "2024-03"
        ));
    }

    #[test]
    fn test_parse_summary_rejects_bad_month() {
        let result = Cli::try_parse_from(["tally", "summary", "--month", "2024-13"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_with_config_and_database() {
        let cli = parse(&[
            "tally",
            "-c",
            "/custom/config.toml",
            "--database",
            "/tmp/ledger.db",
            "status",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/ledger.db")));
    }

    #[test]
    fn test_parse_json_format() {
        let cli = parse(&["tally", "trend", "--year", "2024", "--format", "json"]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(
            cli.command,
            Command::Trend(TrendCommand { year: Some(2024) })
        ));
    }

    #[test]
    fn test_parse_import_export() {
        let cli = parse(&["tally", "export", "ledger.json"]);
        assert!(matches!(cli.command, Command::Export(_)));
        let cli = parse(&["tally", "import", "ledger.json"]);
        assert!(matches!(cli.command, Command::Import(_)));
    }
}
