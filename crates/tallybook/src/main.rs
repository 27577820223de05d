//! `tally` - CLI for tallybook
//!
//! This binary provides the command-line interface for recording income and
//! expenses and reviewing the resulting statistics.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::Parser;
use serde::Serialize;

use tallybook::cli::{CategoryCommand, Cli, Command, ConfigCommand, OutputFormat, RecordCommand};
use tallybook::model::period::parse_date;
use tallybook::model::CategoryStat;
use tallybook::{
    init_logging, Category, CategoryService, Config, ExportBundle, Month, NewRecord, Record,
    RecordService, RecordType, RecordUpdate, Storage, TransferService,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Configuration commands must work even when the ledger can't be opened
    if let Command::Config(config_cmd) = cli.command {
        return handle_config(cli.config, cli.format, config_cmd);
    }

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;
    let db_path = cli.database.clone().unwrap_or_else(|| config.database_path());
    let storage = Storage::open(&db_path)
        .with_context(|| format!("failed to open ledger at {}", db_path.display()))?;

    let out = Output { format: cli.format };
    match cli.command {
        Command::Category(cmd) => handle_category(&storage, &out, cmd),
        Command::Record(cmd) => handle_record(&storage, &config, &out, cmd),
        Command::Summary(cmd) => {
            let month = cmd.month.unwrap_or_else(Month::current);
            let summary = RecordService::new(&storage).month_summary(month)?;
            out.emit(&summary, || {
                println!("Summary for {month}");
                println!("------------------");
                println!("Income:   {:>12.2}", summary.total_income);
                println!("Expense:  {:>12.2}", summary.total_expense);
                println!("Balance:  {:>12.2}", summary.balance);
            })
        }
        Command::Breakdown(cmd) => {
            let month = cmd.month.unwrap_or_else(Month::current);
            let report = RecordService::new(&storage).category_stats(month)?;
            out.emit(&report, || {
                println!("Breakdown for {month}");
                print_stats("Income", &report.income_stats);
                print_stats("Expense", &report.expense_stats);
            })
        }
        Command::Trend(cmd) => {
            let year = cmd.year.unwrap_or_else(|| Local::now().year());
            let trend = RecordService::new(&storage).trend(year)?;
            out.emit(&trend, || {
                println!("{:<8} {:>12} {:>12}", "Month", "Income", "Expense");
                for month in &trend {
                    println!(
                        "{:<8} {:>12.2} {:>12.2}",
                        month.month, month.income, month.expense
                    );
                }
            })
        }
        Command::Status(_) => {
            let stats = storage.stats()?;
            out.emit(&stats, || {
                println!("tally status");
                println!("------------");
                println!("Database:      {}", storage.path().display());
                println!("Categories:    {}", stats.total_categories);
                println!("Records:       {}", stats.total_records);
                if let (Some(first), Some(last)) = (stats.first_record_date, stats.last_record_date)
                {
                    println!("Date range:    {first} .. {last}");
                }
                println!("Size:          {} bytes", stats.db_size_bytes);
            })
        }
        Command::Export(cmd) => {
            let bundle = TransferService::new(&storage).export()?;
            let json = serde_json::to_string_pretty(&bundle)?;
            std::fs::write(&cmd.file, json)
                .with_context(|| format!("failed to write {}", cmd.file.display()))?;
            println!(
                "Exported {} categories and {} records to {}",
                bundle.categories.len(),
                bundle.records.len(),
                cmd.file.display()
            );
            Ok(())
        }
        Command::Import(cmd) => {
            let text = std::fs::read_to_string(&cmd.file)
                .with_context(|| format!("failed to read {}", cmd.file.display()))?;
            let bundle: ExportBundle = serde_json::from_str(&text)
                .with_context(|| format!("{} is not a tally export", cmd.file.display()))?;
            let report = TransferService::new(&storage)
                .with_default_icon(config.import.default_icon.clone())
                .import(&bundle)?;
            out.emit(&report, || {
                println!(
                    "Imported {} records ({} skipped); {} categories created, {} merged",
                    report.records_imported,
                    report.records_skipped,
                    report.categories_created,
                    report.categories_merged
                );
            })
        }
        Command::Config(_) => Ok(()),
    }
}

/// Renders a value either as JSON or through a plain-text printer.
#[derive(Debug, Clone, Copy)]
struct Output {
    format: OutputFormat,
}

impl Output {
    fn emit<T: Serialize>(&self, value: &T, plain: impl FnOnce()) -> Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Plain => plain(),
        }
        Ok(())
    }
}

fn handle_category(storage: &Storage, out: &Output, cmd: CategoryCommand) -> Result<()> {
    let service = CategoryService::new(storage);
    match cmd {
        CategoryCommand::List { record_type } => {
            let categories = service.list(record_type.map(RecordType::from))?;
            out.emit(&categories, || {
                for category in &categories {
                    print_category(category);
                }
            })
        }
        CategoryCommand::Add {
            name,
            record_type,
            icon,
        } => {
            let category = service.create(&name, &icon, record_type.into())?;
            out.emit(&category, || print_category(&category))
        }
        CategoryCommand::Edit { id, name, icon } => {
            let current = service.get(id)?;
            let category = service.update(
                id,
                name.as_deref().unwrap_or(&current.name),
                icon.as_deref().unwrap_or(&current.icon),
            )?;
            out.emit(&category, || print_category(&category))
        }
        CategoryCommand::Delete { id } => {
            service.delete(id)?;
            println!("Deleted category {id}");
            Ok(())
        }
        CategoryCommand::Reorder { ids } => {
            service.reorder(&ids)?;
            println!("Reordered {} categories", ids.len());
            Ok(())
        }
    }
}

fn handle_record(
    storage: &Storage,
    config: &Config,
    out: &Output,
    cmd: RecordCommand,
) -> Result<()> {
    let service = RecordService::new(storage);
    match cmd {
        RecordCommand::Add {
            amount,
            category,
            record_type,
            date,
            note,
        } => {
            let record_type = match record_type {
                Some(arg) => arg.into(),
                None => CategoryService::new(storage).get(category)?.record_type,
            };
            let date = match date {
                Some(input) => parse_date(&input)?,
                None => Local::now().date_naive(),
            };
            let record = service.create(NewRecord {
                amount,
                record_type,
                category_id: category,
                note,
                date,
            })?;
            out.emit(&record, || print_record(&record))
        }
        RecordCommand::Edit {
            id,
            amount,
            category,
            date,
            note,
        } => {
            let current = service.get(id)?;
            let date = match date {
                Some(input) => parse_date(&input)?,
                None => current.date,
            };
            let record = service.update(
                id,
                RecordUpdate {
                    amount: amount.unwrap_or(current.amount),
                    category_id: category.unwrap_or(current.category_id),
                    note: note.unwrap_or(current.note),
                    date,
                },
            )?;
            out.emit(&record, || print_record(&record))
        }
        RecordCommand::Delete { id } => {
            service.delete(id)?;
            println!("Deleted record {id}");
            Ok(())
        }
        RecordCommand::Show { id } => {
            let record = service.get(id)?;
            out.emit(&record, || print_record(&record))
        }
        RecordCommand::List { month } => {
            let month = month.unwrap_or_else(Month::current);
            let records = service.list_by_month(month)?;
            out.emit(&records, || {
                if records.is_empty() {
                    println!("No records in {month}");
                }
                for record in &records {
                    print_record(record);
                }
            })
        }
        RecordCommand::Recent { limit } => {
            let records = service.recent(limit.unwrap_or(config.records.recent_limit))?;
            out.emit(&records, || {
                for record in &records {
                    print_record(record);
                }
            })
        }
    }
}

fn handle_config(
    config_path: Option<PathBuf>,
    format: OutputFormat,
    cmd: ConfigCommand,
) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let config = Config::load_from(config_path)?;
            Output { format }.emit(&config, || {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Records]");
                println!("  Recent limit:       {}", config.records.recent_limit);
                println!();
                println!("[Import]");
                println!("  Default icon:       {}", config.import.default_icon);
            })?;
        }
        ConfigCommand::Path => {
            println!(
                "{}",
                config_path
                    .unwrap_or_else(Config::default_config_path)
                    .display()
            );
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn print_category(category: &Category) {
    println!(
        "{:>4}  {:<8} {} {}",
        category.id, category.record_type, category.icon, category.name
    );
}

fn print_record(record: &Record) {
    let sign = match record.record_type {
        RecordType::Income => '+',
        RecordType::Expense => '-',
    };
    let category = record
        .category
        .as_ref()
        .map_or_else(|| "?".to_string(), |c| format!("{} {}", c.icon, c.name));
    println!(
        "{:>4}  {}  {sign}{:>10.2}  {category}  {}",
        record.id, record.date, record.amount, record.note
    );
}

fn print_stats(label: &str, stats: &[CategoryStat]) {
    println!();
    println!("[{label}]");
    if stats.is_empty() {
        println!("  (none)");
    }
    for stat in stats {
        println!(
            "  {:>10.2}  {:>5.1}%  {} {}",
            stat.amount, stat.percentage, stat.category_icon, stat.category_name
        );
    }
}
