//! Command-line parsing for the grocery price tracker.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the pipeline/persistence code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::DATE_COLUMN_FORMAT;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "basket", version, about = "Grocery price scraping and history")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape today's prices for one tag group (or all configured groups).
    Scrape(ScrapeArgs),
    /// Re-derive the Category column of previously written files.
    Backfill(BackfillArgs),
    /// Print price history from the persisted dataset.
    History(HistoryArgs),
}

/// Options for a scrape run.
#[derive(Debug, Parser, Clone)]
pub struct ScrapeArgs {
    /// Tag group to scrape (e.g. Seoudi_tags).
    #[arg(short = 'g', long, conflicts_with = "all")]
    pub group: Option<String>,

    /// Scrape every tag group with a configured vendor.
    #[arg(long)]
    pub all: bool,

    /// Config file path (default: $BASKET_CONFIG, then ./config.toml).
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Root directory for persisted tables.
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Fetch even if today's file already exists.
    #[arg(long)]
    pub force: bool,
}

/// Options for the category back-fill.
#[derive(Debug, Parser, Clone)]
pub struct BackfillArgs {
    /// Tag-group family whose files to back-fill.
    #[arg(short = 'g', long)]
    pub group: String,

    /// Config file path (default: $BASKET_CONFIG, then ./config.toml).
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Root directory for persisted tables.
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,
}

/// Options for a history query.
#[derive(Debug, Parser, Clone)]
pub struct HistoryArgs {
    /// Product display name (e.g. "Al Doha Sugar 1 Kg_KG").
    #[arg(short = 'p', long)]
    pub product: Option<String>,

    /// Source tag group.
    #[arg(short = 's', long)]
    pub source: Option<String>,

    /// Earliest date, MM/DD/YYYY.
    #[arg(long, value_parser = parse_date)]
    pub from: Option<NaiveDate>,

    /// Latest date, MM/DD/YYYY.
    #[arg(long, value_parser = parse_date)]
    pub to: Option<NaiveDate>,

    /// Root directory for persisted tables.
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, DATE_COLUMN_FORMAT)
        .map_err(|e| format!("expected MM/DD/YYYY: {e}"))
}
