//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging
//! - parses CLI arguments
//! - wires config + catalog + vendor clients into the scrape pipeline
//! - runs back-fills and history queries

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::catalog::TagCatalog;
use crate::cli::{BackfillArgs, Cli, Command, HistoryArgs, ScrapeArgs};
use crate::config::Config;
use crate::data::{FeedClient, StorefrontClient, VendorClient};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `basket` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::Scrape(args) => handle_scrape(args),
        Command::Backfill(args) => handle_backfill(args),
        Command::History(args) => handle_history(args),
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "basket_prices=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn handle_scrape(args: ScrapeArgs) -> Result<(), AppError> {
    let config = Config::load(args.config.as_deref())?;
    let catalog = TagCatalog::load(&config.catalog)?;

    // One value for the whole invocation: rows from one run must share a
    // date even if the run crosses midnight.
    let run_date = chrono::Local::now().date_naive();

    let groups: Vec<String> = if args.all {
        config.tag_groups().into_iter().map(str::to_string).collect()
    } else {
        match &args.group {
            Some(group) => vec![group.clone()],
            None => {
                return Err(AppError::Usage(
                    "Pass --group <TagGroup> or --all.".to_string(),
                ));
            }
        }
    };

    for group in &groups {
        let client = build_client(&config, group)?;
        let outcome = pipeline::scrape_to_store(
            &catalog,
            group,
            client.as_ref(),
            &args.data_dir,
            run_date,
            args.force,
        )?;
        match outcome {
            pipeline::ScrapeOutcome::AlreadyFresh => {
                println!("{group}: already fetched today");
            }
            pipeline::ScrapeOutcome::Written {
                path,
                rows,
                skipped,
            } => {
                println!(
                    "{group}: {rows} rows -> {} ({skipped} skipped)",
                    path.display()
                );
            }
        }
    }

    Ok(())
}

fn build_client(config: &Config, tag_group: &str) -> Result<Box<dyn VendorClient>, AppError> {
    if tag_group == config.storefront.tag_group {
        return Ok(Box::new(StorefrontClient::new(config.storefront.clone())?));
    }
    if tag_group == config.feed.tag_group {
        return Ok(Box::new(FeedClient::new(config.feed.clone())?));
    }
    Err(AppError::Usage(format!(
        "No vendor is configured for tag group '{tag_group}'."
    )))
}

fn handle_backfill(args: BackfillArgs) -> Result<(), AppError> {
    let config = Config::load(args.config.as_deref())?;
    let catalog = TagCatalog::load(&config.catalog)?;

    let summary = crate::io::backfill::backfill(&args.data_dir, &args.group, &catalog)?;
    println!(
        "{}: {} files, {} rows re-categorized ({} unknown keys)",
        args.group, summary.files, summary.rows, summary.unknown_keys
    );
    Ok(())
}

fn handle_history(args: HistoryArgs) -> Result<(), AppError> {
    let points = crate::report::history::load_history(&args.data_dir)?;
    let filter = crate::report::history::HistoryFilter {
        product: args.product,
        source: args.source,
        from: args.from,
        to: args.to,
    };
    let filtered = crate::report::history::filter_history(&points, &filter);
    print!("{}", crate::report::history::format_history(&filtered));
    Ok(())
}
