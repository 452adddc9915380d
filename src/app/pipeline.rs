//! Shared scrape pipeline logic used by the CLI front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! catalog traversal -> vendor fetch -> normalize -> stamp -> concat -> store
//!
//! Failures are isolated per identifier: a failed fetch or an unrecognized
//! payload becomes a `SkippedItem`, never an aborted run. Only a missing
//! catalog entry or a persistence failure aborts.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::catalog::TagCatalog;
use crate::data::VendorClient;
use crate::domain::{PriceRow, PriceTable, ProductRecord, SkippedItem};
use crate::error::AppError;
use crate::io::store;
use crate::normalize;

/// All computed outputs of a single scrape run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub table: PriceTable,
    pub skipped: Vec<SkippedItem>,
}

/// Result of a guarded scrape-and-store invocation.
#[derive(Debug, Clone)]
pub enum ScrapeOutcome {
    /// Today's file already exists; no network calls were made.
    AlreadyFresh,
    Written {
        path: PathBuf,
        rows: usize,
        skipped: usize,
    },
}

/// Execute one scrape run: every identifier of every catalog entry matching
/// `tag_group`, fetched through `client`, stamped with the entry's category,
/// the tag group as source, and `run_date`.
///
/// `run_date` is computed once by the caller, so every row of one run
/// carries the same date even if the run spans a day boundary.
///
/// Fetches run on a worker pool; the ordered collect keeps row order equal
/// to catalog traversal order.
pub fn run_scrape(
    catalog: &TagCatalog,
    tag_group: &str,
    client: &dyn VendorClient,
    run_date: NaiveDate,
) -> Result<RunOutput, AppError> {
    let selections = catalog.selections_for(tag_group);
    if selections.is_empty() {
        return Err(AppError::Usage(format!(
            "Tag group '{tag_group}' is not present in the catalog."
        )));
    }

    let work: Vec<(&str, &str)> = selections
        .iter()
        .flat_map(|s| s.items.iter().map(|item| (s.category, item.as_str())))
        .collect();

    info!(tag_group, items = work.len(), "scrape run started");

    let results: Vec<Result<Vec<ProductRecord>, AppError>> = work
        .par_iter()
        .map(|&(_, item)| fetch_one(client, item))
        .collect();

    let mut table = PriceTable::default();
    let mut skipped = Vec::new();
    for (&(category, item), result) in work.iter().zip(results) {
        match result {
            Ok(records) => {
                for record in records {
                    table
                        .rows
                        .push(PriceRow::from_record(record, category, tag_group, run_date));
                }
            }
            Err(err) => {
                warn!(item, error = %err, "skipping identifier");
                skipped.push(SkippedItem {
                    item: item.to_string(),
                    category: category.to_string(),
                    message: err.to_string(),
                });
            }
        }
    }

    info!(
        tag_group,
        rows = table.len(),
        skipped = skipped.len(),
        "scrape run finished"
    );

    Ok(RunOutput { table, skipped })
}

/// Skip-if-fresh guard + scrape + persist for one tag-group family.
///
/// A run that produces zero rows writes no file and fails with `EmptyRun`.
pub fn scrape_to_store(
    catalog: &TagCatalog,
    tag_group: &str,
    client: &dyn VendorClient,
    root: &Path,
    run_date: NaiveDate,
    force: bool,
) -> Result<ScrapeOutcome, AppError> {
    if !force && store::is_fresh(root, tag_group, run_date) {
        info!(tag_group, date = %run_date, "data is up to date; skipping fetch");
        return Ok(ScrapeOutcome::AlreadyFresh);
    }

    let run = run_scrape(catalog, tag_group, client, run_date)?;
    if run.table.is_empty() {
        return Err(AppError::EmptyRun(format!(
            "No rows produced for '{tag_group}' ({} identifiers failed).",
            run.skipped.len()
        )));
    }

    let path = store::write_table(root, tag_group, run_date, &run.table)?;
    Ok(ScrapeOutcome::Written {
        path,
        rows: run.table.len(),
        skipped: run.skipped.len(),
    })
}

fn fetch_one(client: &dyn VendorClient, item: &str) -> Result<Vec<ProductRecord>, AppError> {
    let raw = client.fetch(item)?;
    normalize::normalize(&raw, item)
}
