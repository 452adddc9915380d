//! Category back-fill for previously written tables.
//!
//! Re-derives each row's Category by looking the row's id up in the tag
//! catalog and rewrites the file in place (temp + rename). Order-independent
//! and idempotent: running it twice over the same inputs yields
//! byte-identical output.

use std::path::Path;

use tracing::{info, warn};

use crate::catalog::TagCatalog;
use crate::error::AppError;
use crate::io::store;

#[derive(Debug, Clone, Copy, Default)]
pub struct BackfillSummary {
    pub files: usize,
    pub rows: usize,
    /// Rows whose key the catalog no longer knows; their Category is left
    /// empty.
    pub unknown_keys: usize,
}

pub fn backfill(
    root: &Path,
    family: &str,
    catalog: &TagCatalog,
) -> Result<BackfillSummary, AppError> {
    let mut summary = BackfillSummary::default();

    for path in store::list_family_files(root, family)? {
        let mut table = store::read_table(&path)?;
        for row in &mut table.rows {
            match catalog.category_for_item(&row.item_key) {
                Some(category) => row.category = category.to_string(),
                None => {
                    warn!(key = %row.item_key, file = %path.display(), "no category for key");
                    row.category = String::new();
                    summary.unknown_keys += 1;
                }
            }
            summary.rows += 1;
        }
        store::write_table_at(&path, &table)?;
        summary.files += 1;
        info!(file = %path.display(), rows = table.len(), "back-filled categories");
    }

    Ok(summary)
}
