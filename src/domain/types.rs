//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - accumulated in-memory during a scrape run
//! - written to and re-read from dated CSV files
//! - reshaped later for history queries

use chrono::NaiveDate;

/// Format of the `Date` column in persisted tables (`MM/DD/YYYY`).
pub const DATE_COLUMN_FORMAT: &str = "%m/%d/%Y";

/// Format of the date stamp embedded in persisted file names (`MMDDYYYY`).
pub const DATE_STAMP_FORMAT: &str = "%m%d%Y";

/// One product as extracted from a vendor response, before the pipeline
/// stamps it with category/source/date.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    /// Vendor key for the product. For the storefront shape this is the
    /// product slug; for the feed shape it is the numeric product id.
    pub item_key: String,
    pub name: String,
    /// Unit of measure, when the vendor reports one (e.g. "KG", "700 ml").
    pub weight_unit: Option<String>,
    pub price: f64,
}

/// One fully stamped row of a persisted price table.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub item_key: String,
    pub name: String,
    pub weight_unit: Option<String>,
    pub price: f64,
    pub category: String,
    /// Tag-group label of the vendor that produced this row.
    pub source: String,
    /// Run date. Every row from one run carries the same value.
    pub date: NaiveDate,
}

impl PriceRow {
    pub fn from_record(record: ProductRecord, category: &str, source: &str, date: NaiveDate) -> Self {
        Self {
            item_key: record.item_key,
            name: record.name,
            weight_unit: record.weight_unit,
            price: record.price,
            category: category.to_string(),
            source: source.to_string(),
            date,
        }
    }

    /// Display name used by history queries: the product name, suffixed with
    /// the unit of measure when one is present.
    pub fn product_name(&self) -> String {
        match &self.weight_unit {
            Some(unit) => format!("{}_{unit}", self.name),
            None => self.name.clone(),
        }
    }
}

/// All rows produced by one scrape run for one tag-group family, in catalog
/// traversal order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    pub rows: Vec<PriceRow>,
}

impl PriceTable {
    /// Canonical column set shared by both vendor shapes. Persisted files
    /// carry exactly these columns, in this order.
    pub const COLUMNS: [&'static str; 7] = [
        "id",
        "name",
        "weight_unit",
        "price",
        "Category",
        "Source",
        "Date",
    ];

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// An identifier the pipeline failed to process, with the reason.
#[derive(Debug, Clone)]
pub struct SkippedItem {
    pub item: String,
    pub category: String,
    pub message: String,
}
