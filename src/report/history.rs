//! Price-history queries over the persisted dataset.
//!
//! Every persisted table, across all families, is reshaped into one unified
//! series keyed by (Date, Product_Name, Price, Source, Category) — the
//! column set dashboard consumers rely on. `Product_Name` is the product
//! name suffixed with the unit of measure when one is present.

use std::path::Path;

use chrono::NaiveDate;

use crate::domain::DATE_COLUMN_FORMAT;
use crate::error::AppError;
use crate::io::store;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub product_name: String,
    pub price: f64,
    pub source: String,
    pub category: String,
}

/// Filters for a history query. `None` means "any".
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub product: Option<String>,
    pub source: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl HistoryFilter {
    fn matches(&self, point: &HistoryPoint) -> bool {
        if let Some(product) = &self.product {
            if &point.product_name != product {
                return false;
            }
        }
        if let Some(source) = &self.source {
            if &point.source != source {
                return false;
            }
        }
        if let Some(from) = self.from {
            if point.date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if point.date > to {
                return false;
            }
        }
        true
    }
}

/// Load every persisted table under `root` into one series, sorted by date
/// then product name.
pub fn load_history(root: &Path) -> Result<Vec<HistoryPoint>, AppError> {
    let mut points = Vec::new();
    for family in store::list_families(root)? {
        for path in store::list_family_files(root, &family)? {
            let table = store::read_table(&path)?;
            for row in table.rows {
                let product_name = row.product_name();
                points.push(HistoryPoint {
                    date: row.date,
                    product_name,
                    price: row.price,
                    source: row.source,
                    category: row.category,
                });
            }
        }
    }
    points.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.product_name.cmp(&b.product_name))
    });
    Ok(points)
}

pub fn filter_history(points: &[HistoryPoint], filter: &HistoryFilter) -> Vec<HistoryPoint> {
    points.iter().filter(|p| filter.matches(p)).cloned().collect()
}

/// Format a history table for the terminal.
pub fn format_history(points: &[HistoryPoint]) -> String {
    let mut out = String::new();

    if points.is_empty() {
        out.push_str("No data available for the selected filters.\n");
        return out;
    }

    out.push_str(&format!(
        "{:<10} | {:>10} | {:<16} | {:<14} | Product\n",
        "Date", "Price", "Source", "Category"
    ));
    out.push_str(&format!("{}\n", "-".repeat(78)));
    for p in points {
        out.push_str(&format!(
            "{:<10} | {:>10.2} | {:<16} | {:<14} | {}\n",
            p.date.format(DATE_COLUMN_FORMAT),
            p.price,
            p.source,
            p.category,
            p.product_name
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::{PriceRow, PriceTable};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(name: &str, unit: Option<&str>, price: f64, source: &str, date: NaiveDate) -> PriceRow {
        PriceRow {
            item_key: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            weight_unit: unit.map(str::to_string),
            price,
            category: "Essentials".to_string(),
            source: source.to_string(),
            date,
        }
    }

    fn seed(root: &Path) {
        let d1 = date(2025, 9, 19);
        let d2 = date(2025, 9, 20);
        store::write_table(
            root,
            "Seoudi_tags",
            d1,
            &PriceTable {
                rows: vec![row("Sugar", Some("KG"), 38.5, "Seoudi_tags", d1)],
            },
        )
        .unwrap();
        store::write_table(
            root,
            "Seoudi_tags",
            d2,
            &PriceTable {
                rows: vec![row("Sugar", Some("KG"), 39.0, "Seoudi_tags", d2)],
            },
        )
        .unwrap();
        store::write_table(
            root,
            "Carrefour_tags",
            d2,
            &PriceTable {
                rows: vec![row("Eggs", None, 92.0, "Carrefour_tags", d2)],
            },
        )
        .unwrap();
    }

    #[test]
    fn history_unifies_all_families_sorted_by_date() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());

        let points = load_history(dir.path()).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].product_name, "Sugar_KG");
        assert_eq!(points[0].date, date(2025, 9, 19));
        // Same date: sorted by product name.
        assert_eq!(points[1].product_name, "Eggs");
        assert_eq!(points[2].product_name, "Sugar_KG");
    }

    #[test]
    fn filters_narrow_by_product_source_and_range() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        let points = load_history(dir.path()).unwrap();

        let by_product = filter_history(
            &points,
            &HistoryFilter {
                product: Some("Sugar_KG".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(by_product.len(), 2);

        let by_source = filter_history(
            &points,
            &HistoryFilter {
                source: Some("Carrefour_tags".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(by_source.len(), 1);

        let by_range = filter_history(
            &points,
            &HistoryFilter {
                from: Some(date(2025, 9, 20)),
                to: Some(date(2025, 9, 20)),
                ..Default::default()
            },
        );
        assert_eq!(by_range.len(), 2);
    }

    #[test]
    fn empty_result_formats_a_friendly_message() {
        let formatted = format_history(&[]);
        assert!(formatted.contains("No data available"));
    }

    #[test]
    fn formatted_table_lists_each_point() {
        let points = vec![HistoryPoint {
            date: date(2025, 9, 20),
            product_name: "Sugar_KG".to_string(),
            price: 38.5,
            source: "Seoudi_tags".to_string(),
            category: "Essentials".to_string(),
        }];
        let formatted = format_history(&points);
        assert!(formatted.contains("09/20/2025"));
        assert!(formatted.contains("Sugar_KG"));
        assert!(formatted.contains("38.50"));
    }
}
