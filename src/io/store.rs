//! Persisted price tables.
//!
//! One CSV file per (tag-group family, calendar date), stored under a
//! directory named after the family:
//!
//! `<root>/<family>/<family>_<MMDDYYYY>.csv`
//!
//! Writes go to a temp file in the target directory followed by a rename,
//! so a failed write never corrupts a previously written file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::domain::{DATE_COLUMN_FORMAT, DATE_STAMP_FORMAT, PriceRow, PriceTable};
use crate::error::AppError;

pub fn family_dir(root: &Path, family: &str) -> PathBuf {
    root.join(family)
}

/// Path of the table for one (family, date) key.
pub fn dataset_path(root: &Path, family: &str, date: NaiveDate) -> PathBuf {
    family_dir(root, family).join(format!("{family}_{}.csv", date.format(DATE_STAMP_FORMAT)))
}

/// Keyed existence check backing the skip-if-fresh guard.
pub fn is_fresh(root: &Path, family: &str, date: NaiveDate) -> bool {
    dataset_path(root, family, date).is_file()
}

/// Write a run's table to its dated file, creating the family directory as
/// needed. Returns the final path.
pub fn write_table(
    root: &Path,
    family: &str,
    date: NaiveDate,
    table: &PriceTable,
) -> Result<PathBuf, AppError> {
    let dir = family_dir(root, family);
    fs::create_dir_all(&dir)
        .map_err(|e| AppError::Persistence(format!("Failed to create '{}': {e}", dir.display())))?;
    let path = dataset_path(root, family, date);
    write_table_at(&path, table)?;
    Ok(path)
}

/// Write a table to an explicit path via temp file + rename.
pub fn write_table_at(path: &Path, table: &PriceTable) -> Result<(), AppError> {
    let dir = path.parent().ok_or_else(|| {
        AppError::Persistence(format!("'{}' has no parent directory.", path.display()))
    })?;
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return Err(AppError::Persistence(format!(
            "'{}' has no usable file name.",
            path.display()
        )));
    };
    let tmp = dir.join(format!(".{file_name}.tmp"));

    let mut writer = csv::Writer::from_path(&tmp)
        .map_err(|e| AppError::Persistence(format!("Failed to create '{}': {e}", tmp.display())))?;

    writer
        .write_record(PriceTable::COLUMNS)
        .map_err(|e| AppError::Persistence(format!("Failed to write CSV header: {e}")))?;

    for row in &table.rows {
        let price = row.price.to_string();
        let date = row.date.format(DATE_COLUMN_FORMAT).to_string();
        writer
            .write_record([
                row.item_key.as_str(),
                row.name.as_str(),
                row.weight_unit.as_deref().unwrap_or(""),
                price.as_str(),
                row.category.as_str(),
                row.source.as_str(),
                date.as_str(),
            ])
            .map_err(|e| AppError::Persistence(format!("Failed to write CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::Persistence(format!("Failed to flush '{}': {e}", tmp.display())))?;
    drop(writer);

    fs::rename(&tmp, path).map_err(|e| {
        AppError::Persistence(format!(
            "Failed to move '{}' into place: {e}",
            tmp.display()
        ))
    })
}

/// Read a persisted table, validating the canonical column set.
pub fn read_table(path: &Path) -> Result<PriceTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| AppError::Persistence(format!("Failed to open '{}': {e}", path.display())))?;

    let headers = reader
        .headers()
        .map_err(|e| AppError::Persistence(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h, i))
        .collect();
    for column in PriceTable::COLUMNS {
        if !index.contains_key(column) {
            return Err(AppError::Persistence(format!(
                "'{}' is missing column '{column}'.",
                path.display()
            )));
        }
    }

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let record = result.map_err(|e| {
            AppError::Persistence(format!(
                "CSV parse error in '{}' line {line}: {e}",
                path.display()
            ))
        })?;
        let field = |column: &str| record.get(index[column]).unwrap_or("").to_string();

        let price: f64 = field("price").parse().map_err(|e| {
            AppError::Persistence(format!(
                "Invalid price in '{}' line {line}: {e}",
                path.display()
            ))
        })?;
        let date = NaiveDate::parse_from_str(&field("Date"), DATE_COLUMN_FORMAT).map_err(|e| {
            AppError::Persistence(format!(
                "Invalid date in '{}' line {line}: {e}",
                path.display()
            ))
        })?;
        let weight = field("weight_unit");

        rows.push(PriceRow {
            item_key: field("id"),
            name: field("name"),
            weight_unit: (!weight.is_empty()).then_some(weight),
            price,
            category: field("Category"),
            source: field("Source"),
            date,
        });
    }

    Ok(PriceTable { rows })
}

/// All persisted files for one family, sorted by file name (and therefore by
/// nothing semantically meaningful; callers that care about dates read them
/// from the rows).
pub fn list_family_files(root: &Path, family: &str) -> Result<Vec<PathBuf>, AppError> {
    let dir = family_dir(root, family);
    let entries = fs::read_dir(&dir)
        .map_err(|e| AppError::Persistence(format!("Failed to read '{}': {e}", dir.display())))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| AppError::Persistence(format!("Failed to read '{}': {e}", dir.display())))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("csv") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Family directories under the data root, sorted by name.
pub fn list_families(root: &Path) -> Result<Vec<String>, AppError> {
    let entries = fs::read_dir(root)
        .map_err(|e| AppError::Persistence(format!("Failed to read '{}': {e}", root.display())))?;

    let mut families = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| AppError::Persistence(format!("Failed to read '{}': {e}", root.display())))?;
        if entry.path().is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                families.push(name.to_string());
            }
        }
    }
    families.sort();
    Ok(families)
}
