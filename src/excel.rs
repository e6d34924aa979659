use crate::error::{Error, Result};
use crate::types::InventoryRecord;
use calamine::{open_workbook_auto, Data, DataType, Reader};
use std::path::Path;
use tracing::warn;

/// Required inventory columns, by exact header text. Extra columns are
/// ignored; a missing one fails the upload.
const REQUIRED_COLUMNS: [&str; 5] = [
    "Department",
    "Merchandise Category",
    "Article Description",
    "Article",
    "Inventory",
];

/// How many columns of each sheet are scanned for DNO candidates.
const DNO_SCAN_COLUMNS: usize = 10;

/// Normalize one cell into an article identifier. Numeric-like values become
/// the canonical integer string (fractional part truncated, so a float-typed
/// cell `1001.0` and the text `"1001.0"` both yield `"1001"`); anything else
/// passes through trimmed. Empty and blank cells yield `None`.
pub fn normalize_cell(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(((*f).trunc() as i64).to_string()),
        Data::String(s) => normalize_text(s),
        other => {
            let text = other.to_string();
            normalize_text(&text)
        }
    }
}

fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(i.to_string());
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if f.is_finite() {
            return Some((f.trunc() as i64).to_string());
        }
    }
    Some(trimmed.to_string())
}

fn cell_to_count(cell: &Data) -> Option<i64> {
    match cell {
        Data::Int(i) => Some(*i),
        Data::Float(f) => Some(f.trunc() as i64),
        Data::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

/// Parse an inventory workbook into raw records. Reads the first sheet; the
/// first row must carry the required column headers. Rows without a usable
/// article number or inventory count are skipped.
pub fn read_inventory_rows(path: &Path) -> Result<Vec<InventoryRecord>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| Error::Import(format!("Could not open Excel file: {}", e)))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::Import("Workbook has no sheets.".to_string()))?
        .map_err(|e| Error::Import(format!("Could not read sheet: {}", e)))?;

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| Error::Import("Workbook has no header row.".to_string()))?;
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.as_string().unwrap_or_default().trim().to_string())
        .collect();

    let mut columns = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::Import(format!("Missing required column: {}", name)))?;
    }
    let [dept_col, cat_col, desc_col, article_col, count_col] = columns;

    let mut records = Vec::new();
    for (row_idx, row) in rows.enumerate() {
        let article = match row.get(article_col).and_then(normalize_cell) {
            Some(article) => article,
            None => continue,
        };
        let inventory_count = match row.get(count_col).and_then(cell_to_count) {
            Some(count) => count,
            None => {
                warn!(row = row_idx + 2, article = %article, "skipping row without a readable inventory count");
                continue;
            }
        };
        let text_at = |col: usize| {
            row.get(col)
                .and_then(|c| c.as_string())
                .unwrap_or_default()
                .trim()
                .to_string()
        };
        records.push(InventoryRecord {
            department: text_at(dept_col),
            merchandise_category: text_at(cat_col),
            description: text_at(desc_col),
            article,
            inventory_count,
        });
    }
    Ok(records)
}

/// Collect DNO candidate articles from a workbook: every non-empty cell in
/// the first ten columns of every sheet, normalized. Duplicates are left in;
/// the store's insert-or-ignore handles them.
pub fn read_dno_candidates(path: &Path) -> Result<Vec<String>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| Error::Import(format!("Could not open Excel file: {}", e)))?;
    let mut candidates = Vec::new();
    for (_name, range) in workbook.worksheets() {
        for row in range.rows() {
            for cell in row.iter().take(DNO_SCAN_COLUMNS) {
                if let Some(article) = normalize_cell(cell) {
                    candidates.push(article);
                }
            }
        }
    }
    Ok(candidates)
}
