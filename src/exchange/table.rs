//! Driver-written points table: one `<point> <weight>` row per sample.
//!
//! Lines starting with `%` (Dakota tabular headers) or `#` are comments.

use std::fs;
use std::path::Path;

use crate::error::{Result, UqError};

/// One row of the points table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableRow {
    pub point: f64,
    pub weight: f64,
}

/// Reads a points table from disk.
///
/// # Errors
///
/// Returns an I/O error naming the path or the parse errors of
/// [`parse_points_table`].
pub fn read_points_table(path: &Path) -> Result<Vec<TableRow>> {
    let content = fs::read_to_string(path).map_err(|e| UqError::io_at("read", path, e))?;
    parse_points_table(&content)
}

/// Parses points table text.
///
/// # Errors
///
/// Returns [`UqError::Parse`] with the line number for a row that is not two
/// numbers.
pub fn parse_points_table(content: &str) -> Result<Vec<TableRow>> {
    let mut rows = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') || trimmed.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        let [point, weight] = fields.as_slice() else {
            return Err(UqError::Parse {
                line,
                message: format!("expected \"<point> <weight>\", got \"{trimmed}\""),
            });
        };
        let number = |s: &str| {
            s.parse::<f64>().map_err(|e| UqError::Parse {
                line,
                message: format!("\"{s}\" is not a number: {e}"),
            })
        };
        rows.push(TableRow {
            point: number(*point)?,
            weight: number(*weight)?,
        });
    }
    Ok(rows)
}
