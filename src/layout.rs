//! Turbine layout files: two whitespace-separated columns, X and Y in meters.

use std::fs;
use std::path::Path;

use crate::error::{Result, UqError};

/// Turbine coordinates, one entry per turbine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub turbine_x: Vec<f64>,
    pub turbine_y: Vec<f64>,
}

impl Layout {
    /// Reads a layout file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error naming the path, or the errors of [`Self::parse`].
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| UqError::io_at("read", path, e))?;
        Self::parse(&content)
    }

    /// Parses layout text. `#` starts a comment line (the `np.savetxt` header
    /// style `# turbineX, turbineY`).
    ///
    /// # Errors
    ///
    /// Returns [`UqError::Parse`] for a row that is not two numbers.
    pub fn parse(content: &str) -> Result<Self> {
        let mut layout = Self::default();
        for (idx, raw) in content.lines().enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let cols: Vec<f64> = trimmed
                .split_whitespace()
                .map(str::parse::<f64>)
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| UqError::Parse {
                    line: idx + 1,
                    message: format!("invalid coordinate: {e}"),
                })?;
            let &[x, y] = cols.as_slice() else {
                return Err(UqError::Parse {
                    line: idx + 1,
                    message: format!("expected 2 columns, got {}", cols.len()),
                });
            };
            layout.turbine_x.push(x);
            layout.turbine_y.push(y);
        }
        Ok(layout)
    }

    pub fn turbine_count(&self) -> usize {
        self.turbine_x.len()
    }

    /// Axis-aligned bounds `(min_x, min_y, max_x, max_y)`, `None` when empty.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        if self.turbine_x.is_empty() {
            return None;
        }
        let fold = |v: &[f64]| {
            v.iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| (lo.min(*x), hi.max(*x)))
        };
        let (min_x, max_x) = fold(&self.turbine_x);
        let (min_y, max_y) = fold(&self.turbine_y);
        Some((min_x, min_y, max_x, max_y))
    }
}
