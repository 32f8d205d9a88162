//! File exchange with the external Dakota driver.
//!
//! One driver evaluation is a single pass: read the parameters file, check
//! the variable count, evaluate, write the results file. Nothing is retried.

pub mod params;
pub mod results;
pub mod table;

pub use params::{ParameterRecord, check_variable_count};
pub use results::{
    ASV_GRADIENT, ASV_HESSIAN, ASV_VALUE, ResultsRecord, render_results, write_results,
    write_results_file,
};
pub use table::{TableRow, parse_points_table, read_points_table};

use std::path::Path;

use crate::error::Result;

/// Reads a Dakota parameters file.
///
/// # Errors
///
/// See [`ParameterRecord::from_path`].
pub fn parse_parameters_file(path: &Path) -> Result<ParameterRecord> {
    ParameterRecord::from_path(path)
}
