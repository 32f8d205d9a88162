//! Analysis driver invoked by Dakota once per evaluation.
//!
//! The response is the identity of the uncertain variable, so the results
//! file echoes the point Dakota chose. A study then reads the chosen points
//! back with [`crate::quadrature::DriverRequest::resolve_records`].

use std::path::Path;

use tracing::{debug, info};

use crate::error::{Result, UqError};
use crate::exchange::params::ASV_PREFIX;
use crate::exchange::{
    ParameterRecord, ResultsRecord, check_variable_count, parse_parameters_file,
    write_results_file,
};

/// Number of uncertain variables the driver expects.
pub const EXPECTED_VARIABLES: usize = 1;
/// Descriptor of the uncertain variable in the Dakota input deck.
pub const VARIABLE_DESCRIPTOR: &str = "x";
/// Active-set key of the single response.
pub const RESPONSE_ASV_KEY: &str = "ASV_1:dummy";

/// Reads `params_path`, evaluates the identity response and writes
/// `results_path`.
///
/// Validation runs before the results file is created, so a failed
/// precondition leaves no results file.
///
/// # Errors
///
/// Returns the first failed precondition: unreadable or malformed parameters
/// file, a variable count other than one, a missing or non-numeric `x`, or a
/// missing active-set entry.
pub fn run_analysis_driver(params_path: &Path, results_path: &Path) -> Result<()> {
    let params = parse_parameters_file(params_path)?;
    check_variable_count(EXPECTED_VARIABLES, &params)?;

    let x = params.get_f64(VARIABLE_DESCRIPTOR)?;
    let asv = response_flag(&params)?;
    debug!(x, asv, "parameters read");

    let results = ResultsRecord::values(vec![x]);
    write_results_file(results_path, &results, &params, &[asv])?;
    info!(
        x,
        results = %results_path.display(),
        "analysis driver evaluation complete"
    );
    Ok(())
}

fn response_flag(params: &ParameterRecord) -> Result<u8> {
    if params.contains(RESPONSE_ASV_KEY) {
        return params.get_parsed(RESPONSE_ASV_KEY);
    }
    let key = params
        .find_key(&format!("{ASV_PREFIX}1:"))
        .ok_or_else(|| UqError::MissingKey(RESPONSE_ASV_KEY.to_string()))?;
    params.get_parsed(key)
}
