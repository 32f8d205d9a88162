//! Dakota results file writing.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use super::params::ParameterRecord;
use crate::error::{Result, UqError};

/// Active-set bit requesting the function value.
pub const ASV_VALUE: u8 = 1;
/// Active-set bit requesting the gradient.
pub const ASV_GRADIENT: u8 = 2;
/// Active-set bit requesting the Hessian.
pub const ASV_HESSIAN: u8 = 4;

/// Response data returned to the driver, indexed by response function.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsRecord {
    /// Function values.
    pub fns: Vec<f64>,
    /// Gradient per function (may be empty when no gradients are requested).
    pub fn_grads: Vec<Vec<f64>>,
    /// Hessian per function, row-major.
    pub fn_hessians: Vec<Vec<Vec<f64>>>,
}

impl ResultsRecord {
    /// Values only, no derivatives.
    pub fn values(fns: Vec<f64>) -> Self {
        Self {
            fns,
            ..Self::default()
        }
    }
}

/// Formats a number the way the driver reads it back: shortest round-trip
/// decimal, exponent form only for very large or small magnitudes.
fn fmt_value(v: f64) -> String {
    format!("{v:?}")
}

/// Renders the results text for the requested active set.
///
/// Layout: requested function values one per line in active-set order, then
/// one `[ g1 g2 ... ]` line per requested gradient, then one `[[ ... ]]`
/// block per requested Hessian with rows separated by newlines.
///
/// # Errors
///
/// Returns [`UqError::LengthMismatch`] if the active set disagrees with the
/// function count declared in `params`, and [`UqError::MissingResponse`] if
/// requested data is absent or a derivative has the wrong dimension.
pub fn render_results(
    results: &ResultsRecord,
    params: &ParameterRecord,
    active_set_vector: &[u8],
) -> Result<String> {
    if let Some(declared) = params.declared_functions()? {
        if declared != active_set_vector.len() {
            return Err(UqError::LengthMismatch(format!(
                "parameters declare {declared} functions but the active set has {} entries",
                active_set_vector.len()
            )));
        }
    }
    let derivative_dim = params.declared_derivative_variables()?;

    let mut out = String::new();

    for (index, flag) in active_set_vector.iter().enumerate() {
        if flag & ASV_VALUE != 0 {
            let value = results.fns.get(index).ok_or(UqError::MissingResponse {
                index: index + 1,
                kind: "a function value",
            })?;
            out.push_str(&fmt_value(*value));
            out.push('\n');
        }
    }

    for (index, flag) in active_set_vector.iter().enumerate() {
        if flag & ASV_GRADIENT != 0 {
            let grad = results.fn_grads.get(index).ok_or(UqError::MissingResponse {
                index: index + 1,
                kind: "a gradient",
            })?;
            if derivative_dim.is_some_and(|dim| dim != grad.len()) {
                return Err(UqError::MissingResponse {
                    index: index + 1,
                    kind: "a gradient of the declared dimension",
                });
            }
            out.push_str("[ ");
            for g in grad {
                out.push_str(&fmt_value(*g));
                out.push(' ');
            }
            out.push_str("]\n");
        }
    }

    for (index, flag) in active_set_vector.iter().enumerate() {
        if flag & ASV_HESSIAN != 0 {
            let hessian = results
                .fn_hessians
                .get(index)
                .ok_or(UqError::MissingResponse {
                    index: index + 1,
                    kind: "a Hessian",
                })?;
            let dim = derivative_dim.unwrap_or(hessian.len());
            if hessian.len() != dim || hessian.iter().any(|row| row.len() != dim) {
                return Err(UqError::MissingResponse {
                    index: index + 1,
                    kind: "a square Hessian of the declared dimension",
                });
            }
            let rows: Vec<String> = hessian
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|v| fmt_value(*v))
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect();
            out.push_str(&format!("[[ {} ]]\n", rows.join("\n")));
        }
    }

    Ok(out)
}

/// Writes the results text to any writer.
///
/// # Errors
///
/// Fails like [`render_results`], or with an I/O error.
pub fn write_results(
    writer: &mut impl Write,
    results: &ResultsRecord,
    params: &ParameterRecord,
    active_set_vector: &[u8],
) -> Result<()> {
    let text = render_results(results, params, active_set_vector)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| UqError::io("cannot write results", e))
}

/// Creates (or overwrites) the results file at `path`.
///
/// The text is rendered before the file is opened, so a validation failure
/// leaves no file behind.
///
/// # Errors
///
/// Fails like [`render_results`], or with an I/O error naming the path.
pub fn write_results_file(
    path: &Path,
    results: &ResultsRecord,
    params: &ParameterRecord,
    active_set_vector: &[u8],
) -> Result<()> {
    let text = render_results(results, params, active_set_vector)?;
    let file = File::create(path).map_err(|e| UqError::io_at("create", path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(text.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| UqError::io_at("write", path, e))?;
    debug!(path = %path.display(), functions = active_set_vector.len(), "results file written");
    Ok(())
}
