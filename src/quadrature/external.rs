use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::{MethodSpec, SampleSet, UncertainVariable};
use crate::distribution::{Distribution, Law};
use crate::error::{Result, UqError};
use crate::exchange::{ParameterRecord, TableRow, read_points_table};

/// Point placement handed to the external driver.
///
/// Holds what the driver needs to build its experimental design. The points
/// it chooses come back later, either as a points table or as the sequence of
/// parameters files it fed to the analysis driver.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverRequest {
    pub distribution: Distribution,
    pub variable: UncertainVariable,
    pub n: usize,
    /// Dakota input deck the driver runs with.
    pub input_file: PathBuf,
}

impl DriverRequest {
    pub fn new(spec: &MethodSpec, n: usize) -> Self {
        Self {
            distribution: spec.distribution.clone(),
            variable: spec.variable,
            n,
            input_file: spec.driver_input.clone(),
        }
    }

    /// Builds the sample set from `(point, weight)` rows the driver produced.
    ///
    /// # Errors
    ///
    /// Returns [`UqError::LengthMismatch`] if the row count differs from `n`,
    /// and a configuration error for a point outside the variable's domain or
    /// an invalid weight.
    pub fn resolve_rows(&self, rows: &[TableRow]) -> Result<SampleSet> {
        if rows.len() != self.n {
            return Err(UqError::LengthMismatch(format!(
                "driver returned {} points, {} were requested",
                rows.len(),
                self.n
            )));
        }
        let domain = self.distribution.domain();
        if let Some(row) = rows.iter().find(|r| !self.variable.admits(&domain, r.point)) {
            return Err(UqError::Config(format!(
                "driver point {} lies outside the {} domain {domain}",
                row.point, self.variable
            )));
        }
        let samples = SampleSet::new(
            rows.iter().map(|r| r.point).collect(),
            rows.iter().map(|r| r.weight).collect(),
        )?;
        let sum = samples.weight_sum();
        if (sum - 1.0).abs() > 1e-6 {
            warn!(weight_sum = sum, "driver weights do not sum to 1");
        }
        info!(n = self.n, "driver points resolved");
        Ok(samples)
    }

    /// Reads and resolves a driver points table.
    ///
    /// # Errors
    ///
    /// See [`read_points_table`] and [`Self::resolve_rows`].
    pub fn resolve_table(&self, path: &Path) -> Result<SampleSet> {
        let rows = read_points_table(path)?;
        self.resolve_rows(&rows)
    }

    /// Builds an equal-weight sample set from the parameters files of a
    /// sampling study, reading the variable named `descriptor` from each.
    ///
    /// # Errors
    ///
    /// Fails on a count mismatch, a missing or non-numeric `descriptor`, or a
    /// point outside the domain.
    pub fn resolve_records(
        &self,
        records: &[ParameterRecord],
        descriptor: &str,
    ) -> Result<SampleSet> {
        let weight = 1.0 / records.len().max(1) as f64;
        let rows = records
            .iter()
            .map(|r| {
                Ok(TableRow {
                    point: r.get_f64(descriptor)?,
                    weight,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.resolve_rows(&rows)
    }
}
