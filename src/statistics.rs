//! Weighted AEP statistics from an externally evaluated power response.

use std::fmt;

use crate::error::{Result, UqError};
use crate::quadrature::SampleSet;

/// Hours in a (non-leap) year.
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// kWh per GWh.
const KWH_PER_GWH: f64 = 1e6;

/// Expected annual energy and its spread, in kWh.
///
/// Computed post hoc from the sample weights and the farm power (kW) at each
/// sample so that the reported numbers always match the evaluated data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AepStatistics {
    /// Expected annual energy production (kWh).
    pub mean: f64,
    /// Standard deviation of annual energy production (kWh).
    pub std: f64,
}

impl AepStatistics {
    /// Weighted mean and standard deviation of power, scaled by `hours`.
    ///
    /// With weights `w` and power `p`: `mu = Σ w p`,
    /// `mean = hours * mu`, `std = hours * sqrt(Σ w (p - mu)^2)`.
    ///
    /// # Arguments
    ///
    /// * `samples` - Quadrature points and weights
    /// * `power` - Farm power (kW) at each sample, in sample order
    /// * `hours` - Hours per year the expectation is scaled to
    ///
    /// # Errors
    ///
    /// Returns [`UqError::LengthMismatch`] if `power` and `samples` differ in
    /// length.
    pub fn from_power(samples: &SampleSet, power: &[f64], hours: f64) -> Result<Self> {
        if samples.is_empty() {
            return Err(UqError::LengthMismatch("no samples".into()));
        }
        let mu = samples.expectation(power)?;
        let variance: f64 = samples
            .weights()
            .iter()
            .zip(power)
            .map(|(w, p)| w * (p - mu) * (p - mu))
            .sum();
        Ok(Self {
            mean: hours * mu,
            std: hours * variance.max(0.0).sqrt(),
        })
    }

    pub fn mean_gwh(&self) -> f64 {
        self.mean / KWH_PER_GWH
    }

    pub fn std_gwh(&self) -> f64 {
        self.std / KWH_PER_GWH
    }
}

impl fmt::Display for AepStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mean = {:.6} GWhrs", self.mean_gwh())?;
        write!(f, "std = {:.6} GWhrs", self.std_gwh())
    }
}
