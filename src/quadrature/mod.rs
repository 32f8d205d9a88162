//! Quadrature point generation for expectations over the uncertain wind variable.
//!
//! [`generate`] is the single entry point: the rectangle rule is computed
//! locally, the external (Dakota) method returns a [`DriverRequest`] that is
//! resolved later from the points the driver chose.

/// Driver-delegated point placement.
pub mod external;
/// Midpoint rectangle rule.
pub mod rectangle;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, info};

use crate::distribution::{Distribution, Domain, FULL_CIRCLE_DEG, Law};
use crate::error::{Result, UqError};

pub use external::DriverRequest;
pub use rectangle::rectangle_rule;

/// Default name of the Dakota input deck handed to the driver.
pub const DEFAULT_DRIVER_INPUT: &str = "dakotageneral.in";

/// Which wind quantity is treated as uncertain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UncertainVariable {
    /// Wind speed in m/s, non-negative.
    Speed,
    /// Wind direction in degrees, periodic on `[0, 360)`.
    Direction,
}

impl UncertainVariable {
    pub fn as_str(&self) -> &'static str {
        match self {
            UncertainVariable::Speed => "speed",
            UncertainVariable::Direction => "direction",
        }
    }

    /// Checks that a distribution's support makes sense for this variable.
    ///
    /// Speed needs a bounded, non-negative support. Direction accepts a
    /// periodic law or a bounded law inside `[0, 360]`.
    ///
    /// # Errors
    ///
    /// Returns [`UqError::IncompatibleDomain`] otherwise.
    pub fn check_domain(&self, domain: &Domain) -> Result<()> {
        let ok = match (self, domain) {
            (UncertainVariable::Speed, Domain::Bounded { lower, .. }) => *lower >= 0.0,
            (UncertainVariable::Speed, Domain::Periodic { .. }) => false,
            (UncertainVariable::Direction, Domain::Periodic { period }) => {
                *period == FULL_CIRCLE_DEG
            }
            (UncertainVariable::Direction, Domain::Bounded { lower, upper }) => {
                *lower >= 0.0 && *upper <= FULL_CIRCLE_DEG
            }
        };
        if ok {
            Ok(())
        } else {
            Err(UqError::IncompatibleDomain {
                variable: self.as_str().to_string(),
                domain: domain.to_string(),
            })
        }
    }

    /// True if `x` is an admissible value of this variable under `domain`.
    pub fn admits(&self, domain: &Domain, x: f64) -> bool {
        if !x.is_finite() {
            return false;
        }
        match domain {
            Domain::Bounded { lower, upper } => (*lower..=*upper).contains(&x),
            Domain::Periodic { period } => (0.0..*period).contains(&x),
        }
    }
}

impl fmt::Display for UncertainVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UncertainVariable {
    type Err = UqError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "speed" => Ok(UncertainVariable::Speed),
            "direction" => Ok(UncertainVariable::Direction),
            other => Err(UqError::UnknownVariable(other.to_string())),
        }
    }
}

/// How sample points are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Midpoint rectangle rule, computed locally.
    Rectangle,
    /// Points chosen by the external UQ driver.
    External,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Rectangle => "rect",
            Method::External => "dakota",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = UqError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rect" | "rectangle" => Ok(Method::Rectangle),
            "dakota" | "external" => Ok(Method::External),
            other => Err(UqError::UnknownMethod(other.to_string())),
        }
    }
}

/// Everything needed to place samples: method, variable, law and the
/// rectangle-rule direction offset.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSpec {
    pub method: Method,
    pub variable: UncertainVariable,
    pub distribution: Distribution,
    /// Offset index in `0..n_offset`; rotates the direction grid by
    /// `offset / n_offset` of a cell.
    pub offset: usize,
    pub n_offset: usize,
    /// Dakota input deck for the external method.
    pub driver_input: PathBuf,
}

impl MethodSpec {
    pub fn new(method: Method, variable: UncertainVariable, distribution: Distribution) -> Self {
        Self {
            method,
            variable,
            distribution,
            offset: 0,
            n_offset: 1,
            driver_input: PathBuf::from(DEFAULT_DRIVER_INPUT),
        }
    }

    pub fn with_offset(mut self, offset: usize, n_offset: usize) -> Self {
        self.offset = offset;
        self.n_offset = n_offset;
        self
    }

    pub fn with_driver_input(mut self, path: impl Into<PathBuf>) -> Self {
        self.driver_input = path.into();
        self
    }

    /// Fraction of a cell width the direction grid is rotated by.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `n_offset == 0` or `offset >= n_offset`.
    pub fn offset_fraction(&self) -> Result<f64> {
        if self.n_offset == 0 || self.offset >= self.n_offset {
            return Err(UqError::Config(format!(
                "offset must be in 0..{}, got {}",
                self.n_offset, self.offset
            )));
        }
        Ok(self.offset as f64 / self.n_offset as f64)
    }
}

/// Ordered sample points with parallel quadrature weights.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    points: Vec<f64>,
    weights: Vec<f64>,
}

impl SampleSet {
    /// # Errors
    ///
    /// Returns [`UqError::LengthMismatch`] if the lengths differ and a
    /// configuration error if any weight is negative or non-finite.
    pub fn new(points: Vec<f64>, weights: Vec<f64>) -> Result<Self> {
        if points.len() != weights.len() {
            return Err(UqError::LengthMismatch(format!(
                "{} points but {} weights",
                points.len(),
                weights.len()
            )));
        }
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(UqError::Config(format!(
                "quadrature weights must be finite and >= 0, got {w}"
            )));
        }
        Ok(Self { points, weights })
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(point, weight)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().copied().zip(self.weights.iter().copied())
    }

    pub fn weight_sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Weighted sum `Σ wᵢ fᵢ` of response values evaluated at the points.
    ///
    /// # Errors
    ///
    /// Returns [`UqError::LengthMismatch`] if `values` has the wrong length.
    pub fn expectation(&self, values: &[f64]) -> Result<f64> {
        if values.len() != self.len() {
            return Err(UqError::LengthMismatch(format!(
                "{} response values for {} samples",
                values.len(),
                self.len()
            )));
        }
        Ok(self.weights.iter().zip(values).map(|(w, v)| w * v).sum())
    }
}

/// Result of [`generate`].
#[derive(Debug, Clone, PartialEq)]
pub enum Generated {
    /// Points and weights computed locally.
    Samples(SampleSet),
    /// Placement handed to the external driver.
    Delegated(DriverRequest),
}

impl Generated {
    /// The local sample set, if any.
    pub fn samples(&self) -> Option<&SampleSet> {
        match self {
            Generated::Samples(s) => Some(s),
            Generated::Delegated(_) => None,
        }
    }

    pub fn into_samples(self) -> Option<SampleSet> {
        match self {
            Generated::Samples(s) => Some(s),
            Generated::Delegated(_) => None,
        }
    }
}

/// Generates `n` quadrature samples for the configured method.
///
/// Validation happens before any work: `n >= 1`, a valid offset, and a
/// distribution whose support fits the uncertain variable.
///
/// # Errors
///
/// Returns a configuration error for any of the above.
pub fn generate(spec: &MethodSpec, n: usize) -> Result<Generated> {
    if n == 0 {
        return Err(UqError::Config("sample count must be >= 1".into()));
    }
    let domain = spec.distribution.domain();
    spec.variable.check_domain(&domain)?;

    match spec.method {
        Method::Rectangle => {
            let fraction = spec.offset_fraction()?;
            let samples = rectangle_rule(&spec.distribution, n, fraction)?;
            debug!(
                n,
                variable = %spec.variable,
                distribution = spec.distribution.kind(),
                weight_sum = samples.weight_sum(),
                "rectangle rule generated"
            );
            Ok(Generated::Samples(samples))
        }
        Method::External => {
            info!(
                n,
                variable = %spec.variable,
                input = %spec.driver_input.display(),
                "delegating point placement to external driver"
            );
            Ok(Generated::Delegated(DriverRequest::new(spec, n)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{Uniform, Weibull, WindRose};

    fn rose() -> Distribution {
        WindRose::centered(&[4.0, 2.0, 1.0, 3.0, 5.0, 1.0])
            .expect("valid rose")
            .into()
    }

    #[test]
    fn parses_names() {
        assert_eq!("speed".parse::<UncertainVariable>().ok(), Some(UncertainVariable::Speed));
        assert_eq!("rect".parse::<Method>().ok(), Some(Method::Rectangle));
        assert_eq!("dakota".parse::<Method>().ok(), Some(Method::External));
        assert!(matches!(
            "height".parse::<UncertainVariable>(),
            Err(UqError::UnknownVariable(_))
        ));
        assert!(matches!(
            "chaospy".parse::<Method>(),
            Err(UqError::UnknownMethod(_))
        ));
    }

    #[test]
    fn periodic_law_rejected_for_speed() {
        let spec = MethodSpec::new(Method::Rectangle, UncertainVariable::Speed, rose());
        let err = generate(&spec, 10).expect_err("periodic speed must fail");
        assert!(matches!(err, UqError::IncompatibleDomain { .. }));
    }

    #[test]
    fn negative_support_rejected_for_direction() {
        let dist = Uniform::new(-30.0, 30.0).expect("valid").into();
        let spec = MethodSpec::new(Method::Rectangle, UncertainVariable::Direction, dist);
        let err = generate(&spec, 10).expect_err("negative direction must fail");
        assert!(err.is_config());
    }

    #[test]
    fn zero_samples_rejected() {
        let spec = MethodSpec::new(Method::Rectangle, UncertainVariable::Direction, rose());
        assert!(generate(&spec, 0).is_err());
    }

    #[test]
    fn bad_offset_rejected() {
        let spec = MethodSpec::new(Method::Rectangle, UncertainVariable::Direction, rose())
            .with_offset(3, 3);
        assert!(generate(&spec, 12).is_err());
    }

    #[test]
    fn external_method_delegates() {
        let dist: Distribution = Weibull::new(2.0, 8.0, 30.0).expect("valid").into();
        let spec = MethodSpec::new(Method::External, UncertainVariable::Speed, dist)
            .with_driver_input("custom.in");
        let generated = generate(&spec, 7).expect("delegation succeeds");
        match generated {
            Generated::Delegated(req) => {
                assert_eq!(req.n, 7);
                assert_eq!(req.input_file, PathBuf::from("custom.in"));
            }
            Generated::Samples(_) => panic!("external method must not compute points"),
        }
    }

    #[test]
    fn sample_set_rejects_mismatched_lengths() {
        assert!(SampleSet::new(vec![1.0, 2.0], vec![1.0]).is_err());
        assert!(SampleSet::new(vec![1.0], vec![-0.5]).is_err());
    }

    #[test]
    fn expectation_is_weighted_sum() {
        let s = SampleSet::new(vec![1.0, 2.0], vec![0.25, 0.75]).expect("valid");
        let e = s.expectation(&[4.0, 8.0]).expect("lengths match");
        assert!((e - 7.0).abs() < 1e-12);
        assert!(s.expectation(&[1.0]).is_err());
    }
}
