use super::{Domain, Law};
use crate::error::{Result, UqError};

/// Uniform law on `[lower, upper]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Uniform {
    lower: f64,
    upper: f64,
}

impl Uniform {
    /// Creates a uniform law.
    ///
    /// # Errors
    ///
    /// Returns a configuration error unless both bounds are finite and
    /// `lower < upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if !lower.is_finite() || !upper.is_finite() || lower >= upper {
            return Err(UqError::Config(format!(
                "uniform bounds must be finite with lower < upper, got [{lower}, {upper}]"
            )));
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }
}

impl Law for Uniform {
    fn domain(&self) -> Domain {
        Domain::Bounded {
            lower: self.lower,
            upper: self.upper,
        }
    }

    fn pdf(&self, x: f64) -> f64 {
        if (self.lower..=self.upper).contains(&x) {
            1.0 / (self.upper - self.lower)
        } else {
            0.0
        }
    }

    fn mass(&self, a: f64, b: f64) -> f64 {
        let lo = a.max(self.lower);
        let hi = b.min(self.upper);
        if hi <= lo {
            return 0.0;
        }
        (hi - lo) / (self.upper - self.lower)
    }

    fn kind(&self) -> &'static str {
        "uniform"
    }
}
