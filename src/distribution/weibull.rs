use super::{Domain, Law};
use crate::error::{Result, UqError};

/// Weibull wind-speed law truncated to `[0, upper]` and renormalized.
///
/// The untruncated law has CDF `1 - exp(-(x / scale)^shape)`. Truncation keeps
/// the rectangle rule on a finite domain; `upper` is usually set where the
/// tail mass is negligible (e.g. 30 m/s for a scale of 8 m/s).
#[derive(Debug, Clone, PartialEq)]
pub struct Weibull {
    shape: f64,
    scale: f64,
    upper: f64,
    /// Untruncated probability of `[0, upper]`, used to renormalize.
    norm: f64,
}

impl Weibull {
    /// Creates a truncated Weibull law.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any parameter is non-positive or
    /// non-finite, or if the truncated mass underflows to zero.
    pub fn new(shape: f64, scale: f64, upper: f64) -> Result<Self> {
        for (name, value) in [("shape", shape), ("scale", scale), ("upper", upper)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(UqError::Config(format!(
                    "weibull {name} must be finite and > 0, got {value}"
                )));
            }
        }
        let norm = 1.0 - survival(upper, shape, scale);
        if norm <= 0.0 {
            return Err(UqError::Config(format!(
                "weibull truncation at {upper} leaves no probability mass"
            )));
        }
        Ok(Self {
            shape,
            scale,
            upper,
            norm,
        })
    }

    /// Shape parameter `k`.
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// Scale parameter `lambda` in m/s.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Truncation speed in m/s.
    pub fn upper(&self) -> f64 {
        self.upper
    }
}

/// Untruncated survival function `exp(-(x / scale)^shape)` for `x >= 0`.
fn survival(x: f64, shape: f64, scale: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    (-(x / scale).powf(shape)).exp()
}

impl Law for Weibull {
    fn domain(&self) -> Domain {
        Domain::Bounded {
            lower: 0.0,
            upper: self.upper,
        }
    }

    fn pdf(&self, x: f64) -> f64 {
        if !(0.0..=self.upper).contains(&x) {
            return 0.0;
        }
        let z = x / self.scale;
        let raw = (self.shape / self.scale) * z.powf(self.shape - 1.0) * (-z.powf(self.shape)).exp();
        raw / self.norm
    }

    fn mass(&self, a: f64, b: f64) -> f64 {
        let lo = a.clamp(0.0, self.upper);
        let hi = b.clamp(0.0, self.upper);
        if hi <= lo {
            return 0.0;
        }
        // Difference of survival values keeps precision in the upper tail.
        (survival(lo, self.shape, self.scale) - survival(hi, self.shape, self.scale)) / self.norm
    }

    fn kind(&self) -> &'static str {
        "weibull"
    }
}
