//! Probability laws over the uncertain wind variable.

/// Bounded uniform law.
pub mod uniform;
/// Periodic von Mises law over wind direction.
pub mod von_mises;
/// Truncated Weibull law over wind speed.
pub mod weibull;
/// Empirical wind-rose histogram over wind direction.
pub mod wind_rose;

use std::fmt;

pub use uniform::Uniform;
pub use von_mises::VonMises;
pub use weibull::Weibull;
pub use wind_rose::WindRose;

/// One full turn of wind direction, in degrees.
pub const FULL_CIRCLE_DEG: f64 = 360.0;

/// Support of a distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Domain {
    /// Closed interval `[lower, upper]`.
    Bounded { lower: f64, upper: f64 },
    /// Circle `[0, period)`; intervals wrap around.
    Periodic { period: f64 },
}

impl Domain {
    /// Width of the domain (`upper - lower`, or the period).
    pub fn width(&self) -> f64 {
        match *self {
            Domain::Bounded { lower, upper } => upper - lower,
            Domain::Periodic { period } => period,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Bounded { lower, upper } => write!(f, "[{lower}, {upper}]"),
            Domain::Periodic { period } => write!(f, "[0, {period}) periodic"),
        }
    }
}

/// Common interface of the probability laws.
///
/// Laws are immutable once constructed; every method is a pure function of
/// the law's parameters.
pub trait Law {
    /// Support of the law.
    fn domain(&self) -> Domain;

    /// Probability density at `x`.
    fn pdf(&self, x: f64) -> f64;

    /// Probability mass on the interval `[a, b]` with `a <= b`.
    ///
    /// Periodic laws wrap the interval around the circle, so `[350, 370]`
    /// covers `[350, 360) ∪ [0, 10]`.
    fn mass(&self, a: f64, b: f64) -> f64;

    /// Short name used in logs and records.
    fn kind(&self) -> &'static str;
}

/// Tagged distribution variant selected by configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum Distribution {
    Weibull(Weibull),
    Uniform(Uniform),
    WindRose(WindRose),
    VonMises(VonMises),
}

impl Law for Distribution {
    fn domain(&self) -> Domain {
        match self {
            Distribution::Weibull(d) => d.domain(),
            Distribution::Uniform(d) => d.domain(),
            Distribution::WindRose(d) => d.domain(),
            Distribution::VonMises(d) => d.domain(),
        }
    }

    fn pdf(&self, x: f64) -> f64 {
        match self {
            Distribution::Weibull(d) => d.pdf(x),
            Distribution::Uniform(d) => d.pdf(x),
            Distribution::WindRose(d) => d.pdf(x),
            Distribution::VonMises(d) => d.pdf(x),
        }
    }

    fn mass(&self, a: f64, b: f64) -> f64 {
        match self {
            Distribution::Weibull(d) => d.mass(a, b),
            Distribution::Uniform(d) => d.mass(a, b),
            Distribution::WindRose(d) => d.mass(a, b),
            Distribution::VonMises(d) => d.mass(a, b),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Distribution::Weibull(d) => d.kind(),
            Distribution::Uniform(d) => d.kind(),
            Distribution::WindRose(d) => d.kind(),
            Distribution::VonMises(d) => d.kind(),
        }
    }
}

impl From<Weibull> for Distribution {
    fn from(d: Weibull) -> Self {
        Distribution::Weibull(d)
    }
}

impl From<Uniform> for Distribution {
    fn from(d: Uniform) -> Self {
        Distribution::Uniform(d)
    }
}

impl From<WindRose> for Distribution {
    fn from(d: WindRose) -> Self {
        Distribution::WindRose(d)
    }
}

impl From<VonMises> for Distribution {
    fn from(d: VonMises) -> Self {
        Distribution::VonMises(d)
    }
}

/// Wraps an angle in degrees into `[0, 360)`.
pub fn wrap_degrees(x: f64) -> f64 {
    let r = x.rem_euclid(FULL_CIRCLE_DEG);
    // rem_euclid can round up to the period itself for tiny negative inputs
    if r >= FULL_CIRCLE_DEG { 0.0 } else { r }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_degrees_stays_in_range() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(-90.0), 270.0);
        assert_eq!(wrap_degrees(725.0), 5.0);
        let tiny = wrap_degrees(-1e-20);
        assert!((0.0..FULL_CIRCLE_DEG).contains(&tiny));
    }

    #[test]
    fn enum_dispatches_to_variant() {
        let d: Distribution = Uniform::new(0.0, 10.0).expect("valid uniform").into();
        assert_eq!(d.kind(), "uniform");
        assert_eq!(
            d.domain(),
            Domain::Bounded {
                lower: 0.0,
                upper: 10.0
            }
        );
        assert!((d.mass(0.0, 5.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn domain_display() {
        assert_eq!(
            Domain::Periodic { period: 360.0 }.to_string(),
            "[0, 360) periodic"
        );
        assert_eq!(
            Domain::Bounded {
                lower: 0.0,
                upper: 30.0
            }
            .to_string(),
            "[0, 30]"
        );
    }
}
