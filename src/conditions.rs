//! Mapping sample points onto the wind-speed/wind-direction pairs the farm
//! model is evaluated at.

use std::fmt;

use crate::quadrature::{SampleSet, UncertainVariable};

/// Wind speed held fixed when direction is uncertain (m/s).
pub const DEFAULT_WIND_SPEED: f64 = 8.0;
/// Wind direction held fixed when speed is uncertain (degrees).
pub const DEFAULT_WIND_DIRECTION: f64 = 225.0;

/// Values used for the variable that is not uncertain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingPoint {
    pub wind_speed: f64,
    pub wind_direction: f64,
}

impl Default for OperatingPoint {
    fn default() -> Self {
        Self {
            wind_speed: DEFAULT_WIND_SPEED,
            wind_direction: DEFAULT_WIND_DIRECTION,
        }
    }
}

/// Parallel wind-speed and wind-direction arrays, one entry per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct WindConditions {
    pub speeds: Vec<f64>,
    pub directions: Vec<f64>,
}

impl WindConditions {
    /// The uncertain variable takes the sample points; the other one is held
    /// at its operating value.
    pub fn from_samples(
        variable: UncertainVariable,
        samples: &SampleSet,
        operating: &OperatingPoint,
    ) -> Self {
        let n = samples.len();
        match variable {
            UncertainVariable::Speed => Self {
                speeds: samples.points().to_vec(),
                directions: vec![operating.wind_direction; n],
            },
            UncertainVariable::Direction => Self {
                speeds: vec![operating.wind_speed; n],
                directions: samples.points().to_vec(),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.speeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speeds.is_empty()
    }

    /// `(speed, direction)` pairs in sample order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.speeds.iter().copied().zip(self.directions.iter().copied())
    }
}

impl fmt::Display for WindConditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Locations at which power is evaluated")?;
        writeln!(f, "\twindspeed \t winddirection")?;
        for (i, (speed, direction)) in self.iter().enumerate() {
            writeln!(f, "{} \t {speed:.2} \t {direction:.2}", i + 1)?;
        }
        Ok(())
    }
}
