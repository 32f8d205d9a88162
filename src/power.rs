//! Seam to the external farm power model.
//!
//! The wake physics lives outside this crate. A study reaches it through
//! [`PowerModel`]; [`PowerTable`] adapts a power curve tabulated by the
//! external simulator so the statistics can be computed offline.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::conditions::WindConditions;
use crate::distribution::{FULL_CIRCLE_DEG, wrap_degrees};
use crate::error::{Result, UqError};
use crate::quadrature::UncertainVariable;

/// Farm power (kW) for one wind condition.
pub trait PowerModel {
    /// Returns the farm power at `speed` (m/s) from `direction` (degrees).
    ///
    /// # Errors
    ///
    /// Implementations report evaluation failures; they are not retried.
    fn farm_power(&self, speed: f64, direction: f64) -> Result<f64>;
}

impl<F> PowerModel for F
where
    F: Fn(f64, f64) -> f64,
{
    fn farm_power(&self, speed: f64, direction: f64) -> Result<f64> {
        Ok(self(speed, direction))
    }
}

/// Evaluates the model at every condition, in order.
///
/// # Errors
///
/// Propagates the first model error.
pub fn evaluate_power(model: &impl PowerModel, conditions: &WindConditions) -> Result<Vec<f64>> {
    conditions
        .iter()
        .map(|(speed, direction)| model.farm_power(speed, direction))
        .collect()
}

/// Farm power tabulated against the uncertain variable.
///
/// Linear interpolation between rows. Direction tables wrap across 360°;
/// speed tables hold the end values outside the tabulated range.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerTable {
    variable: UncertainVariable,
    values: Vec<f64>,
    power: Vec<f64>,
}

impl PowerTable {
    /// Builds a table from `(value, power)` rows in any order.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for fewer than two rows, non-finite
    /// numbers or repeated values.
    pub fn new(variable: UncertainVariable, mut rows: Vec<(f64, f64)>) -> Result<Self> {
        if rows.len() < 2 {
            return Err(UqError::Config(format!(
                "power table needs at least 2 rows, got {}",
                rows.len()
            )));
        }
        if rows.iter().any(|(v, p)| !v.is_finite() || !p.is_finite()) {
            return Err(UqError::Config("power table holds non-finite numbers".into()));
        }
        if variable == UncertainVariable::Direction {
            for row in &mut rows {
                row.0 = wrap_degrees(row.0);
            }
        }
        rows.sort_by(|a, b| a.0.total_cmp(&b.0));
        if rows.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(UqError::Config("power table has repeated values".into()));
        }
        let (values, power) = rows.into_iter().unzip();
        Ok(Self {
            variable,
            values,
            power,
        })
    }

    /// Reads `value,power` rows from a CSV file; a non-numeric first row is
    /// taken as a header.
    ///
    /// # Errors
    ///
    /// Returns I/O, CSV or parse errors, then the errors of [`Self::new`].
    pub fn from_csv_path(path: &Path, variable: UncertainVariable) -> Result<Self> {
        let file = File::open(path).map_err(|e| UqError::io_at("open", path, e))?;
        Self::from_csv_reader(file, variable)
    }

    /// Like [`Self::from_csv_path`] for any reader.
    ///
    /// # Errors
    ///
    /// See [`Self::from_csv_path`].
    pub fn from_csv_reader(reader: impl Read, variable: UncertainVariable) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (idx, record) in rdr.records().enumerate() {
            let record = record?;
            let line = record.position().map_or(idx + 1, |p| p.line() as usize);
            if record.len() != 2 {
                return Err(UqError::Parse {
                    line,
                    message: format!("expected 2 columns, got {}", record.len()),
                });
            }
            let parsed = (record[0].parse::<f64>(), record[1].parse::<f64>());
            match parsed {
                (Ok(v), Ok(p)) => rows.push((v, p)),
                _ if idx == 0 => continue,
                _ => {
                    return Err(UqError::Parse {
                        line,
                        message: format!("\"{}\",\"{}\" are not numbers", &record[0], &record[1]),
                    });
                }
            }
        }
        Self::new(variable, rows)
    }

    pub fn variable(&self) -> UncertainVariable {
        self.variable
    }

    /// Interpolated power at `x` in the table's variable.
    pub fn interpolate(&self, x: f64) -> f64 {
        let n = self.values.len();
        let (first, last) = (self.values[0], self.values[n - 1]);
        match self.variable {
            UncertainVariable::Speed => {
                if x <= first {
                    return self.power[0];
                }
                if x >= last {
                    return self.power[n - 1];
                }
            }
            UncertainVariable::Direction => {
                let x = wrap_degrees(x);
                if x < first || x > last {
                    // segment from the last row to the first row one turn later
                    let span = first + FULL_CIRCLE_DEG - last;
                    let dx = if x > last { x - last } else { x + FULL_CIRCLE_DEG - last };
                    return lerp(self.power[n - 1], self.power[0], dx / span);
                }
                return self.interior(x);
            }
        }
        self.interior(x)
    }

    fn interior(&self, x: f64) -> f64 {
        let upper = self.values.partition_point(|v| *v < x).clamp(1, self.values.len() - 1);
        let lower = upper - 1;
        let (x0, x1) = (self.values[lower], self.values[upper]);
        lerp(self.power[lower], self.power[upper], (x - x0) / (x1 - x0))
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

impl PowerModel for PowerTable {
    fn farm_power(&self, speed: f64, direction: f64) -> Result<f64> {
        Ok(match self.variable {
            UncertainVariable::Speed => self.interpolate(speed),
            UncertainVariable::Direction => self.interpolate(direction),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direction_table() -> PowerTable {
        PowerTable::new(
            UncertainVariable::Direction,
            vec![(90.0, 200.0), (0.0, 100.0), (270.0, 400.0)],
        )
        .expect("valid table")
    }

    #[test]
    fn interpolates_inside_rows() {
        let t = direction_table();
        assert!((t.interpolate(45.0) - 150.0).abs() < 1e-12);
        assert!((t.interpolate(180.0) - 300.0).abs() < 1e-12);
        assert!((t.interpolate(90.0) - 200.0).abs() < 1e-12);
    }

    #[test]
    fn direction_wraps_past_last_row() {
        let t = direction_table();
        // 270 -> 360 goes from 400 back to 100
        assert!((t.interpolate(315.0) - 250.0).abs() < 1e-12);
        assert!((t.interpolate(-45.0) - 250.0).abs() < 1e-12);
    }

    #[test]
    fn speed_clamps_outside_range() {
        let t = PowerTable::new(UncertainVariable::Speed, vec![(4.0, 0.0), (12.0, 800.0)])
            .expect("valid");
        assert_eq!(t.interpolate(2.0), 0.0);
        assert_eq!(t.interpolate(20.0), 800.0);
        assert!((t.interpolate(8.0) - 400.0).abs() < 1e-12);
    }

    #[test]
    fn reads_csv_with_header() {
        let csv = "direction,power\n0,100\n180,300\n";
        let t = PowerTable::from_csv_reader(csv.as_bytes(), UncertainVariable::Direction)
            .expect("parse");
        assert!((t.interpolate(90.0) - 200.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_short_or_repeated_tables() {
        assert!(PowerTable::new(UncertainVariable::Speed, vec![(1.0, 1.0)]).is_err());
        assert!(
            PowerTable::new(UncertainVariable::Direction, vec![(0.0, 1.0), (360.0, 2.0)]).is_err()
        );
        let bad = "0,1\nfoo,bar\n";
        assert!(PowerTable::from_csv_reader(bad.as_bytes(), UncertainVariable::Speed).is_err());
    }

    #[test]
    fn closures_are_power_models() {
        let model = |speed: f64, _direction: f64| speed * 100.0;
        assert_eq!(model.farm_power(8.0, 0.0).ok(), Some(800.0));
    }
}
