use super::{Domain, FULL_CIRCLE_DEG, Law, wrap_degrees};
use crate::error::{Result, UqError};

/// Empirical wind rose: a histogram of equal-width direction sectors.
///
/// Sector `j` covers `[start + j * w, start + (j + 1) * w)` modulo 360 where
/// `w = 360 / frequencies.len()`. A rose whose first sector is centered on
/// north uses `start = -w / 2`. Density is constant inside each sector.
#[derive(Debug, Clone, PartialEq)]
pub struct WindRose {
    /// Normalized sector probabilities (sum to 1).
    probabilities: Vec<f64>,
    /// Cumulative probability at each sector edge, `cumulative[0] == 0`.
    cumulative: Vec<f64>,
    start: f64,
    width: f64,
}

impl WindRose {
    /// Builds a rose from raw sector frequencies (any positive scale).
    ///
    /// # Errors
    ///
    /// Returns a configuration error if there are no sectors, any frequency is
    /// negative or non-finite, the frequencies sum to zero, or `start` is not
    /// finite.
    pub fn new(frequencies: &[f64], start: f64) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(UqError::Config("wind rose needs at least one sector".into()));
        }
        if let Some(bad) = frequencies.iter().find(|f| !f.is_finite() || **f < 0.0) {
            return Err(UqError::Config(format!(
                "wind rose frequencies must be finite and >= 0, got {bad}"
            )));
        }
        if !start.is_finite() {
            return Err(UqError::Config(format!(
                "wind rose start must be finite, got {start}"
            )));
        }
        let total: f64 = frequencies.iter().sum();
        if total <= 0.0 {
            return Err(UqError::Config("wind rose frequencies sum to zero".into()));
        }

        let probabilities: Vec<f64> = frequencies.iter().map(|f| f / total).collect();
        let mut cumulative = Vec::with_capacity(probabilities.len() + 1);
        let mut acc = 0.0;
        cumulative.push(acc);
        for p in &probabilities {
            acc += p;
            cumulative.push(acc);
        }

        Ok(Self {
            width: FULL_CIRCLE_DEG / probabilities.len() as f64,
            probabilities,
            cumulative,
            start,
        })
    }

    /// Rose with sectors centered on `0, w, 2w, ...` (meteorological convention).
    pub fn centered(frequencies: &[f64]) -> Result<Self> {
        let width = FULL_CIRCLE_DEG / frequencies.len().max(1) as f64;
        Self::new(frequencies, -width / 2.0)
    }

    /// Normalized sector probabilities.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Angular width of one sector in degrees.
    pub fn sector_width(&self) -> f64 {
        self.width
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    /// Cumulative mass from `start` to `x`, counting full turns.
    ///
    /// Monotone on the real line with `unwrapped_cdf(x + 360) == unwrapped_cdf(x) + 1`,
    /// so the mass of any interval is a plain difference.
    fn unwrapped_cdf(&self, x: f64) -> f64 {
        let n = self.probabilities.len();
        let y = x - self.start;
        let turns = (y / FULL_CIRCLE_DEG).floor();
        let within = (y - turns * FULL_CIRCLE_DEG).clamp(0.0, FULL_CIRCLE_DEG);
        let pos = within / self.width;
        let sector = (pos.floor() as usize).min(n);
        let partial = if sector < n {
            (pos - sector as f64) * self.probabilities[sector]
        } else {
            0.0
        };
        turns + self.cumulative[sector] + partial
    }
}

impl Law for WindRose {
    fn domain(&self) -> Domain {
        Domain::Periodic {
            period: FULL_CIRCLE_DEG,
        }
    }

    fn pdf(&self, x: f64) -> f64 {
        let offset = wrap_degrees(x - self.start);
        let sector = ((offset / self.width).floor() as usize).min(self.probabilities.len() - 1);
        self.probabilities[sector] / self.width
    }

    fn mass(&self, a: f64, b: f64) -> f64 {
        if b <= a {
            return 0.0;
        }
        (self.unwrapped_cdf(b) - self.unwrapped_cdf(a)).max(0.0)
    }

    fn kind(&self) -> &'static str {
        "wind_rose"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_sector() -> WindRose {
        // N, E, S, W sectors centered on the compass points
        WindRose::centered(&[1.0, 2.0, 3.0, 4.0]).expect("valid rose")
    }

    #[test]
    fn frequencies_are_normalized() {
        let rose = four_sector();
        let sum: f64 = rose.probabilities().iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!((rose.probabilities()[3] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn full_turn_has_unit_mass_from_any_start() {
        let rose = four_sector();
        for a in [0.0, 17.0, 200.0, -45.0, 359.9] {
            assert!((rose.mass(a, a + 360.0) - 1.0).abs() < 1e-12, "start {a}");
        }
    }

    #[test]
    fn north_sector_wraps_across_zero() {
        let rose = four_sector();
        // north sector is [315, 45); mass 0.1
        assert!((rose.mass(315.0, 405.0) - 0.1).abs() < 1e-12);
        assert!((rose.mass(-45.0, 45.0) - 0.1).abs() < 1e-12);
        // half of north, half of east
        assert!((rose.mass(0.0, 90.0) - (0.05 + 0.1)).abs() < 1e-12);
    }

    #[test]
    fn pdf_is_sector_constant() {
        let rose = four_sector();
        assert!((rose.pdf(0.0) - 0.1 / 90.0).abs() < 1e-15);
        assert!((rose.pdf(350.0) - 0.1 / 90.0).abs() < 1e-15);
        assert!((rose.pdf(270.0) - 0.4 / 90.0).abs() < 1e-15);
    }

    #[test]
    fn rejects_invalid_frequencies() {
        assert!(WindRose::new(&[], 0.0).is_err());
        assert!(WindRose::new(&[0.0, 0.0], 0.0).is_err());
        assert!(WindRose::new(&[1.0, -1.0], 0.0).is_err());
        assert!(WindRose::new(&[1.0, f64::NAN], 0.0).is_err());
    }
}
