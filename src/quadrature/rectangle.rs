use super::SampleSet;
use crate::distribution::{Distribution, Domain, Law, wrap_degrees};
use crate::error::{Result, UqError};

/// Midpoint rectangle rule over the distribution's domain.
///
/// The domain is split into `n` equal cells. Each point is its cell's
/// midpoint and each weight is the probability mass of the cell. Weights are
/// divided by their total at the end, so they sum to 1 even when the mass
/// integration is approximate.
///
/// For a periodic domain the cell edges start at `offset_fraction * width`
/// and midpoints are wrapped into `[0, period)`; cells crossing the period
/// boundary keep their full wrapped mass. `offset_fraction` is ignored for
/// bounded domains.
///
/// # Errors
///
/// Returns a configuration error if `n == 0` or the distribution assigns no
/// mass to its own domain.
pub fn rectangle_rule(
    distribution: &Distribution,
    n: usize,
    offset_fraction: f64,
) -> Result<SampleSet> {
    if n == 0 {
        return Err(UqError::Config("sample count must be >= 1".into()));
    }

    let (start, width, periodic) = match distribution.domain() {
        Domain::Bounded { lower, upper } => (lower, (upper - lower) / n as f64, false),
        Domain::Periodic { period } => {
            let width = period / n as f64;
            (offset_fraction * width, width, true)
        }
    };

    let mut points = Vec::with_capacity(n);
    let mut weights = Vec::with_capacity(n);
    for i in 0..n {
        let a = start + i as f64 * width;
        let b = a + width;
        let mid = a + width / 2.0;
        points.push(if periodic { wrap_degrees(mid) } else { mid });
        weights.push(distribution.mass(a, b));
    }

    let total: f64 = weights.iter().sum();
    if total.is_nan() || total <= 0.0 {
        return Err(UqError::Config(format!(
            "{} distribution has no mass on its domain",
            distribution.kind()
        )));
    }
    for w in &mut weights {
        *w /= total;
    }

    SampleSet::new(points, weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{Uniform, VonMises, Weibull, WindRose};

    #[test]
    fn uniform_gives_equal_weights_at_midpoints() {
        let d: Distribution = Uniform::new(0.0, 10.0).expect("valid").into();
        let s = rectangle_rule(&d, 5, 0.0).expect("rule");
        assert_eq!(s.points(), &[1.0, 3.0, 5.0, 7.0, 9.0]);
        for w in s.weights() {
            assert!((w - 0.2).abs() < 1e-12);
        }
    }

    #[test]
    fn direction_midpoints_without_offset() {
        let d: Distribution = VonMises::new(0.0, 0.0).expect("valid").into();
        let s = rectangle_rule(&d, 4, 0.0).expect("rule");
        assert_eq!(s.points(), &[45.0, 135.0, 225.0, 315.0]);
    }

    #[test]
    fn offset_rotates_grid_and_wraps() {
        let d: Distribution = WindRose::centered(&[1.0; 4]).expect("valid").into();
        let s = rectangle_rule(&d, 4, 0.5).expect("rule");
        // edges start at 45, last cell [315, 405) has midpoint 360 -> 0
        assert_eq!(s.points(), &[90.0, 180.0, 270.0, 0.0]);
        assert!((s.weight_sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rose_weights_match_sector_probabilities_when_aligned() {
        let freqs = [5.0, 1.0, 2.0, 2.0];
        let d: Distribution = WindRose::new(&freqs, 0.0).expect("valid").into();
        let s = rectangle_rule(&d, 4, 0.0).expect("rule");
        let expected = [0.5, 0.1, 0.2, 0.2];
        for (w, e) in s.weights().iter().zip(expected) {
            assert!((w - e).abs() < 1e-12);
        }
    }

    #[test]
    fn weibull_weights_peak_near_mode() {
        let d: Distribution = Weibull::new(2.0, 8.0, 30.0).expect("valid").into();
        let s = rectangle_rule(&d, 30, 0.0).expect("rule");
        let (argmax, _) = s
            .weights()
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |acc, (i, w)| if *w > acc.1 { (i, *w) } else { acc });
        // mode 5.66 m/s lies in cell [5, 6]
        assert_eq!(argmax, 5);
        assert!(s.points().iter().all(|p| *p > 0.0 && *p < 30.0));
    }
}
