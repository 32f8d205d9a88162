use super::{Domain, FULL_CIRCLE_DEG, Law, wrap_degrees};
use crate::error::{Result, UqError};

/// Largest concentration accepted; keeps `exp(kappa)` and `I0(kappa)` finite.
pub const MAX_KAPPA: f64 = 500.0;

/// Simpson panels per degree when integrating the density.
const PANELS_PER_DEG: f64 = 2.0;

/// Von Mises law over wind direction in degrees.
///
/// Density `exp(kappa * cos(theta - mean)) / (360 * I0(kappa))` per degree.
/// `kappa = 0` is the uniform rose.
#[derive(Debug, Clone, PartialEq)]
pub struct VonMises {
    mean: f64,
    kappa: f64,
    /// `360 * I0(kappa)`.
    norm: f64,
}

impl VonMises {
    /// # Errors
    ///
    /// Returns a configuration error if `mean` is not finite or `kappa` is
    /// outside `[0, MAX_KAPPA]`.
    pub fn new(mean: f64, kappa: f64) -> Result<Self> {
        if !mean.is_finite() {
            return Err(UqError::Config(format!(
                "von mises mean must be finite, got {mean}"
            )));
        }
        if !(0.0..=MAX_KAPPA).contains(&kappa) {
            return Err(UqError::Config(format!(
                "von mises kappa must be in [0, {MAX_KAPPA}], got {kappa}"
            )));
        }
        Ok(Self {
            mean: wrap_degrees(mean),
            kappa,
            norm: FULL_CIRCLE_DEG * bessel_i0(kappa),
        })
    }

    /// Mean direction in degrees, in `[0, 360)`.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Concentration.
    pub fn kappa(&self) -> f64 {
        self.kappa
    }
}

/// Modified Bessel function of the first kind, order zero, by power series.
fn bessel_i0(x: f64) -> f64 {
    let half = x / 2.0;
    let mut term = 1.0;
    let mut sum = 1.0;
    for k in 1..1000 {
        let r = half / k as f64;
        term *= r * r;
        sum += term;
        if term < sum * 1e-17 {
            break;
        }
    }
    sum
}

impl Law for VonMises {
    fn domain(&self) -> Domain {
        Domain::Periodic {
            period: FULL_CIRCLE_DEG,
        }
    }

    fn pdf(&self, x: f64) -> f64 {
        let delta = (x - self.mean).to_radians();
        (self.kappa * delta.cos()).exp() / self.norm
    }

    /// Composite Simpson over `[a, b]`; the density is periodic so no wrap
    /// handling is needed.
    fn mass(&self, a: f64, b: f64) -> f64 {
        if b <= a {
            return 0.0;
        }
        let mut panels = ((b - a) * PANELS_PER_DEG).ceil().max(2.0) as usize;
        if panels % 2 == 1 {
            panels += 1;
        }
        let h = (b - a) / panels as f64;
        let mut acc = self.pdf(a) + self.pdf(b);
        for i in 1..panels {
            let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
            acc += weight * self.pdf(a + i as f64 * h);
        }
        acc * h / 3.0
    }

    fn kind(&self) -> &'static str {
        "von_mises"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bessel_matches_reference_values() {
        assert!((bessel_i0(0.0) - 1.0).abs() < 1e-15);
        assert!((bessel_i0(1.0) - 1.266_065_877_752_008_4).abs() < 1e-12);
        assert!((bessel_i0(5.0) - 27.239_871_823_604_45).abs() < 1e-9);
    }

    #[test]
    fn zero_kappa_is_uniform() {
        let vm = VonMises::new(225.0, 0.0).expect("valid");
        assert!((vm.pdf(10.0) - 1.0 / 360.0).abs() < 1e-15);
        assert!((vm.mass(0.0, 90.0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn full_turn_integrates_to_one() {
        for kappa in [0.5, 2.0, 10.0, 50.0] {
            let vm = VonMises::new(225.0, kappa).expect("valid");
            let m = vm.mass(0.0, 360.0);
            assert!((m - 1.0).abs() < 1e-9, "kappa {kappa}: {m}");
        }
    }

    #[test]
    fn mass_concentrates_near_mean() {
        let vm = VonMises::new(270.0, 8.0).expect("valid");
        let near = vm.mass(240.0, 300.0);
        let far = vm.mass(60.0, 120.0);
        assert!(near > 0.8);
        assert!(far < 1e-3);
    }

    #[test]
    fn constructor_wraps_mean_and_keeps_unit_mass() {
        let vm = VonMises::new(-90.0, 10.0).expect("valid");
        assert_eq!(vm.mean(), 270.0);
        assert_eq!(vm.kappa(), 10.0);
        assert!((vm.mass(0.0, 360.0) - 1.0).abs() < 1e-9);
        assert!((VonMises::new(630.0, 2.0).expect("valid").mean() - 270.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(VonMises::new(0.0, -1.0).is_err());
        assert!(VonMises::new(0.0, MAX_KAPPA + 1.0).is_err());
        assert!(VonMises::new(f64::NAN, 1.0).is_err());
    }
}
