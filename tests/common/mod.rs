//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use windfarm_uq::distribution::{Distribution, Weibull, WindRose};
use windfarm_uq::{Method, MethodSpec, UncertainVariable};

/// Twelve-sector wind rose, first sector centered on north.
pub const ROSE_FREQUENCIES: [f64; 12] = [
    4.0, 3.5, 3.0, 4.5, 6.0, 8.0, 11.0, 14.5, 16.0, 12.5, 9.0, 8.0,
];

/// Minimal standard-format parameters file for one variable `x`.
pub const ONE_VARIABLE_PARAMS: &str = "1 variables\n3.14 x\n1 ASV_1:dummy\n";

/// Parameters file declaring two variables.
pub const TWO_VARIABLE_PARAMS: &str = "2 variables\n3.14 x\n2.72 y\n1 ASV_1:dummy\n";

/// Default wind rose distribution.
pub fn rose() -> Distribution {
    WindRose::centered(&ROSE_FREQUENCIES)
        .expect("fixture rose should be valid")
        .into()
}

/// Rectangle-rule direction study over the default wind rose.
pub fn direction_spec() -> MethodSpec {
    MethodSpec::new(Method::Rectangle, UncertainVariable::Direction, rose())
}

/// Rectangle-rule speed study over a Weibull(2, 8) truncated at 30 m/s.
pub fn speed_spec() -> MethodSpec {
    let weibull = Weibull::new(2.0, 8.0, 30.0).expect("fixture Weibull should be valid");
    MethodSpec::new(Method::Rectangle, UncertainVariable::Speed, weibull.into())
}

/// Writes `contents` to `name` inside `dir` and returns the path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("fixture file should be writable");
    path
}

/// Direction power table (kW): a smooth bump peaking at 225°.
pub fn direction_power_csv() -> String {
    let mut csv = String::from("direction,power\n");
    for deg in (0..360).step_by(15) {
        let rad = (f64::from(deg) - 225.0).to_radians();
        csv.push_str(&format!("{deg},{:.3}\n", 20_000.0 + 5_000.0 * rad.cos()));
    }
    csv
}
