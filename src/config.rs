//! TOML-based study configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::conditions::{DEFAULT_WIND_DIRECTION, DEFAULT_WIND_SPEED, OperatingPoint};
use crate::distribution::{Distribution, Law, Uniform, VonMises, Weibull, WindRose};
use crate::error::{Result, UqError};
use crate::quadrature::{DEFAULT_DRIVER_INPUT, Method, MethodSpec, UncertainVariable};
use crate::statistics::HOURS_PER_YEAR;

/// Twelve 30° sectors centered on north, south-westerly prevailing wind.
const SAMPLE_ROSE: [f64; 12] = [
    4.0, 3.5, 3.0, 4.5, 6.0, 8.0, 11.0, 14.5, 16.0, 12.5, 9.0, 8.0,
];

/// Annotated configuration printed by `windfarm-uq example`.
pub const EXAMPLE_CONFIG: &str = r#"# windfarm-uq study configuration

[method]
method = "rect"              # "rect" or "dakota"
uncertain_var = "direction"  # "speed" or "direction"
samples = 20
offset = 0                   # starting direction index, 0..n_offset
n_offset = 10
driver_input = "dakotageneral.in"
layout = "optimized"

[distribution]
kind = "wind_rose"           # weibull, uniform, wind_rose or von_mises
frequencies = [4.0, 3.5, 3.0, 4.5, 6.0, 8.0, 11.0, 14.5, 16.0, 12.5, 9.0, 8.0]
start = -15.0

# kind = "weibull"
# shape = 2.0
# scale = 8.0
# upper = 30.0

[operating]
wind_speed = 8.0             # m/s, used when direction is uncertain
wind_direction = 225.0       # degrees, used when speed is uncertain
hours_per_year = 8760.0
"#;

/// Top-level study configuration parsed from TOML.
///
/// All fields have defaults matching the `direction_rect` preset. Load from
/// TOML with [`StudyConfig::from_toml_file`] or use
/// [`StudyConfig::direction_rect`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudyConfig {
    /// Quadrature method and sampling parameters.
    #[serde(default)]
    pub method: MethodConfig,
    /// Probability law of the uncertain variable.
    #[serde(default)]
    pub distribution: DistributionConfig,
    /// Fixed values of the variable that is not uncertain.
    #[serde(default)]
    pub operating: OperatingConfig,
}

/// Quadrature method and sampling parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MethodConfig {
    /// `"rect"` or `"dakota"`.
    pub method: String,
    /// `"speed"` or `"direction"`.
    pub uncertain_var: String,
    /// Number of samples (must be > 0).
    pub samples: usize,
    /// Starting-direction offset index, in `0..n_offset`.
    pub offset: usize,
    /// Number of starting directions considered.
    pub n_offset: usize,
    /// Dakota input deck for the `dakota` method.
    pub driver_input: PathBuf,
    /// Layout identifier written to the run record.
    pub layout: String,
}

impl Default for MethodConfig {
    fn default() -> Self {
        Self {
            method: "rect".to_string(),
            uncertain_var: "direction".to_string(),
            samples: 20,
            offset: 0,
            n_offset: 10,
            driver_input: PathBuf::from(DEFAULT_DRIVER_INPUT),
            layout: "optimized".to_string(),
        }
    }
}

/// Probability law of the uncertain variable, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum DistributionConfig {
    /// Truncated Weibull over wind speed.
    Weibull {
        shape: f64,
        scale: f64,
        #[serde(default = "default_weibull_upper")]
        upper: f64,
    },
    /// Uniform over `[lower, upper]`.
    Uniform { lower: f64, upper: f64 },
    /// Wind-rose histogram; `start` defaults to centering the first sector on north.
    WindRose {
        frequencies: Vec<f64>,
        #[serde(default)]
        start: Option<f64>,
    },
    /// Von Mises over wind direction.
    VonMises { mean: f64, kappa: f64 },
}

fn default_weibull_upper() -> f64 {
    30.0
}

impl Default for DistributionConfig {
    fn default() -> Self {
        DistributionConfig::WindRose {
            frequencies: SAMPLE_ROSE.to_vec(),
            start: None,
        }
    }
}

impl DistributionConfig {
    /// Builds the distribution, validating its parameters.
    ///
    /// # Errors
    ///
    /// Returns the constructor's configuration error.
    pub fn build(&self) -> Result<Distribution> {
        Ok(match self {
            DistributionConfig::Weibull {
                shape,
                scale,
                upper,
            } => Weibull::new(*shape, *scale, *upper)?.into(),
            DistributionConfig::Uniform { lower, upper } => Uniform::new(*lower, *upper)?.into(),
            DistributionConfig::WindRose { frequencies, start } => match start {
                Some(start) => WindRose::new(frequencies, *start)?.into(),
                None => WindRose::centered(frequencies)?.into(),
            },
            DistributionConfig::VonMises { mean, kappa } => VonMises::new(*mean, *kappa)?.into(),
        })
    }
}

/// Fixed operating values and energy scaling.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OperatingConfig {
    /// Wind speed used when direction is uncertain (m/s).
    pub wind_speed: f64,
    /// Wind direction used when speed is uncertain (degrees).
    pub wind_direction: f64,
    /// Hours per year the expected power is scaled by.
    pub hours_per_year: f64,
}

impl Default for OperatingConfig {
    fn default() -> Self {
        Self {
            wind_speed: DEFAULT_WIND_SPEED,
            wind_direction: DEFAULT_WIND_DIRECTION,
            hours_per_year: HOURS_PER_YEAR,
        }
    }
}

impl OperatingConfig {
    pub fn operating_point(&self) -> OperatingPoint {
        OperatingPoint {
            wind_speed: self.wind_speed,
            wind_direction: self.wind_direction,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"method.samples"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl From<ConfigError> for UqError {
    fn from(e: ConfigError) -> Self {
        UqError::Config(format!("{}: {}", e.field, e.message))
    }
}

impl StudyConfig {
    /// Returns the default study: wind-rose direction, rectangle rule, 20 samples.
    pub fn direction_rect() -> Self {
        Self {
            method: MethodConfig::default(),
            distribution: DistributionConfig::default(),
            operating: OperatingConfig::default(),
        }
    }

    /// Returns the speed study: truncated Weibull, rectangle rule.
    pub fn speed_rect() -> Self {
        Self {
            method: MethodConfig {
                uncertain_var: "speed".to_string(),
                n_offset: 1,
                ..MethodConfig::default()
            },
            distribution: DistributionConfig::Weibull {
                shape: 2.0,
                scale: 8.0,
                upper: default_weibull_upper(),
            },
            operating: OperatingConfig::default(),
        }
    }

    /// Returns the Dakota direction study: points chosen by the external driver.
    pub fn direction_dakota() -> Self {
        Self {
            method: MethodConfig {
                method: "dakota".to_string(),
                ..MethodConfig::default()
            },
            distribution: DistributionConfig::default(),
            operating: OperatingConfig::default(),
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["direction_rect", "speed_rect", "direction_dakota"];

    /// Loads a study from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> std::result::Result<Self, ConfigError> {
        match name {
            "direction_rect" => Ok(Self::direction_rect()),
            "speed_rect" => Ok(Self::speed_rect()),
            "direction_dakota" => Ok(Self::direction_dakota()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a study from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> std::result::Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a study from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> std::result::Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let m = &self.method;

        let method = m.method.parse::<Method>();
        if let Err(e) = &method {
            errors.push(ConfigError {
                field: "method.method".into(),
                message: e.to_string(),
            });
        }
        let variable = m.uncertain_var.parse::<UncertainVariable>();
        if let Err(e) = &variable {
            errors.push(ConfigError {
                field: "method.uncertain_var".into(),
                message: e.to_string(),
            });
        }
        if m.samples == 0 {
            errors.push(ConfigError {
                field: "method.samples".into(),
                message: "must be > 0".into(),
            });
        }
        if m.n_offset == 0 {
            errors.push(ConfigError {
                field: "method.n_offset".into(),
                message: "must be > 0".into(),
            });
        } else if m.offset >= m.n_offset {
            errors.push(ConfigError {
                field: "method.offset".into(),
                message: format!("must be < method.n_offset ({})", m.n_offset),
            });
        }

        match self.distribution.build() {
            Ok(dist) => {
                if let Ok(variable) = variable {
                    if let Err(e) = variable.check_domain(&dist.domain()) {
                        errors.push(ConfigError {
                            field: "distribution.kind".into(),
                            message: e.to_string(),
                        });
                    }
                }
            }
            Err(e) => errors.push(ConfigError {
                field: "distribution".into(),
                message: e.to_string(),
            }),
        }

        let op = &self.operating;
        if !(op.wind_speed.is_finite() && op.wind_speed >= 0.0) {
            errors.push(ConfigError {
                field: "operating.wind_speed".into(),
                message: "must be finite and >= 0".into(),
            });
        }
        if !(0.0..360.0).contains(&op.wind_direction) {
            errors.push(ConfigError {
                field: "operating.wind_direction".into(),
                message: "must be in [0, 360)".into(),
            });
        }
        if !(op.hours_per_year.is_finite() && op.hours_per_year > 0.0) {
            errors.push(ConfigError {
                field: "operating.hours_per_year".into(),
                message: "must be > 0".into(),
            });
        }

        errors
    }

    /// Builds the typed method description.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field as a configuration error.
    pub fn method_spec(&self) -> Result<MethodSpec> {
        let m = &self.method;
        let method: Method = m.method.parse()?;
        let variable: UncertainVariable = m.uncertain_var.parse()?;
        let distribution = self.distribution.build()?;
        Ok(MethodSpec::new(method, variable, distribution)
            .with_offset(m.offset, m.n_offset)
            .with_driver_input(m.driver_input.clone()))
    }
}
