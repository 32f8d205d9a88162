//! Command-line surface of the `windfarm-uq` binary and shared logging setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::StudyConfig;

/// Preset used when neither `--config` nor `--preset` is given.
pub const DEFAULT_PRESET: &str = "direction_rect";

#[derive(Parser, Debug)]
#[command(name = "windfarm-uq")]
#[command(version)]
#[command(about = "Quadrature points and AEP statistics for wind-farm uncertainty studies")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a TOML study configuration
    #[arg(short, long, global = true, conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Built-in preset (direction_rect, speed_rect, direction_dakota)
    #[arg(short, long, global = true)]
    pub preset: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate sample points and weights and print the wind conditions
    Points {
        /// Override the configured sample count
        #[arg(short = 'n', long)]
        samples: Option<usize>,

        /// Write index, speed, direction and weight to a CSV file
        #[arg(long)]
        samples_out: Option<PathBuf>,

        /// Points table written by Dakota, resolves a dakota-method request
        #[arg(long)]
        points_table: Option<PathBuf>,
    },

    /// Sweep the sample count and record how the AEP estimate converges
    Convergence {
        /// CSV of farm power (kW) against the uncertain variable
        #[arg(long)]
        power_table: PathBuf,

        /// Smallest sample count
        #[arg(long, default_value = "1")]
        min: usize,

        /// Largest sample count (defaults to the configured count)
        #[arg(long)]
        max: Option<usize>,

        /// Sample count increment
        #[arg(long, default_value = "1")]
        step: usize,

        /// Two-column turbine coordinate file copied into the record
        #[arg(long)]
        layout_file: Option<PathBuf>,

        /// Run-record JSON output
        #[arg(long, default_value = "record.json")]
        record_out: PathBuf,
    },

    /// Validate the study configuration
    Validate,

    /// Show example configuration
    Example,
}

impl Cli {
    /// Loads the study from `--config`, `--preset`, or the default preset.
    ///
    /// # Errors
    ///
    /// Returns the loader's `ConfigError` rendered as a message.
    pub fn load_config(&self) -> Result<StudyConfig, String> {
        match (&self.config, &self.preset) {
            (Some(path), _) => StudyConfig::from_toml_file(path).map_err(|e| e.to_string()),
            (None, Some(name)) => StudyConfig::from_preset(name).map_err(|e| e.to_string()),
            (None, None) => StudyConfig::from_preset(DEFAULT_PRESET).map_err(|e| e.to_string()),
        }
    }
}

/// Installs a compact stderr subscriber, `RUST_LOG` taking precedence.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn,windfarm_uq=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second install (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("windfarm-uq").chain(args.iter().copied()))
    }

    #[test]
    fn points_with_overrides() {
        let cli = parse(&["points", "-n", "36", "--samples-out", "out.csv"]).expect("parse");
        match cli.command {
            Commands::Points {
                samples,
                samples_out,
                points_table,
            } => {
                assert_eq!(samples, Some(36));
                assert_eq!(samples_out, Some(PathBuf::from("out.csv")));
                assert!(points_table.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["validate", "--preset", "speed_rect", "-v"]).expect("parse");
        assert!(cli.verbose);
        assert_eq!(cli.preset.as_deref(), Some("speed_rect"));
    }

    #[test]
    fn config_and_preset_conflict() {
        assert!(parse(&["--config", "a.toml", "--preset", "speed_rect", "validate"]).is_err());
    }

    #[test]
    fn convergence_defaults() {
        let cli = parse(&["convergence", "--power-table", "p.csv"]).expect("parse");
        let Commands::Convergence {
            min,
            max,
            step,
            record_out,
            ..
        } = cli.command
        else {
            panic!("expected convergence");
        };
        assert_eq!((min, max, step), (1, None, 1));
        assert_eq!(record_out, PathBuf::from("record.json"));
    }

    #[test]
    fn convergence_requires_power_table() {
        assert!(parse(&["convergence"]).is_err());
    }

    #[test]
    fn default_config_is_default_preset() {
        let cli = parse(&["validate"]).expect("parse");
        let cfg = cli.load_config().expect("default preset loads");
        assert_eq!(cfg.method.uncertain_var, "direction");
    }

    #[test]
    fn unknown_preset_reported() {
        let cli = parse(&["validate", "--preset", "bogus"]).expect("parse");
        let err = cli.load_config().unwrap_err();
        assert!(err.contains("unknown preset"));
    }
}
