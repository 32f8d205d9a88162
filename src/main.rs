//! windfarm-uq entry point: point generation, convergence studies and config checks.

use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;

use windfarm_uq::cli::{Cli, Commands, init_logging};
use windfarm_uq::conditions::WindConditions;
use windfarm_uq::config::{EXAMPLE_CONFIG, StudyConfig};
use windfarm_uq::convergence::{StudySetup, run_convergence};
use windfarm_uq::io::export::export_samples_csv;
use windfarm_uq::layout::Layout;
use windfarm_uq::power::PowerTable;
use windfarm_uq::{Generated, generate};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Example = cli.command {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    let config = cli.load_config().map_err(anyhow::Error::msg)?;

    match &cli.command {
        Commands::Points {
            samples,
            samples_out,
            points_table,
        } => run_points(
            &config,
            *samples,
            samples_out.as_deref(),
            points_table.as_deref(),
        ),
        Commands::Convergence {
            power_table,
            min,
            max,
            step,
            layout_file,
            record_out,
        } => run_study(
            &config,
            power_table,
            (*min, max.unwrap_or(config.method.samples), *step),
            layout_file.as_deref(),
            record_out,
        ),
        Commands::Validate => {
            ensure_valid(&config)?;
            println!("Configuration is valid");
            Ok(())
        }
        Commands::Example => Ok(()),
    }
}

/// Prints every validation error and fails if there was any.
fn ensure_valid(config: &StudyConfig) -> Result<()> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    for e in &errors {
        eprintln!("{e}");
    }
    bail!("{} configuration error(s)", errors.len())
}

fn run_points(
    config: &StudyConfig,
    samples: Option<usize>,
    samples_out: Option<&Path>,
    points_table: Option<&Path>,
) -> Result<()> {
    ensure_valid(config)?;
    let spec = config.method_spec()?;
    let n = samples.unwrap_or(config.method.samples);

    let set = match generate(&spec, n)? {
        Generated::Samples(set) => set,
        Generated::Delegated(request) => {
            let Some(table) = points_table else {
                bail!(
                    "the dakota method places points externally: run dakota -i {} and pass \
                     the points it chose with --points-table",
                    request.input_file.display()
                );
            };
            request
                .resolve_table(table)
                .with_context(|| format!("resolving driver points from {}", table.display()))?
        }
    };

    let conditions =
        WindConditions::from_samples(spec.variable, &set, &config.operating.operating_point());
    print!("{conditions}");
    println!("weights sum to {:.12}", set.weight_sum());

    if let Some(path) = samples_out {
        export_samples_csv(&conditions, &set, path)
            .with_context(|| format!("writing samples to {}", path.display()))?;
        info!(path = %path.display(), n = set.len(), "samples exported");
    }
    Ok(())
}

fn run_study(
    config: &StudyConfig,
    power_table: &Path,
    (min, max, step): (usize, usize, usize),
    layout_file: Option<&Path>,
    record_out: &Path,
) -> Result<()> {
    ensure_valid(config)?;
    if min == 0 || step == 0 || min > max {
        bail!("sample counts need 1 <= min <= max and step >= 1, got {min}..={max} by {step}");
    }
    let spec = config.method_spec()?;

    let table = PowerTable::from_csv_path(power_table, spec.variable)
        .with_context(|| format!("loading power table {}", power_table.display()))?;
    let layout = layout_file
        .map(Layout::from_path)
        .transpose()
        .context("loading layout file")?;

    let setup = StudySetup {
        spec: &spec,
        operating: config.operating.operating_point(),
        hours_per_year: config.operating.hours_per_year,
        layout_name: &config.method.layout,
        layout: layout.as_ref(),
    };
    let record = run_convergence(&setup, (min..=max).step_by(step), &table)?;

    for ((n, mean), std) in record.samples.iter().zip(&record.mean).zip(&record.std) {
        println!("{n:>5}  mean = {mean:.6} GWhrs  std = {std:.6} GWhrs");
    }
    record
        .write_json(record_out)
        .with_context(|| format!("writing run record {}", record_out.display()))?;
    info!(path = %record_out.display(), "run record written");
    Ok(())
}
