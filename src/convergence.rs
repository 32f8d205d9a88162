//! Sample-count convergence study: how the AEP estimate settles as the
//! rectangle rule is refined.

use tracing::info;

use crate::conditions::{OperatingPoint, WindConditions};
use crate::error::{Result, UqError};
use crate::layout::Layout;
use crate::power::{PowerModel, evaluate_power};
use crate::quadrature::{Generated, Method, MethodSpec, generate};
use crate::record::RunRecord;
use crate::statistics::AepStatistics;

/// Inputs that stay fixed across the study.
#[derive(Debug, Clone)]
pub struct StudySetup<'a> {
    pub spec: &'a MethodSpec,
    pub operating: OperatingPoint,
    pub hours_per_year: f64,
    /// Layout identifier written to the record.
    pub layout_name: &'a str,
    /// Turbine coordinates written to the record, if known.
    pub layout: Option<&'a Layout>,
}

/// Runs generate → evaluate → statistics for every sample count in `counts`.
///
/// Returns the run record with one mean/std entry per count and the wind and
/// power arrays of the last count.
///
/// # Errors
///
/// Fails for an empty `counts`, for the external method (its points come from
/// the driver, not from a local sweep), and on any generation or model error.
pub fn run_convergence(
    setup: &StudySetup<'_>,
    counts: impl IntoIterator<Item = usize>,
    model: &impl PowerModel,
) -> Result<RunRecord> {
    if setup.spec.method == Method::External {
        return Err(UqError::Config(
            "convergence sweeps need the rect method; dakota points come from the driver".into(),
        ));
    }

    let mut mean = Vec::new();
    let mut std = Vec::new();
    let mut samples_studied = Vec::new();
    let mut last: Option<(WindConditions, Vec<f64>)> = None;

    for n in counts {
        let Generated::Samples(samples) = generate(setup.spec, n)? else {
            return Err(UqError::Config("rect method returned no samples".into()));
        };
        let conditions = WindConditions::from_samples(setup.spec.variable, &samples, &setup.operating);
        let power = evaluate_power(model, &conditions)?;
        let stats = AepStatistics::from_power(&samples, &power, setup.hours_per_year)?;
        info!(
            n,
            mean_gwh = stats.mean_gwh(),
            std_gwh = stats.std_gwh(),
            "convergence step"
        );

        mean.push(stats.mean_gwh());
        std.push(stats.std_gwh());
        samples_studied.push(n);
        last = Some((conditions, power));
    }

    let (conditions, power) =
        last.ok_or_else(|| UqError::Config("convergence study needs at least one sample count".into()))?;

    Ok(RunRecord {
        mean,
        std,
        samples: samples_studied,
        winddirections: conditions.directions,
        windspeeds: conditions.speeds,
        power,
        method: setup.spec.method.to_string(),
        uncertain_variable: setup.spec.variable.to_string(),
        layout: setup.layout_name.to_string(),
        turbine_x: setup.layout.map(|l| l.turbine_x.clone()),
        turbine_y: setup.layout.map(|l| l.turbine_y.clone()),
    })
}
