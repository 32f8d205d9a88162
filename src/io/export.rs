//! CSV export of the sample locations and weights.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::conditions::WindConditions;
use crate::error::{Result, UqError};
use crate::quadrature::SampleSet;

/// Column header for the samples CSV.
const HEADER: &str = "index,windspeed,winddirection,weight";

/// Exports the sample conditions and weights to a CSV file at the given path.
///
/// Writes a header row followed by one data row per sample. Produces
/// deterministic output for identical inputs.
///
/// # Arguments
///
/// * `conditions` - Wind speed/direction per sample
/// * `samples` - Quadrature points and weights the conditions came from
/// * `path` - Output file path
///
/// # Errors
///
/// Returns a length mismatch if `conditions` and `samples` differ in length,
/// or an I/O / CSV error.
pub fn export_samples_csv(conditions: &WindConditions, samples: &SampleSet, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| UqError::io_at("create", path, e))?;
    let buf = io::BufWriter::new(file);
    write_samples_csv(conditions, samples, buf)
}

/// Writes the samples CSV to any writer.
///
/// # Errors
///
/// See [`export_samples_csv`].
pub fn write_samples_csv(
    conditions: &WindConditions,
    samples: &SampleSet,
    writer: impl Write,
) -> Result<()> {
    if conditions.len() != samples.len() {
        return Err(UqError::LengthMismatch(format!(
            "{} conditions for {} samples",
            conditions.len(),
            samples.len()
        )));
    }

    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    wtr.write_record(HEADER.split(','))?;

    // Data rows
    for (i, ((speed, direction), weight)) in conditions
        .iter()
        .zip(samples.weights().iter())
        .enumerate()
    {
        wtr.write_record(&[
            (i + 1).to_string(),
            format!("{speed:.6}"),
            format!("{direction:.6}"),
            format!("{weight:.12}"),
        ])?;
    }

    wtr.flush().map_err(|e| UqError::io("cannot flush samples CSV", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::OperatingPoint;
    use crate::quadrature::UncertainVariable;

    fn fixture() -> (WindConditions, SampleSet) {
        let samples = SampleSet::new(vec![90.0, 270.0], vec![0.25, 0.75]).expect("valid");
        let conditions = WindConditions::from_samples(
            UncertainVariable::Direction,
            &samples,
            &OperatingPoint::default(),
        );
        (conditions, samples)
    }

    #[test]
    fn header_and_one_row_per_sample() {
        let (conditions, samples) = fixture();
        let mut out = Vec::new();
        write_samples_csv(&conditions, &samples, &mut out).expect("csv export should succeed");
        let text = String::from_utf8(out).expect("csv output should be valid UTF-8");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(HEADER));
        assert_eq!(
            lines.next(),
            Some("1,8.000000,90.000000,0.250000000000")
        );
        assert_eq!(lines.count(), 1);
    }

    #[test]
    fn export_is_deterministic() {
        let (conditions, samples) = fixture();
        let mut a = Vec::new();
        let mut b = Vec::new();
        write_samples_csv(&conditions, &samples, &mut a).expect("first export");
        write_samples_csv(&conditions, &samples, &mut b).expect("second export");
        assert_eq!(a, b);
    }

    #[test]
    fn mismatched_inputs_rejected() {
        let (conditions, _) = fixture();
        let other = SampleSet::new(vec![1.0], vec![1.0]).expect("valid");
        assert!(write_samples_csv(&conditions, &other, Vec::<u8>::new()).is_err());
    }
}
