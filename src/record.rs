//! Run-record JSON file written once per study.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UqError};

/// Summary of one study run.
///
/// Field names are part of the file contract read by post-processing tools.
/// `mean`, `std` and `samples` hold one entry per sample count studied; the
/// wind and power arrays belong to the last sample count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Mean AEP per sample count (GWh).
    pub mean: Vec<f64>,
    /// AEP standard deviation per sample count (GWh).
    pub std: Vec<f64>,
    pub samples: Vec<usize>,
    pub winddirections: Vec<f64>,
    pub windspeeds: Vec<f64>,
    /// Farm power at each condition of the last run (kW).
    pub power: Vec<f64>,
    pub method: String,
    pub uncertain_variable: String,
    pub layout: String,
    #[serde(rename = "turbineX", default, skip_serializing_if = "Option::is_none")]
    pub turbine_x: Option<Vec<f64>>,
    #[serde(rename = "turbineY", default, skip_serializing_if = "Option::is_none")]
    pub turbine_y: Option<Vec<f64>>,
}

impl RunRecord {
    /// Writes the record as indented JSON, creating or overwriting `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error naming the path or a JSON error.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| UqError::io_at("create", path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer
            .write_all(b"\n")
            .and_then(|_| writer.flush())
            .map_err(|e| UqError::io_at("write", path, e))
    }

    /// Reads a record written by [`Self::write_json`].
    ///
    /// # Errors
    ///
    /// Returns an I/O error naming the path or a JSON error.
    pub fn read_json(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| UqError::io_at("open", path, e))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> RunRecord {
        RunRecord {
            mean: vec![40.1, 40.3],
            std: vec![10.0, 10.2],
            samples: vec![10, 20],
            winddirections: vec![90.0, 270.0],
            windspeeds: vec![8.0, 8.0],
            power: vec![5000.0, 4000.0],
            method: "rect".into(),
            uncertain_variable: "direction".into(),
            layout: "grid".into(),
            turbine_x: None,
            turbine_y: None,
        }
    }

    #[test]
    fn json_uses_contract_field_names() {
        let mut r = record();
        r.turbine_x = Some(vec![0.0]);
        r.turbine_y = Some(vec![1.0]);
        let value = serde_json::to_value(&r).expect("serialize");
        for key in [
            "mean",
            "std",
            "samples",
            "winddirections",
            "windspeeds",
            "power",
            "method",
            "uncertain_variable",
            "layout",
            "turbineX",
            "turbineY",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn layout_coordinates_omitted_when_absent() {
        let value = serde_json::to_value(record()).expect("serialize");
        assert!(value.get("turbineX").is_none());
    }
}
