//! Integration tests for AEP statistics, convergence studies and run records.

mod common;

use tempfile::tempdir;

use windfarm_uq::conditions::{OperatingPoint, WindConditions};
use windfarm_uq::convergence::{StudySetup, run_convergence};
use windfarm_uq::layout::Layout;
use windfarm_uq::power::{PowerModel, PowerTable, evaluate_power};
use windfarm_uq::record::RunRecord;
use windfarm_uq::statistics::{AepStatistics, HOURS_PER_YEAR};
use windfarm_uq::{UncertainVariable, generate};

fn direction_table() -> PowerTable {
    PowerTable::from_csv_reader(
        common::direction_power_csv().as_bytes(),
        UncertainVariable::Direction,
    )
    .expect("fixture table should load")
}

#[test]
fn constant_power_statistics() {
    let set = generate(&common::direction_spec(), 24)
        .expect("generate")
        .into_samples()
        .expect("samples");
    let power = vec![1500.0; set.len()];
    let stats = AepStatistics::from_power(&set, &power, HOURS_PER_YEAR).expect("stats");
    assert!((stats.mean - 1500.0 * HOURS_PER_YEAR).abs() < 1e-6);
    assert!(stats.std.abs() < 1e-6);
}

#[test]
fn power_length_mismatch_rejected() {
    let set = generate(&common::direction_spec(), 4)
        .expect("generate")
        .into_samples()
        .expect("samples");
    assert!(AepStatistics::from_power(&set, &[1.0, 2.0], HOURS_PER_YEAR).is_err());
}

#[test]
fn table_interpolation_wraps_across_north() {
    let table = PowerTable::new(
        UncertainVariable::Direction,
        vec![(10.0, 100.0), (180.0, 500.0), (350.0, 300.0)],
    )
    .expect("valid table");
    // 350 -> 370 spans 20 degrees from 300 kW to 100 kW
    assert!((table.interpolate(0.0) - 200.0).abs() < 1e-9);
    assert!((table.interpolate(360.0) - 200.0).abs() < 1e-9);
    assert!((table.interpolate(355.0) - 250.0).abs() < 1e-9);
    assert!((table.interpolate(95.0) - 300.0).abs() < 1e-9);
}

#[test]
fn speed_table_clamps_outside_range() {
    let table = PowerTable::new(
        UncertainVariable::Speed,
        vec![(3.0, 0.0), (12.0, 5000.0), (25.0, 5000.0)],
    )
    .expect("valid table");
    assert_eq!(table.interpolate(0.0), 0.0);
    assert_eq!(table.interpolate(30.0), 5000.0);
    let power = table.farm_power(7.5, 225.0).expect("evaluate");
    assert!((power - 2500.0).abs() < 1e-9);
}

#[test]
fn convergence_record_round_trips_through_json() {
    let dir = tempdir().expect("temp dir");
    let layout_path = common::write_file(
        dir.path(),
        "layout.txt",
        "# turbineX, turbineY\n0.0 0.0\n500.0 0.0\n0.0 500.0\n",
    );
    let layout = Layout::from_path(&layout_path).expect("layout parses");
    let spec = common::direction_spec();
    let setup = StudySetup {
        spec: &spec,
        operating: OperatingPoint::default(),
        hours_per_year: HOURS_PER_YEAR,
        layout_name: "triangle",
        layout: Some(&layout),
    };

    let table = direction_table();
    let record = run_convergence(&setup, (4..=36).step_by(8), &table).expect("study");
    assert_eq!(record.samples, vec![4, 12, 20, 28, 36]);
    assert_eq!(record.mean.len(), 5);
    assert_eq!(record.power.len(), 36);
    assert_eq!(record.windspeeds, vec![8.0; 36]);
    assert_eq!(record.turbine_x.as_deref(), Some(&[0.0, 500.0, 0.0][..]));

    let path = dir.path().join("record.json");
    record.write_json(&path).expect("write record");
    let back = RunRecord::read_json(&path).expect("read record");
    assert_eq!(back.samples, record.samples);
    assert_eq!(back.method, "rect");
    assert_eq!(back.uncertain_variable, "direction");
    assert_eq!(back.layout, "triangle");
    assert_eq!(back.turbine_y, record.turbine_y);
    assert_eq!(back.winddirections.len(), 36);
    for (a, b) in back.mean.iter().zip(&record.mean) {
        assert!((a - b).abs() <= 1e-12 * b.abs());
    }
}

#[test]
fn refinement_settles_the_mean() {
    let spec = common::direction_spec();
    let setup = StudySetup {
        spec: &spec,
        operating: OperatingPoint::default(),
        hours_per_year: HOURS_PER_YEAR,
        layout_name: "none",
        layout: None,
    };
    let record = run_convergence(&setup, [90, 180, 360], &direction_table()).expect("study");
    let last = record.mean[2];
    for m in &record.mean {
        assert!((m - last).abs() / last < 1e-2, "mean {m} far from {last}");
    }
    // power stays between 15 and 25 MW
    assert!(last > 15.0 * HOURS_PER_YEAR / 1e3 && last < 25.0 * HOURS_PER_YEAR / 1e3);
}

#[test]
fn evaluated_power_follows_conditions() {
    let set = generate(&common::speed_spec(), 10)
        .expect("generate")
        .into_samples()
        .expect("samples");
    let conditions =
        WindConditions::from_samples(UncertainVariable::Speed, &set, &OperatingPoint::default());
    let power = evaluate_power(&|speed: f64, _direction: f64| speed * 100.0, &conditions)
        .expect("evaluate");
    for (p, s) in power.iter().zip(set.points()) {
        assert!((p - s * 100.0).abs() < 1e-12);
    }
}
