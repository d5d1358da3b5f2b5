//! Tests for the persistence snapshot
//!
//! These tests verify:
//! - The snapshot reflects configuration, names and the last problem
//! - The `EPI_Type` metadata attribute is always set
//! - Snapshots survive a serialization round trip
//! - Default snapshot file name

use std::path::Path;

use crate::model::{InputParameter, OutputVariable};
use crate::service::{
    DeltaOptions, Method, MethodOptions, RunRequest, SensitivityAnalysisService, ServiceConfig,
};
use crate::snapshot::{DEFAULT_SNAPSHOT_FILENAME, EPI_TYPE, ServiceSnapshot, snapshot_path};

fn service() -> SensitivityAnalysisService {
    let inputs = vec![
        InputParameter::new("x0", vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]).with_bounds(0.0, 1.0),
        InputParameter::new("K", vec![5.0, 3.0, 1.0, 4.0, 2.0, 0.0]),
    ];
    let outputs = vec![OutputVariable::new("y", vec![1.0, 2.0, 2.5, 4.0, 3.0, 1.0])];
    let config = ServiceConfig::new("delta", false, 0.9, 3).unwrap();
    SensitivityAnalysisService::new(&inputs, &outputs, config).unwrap()
}

#[test]
fn test_snapshot_before_run() {
    let snapshot = service().snapshot();
    assert_eq!(snapshot.method, Method::Delta);
    assert!(!snapshot.calc_second_order);
    assert_eq!(snapshot.conf_level, 0.9);
    assert_eq!(snapshot.n_inputs, 2);
    assert_eq!(snapshot.n_outputs, 1);
    assert_eq!(snapshot.input_bounds, vec![[0.0, 1.0], [0.0, 5.0]]);
    assert_eq!(snapshot.problem.num_vars, 0);
    assert!(snapshot.other_parameters.is_none());
    assert_eq!(snapshot.metadata.get("EPI_Type").map(String::as_str), Some(EPI_TYPE));
}

#[test]
fn test_snapshot_after_run() {
    let mut service = service();
    let options = MethodOptions::Delta(DeltaOptions {
        num_resamples: 10,
        ..Default::default()
    });
    service
        .run(RunRequest::new().inputs([1]).options(options.clone()))
        .unwrap();

    let snapshot = service.snapshot();
    assert_eq!(snapshot.problem.names, vec!["K"]);
    assert_eq!(snapshot.problem.bounds, vec![[0.0, 5.0]]);
    assert_eq!(snapshot.other_parameters, Some(options));
    // The snapshot keeps every input, not just the selected ones
    assert_eq!(snapshot.input_names, vec!["x0", "K"]);
}

#[test]
fn test_snapshot_serde_round_trip() {
    let snapshot = service().snapshot();
    let json = serde_json::to_string(&snapshot).unwrap();
    let back: ServiceSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snapshot);
    assert!(json.contains("\"EPI_Type\":\"SensitivityAnalysisService\""));
}

#[test]
fn test_snapshot_path() {
    let folder = Path::new("/tmp/results");
    assert_eq!(
        snapshot_path(folder, None),
        folder.join(DEFAULT_SNAPSHOT_FILENAME)
    );
    assert_eq!(
        snapshot_path(folder, Some("sa.yaml")),
        folder.join("sa.yaml")
    );
}

#[test]
fn test_service_display() {
    let text = service().to_string();
    assert!(text.starts_with("SensitivityAnalysisService {"));
    assert!(text.contains("01. Method: delta"));
    assert!(text.contains("03. Confidence level: 0.9"));
    assert!(text.contains("07. Input names: [\"x0\", \"K\"]"));
}
