//! Tests for output selection and result aggregation
//!
//! These tests verify:
//! - The worked delta example from the service documentation
//! - One analyzer call per selected output, in ascending index order
//! - Input selection builds the problem descriptor
//! - Results are reproducible for a fixed seed

use ndarray::Array2;

use crate::error::{ConfigurationError, Error};
use crate::model::{InputParameter, OutputVariable};
use crate::service::{
    DeltaOptions, Method, MethodOptions, RunRequest, SensitivityAnalysisService, ServiceConfig,
};

fn quick_delta() -> MethodOptions {
    MethodOptions::Delta(DeltaOptions {
        num_resamples: 30,
        ..Default::default()
    })
}

/// Service with 3 inputs and 5 outputs over 40 samples
fn five_output_service(seed: u64) -> SensitivityAnalysisService {
    let n = 40;
    let x = |k: usize| -> Vec<f64> { (0..n).map(|i| ((i * (k + 3)) % n) as f64 / n as f64).collect() };
    let inputs = vec![
        InputParameter::new("x0", x(0)),
        InputParameter::new("K", x(1)),
        InputParameter::new("e", x(2)),
    ];
    let values = Array2::from_shape_fn((n, 5), |(i, j)| {
        let (a, b, c) = (inputs[0].samples[i], inputs[1].samples[i], inputs[2].samples[i]);
        (j as f64 + 1.0) * a + b * b - 0.5 * c
    });
    let outputs = vec![OutputVariable::new("region", values)];
    let config = ServiceConfig {
        seed,
        ..Default::default()
    };
    SensitivityAnalysisService::new(&inputs, &outputs, config).unwrap()
}

/// The worked example: two inputs over four samples, one output, delta method
#[test]
fn test_delta_worked_example() {
    let inputs = vec![
        InputParameter::new("a", vec![0.0, 1.0, 2.0, 3.0]),
        InputParameter::new("b", vec![1.0, 1.0, 1.0, 1.0]),
    ];
    let outputs = vec![OutputVariable::new(vec!["y"], vec![10.0, 20.0, 30.0, 40.0])];
    let config = ServiceConfig::new("delta", true, 0.95, 42).unwrap();
    let mut service = SensitivityAnalysisService::new(&inputs, &outputs, config).unwrap();

    assert_eq!(service.n_samples(), 4);
    assert_eq!(service.n_inputs(), 2);
    assert_eq!(service.n_outputs(), 1);

    let results = service.run(RunRequest::new()).unwrap();
    assert_eq!(results.output_names, vec!["y"]);
    for key in ["delta", "delta_conf", "S1", "S1_conf"] {
        let entries = results.get(key).unwrap_or_else(|| panic!("missing {key}"));
        assert_eq!(entries.len(), 1, "{key} should hold one entry per output");
        assert_eq!(entries[0].len(), 2, "{key} should hold one value per input");
    }
}

/// Selecting output 2 of 5 analyzes only that column
#[test]
fn test_single_output_selection() {
    let mut service = five_output_service(7);
    let results = service
        .run(RunRequest::new().outputs([2]).options(quick_delta()))
        .unwrap();

    assert_eq!(results.num_outputs(), 1);
    assert_eq!(results.output_names, vec!["region[2]"]);
    assert_eq!(results.get("delta").map(<[_]>::len), Some(1));
}

/// Outputs are processed in ascending index order, each once
#[test]
fn test_outputs_processed_in_ascending_order() {
    let mut service = five_output_service(7);
    let results = service
        .run(RunRequest::new().outputs([4, 1, 3, 1]).options(quick_delta()))
        .unwrap();
    assert_eq!(results.output_names, vec!["region[1]", "region[3]", "region[4]"]);
    assert_eq!(results.stacked("S1").unwrap().dim(), (3, 3));
}

/// A column's result does not depend on which other columns are analyzed
#[test]
fn test_output_result_independent_of_selection() {
    let mut service = five_output_service(11);
    let alone = service
        .run(RunRequest::new().outputs([3]).options(quick_delta()))
        .unwrap();
    let together = service
        .run(RunRequest::new().outputs([0, 3]).options(quick_delta()))
        .unwrap();

    assert_eq!(alone.get("delta").unwrap()[0], together.get("delta").unwrap()[1]);
}

/// Input selection restricts the problem descriptor, in selection order
#[test]
fn test_input_selection_builds_problem() {
    let mut service = five_output_service(7);
    let results = service
        .run(RunRequest::new().inputs([2, 0]).options(quick_delta()))
        .unwrap();

    let problem = service.problem();
    assert_eq!(problem.num_vars, 2);
    assert_eq!(problem.names, vec!["e", "x0"]);
    assert_eq!(results.stacked("delta").unwrap().dim(), (5, 2));
}

/// Out-of-range and empty selections are configuration errors
#[test]
fn test_bad_selections() {
    let mut service = five_output_service(7);
    assert!(matches!(
        service.run(RunRequest::new().outputs([5])),
        Err(Error::Configuration(ConfigurationError::IndexOutOfRange {
            kind: "output",
            index: 5,
            len: 5
        }))
    ));
    assert!(matches!(
        service.run(RunRequest::new().inputs(Vec::new())),
        Err(Error::Configuration(ConfigurationError::EmptySelection { kind: "input" }))
    ));
}

/// Same seed, same results; a different seed changes the bootstrap intervals
#[test]
fn test_seed_reproducibility() {
    let run = |seed| {
        five_output_service(seed)
            .run(RunRequest::new().outputs([0]).options(quick_delta()))
            .unwrap()
    };
    let (a, b, c) = (run(1), run(1), run(2));

    assert_eq!(a, b);
    assert_ne!(a.get("delta_conf"), c.get("delta_conf"));
    assert_eq!(a.method, Method::Delta);
}
