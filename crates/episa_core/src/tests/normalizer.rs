//! Tests for input/output normalization at construction
//!
//! These tests verify:
//! - Input matrices follow descriptor order
//! - Unequal sample counts and unalignable outputs are rejected
//! - Output orientation and multiplicity
//! - Output name synthesis and validation

use ndarray::{Array2, array};

use crate::error::{Error, ShapeMismatch};
use crate::model::{InputParameter, OutputVariable};
use crate::service::{SensitivityAnalysisService, ServiceConfig};

fn inputs(n: usize) -> Vec<InputParameter> {
    vec![
        InputParameter::new("x0", (0..n).map(|i| i as f64).collect::<Vec<_>>()),
        InputParameter::new("K", (0..n).map(|i| 10.0 + i as f64).collect::<Vec<_>>()),
        InputParameter::new("e", (0..n).map(|i| -(i as f64)).collect::<Vec<_>>()),
    ]
}

fn build(
    inputs: &[InputParameter],
    outputs: &[OutputVariable],
) -> crate::Result<SensitivityAnalysisService> {
    SensitivityAnalysisService::new(inputs, outputs, ServiceConfig::default())
}

/// Input samples form an (n_samples, n_inputs) matrix in descriptor order
#[test]
fn test_input_matrix_shape_and_order() {
    let service = build(&inputs(6), &[]).unwrap();

    assert_eq!(service.n_samples(), 6);
    assert_eq!(service.input_samples().dim(), (6, 3));
    assert_eq!(service.input_names(), ["x0", "K", "e"]);
    assert_eq!(service.input_samples()[[5, 1]], 15.0);
    assert_eq!(service.input_samples()[[2, 2]], -2.0);
}

/// Unequal sample counts fail with the offending sizes
#[test]
fn test_unequal_input_samples_rejected() {
    let mut ins = inputs(4);
    ins.push(InputParameter::new("short", vec![1.0, 2.0]));

    let err = build(&ins, &[]).unwrap_err();
    assert_eq!(
        err,
        Error::Shape(ShapeMismatch::UnequalInputSamples {
            sizes: vec![4, 4, 4, 2]
        })
    );
}

/// Missing bounds default to the observed range; explicit bounds win
#[test]
fn test_bounds_default_to_observed_range() {
    let ins = vec![
        InputParameter::new("a", vec![3.0, -1.0, 2.0]),
        InputParameter::new("b", vec![0.5, 0.6, 0.7]).with_bounds(0.0, 1.0),
    ];
    let service = build(&ins, &[]).unwrap();
    assert_eq!(service.input_bounds(), [[-1.0, 3.0], [0.0, 1.0]]);
}

/// No inputs at all is a valid, empty configuration
#[test]
fn test_zero_inputs() {
    let service = build(&[], &[OutputVariable::new("y", Vec::<f64>::new())]).unwrap();
    assert_eq!(service.n_samples(), 0);
    assert_eq!(service.input_samples().dim(), (0, 0));
    assert_eq!(service.n_outputs(), 1);
}

/// An input without samples needs explicit bounds
#[test]
fn test_empty_input_without_bounds_rejected() {
    let err = build(&[InputParameter::new("a", Vec::<f64>::new())], &[]).unwrap_err();
    assert!(matches!(err, Error::Shape(ShapeMismatch::EmptyInput { .. })));

    let ok = build(
        &[InputParameter::new("a", Vec::<f64>::new()).with_bounds(0.0, 1.0)],
        &[],
    );
    assert!(ok.is_ok());
}

/// An output of size n_samples is one flattened column
#[test]
fn test_flat_output_is_single_column() {
    let matrix = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
    let service = build(&inputs(6), &[OutputVariable::new("y", matrix)]).unwrap();

    assert_eq!(service.n_outputs(), 1);
    assert_eq!(service.output_values().dim(), (6, 1));
    assert_eq!(
        service.output_values().column(0).to_vec(),
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
    );
}

/// (n_samples, k) and (k, n_samples) outputs both become k columns
#[test]
fn test_output_orientation() {
    let rows_are_samples = Array2::from_shape_fn((4, 3), |(i, j)| (10 * i + j) as f64);
    let cols_are_samples = rows_are_samples.t().to_owned();

    let a = build(&inputs(4), &[OutputVariable::new("r", rows_are_samples.clone())]).unwrap();
    let b = build(&inputs(4), &[OutputVariable::new("r", cols_are_samples)]).unwrap();

    assert_eq!(a.output_values(), &rows_are_samples);
    assert_eq!(b.output_values(), &rows_are_samples);
    assert_eq!(a.n_outputs(), 3);
}

/// A single name over k > 1 columns is indexed
#[test]
fn test_single_name_expanded() {
    let values = Array2::<f64>::zeros((5, 3));
    let service = build(&inputs(5), &[OutputVariable::new("X", values)]).unwrap();
    assert_eq!(service.output_names(), ["X[0]", "X[1]", "X[2]"]);
}

/// Name lists must match the output multiplicity
#[test]
fn test_name_count_mismatch_rejected() {
    let values = Array2::<f64>::zeros((5, 3));
    let err = build(&inputs(5), &[OutputVariable::new(vec!["a", "b"], values)]).unwrap_err();
    assert_eq!(
        err,
        Error::Shape(ShapeMismatch::OutputNames {
            name: "a".to_string(),
            multiplicity: 3,
            supplied: 2,
        })
    );
}

/// Neither axis matching n_samples is rejected with the actual shape
#[test]
fn test_unalignable_output_rejected() {
    let values = Array2::<f64>::zeros((3, 7));
    let err = build(&inputs(5), &[OutputVariable::new("y", values)]).unwrap_err();
    assert_eq!(
        err,
        Error::Shape(ShapeMismatch::OutputDimensions {
            name: "y".to_string(),
            shape: vec![3, 7],
            n_samples: 5,
        })
    );

    let short = OutputVariable::new("z", vec![1.0, 2.0]);
    assert!(matches!(
        build(&inputs(5), &[short]),
        Err(Error::Shape(ShapeMismatch::OutputDimensions { .. }))
    ));
}

/// Outputs are concatenated column-wise in descriptor order
#[test]
fn test_outputs_concatenated_in_order() {
    let outputs = vec![
        OutputVariable::new("first", vec![1.0, 2.0, 3.0]),
        OutputVariable::new(vec!["u", "v"], array![[4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]),
    ];
    let service = build(&inputs(3), &outputs).unwrap();

    assert_eq!(service.output_names(), ["first", "u", "v"]);
    assert_eq!(
        service.output_values(),
        &array![[1.0, 4.0, 7.0], [2.0, 5.0, 8.0], [3.0, 6.0, 9.0]]
    );
}
