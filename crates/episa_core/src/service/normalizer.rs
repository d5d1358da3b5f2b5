//! Sample normalization: input descriptors to a `(n_samples, n_inputs)`
//! matrix, output descriptors to a `(n_samples, n_outputs)` matrix.

use ndarray::{Array2, ArrayView2, Axis, s};

use crate::error::ShapeMismatch;
use crate::model::{InputParameter, OutputValues, OutputVariable};

/// Inputs after validation
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedInputs {
    pub names: Vec<String>,
    pub bounds: Vec<[f64; 2]>,
    /// `(n_samples, n_inputs)`, columns in descriptor order
    pub samples: Array2<f64>,
    pub n_samples: usize,
}

/// Outputs after validation
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedOutputs {
    pub names: Vec<String>,
    /// `(n_samples, n_outputs)`, columns in descriptor order
    pub values: Array2<f64>,
}

pub fn normalize_inputs(inputs: &[InputParameter]) -> Result<NormalizedInputs, ShapeMismatch> {
    let sizes: Vec<usize> = inputs.iter().map(|input| input.samples.len()).collect();
    let n_samples = sizes.first().copied().unwrap_or(0);
    if sizes.iter().any(|&size| size != n_samples) {
        return Err(ShapeMismatch::UnequalInputSamples { sizes });
    }

    let bounds = inputs
        .iter()
        .map(|input| {
            input
                .bounds
                .or_else(|| input.observed_bounds())
                .ok_or_else(|| ShapeMismatch::EmptyInput {
                    name: input.name.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let samples = Array2::from_shape_fn((n_samples, inputs.len()), |(i, j)| inputs[j].samples[i]);

    Ok(NormalizedInputs {
        names: inputs.iter().map(|input| input.name.clone()).collect(),
        bounds,
        samples,
        n_samples,
    })
}

/// Orient one output so that rows are samples
fn orient(output: &OutputVariable, n_samples: usize) -> Result<Array2<f64>, ShapeMismatch> {
    let values = &output.values;
    if values.size() == n_samples {
        let column = values.flatten();
        return Ok(column.insert_axis(Axis(1)));
    }

    let mismatch = || ShapeMismatch::OutputDimensions {
        name: output.names.label().to_string(),
        shape: values.shape(),
        n_samples,
    };
    match values {
        OutputValues::Matrix(m) if m.nrows() == n_samples => Ok(m.clone()),
        OutputValues::Matrix(m) if m.ncols() == n_samples => Ok(m.t().to_owned()),
        _ => Err(mismatch()),
    }
}

/// Names for an output with `multiplicity` columns; a single name is indexed
/// as `name[i]`
fn expand_names(output: &OutputVariable, multiplicity: usize) -> Result<Vec<String>, ShapeMismatch> {
    let supplied = output.names.as_slice();
    match supplied {
        [single] if multiplicity > 1 => Ok((0..multiplicity).map(|i| format!("{single}[{i}]")).collect()),
        _ if supplied.len() == multiplicity => Ok(supplied.to_vec()),
        _ => Err(ShapeMismatch::OutputNames {
            name: output.names.label().to_string(),
            multiplicity,
            supplied: supplied.len(),
        }),
    }
}

pub fn normalize_outputs(
    outputs: &[OutputVariable],
    n_samples: usize,
) -> Result<NormalizedOutputs, ShapeMismatch> {
    let mut blocks = Vec::with_capacity(outputs.len());
    let mut names = Vec::new();
    for output in outputs {
        let block = orient(output, n_samples)?;
        names.extend(expand_names(output, block.ncols())?);
        blocks.push(block);
    }

    let n_outputs = blocks.iter().map(Array2::ncols).sum();
    let mut values = Array2::zeros((n_samples, n_outputs));
    let mut col = 0;
    for block in &blocks {
        values
            .slice_mut(s![.., col..col + block.ncols()])
            .assign(block);
        col += block.ncols();
    }

    Ok(NormalizedOutputs { names, values })
}

/// Copy of the selected columns, in selection order
pub(crate) fn select_columns(matrix: ArrayView2<'_, f64>, ids: &[usize]) -> Array2<f64> {
    Array2::from_shape_fn((matrix.nrows(), ids.len()), |(i, j)| matrix[[i, ids[j]]])
}
