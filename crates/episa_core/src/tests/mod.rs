//! Integration tests for the sensitivity analysis service
//!
//! Tests are organized by topic:
//! - `normalizer` - Input/output shape validation and reshaping
//! - `dispatch` - Method selection, options and advisories
//! - `aggregate` - Output selection, ordering and merging of results
//! - `analyzers` - Numerical checks of every analysis routine
//! - `samplers` - Layout and range of the sample generators
//! - `simulator` - Simulation settings and simulator selection
//! - `snapshot` - Persistence snapshot contents

mod aggregate;
mod dispatch;
mod normalizer;
mod snapshot;

use ndarray::Array2;

use crate::model::{InputParameter, OutputVariable, ProblemDescriptor};
use crate::service::{Method, SensitivityAnalysisService, ServiceConfig};

/// Problem with every variable on `[0, 1]`
pub(crate) fn unit_problem(names: &[&str]) -> ProblemDescriptor {
    ProblemDescriptor::new(
        names.iter().map(|n| n.to_string()).collect(),
        vec![[0.0, 1.0]; names.len()],
    )
}

/// Service over the columns of `samples`, with the problem bounds made explicit
pub(crate) fn service_for(
    problem: &ProblemDescriptor,
    samples: &Array2<f64>,
    outputs: Vec<OutputVariable>,
    method: Method,
) -> SensitivityAnalysisService {
    let inputs: Vec<InputParameter> = problem
        .names
        .iter()
        .zip(&problem.bounds)
        .enumerate()
        .map(|(j, (name, &[low, high]))| {
            InputParameter::new(name.clone(), samples.column(j).to_vec()).with_bounds(low, high)
        })
        .collect();
    let config = ServiceConfig {
        method,
        ..Default::default()
    };
    SensitivityAnalysisService::new(&inputs, &outputs, config).unwrap()
}

/// `y = Σ coefficients[j] * x[j]` for every row of `samples`
pub(crate) fn linear_model(samples: &Array2<f64>, coefficients: &[f64]) -> Vec<f64> {
    samples
        .rows()
        .into_iter()
        .map(|row| row.iter().zip(coefficients).map(|(x, c)| x * c).sum())
        .collect()
}

/// Ishigami function with `a = 7`, `b = 0.1`
pub(crate) fn ishigami(samples: &Array2<f64>) -> Vec<f64> {
    samples
        .rows()
        .into_iter()
        .map(|x| x[0].sin() + 7.0 * x[1].sin().powi(2) + 0.1 * x[2].powi(4) * x[0].sin())
        .collect()
}
