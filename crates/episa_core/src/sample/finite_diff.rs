use ndarray::Array2;
use rand::Rng;

use super::{require_variables, scale_samples};
use crate::error::SamplingError;
use crate::model::ProblemDescriptor;

/// Base points with one-variable perturbations for derivative-based measures.
///
/// Each of the `n` groups is a base point scaled to the bounds followed by
/// `D` copies, copy `j` with `delta` added to variable `j`. `delta` must be
/// positive and finite.
pub fn finite_diff<R: Rng + ?Sized>(
    problem: &ProblemDescriptor,
    n: usize,
    delta: f64,
    rng: &mut R,
) -> Result<Array2<f64>, SamplingError> {
    let d = require_variables(problem)?;
    if !(delta > 0.0 && delta.is_finite()) {
        return Err(SamplingError::FiniteDiffStep { delta });
    }
    let mut base = Array2::from_shape_simple_fn((n, d), || rng.random::<f64>());
    scale_samples(&mut base, &problem.bounds);

    let mut samples = Array2::zeros((n * (d + 1), d));
    for (i, point) in base.rows().into_iter().enumerate() {
        for offset in 0..=d {
            let mut row = samples.row_mut(i * (d + 1) + offset);
            row.assign(&point);
            if offset > 0 {
                row[offset - 1] += delta;
            }
        }
    }
    Ok(samples)
}
