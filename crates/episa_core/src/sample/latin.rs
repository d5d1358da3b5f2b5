use ndarray::Array2;
use rand::Rng;
use rand::seq::SliceRandom;

use super::{require_variables, scale_samples};
use crate::error::SamplingError;
use crate::model::ProblemDescriptor;

/// Latin hypercube: each column holds one point from each of `n` equal strata,
/// in random order.
pub fn latin<R: Rng + ?Sized>(
    problem: &ProblemDescriptor,
    n: usize,
    rng: &mut R,
) -> Result<Array2<f64>, SamplingError> {
    let d = require_variables(problem)?;
    let width = 1.0 / n as f64;
    let mut samples = Array2::zeros((n, d));

    for mut column in samples.columns_mut() {
        let mut strata: Vec<f64> = (0..n)
            .map(|i| (i as f64 + rng.random::<f64>()) * width)
            .collect();
        strata.shuffle(rng);
        column.iter_mut().zip(strata).for_each(|(s, v)| *s = v);
    }

    scale_samples(&mut samples, &problem.bounds);
    Ok(samples)
}
