use ndarray::Array2;
use rand::Rng;

use super::{require_variables, scale_samples};
use crate::error::SamplingError;
use crate::model::ProblemDescriptor;

/// Saltelli cross-sampling scheme for Sobol' analysis.
///
/// For each of the `n` base rows the block is `A`, the `D` rows `AB_j`
/// (column `j` taken from `B`), the `D` rows `BA_j` when second-order indices
/// are wanted, then `B`. The base matrix `[A | B]` is drawn uniformly.
pub fn saltelli<R: Rng + ?Sized>(
    problem: &ProblemDescriptor,
    n: usize,
    calc_second_order: bool,
    rng: &mut R,
) -> Result<Array2<f64>, SamplingError> {
    let d = require_variables(problem)?;
    let step = if calc_second_order { 2 * d + 2 } else { d + 2 };
    let mut samples = Array2::zeros((n * step, d));

    let mut row = 0;
    for _ in 0..n {
        let a: Vec<f64> = (0..d).map(|_| rng.random()).collect();
        let b: Vec<f64> = (0..d).map(|_| rng.random()).collect();

        samples.row_mut(row).iter_mut().zip(&a).for_each(|(s, &v)| *s = v);
        row += 1;

        for k in 0..d {
            for j in 0..d {
                samples[[row, j]] = if j == k { b[j] } else { a[j] };
            }
            row += 1;
        }

        if calc_second_order {
            for k in 0..d {
                for j in 0..d {
                    samples[[row, j]] = if j == k { a[j] } else { b[j] };
                }
                row += 1;
            }
        }

        samples.row_mut(row).iter_mut().zip(&b).for_each(|(s, &v)| *s = v);
        row += 1;
    }

    scale_samples(&mut samples, &problem.bounds);
    Ok(samples)
}
