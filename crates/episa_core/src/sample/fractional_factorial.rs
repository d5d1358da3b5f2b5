use ndarray::Array2;

use super::{require_variables, scale_samples};
use crate::error::SamplingError;
use crate::model::ProblemDescriptor;

/// Sylvester–Hadamard matrix of order `k` (a power of two)
pub fn hadamard(k: usize) -> Array2<f64> {
    debug_assert!(k.is_power_of_two());
    Array2::from_shape_fn((k, k), |(i, j)| {
        if (i & j).count_ones() % 2 == 0 { 1.0 } else { -1.0 }
    })
}

/// Two-level design `[H; -H]` for the problem padded to a power of two
pub fn contrast(num_vars: usize) -> Array2<f64> {
    let k = num_vars.next_power_of_two();
    let h = hadamard(k);
    Array2::from_shape_fn((2 * k, k), |(i, j)| if i < k { h[[i, j]] } else { -h[[i - k, j]] })
}

/// Pad the problem with `dummy_<i>` variables on `[0, 1]` up to a power of two
pub fn extend_problem(problem: &ProblemDescriptor) -> ProblemDescriptor {
    let k = problem.num_vars.next_power_of_two();
    let mut names = problem.names.clone();
    let mut bounds = problem.bounds.clone();
    for i in 0..k - problem.num_vars {
        names.push(format!("dummy_{i}"));
        bounds.push([0.0, 1.0]);
    }
    ProblemDescriptor::new(names, bounds)
}

/// Fractional factorial design: `2·k` rows over the padded problem, each
/// variable at its lower or upper bound.
pub fn fractional_factorial(
    problem: &ProblemDescriptor,
) -> Result<(Array2<f64>, ProblemDescriptor), SamplingError> {
    require_variables(problem)?;
    let extended = extend_problem(problem);
    let mut samples = contrast(problem.num_vars).mapv(|c| (c + 1.0) / 2.0);
    scale_samples(&mut samples, &extended.bounds);
    Ok((samples, extended))
}
