use ndarray::Array2;
use rand::Rng;
use rand::seq::SliceRandom;

use super::{require_variables, scale_samples};
use crate::error::SamplingError;
use crate::model::ProblemDescriptor;

/// One-at-a-time Morris trajectories on a `num_levels` grid.
///
/// Each trajectory has `D + 1` rows. Starting from a random grid point whose
/// coordinates leave room for a jump, the variables move one after another,
/// in random order and direction, by `grid_jump / (num_levels - 1)`.
pub fn morris<R: Rng + ?Sized>(
    problem: &ProblemDescriptor,
    trajectories: usize,
    num_levels: usize,
    grid_jump: usize,
    rng: &mut R,
) -> Result<Array2<f64>, SamplingError> {
    let d = require_variables(problem)?;
    if num_levels < 2 || grid_jump == 0 || grid_jump >= num_levels {
        return Err(SamplingError::MorrisGrid {
            num_levels,
            grid_jump,
        });
    }

    let levels = (num_levels - 1) as f64;
    let delta = grid_jump as f64 / levels;
    let mut samples = Array2::zeros((trajectories * (d + 1), d));

    for t in 0..trajectories {
        let start: Vec<f64> = (0..d)
            .map(|_| rng.random_range(0..num_levels - grid_jump) as f64 / levels)
            .collect();
        let upward: Vec<bool> = (0..d).map(|_| rng.random_bool(0.5)).collect();
        let mut order: Vec<usize> = (0..d).collect();
        order.shuffle(rng);

        // Step at which each variable moves
        let mut moves_at = vec![0; d];
        for (step, &j) in order.iter().enumerate() {
            moves_at[j] = step + 1;
        }

        for step in 0..=d {
            let row = t * (d + 1) + step;
            for j in 0..d {
                let moved = step >= moves_at[j];
                // Upward variables start low and end high, downward ones the reverse
                samples[[row, j]] = if moved == upward[j] {
                    start[j] + delta
                } else {
                    start[j]
                };
            }
        }
    }

    scale_samples(&mut samples, &problem.bounds);
    Ok(samples)
}
