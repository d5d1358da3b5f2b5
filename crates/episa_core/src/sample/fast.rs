use std::f64::consts::PI;

use ndarray::Array2;
use rand::Rng;

use super::{require_variables, scale_samples};
use crate::error::SamplingError;
use crate::model::ProblemDescriptor;

/// Frequency assigned to the parameter of interest on each search curve
pub(crate) fn base_frequency(n: usize, m: usize) -> usize {
    n.saturating_sub(1) / (2 * m)
}

/// Frequencies for `d` parameters: `ω₀` for the parameter of interest
/// followed by the `d - 1` complementary frequencies.
pub(crate) fn frequencies(n: usize, m: usize, d: usize) -> Vec<usize> {
    let omega0 = base_frequency(n, m);
    let max_complementary = omega0 / (2 * m);
    let mut omega = Vec::with_capacity(d);
    omega.push(omega0);
    if d > 1 {
        if max_complementary >= d - 1 {
            let step = if d > 2 {
                (max_complementary - 1) as f64 / (d - 2) as f64
            } else {
                0.0
            };
            omega.extend((0..d - 1).map(|i| (1.0 + step * i as f64).floor() as usize));
        } else {
            omega.extend((0..d - 1).map(|i| i % max_complementary.max(1) + 1));
        }
    }
    omega
}

/// Extended FAST search curves.
///
/// Block `i` (rows `i·n..(i+1)·n`) drives parameter `i` at `ω₀` and the
/// others at the complementary frequencies, each curve with a random phase.
pub fn fast<R: Rng + ?Sized>(
    problem: &ProblemDescriptor,
    n: usize,
    m: usize,
    rng: &mut R,
) -> Result<Array2<f64>, SamplingError> {
    let d = require_variables(problem)?;
    let min = 4 * m * m;
    if m == 0 || n <= min {
        return Err(SamplingError::FastSampleSize { n, min });
    }

    let omega = frequencies(n, m, d);
    let s: Vec<f64> = (0..n).map(|k| 2.0 * PI * k as f64 / n as f64).collect();
    let mut samples = Array2::zeros((n * d, d));

    for i in 0..d {
        // ω₀ for parameter i, complementary frequencies for the rest in order
        let mut complementary = omega[1..].iter();
        let curve_omega: Vec<f64> = (0..d)
            .map(|j| {
                if j == i {
                    omega[0] as f64
                } else {
                    complementary.next().copied().unwrap_or_default() as f64
                }
            })
            .collect();
        let phi = 2.0 * PI * rng.random::<f64>();

        for (k, &sk) in s.iter().enumerate() {
            for (j, &w) in curve_omega.iter().enumerate() {
                samples[[i * n + k, j]] = 0.5 + (w * sk + phi).sin().asin() / PI;
            }
        }
    }

    scale_samples(&mut samples, &problem.bounds);
    Ok(samples)
}
