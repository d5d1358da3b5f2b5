//! Morris elementary-effects screening.

use ndarray::ArrayView1;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::stats::{bootstrap_indices, derive_seed, mean, std_dev, z_score};
use super::{AnalysisContext, Analyzer, require_multiple, require_rows, require_variables};
use crate::error::AnalysisError;
use crate::model::{Statistic, Statistics};
use crate::service::{MethodFamily, MorrisOptions};

#[derive(Debug, Clone)]
pub struct MorrisAnalyzer {
    options: MorrisOptions,
}

impl MorrisAnalyzer {
    pub fn new(options: MorrisOptions) -> Self {
        Self { options }
    }

    /// Step between grid levels, as a fraction of the unit range
    fn delta(&self) -> f64 {
        self.options.grid_jump as f64 / (self.options.num_levels - 1) as f64
    }
}

/// Elementary effects, `ee[variable][trajectory]`.
///
/// Within a trajectory each step moves exactly one variable; the effect is
/// the output change divided by `delta`, signed by the direction of the move.
fn elementary_effects(
    ctx: &AnalysisContext<'_>,
    y: &[f64],
    d: usize,
    trajectories: usize,
    delta: f64,
) -> Vec<Vec<f64>> {
    let mut ee = vec![vec![0.0; trajectories]; d];
    for t in 0..trajectories {
        let base = t * (d + 1);
        for step in 1..=d {
            let (prev, row) = (base + step - 1, base + step);
            let moved = (0..d).find_map(|j| {
                let diff = ctx.inputs[[row, j]] - ctx.inputs[[prev, j]];
                (diff != 0.0).then(|| (j, diff.signum()))
            });
            if let Some((j, sign)) = moved {
                ee[j][t] = sign * (y[row] - y[prev]) / delta;
            }
        }
    }
    ee
}

impl Analyzer for MorrisAnalyzer {
    fn family(&self) -> MethodFamily {
        MethodFamily::Morris
    }

    fn analyze(
        &self,
        ctx: &AnalysisContext<'_>,
        output: ArrayView1<'_, f64>,
    ) -> Result<Statistics, AnalysisError> {
        let d = require_variables(self.family(), ctx.problem)?;
        require_rows(self.family(), &ctx.inputs, output.len())?;
        let trajectories = require_multiple(self.family(), output.len(), d + 1)?;

        let y = output.to_vec();
        let ee = elementary_effects(ctx, &y, d, trajectories, self.delta());
        let z = z_score(ctx.conf_level);

        let mut mu = Vec::with_capacity(d);
        let mut mu_star = Vec::with_capacity(d);
        let mut sigma = Vec::with_capacity(d);
        let mut mu_star_conf = Vec::with_capacity(d);
        for (j, effects) in ee.iter().enumerate() {
            let abs: Vec<f64> = effects.iter().map(|e| e.abs()).collect();
            let mut rng = SmallRng::seed_from_u64(derive_seed(ctx.seed, j as u64));
            let resampled: Vec<f64> = (0..self.options.num_resamples)
                .map(|_| {
                    let r = bootstrap_indices(&mut rng, trajectories);
                    r.iter().map(|&i| abs[i]).sum::<f64>() / trajectories as f64
                })
                .collect();

            mu.push(mean(effects));
            mu_star.push(mean(&abs));
            sigma.push(std_dev(effects, 1));
            mu_star_conf.push(z * std_dev(&resampled, 1));
        }

        Ok(Statistics::from([
            ("mu".to_string(), Statistic::from(mu)),
            ("mu_star".to_string(), Statistic::from(mu_star)),
            ("sigma".to_string(), Statistic::from(sigma)),
            ("mu_star_conf".to_string(), Statistic::from(mu_star_conf)),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProblemDescriptor;
    use ndarray::array;

    #[test]
    fn test_effects_follow_direction_of_move() {
        let problem = ProblemDescriptor::new(
            vec!["a".into(), "b".into()],
            vec![[0.0, 1.0], [0.0, 1.0]],
        );
        // One trajectory: a goes up, then b goes down
        let inputs = array![[0.0, 1.0], [2.0 / 3.0, 1.0], [2.0 / 3.0, 1.0 / 3.0]];
        let ctx = AnalysisContext {
            problem: &problem,
            inputs: inputs.view(),
            conf_level: 0.95,
            calc_second_order: false,
            seed: 1,
        };
        // y = 3a + b
        let y = [1.0, 3.0, 3.0 - 2.0 / 3.0];
        let ee = elementary_effects(&ctx, &y, 2, 1, 2.0 / 3.0);
        assert!((ee[0][0] - 3.0).abs() < 1e-12);
        assert!((ee[1][0] - 1.0).abs() < 1e-12);
    }
}
