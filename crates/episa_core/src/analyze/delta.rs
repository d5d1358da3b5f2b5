//! Borgonovo's moment-independent delta measure with bias reduction, and a
//! binned first-order Sobol' estimate on the same sample.

use ndarray::ArrayView1;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::stats::{
    GaussianKde, bootstrap_indices, derive_seed, linspace, mean, ordinal_ranks, std_dev, trapz,
    variance, z_score,
};
use super::{AnalysisContext, Analyzer, require_rows, require_variables};
use crate::error::AnalysisError;
use crate::model::{Statistic, Statistics};
use crate::service::{DeltaOptions, MethodFamily};

/// Points of the output density grid
const GRID_POINTS: usize = 100;
/// Upper limit on conditioning classes
const MAX_CLASSES: f64 = 48.0;

#[derive(Debug, Clone)]
pub struct DeltaAnalyzer {
    options: DeltaOptions,
}

impl DeltaAnalyzer {
    pub fn new(options: DeltaOptions) -> Self {
        Self { options }
    }
}

/// Equiprobable class edges over ranks `0..=n`
fn class_edges(n: usize) -> Vec<f64> {
    let nf = n as f64;
    let exp = 2.0 / (7.0 + ((1500.0 - nf) / 500.0).tanh());
    let m = (nf.powf(exp).ceil()).min(MAX_CLASSES).round().max(1.0) as usize;
    linspace(0.0, nf, m + 1)
}

/// Row indices whose rank falls in each class
fn partition(x: &[f64], edges: &[f64]) -> Vec<Vec<usize>> {
    let ranks = ordinal_ranks(x);
    edges
        .windows(2)
        .map(|w| {
            ranks
                .iter()
                .enumerate()
                .filter(|&(_, &r)| (r as f64) > w[0] && (r as f64) <= w[1])
                .map(|(i, _)| i)
                .collect()
        })
        .collect()
}

fn density(data: &[f64], grid: &[f64]) -> Option<Vec<f64>> {
    GaussianKde::new(data).map(|kde| kde.evaluate(grid))
}

fn calc_delta(y: &[f64], grid: &[f64], x: &[f64], edges: &[f64]) -> f64 {
    let n = y.len() as f64;
    // A resample without spread has no density; its classes then add nothing
    let fy = density(y, grid).unwrap_or_else(|| vec![0.0; grid.len()]);

    partition(x, edges)
        .into_iter()
        .filter(|ix| !ix.is_empty())
        .map(|ix| {
            let y_ix: Vec<f64> = ix.iter().map(|&i| y[i]).collect();
            let diff: Vec<f64> = match density(&y_ix, grid) {
                Some(fyc) => fy.iter().zip(&fyc).map(|(a, b)| (a - b).abs()).collect(),
                None => fy.iter().map(|a| a.abs()).collect(),
            };
            (ix.len() as f64 / (2.0 * n)) * trapz(&diff, grid)
        })
        .sum()
}

fn sobol_first(y: &[f64], x: &[f64], edges: &[f64]) -> f64 {
    let n = y.len() as f64;
    let y_mean = mean(y);
    let vi: f64 = partition(x, edges)
        .into_iter()
        .filter(|ix| !ix.is_empty())
        .map(|ix| {
            let y_ix: Vec<f64> = ix.iter().map(|&i| y[i]).collect();
            (ix.len() as f64 / n) * (mean(&y_ix) - y_mean).powi(2)
        })
        .sum();
    vi / variance(y, 0)
}

fn pick(values: &[f64], idx: &[usize]) -> Vec<f64> {
    idx.iter().map(|&i| values[i]).collect()
}

impl Analyzer for DeltaAnalyzer {
    fn family(&self) -> MethodFamily {
        MethodFamily::Delta
    }

    fn analyze(
        &self,
        ctx: &AnalysisContext<'_>,
        output: ArrayView1<'_, f64>,
    ) -> Result<Statistics, AnalysisError> {
        let d = require_variables(self.family(), ctx.problem)?;
        require_rows(self.family(), &ctx.inputs, output.len())?;
        let n = output.len();
        if n < 2 {
            return Err(AnalysisError::TooFewSamples {
                family: self.family(),
                n,
                reason: "at least 2 samples are needed for a density estimate",
            });
        }

        let y = output.to_vec();
        let (y_min, y_max) = y
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let grid = linspace(y_min, y_max, GRID_POINTS);
        let edges = class_edges(n);
        let z = z_score(ctx.conf_level);
        let num_resamples = self.options.num_resamples;

        let mut delta = Vec::with_capacity(d);
        let mut delta_conf = Vec::with_capacity(d);
        let mut s1 = Vec::with_capacity(d);
        let mut s1_conf = Vec::with_capacity(d);

        for j in 0..d {
            let x = ctx.inputs.column(j).to_vec();
            let mut rng = SmallRng::seed_from_u64(derive_seed(ctx.seed, j as u64));

            let d_hat = calc_delta(&y, &grid, &x, &edges);
            let mut d_boot = Vec::with_capacity(num_resamples);
            let mut s_boot = Vec::with_capacity(num_resamples);
            for _ in 0..num_resamples {
                let r = bootstrap_indices(&mut rng, n);
                let (y_r, x_r) = (pick(&y, &r), pick(&x, &r));
                d_boot.push(2.0 * d_hat - calc_delta(&y_r, &grid, &x_r, &edges));
                s_boot.push(sobol_first(&y_r, &x_r, &edges));
            }

            delta.push(mean(&d_boot));
            delta_conf.push(z * std_dev(&d_boot, 1));
            s1.push(sobol_first(&y, &x, &edges));
            s1_conf.push(z * std_dev(&s_boot, 1));
        }

        Ok(Statistics::from([
            ("delta".to_string(), Statistic::from(delta)),
            ("delta_conf".to_string(), Statistic::from(delta_conf)),
            ("S1".to_string(), Statistic::from(s1)),
            ("S1_conf".to_string(), Statistic::from(s1_conf)),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_edges_small_sample() {
        // N = 4 gives two classes of two ranks each
        assert_eq!(class_edges(4), vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_class_edges_capped() {
        assert_eq!(class_edges(1_000_000).len(), 49);
    }

    #[test]
    fn test_partition_covers_all_rows() {
        let x = [0.4, 0.1, 0.3, 0.2];
        let classes = partition(&x, &[0.0, 2.0, 4.0]);
        assert_eq!(classes, vec![vec![1, 3], vec![0, 2]]);
    }
}
