//! Sobol' variance decomposition on Saltelli-scheme samples.
//!
//! First-order indices use the Saltelli (2010) estimator, total-order indices
//! the Jansen estimator, and second-order indices the closed second-order
//! variance minus both first-order terms. Confidence intervals come from
//! bootstrap resampling of the `N` base rows.

use ndarray::{Array2, ArrayView1};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::stats::{bootstrap_indices, derive_seed, mean, std_dev, variance, z_score};
use super::{AnalysisContext, Analyzer, require_multiple, require_variables};
use crate::error::AnalysisError;
use crate::model::{Statistic, Statistics};
use crate::service::{MethodFamily, SobolOptions};

#[derive(Debug, Clone)]
pub struct SobolAnalyzer {
    options: SobolOptions,
}

impl SobolAnalyzer {
    pub fn new(options: SobolOptions) -> Self {
        Self { options }
    }

    /// Evaluate `f` for `0..count`, on the rayon pool when requested
    fn map_indexed<T, F>(&self, count: usize, f: F) -> Result<Vec<T>, AnalysisError>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync,
    {
        if !self.options.parallel {
            return Ok((0..count).map(f).collect());
        }

        #[cfg(feature = "parallel")]
        let values = {
            use rayon::prelude::*;
            match self.options.n_processors {
                Some(threads) => rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| AnalysisError::ThreadPool(e.to_string()))?
                    .install(|| (0..count).into_par_iter().map(&f).collect()),
                None => (0..count).into_par_iter().map(&f).collect(),
            }
        };

        #[cfg(not(feature = "parallel"))]
        let values = {
            tracing::warn!(
                "parallel Sobol analysis requested without the `parallel` feature; running sequentially"
            );
            (0..count).map(f).collect()
        };

        Ok(values)
    }
}

/// Output values split into the Saltelli blocks
struct SaltelliBlocks {
    a: Vec<f64>,
    b: Vec<f64>,
    ab: Vec<Vec<f64>>,
    ba: Vec<Vec<f64>>,
}

impl SaltelliBlocks {
    fn separate(y: &[f64], d: usize, calc_second_order: bool) -> Self {
        let step = if calc_second_order { 2 * d + 2 } else { d + 2 };
        let column = |offset: usize| -> Vec<f64> { y.iter().skip(offset).step_by(step).copied().collect() };

        Self {
            a: column(0),
            b: column(step - 1),
            ab: (0..d).map(|j| column(j + 1)).collect(),
            ba: if calc_second_order {
                (0..d).map(|j| column(j + 1 + d)).collect()
            } else {
                Vec::new()
            },
        }
    }

    fn len(&self) -> usize {
        self.a.len()
    }

    /// Variance of the stacked A and B blocks over the selected rows
    fn total_variance(&self, idx: &[usize]) -> f64 {
        let stacked: Vec<f64> = idx
            .iter()
            .map(|&i| self.a[i])
            .chain(idx.iter().map(|&i| self.b[i]))
            .collect();
        variance(&stacked, 0)
    }

    fn first_order(&self, j: usize, idx: &[usize]) -> f64 {
        let ab = &self.ab[j];
        let v: Vec<f64> = idx
            .iter()
            .map(|&i| self.b[i] * (ab[i] - self.a[i]))
            .collect();
        mean(&v) / self.total_variance(idx)
    }

    fn total_order(&self, j: usize, idx: &[usize]) -> f64 {
        let ab = &self.ab[j];
        let v: Vec<f64> = idx.iter().map(|&i| (self.a[i] - ab[i]).powi(2)).collect();
        0.5 * mean(&v) / self.total_variance(idx)
    }

    fn second_order(&self, j: usize, k: usize, idx: &[usize]) -> f64 {
        let (ab_k, ba_j) = (&self.ab[k], &self.ba[j]);
        let v: Vec<f64> = idx
            .iter()
            .map(|&i| ba_j[i] * ab_k[i] - self.a[i] * self.b[i])
            .collect();
        mean(&v) / self.total_variance(idx) - self.first_order(j, idx) - self.first_order(k, idx)
    }
}

impl Analyzer for SobolAnalyzer {
    fn family(&self) -> MethodFamily {
        MethodFamily::Sobol
    }

    fn analyze(
        &self,
        ctx: &AnalysisContext<'_>,
        output: ArrayView1<'_, f64>,
    ) -> Result<Statistics, AnalysisError> {
        let d = require_variables(self.family(), ctx.problem)?;
        let step = if ctx.calc_second_order { 2 * d + 2 } else { d + 2 };
        require_multiple(self.family(), output.len(), step)?;

        // Standardize the output before decomposition
        let raw = output.to_vec();
        let (mu, sd) = (mean(&raw), std_dev(&raw, 0));
        let y: Vec<f64> = raw.iter().map(|v| (v - mu) / sd).collect();

        let blocks = SaltelliBlocks::separate(&y, d, ctx.calc_second_order);
        let n = blocks.len();
        let all: Vec<usize> = (0..n).collect();
        let z = z_score(ctx.conf_level);
        let num_resamples = self.options.num_resamples;

        let per_variable = self.map_indexed(d, |j| {
            let mut rng = SmallRng::seed_from_u64(derive_seed(ctx.seed, j as u64));
            let mut s1_boot = Vec::with_capacity(num_resamples);
            let mut st_boot = Vec::with_capacity(num_resamples);
            for _ in 0..num_resamples {
                let r = bootstrap_indices(&mut rng, n);
                s1_boot.push(blocks.first_order(j, &r));
                st_boot.push(blocks.total_order(j, &r));
            }
            [
                blocks.first_order(j, &all),
                z * std_dev(&s1_boot, 1),
                blocks.total_order(j, &all),
                z * std_dev(&st_boot, 1),
            ]
        })?;

        let column = |c: usize| -> Vec<f64> { per_variable.iter().map(|row| row[c]).collect() };
        let mut stats = Statistics::new();
        stats.insert("S1".to_string(), Statistic::from(column(0)));
        stats.insert("S1_conf".to_string(), Statistic::from(column(1)));
        stats.insert("ST".to_string(), Statistic::from(column(2)));
        stats.insert("ST_conf".to_string(), Statistic::from(column(3)));

        if ctx.calc_second_order {
            let pairs: Vec<(usize, usize)> = (0..d)
                .flat_map(|j| (j + 1..d).map(move |k| (j, k)))
                .collect();
            let values = self.map_indexed(pairs.len(), |p| {
                let (j, k) = pairs[p];
                let mut rng = SmallRng::seed_from_u64(derive_seed(ctx.seed, (d + p) as u64));
                let boot: Vec<f64> = (0..num_resamples)
                    .map(|_| blocks.second_order(j, k, &bootstrap_indices(&mut rng, n)))
                    .collect();
                (blocks.second_order(j, k, &all), z * std_dev(&boot, 1))
            })?;

            let mut s2 = Array2::from_elem((d, d), f64::NAN);
            let mut s2_conf = Array2::from_elem((d, d), f64::NAN);
            for (&(j, k), (value, conf)) in pairs.iter().zip(values) {
                s2[[j, k]] = value;
                s2_conf[[j, k]] = conf;
            }
            stats.insert("S2".to_string(), Statistic::from(s2));
            stats.insert("S2_conf".to_string(), Statistic::from(s2_conf));
        }

        Ok(stats)
    }
}
