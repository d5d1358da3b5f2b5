//! Extended Fourier Amplitude Sensitivity Test.

use ndarray::ArrayView1;
use rustfft::FftPlanner;
use rustfft::num_complex::Complex;

use super::{AnalysisContext, Analyzer, require_multiple, require_variables};
use crate::error::AnalysisError;
use crate::model::{Statistic, Statistics};
use crate::sample::base_frequency;
use crate::service::{FastOptions, MethodFamily};

#[derive(Debug, Clone)]
pub struct FastAnalyzer {
    options: FastOptions,
}

impl FastAnalyzer {
    pub fn new(options: FastOptions) -> Self {
        Self { options }
    }
}

/// Normalized power spectrum at frequencies `1..(N+1)/2`
fn power_spectrum(planner: &mut FftPlanner<f64>, values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let fft = planner.plan_fft_forward(n);
    let mut buffer: Vec<Complex<f64>> = values.iter().map(|&v| Complex::new(v, 0.0)).collect();
    fft.process(&mut buffer);
    (1..n.div_ceil(2))
        .map(|k| (buffer[k].norm() / n as f64).powi(2))
        .collect()
}

fn first_order(spectrum: &[f64], m: usize, omega: usize) -> f64 {
    let v = 2.0 * spectrum.iter().sum::<f64>();
    let d1 = 2.0
        * (1..=m)
            .filter_map(|p| spectrum.get(p * omega - 1))
            .sum::<f64>();
    d1 / v
}

fn total_order(spectrum: &[f64], omega: usize) -> f64 {
    let v = 2.0 * spectrum.iter().sum::<f64>();
    let dt = 2.0 * spectrum.iter().take(omega / 2).sum::<f64>();
    1.0 - dt / v
}

impl Analyzer for FastAnalyzer {
    fn family(&self) -> MethodFamily {
        MethodFamily::Fast
    }

    fn analyze(
        &self,
        ctx: &AnalysisContext<'_>,
        output: ArrayView1<'_, f64>,
    ) -> Result<Statistics, AnalysisError> {
        let d = require_variables(self.family(), ctx.problem)?;
        let n = require_multiple(self.family(), output.len(), d)?;
        let m = self.options.m;
        if n <= 4 * m * m {
            return Err(AnalysisError::TooFewSamples {
                family: self.family(),
                n,
                reason: "N > 4M^2 is required",
            });
        }

        let omega = base_frequency(n, m);
        let y = output.to_vec();
        let mut planner = FftPlanner::new();
        let (s1, st): (Vec<f64>, Vec<f64>) = y
            .chunks(n)
            .map(|segment| {
                let spectrum = power_spectrum(&mut planner, segment);
                (first_order(&spectrum, m, omega), total_order(&spectrum, omega))
            })
            .unzip();

        Ok(Statistics::from([
            ("S1".to_string(), Statistic::from(s1)),
            ("ST".to_string(), Statistic::from(st)),
        ]))
    }
}
