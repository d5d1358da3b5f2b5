//! Sensitivity analysis routines.
//!
//! Every routine consumes the problem descriptor, optionally the selected
//! input sample columns, and a single output column, and returns a map from
//! statistic name to value. The service treats them as opaque: it never looks
//! inside a [`Statistics`] map, it only merges them.
//!
//! | Family | Keys | Required layout |
//! |--------|------|-----------------|
//! | Sobol | `S1, S1_conf, ST, ST_conf` (+ `S2, S2_conf`) | Saltelli, `N·(2D+2)` or `N·(D+2)` rows |
//! | Delta | `delta, delta_conf, S1, S1_conf` | any, Latin hypercube recommended |
//! | FAST | `S1, ST` | FAST search curves, `N·D` rows |
//! | Morris | `mu, mu_star, sigma, mu_star_conf` | trajectories of `D+1` rows |
//! | DGSM | `vi, vi_std, dgsm, dgsm_conf` | finite differences, `N·(D+1)` rows |
//! | Fractional factorial | `ME` (+ `IE`) | `2·2^k` contrast rows |

mod delta;
mod dgsm;
mod fast;
mod ff;
mod morris;
mod sobol;
pub mod stats;

use ndarray::{ArrayView1, ArrayView2};

use crate::error::AnalysisError;
use crate::model::{ProblemDescriptor, Statistics};
use crate::service::{MethodFamily, MethodOptions};

pub use delta::DeltaAnalyzer;
pub use dgsm::DgsmAnalyzer;
pub use fast::FastAnalyzer;
pub use ff::{FractionalFactorialAnalyzer, interaction_names};
pub use morris::MorrisAnalyzer;
pub use sobol::SobolAnalyzer;

/// Everything a routine may read besides the output column
#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext<'a> {
    pub problem: &'a ProblemDescriptor,
    /// Selected input sample columns, `(n_samples, num_vars)`
    pub inputs: ArrayView2<'a, f64>,
    pub conf_level: f64,
    pub calc_second_order: bool,
    /// Seed for bootstrap resampling of this output
    pub seed: u64,
}

/// A sensitivity analysis routine
pub trait Analyzer: Send + Sync {
    fn family(&self) -> MethodFamily;

    fn analyze(
        &self,
        ctx: &AnalysisContext<'_>,
        output: ArrayView1<'_, f64>,
    ) -> Result<Statistics, AnalysisError>;
}

/// Build the routine for a set of (already validated) options
pub fn analyzer_for(options: &MethodOptions) -> Box<dyn Analyzer> {
    match options {
        MethodOptions::Sobol(o) => Box::new(SobolAnalyzer::new(o.clone())),
        MethodOptions::Delta(o) => Box::new(DeltaAnalyzer::new(o.clone())),
        MethodOptions::Fast(o) => Box::new(FastAnalyzer::new(o.clone())),
        MethodOptions::Morris(o) => Box::new(MorrisAnalyzer::new(o.clone())),
        MethodOptions::Dgsm(o) => Box::new(DgsmAnalyzer::new(o.clone())),
        MethodOptions::FractionalFactorial(_) => Box::new(FractionalFactorialAnalyzer),
    }
}

/// Fail unless the problem has at least one variable
fn require_variables(family: MethodFamily, problem: &ProblemDescriptor) -> Result<usize, AnalysisError> {
    match problem.num_vars {
        0 => Err(AnalysisError::NoVariables { family }),
        d => Ok(d),
    }
}

/// Fail unless input rows and output values line up
fn require_rows(
    family: MethodFamily,
    inputs: &ArrayView2<'_, f64>,
    outputs: usize,
) -> Result<(), AnalysisError> {
    if inputs.nrows() == outputs {
        Ok(())
    } else {
        Err(AnalysisError::RowMismatch {
            family,
            inputs: inputs.nrows(),
            outputs,
        })
    }
}

/// Fail unless `len` is a non-zero multiple of `step`
fn require_multiple(family: MethodFamily, len: usize, step: usize) -> Result<usize, AnalysisError> {
    if len == 0 || len % step != 0 {
        Err(AnalysisError::OutputLength {
            family,
            actual: len,
            step,
        })
    } else {
        Ok(len / step)
    }
}
