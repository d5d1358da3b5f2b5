//! Sample generators for the schemes the analysis methods assume.
//!
//! Every generator draws unit-hypercube points from the supplied RNG and
//! scales them to the problem bounds. The resulting rows are meant to be fed
//! through the model; the model outputs, in the same row order, are what the
//! matching analysis routine expects.

mod fast;
mod finite_diff;
mod fractional_factorial;
mod latin;
mod morris;
mod saltelli;

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::error::SamplingError;
use crate::model::ProblemDescriptor;

pub(crate) use fast::base_frequency;
pub use fast::fast;
pub use finite_diff::finite_diff;
pub use fractional_factorial::{contrast, extend_problem, fractional_factorial, hadamard};
pub use latin::latin;
pub use morris::morris;
pub use saltelli::saltelli;

/// Sampling schemes, one per analysis family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingScheme {
    Saltelli,
    Latin,
    #[serde(rename = "fast_sampler")]
    Fast,
    Morris,
    FiniteDiff,
    FractionalFactorial,
}

impl SamplingScheme {
    pub const ALL: [SamplingScheme; 6] = [
        SamplingScheme::Saltelli,
        SamplingScheme::Latin,
        SamplingScheme::Fast,
        SamplingScheme::Morris,
        SamplingScheme::FiniteDiff,
        SamplingScheme::FractionalFactorial,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SamplingScheme::Saltelli => "saltelli",
            SamplingScheme::Latin => "latin",
            SamplingScheme::Fast => "fast_sampler",
            SamplingScheme::Morris => "morris",
            SamplingScheme::FiniteDiff => "finite_diff",
            SamplingScheme::FractionalFactorial => "fractional_factorial",
        }
    }

    /// Generate samples for `problem`.
    ///
    /// Returns the sample matrix together with the problem it was drawn for,
    /// which differs from `problem` only for the fractional factorial scheme
    /// (padded with dummy variables).
    pub fn generate(
        self,
        problem: &ProblemDescriptor,
        settings: &SamplerSettings,
    ) -> Result<(Array2<f64>, ProblemDescriptor), SamplingError> {
        let mut rng = SmallRng::seed_from_u64(settings.seed);
        let samples = match self {
            SamplingScheme::Saltelli => {
                saltelli(problem, settings.n, settings.calc_second_order, &mut rng)?
            }
            SamplingScheme::Latin => latin(problem, settings.n, &mut rng)?,
            SamplingScheme::Fast => fast(problem, settings.n, settings.m, &mut rng)?,
            SamplingScheme::Morris => morris(
                problem,
                settings.n,
                settings.num_levels,
                settings.grid_jump,
                &mut rng,
            )?,
            SamplingScheme::FiniteDiff => {
                finite_diff(problem, settings.n, settings.delta, &mut rng)?
            }
            SamplingScheme::FractionalFactorial => return fractional_factorial(problem),
        };
        Ok((samples, problem.clone()))
    }
}

impl fmt::Display for SamplingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SamplingScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        SamplingScheme::ALL
            .into_iter()
            .find(|scheme| scheme.name() == lowered)
            .ok_or_else(|| {
                let names: Vec<&str> = SamplingScheme::ALL.iter().map(|s| s.name()).collect();
                format!("unknown sampling scheme `{lowered}`, expected one of {names:?}")
            })
    }
}

/// Parameters shared by the generators; each scheme reads the ones it needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerSettings {
    /// Base sample count (trajectories for Morris)
    pub n: usize,
    pub calc_second_order: bool,
    /// FAST interference parameter
    #[serde(rename = "M")]
    pub m: usize,
    pub num_levels: usize,
    pub grid_jump: usize,
    /// Absolute finite-difference step
    pub delta: f64,
    pub seed: u64,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            n: 1000,
            calc_second_order: true,
            m: 4,
            num_levels: 4,
            grid_jump: 2,
            delta: 0.01,
            seed: 42,
        }
    }
}

/// Map unit-hypercube samples onto the problem bounds, in place
pub fn scale_samples(samples: &mut Array2<f64>, bounds: &[[f64; 2]]) {
    for (mut column, &[low, high]) in samples.columns_mut().into_iter().zip(bounds) {
        column.mapv_inplace(|u| low + u * (high - low));
    }
}

fn require_variables(problem: &ProblemDescriptor) -> Result<usize, SamplingError> {
    for (name, &[low, high]) in problem.names.iter().zip(&problem.bounds) {
        if !(low <= high) {
            return Err(SamplingError::InvalidBounds {
                name: name.clone(),
                low,
                high,
            });
        }
    }
    match problem.num_vars {
        0 => Err(SamplingError::NoVariables),
        d => Ok(d),
    }
}
