//! Every method on the Ishigami benchmark.
//!
//! Each method draws samples with its matching scheme, evaluates the Ishigami
//! function on them and runs a fresh service. Failures are collected per
//! method instead of aborting the sweep.

use std::fmt;
use std::time::{Duration, Instant};

use episa_core::model::{AnalysisResults, InputParameter, OutputVariable, ProblemDescriptor};
use episa_core::{
    Method, MethodFamily, RunRequest, SamplerSettings, SensitivityAnalysisService, ServiceConfig,
};
use ndarray::Array2;

/// Ishigami coefficients
const A: f64 = 7.0;
const B: f64 = 0.1;

pub fn ishigami_problem() -> ProblemDescriptor {
    let pi = std::f64::consts::PI;
    ProblemDescriptor::new(
        vec!["x1".into(), "x2".into(), "x3".into()],
        vec![[-pi, pi]; 3],
    )
}

/// `sin(x1) + a·sin²(x2) + b·x3⁴·sin(x1)` for every row; extra columns are
/// ignored
pub fn ishigami(samples: &Array2<f64>) -> Vec<f64> {
    samples
        .rows()
        .into_iter()
        .map(|x| x[0].sin() + A * x[1].sin().powi(2) + B * x[2].powi(4) * x[0].sin())
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum MethodOutcome {
    Succeeded {
        results: AnalysisResults,
        elapsed: Duration,
    },
    Failed {
        error: episa_core::Error,
    },
}

impl MethodOutcome {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, MethodOutcome::Failed { .. })
    }
}

/// Outcome of every method, in [`Method::ALL`] order
#[derive(Debug, Clone, PartialEq)]
pub struct DemoReport {
    pub outcomes: Vec<(Method, MethodOutcome)>,
}

impl DemoReport {
    pub fn failures(&self) -> impl Iterator<Item = (Method, &episa_core::Error)> {
        self.outcomes.iter().filter_map(|(method, outcome)| match outcome {
            MethodOutcome::Failed { error } => Some((*method, error)),
            MethodOutcome::Succeeded { .. } => None,
        })
    }

    #[must_use]
    pub fn num_failed(&self) -> usize {
        self.failures().count()
    }
}

/// The statistic shown in the summary for each family
fn headline(family: MethodFamily) -> &'static str {
    match family {
        MethodFamily::Sobol | MethodFamily::Fast => "S1",
        MethodFamily::Delta => "delta",
        MethodFamily::Morris => "mu_star",
        MethodFamily::Dgsm => "dgsm",
        MethodFamily::FractionalFactorial => "ME",
    }
}

impl fmt::Display for DemoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<22} {:<8} {:>9}  details", "method", "status", "time")?;
        for (method, outcome) in &self.outcomes {
            match outcome {
                MethodOutcome::Succeeded { results, elapsed } => {
                    let key = headline(method.family());
                    let values = results
                        .stacked(key)
                        .map(|m| {
                            m.row(0)
                                .iter()
                                .map(|v| format!("{v:.3}"))
                                .collect::<Vec<_>>()
                                .join(", ")
                        })
                        .unwrap_or_default();
                    writeln!(
                        f,
                        "{:<22} {:<8} {:>7}ms  {key} = [{values}]",
                        method.name(),
                        "ok",
                        elapsed.as_millis()
                    )?;
                }
                MethodOutcome::Failed { error } => {
                    writeln!(f, "{:<22} {:<8} {:>9}  {error}", method.name(), "FAILED", "-")?;
                }
            }
        }
        write!(
            f,
            "{} of {} methods failed",
            self.num_failed(),
            self.outcomes.len()
        )
    }
}

/// Sample, evaluate and analyze with one method
fn run_method(method: Method, n: usize, seed: u64) -> episa_core::Result<AnalysisResults> {
    let settings = SamplerSettings {
        n,
        seed,
        ..Default::default()
    };
    let (samples, problem) = method
        .sampling_scheme()
        .generate(&ishigami_problem(), &settings)?;

    let inputs: Vec<InputParameter> = problem
        .names
        .iter()
        .zip(&problem.bounds)
        .enumerate()
        .map(|(j, (name, &[low, high]))| {
            InputParameter::new(name.clone(), samples.column(j).to_vec()).with_bounds(low, high)
        })
        .collect();
    let outputs = vec![OutputVariable::new("f", ishigami(&samples))];
    let config = ServiceConfig {
        method,
        seed,
        ..Default::default()
    };

    let mut service = SensitivityAnalysisService::new(&inputs, &outputs, config)?;
    service.run(RunRequest::new())
}

/// Run every method with `n` base samples
pub fn run_demo(n: usize, seed: u64) -> DemoReport {
    let outcomes = Method::ALL
        .into_iter()
        .map(|method| {
            let _span = tracing::info_span!("demo", %method).entered();
            let start = Instant::now();
            let outcome = match run_method(method, n, seed) {
                Ok(results) => MethodOutcome::Succeeded {
                    results,
                    elapsed: start.elapsed(),
                },
                Err(error) => {
                    tracing::error!(%error, "analysis failed");
                    MethodOutcome::Failed { error }
                }
            };
            (method, outcome)
        })
        .collect();
    DemoReport { outcomes }
}
