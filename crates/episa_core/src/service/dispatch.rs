//! Binds an analysis routine to the state of one run.

use std::fmt::Write as _;

use ndarray::{Array2, ArrayView1};

use crate::analyze::stats::derive_seed;
use crate::analyze::{AnalysisContext, Analyzer, analyzer_for};
use crate::error::AnalysisError;
use crate::model::{Advisory, ProblemDescriptor, Statistic, Statistics};
use crate::service::{Method, MethodOptions};

/// An analysis routine bound to the problem, the selected input columns and
/// the run settings. Only the output column varies between calls.
pub struct BoundAnalyzer {
    analyzer: Box<dyn Analyzer>,
    method: Method,
    print_to_console: bool,
    problem: ProblemDescriptor,
    inputs: Array2<f64>,
    conf_level: f64,
    calc_second_order: bool,
    seed: u64,
}

impl BoundAnalyzer {
    /// Bind the routine for `method`. Returns the sampling-scheme advisory
    /// alongside, already logged.
    pub fn bind(
        method: Method,
        options: &MethodOptions,
        problem: ProblemDescriptor,
        inputs: Array2<f64>,
        conf_level: f64,
        calc_second_order: bool,
        seed: u64,
    ) -> (Self, Option<Advisory>) {
        let advisory = method.family().advisory().map(|message| {
            tracing::warn!(method = %method, "{message}");
            Advisory {
                method,
                message: message.to_string(),
            }
        });

        let bound = Self {
            analyzer: analyzer_for(options),
            method,
            print_to_console: options.print_to_console(),
            problem,
            inputs,
            conf_level,
            calc_second_order,
            seed,
        };
        (bound, advisory)
    }

    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    #[must_use]
    pub fn problem(&self) -> &ProblemDescriptor {
        &self.problem
    }

    /// Analyze one output column. `output_id` selects the bootstrap stream,
    /// so a column gets the same result whichever other columns are analyzed.
    pub fn analyze(
        &self,
        output_id: usize,
        output: ArrayView1<'_, f64>,
    ) -> Result<Statistics, AnalysisError> {
        let ctx = AnalysisContext {
            problem: &self.problem,
            inputs: self.inputs.view(),
            conf_level: self.conf_level,
            calc_second_order: self.calc_second_order,
            seed: derive_seed(self.seed, output_id as u64),
        };

        tracing::debug!(method = %self.method, output_id, n = output.len(), "analyzing output");
        let stats = self.analyzer.analyze(&ctx, output)?;
        if self.print_to_console {
            tracing::info!("{}", render_table(&self.problem, &stats));
        }
        Ok(stats)
    }
}

impl std::fmt::Debug for BoundAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundAnalyzer")
            .field("family", &self.analyzer.family())
            .field("method", &self.method)
            .field("problem", &self.problem)
            .field("conf_level", &self.conf_level)
            .field("calc_second_order", &self.calc_second_order)
            .finish_non_exhaustive()
    }
}

/// Plain-text table of per-variable statistics; matrix statistics are
/// listed pairwise underneath.
pub fn render_table(problem: &ProblemDescriptor, stats: &Statistics) -> String {
    let vector_keys: Vec<&String> = stats
        .iter()
        .filter(|(_, s)| matches!(s, Statistic::Vector(v) if v.len() == problem.num_vars))
        .map(|(k, _)| k)
        .collect();

    let mut out = String::new();
    let _ = write!(out, "\n{:<20}", "Parameter");
    for key in &vector_keys {
        let _ = write!(out, " {key:>12}");
    }
    for (j, name) in problem.names.iter().enumerate() {
        let _ = write!(out, "\n{name:<20}");
        for key in &vector_keys {
            if let Some(Statistic::Vector(v)) = stats.get(*key) {
                let _ = write!(out, " {:>12.6}", v[j]);
            }
        }
    }

    for (key, stat) in stats {
        if let Statistic::Matrix(m) = stat {
            let _ = write!(out, "\n\n{key}");
            for ((j, k), value) in m.indexed_iter() {
                if let (false, Some(a), Some(b)) =
                    (value.is_nan(), problem.names.get(j), problem.names.get(k))
                {
                    let _ = write!(out, "\n{a:<20} {b:<20} {value:>12.6}");
                }
            }
        }
    }
    out
}
