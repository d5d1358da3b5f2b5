//! Main and two-way interaction effects of a two-level fractional factorial
//! design.

use ndarray::{Array1, ArrayView1};

use super::{AnalysisContext, Analyzer, require_rows, require_variables};
use crate::error::AnalysisError;
use crate::model::{ProblemDescriptor, Statistic, Statistics};
use crate::sample::{contrast, extend_problem};
use crate::service::MethodFamily;

/// Carries no options of its own: interaction effects follow the service's
/// second-order flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct FractionalFactorialAnalyzer;

/// Variable pairs in the order of the `IE` statistic, over the padded problem
pub fn interaction_names(problem: &ProblemDescriptor) -> Vec<(String, String)> {
    let names = extend_problem(problem).names;
    (0..names.len())
        .flat_map(|col| (0..col).map(move |col2| (col2, col)))
        .map(|(a, b)| (names[a].clone(), names[b].clone()))
        .collect()
}

impl Analyzer for FractionalFactorialAnalyzer {
    fn family(&self) -> MethodFamily {
        MethodFamily::FractionalFactorial
    }

    fn analyze(
        &self,
        ctx: &AnalysisContext<'_>,
        output: ArrayView1<'_, f64>,
    ) -> Result<Statistics, AnalysisError> {
        let d = require_variables(self.family(), ctx.problem)?;
        let x = contrast(d);
        let (rows, k) = x.dim();
        if output.len() != rows {
            return Err(AnalysisError::OutputCount {
                family: self.family(),
                expected: rows,
                actual: output.len(),
            });
        }
        require_rows(self.family(), &ctx.inputs, output.len())?;

        let scale = 1.0 / (2 * k) as f64;
        let main_effects: Array1<f64> = output.dot(&x) * scale;

        let mut stats = Statistics::from([("ME".to_string(), Statistic::from(main_effects))]);
        if ctx.calc_second_order {
            let interactions: Vec<f64> = (0..k)
                .flat_map(|col| (0..col).map(move |col2| (col, col2)))
                .map(|(col, col2)| {
                    let product = &x.column(col) * &x.column(col2);
                    output.dot(&product) * scale
                })
                .collect();
            stats.insert("IE".to_string(), Statistic::from(interactions));
        }
        Ok(stats)
    }
}
