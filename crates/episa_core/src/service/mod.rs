//! The sensitivity analysis service.
//!
//! A [`SensitivityAnalysisService`] owns normalized input and output samples
//! and a mutable configuration (method, second-order flag, confidence level,
//! seed). Each [`run`](SensitivityAnalysisService::run) builds a problem
//! descriptor from the selected inputs, binds the method's analysis routine
//! and merges its per-output statistics into one [`AnalysisResults`].

mod dispatch;
mod method;
pub mod normalizer;

use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};
use crate::model::{
    AnalysisResults, InputParameter, OutputVariable, ProblemDescriptor, Statistics,
};
use crate::snapshot::ServiceSnapshot;

pub use dispatch::{BoundAnalyzer, render_table};
pub use method::{
    ConfLevel, DeltaOptions, DgsmOptions, FastOptions, FractionalFactorialOptions, Method,
    MethodFamily, MethodOptions, MorrisOptions, SobolOptions,
};
use normalizer::{normalize_inputs, normalize_outputs, select_columns};

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 42;

/// Settings fixed at construction, overridable per run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub method: Method,
    pub calc_second_order: bool,
    pub conf_level: ConfLevel,
    /// Base seed for all bootstrap resampling
    pub seed: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            method: Method::Delta,
            calc_second_order: true,
            conf_level: ConfLevel::DEFAULT,
            seed: DEFAULT_SEED,
        }
    }
}

impl ServiceConfig {
    /// Validate settings given as a method name and a raw confidence level
    pub fn new(
        method: &str,
        calc_second_order: bool,
        conf_level: f64,
        seed: u64,
    ) -> std::result::Result<Self, ConfigurationError> {
        Ok(Self {
            method: method.parse()?,
            calc_second_order,
            conf_level: ConfLevel::new(conf_level)?,
            seed,
        })
    }
}

/// Selection and overrides for one run; `None` means "all" or "keep"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunRequest {
    pub input_ids: Option<Vec<usize>>,
    pub output_ids: Option<Vec<usize>>,
    pub method: Option<Method>,
    pub calc_second_order: Option<bool>,
    pub conf_level: Option<f64>,
    pub options: Option<MethodOptions>,
}

impl RunRequest {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn inputs(mut self, ids: impl Into<Vec<usize>>) -> Self {
        self.input_ids = Some(ids.into());
        self
    }

    #[must_use]
    pub fn outputs(mut self, ids: impl Into<Vec<usize>>) -> Self {
        self.output_ids = Some(ids.into());
        self
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    #[must_use]
    pub fn calc_second_order(mut self, flag: bool) -> Self {
        self.calc_second_order = Some(flag);
        self
    }

    #[must_use]
    pub fn conf_level(mut self, level: f64) -> Self {
        self.conf_level = Some(level);
        self
    }

    #[must_use]
    pub fn options(mut self, options: MethodOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// Validated selection of one run
struct RunPlan {
    method: Method,
    calc_second_order: bool,
    conf_level: ConfLevel,
    options: MethodOptions,
    input_ids: Vec<usize>,
    output_ids: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct SensitivityAnalysisService {
    config: ServiceConfig,
    input_names: Vec<String>,
    input_bounds: Vec<[f64; 2]>,
    input_samples: Array2<f64>,
    n_samples: usize,
    output_names: Vec<String>,
    output_values: Array2<f64>,
    /// Problem descriptor of the latest run
    problem: ProblemDescriptor,
    /// Options of the latest run
    other_parameters: Option<MethodOptions>,
}

impl SensitivityAnalysisService {
    /// Validate and normalize the samples.
    ///
    /// Fails with [`ShapeMismatch`](crate::error::ShapeMismatch) when input
    /// sample counts differ or an output cannot be aligned with them.
    pub fn new(
        inputs: &[InputParameter],
        outputs: &[OutputVariable],
        config: ServiceConfig,
    ) -> Result<Self> {
        let inputs = normalize_inputs(inputs)?;
        let outputs = normalize_outputs(outputs, inputs.n_samples)?;

        tracing::debug!(
            n_samples = inputs.n_samples,
            n_inputs = inputs.names.len(),
            n_outputs = outputs.names.len(),
            method = %config.method,
            "sensitivity analysis service configured"
        );

        Ok(Self {
            config,
            input_names: inputs.names,
            input_bounds: inputs.bounds,
            input_samples: inputs.samples,
            n_samples: inputs.n_samples,
            output_names: outputs.names,
            output_values: outputs.values,
            problem: ProblemDescriptor::default(),
            other_parameters: None,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    #[must_use]
    pub fn method(&self) -> Method {
        self.config.method
    }

    #[must_use]
    pub fn calc_second_order(&self) -> bool {
        self.config.calc_second_order
    }

    #[must_use]
    pub fn conf_level(&self) -> f64 {
        self.config.conf_level.value()
    }

    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    #[must_use]
    pub fn n_inputs(&self) -> usize {
        self.input_names.len()
    }

    #[must_use]
    pub fn n_outputs(&self) -> usize {
        self.output_names.len()
    }

    #[must_use]
    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }

    #[must_use]
    pub fn input_bounds(&self) -> &[[f64; 2]] {
        &self.input_bounds
    }

    /// `(n_samples, n_inputs)`
    #[must_use]
    pub fn input_samples(&self) -> &Array2<f64> {
        &self.input_samples
    }

    #[must_use]
    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }

    /// `(n_samples, n_outputs)`
    #[must_use]
    pub fn output_values(&self) -> &Array2<f64> {
        &self.output_values
    }

    /// Problem descriptor built by the latest run (empty before any run)
    #[must_use]
    pub fn problem(&self) -> &ProblemDescriptor {
        &self.problem
    }

    #[must_use]
    pub fn other_parameters(&self) -> Option<&MethodOptions> {
        self.other_parameters.as_ref()
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    pub fn set_method(&mut self, method: &str) -> std::result::Result<(), ConfigurationError> {
        self.config.method = method.parse()?;
        Ok(())
    }

    pub fn set_calc_second_order(&mut self, flag: bool) {
        self.config.calc_second_order = flag;
    }

    pub fn set_conf_level(&mut self, level: f64) -> std::result::Result<(), ConfigurationError> {
        self.config.conf_level = ConfLevel::new(level)?;
        Ok(())
    }

    // ========================================================================
    // Run
    // ========================================================================

    fn plan(&self, request: RunRequest) -> std::result::Result<RunPlan, ConfigurationError> {
        let method = request.method.unwrap_or(self.config.method);
        let conf_level = match request.conf_level {
            Some(level) => ConfLevel::new(level)?,
            None => self.config.conf_level,
        };
        let options = MethodOptions::resolve(method, request.options)?;

        let input_ids = select_ids("input", request.input_ids, self.n_inputs())?;
        let mut output_ids = select_ids("output", request.output_ids, self.n_outputs())?;
        output_ids.sort_unstable();
        output_ids.dedup();

        Ok(RunPlan {
            method,
            calc_second_order: request
                .calc_second_order
                .unwrap_or(self.config.calc_second_order),
            conf_level,
            options,
            input_ids,
            output_ids,
        })
    }

    /// Analyze the selected outputs against the selected inputs.
    ///
    /// Every override in `request` is validated before any is applied;
    /// once valid, the method, second-order flag and confidence level
    /// become the service configuration. Outputs are analyzed in ascending
    /// index order and the first failure aborts the run.
    pub fn run(&mut self, request: RunRequest) -> Result<AnalysisResults> {
        let plan = self.plan(request)?;

        self.config.method = plan.method;
        self.config.calc_second_order = plan.calc_second_order;
        self.config.conf_level = plan.conf_level;
        self.problem = ProblemDescriptor::select(&self.input_names, &self.input_bounds, &plan.input_ids);
        self.other_parameters = Some(plan.options.clone());

        let (analyzer, advisory) = BoundAnalyzer::bind(
            plan.method,
            &plan.options,
            self.problem.clone(),
            select_columns(self.input_samples.view(), &plan.input_ids),
            plan.conf_level.value(),
            plan.calc_second_order,
            self.config.seed,
        );

        tracing::info!(
            method = %plan.method,
            n_inputs = plan.input_ids.len(),
            n_outputs = plan.output_ids.len(),
            "running sensitivity analysis"
        );

        let per_output = plan
            .output_ids
            .iter()
            .map(|&io| -> Result<(String, Statistics)> {
                let stats = analyzer.analyze(io, self.output_values.column(io))?;
                Ok((self.output_names[io].clone(), stats))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(AnalysisResults::merge(
            plan.method,
            per_output,
            advisory.into_iter().collect(),
        ))
    }

    /// Flat key/value view of the configuration for persistence
    #[must_use]
    pub fn snapshot(&self) -> ServiceSnapshot {
        ServiceSnapshot::new(
            self.config.method,
            self.config.calc_second_order,
            self.config.conf_level.value(),
            self.input_names.clone(),
            self.output_names.clone(),
            self.input_bounds.clone(),
            self.problem.clone(),
            self.other_parameters.clone(),
        )
    }
}

/// All indices when `ids` is `None`; otherwise a non-empty in-range list
fn select_ids(
    kind: &'static str,
    ids: Option<Vec<usize>>,
    len: usize,
) -> std::result::Result<Vec<usize>, ConfigurationError> {
    let ids = ids.unwrap_or_else(|| (0..len).collect());
    if ids.is_empty() {
        return Err(ConfigurationError::EmptySelection { kind });
    }
    match ids.iter().find(|&&index| index >= len) {
        Some(&index) => Err(ConfigurationError::IndexOutOfRange { kind, index, len }),
        None => Ok(ids),
    }
}

impl fmt::Display for SensitivityAnalysisService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = self
            .other_parameters
            .as_ref()
            .map_or_else(|| "{}".to_string(), |o| format!("{o:?}"));
        writeln!(f, "SensitivityAnalysisService {{")?;
        writeln!(f, "  01. Method: {}", self.config.method)?;
        writeln!(f, "  02. Second order calculation flag: {}", self.config.calc_second_order)?;
        writeln!(f, "  03. Confidence level: {}", self.config.conf_level.value())?;
        writeln!(f, "  04. Seed: {}", self.config.seed)?;
        writeln!(f, "  05. Number of inputs: {}", self.n_inputs())?;
        writeln!(f, "  06. Number of outputs: {}", self.n_outputs())?;
        writeln!(f, "  07. Input names: {:?}", self.input_names)?;
        writeln!(f, "  08. Output names: {:?}", self.output_names)?;
        writeln!(f, "  09. Input bounds: {:?}", self.input_bounds)?;
        writeln!(
            f,
            "  10. Problem: num_vars = {}, names = {:?}, bounds = {:?}",
            self.problem.num_vars, self.problem.names, self.problem.bounds
        )?;
        writeln!(f, "  11. Other parameters: {options}")?;
        write!(f, "}}")
    }
}
