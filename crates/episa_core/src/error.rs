use thiserror::Error;

use crate::service::{Method, MethodFamily};

/// Sample-count or array-dimension inconsistencies found while normalizing
/// input and output samples.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeMismatch {
    #[error("not all input parameters have an equal number of samples: {sizes:?}")]
    UnequalInputSamples { sizes: Vec<usize> },

    #[error("input parameter `{name}` has no samples and no explicit bounds")]
    EmptyInput { name: String },

    #[error(
        "none of the dimensions of output samples {shape:?} of `{name}` matches n_samples = {n_samples}"
    )]
    OutputDimensions {
        name: String,
        shape: Vec<usize>,
        n_samples: usize,
    },

    #[error("output `{name}` has {multiplicity} column(s) but {supplied} name(s) were supplied")]
    OutputNames {
        name: String,
        multiplicity: usize,
        supplied: usize,
    },
}

/// Invalid service settings, selections or method options.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("method `{method}` is not one of the available methods {:?}", Method::NAMES)]
    UnknownMethod { method: String },

    #[error("conf_level = {value} is not a float in the (0.0, 1.0) interval")]
    ConfLevel { value: f64 },

    #[error("{kind} index {index} is out of range (0..{len})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    #[error("no {kind} selected for analysis")]
    EmptySelection { kind: &'static str },

    #[error("options for {options:?} cannot be used with method `{method}`")]
    OptionsMismatch {
        method: Method,
        options: MethodFamily,
    },

    #[error("invalid option `{option}` = {value} for {family:?}: {reason}")]
    InvalidOption {
        family: MethodFamily,
        option: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Failures raised by an analysis routine while evaluating one output column.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("{family:?}: incorrect number of model outputs {actual}, expected a multiple of {step}")]
    OutputLength {
        family: MethodFamily,
        actual: usize,
        step: usize,
    },

    #[error("{family:?}: expected exactly {expected} model outputs, got {actual}")]
    OutputCount {
        family: MethodFamily,
        expected: usize,
        actual: usize,
    },

    #[error("{family:?}: input samples have {inputs} rows but the output has {outputs} values")]
    RowMismatch {
        family: MethodFamily,
        inputs: usize,
        outputs: usize,
    },

    #[error("{family:?}: problem has no variables")]
    NoVariables { family: MethodFamily },

    #[error("{family:?}: sample size {n} is too small ({reason})")]
    TooFewSamples {
        family: MethodFamily,
        n: usize,
        reason: &'static str,
    },

    #[error("failed to build analysis thread pool: {0}")]
    ThreadPool(String),
}

/// Invalid parameters for a sample generator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingError {
    #[error("problem has no variables")]
    NoVariables,

    #[error("sample size N > 4M^2 = {min} is required for FAST, got N = {n}")]
    FastSampleSize { n: usize, min: usize },

    #[error("invalid Morris grid: num_levels = {num_levels}, grid_jump = {grid_jump}")]
    MorrisGrid { num_levels: usize, grid_jump: usize },

    #[error("finite-difference step must be positive and finite, got {delta}")]
    FiniteDiffStep { delta: f64 },

    #[error("bounds [{low}, {high}] of `{name}` are not ordered")]
    InvalidBounds { name: String, low: f64, high: f64 },
}

/// Failures of the simulator capability interface.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulatorError {
    #[error("no simulator registered for {0:?}")]
    NotRegistered(crate::simulator::SimulatorKind),

    #[error("{kind:?} simulator failed to launch: {message}")]
    Launch {
        kind: crate::simulator::SimulatorKind,
        message: String,
    },
}

/// Umbrella error for service operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Shape(#[from] ShapeMismatch),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Sampling(#[from] SamplingError),
}

pub type Result<T> = std::result::Result<T, Error>;
