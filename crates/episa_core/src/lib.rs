//! Global sensitivity analysis for epileptogenicity models
//!
//! This crate normalizes sampled model inputs and outputs and runs one of
//! several global sensitivity analysis methods over them:
//! - Sobol' variance decomposition (first, second and total order)
//! - Borgonovo's moment-independent delta measure
//! - Extended FAST
//! - Morris elementary-effects screening
//! - Derivative-based global sensitivity measures (DGSM)
//! - Fractional factorial main and interaction effects
//!
//! It also provides the matching sample generators, the simulator capability
//! interface and a persistence snapshot of the service configuration.
//!
//! # Example
//!
//! ```ignore
//! use episa_core::{InputParameter, OutputVariable, RunRequest, SensitivityAnalysisService, ServiceConfig};
//!
//! let inputs = vec![
//!     InputParameter::new("x0", vec![0.1, 0.4, 0.35, 0.8]),
//!     InputParameter::new("K", vec![1.0, 2.0, 3.0, 4.0]),
//! ];
//! let outputs = vec![OutputVariable::new("y", vec![0.2, 0.5, 0.3, 0.9])];
//!
//! let mut service = SensitivityAnalysisService::new(&inputs, &outputs, ServiceConfig::default())?;
//! let results = service.run(RunRequest::new())?;
//! println!("{:?}", results.get("delta"));
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analyze;
pub mod error;
pub mod sample;
pub mod service;
pub mod simulator;
pub mod snapshot;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{Error, Result};
pub use model::{
    Advisory, AnalysisResults, InputParameter, OutputNames, OutputValues, OutputVariable,
    ProblemDescriptor, Statistic, Statistics,
};
pub use sample::{SamplerSettings, SamplingScheme};
pub use service::{
    ConfLevel, Method, MethodFamily, MethodOptions, RunRequest, SensitivityAnalysisService,
    ServiceConfig,
};
pub use snapshot::{ServiceSnapshot, SnapshotWriter};
