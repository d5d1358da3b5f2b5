//! Command-line front end for episa sensitivity analysis
//!
//! - `run`: analyze the samples of a YAML problem file
//! - `sample`: generate a sample matrix for a problem's inputs
//! - `demo`: every method on the Ishigami benchmark

// ============================================================================
// Commands
// ============================================================================

pub mod commands;
pub mod demo;

// ============================================================================
// Files and output
// ============================================================================

pub mod logging;
pub mod problem_file;
pub mod report;
pub mod snapshot_yaml;
pub mod util;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use logging::{LogTarget, init_logging};
pub use problem_file::ProblemFile;
