//! Rendering of results and sample matrices

use std::path::Path;

use color_eyre::eyre::{WrapErr, eyre};
use episa_core::ProblemDescriptor;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::util::io::atomic_write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Yaml,
    Json,
}

/// Serialize `value` in the requested format
pub fn render<T: Serialize>(value: &T, format: ReportFormat) -> color_eyre::Result<String> {
    match format {
        ReportFormat::Yaml => {
            serde_saphyr::to_string(value).map_err(|e| eyre!("failed to serialize report: {e}"))
        }
        ReportFormat::Json => {
            let mut json = serde_json::to_string_pretty(value).wrap_err("failed to serialize report")?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Write `content` to `output`, or to stdout when no file is given
pub fn emit(content: &str, output: Option<&Path>) -> color_eyre::Result<()> {
    match output {
        Some(path) => {
            atomic_write(path, content)
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => print!("{content}"),
    }
    Ok(())
}

/// A generated sample matrix with the problem it was drawn for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleReport {
    pub scheme: String,
    pub names: Vec<String>,
    pub bounds: Vec<[f64; 2]>,
    /// One row per model evaluation
    pub samples: Vec<Vec<f64>>,
}

impl SampleReport {
    pub fn new(scheme: impl Into<String>, samples: &Array2<f64>, problem: &ProblemDescriptor) -> Self {
        Self {
            scheme: scheme.into(),
            names: problem.names.clone(),
            bounds: problem.bounds.clone(),
            samples: samples.rows().into_iter().map(|row| row.to_vec()).collect(),
        }
    }
}
