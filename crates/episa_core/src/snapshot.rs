//! Flat key/value view of a service for persistence.
//!
//! The core only builds the snapshot; writers decide the on-disk format.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::ProblemDescriptor;
use crate::service::{Method, MethodOptions};

/// File name used when a writer is given none
pub const DEFAULT_SNAPSHOT_FILENAME: &str = "sensitivity_analysis_service.yaml";

/// Value of the `EPI_Type` metadata attribute
pub const EPI_TYPE: &str = "SensitivityAnalysisService";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSnapshot {
    pub method: Method,
    pub calc_second_order: bool,
    pub conf_level: f64,
    pub n_inputs: usize,
    pub n_outputs: usize,
    pub input_names: Vec<String>,
    pub output_names: Vec<String>,
    pub input_bounds: Vec<[f64; 2]>,
    pub problem: ProblemDescriptor,
    pub other_parameters: Option<MethodOptions>,
    pub metadata: BTreeMap<String, String>,
}

impl ServiceSnapshot {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        method: Method,
        calc_second_order: bool,
        conf_level: f64,
        input_names: Vec<String>,
        output_names: Vec<String>,
        input_bounds: Vec<[f64; 2]>,
        problem: ProblemDescriptor,
        other_parameters: Option<MethodOptions>,
    ) -> Self {
        Self {
            method,
            calc_second_order,
            conf_level,
            n_inputs: input_names.len(),
            n_outputs: output_names.len(),
            input_names,
            output_names,
            input_bounds,
            problem,
            other_parameters,
            metadata: BTreeMap::from([("EPI_Type".to_string(), EPI_TYPE.to_string())]),
        }
    }
}

/// Persists snapshots in some format
pub trait SnapshotWriter {
    type Error;

    /// Write `snapshot` into `folder`, as `filename` or
    /// [`DEFAULT_SNAPSHOT_FILENAME`], and return the written path
    fn write_snapshot(
        &self,
        snapshot: &ServiceSnapshot,
        folder: &Path,
        filename: Option<&str>,
    ) -> Result<PathBuf, Self::Error>;
}

/// Target path for a snapshot
#[must_use]
pub fn snapshot_path(folder: &Path, filename: Option<&str>) -> PathBuf {
    folder.join(filename.unwrap_or(DEFAULT_SNAPSHOT_FILENAME))
}
