//! YAML problem files
//!
//! A problem file carries the sampled inputs, the model outputs and the
//! analysis settings for one `episa run`:
//!
//! ```yaml
//! method: sobol
//! calc_second_order: false
//! conf_level: 0.95
//! seed: 7
//! inputs:
//!   - name: x0
//!     samples: [0.1, 0.4, 0.35, 0.8]
//!     bounds: [0.0, 1.0]
//! outputs:
//!   - names: y
//!     values: [0.2, 0.5, 0.3, 0.9]
//!   - names: region
//!     matrix:            # one row per sample
//!       - [1.0, 2.0]
//!       - [0.5, 1.5]
//! output_ids: [0, 2]
//! options:
//!   sobol:
//!     num_resamples: 200
//! ```
//!
//! `episa sample` only reads the input names and bounds.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{WrapErr, bail, eyre};
use episa_core::{
    ConfLevel, InputParameter, Method, MethodOptions, OutputNames, OutputVariable,
    ProblemDescriptor, RunRequest, ServiceConfig,
};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEntry {
    pub name: String,
    #[serde(default)]
    pub samples: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEntry {
    pub names: OutputNames,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<Vec<Vec<f64>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemFile {
    pub method: Method,
    pub calc_second_order: bool,
    pub conf_level: f64,
    pub seed: u64,
    pub inputs: Vec<InputEntry>,
    pub outputs: Vec<OutputEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_ids: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_ids: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<MethodOptions>,
}

impl Default for ProblemFile {
    fn default() -> Self {
        let config = ServiceConfig::default();
        Self {
            method: config.method,
            calc_second_order: config.calc_second_order,
            conf_level: config.conf_level.value(),
            seed: config.seed,
            inputs: Vec::new(),
            outputs: Vec::new(),
            input_ids: None,
            output_ids: None,
            options: None,
        }
    }
}

/// Stack rows into an `(n_rows, n_cols)` matrix, rejecting ragged rows
fn rows_to_matrix(label: &str, rows: &[Vec<f64>]) -> color_eyre::Result<Array2<f64>> {
    let width = rows.first().map_or(0, Vec::len);
    if let Some(i) = rows.iter().position(|row| row.len() != width) {
        bail!(
            "output `{label}`: matrix row {i} has {} values, expected {width}",
            rows[i].len()
        );
    }
    let data: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), width), data)
        .wrap_err_with(|| format!("output `{label}`: invalid matrix"))
}

impl InputEntry {
    fn to_parameter(&self) -> InputParameter {
        let parameter = InputParameter::new(self.name.clone(), self.samples.clone());
        match self.bounds {
            Some([low, high]) => parameter.with_bounds(low, high),
            None => parameter,
        }
    }
}

impl OutputEntry {
    fn to_variable(&self) -> color_eyre::Result<OutputVariable> {
        let label = self.names.label();
        match (&self.values, &self.matrix) {
            (Some(values), None) => Ok(OutputVariable::new(self.names.clone(), values.clone())),
            (None, Some(rows)) => Ok(OutputVariable::new(
                self.names.clone(),
                rows_to_matrix(label, rows)?,
            )),
            (Some(_), Some(_)) => bail!("output `{label}` has both `values` and `matrix`"),
            (None, None) => bail!("output `{label}` needs `values` or `matrix`"),
        }
    }
}

impl ProblemFile {
    /// Read and parse a YAML problem file
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read problem file {}", path.display()))?;
        Self::parse(&content).wrap_err_with(|| format!("in problem file {}", path.display()))
    }

    /// Only `true` and `false` are booleans, so output names such as `y` or
    /// `on` stay names
    pub fn parse(content: &str) -> color_eyre::Result<Self> {
        let options = serde_saphyr::Options {
            strict_booleans: true,
            ..Default::default()
        };
        serde_saphyr::from_str_with_options(content, options)
            .map_err(|e| eyre!("failed to parse problem file: {e}"))
    }

    pub fn input_parameters(&self) -> Vec<InputParameter> {
        self.inputs.iter().map(InputEntry::to_parameter).collect()
    }

    pub fn output_variables(&self) -> color_eyre::Result<Vec<OutputVariable>> {
        self.outputs.iter().map(OutputEntry::to_variable).collect()
    }

    pub fn service_config(&self) -> color_eyre::Result<ServiceConfig> {
        Ok(ServiceConfig {
            method: self.method,
            calc_second_order: self.calc_second_order,
            conf_level: ConfLevel::new(self.conf_level)?,
            seed: self.seed,
        })
    }

    /// Selection and options of the file as a run request
    pub fn run_request(&self) -> RunRequest {
        let mut request = RunRequest::new();
        request.input_ids = self.input_ids.clone();
        request.output_ids = self.output_ids.clone();
        request.options = self.options.clone();
        request
    }

    /// Names and bounds of the inputs; observed ranges stand in for missing
    /// bounds
    pub fn problem(&self) -> color_eyre::Result<ProblemDescriptor> {
        let bounds = self
            .input_parameters()
            .iter()
            .map(|p| {
                p.bounds
                    .or_else(|| p.observed_bounds())
                    .ok_or_else(|| eyre!("input `{}` has neither bounds nor samples", p.name))
            })
            .collect::<color_eyre::Result<Vec<_>>>()?;
        let names = self.inputs.iter().map(|input| input.name.clone()).collect();
        Ok(ProblemDescriptor::new(names, bounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use episa_core::SensitivityAnalysisService;
    use episa_core::service::SobolOptions;

    const PROBLEM: &str = r#"
method: sobol
calc_second_order: false
conf_level: 0.9
seed: 7
inputs:
  - name: x0
    samples: [0.1, 0.4, 0.35, 0.8]
    bounds: [0.0, 1.0]
  - name: K
    samples: [1.0, 2.0, 3.0, 4.0]
outputs:
  - names: y
    values: [0.2, 0.5, 0.3, 0.9]
  - names: [left, right]
    matrix:
      - [1.0, 2.0]
      - [0.5, 1.5]
      - [0.7, 1.1]
      - [0.2, 0.3]
output_ids: [2, 0]
options:
  sobol:
    num_resamples: 200
"#;

    #[test]
    fn test_parse_problem_file() {
        let file = ProblemFile::parse(PROBLEM).unwrap();
        assert_eq!(file.method, Method::Sobol);
        assert!(!file.calc_second_order);
        assert_eq!(file.seed, 7);
        assert_eq!(file.inputs[0].bounds, Some([0.0, 1.0]));
        assert_eq!(file.inputs[1].bounds, None);
        assert_eq!(file.output_ids, Some(vec![2, 0]));
        assert_eq!(
            file.options,
            Some(MethodOptions::Sobol(SobolOptions {
                num_resamples: 200,
                ..Default::default()
            }))
        );
    }

    #[test]
    fn test_problem_file_builds_service() {
        let file = ProblemFile::parse(PROBLEM).unwrap();
        let service = SensitivityAnalysisService::new(
            &file.input_parameters(),
            &file.output_variables().unwrap(),
            file.service_config().unwrap(),
        )
        .unwrap();

        assert_eq!(service.n_samples(), 4);
        assert_eq!(service.output_names(), ["y", "left", "right"]);
        assert_eq!(service.input_bounds(), [[0.0, 1.0], [1.0, 4.0]]);
        assert_eq!(file.run_request().output_ids, Some(vec![2, 0]));
    }

    #[test]
    fn test_defaults_for_missing_settings() {
        let file = ProblemFile::parse("inputs:\n  - name: a\n    bounds: [0.0, 2.0]\n").unwrap();
        assert_eq!(file.method, Method::Delta);
        assert!(file.calc_second_order);
        assert_eq!(file.conf_level, 0.95);
        assert!(file.inputs[0].samples.is_empty());

        let problem = file.problem().unwrap();
        assert_eq!(problem.names, vec!["a"]);
        assert_eq!(problem.bounds, vec![[0.0, 2.0]]);
    }

    #[test]
    fn test_yaml_boolean_words_are_names() {
        let file = ProblemFile::parse(
            "outputs:\n  - names: y\n    values: [1.0]\n  - names: [y, on, 3]\n    matrix:\n      - [1.0, 2.0, 3.0]\n  - names: off\n    values: [2.0]\n",
        )
        .unwrap();
        assert_eq!(file.outputs[0].names, OutputNames::from("y"));
        assert_eq!(file.outputs[1].names.as_slice(), ["y", "on", "3"]);
        assert_eq!(file.outputs[2].names, OutputNames::from("off"));

        let outputs = file.output_variables().unwrap();
        assert_eq!(outputs.len(), 3);
    }

    #[test]
    fn test_method_name_is_case_insensitive() {
        let file = ProblemFile::parse("method: SOBOL\ncalc_second_order: true\n").unwrap();
        assert_eq!(file.method, Method::Sobol);
        assert!(file.calc_second_order);

        let file = ProblemFile::parse("method: Fast_Sampler\n").unwrap();
        assert_eq!(file.method, Method::FastSampler);
    }

    #[test]
    fn test_invalid_entries() {
        let file = ProblemFile::parse("conf_level: 1.5\n").unwrap();
        assert!(file.service_config().is_err());

        let ragged = ProblemFile::parse(
            "outputs:\n  - names: y\n    matrix:\n      - [1.0, 2.0]\n      - [3.0]\n",
        )
        .unwrap();
        let err = ragged.output_variables().unwrap_err();
        assert!(err.to_string().contains("row 1"));

        let neither = ProblemFile::parse("outputs:\n  - names: y\n").unwrap();
        assert!(neither.output_variables().is_err());

        let unbounded = ProblemFile::parse("inputs:\n  - name: a\n").unwrap();
        assert!(unbounded.problem().is_err());

        assert!(ProblemFile::parse("method: anova\n").is_err());
    }
}
