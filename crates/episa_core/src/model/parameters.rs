//! Input parameter and output variable descriptors
//!
//! These are the construction-time inputs of the sensitivity analysis
//! service. Input parameters carry one sample per model evaluation; output
//! variables carry either one value per evaluation or a matrix whose other
//! axis is the output's own sub-dimensionality (e.g. one column per brain
//! region).

use std::fmt;

use ndarray::{Array1, Array2};
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// A sampled model input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputParameter {
    pub name: String,
    pub samples: Vec<f64>,
    /// Explicit `[low, high]` range; the observed min/max is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<[f64; 2]>,
}

impl InputParameter {
    pub fn new(name: impl Into<String>, samples: impl Into<Vec<f64>>) -> Self {
        Self {
            name: name.into(),
            samples: samples.into(),
            bounds: None,
        }
    }

    /// Set explicit bounds
    #[must_use]
    pub fn with_bounds(mut self, low: f64, high: f64) -> Self {
        self.bounds = Some([low, high]);
        self
    }

    /// Observed `[min, max]` of the samples, `None` when there are no samples
    #[must_use]
    pub fn observed_bounds(&self) -> Option<[f64; 2]> {
        if self.samples.is_empty() {
            return None;
        }
        let (min, max) = self
            .samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        Some([min, max])
    }
}

/// Names attached to an output variable
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutputNames {
    One(String),
    Many(Vec<String>),
}

/// Accepts one name or a list of names. Scalars a self-describing format
/// reads as numbers or booleans are kept as their text; list elements are
/// always requested as strings.
struct OutputNamesVisitor;

impl<'de> Visitor<'de> for OutputNamesVisitor {
    type Value = OutputNames;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a name or a list of names")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(OutputNames::One(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(OutputNames::One(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(OutputNames::One(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(OutputNames::One(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(OutputNames::One(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(OutputNames::One(v.to_string()))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut names = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(name) = seq.next_element::<String>()? {
            names.push(name);
        }
        Ok(OutputNames::Many(names))
    }
}

impl<'de> Deserialize<'de> for OutputNames {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(OutputNamesVisitor)
    }
}

impl OutputNames {
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        match self {
            OutputNames::One(name) => std::slice::from_ref(name),
            OutputNames::Many(names) => names,
        }
    }

    /// First name, used to label errors
    #[must_use]
    pub fn label(&self) -> &str {
        self.as_slice().first().map_or("<unnamed>", String::as_str)
    }
}

impl From<&str> for OutputNames {
    fn from(name: &str) -> Self {
        OutputNames::One(name.to_string())
    }
}

impl From<String> for OutputNames {
    fn from(name: String) -> Self {
        OutputNames::One(name)
    }
}

impl From<Vec<String>> for OutputNames {
    fn from(names: Vec<String>) -> Self {
        OutputNames::Many(names)
    }
}

impl From<Vec<&str>> for OutputNames {
    fn from(names: Vec<&str>) -> Self {
        OutputNames::Many(names.into_iter().map(str::to_string).collect())
    }
}

/// Raw output values, either flat or two-dimensional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutputValues {
    Vector(Array1<f64>),
    Matrix(Array2<f64>),
}

impl OutputValues {
    /// Total number of values
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            OutputValues::Vector(v) => v.len(),
            OutputValues::Matrix(m) => m.len(),
        }
    }

    #[must_use]
    pub fn shape(&self) -> Vec<usize> {
        match self {
            OutputValues::Vector(v) => vec![v.len()],
            OutputValues::Matrix(m) => m.shape().to_vec(),
        }
    }

    /// Values in row-major order
    #[must_use]
    pub fn flatten(&self) -> Array1<f64> {
        match self {
            OutputValues::Vector(v) => v.clone(),
            OutputValues::Matrix(m) => m.iter().copied().collect(),
        }
    }
}

impl From<Vec<f64>> for OutputValues {
    fn from(values: Vec<f64>) -> Self {
        OutputValues::Vector(Array1::from(values))
    }
}

impl From<Array1<f64>> for OutputValues {
    fn from(values: Array1<f64>) -> Self {
        OutputValues::Vector(values)
    }
}

impl From<Array2<f64>> for OutputValues {
    fn from(values: Array2<f64>) -> Self {
        OutputValues::Matrix(values)
    }
}

/// A model output, possibly multi-column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputVariable {
    pub names: OutputNames,
    pub values: OutputValues,
}

impl OutputVariable {
    pub fn new(names: impl Into<OutputNames>, values: impl Into<OutputValues>) -> Self {
        Self {
            names: names.into(),
            values: values.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observed_bounds() {
        let input = InputParameter::new("x0", vec![0.3, -1.0, 2.5]);
        assert_eq!(input.observed_bounds(), Some([-1.0, 2.5]));
        assert_eq!(InputParameter::new("e", vec![]).observed_bounds(), None);
    }

    #[test]
    fn test_output_names_from_json() {
        let one: OutputNames = serde_json::from_str(r#""y""#).unwrap();
        assert_eq!(one, OutputNames::from("y"));
        let many: OutputNames = serde_json::from_str(r#"["left", "right"]"#).unwrap();
        assert_eq!(many.as_slice(), ["left", "right"]);
        let numeric: OutputNames = serde_json::from_str("7").unwrap();
        assert_eq!(numeric, OutputNames::from("7"));
        assert!(serde_json::from_str::<OutputNames>(r#"{"a": 1}"#).is_err());
    }

    #[test]
    fn test_output_values_shape() {
        let m = Array2::<f64>::zeros((3, 5));
        let values = OutputValues::from(m);
        assert_eq!(values.size(), 15);
        assert_eq!(values.shape(), vec![3, 5]);
    }
}
