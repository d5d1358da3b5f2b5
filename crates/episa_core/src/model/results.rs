//! Analysis results
//!
//! Each analysis routine returns a [`Statistics`] map for a single output
//! column. The service merges those maps into an [`AnalysisResults`], keeping
//! one entry per processed output in evaluation order.

use std::collections::BTreeMap;
use std::fmt;

use ndarray::{Array1, Array2};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::service::Method;

/// One statistic produced for one output column
#[derive(Debug, Clone, PartialEq)]
pub enum Statistic {
    Scalar(f64),
    Vector(Array1<f64>),
    Matrix(Array2<f64>),
}

impl Statistic {
    #[must_use]
    pub fn as_vector(&self) -> Option<&Array1<f64>> {
        match self {
            Statistic::Vector(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_matrix(&self) -> Option<&Array2<f64>> {
        match self {
            Statistic::Matrix(m) => Some(m),
            _ => None,
        }
    }

    /// Number of values held
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Statistic::Scalar(_) => 1,
            Statistic::Vector(v) => v.len(),
            Statistic::Matrix(m) => m.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<f64>> for Statistic {
    fn from(values: Vec<f64>) -> Self {
        Statistic::Vector(Array1::from(values))
    }
}

impl From<Array1<f64>> for Statistic {
    fn from(values: Array1<f64>) -> Self {
        Statistic::Vector(values)
    }
}

impl From<Array2<f64>> for Statistic {
    fn from(values: Array2<f64>) -> Self {
        Statistic::Matrix(values)
    }
}

// Plain numbers and nested sequences keep reports readable in YAML/JSON.
impl Serialize for Statistic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Statistic::Scalar(v) => serializer.serialize_f64(*v),
            Statistic::Vector(v) => serializer.collect_seq(v.iter()),
            Statistic::Matrix(m) => {
                let mut seq = serializer.serialize_seq(Some(m.nrows()))?;
                for row in m.rows() {
                    seq.serialize_element(&row.to_vec())?;
                }
                seq.end()
            }
        }
    }
}

/// Statistic name to value, for a single output column
pub type Statistics = BTreeMap<String, Statistic>;

/// Non-fatal note emitted when a method assumes a sampling scheme the caller's
/// samples are not guaranteed to follow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub method: Method,
    pub message: String,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Merged results of one `run`: every statistic key maps to one entry per
/// processed output, in the same order as `output_names`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResults {
    pub method: Method,
    #[serde(flatten)]
    pub statistics: BTreeMap<String, Vec<Statistic>>,
    pub output_names: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<Advisory>,
}

impl AnalysisResults {
    /// Merge per-output statistics, preserving evaluation order
    pub fn merge(
        method: Method,
        per_output: Vec<(String, Statistics)>,
        advisories: Vec<Advisory>,
    ) -> Self {
        let mut statistics: BTreeMap<String, Vec<Statistic>> = BTreeMap::new();
        let mut output_names = Vec::with_capacity(per_output.len());

        for (name, stats) in per_output {
            output_names.push(name);
            for (key, value) in stats {
                statistics.entry(key).or_default().push(value);
            }
        }

        Self {
            method,
            statistics,
            output_names,
            advisories,
        }
    }

    /// Entries for one statistic, one per processed output
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[Statistic]> {
        self.statistics.get(key).map(Vec::as_slice)
    }

    /// Statistic names present in the results
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.statistics.keys().map(String::as_str)
    }

    /// Number of processed outputs
    #[must_use]
    pub fn num_outputs(&self) -> usize {
        self.output_names.len()
    }

    /// Stack a vector-valued statistic into an `(n_outputs, len)` matrix.
    ///
    /// Returns `None` for missing keys, matrix-valued statistics or ragged
    /// entries.
    #[must_use]
    pub fn stacked(&self, key: &str) -> Option<Array2<f64>> {
        let entries = self.get(key)?;
        let width = match entries.first()? {
            Statistic::Scalar(_) => 1,
            Statistic::Vector(v) => v.len(),
            Statistic::Matrix(_) => return None,
        };

        let mut data = Vec::with_capacity(entries.len() * width);
        for entry in entries {
            match entry {
                Statistic::Scalar(v) if width == 1 => data.push(*v),
                Statistic::Vector(v) if v.len() == width => data.extend(v.iter()),
                _ => return None,
            }
        }
        Array2::from_shape_vec((entries.len(), width), data).ok()
    }
}
