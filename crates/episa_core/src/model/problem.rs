use serde::{Deserialize, Serialize};

/// The `{num_vars, names, bounds}` triple an analysis routine needs to
/// interpret raw samples. Rebuilt from the selected inputs on every run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemDescriptor {
    pub num_vars: usize,
    pub names: Vec<String>,
    pub bounds: Vec<[f64; 2]>,
}

impl ProblemDescriptor {
    pub fn new(names: Vec<String>, bounds: Vec<[f64; 2]>) -> Self {
        debug_assert_eq!(names.len(), bounds.len());
        Self {
            num_vars: names.len(),
            names,
            bounds,
        }
    }

    /// Build a descriptor from a subset of parameters, in selection order
    pub fn select(names: &[String], bounds: &[[f64; 2]], ids: &[usize]) -> Self {
        Self::new(
            ids.iter().map(|&i| names[i].clone()).collect(),
            ids.iter().map(|&i| bounds[i]).collect(),
        )
    }

    /// Width of the range of variable `j`
    #[must_use]
    pub fn range(&self, j: usize) -> f64 {
        self.bounds[j][1] - self.bounds[j][0]
    }
}
