mod parameters;
mod problem;
mod results;

pub use parameters::{InputParameter, OutputNames, OutputValues, OutputVariable};
pub use problem::ProblemDescriptor;
pub use results::{Advisory, AnalysisResults, Statistic, Statistics};
