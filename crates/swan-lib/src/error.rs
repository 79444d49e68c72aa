use thiserror::Error;

/// Failure modes surfaced by the analysis core.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A caller-supplied parameter is outside its documented domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// The record does not hold enough usable samples or beats for the
    /// requested statistic.
    #[error("insufficient data: {0}")]
    InsufficientData(String),
    /// A ratio or logarithm has no defined value for this input.
    #[error("numeric degeneracy: {0}")]
    NumericDegeneracy(String),
}
