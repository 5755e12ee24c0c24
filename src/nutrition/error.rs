use thiserror::Error;

/// Programmer errors raised by the analysis core.
///
/// Missing data, empty buckets and zero goals are not errors; they have
/// defined numeric outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("analysis window must cover at least one day, got {0}")]
    InvalidWindow(i64),

    #[error("analysis window of {0} days reaches outside the supported calendar")]
    WindowOutOfRange(i64),
}
