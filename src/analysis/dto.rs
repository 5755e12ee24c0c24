use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AnalysisQuery {
    /// Window length in days; the configured default when absent.
    pub days: Option<i64>,
}
