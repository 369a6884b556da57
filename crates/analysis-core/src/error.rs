use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

impl AnalysisError {
    /// Reject NaN/infinite intermediates before they leak into a result.
    pub fn ensure_finite(name: &str, value: f64) -> Result<f64, AnalysisError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(AnalysisError::CalculationError(format!("{name} is not finite ({value})")))
        }
    }
}
