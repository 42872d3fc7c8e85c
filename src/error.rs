//! Error types for the harmonic analysis engine

use std::fmt;

/// Errors that can occur during audio analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Invalid input parameters
    InvalidInput(String),

    /// The waveform could not be produced (empty, corrupt or non-finite samples)
    LoadError(String),

    /// Processing error during analysis
    ProcessingError(String),

    /// Numerical error (non-finite intermediate values, etc.)
    NumericalError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::LoadError(msg) => write!(f, "Load error: {}", msg),
            AnalysisError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            AnalysisError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}
