//! Tagged estimator outcomes
//!
//! Sub-estimators never fail the whole analysis. They return either the value
//! they estimated or a documented default together with the reason it had to
//! be substituted.

use crate::error::AnalysisError;
use std::fmt;

/// Why an estimator fell back to its default
#[derive(Debug, Clone, PartialEq)]
pub enum Degradation {
    /// The signal (or the relevant part of it) carries no usable energy
    SilentSignal,
    /// An intermediate or final value was NaN or infinite
    NonFinite(String),
    /// The estimator returned an error
    Failed(AnalysisError),
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degradation::SilentSignal => write!(f, "silent or constant signal"),
            Degradation::NonFinite(what) => write!(f, "non-finite value: {}", what),
            Degradation::Failed(err) => write!(f, "{}", err),
        }
    }
}

/// Result of one sub-estimator
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The estimator produced a value
    Estimated(T),
    /// The estimator fell back to a default value
    Degraded(T, Degradation),
}

impl<T> Outcome<T> {
    /// Wrap a fallible estimate, substituting `fallback` on error
    ///
    /// Numerical errors are tagged [`Degradation::NonFinite`]; every other
    /// error is carried as [`Degradation::Failed`].
    pub fn from_result(result: Result<T, AnalysisError>, fallback: impl FnOnce() -> T) -> Self {
        match result {
            Ok(value) => Outcome::Estimated(value),
            Err(AnalysisError::NumericalError(what)) => {
                Outcome::Degraded(fallback(), Degradation::NonFinite(what))
            }
            Err(err) => Outcome::Degraded(fallback(), Degradation::Failed(err)),
        }
    }

    /// The estimate or the substituted default
    pub fn value(&self) -> &T {
        match self {
            Outcome::Estimated(value) | Outcome::Degraded(value, _) => value,
        }
    }

    /// Consume the outcome, keeping the value
    pub fn into_value(self) -> T {
        match self {
            Outcome::Estimated(value) | Outcome::Degraded(value, _) => value,
        }
    }

    /// True if a default was substituted
    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded(..))
    }

    /// Reason for the substitution, if any
    pub fn degradation(&self) -> Option<&Degradation> {
        match self {
            Outcome::Estimated(_) => None,
            Outcome::Degraded(_, reason) => Some(reason),
        }
    }
}
