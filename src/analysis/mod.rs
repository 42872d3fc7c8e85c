//! Analysis and result aggregation modules
//!
//! Combines the feature estimators into the final report:
//! - Tagged estimator outcomes
//! - Chord timeline reduction
//! - Result types
//! - Pipeline orchestration

pub mod orchestrator;
pub mod outcome;
pub mod result;
pub mod timeline;

pub use orchestrator::analyze_waveform;
