//! Period estimation modules
//!
//! Convert the onset strength envelope into a BPM candidate using
//! FFT autocorrelation with a log-tempo prior.

pub mod autocorrelation;

pub use autocorrelation::{compute_autocorrelation_fft, estimate_tempo_from_envelope};

/// BPM candidate with confidence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BpmCandidate {
    /// BPM estimate
    pub bpm: f32,

    /// Confidence score (0.0-1.0)
    pub confidence: f32,
}
