//! # Stratum Harmony
//!
//! Harmonic and rhythmic analysis of decoded audio: estimated key, tempo, a
//! chord timeline and a dominant-note summary, assembled into one report.
//!
//! ## Features
//!
//! - **Key Detection**: Chroma-based analysis with Krumhansl-Kessler template matching
//! - **Tempo Detection**: Beat-tracking and inter-onset estimates, blended and octave-corrected
//! - **Chord Timeline**: Windowed chord template matching reduced to chord-change events
//! - **Spectral Summary**: Centroid, rolloff, bandwidth, zero-crossing rate and MFCC means
//!
//! ## Quick Start
//!
//! ```no_run
//! use stratum_harmony::{analyze_audio, AnalysisConfig};
//!
//! // Decoded mono samples
//! let samples: Vec<f32> = vec![0.0; 44100 * 10];
//! let report = analyze_audio(&samples, 44100, &AnalysisConfig::default());
//!
//! println!("Key: {} (confidence: {:.2})", report.key, report.key_confidence);
//! println!("BPM: {:.1} ({})", report.bpm, report.tempo_classification.as_str());
//! println!("{}", report.to_json()?);
//! # Ok::<(), stratum_harmony::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Waveform → Features (chroma, spectral) → Key / Tempo / Chords → Timeline → Report
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;

// Re-export main types
pub use analysis::orchestrator::analyze_waveform;
pub use analysis::result::{AnalysisReport, AnalysisStatus, Key, KeyAlternative};
pub use analysis::timeline::TimelineEntry;
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use features::chords::ChordVocabulary;
pub use features::tempo::TempoClass;
pub use io::Waveform;
pub use preprocessing::channel_mixer::ChannelMixMode;

/// Main analysis function
///
/// Validates the samples and runs the full pipeline.
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Analysis configuration parameters
///
/// # Returns
///
/// Always a report. Empty input, a zero sample rate or non-finite samples
/// produce a failure report (`success == false`) carrying the load error.
///
/// # Example
///
/// ```
/// use stratum_harmony::{analyze_audio, AnalysisConfig};
///
/// let report = analyze_audio(&[], 44100, &AnalysisConfig::default());
/// assert!(!report.success);
/// assert!(report.error.is_some());
/// ```
pub fn analyze_audio(samples: &[f32], sample_rate: u32, config: &AnalysisConfig) -> AnalysisReport {
    log::debug!(
        "Starting audio analysis: {} samples at {} Hz",
        samples.len(),
        sample_rate
    );

    match Waveform::new(samples.to_vec(), sample_rate) {
        Ok(waveform) => analyze_waveform(&waveform, config),
        Err(err) => {
            log::warn!("Cannot analyze input: {}", err);
            AnalysisReport::failure(&err)
        }
    }
}
