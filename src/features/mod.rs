//! Feature extraction modules
//!
//! This module contains all feature extraction algorithms:
//! - Spectrogram and spectral summary
//! - Chroma extraction
//! - Onset detection, period estimation and beat tracking
//! - Tempo estimation
//! - Key detection
//! - Chord segmentation

pub mod beat_tracking;
pub mod chords;
pub mod chroma;
pub mod key;
pub mod onset;
pub mod period;
pub mod spectral;
pub mod spectrogram;
pub mod tempo;
