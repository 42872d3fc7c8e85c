//! Chord recognition modules
//!
//! Windowed chroma scored against binary triad templates:
//! - Template banks for several vocabularies
//! - Sliding-window segmenter with optional parallel scoring

pub mod segmenter;
pub mod templates;

pub use segmenter::{score_chroma, segment_chords};
pub use templates::{ChordBank, ChordQuality, ChordTemplate, ChordVocabulary};

use serde::{Deserialize, Serialize};

/// Label emitted when no template clears the confidence threshold
pub const NO_CHORD: &str = "N";

/// Raw per-window chord guess
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordCandidate {
    /// Window start in seconds
    pub start_time: f32,

    /// Chord label, or [`NO_CHORD`]
    pub label: String,

    /// Best cosine similarity (kept even when below threshold)
    pub confidence: f32,
}

impl ChordCandidate {
    /// "N" at zero confidence
    pub fn no_chord(start_time: f32) -> Self {
        Self {
            start_time,
            label: NO_CHORD.to_string(),
            confidence: 0.0,
        }
    }

    /// True when no chord was recognized
    pub fn is_no_chord(&self) -> bool {
        self.label == NO_CHORD
    }
}
