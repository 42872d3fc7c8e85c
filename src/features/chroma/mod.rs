//! Chroma extraction modules
//!
//! Extract pitch-class distribution (12 semitones) from audio:
//! - Chroma vector type and aggregation
//! - Spectrum-to-pitch-class folding
//! - Normalization and similarity measures

pub mod extractor;
pub mod normalization;

use serde::{Deserialize, Serialize};

pub use extractor::{extract_chroma, mean_chroma, ChromaOptions};

/// Number of pitch classes
pub const N_PITCH_CLASSES: usize = 12;

/// Pitch class names, C first
pub const PITCH_CLASS_NAMES: [&str; N_PITCH_CLASSES] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Name of a pitch class index (wraps modulo 12)
pub fn pitch_class_name(index: usize) -> &'static str {
    PITCH_CLASS_NAMES[index % N_PITCH_CLASSES]
}

/// 12-bin pitch-class energy vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChromaVector(pub [f32; N_PITCH_CLASSES]);

impl ChromaVector {
    /// All-zero vector (silence)
    pub fn zeros() -> Self {
        Self([0.0; N_PITCH_CLASSES])
    }

    /// Energies as a slice, C first
    pub fn values(&self) -> &[f32; N_PITCH_CLASSES] {
        &self.0
    }

    /// Sum of all bins
    pub fn sum(&self) -> f32 {
        self.0.iter().sum()
    }

    /// True when the vector carries no energy
    pub fn is_silent(&self) -> bool {
        self.sum() <= normalization::EPSILON
    }

    /// Divide by the bin sum; `None` for silence
    pub fn normalized(&self) -> Option<ChromaVector> {
        normalization::normalize_sum(&self.0).map(ChromaVector)
    }

    /// Element-wise mean of a set of vectors; zeros for an empty set
    pub fn mean(vectors: &[ChromaVector]) -> ChromaVector {
        if vectors.is_empty() {
            return ChromaVector::zeros();
        }
        let mut acc = [0.0f64; N_PITCH_CLASSES];
        for v in vectors {
            for (a, &x) in acc.iter_mut().zip(&v.0) {
                *a += x as f64;
            }
        }
        let n = vectors.len() as f64;
        let mut out = [0.0f32; N_PITCH_CLASSES];
        for (o, a) in out.iter_mut().zip(acc) {
            *o = (a / n) as f32;
        }
        ChromaVector(out)
    }

    /// Pitch-class indices of the `n` strongest bins, strongest first
    ///
    /// Equal energies keep ascending pitch-class order. Silence yields nothing.
    pub fn dominant_pitch_classes(&self, n: usize) -> Vec<usize> {
        if self.is_silent() {
            return Vec::new();
        }
        let mut order: Vec<usize> = (0..N_PITCH_CLASSES).collect();
        order.sort_by(|&a, &b| {
            self.0[b]
                .partial_cmp(&self.0[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        order.truncate(n.min(N_PITCH_CLASSES));
        order
    }
}
