//! Key detection modules
//!
//! Detect musical key using:
//! - Krumhansl-Kessler templates (24 keys)
//! - Pearson template correlation

pub mod detector;
pub mod templates;

pub use detector::{detect_key, score_keys, DEFAULT_KEY};
pub use templates::KeyTemplates;

use crate::analysis::result::Key;
use serde::{Deserialize, Serialize};

/// Key detection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEstimate {
    /// Detected key (best match)
    pub key: Key,

    /// Pearson correlation of the best match (-1.0 to 1.0, unclamped)
    pub confidence: f32,

    /// Next-best keys with their correlations, highest first
    pub alternatives: Vec<(Key, f32)>,
}

impl KeyEstimate {
    /// Default key at zero confidence
    pub fn fallback() -> Self {
        Self {
            key: DEFAULT_KEY,
            confidence: 0.0,
            alternatives: Vec::new(),
        }
    }

    /// Key name, e.g. "C# Minor"
    pub fn key_name(&self) -> String {
        self.key.name()
    }
}
