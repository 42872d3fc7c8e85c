//! Analysis result types

use crate::analysis::timeline::TimelineEntry;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::chroma::pitch_class_name;
use crate::features::key::DEFAULT_KEY;
use crate::features::spectral::SpectralSummary;
use crate::features::tempo::{TempoClass, TempoEstimate};
use serde::{Deserialize, Serialize};

/// Musical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Major key (0 = C, 1 = C#, ..., 11 = B)
    Major(u32),
    /// Minor key (0 = C, 1 = C#, ..., 11 = B)
    Minor(u32),
}

impl Key {
    /// Get key name (e.g., "C Major", "C# Minor")
    ///
    /// # Example
    ///
    /// ```
    /// use stratum_harmony::analysis::result::Key;
    ///
    /// assert_eq!(Key::Major(0).name(), "C Major");
    /// assert_eq!(Key::Major(6).name(), "F# Major");
    /// assert_eq!(Key::Minor(9).name(), "A Minor");
    /// ```
    pub fn name(&self) -> String {
        format!("{} {}", pitch_class_name(self.tonic() as usize), self.mode_name())
    }

    /// Tonic pitch class (0 = C)
    pub fn tonic(&self) -> u32 {
        match self {
            Key::Major(i) | Key::Minor(i) => *i % 12,
        }
    }

    /// "Major" or "Minor"
    pub fn mode_name(&self) -> &'static str {
        match self {
            Key::Major(_) => "Major",
            Key::Minor(_) => "Minor",
        }
    }
}

/// Overall analysis outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// Every estimator produced a value
    Success,
    /// At least one estimator fell back to its default
    PartialSuccess,
    /// The waveform or configuration was unusable
    Failure,
}

/// Ranked key alternative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyAlternative {
    /// Key name
    pub key: String,

    /// Pearson correlation
    pub score: f32,
}

/// Complete analysis report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// False only when the waveform or configuration was unusable
    pub success: bool,

    /// Success, partial success or failure
    pub status: AnalysisStatus,

    /// Audio duration in seconds
    pub duration: f32,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Key name, e.g. "A Minor"
    pub key: String,

    /// Key correlation clamped to [0, 1]
    pub key_confidence: f32,

    /// Next-best keys, best first
    pub key_alternatives: Vec<KeyAlternative>,

    /// Tempo in BPM, within [60, 200]
    pub bpm: f32,

    /// Tempo confidence
    pub tempo_confidence: f32,

    /// Tempo class
    pub tempo_classification: TempoClass,

    /// Number of tracked beats
    pub beat_count: usize,

    /// Distinct chords in first-occurrence order
    pub progression: Vec<String>,

    /// Chord-change events
    pub timeline: Vec<TimelineEntry>,

    /// Most prominent pitch classes, strongest first
    pub notes: Vec<String>,

    /// Length of `timeline`
    pub chord_count: usize,

    /// Mean timeline confidence (0 when empty)
    pub average_chord_confidence: f32,

    /// Whole-track spectral statistics
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub spectral: Option<SpectralSummary>,

    /// One entry per estimator that fell back to its default
    pub warnings: Vec<String>,

    /// Error message, present only on failure
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl AnalysisReport {
    /// Report for an unusable input
    pub fn failure(error: &AnalysisError) -> Self {
        let tempo = TempoEstimate::fallback(AnalysisConfig::default().default_bpm);
        Self {
            success: false,
            status: AnalysisStatus::Failure,
            duration: 0.0,
            sample_rate: 0,
            key: DEFAULT_KEY.name(),
            key_confidence: 0.0,
            key_alternatives: Vec::new(),
            bpm: tempo.bpm,
            tempo_confidence: 0.0,
            tempo_classification: tempo.classification,
            beat_count: 0,
            progression: Vec::new(),
            timeline: Vec::new(),
            notes: Vec::new(),
            chord_count: 0,
            average_chord_confidence: 0.0,
            spectral: None,
            warnings: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ProcessingError` if serialization fails
    pub fn to_json(&self) -> Result<String, AnalysisError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::ProcessingError(format!("JSON serialization failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::Major(0).name(), "C Major");
        assert_eq!(Key::Major(1).name(), "C# Major");
        assert_eq!(Key::Minor(1).name(), "C# Minor");
        assert_eq!(Key::Minor(11).name(), "B Minor");
        assert_eq!(Key::Major(12).name(), "C Major");
    }

    #[test]
    fn test_failure_report() {
        let report = AnalysisReport::failure(&AnalysisError::LoadError("empty".to_string()));
        assert!(!report.success);
        assert_eq!(report.status, AnalysisStatus::Failure);
        assert_eq!(report.error.as_deref(), Some("Load error: empty"));

        let json = report.to_json().unwrap();
        assert!(json.contains("\"error\": \"Load error: empty\""));
        assert!(json.contains("\"status\": \"failure\""));
        assert!(!json.contains("spectral"));
    }

    #[test]
    fn test_error_field_omitted_on_success() {
        let mut report = AnalysisReport::failure(&AnalysisError::LoadError("x".to_string()));
        report.success = true;
        report.status = AnalysisStatus::Success;
        report.error = None;
        let json = report.to_json().unwrap();
        assert!(!json.contains("\"error\""));
        assert!(json.contains("\"tempo_classification\": \"fast\""));
    }
}
