//! Configuration parameters for harmonic analysis

use crate::error::AnalysisError;
use crate::features::chords::templates::ChordVocabulary;

/// Analysis configuration parameters
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    // STFT parameters (whole-track features, onsets, beat tracking)
    /// Frame size for STFT (default: 2048)
    pub frame_size: usize,

    /// Hop size for STFT (default: 512)
    pub hop_size: usize,

    // Chroma extraction
    /// Lowest frequency folded into chroma (default: 55.0 Hz, A1)
    pub chroma_min_frequency: f32,

    /// Highest frequency folded into chroma (default: 5000.0 Hz)
    pub chroma_max_frequency: f32,

    /// Tuning reference for A4 (default: 440.0 Hz)
    pub center_frequency: f32,

    /// Enable soft chroma mapping (default: false)
    /// Soft mapping spreads frequency bins to neighboring semitones
    pub soft_chroma_mapping: bool,

    /// Soft mapping standard deviation in semitones (default: 0.5)
    pub soft_mapping_sigma: f32,

    /// Chroma sharpening power applied to chord-window chroma (default: 1.0 = none)
    pub chroma_sharpening_power: f32,

    // Chord segmentation
    /// Chord analysis window length in seconds (default: 1.0)
    pub chord_window_seconds: f32,

    /// Hop between chord windows in seconds (default: 0.5)
    pub chord_hop_seconds: f32,

    /// Trailing windows shorter than this are dropped (default: 0.5 s)
    pub chord_min_segment_seconds: f32,

    /// STFT frame size inside a chord window (default: 2048)
    pub chord_frame_size: usize,

    /// STFT hop size inside a chord window (default: 256)
    pub chord_hop_size: usize,

    /// Chord templates to score against (default: 24 major/minor triads)
    pub chord_vocabulary: ChordVocabulary,

    /// Best template score below this yields "N" (default: 0.3)
    pub min_chord_confidence: f32,

    /// Score chord windows on the rayon thread pool (default: true)
    pub parallel_chord_scoring: bool,

    // Timeline
    /// Repeat a chord entry after this many seconds without a change (default: 4.0)
    pub timeline_max_gap_seconds: f32,

    /// Repeat a chord entry when confidence rises by more than this (default: 0.2)
    pub timeline_confidence_jump: f32,

    /// Maximum number of distinct chords in the progression (default: 8)
    pub progression_cap: usize,

    // Tempo
    /// Lower bound of the beat-tracker tempo search (default: 30.0 BPM)
    pub tempo_search_min_bpm: f32,

    /// Upper bound of the beat-tracker tempo search (default: 300.0 BPM)
    pub tempo_search_max_bpm: f32,

    /// Centre of the log-tempo prior used by the beat tracker (default: 120.0 BPM)
    pub tempo_prior_bpm: f32,

    /// Onset peak threshold relative to the strongest onset (default: -20.0 dB)
    pub onset_threshold_db: f32,

    /// Weight of the beat-tracker estimate in the blend (default: 0.7)
    pub beat_tempo_weight: f32,

    /// Confidence reported for a successful tempo estimate (default: 0.8)
    pub tempo_confidence: f32,

    /// Tempo reported when estimation fails (default: 120.0 BPM)
    pub default_bpm: f32,

    // Reporting
    /// Number of dominant pitch classes reported (default: 4)
    pub dominant_note_count: usize,

    /// Compute the auxiliary spectral summary (default: true)
    pub spectral_summary: bool,

    /// Number of cepstral coefficients in the spectral summary (default: 13)
    pub mfcc_count: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_size: 2048,
            hop_size: 512,
            chroma_min_frequency: 55.0,
            chroma_max_frequency: 5000.0,
            center_frequency: 440.0,
            soft_chroma_mapping: false,
            soft_mapping_sigma: 0.5,
            chroma_sharpening_power: 1.0,
            chord_window_seconds: 1.0,
            chord_hop_seconds: 0.5,
            chord_min_segment_seconds: 0.5,
            chord_frame_size: 2048,
            chord_hop_size: 256,
            chord_vocabulary: ChordVocabulary::MajorMinor,
            min_chord_confidence: 0.3,
            parallel_chord_scoring: true,
            timeline_max_gap_seconds: 4.0,
            timeline_confidence_jump: 0.2,
            progression_cap: 8,
            tempo_search_min_bpm: 30.0,
            tempo_search_max_bpm: 300.0,
            tempo_prior_bpm: 120.0,
            onset_threshold_db: -20.0,
            beat_tempo_weight: 0.7,
            tempo_confidence: 0.8,
            default_bpm: 120.0,
            dominant_note_count: 4,
            spectral_summary: true,
            mfcc_count: 13,
        }
    }
}

impl AnalysisConfig {
    /// Check parameter consistency
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` naming the first offending field.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        fn invalid(msg: String) -> Result<(), AnalysisError> {
            Err(AnalysisError::InvalidInput(msg))
        }

        let real_fields = [
            ("chroma_min_frequency", self.chroma_min_frequency),
            ("chroma_max_frequency", self.chroma_max_frequency),
            ("center_frequency", self.center_frequency),
            ("soft_mapping_sigma", self.soft_mapping_sigma),
            ("chroma_sharpening_power", self.chroma_sharpening_power),
            ("chord_window_seconds", self.chord_window_seconds),
            ("chord_hop_seconds", self.chord_hop_seconds),
            ("chord_min_segment_seconds", self.chord_min_segment_seconds),
            ("min_chord_confidence", self.min_chord_confidence),
            ("timeline_max_gap_seconds", self.timeline_max_gap_seconds),
            ("timeline_confidence_jump", self.timeline_confidence_jump),
            ("tempo_search_min_bpm", self.tempo_search_min_bpm),
            ("tempo_search_max_bpm", self.tempo_search_max_bpm),
            ("tempo_prior_bpm", self.tempo_prior_bpm),
            ("onset_threshold_db", self.onset_threshold_db),
            ("beat_tempo_weight", self.beat_tempo_weight),
            ("tempo_confidence", self.tempo_confidence),
            ("default_bpm", self.default_bpm),
        ];
        if let Some((name, value)) = real_fields.iter().find(|(_, v)| !v.is_finite()) {
            return invalid(format!("{} must be finite (got {})", name, value));
        }

        if self.frame_size == 0 || self.hop_size == 0 {
            return invalid(format!(
                "frame_size and hop_size must be > 0 (got {}, {})",
                self.frame_size, self.hop_size
            ));
        }
        if self.chord_frame_size == 0 || self.chord_hop_size == 0 {
            return invalid(format!(
                "chord_frame_size and chord_hop_size must be > 0 (got {}, {})",
                self.chord_frame_size, self.chord_hop_size
            ));
        }
        if !(self.chroma_min_frequency > 0.0 && self.chroma_min_frequency < self.chroma_max_frequency)
        {
            return invalid(format!(
                "Invalid chroma band: [{:.1}, {:.1}] Hz",
                self.chroma_min_frequency, self.chroma_max_frequency
            ));
        }
        if self.center_frequency <= 0.0 || self.soft_mapping_sigma <= 0.0 {
            return invalid("center_frequency and soft_mapping_sigma must be > 0".to_string());
        }
        if self.chroma_sharpening_power <= 0.0 {
            return invalid(format!(
                "chroma_sharpening_power must be > 0 (got {})",
                self.chroma_sharpening_power
            ));
        }
        if self.chord_window_seconds <= 0.0
            || self.chord_hop_seconds <= 0.0
            || self.chord_hop_seconds > self.chord_window_seconds
        {
            return invalid(format!(
                "Chord hop must be in (0, window]: window={:.3}s, hop={:.3}s",
                self.chord_window_seconds, self.chord_hop_seconds
            ));
        }
        if self.chord_min_segment_seconds < 0.0
            || self.chord_min_segment_seconds > self.chord_window_seconds
        {
            return invalid(format!(
                "chord_min_segment_seconds ({:.3}) exceeds the window ({:.3})",
                self.chord_min_segment_seconds, self.chord_window_seconds
            ));
        }
        if !(0.0..=1.0).contains(&self.min_chord_confidence) {
            return invalid(format!(
                "min_chord_confidence must be in [0, 1] (got {})",
                self.min_chord_confidence
            ));
        }
        if self.timeline_max_gap_seconds <= 0.0 || self.timeline_confidence_jump < 0.0 {
            return invalid("Timeline thresholds must be positive".to_string());
        }
        if self.progression_cap == 0 {
            return invalid("progression_cap must be > 0".to_string());
        }
        if self.tempo_search_min_bpm <= 0.0 || self.tempo_search_min_bpm >= self.tempo_search_max_bpm
        {
            return invalid(format!(
                "Invalid tempo search range: [{:.1}, {:.1}] BPM",
                self.tempo_search_min_bpm, self.tempo_search_max_bpm
            ));
        }
        if !(0.0..=1.0).contains(&self.beat_tempo_weight) {
            return invalid(format!(
                "beat_tempo_weight must be in [0, 1] (got {})",
                self.beat_tempo_weight
            ));
        }
        if self.default_bpm <= 0.0 || self.tempo_prior_bpm <= 0.0 {
            return invalid("default_bpm and tempo_prior_bpm must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_hop_larger_than_window_rejected() {
        let config = AnalysisConfig {
            chord_window_seconds: 1.0,
            chord_hop_seconds: 1.5,
            ..AnalysisConfig::default()
        };
        assert!(matches!(config.validate(), Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_zero_hop_rejected() {
        let config = AnalysisConfig {
            hop_size: 0,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_finite_fields_rejected() {
        let configs = [
            AnalysisConfig { chord_hop_seconds: f32::NAN, ..AnalysisConfig::default() },
            AnalysisConfig { chord_window_seconds: f32::NAN, ..AnalysisConfig::default() },
            AnalysisConfig { chord_min_segment_seconds: f32::NAN, ..AnalysisConfig::default() },
            AnalysisConfig { timeline_max_gap_seconds: f32::NAN, ..AnalysisConfig::default() },
            AnalysisConfig { timeline_confidence_jump: f32::NAN, ..AnalysisConfig::default() },
            AnalysisConfig { center_frequency: f32::NAN, ..AnalysisConfig::default() },
            AnalysisConfig { chroma_sharpening_power: f32::NAN, ..AnalysisConfig::default() },
            AnalysisConfig { tempo_search_max_bpm: f32::INFINITY, ..AnalysisConfig::default() },
            AnalysisConfig { onset_threshold_db: f32::NAN, ..AnalysisConfig::default() },
            AnalysisConfig { default_bpm: f32::NAN, ..AnalysisConfig::default() },
        ];
        for config in configs {
            assert!(
                matches!(config.validate(), Err(AnalysisError::InvalidInput(_))),
                "{:?}",
                config
            );
        }
    }

    #[test]
    fn test_inverted_tempo_range_rejected() {
        let config = AnalysisConfig {
            tempo_search_min_bpm: 200.0,
            tempo_search_max_bpm: 100.0,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
