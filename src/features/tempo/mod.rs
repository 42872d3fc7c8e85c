//! Tempo estimation
//!
//! Two independent estimates over the same onset envelope:
//! - BPM₁ from the beat tracker (autocorrelation + phase alignment)
//! - BPM₂ = 60 / median inter-onset interval of the picked onsets
//!
//! The final tempo is `w·BPM₁ + (1 − w)·BPM₂`, octave-corrected once and
//! clamped into the canonical range.

use crate::analysis::outcome::{Degradation, Outcome};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::beat_tracking::track_beats;
use crate::features::onset::OnsetStrength;
use crate::io::Waveform;
use serde::{Deserialize, Serialize};

/// Slowest canonical tempo
pub const MIN_CANONICAL_BPM: f32 = 60.0;

/// Fastest canonical tempo
pub const MAX_CANONICAL_BPM: f32 = 200.0;

/// Coarse tempo class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TempoClass {
    /// Below 80 BPM
    #[serde(rename = "slow")]
    Slow,
    /// 80 to 119 BPM
    #[serde(rename = "moderate")]
    Moderate,
    /// 120 to 159 BPM
    #[serde(rename = "fast")]
    Fast,
    /// 160 BPM and above
    #[serde(rename = "very fast")]
    VeryFast,
}

impl TempoClass {
    /// Classify a tempo (lower bounds inclusive)
    pub fn from_bpm(bpm: f32) -> Self {
        if bpm < 80.0 {
            TempoClass::Slow
        } else if bpm < 120.0 {
            TempoClass::Moderate
        } else if bpm < 160.0 {
            TempoClass::Fast
        } else {
            TempoClass::VeryFast
        }
    }

    /// Label used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            TempoClass::Slow => "slow",
            TempoClass::Moderate => "moderate",
            TempoClass::Fast => "fast",
            TempoClass::VeryFast => "very fast",
        }
    }
}

/// Tempo estimation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempoEstimate {
    /// Canonical tempo in BPM
    pub bpm: f32,

    /// Confidence (fixed on success, 0 on fallback)
    pub confidence: f32,

    /// Class of `bpm`
    pub classification: TempoClass,

    /// Beat tracker tempo before blending
    pub beat_bpm: f32,

    /// Inter-onset tempo before blending, if enough onsets were found
    pub onset_bpm: Option<f32>,

    /// Beat grid in seconds
    pub beat_times: Vec<f32>,
}

impl TempoEstimate {
    /// Default tempo at zero confidence
    pub fn fallback(default_bpm: f32) -> Self {
        let bpm = canonicalize_bpm(default_bpm);
        Self {
            bpm,
            confidence: 0.0,
            classification: TempoClass::from_bpm(bpm),
            beat_bpm: bpm,
            onset_bpm: None,
            beat_times: Vec::new(),
        }
    }
}

/// 60 / median inter-onset interval
///
/// The median of an even number of intervals averages the two middle ones.
/// Returns `None` with fewer than two onsets or a non-positive median.
pub fn bpm_from_onsets(onset_times: &[f32]) -> Option<f32> {
    if onset_times.len() < 2 {
        return None;
    }
    let mut intervals: Vec<f32> = onset_times.windows(2).map(|w| w[1] - w[0]).collect();
    intervals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = intervals.len() / 2;
    let median = if intervals.len() % 2 == 0 {
        0.5 * (intervals[mid - 1] + intervals[mid])
    } else {
        intervals[mid]
    };

    if median > 0.0 {
        Some(60.0 / median)
    } else {
        None
    }
}

/// Weighted blend of the beat and onset tempi
pub fn blend_tempo(beat_bpm: f32, onset_bpm: f32, beat_weight: f32) -> f32 {
    beat_weight * beat_bpm + (1.0 - beat_weight) * onset_bpm
}

/// Single octave correction: below 60 doubles, above 200 halves
pub fn octave_correct(bpm: f32) -> f32 {
    if bpm < MIN_CANONICAL_BPM {
        bpm * 2.0
    } else if bpm > MAX_CANONICAL_BPM {
        bpm / 2.0
    } else {
        bpm
    }
}

/// Octave-correct once, then clamp into [60, 200]
pub fn canonicalize_bpm(bpm: f32) -> f32 {
    let corrected = octave_correct(bpm);
    if corrected < MIN_CANONICAL_BPM || corrected > MAX_CANONICAL_BPM {
        log::warn!(
            "Tempo {:.2} BPM outside [{}, {}] after octave correction, clamping",
            corrected,
            MIN_CANONICAL_BPM,
            MAX_CANONICAL_BPM
        );
    }
    corrected.clamp(MIN_CANONICAL_BPM, MAX_CANONICAL_BPM)
}

/// Estimate the tempo of a waveform
///
/// Never fails: a flat envelope, a tracker error or a non-finite blend yields
/// [`TempoEstimate::fallback`] tagged with the reason.
pub fn estimate_tempo(waveform: &Waveform, config: &AnalysisConfig) -> Outcome<TempoEstimate> {
    log::debug!(
        "Estimating tempo: {} samples at {} Hz",
        waveform.len(),
        waveform.sample_rate()
    );

    let fallback = || TempoEstimate::fallback(config.default_bpm);

    let strength = match OnsetStrength::compute(
        waveform.samples(),
        waveform.sample_rate(),
        config.frame_size,
        config.hop_size,
    ) {
        Ok(strength) => strength,
        Err(err) => return Outcome::from_result(Err(err), fallback),
    };

    if strength.is_flat() {
        log::debug!("Tempo: onset envelope is flat");
        return Outcome::Degraded(fallback(), Degradation::SilentSignal);
    }

    Outcome::from_result(estimate_from_strength(&strength, config), fallback)
}

fn estimate_from_strength(
    strength: &OnsetStrength,
    config: &AnalysisConfig,
) -> Result<TempoEstimate, AnalysisError> {
    let track = track_beats(
        strength,
        config.tempo_search_min_bpm,
        config.tempo_search_max_bpm,
        config.tempo_prior_bpm,
    )?;

    let onset_times = strength.onset_times(config.onset_threshold_db);
    let onset_bpm = bpm_from_onsets(&onset_times);
    let raw = blend_tempo(
        track.bpm,
        onset_bpm.unwrap_or(track.bpm),
        config.beat_tempo_weight,
    );

    if !raw.is_finite() {
        return Err(AnalysisError::NumericalError(format!(
            "Blended tempo is {} (beat {:.2}, onsets {:?})",
            raw, track.bpm, onset_bpm
        )));
    }

    let bpm = canonicalize_bpm(raw);
    log::debug!(
        "Tempo: beat {:.2} BPM, onsets {:?} BPM ({} onsets), blended {:.2} -> {:.2} BPM",
        track.bpm,
        onset_bpm,
        onset_times.len(),
        raw,
        bpm
    );

    Ok(TempoEstimate {
        bpm,
        confidence: config.tempo_confidence,
        classification: TempoClass::from_bpm(bpm),
        beat_bpm: track.bpm,
        onset_bpm,
        beat_times: track.beats,
    })
}
