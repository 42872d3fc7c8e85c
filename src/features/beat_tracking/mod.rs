//! Beat tracking
//!
//! Turns the onset strength envelope into a tempo and a regular beat grid:
//! 1. Autocorrelation tempo estimate (see [`crate::features::period`])
//! 2. Phase alignment: the grid offset whose beats collect the most onset
//!    strength wins

use crate::error::AnalysisError;
use crate::features::onset::OnsetStrength;
use crate::features::period::estimate_tempo_from_envelope;

/// Tempo and beat grid recovered from an onset envelope
#[derive(Debug, Clone, PartialEq)]
pub struct BeatTrack {
    /// Tempo of the grid in BPM
    pub bpm: f32,

    /// Beat times in seconds, ascending
    pub beats: Vec<f32>,

    /// Beat period in envelope frames (fractional)
    pub period_frames: f32,

    /// Autocorrelation confidence of the period (0.0-1.0)
    pub confidence: f32,
}

/// Track beats in an onset strength envelope
///
/// # Arguments
///
/// * `strength` - Onset strength envelope
/// * `min_bpm` / `max_bpm` - Tempo search range
/// * `prior_bpm` - Preferred tempo
///
/// # Errors
///
/// Returns `AnalysisError::ProcessingError` when the envelope is flat or too
/// short to contain a beat period.
pub fn track_beats(
    strength: &OnsetStrength,
    min_bpm: f32,
    max_bpm: f32,
    prior_bpm: f32,
) -> Result<BeatTrack, AnalysisError> {
    if strength.is_flat() {
        return Err(AnalysisError::ProcessingError(
            "Onset envelope is flat, nothing to track".to_string(),
        ));
    }

    let frame_rate = strength.frame_rate();
    let candidate =
        estimate_tempo_from_envelope(&strength.values, frame_rate, min_bpm, max_bpm, prior_bpm)?;
    let period = 60.0 * frame_rate / candidate.bpm;

    let phase = best_phase(&strength.values, period);
    let beats = beat_frames(strength.values.len(), period, phase)
        .into_iter()
        .map(|frame| strength.frame_time(frame))
        .collect::<Vec<_>>();

    log::debug!(
        "Beat tracking: {:.2} BPM, period {:.2} frames, phase {} frames, {} beats",
        candidate.bpm,
        period,
        phase,
        beats.len()
    );

    Ok(BeatTrack {
        bpm: candidate.bpm,
        beats,
        period_frames: period,
        confidence: candidate.confidence,
    })
}

/// Grid offset (in whole frames) maximizing the summed envelope on the grid
fn best_phase(envelope: &[f32], period: f32) -> usize {
    let n_phases = (period.ceil() as usize).max(1);
    let mut best = 0usize;
    let mut best_sum = f32::NEG_INFINITY;
    for phase in 0..n_phases {
        let sum: f32 = beat_frames(envelope.len(), period, phase)
            .into_iter()
            .filter_map(|frame| envelope.get(frame.round() as usize))
            .sum();
        if sum > best_sum {
            best_sum = sum;
            best = phase;
        }
    }
    best
}

fn beat_frames(n_frames: usize, period: f32, phase: usize) -> Vec<f32> {
    let mut frames = Vec::new();
    let mut k = 0usize;
    loop {
        let frame = phase as f32 + k as f32 * period;
        if frame.round() as usize >= n_frames {
            break;
        }
        frames.push(frame);
        k += 1;
    }
    frames
}
