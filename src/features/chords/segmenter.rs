//! Sliding-window chord segmentation
//!
//! Each window is reduced to a mean chroma, sum-normalized and compared with
//! every template by cosine similarity. The best template names the window
//! unless its score is below the minimum confidence, in which case the window
//! is "N" and keeps the sub-threshold score.

use super::templates::ChordBank;
use super::{ChordCandidate, NO_CHORD};
use crate::analysis::outcome::{Degradation, Outcome};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::chroma::normalization::{cosine_similarity, sharpen_chroma};
use crate::features::chroma::{mean_chroma, ChromaOptions, ChromaVector};
use crate::io::{plan_segments, Segment, Waveform};
use rayon::prelude::*;

/// Label and score for one chroma vector
///
/// Silent or non-finite chroma scores "N" at 0. Ties keep the earlier
/// template in bank order.
pub fn score_chroma(chroma: &ChromaVector, bank: &ChordBank, min_confidence: f32) -> (String, f32) {
    let normalized = match chroma.normalized() {
        Some(normalized) if normalized.values().iter().all(|x| x.is_finite()) => normalized,
        _ => return (NO_CHORD.to_string(), 0.0),
    };

    let mut best: Option<(&str, f32)> = None;
    for template in bank.templates() {
        let score = cosine_similarity(normalized.values(), &template.profile);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((template.name.as_str(), score)),
        }
    }

    match best {
        Some((name, score)) if score.is_finite() && score >= min_confidence => {
            (name.to_string(), score)
        }
        Some((_, score)) if score.is_finite() => (NO_CHORD.to_string(), score),
        _ => (NO_CHORD.to_string(), 0.0),
    }
}

/// Segment a waveform into per-window chord candidates
///
/// One candidate per window, ordered by start time. Windows are scored in
/// parallel when `parallel_chord_scoring` is set; the indexed collect keeps
/// window order.
///
/// Never fails: a scoring error yields "N" at 0 for every window, tagged with
/// the error.
pub fn segment_chords(
    waveform: &Waveform,
    bank: &ChordBank,
    config: &AnalysisConfig,
) -> Outcome<Vec<ChordCandidate>> {
    let segments = plan_segments(
        waveform.len(),
        waveform.sample_rate(),
        waveform.seconds_to_samples(config.chord_window_seconds),
        waveform.seconds_to_samples(config.chord_hop_seconds),
        waveform.seconds_to_samples(config.chord_min_segment_seconds),
    );

    log::debug!(
        "Segmenting chords: {} windows, {} templates, parallel={}",
        segments.len(),
        bank.len(),
        config.parallel_chord_scoring
    );

    let options = ChromaOptions::from_config(config);
    let score = |segment: &Segment| score_segment(waveform, segment, bank, &options, config);

    let scored: Result<Vec<(ChordCandidate, bool)>, AnalysisError> = if config.parallel_chord_scoring
    {
        segments.par_iter().map(score).collect()
    } else {
        segments.iter().map(score).collect()
    };

    let scored = match scored {
        Ok(scored) => scored,
        Err(err) => {
            let fallback = segments
                .iter()
                .map(|segment| ChordCandidate::no_chord(segment.start_time))
                .collect();
            return Outcome::Degraded(fallback, Degradation::Failed(err));
        }
    };

    let non_finite = scored.iter().filter(|(_, finite)| !finite).count();
    let candidates: Vec<ChordCandidate> = scored.into_iter().map(|(c, _)| c).collect();

    if non_finite > 0 {
        return Outcome::Degraded(
            candidates,
            Degradation::NonFinite(format!("chroma in {} chord window(s)", non_finite)),
        );
    }

    let all_silent = candidates
        .iter()
        .all(|c| c.is_no_chord() && c.confidence == 0.0);
    if !candidates.is_empty() && all_silent {
        return Outcome::Degraded(candidates, Degradation::SilentSignal);
    }

    Outcome::Estimated(candidates)
}

/// Score one window; the flag is false when its chroma was non-finite
fn score_segment(
    waveform: &Waveform,
    segment: &Segment,
    bank: &ChordBank,
    options: &ChromaOptions,
    config: &AnalysisConfig,
) -> Result<(ChordCandidate, bool), AnalysisError> {
    let chroma = mean_chroma(
        waveform.slice(segment.start_sample, segment.end_sample),
        waveform.sample_rate(),
        config.chord_frame_size,
        config.chord_hop_size,
        options,
    )?;

    if chroma.values().iter().any(|x| !x.is_finite()) {
        log::warn!("Non-finite chroma in chord window at {:.2}s", segment.start_time);
        return Ok((ChordCandidate::no_chord(segment.start_time), false));
    }

    let chroma = if config.chroma_sharpening_power != 1.0 {
        ChromaVector(sharpen_chroma(chroma.values(), config.chroma_sharpening_power))
    } else {
        chroma
    };

    let (label, confidence) = score_chroma(&chroma, bank, config.min_chord_confidence);
    Ok((
        ChordCandidate {
            start_time: segment.start_time,
            label,
            confidence,
        },
        true,
    ))
}
