//! Analysis pipeline
//!
//! Sequences feature extraction, the three estimators and the timeline
//! reducer, and assembles the report. Estimators that fall back to their
//! defaults turn the run into a partial success; only an unusable waveform
//! or configuration produces a failure report.

use crate::analysis::outcome::{Degradation, Outcome};
use crate::analysis::result::{AnalysisReport, AnalysisStatus, KeyAlternative};
use crate::analysis::timeline::{
    average_confidence, build_timeline, derive_progression, TimelineConfig,
};
use crate::config::AnalysisConfig;
use crate::features::chords::{segment_chords, ChordBank};
use crate::features::chroma::extractor::chroma_from_spectrogram;
use crate::features::chroma::{pitch_class_name, ChromaOptions, ChromaVector};
use crate::features::key::{detect_key, KeyEstimate, KeyTemplates};
use crate::features::spectral::{summarize_spectrum, SpectralSummary};
use crate::features::spectrogram::compute_spectrogram;
use crate::features::tempo::estimate_tempo;
use crate::io::Waveform;
use std::time::Instant;

/// Whole-track features shared by the key estimator and the report
struct AggregateFeatures {
    chroma: ChromaVector,
    spectral: Option<SpectralSummary>,
}

/// Analyze a validated waveform
///
/// Never fails: an invalid configuration yields a failure report, and
/// estimator problems are recorded in `warnings` with defaults substituted.
pub fn analyze_waveform(waveform: &Waveform, config: &AnalysisConfig) -> AnalysisReport {
    let start_time = Instant::now();

    log::debug!(
        "Starting harmonic analysis: {} samples at {} Hz ({:.2}s)",
        waveform.len(),
        waveform.sample_rate(),
        waveform.duration_seconds()
    );

    if let Err(err) = config.validate() {
        log::warn!("Rejecting analysis configuration: {}", err);
        return AnalysisReport::failure(&err);
    }

    let mut warnings = Vec::new();

    let aggregate = aggregate_features(waveform, config);
    let key = match &aggregate {
        Ok(features) => detect_key(&features.chroma, KeyTemplates::shared()),
        Err(err) => Outcome::Degraded(KeyEstimate::fallback(), Degradation::Failed(err.clone())),
    };
    let (chroma, spectral) = match aggregate {
        Ok(features) => (features.chroma, features.spectral),
        Err(_) => (ChromaVector::zeros(), None),
    };
    note_degradation("key", &key, &mut warnings);
    let key = key.into_value();

    let tempo = estimate_tempo(waveform, config);
    note_degradation("tempo", &tempo, &mut warnings);
    let tempo = tempo.into_value();

    let chords = segment_chords(waveform, ChordBank::shared(config.chord_vocabulary), config);
    note_degradation("chords", &chords, &mut warnings);
    let candidates = chords.into_value();

    let timeline_config = TimelineConfig::from_config(config);
    let timeline = build_timeline(&candidates, &timeline_config);
    let progression = derive_progression(&timeline, timeline_config.progression_cap);

    let notes = chroma
        .dominant_pitch_classes(config.dominant_note_count)
        .into_iter()
        .map(|pc| pitch_class_name(pc).to_string())
        .collect();

    let status = if warnings.is_empty() {
        AnalysisStatus::Success
    } else {
        AnalysisStatus::PartialSuccess
    };

    let report = AnalysisReport {
        success: true,
        status,
        duration: waveform.duration_seconds(),
        sample_rate: waveform.sample_rate(),
        key: key.key_name(),
        key_confidence: key.confidence.clamp(0.0, 1.0),
        key_alternatives: key
            .alternatives
            .iter()
            .map(|(k, score)| KeyAlternative {
                key: k.name(),
                score: *score,
            })
            .collect(),
        bpm: tempo.bpm,
        tempo_confidence: tempo.confidence,
        tempo_classification: tempo.classification,
        beat_count: tempo.beat_times.len(),
        progression,
        chord_count: timeline.len(),
        average_chord_confidence: average_confidence(&timeline),
        timeline,
        notes,
        spectral,
        warnings,
        error: None,
    };

    log::info!(
        "Analysis complete in {:.1} ms: key={} ({:.2}), {:.1} BPM, {} chord events, {:?}",
        start_time.elapsed().as_secs_f32() * 1000.0,
        report.key,
        report.key_confidence,
        report.bpm,
        report.chord_count,
        report.status
    );

    report
}

fn aggregate_features(
    waveform: &Waveform,
    config: &AnalysisConfig,
) -> Result<AggregateFeatures, crate::error::AnalysisError> {
    let spectrogram = compute_spectrogram(
        waveform.samples(),
        waveform.sample_rate(),
        config.frame_size,
        config.hop_size,
    )?;

    let frames = chroma_from_spectrogram(&spectrogram, &ChromaOptions::from_config(config));
    let spectral = config
        .spectral_summary
        .then(|| summarize_spectrum(waveform.samples(), &spectrogram, config.mfcc_count));

    Ok(AggregateFeatures {
        chroma: ChromaVector::mean(&frames),
        spectral,
    })
}

fn note_degradation<T>(stage: &str, outcome: &Outcome<T>, warnings: &mut Vec<String>) {
    if let Some(reason) = outcome.degradation() {
        log::warn!("{} estimation degraded: {}", stage, reason);
        warnings.push(format!("{}: {}", stage, reason));
    }
}
