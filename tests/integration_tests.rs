//! Integration tests for the harmonic analysis pipeline

use stratum_harmony::{
    analyze_audio, analyze_waveform, AnalysisConfig, AnalysisStatus, ChannelMixMode,
    ChordVocabulary, TempoClass, Waveform,
};

const SR: u32 = 22050;

/// Equal-amplitude sine mix
fn tones(freqs: &[f32], seconds: f32) -> Vec<f32> {
    let n = (seconds * SR as f32) as usize;
    (0..n)
        .map(|i| {
            let t = i as f32 / SR as f32;
            freqs
                .iter()
                .map(|f| (2.0 * std::f32::consts::PI * f * t).sin())
                .sum::<f32>()
                / freqs.len() as f32
        })
        .collect()
}

/// Short decaying 1 kHz clicks on every beat
fn click_track(seconds: f32, bpm: f32) -> Vec<f32> {
    let n = (seconds * SR as f32) as usize;
    let mut samples = vec![0.0f32; n];
    let interval = 60.0 / bpm * SR as f32;
    let click_len = (0.03 * SR as f32) as usize;
    let mut beat = 0usize;
    loop {
        let start = (beat as f32 * interval).round() as usize;
        if start >= n {
            break;
        }
        for i in 0..click_len.min(n - start) {
            let t = i as f32 / SR as f32;
            samples[start + i] =
                0.9 * (-t * 120.0).exp() * (2.0 * std::f32::consts::PI * 1000.0 * t).sin();
        }
        beat += 1;
    }
    samples
}

const C_MAJOR: [f32; 3] = [261.63, 329.63, 392.0];
const G_MAJOR: [f32; 3] = [196.0, 246.94, 293.66];
const A_MINOR: [f32; 3] = [220.0, 261.63, 329.63];

#[test]
fn test_silent_waveform() {
    let report = analyze_audio(&vec![0.0; SR as usize * 5], SR, &AnalysisConfig::default());

    assert!(report.success);
    assert_eq!(report.status, AnalysisStatus::PartialSuccess);
    assert!(!report.timeline.is_empty());
    assert!(report
        .timeline
        .iter()
        .all(|e| e.chord == "N" && e.confidence == 0.0));
    assert_eq!(report.key, "C Major");
    assert_eq!(report.key_confidence, 0.0);
    assert_eq!(report.bpm, 120.0);
    assert_eq!(report.tempo_confidence, 0.0);
    assert_eq!(report.average_chord_confidence, 0.0);
    assert!(report.progression.is_empty());
    assert!(report.notes.is_empty());
}

#[test]
fn test_c_major_triad() {
    let report = analyze_audio(&tones(&C_MAJOR, 4.0), SR, &AnalysisConfig::default());

    assert!(report.success);
    assert_eq!(report.key, "C Major");
    assert!(report.timeline.iter().all(|e| e.chord == "C" && e.confidence >= 0.3));
    assert_eq!(report.progression, vec!["C"]);
    assert_eq!(report.timeline[0].time, "00:00");
    assert!(report.notes.len() <= 4);
    assert!(report.notes[..3].iter().all(|n| ["C", "E", "G"].contains(&n.as_str())));
}

#[test]
fn test_click_track_120_bpm() {
    let report = analyze_audio(&click_track(10.0, 120.0), SR, &AnalysisConfig::default());

    assert!(report.success);
    assert!(
        (report.bpm - 120.0).abs() <= 5.0,
        "BPM should be close to 120, got {:.2}",
        report.bpm
    );
    assert_eq!(report.tempo_confidence, 0.8);
    assert!(report.beat_count >= 15);
    assert!(matches!(
        report.tempo_classification,
        TempoClass::Moderate | TempoClass::Fast
    ));
}

#[test]
fn test_bpm_always_canonical() {
    for bpm in [45.0f32, 90.0, 150.0, 190.0] {
        let report = analyze_audio(&click_track(8.0, bpm), SR, &AnalysisConfig::default());
        assert!(
            (60.0..=200.0).contains(&report.bpm),
            "{} BPM click track gave {}",
            bpm,
            report.bpm
        );
    }
}

#[test]
fn test_chord_progression() {
    let mut samples = tones(&C_MAJOR, 2.0);
    samples.extend(tones(&G_MAJOR, 2.0));
    samples.extend(tones(&A_MINOR, 2.0));
    samples.extend(tones(&C_MAJOR, 2.0));

    let config = AnalysisConfig::default();
    let report = analyze_audio(&samples, SR, &config);

    assert_eq!(report.progression.first().map(String::as_str), Some("C"));
    let position = |label: &str| report.progression.iter().position(|c| c == label);
    let g = position("G").expect("G in progression");
    let am = position("Am").expect("Am in progression");
    assert!(g < am);

    // No duplicates, capped
    let mut sorted = report.progression.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), report.progression.len());
    assert!(report.progression.len() <= config.progression_cap);

    // Timeline ordering and the repeat rule
    assert_eq!(report.chord_count, report.timeline.len());
    for pair in report.timeline.windows(2) {
        assert!(pair[1].time >= pair[0].time);
        if pair[0].chord == pair[1].chord {
            assert!(
                pair[1].seconds - pair[0].seconds >= config.timeline_max_gap_seconds
                    || pair[1].confidence - pair[0].confidence > config.timeline_confidence_jump
            );
        }
    }
}

#[test]
fn test_deterministic_json() {
    let mut samples = tones(&A_MINOR, 3.0);
    for (s, c) in samples.iter_mut().zip(click_track(3.0, 100.0)) {
        *s = 0.5 * *s + 0.5 * c;
    }
    let config = AnalysisConfig::default();
    let first = analyze_audio(&samples, SR, &config).to_json().unwrap();
    let second = analyze_audio(&samples, SR, &config).to_json().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_load_error_report() {
    let report = analyze_audio(&[], SR, &AnalysisConfig::default());
    assert!(!report.success);
    assert_eq!(report.status, AnalysisStatus::Failure);
    assert!(report.error.as_deref().unwrap_or("").starts_with("Load error"));

    let report = analyze_audio(&[0.0, f32::NAN, 0.0], SR, &AnalysisConfig::default());
    assert!(!report.success);

    let report = analyze_audio(&[0.0; 1000], 0, &AnalysisConfig::default());
    assert!(!report.success);

    let json = report.to_json().unwrap();
    assert!(json.contains("\"success\": false"));
}

#[test]
fn test_short_waveform_degrades_gracefully() {
    // Shorter than one chord window and one STFT frame
    let report = analyze_audio(&tones(&C_MAJOR, 0.05), SR, &AnalysisConfig::default());
    assert!(report.success);
    assert_eq!(report.timeline.len(), 1);
    assert_eq!(report.timeline[0].chord, "N");
    assert_eq!(report.bpm, 120.0);
}

#[test]
fn test_stereo_input_and_diatonic_vocabulary() {
    let left = tones(&A_MINOR, 3.0);
    let right = tones(&A_MINOR, 3.0);
    let interleaved: Vec<f32> = left
        .iter()
        .zip(&right)
        .flat_map(|(l, r)| [*l, *r])
        .collect();
    let waveform = Waveform::from_interleaved(&interleaved, 2, SR, ChannelMixMode::Mono).unwrap();
    assert_eq!(waveform.len(), left.len());

    let config = AnalysisConfig {
        chord_vocabulary: ChordVocabulary::Diatonic,
        ..AnalysisConfig::default()
    };
    let report = analyze_waveform(&waveform, &config);
    assert_eq!(report.progression, vec!["Am"]);
}

#[test]
fn test_json_shape() {
    let report = analyze_audio(&tones(&C_MAJOR, 2.0), SR, &AnalysisConfig::default());
    let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    for field in [
        "success",
        "duration",
        "key",
        "key_confidence",
        "bpm",
        "tempo_confidence",
        "tempo_classification",
        "progression",
        "timeline",
        "notes",
        "chord_count",
        "average_chord_confidence",
    ] {
        assert!(value.get(field).is_some(), "missing {}", field);
    }
    assert!(value.get("error").is_none());
    assert!(value["timeline"][0].get("seconds").is_none());
}
