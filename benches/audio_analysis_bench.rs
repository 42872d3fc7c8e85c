//! Performance benchmarks for harmonic analysis

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stratum_harmony::features::chords::{segment_chords, ChordBank};
use stratum_harmony::{analyze_audio, AnalysisConfig, Waveform};

const SAMPLE_RATE: u32 = 44100;

/// 30 seconds of a C major triad with a 120 BPM pulse
fn synthetic_track() -> Vec<f32> {
    let beat = SAMPLE_RATE as usize / 2;
    (0..SAMPLE_RATE as usize * 30)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let pad = [261.63f32, 329.63, 392.0]
                .iter()
                .map(|f| (2.0 * std::f32::consts::PI * f * t).sin())
                .sum::<f32>()
                / 3.0;
            let pulse = (-((i % beat) as f32 / SAMPLE_RATE as f32) * 60.0).exp();
            0.5 * pad * (0.5 + 0.5 * pulse)
        })
        .collect()
}

fn bench_analyze_audio(c: &mut Criterion) {
    let samples = synthetic_track();
    let config = AnalysisConfig::default();

    c.bench_function("analyze_audio_30s", |b| {
        b.iter(|| analyze_audio(black_box(&samples), black_box(SAMPLE_RATE), black_box(&config)));
    });
}

fn bench_chord_scoring(c: &mut Criterion) {
    let waveform = match Waveform::new(synthetic_track(), SAMPLE_RATE) {
        Ok(waveform) => waveform,
        Err(err) => panic!("synthetic track rejected: {}", err),
    };
    let bank = ChordBank::shared(AnalysisConfig::default().chord_vocabulary);

    let mut group = c.benchmark_group("segment_chords_30s");
    for parallel in [false, true] {
        let config = AnalysisConfig {
            parallel_chord_scoring: parallel,
            ..AnalysisConfig::default()
        };
        let name = if parallel { "parallel" } else { "sequential" };
        group.bench_function(name, |b| {
            b.iter(|| segment_chords(black_box(&waveform), bank, &config));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_analyze_audio, bench_chord_scoring);
criterion_main!(benches);
