//! Example: Analyze a synthetic chord progression over a click track
//!
//! Run with `RUST_LOG=debug cargo run --example analyze_synthetic` to see the
//! pipeline stages.

use stratum_harmony::{analyze_audio, AnalysisConfig};

const SAMPLE_RATE: u32 = 22050;

/// I-V-vi-IV in C, two seconds per chord
const PROGRESSION: [[f32; 3]; 4] = [
    [261.63, 329.63, 392.0],
    [196.0, 246.94, 293.66],
    [220.0, 261.63, 329.63],
    [174.61, 220.0, 261.63],
];

fn synthesize(bpm: f32) -> Vec<f32> {
    let chord_len = 2 * SAMPLE_RATE as usize;
    let beat_len = (60.0 / bpm * SAMPLE_RATE as f32) as usize;
    let mut samples = Vec::with_capacity(chord_len * PROGRESSION.len());

    for chord in PROGRESSION {
        for i in 0..chord_len {
            let t = i as f32 / SAMPLE_RATE as f32;
            let pad: f32 = chord
                .iter()
                .map(|f| (2.0 * std::f32::consts::PI * f * t).sin())
                .sum::<f32>()
                / 3.0;
            let n = samples.len();
            let since_beat = (n % beat_len) as f32 / SAMPLE_RATE as f32;
            let click = (-since_beat * 120.0).exp()
                * (2.0 * std::f32::consts::PI * 1000.0 * since_beat).sin();
            samples.push(0.5 * pad + 0.5 * click);
        }
    }
    samples
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let samples = synthesize(120.0);
    let config = AnalysisConfig::default();

    let report = analyze_audio(&samples, SAMPLE_RATE, &config);

    println!("Analysis Results:");
    println!("  Status: {:?}", report.status);
    println!("  Key: {} (confidence: {:.2})", report.key, report.key_confidence);
    println!(
        "  BPM: {:.2} (confidence: {:.2}, {})",
        report.bpm,
        report.tempo_confidence,
        report.tempo_classification.as_str()
    );
    println!("  Progression: {}", report.progression.join(" - "));
    println!("  Notes: {}", report.notes.join(", "));
    for entry in &report.timeline {
        println!("    {}  {:<5} {:.2}", entry.time, entry.chord, entry.confidence);
    }
    for warning in &report.warnings {
        println!("  Warning: {}", warning);
    }

    println!("{}", report.to_json()?);

    Ok(())
}
