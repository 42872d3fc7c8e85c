//! Auxiliary spectral summary
//!
//! Whole-track means of spectral centroid, rolloff, bandwidth, zero-crossing
//! rate and mel-frequency cepstral coefficients. Reported alongside the
//! harmonic analysis; never used for key or chord decisions.

use crate::features::spectrogram::{frame_count, Spectrogram};
use serde::{Deserialize, Serialize};

/// Fraction of spectral energy below the rolloff frequency
const ROLLOFF_FRACTION: f32 = 0.85;

/// Number of mel bands feeding the cepstrum
const N_MEL_BANDS: usize = 40;

/// Floor added before the log in the cepstrum
const LOG_FLOOR: f32 = 1e-10;

/// Whole-track spectral statistics
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpectralSummary {
    /// Mean spectral centroid in Hz
    pub spectral_centroid_mean: f32,
    /// Mean 85% rolloff frequency in Hz
    pub spectral_rolloff_mean: f32,
    /// Mean spectral bandwidth (spread around the centroid) in Hz
    pub spectral_bandwidth_mean: f32,
    /// Mean zero-crossing rate (crossings per sample)
    pub zero_crossing_rate_mean: f32,
    /// Mean of each cepstral coefficient over all frames
    pub mfcc_mean: Vec<f32>,
}

/// Compute the spectral summary
///
/// # Arguments
///
/// * `samples` - Mono samples the spectrogram was computed from
/// * `spectrogram` - Magnitude spectrogram of `samples`
/// * `n_mfcc` - Number of cepstral coefficients to keep
pub fn summarize_spectrum(samples: &[f32], spectrogram: &Spectrogram, n_mfcc: usize) -> SpectralSummary {
    log::debug!(
        "Summarizing spectrum: {} frames, {} MFCCs",
        spectrogram.n_frames(),
        n_mfcc
    );

    let zero_crossing_rate_mean = mean_zero_crossing_rate(
        samples,
        spectrogram.frame_size,
        spectrogram.hop_size,
    );

    if spectrogram.is_empty() {
        return SpectralSummary {
            zero_crossing_rate_mean,
            mfcc_mean: vec![0.0; n_mfcc],
            ..SpectralSummary::default()
        };
    }

    let freqs: Vec<f32> = (0..spectrogram.n_bins())
        .map(|k| spectrogram.bin_frequency(k))
        .collect();
    let mel_bank = mel_filterbank(spectrogram, N_MEL_BANDS);

    let mut centroid_sum = 0.0f64;
    let mut rolloff_sum = 0.0f64;
    let mut bandwidth_sum = 0.0f64;
    let mut mfcc_sum = vec![0.0f64; n_mfcc];

    for frame in &spectrogram.magnitudes {
        let total: f32 = frame.iter().sum();
        if total > LOG_FLOOR {
            let centroid: f32 = frame.iter().zip(&freqs).map(|(m, f)| m * f).sum::<f32>() / total;
            let spread: f32 = frame
                .iter()
                .zip(&freqs)
                .map(|(m, f)| m * (f - centroid).powi(2))
                .sum::<f32>()
                / total;
            centroid_sum += centroid as f64;
            bandwidth_sum += spread.sqrt() as f64;
            rolloff_sum += rolloff_frequency(frame, &freqs, total) as f64;
        }

        for (acc, c) in mfcc_sum.iter_mut().zip(cepstrum(frame, &mel_bank, n_mfcc)) {
            *acc += c as f64;
        }
    }

    let n = spectrogram.n_frames() as f64;
    SpectralSummary {
        spectral_centroid_mean: (centroid_sum / n) as f32,
        spectral_rolloff_mean: (rolloff_sum / n) as f32,
        spectral_bandwidth_mean: (bandwidth_sum / n) as f32,
        zero_crossing_rate_mean,
        mfcc_mean: mfcc_sum.into_iter().map(|s| (s / n) as f32).collect(),
    }
}

fn rolloff_frequency(frame: &[f32], freqs: &[f32], total: f32) -> f32 {
    let target = ROLLOFF_FRACTION * total;
    let mut cumulative = 0.0f32;
    for (m, &f) in frame.iter().zip(freqs) {
        cumulative += m;
        if cumulative >= target {
            return f;
        }
    }
    freqs.last().copied().unwrap_or(0.0)
}

/// Mean per-frame zero-crossing rate
pub fn mean_zero_crossing_rate(samples: &[f32], frame_size: usize, hop_size: usize) -> f32 {
    let num_frames = frame_count(samples.len(), frame_size, hop_size);
    if num_frames == 0 {
        return zero_crossing_rate(samples);
    }
    let total: f32 = (0..num_frames)
        .map(|i| zero_crossing_rate(&samples[i * hop_size..i * hop_size + frame_size]))
        .sum();
    total / num_frames as f32
}

fn zero_crossing_rate(frame: &[f32]) -> f32 {
    if frame.len() < 2 {
        return 0.0;
    }
    let crossings = frame
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count();
    crossings as f32 / frame.len() as f32
}

fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0f32.powf(mel / 2595.0) - 1.0)
}

/// Triangular mel filters over the spectrogram's bins (bands × bins)
fn mel_filterbank(spectrogram: &Spectrogram, n_bands: usize) -> Vec<Vec<f32>> {
    let n_bins = spectrogram.n_bins();
    let max_mel = hz_to_mel(spectrogram.sample_rate as f32 / 2.0);
    let edges: Vec<f32> = (0..n_bands + 2)
        .map(|i| mel_to_hz(max_mel * i as f32 / (n_bands + 1) as f32))
        .collect();

    (0..n_bands)
        .map(|band| {
            let (lo, mid, hi) = (edges[band], edges[band + 1], edges[band + 2]);
            (0..n_bins)
                .map(|k| {
                    let f = spectrogram.bin_frequency(k);
                    if f <= lo || f >= hi {
                        0.0
                    } else if f <= mid {
                        (f - lo) / (mid - lo)
                    } else {
                        (hi - f) / (hi - mid)
                    }
                })
                .collect()
        })
        .collect()
}

/// Orthonormal DCT-II of log mel energies, first `n_mfcc` coefficients
fn cepstrum(frame: &[f32], mel_bank: &[Vec<f32>], n_mfcc: usize) -> Vec<f32> {
    let log_mel: Vec<f32> = mel_bank
        .iter()
        .map(|filter| {
            let energy: f32 = filter.iter().zip(frame).map(|(w, m)| w * m * m).sum();
            (energy + LOG_FLOOR).ln()
        })
        .collect();

    let n = log_mel.len() as f32;
    (0..n_mfcc)
        .map(|k| {
            let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            let sum: f32 = log_mel
                .iter()
                .enumerate()
                .map(|(i, &x)| {
                    x * (std::f32::consts::PI * k as f32 * (i as f32 + 0.5) / n).cos()
                })
                .sum();
            scale * sum
        })
        .collect()
}
