//! Autocorrelation-based tempo estimation
//!
//! Finds the dominant periodicity of the onset strength envelope using
//! FFT-accelerated autocorrelation.
//!
//! # Algorithm
//!
//! 1. Smooth the onset envelope with a short triangular kernel so that onsets
//!    quantized to neighboring frames still reinforce each other
//! 2. Compute autocorrelation using FFT acceleration: `ACF = IFFT(|FFT(signal)|²)`
//! 3. Weight each lag in the search range by a log-tempo Gaussian prior
//! 4. Refine the best lag with parabolic interpolation
//! 5. Convert lag to BPM: `BPM = 60 * frame_rate / lag`
//!
//! # Reference
//!
//! Ellis, D. P. W. (2007). Beat Tracking by Dynamic Programming.
//! *Journal of New Music Research*, 36(1), 51-60.

use super::BpmCandidate;
use crate::error::AnalysisError;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

const EPSILON: f32 = 1e-10;

/// Width of the log-tempo prior in octaves
const PRIOR_OCTAVE_WIDTH: f32 = 1.0;

/// Triangular smoothing kernel applied to the onset envelope
const SMOOTHING_KERNEL: [f32; 5] = [1.0, 2.0, 3.0, 2.0, 1.0];

/// Estimate tempo from an onset strength envelope
///
/// # Arguments
///
/// * `envelope` - Onset strength per frame
/// * `frame_rate` - Envelope frames per second
/// * `min_bpm` - Slowest tempo considered
/// * `max_bpm` - Fastest tempo considered
/// * `prior_bpm` - Centre of the log-tempo prior
///
/// # Returns
///
/// The best tempo with its confidence (prior-free ACF peak relative to lag 0)
///
/// # Errors
///
/// Returns `AnalysisError` if:
/// - Parameters are invalid (non-positive rate, inverted range)
/// - The envelope is too short for the slowest tempo or carries no energy
pub fn estimate_tempo_from_envelope(
    envelope: &[f32],
    frame_rate: f32,
    min_bpm: f32,
    max_bpm: f32,
    prior_bpm: f32,
) -> Result<BpmCandidate, AnalysisError> {
    log::debug!(
        "Estimating tempo from autocorrelation: {} frames at {:.2} fps, range=[{:.1}, {:.1}] BPM",
        envelope.len(),
        frame_rate,
        min_bpm,
        max_bpm
    );

    if frame_rate <= 0.0 || !frame_rate.is_finite() {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid envelope frame rate: {}",
            frame_rate
        )));
    }

    if min_bpm <= 0.0 || max_bpm <= 0.0 || min_bpm >= max_bpm {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid BPM range: [{:.1}, {:.1}]",
            min_bpm, max_bpm
        )));
    }

    // lag = 60 * frame_rate / BPM
    let lag_min = ((60.0 * frame_rate) / max_bpm).ceil().max(1.0) as usize;
    let lag_max = ((60.0 * frame_rate) / min_bpm).floor() as usize;

    let smoothed = smooth(envelope);
    let acf = compute_autocorrelation_fft(&smoothed)?;

    // Keep one lag of headroom on both sides for interpolation
    let lag_max = lag_max.min(acf.len().saturating_sub(2));
    if lag_min >= lag_max {
        return Err(AnalysisError::ProcessingError(format!(
            "Envelope of {} frames too short for tempo search (lags {}..{})",
            envelope.len(),
            lag_min,
            lag_max
        )));
    }

    if acf[0] <= EPSILON {
        return Err(AnalysisError::ProcessingError(
            "Onset envelope carries no energy".to_string(),
        ));
    }

    let mut best_lag = 0usize;
    let mut best_score = 0.0f32;
    for lag in lag_min..=lag_max {
        let bpm = 60.0 * frame_rate / lag as f32;
        let score = acf[lag] * tempo_prior(bpm, prior_bpm);
        if score > best_score {
            best_score = score;
            best_lag = lag;
        }
    }

    if best_lag == 0 || best_score <= EPSILON {
        return Err(AnalysisError::ProcessingError(
            "No periodicity found in onset envelope".to_string(),
        ));
    }

    let refined_lag = best_lag as f32 + parabolic_offset(acf[best_lag - 1], acf[best_lag], acf[best_lag + 1]);
    let bpm = 60.0 * frame_rate / refined_lag;
    if !bpm.is_finite() {
        return Err(AnalysisError::NumericalError(format!(
            "Non-finite tempo from lag {:.3}",
            refined_lag
        )));
    }

    let confidence = (acf[best_lag] / acf[0]).clamp(0.0, 1.0);

    log::debug!(
        "Autocorrelation tempo: lag {} (refined {:.3}) -> {:.2} BPM, confidence {:.3}",
        best_lag,
        refined_lag,
        bpm,
        confidence
    );

    Ok(BpmCandidate { bpm, confidence })
}

/// Log-Gaussian preference for tempi near `prior_bpm`
pub fn tempo_prior(bpm: f32, prior_bpm: f32) -> f32 {
    let octaves = (bpm / prior_bpm).log2() / PRIOR_OCTAVE_WIDTH;
    (-0.5 * octaves * octaves).exp()
}

/// Vertex offset of the parabola through three equally spaced points
fn parabolic_offset(left: f32, centre: f32, right: f32) -> f32 {
    let denom = left - 2.0 * centre + right;
    if denom.abs() <= EPSILON {
        return 0.0;
    }
    (0.5 * (left - right) / denom).clamp(-0.5, 0.5)
}

fn smooth(envelope: &[f32]) -> Vec<f32> {
    let half = SMOOTHING_KERNEL.len() / 2;
    let norm: f32 = SMOOTHING_KERNEL.iter().sum();
    (0..envelope.len())
        .map(|i| {
            SMOOTHING_KERNEL
                .iter()
                .enumerate()
                .filter_map(|(k, &w)| {
                    (i + k)
                        .checked_sub(half)
                        .and_then(|j| envelope.get(j))
                        .map(|&x| x * w)
                })
                .sum::<f32>()
                / norm
        })
        .collect()
}

/// Compute autocorrelation using FFT acceleration
///
/// Uses the identity: ACF = IFFT(|FFT(signal)|²)
///
/// # Returns
///
/// Autocorrelation function (same length as input), non-negative
pub fn compute_autocorrelation_fft(signal: &[f32]) -> Result<Vec<f32>, AnalysisError> {
    let n = signal.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    // Zero-pad to at least 2n to avoid circular wrap-around
    let fft_size = (2 * n).next_power_of_two();

    let mut buffer: Vec<Complex<f32>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    buffer.resize(fft_size, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(fft_size).process(&mut buffer);

    for x in buffer.iter_mut() {
        *x = Complex::new(x.norm_sqr(), 0.0);
    }

    planner.plan_fft_inverse(fft_size).process(&mut buffer);

    let scale = 1.0 / fft_size as f32;
    let acf: Vec<f32> = buffer[..n].iter().map(|x| (x.re * scale).max(0.0)).collect();

    if acf.iter().any(|x| !x.is_finite()) {
        return Err(AnalysisError::NumericalError(
            "Non-finite autocorrelation".to_string(),
        ));
    }

    Ok(acf)
}
