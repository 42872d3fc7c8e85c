//! Short-time Fourier transform magnitudes
//!
//! Hann-windowed frames, FFT via `rustfft`, one-sided magnitude spectrum per
//! frame. Shared by chroma extraction and the spectral summary.

use crate::error::AnalysisError;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Magnitude spectrogram (frames × bins)
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// One-sided magnitude spectrum per frame (`frame_size / 2 + 1` bins)
    pub magnitudes: Vec<Vec<f32>>,

    /// FFT frame size in samples
    pub frame_size: usize,

    /// Hop between frames in samples
    pub hop_size: usize,

    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl Spectrogram {
    /// Number of frames
    pub fn n_frames(&self) -> usize {
        self.magnitudes.len()
    }

    /// Number of frequency bins per frame
    pub fn n_bins(&self) -> usize {
        self.frame_size / 2 + 1
    }

    /// Centre frequency of bin `k` in Hz
    pub fn bin_frequency(&self, k: usize) -> f32 {
        k as f32 * self.sample_rate as f32 / self.frame_size as f32
    }

    /// True when the signal was shorter than one frame
    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }
}

/// Periodic Hann window
pub fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f32::consts::PI * i as f32 / size as f32).cos())
        .collect()
}

/// Number of full frames that fit in `len` samples
pub fn frame_count(len: usize, frame_size: usize, hop_size: usize) -> usize {
    if frame_size == 0 || hop_size == 0 || len < frame_size {
        0
    } else {
        (len - frame_size) / hop_size + 1
    }
}

/// Compute the magnitude spectrogram of a mono signal
///
/// Signals shorter than one frame produce an empty spectrogram rather than an
/// error.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `frame_size`, `hop_size` or
/// `sample_rate` is zero
pub fn compute_spectrogram(
    samples: &[f32],
    sample_rate: u32,
    frame_size: usize,
    hop_size: usize,
) -> Result<Spectrogram, AnalysisError> {
    if frame_size == 0 || hop_size == 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Frame and hop size must be > 0 (got {}, {})",
            frame_size, hop_size
        )));
    }

    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid sample rate: 0".to_string(),
        ));
    }

    let num_frames = frame_count(samples.len(), frame_size, hop_size);
    let n_bins = frame_size / 2 + 1;

    log::debug!(
        "Computing spectrogram: {} samples, frame={}, hop={}, {} frames",
        samples.len(),
        frame_size,
        hop_size,
        num_frames
    );

    let mut magnitudes = Vec::with_capacity(num_frames);

    if num_frames > 0 {
        let window = hann_window(frame_size);
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(frame_size);
        let mut buffer = vec![Complex::new(0.0f32, 0.0); frame_size];

        for frame_idx in 0..num_frames {
            let start = frame_idx * hop_size;
            let frame = &samples[start..start + frame_size];

            for ((slot, &x), &w) in buffer.iter_mut().zip(frame).zip(&window) {
                *slot = Complex::new(x * w, 0.0);
            }
            fft.process(&mut buffer);

            magnitudes.push(buffer[..n_bins].iter().map(|c| c.norm()).collect());
        }
    }

    Ok(Spectrogram {
        magnitudes,
        frame_size,
        hop_size,
        sample_rate,
    })
}
