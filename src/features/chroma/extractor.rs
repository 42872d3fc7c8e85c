//! Chroma vector extraction
//!
//! Folds the power spectrum of each STFT frame onto 12 pitch classes.
//!
//! Each FFT bin inside the analysis band is assigned a fractional MIDI pitch
//! `69 + 12 * log2(f / a4)`. With hard mapping the bin's power goes to the
//! nearest pitch class; with soft mapping it is spread over all 12 classes
//! with Gaussian weights on the circular semitone distance.

use super::{ChromaVector, N_PITCH_CLASSES};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::spectrogram::{compute_spectrogram, Spectrogram};

/// Pitch-class folding parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromaOptions {
    /// Lowest frequency folded into chroma (Hz)
    pub min_frequency: f32,
    /// Highest frequency folded into chroma (Hz)
    pub max_frequency: f32,
    /// Tuning reference for A4 (Hz)
    pub center_frequency: f32,
    /// Spread bins over neighboring semitones
    pub soft_mapping: bool,
    /// Spread in semitones when `soft_mapping` is on
    pub soft_mapping_sigma: f32,
}

impl Default for ChromaOptions {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl ChromaOptions {
    /// Take the chroma-related fields of an analysis configuration
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            min_frequency: config.chroma_min_frequency,
            max_frequency: config.chroma_max_frequency,
            center_frequency: config.center_frequency,
            soft_mapping: config.soft_chroma_mapping,
            soft_mapping_sigma: config.soft_mapping_sigma,
        }
    }
}

/// Precomputed bin → pitch-class weights for one FFT geometry
struct ChromaMap {
    /// (fft bin, pitch-class weights)
    bins: Vec<(usize, [f32; N_PITCH_CLASSES])>,
}

impl ChromaMap {
    fn new(spectrogram: &Spectrogram, options: &ChromaOptions) -> Self {
        let nyquist = spectrogram.sample_rate as f32 / 2.0;
        let max_frequency = options.max_frequency.min(nyquist);
        let mut bins = Vec::new();

        for k in 1..spectrogram.n_bins() {
            let freq = spectrogram.bin_frequency(k);
            if freq < options.min_frequency || freq > max_frequency {
                continue;
            }

            let midi = 69.0 + 12.0 * (freq / options.center_frequency).log2();
            let mut weights = [0.0f32; N_PITCH_CLASSES];

            if options.soft_mapping {
                let pitch_class = midi.rem_euclid(12.0);
                let mut total = 0.0f32;
                for (pc, w) in weights.iter_mut().enumerate() {
                    let mut d = (pitch_class - pc as f32).abs();
                    d = d.min(12.0 - d);
                    *w = (-0.5 * (d / options.soft_mapping_sigma).powi(2)).exp();
                    total += *w;
                }
                for w in weights.iter_mut() {
                    *w /= total;
                }
            } else {
                let pc = (midi.round() as i64).rem_euclid(12) as usize;
                weights[pc] = 1.0;
            }

            bins.push((k, weights));
        }

        Self { bins }
    }

    fn fold(&self, magnitudes: &[f32]) -> ChromaVector {
        let mut chroma = [0.0f32; N_PITCH_CLASSES];
        for (k, weights) in &self.bins {
            let power = magnitudes[*k] * magnitudes[*k];
            if power == 0.0 {
                continue;
            }
            for (c, &w) in chroma.iter_mut().zip(weights) {
                *c += w * power;
            }
        }
        ChromaVector(chroma)
    }
}

/// Fold every frame of a spectrogram onto pitch classes
pub fn chroma_from_spectrogram(spectrogram: &Spectrogram, options: &ChromaOptions) -> Vec<ChromaVector> {
    if spectrogram.is_empty() {
        return Vec::new();
    }
    let map = ChromaMap::new(spectrogram, options);
    spectrogram
        .magnitudes
        .iter()
        .map(|frame| map.fold(frame))
        .collect()
}

/// Extract chroma vectors from audio samples
///
/// # Arguments
///
/// * `samples` - Audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `frame_size` - FFT frame size (default: 2048)
/// * `hop_size` - Hop size (default: 512)
/// * `options` - Frequency band and mapping mode
///
/// # Returns
///
/// One chroma vector per frame; empty when the signal is shorter than a frame
pub fn extract_chroma(
    samples: &[f32],
    sample_rate: u32,
    frame_size: usize,
    hop_size: usize,
    options: &ChromaOptions,
) -> Result<Vec<ChromaVector>, AnalysisError> {
    log::debug!(
        "Extracting chroma: {} samples at {} Hz (soft={})",
        samples.len(),
        sample_rate,
        options.soft_mapping
    );
    let spectrogram = compute_spectrogram(samples, sample_rate, frame_size, hop_size)?;
    Ok(chroma_from_spectrogram(&spectrogram, options))
}

/// Mean chroma over all frames of a signal
///
/// Signals shorter than one frame yield the all-zero vector.
pub fn mean_chroma(
    samples: &[f32],
    sample_rate: u32,
    frame_size: usize,
    hop_size: usize,
    options: &ChromaOptions,
) -> Result<ChromaVector, AnalysisError> {
    let frames = extract_chroma(samples, sample_rate, frame_size, hop_size, options)?;
    Ok(ChromaVector::mean(&frames))
}
