//! Validated in-memory waveform
//!
//! The decoding collaborator hands over mono (or interleaved) PCM samples and a
//! sample rate. Everything downstream borrows the waveform immutably.

use crate::error::AnalysisError;
use crate::preprocessing::channel_mixer::{downmix_interleaved, ChannelMixMode};

/// Mono audio samples with their sample rate
#[derive(Debug, Clone)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Build a waveform from mono samples
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::LoadError` if the samples are empty, the sample
    /// rate is zero, or any sample is NaN/infinite
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, AnalysisError> {
        if samples.is_empty() {
            return Err(AnalysisError::LoadError("Empty audio samples".to_string()));
        }

        if sample_rate == 0 {
            return Err(AnalysisError::LoadError("Invalid sample rate: 0".to_string()));
        }

        if let Some(pos) = samples.iter().position(|x| !x.is_finite()) {
            return Err(AnalysisError::LoadError(format!(
                "Non-finite sample at index {}",
                pos
            )));
        }

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Build a waveform from interleaved multi-channel samples
    ///
    /// Channels are mixed down to mono according to `mode` before validation.
    pub fn from_interleaved(
        interleaved: &[f32],
        channels: usize,
        sample_rate: u32,
        mode: ChannelMixMode,
    ) -> Result<Self, AnalysisError> {
        let mono = downmix_interleaved(interleaved, channels, mode)
            .map_err(|e| AnalysisError::LoadError(e.to_string()))?;
        Self::new(mono, sample_rate)
    }

    /// Mono samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed waveform
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Samples between two sample positions, clamped to the waveform
    pub fn slice(&self, start: usize, end: usize) -> &[f32] {
        let end = end.min(self.samples.len());
        let start = start.min(end);
        &self.samples[start..end]
    }

    /// Convert seconds to a sample count at this waveform's rate
    pub fn seconds_to_samples(&self, seconds: f32) -> usize {
        (seconds.max(0.0) * self.sample_rate as f32).round() as usize
    }
}
