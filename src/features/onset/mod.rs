//! Onset detection modules
//!
//! Energy-flux onset strength, shared by:
//! - Beat tracking (the whole envelope)
//! - Inter-onset-interval tempo estimation (picked peaks)

pub mod energy_flux;

use crate::error::AnalysisError;
use energy_flux::{energy_flux, frame_energies, pick_onset_frames};

/// Frame-rate onset strength curve
#[derive(Debug, Clone)]
pub struct OnsetStrength {
    /// Rectified energy flux per frame
    pub values: Vec<f32>,

    /// Hop between frames in samples
    pub hop_size: usize,

    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl OnsetStrength {
    /// Compute the onset strength envelope of a signal
    pub fn compute(
        samples: &[f32],
        sample_rate: u32,
        frame_size: usize,
        hop_size: usize,
    ) -> Result<Self, AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidInput(
                "Invalid sample rate: 0".to_string(),
            ));
        }
        let energies = frame_energies(samples, frame_size, hop_size)?;
        Ok(Self {
            values: energy_flux(&energies),
            hop_size,
            sample_rate,
        })
    }

    /// Envelope frames per second
    pub fn frame_rate(&self) -> f32 {
        self.sample_rate as f32 / self.hop_size as f32
    }

    /// Time of frame `index` in seconds
    pub fn frame_time(&self, index: f32) -> f32 {
        index / self.frame_rate()
    }

    /// Peak value of the envelope
    pub fn peak(&self) -> f32 {
        self.values.iter().copied().fold(0.0f32, f32::max)
    }

    /// True when the envelope carries no rhythmic energy
    pub fn is_flat(&self) -> bool {
        self.peak() <= 1e-10
    }

    /// Picked onset times in seconds, ascending
    pub fn onset_times(&self, threshold_db: f32) -> Vec<f32> {
        pick_onset_frames(&self.values, threshold_db)
            .into_iter()
            .map(|frame| self.frame_time(frame as f32))
            .collect()
    }
}
