//! Channel mixing utilities (multi-channel to mono conversion)

use crate::error::AnalysisError;

/// Channel mixing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelMixMode {
    /// Simple average of all channels
    #[default]
    Mono,
    /// Keep the channel with the highest energy
    Dominant,
}

/// Down-mix interleaved samples to mono
///
/// # Arguments
///
/// * `interleaved` - Interleaved samples (frame-major: L R L R ...)
/// * `channels` - Number of interleaved channels
/// * `mode` - Mixing mode
///
/// # Returns
///
/// Mono samples, one per frame
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `channels` is zero or the sample
/// count is not a multiple of `channels`
pub fn downmix_interleaved(
    interleaved: &[f32],
    channels: usize,
    mode: ChannelMixMode,
) -> Result<Vec<f32>, AnalysisError> {
    if channels == 0 {
        return Err(AnalysisError::InvalidInput(
            "Channel count must be > 0".to_string(),
        ));
    }

    if interleaved.len() % channels != 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "{} samples is not a whole number of {}-channel frames",
            interleaved.len(),
            channels
        )));
    }

    if channels == 1 {
        return Ok(interleaved.to_vec());
    }

    log::debug!(
        "Down-mixing {} frames of {} channels using {:?}",
        interleaved.len() / channels,
        channels,
        mode
    );

    match mode {
        ChannelMixMode::Mono => {
            let scale = 1.0 / channels as f32;
            Ok(interleaved
                .chunks_exact(channels)
                .map(|frame| frame.iter().sum::<f32>() * scale)
                .collect())
        }
        ChannelMixMode::Dominant => {
            let mut energies = vec![0.0f64; channels];
            for frame in interleaved.chunks_exact(channels) {
                for (energy, &x) in energies.iter_mut().zip(frame) {
                    *energy += (x as f64) * (x as f64);
                }
            }
            // First channel wins ties
            let dominant = energies
                .iter()
                .enumerate()
                .fold((0usize, f64::MIN), |best, (i, &e)| if e > best.1 { (i, e) } else { best })
                .0;
            Ok(interleaved
                .chunks_exact(channels)
                .map(|frame| frame[dominant])
                .collect())
        }
    }
}
