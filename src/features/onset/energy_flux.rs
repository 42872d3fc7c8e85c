//! Energy flux onsets
//!
//! RMS energy is taken per STFT-sized frame; its half-wave rectified first
//! difference is the onset strength, `flux[n] = max(0, E[n] - E[n-1])`. Onsets
//! are the local maxima of the flux above a threshold relative to its peak.
//!
//! The flux curve doubles as the onset strength envelope for beat tracking.
//!
//! # Reference
//!
//! Bello, J. P., Daudet, L., Abdallah, S., Duxbury, C., Davies, M., & Sandler, M. B. (2005).
//! A Tutorial on Onset Detection in Music Signals.
//! *IEEE Transactions on Speech and Audio Processing*, 13(5), 1035-1047.

use crate::error::AnalysisError;
use crate::features::spectrogram::frame_count;

/// Numerical stability epsilon
const EPSILON: f32 = 1e-10;

/// RMS energy per frame
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `frame_size` or `hop_size` is zero,
/// and `AnalysisError::NumericalError` if a frame's energy overflows
pub fn frame_energies(
    samples: &[f32],
    frame_size: usize,
    hop_size: usize,
) -> Result<Vec<f32>, AnalysisError> {
    if frame_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Frame size must be > 0".to_string(),
        ));
    }

    if hop_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Hop size must be > 0".to_string(),
        ));
    }

    let num_frames = frame_count(samples.len(), frame_size, hop_size);
    let energies: Vec<f32> = (0..num_frames)
        .map(|i| {
            let frame = &samples[i * hop_size..i * hop_size + frame_size];
            let sum_sq: f32 = frame.iter().map(|&x| x * x).sum();
            (sum_sq / frame_size as f32).sqrt()
        })
        .collect();

    if let Some(frame) = energies.iter().position(|e| !e.is_finite()) {
        return Err(AnalysisError::NumericalError(format!(
            "Non-finite energy in frame {}",
            frame
        )));
    }

    Ok(energies)
}

/// Half-wave rectified energy derivative, aligned with the frames
///
/// `flux[0]` is always 0; `flux[n]` is the energy rise from frame `n - 1` to
/// frame `n`.
pub fn energy_flux(energies: &[f32]) -> Vec<f32> {
    if energies.is_empty() {
        return Vec::new();
    }
    let mut flux = Vec::with_capacity(energies.len());
    flux.push(0.0);
    flux.extend(energies.windows(2).map(|w| (w[1] - w[0]).max(0.0)));
    flux
}

/// Peak-pick an onset strength curve
///
/// A frame is an onset when its flux exceeds `threshold_db` relative to the
/// strongest flux, rises above the previous frame and is not exceeded by the
/// next one.
///
/// # Returns
///
/// Onset frame indices, ascending
pub fn pick_onset_frames(flux: &[f32], threshold_db: f32) -> Vec<usize> {
    let max_flux = flux.iter().copied().fold(0.0f32, f32::max);
    if max_flux <= EPSILON {
        log::debug!("All energy flux values are zero, no onsets detected");
        return Vec::new();
    }

    // threshold_linear = max_flux * 10^(threshold_db / 20)
    let threshold_linear = max_flux * 10.0_f32.powf(threshold_db / 20.0);

    log::debug!(
        "Energy flux: max={:.6}, threshold={:.6} ({:.1} dB)",
        max_flux,
        threshold_linear,
        threshold_db
    );

    let mut onsets: Vec<usize> = Vec::new();
    for i in 1..flux.len() {
        let value = flux[i];
        let next = flux.get(i + 1).copied().unwrap_or(0.0);
        // >= on the right side keeps the first frame of a plateau
        if value > threshold_linear && value > flux[i - 1] && value >= next {
            onsets.push(i);
        }
    }
    onsets
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: usize = 44100;

    /// Decaying bursts every `60 / bpm` seconds
    fn pulse_train(seconds: f32, bpm: f32, decay_ms: f32) -> Vec<f32> {
        let n = (seconds * SR as f32) as usize;
        let period = 60.0 / bpm * SR as f32;
        let tau = decay_ms / 1000.0 * SR as f32;
        (0..n)
            .map(|i| {
                let since = (i as f32) % period;
                0.8 * (-since / tau).exp()
            })
            .collect()
    }

    fn onset_frames(samples: &[f32], threshold_db: f32) -> Vec<usize> {
        let energies = frame_energies(samples, 2048, 512).unwrap();
        pick_onset_frames(&energy_flux(&energies), threshold_db)
    }

    #[test]
    fn test_rms_per_frame() {
        let energies = frame_energies(&[0.5f32; 4096], 2048, 1024).unwrap();
        assert_eq!(energies.len(), 3);
        assert!(energies.iter().all(|e| (e - 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_step_gives_single_onset() {
        let mut samples = vec![0.0f32; SR];
        for s in samples.iter_mut().skip(5000) {
            *s = 0.5;
        }
        let frames = onset_frames(&samples, -30.0);
        assert_eq!(frames.len(), 1, "frames {:?}", frames);
        // First frame overlapping the step begins at most one frame earlier
        let start = frames[0] * 512;
        assert!((3000..=5000).contains(&start), "onset at sample {}", start);
    }

    #[test]
    fn test_pulse_train_spacing() {
        let frames = onset_frames(&pulse_train(4.0, 120.0, 30.0), -30.0);
        assert!((6..=9).contains(&frames.len()), "{} onsets", frames.len());

        // 0.5 s at 44100 / 512 fps is about 43 frames
        for pair in frames.windows(2) {
            let gap = pair[1] - pair[0];
            assert!((41..=45).contains(&gap), "gap {} frames", gap);
        }
    }

    #[test]
    fn test_flux_alignment() {
        let flux = energy_flux(&[0.0, 0.0, 1.0, 1.0, 0.2]);
        assert_eq!(flux, vec![0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(pick_onset_frames(&flux, -20.0), vec![2]);
    }

    #[test]
    fn test_local_maxima_above_threshold() {
        let flux = [0.0, 1.0, 0.5, 0.9, 0.0, 0.05, 0.8, 0.8, 0.0];
        // 0.05 is below -20 dB of the peak; the 0.8 plateau reports its first frame
        assert_eq!(pick_onset_frames(&flux, -20.0), vec![1, 3, 6]);
    }

    #[test]
    fn test_silence_and_short_input() {
        assert!(onset_frames(&vec![0.0f32; SR], -20.0).is_empty());
        assert!(frame_energies(&[0.5f32; 1000], 2048, 512).unwrap().is_empty());
        assert!(energy_flux(&[]).is_empty());
    }

    #[test]
    fn test_overflowing_energy_rejected() {
        let loud = vec![1e19f32; 4096];
        assert!(matches!(
            frame_energies(&loud, 2048, 512),
            Err(AnalysisError::NumericalError(_))
        ));
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(frame_energies(&[0.5f32; 4096], 0, 512).is_err());
        assert!(frame_energies(&[0.5f32; 4096], 2048, 0).is_err());
    }

    #[test]
    fn test_higher_threshold_keeps_fewer_onsets() {
        let mut samples = pulse_train(2.0, 120.0, 20.0);
        // Weak off-beat ticks
        for beat in 0..4 {
            let start = SR / 4 + beat * SR / 2;
            for s in samples[start..start + 200].iter_mut() {
                *s += 0.05;
            }
        }
        let loose = onset_frames(&samples, -40.0);
        let strict = onset_frames(&samples, -6.0);
        assert!(loose.len() > strict.len(), "{} vs {}", loose.len(), strict.len());
    }
}
