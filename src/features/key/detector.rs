//! Key detection algorithm
//!
//! Correlates the whole-track chroma against the 24 Krumhansl-Kessler
//! templates. The rotation and mode with the highest Pearson correlation is
//! the key; the correlation itself is the confidence.
//!
//! # Reference
//!
//! Krumhansl, C. L., & Kessler, E. J. (1982). Tracing the Dynamic Changes in Perceived
//! Tonal Organization in a Spatial Representation of Musical Keys. *Psychological Review*,
//! 89(4), 334-368.

use super::{templates::KeyTemplates, KeyEstimate};
use crate::analysis::outcome::{Degradation, Outcome};
use crate::analysis::result::Key;
use crate::features::chroma::normalization::pearson_correlation;
use crate::features::chroma::ChromaVector;

/// Key reported when the correlation is undefined
pub const DEFAULT_KEY: Key = Key::Major(0);

/// Number of alternative keys kept for diagnostics
const N_ALTERNATIVES: usize = 3;

/// Correlate a chroma vector against all 24 keys
///
/// Scores come back in iteration order: C major, C minor, C# major, C# minor,
/// ..., B minor.
///
/// # Returns
///
/// `None` if the chroma has zero variance (silence or a flat spectrum), in
/// which case the correlation is undefined.
pub fn score_keys(chroma: &ChromaVector, templates: &KeyTemplates) -> Option<Vec<(Key, f32)>> {
    let mut scores = Vec::with_capacity(24);
    for tonic in 0..12u32 {
        let major = pearson_correlation(chroma.values(), templates.get_major_template(tonic))?;
        scores.push((Key::Major(tonic), major));

        let minor = pearson_correlation(chroma.values(), templates.get_minor_template(tonic))?;
        scores.push((Key::Minor(tonic), minor));
    }
    Some(scores)
}

/// Detect musical key from an aggregate chroma vector
///
/// # Arguments
///
/// * `chroma` - Whole-track mean chroma (need not be normalized; it is
///   sum-normalized before scoring)
/// * `templates` - Key templates (Krumhansl-Kessler profiles)
///
/// # Returns
///
/// The best key with its correlation, or [`DEFAULT_KEY`] at zero confidence
/// tagged as degraded when the chroma is silent, flat or non-finite.
///
/// Ties keep the first key in iteration order (C..B, major before minor).
pub fn detect_key(chroma: &ChromaVector, templates: &KeyTemplates) -> Outcome<KeyEstimate> {
    log::debug!("Detecting key from chroma {:?}", chroma.values());

    if chroma.values().iter().any(|x| !x.is_finite()) {
        log::warn!("Key detection: non-finite chroma, falling back to {}", DEFAULT_KEY.name());
        return Outcome::Degraded(
            KeyEstimate::fallback(),
            Degradation::NonFinite("aggregate chroma".to_string()),
        );
    }

    // Sum-normalize first so the variance cutoff does not depend on level
    let normalized = match chroma.normalized() {
        Some(normalized) => normalized,
        None => {
            log::debug!("Key detection: silent chroma, using default key");
            return Outcome::Degraded(KeyEstimate::fallback(), Degradation::SilentSignal);
        }
    };

    let scores = match score_keys(&normalized, templates) {
        Some(scores) => scores,
        None => {
            log::debug!("Key detection: zero-variance chroma, using default key");
            return Outcome::Degraded(KeyEstimate::fallback(), Degradation::SilentSignal);
        }
    };

    let (best_key, best_score) = scores
        .iter()
        .copied()
        .fold((DEFAULT_KEY, f32::NEG_INFINITY), |best, candidate| {
            if candidate.1 > best.1 {
                candidate
            } else {
                best
            }
        });

    let mut ranked = scores.clone();
    // Stable sort: equal scores stay in iteration order
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let alternatives = ranked
        .into_iter()
        .filter(|(k, _)| *k != best_key)
        .take(N_ALTERNATIVES)
        .collect();

    log::debug!("Detected key {} (r={:.3})", best_key.name(), best_score);

    Outcome::Estimated(KeyEstimate {
        key: best_key,
        confidence: best_score,
        alternatives,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::key::templates::{KRUMHANSL_MAJOR, KRUMHANSL_MINOR};

    fn rotate(profile: &[f32; 12], tonic: usize) -> ChromaVector {
        let mut out = [0.0f32; 12];
        for (pc, slot) in out.iter_mut().enumerate() {
            *slot = profile[(pc + 12 - tonic) % 12];
        }
        ChromaVector(out)
    }

    #[test]
    fn test_exact_major_profile_detected() {
        let templates = KeyTemplates::new();
        for tonic in 0..12 {
            let chroma = rotate(&KRUMHANSL_MAJOR, tonic);
            let outcome = detect_key(&chroma, &templates);
            assert!(!outcome.is_degraded());
            let estimate = outcome.value();
            assert_eq!(estimate.key, Key::Major(tonic as u32));
            assert!(estimate.confidence >= 0.99, "confidence {}", estimate.confidence);
        }
    }

    #[test]
    fn test_exact_minor_profile_detected() {
        let templates = KeyTemplates::new();
        let chroma = rotate(&KRUMHANSL_MINOR, 1);
        let estimate = detect_key(&chroma, &templates).into_value();
        assert_eq!(estimate.key, Key::Minor(1));
        assert_eq!(estimate.key.name(), "C# Minor");
        assert!(estimate.confidence >= 0.99);
    }

    #[test]
    fn test_c_major_triad_chroma() {
        let chroma = ChromaVector([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
        let estimate = detect_key(&chroma, KeyTemplates::shared()).into_value();
        assert_eq!(estimate.key.name(), "C Major");
        assert_eq!(estimate.alternatives.len(), 3);
        assert!(estimate.alternatives.iter().all(|(k, s)| *k != estimate.key && *s <= estimate.confidence));
    }

    #[test]
    fn test_quiet_triad_keeps_key() {
        let loud = ChromaVector([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
        let mut quiet = loud;
        for x in quiet.0.iter_mut() {
            *x *= 1e-6;
        }

        let loud_estimate = detect_key(&loud, KeyTemplates::shared()).into_value();
        let outcome = detect_key(&quiet, KeyTemplates::shared());
        assert!(!outcome.is_degraded(), "{:?}", outcome.degradation());
        let quiet_estimate = outcome.into_value();
        assert_eq!(quiet_estimate.key.name(), "C Major");
        assert!((quiet_estimate.confidence - loud_estimate.confidence).abs() < 1e-4);
    }

    #[test]
    fn test_silence_falls_back() {
        let outcome = detect_key(&ChromaVector::zeros(), &KeyTemplates::new());
        assert_eq!(outcome.degradation(), Some(&Degradation::SilentSignal));
        assert_eq!(outcome.value().key, DEFAULT_KEY);
        assert_eq!(outcome.value().confidence, 0.0);
    }

    #[test]
    fn test_flat_chroma_falls_back() {
        let outcome = detect_key(&ChromaVector([0.3; 12]), &KeyTemplates::new());
        assert!(outcome.is_degraded());
        assert_eq!(outcome.value().confidence, 0.0);
    }

    #[test]
    fn test_non_finite_falls_back() {
        let mut chroma = ChromaVector([0.1; 12]);
        chroma.0[2] = f32::NAN;
        let outcome = detect_key(&chroma, &KeyTemplates::new());
        assert!(matches!(outcome.degradation(), Some(Degradation::NonFinite(_))));
    }

    #[test]
    fn test_score_order() {
        let chroma = rotate(&KRUMHANSL_MAJOR, 0);
        let scores = score_keys(&chroma, &KeyTemplates::new()).unwrap();
        assert_eq!(scores.len(), 24);
        assert_eq!(scores[0].0, Key::Major(0));
        assert_eq!(scores[1].0, Key::Minor(0));
        assert_eq!(scores[23].0, Key::Minor(11));
    }
}
