//! Chroma normalization strategies and similarity measures

/// Numerical stability epsilon
pub const EPSILON: f32 = 1e-10;

/// Divide a profile by its sum
///
/// Returns `None` when the sum is (numerically) zero, i.e. silence.
pub fn normalize_sum(values: &[f32; 12]) -> Option<[f32; 12]> {
    let sum: f32 = values.iter().sum();
    if !sum.is_finite() || sum <= EPSILON {
        return None;
    }
    let mut out = [0.0f32; 12];
    for (o, &x) in out.iter_mut().zip(values) {
        *o = x / sum;
    }
    Some(out)
}

/// Cosine similarity between two 12-bin profiles
///
/// Returns 0.0 if either vector has zero norm.
pub fn cosine_similarity(a: &[f32; 12], b: &[f32; 12]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a <= EPSILON || norm_b <= EPSILON {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Pearson correlation coefficient between two 12-bin profiles
///
/// Returns `None` when either profile has zero variance (the coefficient is
/// undefined).
pub fn pearson_correlation(a: &[f32; 12], b: &[f32; 12]) -> Option<f32> {
    let mean_a = a.iter().map(|&x| x as f64).sum::<f64>() / 12.0;
    let mean_b = b.iter().map(|&x| x as f64).sum::<f64>() / 12.0;

    let mut cov = 0.0f64;
    let mut var_a = 0.0f64;
    let mut var_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let dx = x as f64 - mean_a;
        let dy = y as f64 - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let denom = (var_a * var_b).sqrt();
    if denom <= EPSILON as f64 || !denom.is_finite() {
        return None;
    }
    let r = (cov / denom) as f32;
    r.is_finite().then_some(r)
}

/// Sharpen chroma vector to emphasize prominent semitones
///
/// Raises every bin to `power` and renormalizes to the original sum. A power of
/// 1.0 (or a silent vector) returns the input unchanged.
pub fn sharpen_chroma(chroma: &[f32; 12], power: f32) -> [f32; 12] {
    if (power - 1.0).abs() < f32::EPSILON {
        return *chroma;
    }
    let original_sum: f32 = chroma.iter().sum();
    if original_sum <= EPSILON {
        return *chroma;
    }
    let mut out = [0.0f32; 12];
    for (o, &x) in out.iter_mut().zip(chroma) {
        *o = x.max(0.0).powf(power);
    }
    let sharpened_sum: f32 = out.iter().sum();
    if sharpened_sum > EPSILON {
        let scale = original_sum / sharpened_sum;
        for o in out.iter_mut() {
            *o *= scale;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const C_TRIAD: [f32; 12] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0];

    #[test]
    fn test_normalize_sum() {
        let n = normalize_sum(&C_TRIAD).unwrap();
        assert!((n.iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert!((n[0] - 1.0 / 3.0).abs() < 1e-6);
        assert!(normalize_sum(&[0.0; 12]).is_none());
    }

    #[test]
    fn test_cosine_identical_and_orthogonal() {
        assert!((cosine_similarity(&C_TRIAD, &C_TRIAD) - 1.0).abs() < 1e-6);
        let mut other = [0.0f32; 12];
        other[1] = 1.0;
        assert!(cosine_similarity(&C_TRIAD, &other).abs() < 1e-6);
        assert_eq!(cosine_similarity(&C_TRIAD, &[0.0; 12]), 0.0);
    }

    #[test]
    fn test_cosine_scale_invariant() {
        let scaled: Vec<f32> = C_TRIAD.iter().map(|x| x * 7.5).collect();
        let scaled: [f32; 12] = scaled.try_into().unwrap();
        assert!((cosine_similarity(&C_TRIAD, &scaled) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_pearson() {
        let r = pearson_correlation(&C_TRIAD, &C_TRIAD).unwrap();
        assert!((r - 1.0).abs() < 1e-6);

        let inverted: [f32; 12] = C_TRIAD.map(|x| 1.0 - x);
        let r = pearson_correlation(&C_TRIAD, &inverted).unwrap();
        assert!((r + 1.0).abs() < 1e-6);

        assert!(pearson_correlation(&[0.5; 12], &C_TRIAD).is_none());
    }

    #[test]
    fn test_sharpen() {
        let chroma = [2.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        assert_eq!(sharpen_chroma(&chroma, 1.0), chroma);
        let sharp = sharpen_chroma(&chroma, 2.0);
        assert!((sharp.iter().sum::<f32>() - 4.0).abs() < 1e-5);
        assert!(sharp[0] / sharp[1] > chroma[0] / chroma[1]);
    }
}
