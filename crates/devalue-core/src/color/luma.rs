//! Gamma-weighted luma.

/// Rec. 709 luminance weights.
pub const LUMA_REC709: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Rec. 709 weighted sum of gamma-raised channels.
///
/// ```text
/// luma = 0.2126·r^γ + 0.7152·g^γ + 0.0722·b^γ
/// ```
///
/// The caller guarantees `gamma > 0` and non-negative channels; otherwise the
/// real power is undefined and the result is NaN.
pub fn weighted_luma(rgb: [f32; 3], gamma: f32) -> f32 {
    LUMA_REC709[0] * rgb[0].powf(gamma)
        + LUMA_REC709[1] * rgb[1].powf(gamma)
        + LUMA_REC709[2] * rgb[2].powf(gamma)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_white_has_unit_luma_for_any_gamma() {
        for gamma in [0.01, 0.5, 1.0, 2.2, 4.0] {
            let luma = weighted_luma([1.0, 1.0, 1.0], gamma);
            assert!((luma - 1.0).abs() < EPSILON, "gamma {gamma}: {luma}");
        }
    }

    #[test]
    fn test_gamma_one_is_linear_weighting() {
        let luma = weighted_luma([0.2, 0.4, 0.6], 1.0);
        let expected = 0.2126 * 0.2 + 0.7152 * 0.4 + 0.0722 * 0.6;
        assert!((luma - expected).abs() < EPSILON);
    }

    #[test]
    fn test_gamma_two_squares_channels() {
        let luma = weighted_luma([0.5, 0.5, 0.5], 2.0);
        assert!((luma - 0.25).abs() < EPSILON);
    }

    #[test]
    fn test_black_is_zero() {
        assert_eq!(weighted_luma([0.0, 0.0, 0.0], 1.0), 0.0);
    }
}
