//! RGB ↔ HSV conversion.
//!
//! Hue is in degrees `[0, 360)`, saturation and value in `[0, 1]` for inputs
//! in `[0, 1]`.

/// Channel spread below which a color is treated as achromatic.
pub const ACHROMATIC_EPSILON: f32 = 1e-5;

/// Hue reported when hue is undefined (saturation is 0). Never read
/// downstream, since [`hsv_to_rgb`] ignores hue whenever `s <= 0`.
const UNDEFINED_HUE: f32 = 0.0;

/// Convert RGB to `[h, s, v]`.
///
/// ```text
/// v     = max(r, g, b)
/// delta = max − min
///
/// delta < ε   → (0, 0, v)
/// max  <= 0   → (undefined, 0, v)
/// otherwise   → s = delta / max
///               h = 60 × { (g − b) / delta       if r is max
///                          2 + (b − r) / delta   if g is max
///                          4 + (r − g) / delta   otherwise }
///               h += 360 if h < 0
/// ```
pub fn rgb_to_hsv(rgb: [f32; 3]) -> [f32; 3] {
    let [r, g, b] = rgb;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    if delta < ACHROMATIC_EPSILON {
        return [0.0, 0.0, max];
    }

    if max <= 0.0 {
        return [UNDEFINED_HUE, 0.0, max];
    }

    let s = delta / max;

    let sector = if r >= max {
        // between yellow and magenta
        (g - b) / delta
    } else if g >= max {
        // between cyan and yellow
        2.0 + (b - r) / delta
    } else {
        // between magenta and cyan
        4.0 + (r - g) / delta
    };

    let mut h = sector * 60.0;
    if h < 0.0 {
        h += 360.0;
    }

    [h, s, max]
}

/// Convert `[h, s, v]` back to RGB.
///
/// `s <= 0` yields the achromatic triple `(v, v, v)` whatever the hue.
/// Otherwise hue is wrapped into `[0, 360)` and split into a sector index
/// `i = floor(h / 60)` and fraction `f`:
///
/// ```text
/// p = v(1 − s)    q = v(1 − s·f)    t = v(1 − s·(1 − f))
///
/// i:   0        1        2        3        4        5 / other
///     (v,t,p)  (q,v,p)  (p,v,t)  (p,q,v)  (t,p,v)  (v,p,q)
/// ```
pub fn hsv_to_rgb(hsv: [f32; 3]) -> [f32; 3] {
    let [h, s, v] = hsv;
    if s <= 0.0 {
        return [v, v, v];
    }

    let mut hh = h.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if hh >= 360.0 {
        hh = 0.0;
    }
    hh /= 60.0;

    let i = hh.floor();
    let f = hh - i;

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match i as i32 {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn assert_rgb_close(actual: [f32; 3], expected: [f32; 3], context: &str) {
        for c in 0..3 {
            assert!(
                (actual[c] - expected[c]).abs() < EPSILON,
                "{context} channel {c}: {:.8} vs {:.8}",
                actual[c],
                expected[c]
            );
        }
    }

    #[test]
    fn test_achromatic_has_zero_saturation() {
        for v in [0.0, 0.1, 0.5, 0.999, 1.0] {
            let hsv = rgb_to_hsv([v, v, v]);
            assert_eq!(hsv, [0.0, 0.0, v]);
        }
    }

    #[test]
    fn test_zero_saturation_ignores_hue() {
        for h in [0.0, 42.0, 180.0, 359.9, f32::NAN] {
            assert_eq!(hsv_to_rgb([h, 0.0, 0.7]), [0.7, 0.7, 0.7]);
        }
    }

    #[test]
    fn test_non_positive_max_uses_fixed_sentinel() {
        let hsv = rgb_to_hsv([-0.5, -0.2, -0.1]);
        assert_eq!(hsv[0], UNDEFINED_HUE);
        assert_eq!(hsv[1], 0.0);
        assert!((hsv[2] + 0.1).abs() < EPSILON);
    }

    #[test]
    fn test_primaries() {
        assert_eq!(rgb_to_hsv([1.0, 0.0, 0.0]), [0.0, 1.0, 1.0]);
        assert_eq!(rgb_to_hsv([0.0, 1.0, 0.0]), [120.0, 1.0, 1.0]);
        assert_eq!(rgb_to_hsv([0.0, 0.0, 1.0]), [240.0, 1.0, 1.0]);
        // Magenta sits in the r-dominant sector with a negative raw hue.
        assert_eq!(rgb_to_hsv([1.0, 0.0, 1.0]), [300.0, 1.0, 1.0]);
    }

    #[test]
    fn test_every_sector_converts_back() {
        let cases = [
            (30.0, [1.0, 0.5, 0.0]),
            (90.0, [0.5, 1.0, 0.0]),
            (150.0, [0.0, 1.0, 0.5]),
            (210.0, [0.0, 0.5, 1.0]),
            (270.0, [0.5, 0.0, 1.0]),
            (330.0, [1.0, 0.0, 0.5]),
        ];
        for (h, rgb) in cases {
            assert_rgb_close(hsv_to_rgb([h, 1.0, 1.0]), rgb, &format!("hue {h}"));
        }
    }

    #[test]
    fn test_hue_wraps_outside_range() {
        let base = hsv_to_rgb([30.0, 0.8, 0.6]);
        assert_rgb_close(hsv_to_rgb([390.0, 0.8, 0.6]), base, "hue 390");
        assert_rgb_close(hsv_to_rgb([-330.0, 0.8, 0.6]), base, "hue -330");
        assert_rgb_close(hsv_to_rgb([360.0, 0.8, 0.6]), hsv_to_rgb([0.0, 0.8, 0.6]), "hue 360");
    }

    #[test]
    fn test_roundtrip_over_unit_cube() {
        let steps = 12;
        for ri in 0..=steps {
            for gi in 0..=steps {
                for bi in 0..=steps {
                    let rgb = [
                        ri as f32 / steps as f32,
                        gi as f32 / steps as f32,
                        bi as f32 / steps as f32,
                    ];
                    let max = rgb[0].max(rgb[1]).max(rgb[2]);
                    let min = rgb[0].min(rgb[1]).min(rgb[2]);
                    if max - min < ACHROMATIC_EPSILON {
                        continue;
                    }
                    let back = hsv_to_rgb(rgb_to_hsv(rgb));
                    assert_rgb_close(back, rgb, &format!("{rgb:?}"));
                }
            }
        }
    }
}
