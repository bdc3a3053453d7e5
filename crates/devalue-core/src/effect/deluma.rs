//! Gamma-weighted luma reduction ("deluma").
//!
//! ```text
//! luma  = 0.2126·r^γ + 0.7152·g^γ + 0.0722·b^γ
//! ratio = 1 − (target_luma / luma)^(1/γ)
//! out   = in.rgb − ratio × intensity × in.rgb
//! ```
//!
//! At full intensity the output's weighted luma equals `target_luma`.
//! Pixels with no luma (pure black) and pixels whose ratio overflows are
//! passed through unchanged.

use super::params::{EffectParameter, EffectParameterModel, UniformBindings};
use super::{GAMMA, INTENSITY, PixelTransform, TARGET_LUMA};
use crate::color::weighted_luma;

#[derive(Debug, Clone, Copy, Default)]
pub struct Deluma;

impl PixelTransform for Deluma {
    fn name(&self) -> &'static str {
        "Deluma in YUV space"
    }

    fn default_parameters(&self) -> EffectParameterModel {
        EffectParameterModel::new(vec![
            EffectParameter::new("Deluma intensity", INTENSITY, 1.0, 0.0, 1.0),
            EffectParameter::new("Target luma", TARGET_LUMA, 0.5, 0.0, 1.0),
            EffectParameter::new("Gamma correction", GAMMA, 1.0, 0.01, 4.0),
        ])
    }

    fn apply(&self, pixel: [f32; 4], uniforms: &UniformBindings) -> [f32; 4] {
        let intensity = uniforms.get_or(INTENSITY, 0.0);
        let target = uniforms.get_or(TARGET_LUMA, 0.5);
        let gamma = uniforms.get_or(GAMMA, 1.0);

        if !(gamma > 0.0) {
            return pixel;
        }

        let rgb = [pixel[0], pixel[1], pixel[2]];
        let luma = weighted_luma(rgb, gamma);
        // Also rejects NaN from negative channels.
        if !(luma > 0.0) {
            return pixel;
        }

        let ratio = 1.0 - (target / luma).powf(1.0 / gamma);
        if !ratio.is_finite() {
            return pixel;
        }

        let scale = ratio * intensity;
        [
            rgb[0] - scale * rgb[0],
            rgb[1] - scale * rgb[1],
            rgb[2] - scale * rgb[2],
            pixel[3],
        ]
    }
}
