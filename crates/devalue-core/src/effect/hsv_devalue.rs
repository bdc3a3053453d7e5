//! HSV value-blend devalue.
//!
//! Converts to HSV, blends only V towards the target, converts back. Hue and
//! saturation are preserved, so only brightness is compressed.
//!
//! ```text
//! V' = V × (1 − intensity) + target_value × intensity
//! ```

use super::params::{EffectParameter, EffectParameterModel, UniformBindings};
use super::{INTENSITY, PixelTransform, TARGET_VALUE};
use crate::color::{hsv_to_rgb, rgb_to_hsv};

#[derive(Debug, Clone, Copy, Default)]
pub struct HsvDevalue;

impl PixelTransform for HsvDevalue {
    fn name(&self) -> &'static str {
        "Devalue in HSV space"
    }

    fn default_parameters(&self) -> EffectParameterModel {
        EffectParameterModel::new(vec![
            EffectParameter::new("Devalue intensity", INTENSITY, 1.0, 0.0, 1.0),
            EffectParameter::new("Target value", TARGET_VALUE, 0.5, 0.0, 1.0),
        ])
    }

    fn apply(&self, pixel: [f32; 4], uniforms: &UniformBindings) -> [f32; 4] {
        let intensity = uniforms.get_or(INTENSITY, 0.0);
        let target = uniforms.get_or(TARGET_VALUE, 0.5);

        let mut hsv = rgb_to_hsv([pixel[0], pixel[1], pixel[2]]);
        hsv[2] = hsv[2] * (1.0 - intensity) + target * intensity;

        let [r, g, b] = hsv_to_rgb(hsv);
        [r, g, b, pixel[3]]
    }
}
