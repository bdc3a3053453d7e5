//! Direct value-blend devalue.
//!
//! ```text
//! out.rgb = in.rgb × (1 − intensity) + target_value × intensity
//! ```

use super::params::{EffectParameter, EffectParameterModel, UniformBindings};
use super::{INTENSITY, PixelTransform, TARGET_VALUE};

/// Blends every color channel linearly towards a flat target value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueBlendDevalue;

impl PixelTransform for ValueBlendDevalue {
    fn name(&self) -> &'static str {
        "Devalue in RGB space"
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
        let blend = |c: f32| c * (1.0 - intensity) + target * intensity;
        [blend(pixel[0]), blend(pixel[1]), blend(pixel[2]), pixel[3]]
    }
}
