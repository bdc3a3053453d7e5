//! Effects: per-pixel color transforms driven by an ordered parameter model.
//!
//! Every variant implements [`PixelTransform`]. [`EffectKind`] is the closed
//! set of variants; adding a variant means adding an enum arm and a
//! transform. An [`Effect`] bundles a kind with its own independently
//! mutable [`EffectParameterModel`].

pub mod deluma;
pub mod hsv_devalue;
pub mod params;
pub mod preset;
pub mod registry;
pub mod value_blend;

use serde::{Deserialize, Serialize};

pub use deluma::Deluma;
pub use hsv_devalue::HsvDevalue;
pub use params::{EffectParameter, EffectParameterModel, UniformBindings};
pub use preset::EffectPreset;
pub use registry::EffectRegistry;
pub use value_blend::ValueBlendDevalue;

/// Uniform key for the blend amount shared by every variant.
pub const INTENSITY: &str = "Intensity";
/// Uniform key for the value devalue variants blend towards.
pub const TARGET_VALUE: &str = "TargetValue";
/// Uniform key for the luma the deluma variant reduces towards.
pub const TARGET_LUMA: &str = "TargetLuma";
/// Uniform key for the deluma gamma exponent.
pub const GAMMA: &str = "Gamma";

/// A pure per-pixel color transform.
///
/// Implementations read their inputs from the [`UniformBindings`] snapshot
/// only, so the same transform works for any parameter model that binds the
/// expected keys. Alpha is always passed through.
pub trait PixelTransform: Send + Sync {
    /// Name shown in the effect selector.
    fn name(&self) -> &'static str;

    /// Fresh parameter model with this variant's defaults.
    fn default_parameters(&self) -> EffectParameterModel;

    /// Transform one RGBA pixel.
    fn apply(&self, pixel: [f32; 4], uniforms: &UniformBindings) -> [f32; 4];
}

/// Identifies an effect variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Linear blend of every channel towards a target value.
    ValueBlend,
    /// Blend of HSV value towards a target, preserving hue and saturation.
    HsvDevalue,
    /// Gamma-weighted luma reduction.
    Deluma,
}

impl EffectKind {
    /// Built-in variants in selector order.
    pub fn all() -> &'static [Self] {
        const ALL: [EffectKind; 3] = [
            EffectKind::ValueBlend,
            EffectKind::HsvDevalue,
            EffectKind::Deluma,
        ];
        &ALL
    }

    /// The transform implementing this variant.
    pub fn transform(&self) -> &'static dyn PixelTransform {
        match self {
            Self::ValueBlend => &ValueBlendDevalue,
            Self::HsvDevalue => &HsvDevalue,
            Self::Deluma => &Deluma,
        }
    }

    /// Name shown in the effect selector.
    pub fn name(&self) -> &'static str {
        self.transform().name()
    }
}

/// An effect variant together with its live parameter values.
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    kind: EffectKind,
    parameters: EffectParameterModel,
}

impl Effect {
    /// Create an effect with the variant's default parameters.
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            parameters: kind.transform().default_parameters(),
        }
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn parameters(&self) -> &EffectParameterModel {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut EffectParameterModel {
        &mut self.parameters
    }

    /// Snapshot the current parameter values.
    pub fn uniforms(&self) -> UniformBindings {
        self.parameters.uniforms()
    }

    /// Transform one pixel with an explicit parameter snapshot.
    pub fn apply(&self, pixel: [f32; 4], uniforms: &UniformBindings) -> [f32; 4] {
        self.kind.transform().apply(pixel, uniforms)
    }

    /// Capture the current values as a serializable preset.
    pub fn to_preset(&self) -> EffectPreset {
        EffectPreset::from_effect(self)
    }
}
