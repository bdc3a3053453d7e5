//! Serializable parameter snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Effect, EffectParameterModel};
use crate::error::DevalueError;

/// An effect name and its parameter values keyed by uniform key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectPreset {
    /// Display name of the effect, as listed by the registry.
    pub effect: String,
    /// Parameter values by uniform key.
    #[serde(default)]
    pub values: BTreeMap<String, f32>,
}

impl EffectPreset {
    /// Capture an effect's current values.
    pub fn from_effect(effect: &Effect) -> Self {
        Self {
            effect: effect.name().to_string(),
            values: effect
                .parameters()
                .sliders()
                .iter()
                .map(|p| (p.uniform_key().to_string(), p.value()))
                .collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, DevalueError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, DevalueError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the preset's values into a parameter model. Values are clamped;
    /// keys the model does not bind are skipped.
    pub fn apply_to(&self, model: &mut EffectParameterModel) {
        for (key, &value) in &self.values {
            if model.set_by_key(key, value).is_none() {
                tracing::warn!(effect = %self.effect, key = %key, "preset key has no matching parameter");
            }
        }
    }
}
