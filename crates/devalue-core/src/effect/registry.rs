//! Registry of available effects.

use super::{Effect, EffectKind, EffectPreset};
use crate::error::DevalueError;

/// Holds the available effect variants in selector order.
///
/// The registry hands out fresh [`Effect`] instances; it never shares
/// parameter state between them.
#[derive(Debug, Clone)]
pub struct EffectRegistry {
    kinds: Vec<EffectKind>,
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectRegistry {
    /// Registry populated with every built-in variant.
    pub fn new() -> Self {
        Self {
            kinds: EffectKind::all().to_vec(),
        }
    }

    /// Effect names in selector order.
    pub fn list_names(&self) -> Vec<&'static str> {
        self.kinds.iter().map(EffectKind::name).collect()
    }

    /// Registered variants in selector order.
    pub fn kinds(&self) -> &[EffectKind] {
        &self.kinds
    }

    /// Resolve a display name to its variant.
    pub fn lookup(&self, name: &str) -> Result<EffectKind, DevalueError> {
        self.kinds
            .iter()
            .copied()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| DevalueError::UnknownEffect(name.to_string()))
    }

    /// Create a new effect instance with default parameters.
    pub fn instantiate(&self, name: &str) -> Result<Effect, DevalueError> {
        let kind = self.lookup(name)?;
        tracing::debug!(effect = name, "instantiated effect");
        Ok(Effect::new(kind))
    }

    /// Create a new effect instance and load a preset's values into it.
    pub fn instantiate_preset(&self, preset: &EffectPreset) -> Result<Effect, DevalueError> {
        let mut effect = self.instantiate(&preset.effect)?;
        preset.apply_to(effect.parameters_mut());
        Ok(effect)
    }
}
