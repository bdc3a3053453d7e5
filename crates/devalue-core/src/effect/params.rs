//! Tunable effect parameters and the uniform snapshot taken from them.
//!
//! An [`EffectParameterModel`] is the single source of truth for one active
//! effect's inputs. The UI writes here through clamped setters; the
//! compositor reads a fresh [`UniformBindings`] snapshot on every composite.

use serde::Serialize;

/// One bounded numeric input of an effect.
///
/// `min <= value <= max` holds at all times: every write is clamped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectParameter {
    name: String,
    uniform_key: String,
    value: f32,
    default: f32,
    min: f32,
    max: f32,
}

impl EffectParameter {
    /// Create a parameter. Bounds given in the wrong order are swapped and
    /// the default is clamped into them.
    pub fn new(
        name: impl Into<String>,
        uniform_key: impl Into<String>,
        default: f32,
        min: f32,
        max: f32,
    ) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let default = if default.is_nan() { min } else { default.clamp(min, max) };
        Self {
            name: name.into(),
            uniform_key: uniform_key.into(),
            value: default,
            default,
            min,
            max,
        }
    }

    /// Display title for the UI control.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stable identifier of the uniform slot this parameter feeds.
    pub fn uniform_key(&self) -> &str {
        &self.uniform_key
    }

    /// Current value.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Value the parameter was created with.
    pub fn default_value(&self) -> f32 {
        self.default
    }

    /// Lower bound (inclusive).
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Upper bound (inclusive).
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Store `value` clamped into `[min, max]` and return what was stored.
    ///
    /// NaN is rejected and leaves the current value in place.
    pub fn set(&mut self, value: f32) -> f32 {
        if value.is_nan() {
            tracing::warn!(parameter = %self.uniform_key, "ignoring NaN parameter value");
            return self.value;
        }
        let clamped = value.clamp(self.min, self.max);
        if clamped != value {
            tracing::debug!(
                parameter = %self.uniform_key,
                requested = value,
                stored = clamped,
                "parameter value clamped"
            );
        }
        self.value = clamped;
        clamped
    }

    /// Restore the default value.
    pub fn reset(&mut self) {
        self.value = self.default;
    }
}

/// Ordered list of an effect's parameters. Order is presentation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectParameterModel {
    parameters: Vec<EffectParameter>,
}

impl EffectParameterModel {
    pub fn new(parameters: Vec<EffectParameter>) -> Self {
        Self { parameters }
    }

    /// Read access for binding UI controls.
    pub fn sliders(&self) -> &[EffectParameter] {
        &self.parameters
    }

    /// Write access for binding UI controls. Writes go through
    /// [`EffectParameter::set`], so the bounds invariant is kept.
    pub fn sliders_mut(&mut self) -> &mut [EffectParameter] {
        &mut self.parameters
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Current value of the parameter bound to `uniform_key`.
    pub fn value(&self, uniform_key: &str) -> Option<f32> {
        self.find(uniform_key).map(EffectParameter::value)
    }

    /// Clamp and store a value by slider index. Returns the stored value, or
    /// `None` if no slider has that index.
    pub fn set_value(&mut self, index: usize, value: f32) -> Option<f32> {
        self.parameters.get_mut(index).map(|p| p.set(value))
    }

    /// Clamp and store a value by uniform key. Returns the stored value, or
    /// `None` if no slider is bound to that key.
    pub fn set_by_key(&mut self, uniform_key: &str, value: f32) -> Option<f32> {
        self.parameters
            .iter_mut()
            .find(|p| p.uniform_key == uniform_key)
            .map(|p| p.set(value))
    }

    /// Restore every parameter to its default.
    pub fn reset(&mut self) {
        for p in &mut self.parameters {
            p.reset();
        }
    }

    /// Snapshot the current values as uniform bindings.
    pub fn uniforms(&self) -> UniformBindings {
        UniformBindings {
            entries: self
                .parameters
                .iter()
                .map(|p| (p.uniform_key.clone(), p.value))
                .collect(),
        }
    }

    fn find(&self, uniform_key: &str) -> Option<&EffectParameter> {
        self.parameters.iter().find(|p| p.uniform_key == uniform_key)
    }
}

/// Snapshot of `uniform_key → value` taken at composite time.
///
/// This is the only channel through which parameter state reaches a
/// per-pixel transform, whether it runs on the CPU or in a shader.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UniformBindings {
    entries: Vec<(String, f32)>,
}

impl UniformBindings {
    /// Value bound to `key`, if any.
    pub fn get(&self, key: &str) -> Option<f32> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|&(_, v)| v)
    }

    /// Value bound to `key`, or `fallback` when unbound.
    pub fn get_or(&self, key: &str, fallback: f32) -> f32 {
        self.get(key).unwrap_or(fallback)
    }

    /// Bind `key`, replacing any existing binding.
    pub fn set(&mut self, key: impl Into<String>, value: f32) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Bindings in slider order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model() -> EffectParameterModel {
        EffectParameterModel::new(vec![
            EffectParameter::new("Intensity", "Intensity", 1.0, 0.0, 1.0),
            EffectParameter::new("Gamma", "Gamma", 1.0, 0.01, 4.0),
        ])
    }

    #[test]
    fn test_set_value_clamps_into_bounds() {
        let mut model = sample_model();
        assert_eq!(model.set_value(0, 3.5), Some(1.0));
        assert_eq!(model.set_value(0, -2.0), Some(0.0));
        assert_eq!(model.set_value(1, 0.0), Some(0.01));
        assert_eq!(model.set_value(1, 2.2), Some(2.2));
        assert_eq!(model.value("Gamma"), Some(2.2));
    }

    #[test]
    fn test_set_value_out_of_range_index_is_ignored() {
        let mut model = sample_model();
        assert_eq!(model.set_value(7, 0.5), None);
        assert_eq!(model, sample_model());
    }

    #[test]
    fn test_nan_keeps_previous_value() {
        let mut model = sample_model();
        model.set_value(1, 2.0);
        assert_eq!(model.set_value(1, f32::NAN), Some(2.0));
        assert_eq!(model.value("Gamma"), Some(2.0));
    }

    #[test]
    fn test_infinite_values_clamp_to_bounds() {
        let mut model = sample_model();
        assert_eq!(model.set_by_key("Gamma", f32::INFINITY), Some(4.0));
        assert_eq!(model.set_by_key("Gamma", f32::NEG_INFINITY), Some(0.01));
        assert_eq!(model.set_by_key("Missing", 1.0), None);
    }

    #[test]
    fn test_sliders_mut_keeps_invariant() {
        let mut model = sample_model();
        for slider in model.sliders_mut() {
            slider.set(100.0);
        }
        for slider in model.sliders() {
            assert_eq!(slider.value(), slider.max());
        }
        model.reset();
        assert_eq!(model, sample_model());
    }

    #[test]
    fn test_inverted_bounds_are_swapped() {
        let p = EffectParameter::new("x", "x", 5.0, 1.0, 0.0);
        assert_eq!((p.min(), p.max(), p.value()), (0.0, 1.0, 1.0));
    }

    #[test]
    fn test_uniforms_snapshot_is_detached() {
        let mut model = sample_model();
        let before = model.uniforms();
        model.set_by_key("Intensity", 0.25);
        let after = model.uniforms();

        assert_eq!(before.get("Intensity"), Some(1.0));
        assert_eq!(after.get("Intensity"), Some(0.25));
        assert_eq!(after.get_or("Missing", 0.5), 0.5);
        let keys: Vec<&str> = after.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["Intensity", "Gamma"]);
    }

    #[test]
    fn test_uniform_set_replaces_existing_binding() {
        let mut uniforms = UniformBindings::default();
        uniforms.set("Gamma", 1.0);
        uniforms.set("Gamma", 2.0);
        assert_eq!(uniforms.len(), 1);
        assert_eq!(uniforms.get("Gamma"), Some(2.0));
    }
}
