//! Grading session: the state a front end drives.
//!
//! Holds the loaded image, the active effect and the viewport. Every
//! operation that can fail validates and prepares its result before
//! touching state, so a failed load, effect switch or export leaves the
//! session exactly as it was.

use std::path::{Path, PathBuf};

use crate::compositor::{Compositor, PreviewFrame, Viewport, ViewportFit};
use crate::effect::{Effect, EffectPreset, EffectRegistry};
use crate::error::DevalueError;
use crate::image::RasterImage;
use crate::io;

/// A loaded image together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub image: RasterImage,
    pub source: Option<PathBuf>,
}

pub struct GradingSession {
    registry: EffectRegistry,
    image: Option<LoadedImage>,
    effect: Effect,
    viewport: Viewport,
    fit: Option<ViewportFit>,
}

impl GradingSession {
    /// Start a session with the registry's first effect active.
    pub fn new(registry: EffectRegistry, viewport: Viewport) -> Result<Self, DevalueError> {
        let first = registry
            .list_names()
            .first()
            .copied()
            .ok_or_else(|| DevalueError::UnknownEffect(String::new()))?;
        let effect = registry.instantiate(first)?;

        Ok(Self {
            registry,
            image: None,
            effect,
            viewport,
            fit: None,
        })
    }

    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    pub fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    /// Mutable access to the active effect's parameters for UI binding.
    pub fn effect_mut(&mut self) -> &mut Effect {
        &mut self.effect
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Fit of the loaded image in the current viewport.
    pub fn fit(&self) -> Option<ViewportFit> {
        self.fit
    }

    /// Load an image file, replacing the current image on success.
    pub fn load_image(&mut self, path: &Path) -> Result<&LoadedImage, DevalueError> {
        let image = io::load(path)?;
        Ok(self.replace_image(image, Some(path.to_path_buf())))
    }

    /// Decode an in-memory image, replacing the current image on success.
    pub fn load_image_bytes(&mut self, bytes: &[u8]) -> Result<&LoadedImage, DevalueError> {
        let image = io::decode(bytes)?;
        Ok(self.replace_image(image, None))
    }

    /// Install an already decoded image.
    pub fn set_image(&mut self, image: RasterImage) -> &LoadedImage {
        self.replace_image(image, None)
    }

    /// Switch the active effect. The previous parameter values are dropped.
    pub fn select_effect(&mut self, name: &str) -> Result<&Effect, DevalueError> {
        let effect = self.registry.instantiate(name)?;
        tracing::info!(from = self.effect.name(), to = name, "switched effect");
        self.effect = effect;
        Ok(&self.effect)
    }

    /// Replace the active effect with one built from a preset.
    pub fn apply_preset(&mut self, preset: &EffectPreset) -> Result<&Effect, DevalueError> {
        let effect = self.registry.instantiate_preset(preset)?;
        tracing::info!(effect = %preset.effect, "applied preset");
        self.effect = effect;
        Ok(&self.effect)
    }

    /// Set a parameter of the active effect by slider index (clamped).
    pub fn set_parameter(&mut self, index: usize, value: f32) -> Option<f32> {
        self.effect.parameters_mut().set_value(index, value)
    }

    /// Set a parameter of the active effect by uniform key (clamped).
    pub fn set_parameter_by_key(&mut self, key: &str, value: f32) -> Option<f32> {
        self.effect.parameters_mut().set_by_key(key, value)
    }

    /// Record a new viewport size and refit the image.
    pub fn resize_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.refit();
    }

    /// Render one preview frame of the loaded image.
    pub fn preview(&self, compositor: &mut Compositor) -> Result<PreviewFrame, DevalueError> {
        let loaded = self.image.as_ref().ok_or(DevalueError::NoImage)?;
        compositor.apply_preview(&loaded.image, &self.effect, self.viewport)
    }

    /// Apply the active effect at native resolution and write a PNG.
    pub fn export(&self, compositor: &Compositor, path: &Path) -> Result<RasterImage, DevalueError> {
        let loaded = self.image.as_ref().ok_or(DevalueError::NoImage)?;
        let output = compositor.apply_export(&loaded.image, &self.effect);
        io::save(&output, path)?;
        Ok(output)
    }

    fn replace_image(&mut self, image: RasterImage, source: Option<PathBuf>) -> &LoadedImage {
        self.fit = Some(ViewportFit::for_viewport(image.dimensions(), self.viewport));
        self.image.insert(LoadedImage { image, source })
    }

    fn refit(&mut self) {
        self.fit = self
            .image
            .as_ref()
            .map(|loaded| ViewportFit::for_viewport(loaded.image.dimensions(), self.viewport));
    }
}
