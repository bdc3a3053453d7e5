//! Compositor: applies the active effect for live preview and for export.
//!
//! Preview runs through a pluggable [`PreviewBackend`] (CPU here, wgpu in
//! `devalue-gpu`) once per displayed frame. Export always runs on the CPU.
//! Both read a fresh [`UniformBindings`] snapshot on every call and evaluate
//! the same per-pixel transform, so for the CPU backend preview and export
//! are bit-identical at native resolution.

pub mod viewport;

pub use viewport::{Viewport, ViewportFit};

use crate::effect::{Effect, UniformBindings};
use crate::error::DevalueError;
use crate::image::RasterImage;

/// Evaluates an effect over a whole image for the preview path.
pub trait PreviewBackend {
    /// Short name for logs and status text.
    fn label(&self) -> &'static str;

    /// Produce the processed image at native resolution.
    ///
    /// `uniforms` is the snapshot to bind; implementations must not cache
    /// parameter values across calls.
    fn render(
        &mut self,
        image: &RasterImage,
        effect: &Effect,
        uniforms: &UniformBindings,
    ) -> Result<RasterImage, DevalueError>;
}

/// Reference backend evaluating the transform on the CPU.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuBackend;

impl PreviewBackend for CpuBackend {
    fn label(&self) -> &'static str {
        "cpu"
    }

    fn render(
        &mut self,
        image: &RasterImage,
        effect: &Effect,
        uniforms: &UniformBindings,
    ) -> Result<RasterImage, DevalueError> {
        Ok(apply_cpu(image, effect, uniforms))
    }
}

/// Apply `effect` to every pixel of `image` with the given snapshot.
pub fn apply_cpu(image: &RasterImage, effect: &Effect, uniforms: &UniformBindings) -> RasterImage {
    image.map_pixels(|px| effect.apply(px, uniforms))
}

/// Everything the display surface needs to draw one preview frame.
#[derive(Debug, Clone)]
pub struct PreviewFrame {
    /// Processed image at native resolution.
    pub image: RasterImage,
    /// Placement of `image` inside the viewport.
    pub fit: ViewportFit,
    /// Parameter snapshot the frame was rendered with.
    pub uniforms: UniformBindings,
    /// Label of the backend that produced the frame.
    pub backend: &'static str,
}

/// Drives preview and export for one session.
pub struct Compositor {
    backend: Box<dyn PreviewBackend>,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::cpu()
    }
}

impl Compositor {
    pub fn new(backend: Box<dyn PreviewBackend>) -> Self {
        Self { backend }
    }

    /// Compositor previewing on the CPU.
    pub fn cpu() -> Self {
        Self::new(Box::new(CpuBackend))
    }

    /// Label of the active preview backend.
    pub fn backend_label(&self) -> &'static str {
        self.backend.label()
    }

    /// Render one preview frame. Expected to run once per displayed frame.
    ///
    /// The source image is only borrowed. Calling this repeatedly with the
    /// same image and parameter values yields the same pixels.
    pub fn apply_preview(
        &mut self,
        image: &RasterImage,
        effect: &Effect,
        viewport: Viewport,
    ) -> Result<PreviewFrame, DevalueError> {
        let uniforms = effect.uniforms();
        let processed = self.backend.render(image, effect, &uniforms)?;
        let fit = ViewportFit::for_viewport(image.dimensions(), viewport);

        tracing::trace!(
            backend = self.backend.label(),
            effect = effect.name(),
            scale = fit.scale,
            "preview frame"
        );

        Ok(PreviewFrame {
            image: processed,
            fit,
            uniforms,
            backend: self.backend.label(),
        })
    }

    /// Produce the export image at native resolution on the CPU.
    pub fn apply_export(&self, image: &RasterImage, effect: &Effect) -> RasterImage {
        let uniforms = effect.uniforms();
        tracing::debug!(
            effect = effect.name(),
            width = image.width(),
            height = image.height(),
            "export composite"
        );
        apply_cpu(image, effect, &uniforms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{EffectRegistry, INTENSITY, TARGET_VALUE};
    use crate::image::BitDepth;

    fn gradient(width: u32, height: u32) -> RasterImage {
        let mut pixels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let r = x as f32 / (width - 1) as f32;
                let g = y as f32 / (height - 1) as f32;
                pixels.push([r, g, 0.5, 1.0 - r * 0.5]);
            }
        }
        RasterImage::new(width, height, pixels, BitDepth::F32).unwrap()
    }

    #[test]
    fn test_export_matches_preview_for_every_effect() {
        let registry = EffectRegistry::new();
        let image = gradient(8, 6);
        let mut compositor = Compositor::cpu();

        for name in registry.list_names() {
            let mut effect = registry.instantiate(name).unwrap();
            effect.parameters_mut().set_value(0, 0.7);
            effect.parameters_mut().set_value(1, 0.35);

            let frame = compositor
                .apply_preview(&image, &effect, Viewport::new(800, 600))
                .unwrap();
            let exported = compositor.apply_export(&image, &effect);

            assert_eq!(frame.image.dimensions(), image.dimensions());
            assert_eq!(frame.image.pixels(), exported.pixels(), "{name}");
        }
    }

    #[test]
    fn test_preview_rereads_parameters_every_call() {
        let registry = EffectRegistry::new();
        let image = gradient(4, 4);
        let mut effect = registry.instantiate("Devalue in RGB space").unwrap();
        let mut compositor = Compositor::cpu();
        let viewport = Viewport::new(100, 100);

        let first = compositor.apply_preview(&image, &effect, viewport).unwrap();
        effect.parameters_mut().set_by_key(INTENSITY, 0.0);
        let second = compositor.apply_preview(&image, &effect, viewport).unwrap();

        assert_eq!(first.uniforms.get(INTENSITY), Some(1.0));
        assert_eq!(second.uniforms.get(INTENSITY), Some(0.0));
        assert!(first.image.pixels().iter().all(|p| p[..3] == [0.5; 3]));
        assert_eq!(second.image.pixels(), image.pixels());
    }

    #[test]
    fn test_preview_is_idempotent_and_leaves_source_untouched() {
        let registry = EffectRegistry::new();
        let image = gradient(5, 3);
        let before = image.pixels().to_vec();
        let mut effect = registry.instantiate("Deluma in YUV space").unwrap();
        effect.parameters_mut().set_by_key(INTENSITY, 0.5);
        let mut compositor = Compositor::cpu();

        let a = compositor.apply_preview(&image, &effect, Viewport::new(10, 10)).unwrap();
        let b = compositor.apply_preview(&image, &effect, Viewport::new(10, 10)).unwrap();

        assert_eq!(a.image.pixels(), b.image.pixels());
        assert_eq!(image.pixels(), before.as_slice());
        assert_eq!(a.backend, "cpu");
    }

    #[test]
    fn test_value_blend_export_at_full_intensity_is_flat() {
        let registry = EffectRegistry::new();
        let image = gradient(6, 6);
        let mut effect = registry.instantiate("Devalue in RGB space").unwrap();
        effect.parameters_mut().set_by_key(TARGET_VALUE, 0.2);

        let out = Compositor::cpu().apply_export(&image, &effect);
        for (src, dst) in image.pixels().iter().zip(out.pixels()) {
            assert_eq!(dst, &[0.2, 0.2, 0.2, src[3]]);
        }
    }

    #[test]
    fn test_preview_frame_carries_fit() {
        let registry = EffectRegistry::new();
        let image = gradient(16, 4);
        let effect = registry.instantiate("Devalue in HSV space").unwrap();
        let frame = Compositor::default()
            .apply_preview(&image, &effect, Viewport::new(8, 6))
            .unwrap();
        assert_eq!(frame.fit, ViewportFit::compute(16, 4, 8, 6));
    }
}
