//! Fit-to-viewport placement shared by the preview and export paths.

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

/// Size of the display area an image is drawn into, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Uniform scale plus translation that centers an image in a viewport.
///
/// Derived purely from image and viewport sizes; recompute whenever either
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportFit {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl ViewportFit {
    /// Fit an image into a viewport, shrinking but never enlarging it.
    ///
    /// ```text
    /// scale = min(1, viewport_w / image_w, viewport_h / image_h)
    /// tx    = viewport_w / 2 − image_w × scale / 2
    /// ty    = viewport_h / 2 − image_h × scale / 2
    /// ```
    ///
    /// An image with a zero dimension keeps scale 1 and is anchored at the
    /// viewport center.
    pub fn compute(image_w: u32, image_h: u32, viewport_w: u32, viewport_h: u32) -> Self {
        let (iw, ih) = (image_w as f64, image_h as f64);
        let (vw, vh) = (viewport_w as f64, viewport_h as f64);

        let scale = if image_w == 0 || image_h == 0 {
            1.0
        } else {
            1.0_f64.min(vw / iw).min(vh / ih)
        };

        Self {
            scale,
            translate_x: vw / 2.0 - iw * scale / 2.0,
            translate_y: vh / 2.0 - ih * scale / 2.0,
        }
    }

    /// Fit for an image of `image_size` in `viewport`.
    pub fn for_viewport(image_size: (u32, u32), viewport: Viewport) -> Self {
        Self::compute(image_size.0, image_size.1, viewport.width, viewport.height)
    }

    /// Image-space to viewport-space transform: scale, then translate.
    pub fn to_affine(&self) -> DAffine2 {
        DAffine2::from_translation(DVec2::new(self.translate_x, self.translate_y))
            * DAffine2::from_scale(DVec2::splat(self.scale))
    }

    /// Map a point in image pixels to viewport pixels.
    pub fn map_point(&self, point: DVec2) -> DVec2 {
        self.to_affine().transform_point2(point)
    }

    /// Size of the placed image in viewport pixels.
    pub fn scaled_size(&self, image_w: u32, image_h: u32) -> DVec2 {
        DVec2::new(image_w as f64, image_h as f64) * self.scale
    }
}
