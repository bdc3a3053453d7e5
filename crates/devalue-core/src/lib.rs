//! Devalue Core: domain layer for the image devalue effects.
//!
//! Color math, the effect variants and their parameter models, the
//! compositor that applies them for preview and export, and image I/O.
//! No GPU or UI dependencies; `devalue-gpu` plugs in as a
//! [`PreviewBackend`].

pub mod color;
pub mod compositor;
pub mod effect;
pub mod error;
pub mod image;
pub mod io;
pub mod session;

// Re-exports for convenience.
pub use compositor::{Compositor, CpuBackend, PreviewBackend, PreviewFrame, Viewport, ViewportFit};
pub use effect::{
    Effect, EffectKind, EffectParameter, EffectParameterModel, EffectPreset, EffectRegistry,
    PixelTransform, UniformBindings,
};
pub use error::DevalueError;
pub use image::{BitDepth, RasterImage};
pub use session::{GradingSession, LoadedImage};
