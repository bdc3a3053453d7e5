//! Devalue GPU: wgpu compute backend for live effect preview.
//!
//! Each effect variant compiles to one compute shader that evaluates the
//! same per-pixel math as `devalue_core::effect`. [`GpuPreviewPipeline`]
//! implements [`devalue_core::PreviewBackend`] so a session can swap it in
//! for the CPU backend. Export stays on the CPU.

pub mod buffers;
pub mod effect_pass;
pub mod pipeline;
pub mod readback;

pub use effect_pass::EffectUniformsGpu;
pub use pipeline::GpuPreviewPipeline;

/// Errors raised while setting up or driving the GPU backend.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("device poll failed: {0}")]
    Poll(#[from] wgpu::PollError),

    #[error("failed to map readback buffer: {0}")]
    Map(#[from] wgpu::BufferAsyncError),

    #[error("{width}x{height} image needs {bytes} bytes, device limit is {limit}")]
    ImageTooLarge {
        width: u32,
        height: u32,
        bytes: u64,
        limit: u64,
    },

    #[error("GPU validation failed: {0}")]
    Validation(String),

    #[error("readback channel closed before the buffer was mapped")]
    MapCallbackDropped,

    #[error(transparent)]
    Core(#[from] devalue_core::DevalueError),
}

/// Device features the effect shaders need. Plain storage buffers and
/// uniforms only, so none beyond the baseline.
pub fn required_features() -> wgpu::Features {
    wgpu::Features::empty()
}
