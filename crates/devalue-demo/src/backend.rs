//! Preview backend selection.

use devalue_core::{Compositor, DevalueError, GradingSession, PreviewFrame};

/// Build the compositor, preferring the GPU when requested.
///
/// Falls back to the CPU backend with a warning if the GPU cannot be
/// initialised or support was compiled out.
pub fn select_compositor(want_gpu: bool) -> Compositor {
    if !want_gpu {
        return Compositor::cpu();
    }
    gpu_compositor().unwrap_or_else(Compositor::cpu)
}

/// Render a preview frame, switching `compositor` to the CPU backend for
/// good if a non-CPU backend fails.
pub fn preview_with_fallback(
    session: &GradingSession,
    compositor: &mut Compositor,
) -> Result<PreviewFrame, DevalueError> {
    match session.preview(compositor) {
        Err(DevalueError::Backend(reason)) if compositor.backend_label() != "cpu" => {
            tracing::warn!(
                backend = compositor.backend_label(),
                %reason,
                "preview backend failed, retrying on CPU"
            );
            *compositor = Compositor::cpu();
            session.preview(compositor)
        }
        result => result,
    }
}

#[cfg(feature = "gpu")]
fn gpu_compositor() -> Option<Compositor> {
    match devalue_gpu::GpuPreviewPipeline::create_blocking() {
        Ok(pipeline) => Some(Compositor::new(Box::new(pipeline))),
        Err(e) => {
            tracing::warn!(error = %e, "GPU preview unavailable, using CPU");
            None
        }
    }
}

#[cfg(not(feature = "gpu"))]
fn gpu_compositor() -> Option<Compositor> {
    tracing::warn!("built without GPU support, using CPU preview");
    None
}
