//! GPU preview pipeline: upload, dispatch, download.

use std::collections::HashMap;
use std::sync::Arc;

use devalue_core::{DevalueError, Effect, EffectKind, PreviewBackend, RasterImage, UniformBindings};

use crate::buffers::{self, GpuImageHandle};
use crate::effect_pass::{EffectPass, EffectUniformsGpu};
use crate::{GpuError, readback};

/// Runs effect variants as compute shaders.
///
/// The source image stays resident on the GPU between frames and is only
/// re-uploaded when a different [`RasterImage`] is passed in. Parameter
/// uniforms are rewritten on every call.
pub struct GpuPreviewPipeline {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    passes: HashMap<EffectKind, EffectPass>,
    uniform_buffer: wgpu::Buffer,
    source: Option<GpuImageHandle>,
    output: Option<GpuImageHandle>,
    staging: Option<wgpu::Buffer>,
    uploads: u64,
}

impl GpuPreviewPipeline {
    /// Create a pipeline from an existing wgpu device and queue.
    /// Compiles one pass per built-in effect variant.
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        let passes = EffectKind::all()
            .iter()
            .map(|&kind| (kind, EffectPass::new(&device, kind)))
            .collect();

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("devalue_effect_uniforms"),
            size: std::mem::size_of::<EffectUniformsGpu>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            device,
            queue,
            passes,
            uniform_buffer,
            source: None,
            output: None,
            staging: None,
            uploads: 0,
        }
    }

    /// Request a default adapter and device, then build the pipeline.
    /// Blocks on the async wgpu setup.
    pub fn create_blocking() -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            ..Default::default()
        }))?;

        let info = adapter.get_info();
        tracing::info!(
            adapter = %info.name,
            backend = ?info.backend,
            "using GPU adapter"
        );

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("devalue_device"),
            required_features: crate::required_features(),
            required_limits: adapter.limits(),
            ..Default::default()
        }))?;

        Ok(Self::new(Arc::new(device), Arc::new(queue)))
    }

    /// Number of source uploads performed so far.
    pub fn upload_count(&self) -> u64 {
        self.uploads
    }

    /// Make `image` the resident source, uploading only if it changed.
    pub fn upload_image(&mut self, image: &RasterImage) -> &GpuImageHandle {
        let source = match self.source.take() {
            Some(handle) if handle.holds(image) => handle,
            _ => {
                self.uploads += 1;
                tracing::debug!(
                    id = image.id(),
                    width = image.width(),
                    height = image.height(),
                    "uploading source image"
                );
                GpuImageHandle::upload(&self.device, image)
            }
        };
        self.source.insert(source)
    }

    /// Apply `kind` to `image` with the given snapshot and read the result
    /// back. Blocks until the GPU finishes.
    ///
    /// Images larger than one storage binding fail with
    /// [`GpuError::ImageTooLarge`] before any GPU work. Validation and
    /// out-of-memory errors raised while dispatching are returned as
    /// [`GpuError::Validation`] and drop the cached buffers.
    pub fn process(
        &mut self,
        image: &RasterImage,
        kind: EffectKind,
        uniforms: &UniformBindings,
    ) -> Result<RasterImage, GpuError> {
        let (width, height) = image.dimensions();
        buffers::check_image_size(width, height, &self.device.limits())?;
        if image.pixel_count() == 0 {
            return Ok(image.with_pixels(Vec::new())?);
        }

        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let dispatched = self.dispatch(image, kind, uniforms);
        let validation = pollster::block_on(self.device.pop_error_scope());
        let out_of_memory = pollster::block_on(self.device.pop_error_scope());

        if let Some(error) = validation.or(out_of_memory) {
            tracing::warn!(%error, width, height, "GPU effect dispatch failed");
            self.source = None;
            self.output = None;
            return Err(GpuError::Validation(error.to_string()));
        }
        dispatched?;

        let Some(output) = self.output.as_ref() else {
            return Err(GpuError::Validation("output buffer missing".to_string()));
        };
        let pixels = readback::download_pixels(&self.device, &self.queue, output, &mut self.staging)?;
        Ok(image.with_pixels(pixels)?)
    }

    fn dispatch(
        &mut self,
        image: &RasterImage,
        kind: EffectKind,
        uniforms: &UniformBindings,
    ) -> Result<(), GpuError> {
        // Size was checked against the binding limit, so this fits in u32.
        let pixel_count = image.pixel_count() as u32;

        self.upload_image(image);
        let (width, height) = image.dimensions();
        let output = match self.output.take() {
            Some(handle) if handle.fits(width, height) => handle,
            _ => GpuImageHandle::create_output(&self.device, width, height),
        };
        let output = &*self.output.insert(output);

        let packed = EffectUniformsGpu::pack(kind, uniforms, pixel_count);
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&packed));

        let (Some(pass), Some(source)) = (self.passes.get(&kind), self.source.as_ref()) else {
            return Err(DevalueError::UnknownEffect(kind.name().to_string()).into());
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("devalue_effect_encoder"),
            });
        pass.encode(
            &self.device,
            &mut encoder,
            &source.buffer,
            &output.buffer,
            &self.uniform_buffer,
            pixel_count,
        );
        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }
}

impl PreviewBackend for GpuPreviewPipeline {
    fn label(&self) -> &'static str {
        "gpu"
    }

    fn render(
        &mut self,
        image: &RasterImage,
        effect: &Effect,
        uniforms: &UniformBindings,
    ) -> Result<RasterImage, DevalueError> {
        self.process(image, effect.kind(), uniforms)
            .map_err(|e| DevalueError::Backend(e.to_string()))
    }
}
