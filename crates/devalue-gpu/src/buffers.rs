//! GPU buffers for effect input and output images.

use devalue_core::RasterImage;
use wgpu::util::DeviceExt;

use crate::GpuError;

/// Bytes per `vec4<f32>` pixel.
pub const BYTES_PER_PIXEL: u64 = 16;

/// Handle to a GPU image stored as a storage buffer of `vec4<f32>`.
pub struct GpuImageHandle {
    pub buffer: wgpu::Buffer,
    pub width: u32,
    pub height: u32,
    /// Id of the [`RasterImage`] uploaded into this buffer, if any.
    pub image_id: Option<u64>,
}

impl GpuImageHandle {
    /// Upload a [`RasterImage`] to the GPU as a read-only storage buffer.
    pub fn upload(device: &wgpu::Device, image: &RasterImage) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("devalue_image_upload"),
            contents: image.as_bytes(),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            buffer,
            width: image.width(),
            height: image.height(),
            image_id: Some(image.id()),
        }
    }

    /// Create an uninitialized GPU image buffer for effect output.
    pub fn create_output(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("devalue_image_output"),
            size: (width as u64) * (height as u64) * BYTES_PER_PIXEL,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            width,
            height,
            image_id: None,
        }
    }

    /// Buffer size in bytes.
    pub fn byte_size(&self) -> u64 {
        (self.width as u64) * (self.height as u64) * BYTES_PER_PIXEL
    }

    /// Whether this buffer already holds `image`.
    pub fn holds(&self, image: &RasterImage) -> bool {
        self.image_id == Some(image.id())
    }

    /// Whether this buffer can store an image of the given size.
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }
}

/// Largest image, in bytes, that fits in one storage binding on a device
/// with `limits`.
pub fn max_image_bytes(limits: &wgpu::Limits) -> u64 {
    (limits.max_storage_buffer_binding_size as u64).min(limits.max_buffer_size)
}

/// Check that a `width` x `height` image fits in a single storage binding.
/// Returns the buffer size in bytes.
pub fn check_image_size(width: u32, height: u32, limits: &wgpu::Limits) -> Result<u64, GpuError> {
    let bytes = (width as u64)
        .saturating_mul(height as u64)
        .saturating_mul(BYTES_PER_PIXEL);
    let limit = max_image_bytes(limits);
    if bytes > limit {
        return Err(GpuError::ImageTooLarge {
            width,
            height,
            bytes,
            limit,
        });
    }
    Ok(bytes)
}
