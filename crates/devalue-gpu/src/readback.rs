//! GPU-to-CPU image download.

use std::sync::mpsc;

use crate::GpuError;
use crate::buffers::GpuImageHandle;

/// Copy `handle` into a mappable staging buffer and read its pixels back.
/// Blocks until the copy completes.
///
/// `staging_cache` is reused across calls and grown when too small.
pub fn download_pixels(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    handle: &GpuImageHandle,
    staging_cache: &mut Option<wgpu::Buffer>,
) -> Result<Vec<[f32; 4]>, GpuError> {
    let size = handle.byte_size();
    if size == 0 {
        return Ok(Vec::new());
    }

    let staging = match staging_cache.take() {
        Some(buf) if buf.size() >= size => buf,
        _ => device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("devalue_image_staging"),
            size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        }),
    };
    let staging = &*staging_cache.insert(staging);

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("devalue_image_download_encoder"),
    });
    encoder.copy_buffer_to_buffer(&handle.buffer, 0, staging, 0, size);
    queue.submit(std::iter::once(encoder.finish()));

    let slice = staging.slice(..size);
    let (tx, rx) = mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    device.poll(wgpu::PollType::wait_indefinitely())?;
    rx.recv().map_err(|_| GpuError::MapCallbackDropped)??;

    let data = slice.get_mapped_range();
    let pixels = bytemuck::cast_slice::<u8, [f32; 4]>(&data).to_vec();
    drop(data);
    staging.unmap();

    tracing::trace!(
        width = handle.width,
        height = handle.height,
        "downloaded image"
    );
    Ok(pixels)
}
