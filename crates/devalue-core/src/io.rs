//! Image decoding and encoding.
//!
//! Loading accepts any raster format the `image` crate decodes (PNG, JPEG,
//! BMP, TIFF, WebP, ...). Export always writes PNG: 8-bit RGBA for 8-bit
//! sources, 16-bit RGBA otherwise.

use std::path::Path;

use image::{DynamicImage, ExtendedColorType, ImageEncoder, codecs::png::PngEncoder};

use crate::error::DevalueError;
use crate::image::{BitDepth, RasterImage};

/// Decode encoded image bytes into a [`RasterImage`].
pub fn decode(bytes: &[u8]) -> Result<RasterImage, DevalueError> {
    let format = image::guess_format(bytes).map_err(DevalueError::Decode)?;
    let img = image::load_from_memory_with_format(bytes, format).map_err(DevalueError::Decode)?;
    let raster = from_dynamic(&img)?;

    tracing::debug!(
        format = ?format,
        width = raster.width(),
        height = raster.height(),
        bit_depth = %raster.source_bit_depth(),
        "decoded image"
    );
    Ok(raster)
}

/// Encode an image as PNG bytes.
pub fn encode(image: &RasterImage) -> Result<Vec<u8>, DevalueError> {
    let mut bytes = Vec::new();
    let encoder = PngEncoder::new(&mut bytes);

    match image.source_bit_depth() {
        BitDepth::U8 => encoder.write_image(
            &image.to_rgba8(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        ),
        BitDepth::U16 | BitDepth::F32 => {
            let samples = image.to_rgba16();
            encoder.write_image(
                bytemuck::cast_slice(&samples),
                image.width(),
                image.height(),
                ExtendedColorType::Rgba16,
            )
        }
    }
    .map_err(DevalueError::Encode)?;

    Ok(bytes)
}

/// Read and decode an image file.
pub fn load(path: &Path) -> Result<RasterImage, DevalueError> {
    let bytes = std::fs::read(path).map_err(|source| DevalueError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let image = decode(&bytes)?;

    tracing::info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        bit_depth = %image.source_bit_depth(),
        "loaded image"
    );
    Ok(image)
}

/// Encode an image as PNG and write it to `path`.
///
/// Nothing is written when encoding fails.
pub fn save(image: &RasterImage, path: &Path) -> Result<(), DevalueError> {
    let bytes = encode(image)?;
    std::fs::write(path, bytes).map_err(|source| DevalueError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "exported image"
    );
    Ok(())
}

fn from_dynamic(img: &DynamicImage) -> Result<RasterImage, DevalueError> {
    let (width, height) = (img.width(), img.height());

    let bit_depth = match img {
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_) => BitDepth::U8,
        DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_) => BitDepth::U16,
        _ => BitDepth::F32,
    };

    if bit_depth == BitDepth::U8 {
        return RasterImage::from_rgba8(width, height, img.to_rgba8().as_raw());
    }

    let pixels = img
        .to_rgba32f()
        .pixels()
        .map(|p| p.0)
        .collect();
    RasterImage::new(width, height, pixels, bit_depth)
}
