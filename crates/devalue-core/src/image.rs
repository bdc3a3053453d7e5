//! Image representation for the effect pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::DevalueError;

/// Supported bit depths for source images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BitDepth {
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit floating point.
    F32,
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U8 => write!(f, "8-bit"),
            Self::U16 => write!(f, "16-bit"),
            Self::F32 => write!(f, "32-bit float"),
        }
    }
}

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Immutable RGBA image with channels normalized to `[0, 1]`.
///
/// Pixels can only be set at construction time. Every constructed image gets
/// a process-unique [`id`](Self::id); clones share the id of their source
/// because their contents are identical.
#[derive(Debug, Clone)]
pub struct RasterImage {
    id: u64,
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
    source_bit_depth: BitDepth,
}

impl RasterImage {
    /// Wrap an RGBA f32 pixel buffer in row-major order.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<[f32; 4]>,
        source_bit_depth: BitDepth,
    ) -> Result<Self, DevalueError> {
        let expected = (width as usize) * (height as usize);
        if pixels.len() != expected {
            return Err(DevalueError::InvalidDimensions {
                width,
                height,
                len: pixels.len(),
            });
        }

        Ok(Self {
            id: NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed),
            width,
            height,
            pixels,
            source_bit_depth,
        })
    }

    /// Build an image from packed 8-bit RGBA bytes.
    ///
    /// Each channel maps to `v / 255`, which [`to_rgba8`](Self::to_rgba8)
    /// inverts exactly.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, DevalueError> {
        if bytes.len() % 4 != 0 {
            return Err(DevalueError::InvalidDimensions {
                width,
                height,
                len: bytes.len() / 4,
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| {
                [
                    unorm8_to_f32(px[0]),
                    unorm8_to_f32(px[1]),
                    unorm8_to_f32(px[2]),
                    unorm8_to_f32(px[3]),
                ]
            })
            .collect();
        Self::new(width, height, pixels, BitDepth::U8)
    }

    /// Produce a new image with the same dimensions and bit depth but
    /// different pixel contents. Used by the compositor for its output.
    pub fn with_pixels(&self, pixels: Vec<[f32; 4]>) -> Result<Self, DevalueError> {
        Self::new(self.width, self.height, pixels, self.source_bit_depth)
    }

    /// Produce a new image by transforming every pixel. The source is left
    /// untouched.
    pub fn map_pixels(&self, f: impl FnMut([f32; 4]) -> [f32; 4]) -> Self {
        Self {
            id: NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed),
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().copied().map(f).collect(),
            source_bit_depth: self.source_bit_depth,
        }
    }

    /// Process-unique identifier of this image's contents.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Original bit depth of the decoded source.
    pub fn source_bit_depth(&self) -> BitDepth {
        self.source_bit_depth
    }

    /// Pixel data in row-major RGBA order.
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    /// Pixel data reinterpreted as raw bytes (16 bytes per pixel).
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Fetch the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get((y as usize) * (self.width as usize) + x as usize)
            .copied()
    }

    /// Quantize to packed 8-bit RGBA. Channels are clamped to `[0, 1]`.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|px| px.map(f32_to_unorm8))
            .collect()
    }

    /// Quantize to 16-bit RGBA samples. Channels are clamped to `[0, 1]`.
    pub fn to_rgba16(&self) -> Vec<u16> {
        self.pixels
            .iter()
            .flat_map(|px| px.map(f32_to_unorm16))
            .collect()
    }
}

fn unorm8_to_f32(v: u8) -> f32 {
    v as f32 / 255.0
}

fn f32_to_unorm8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn f32_to_unorm16(v: f32) -> u16 {
    (v.clamp(0.0, 1.0) * 65535.0).round() as u16
}
