use std::path::PathBuf;

/// Errors surfaced by the effect pipeline.
///
/// Numeric edge cases inside the per-pixel transforms are never reported
/// here; they are handled by each effect's fallback.
#[derive(Debug, thiserror::Error)]
pub enum DevalueError {
    #[error("unknown effect: {0:?}")]
    UnknownEffect(String),

    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("pixel buffer of {len} pixels does not match {width}x{height}")]
    InvalidDimensions { width: u32, height: u32, len: usize },

    #[error("invalid effect preset: {0}")]
    Preset(#[from] serde_json::Error),

    #[error("no image loaded")]
    NoImage,

    #[error("preview backend failed: {0}")]
    Backend(String),
}
