//! Crate-level error type.
//!
//! Each component reports its own error enum ([`BufferError`], [`LoadError`],
//! [`BitmapError`]); [`Error`] wraps them for callers that drive the whole
//! pipeline and only need to report what went wrong.

use thiserror::Error;

pub use crate::bitmap::BitmapError;
pub use crate::loader::LoadError;

/// Result alias used by the pipeline-level helpers.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure to create a [`PixelBuffer`](crate::PixelBuffer).
#[derive(Debug, Error)]
pub enum BufferError {
    #[error("pixel buffer dimensions must be non-zero (got {width}x{height})")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("failed to allocate a {width}x{height} pixel buffer")]
    AllocationFailed { width: u32, height: u32 },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Buffer(#[from] BufferError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Bitmap(#[from] BitmapError),

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}
