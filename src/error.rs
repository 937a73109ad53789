//! Error types for the block-prune crate.

use std::path::PathBuf;

/// Errors that can occur during block pruning and restoration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input path does not exist.
    #[error("source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The codec could not parse the image bytes.
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),

    /// Mask and image dimensions disagree at restore time.
    #[error(
        "dimension mismatch: image is {image_width}x{image_height}, mask is {mask_width}x{mask_height}"
    )]
    DimensionMismatch {
        /// Modified image width in pixels.
        image_width: u32,
        /// Modified image height in pixels.
        image_height: u32,
        /// Mask width in pixels.
        mask_width: u32,
        /// Mask height in pixels.
        mask_height: u32,
    },

    /// A configuration value is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The output image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred while encoding or saving an image.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
