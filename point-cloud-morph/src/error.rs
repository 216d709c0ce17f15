use std::io;
use thiserror::Error;

/// Errors raised by layout generation, image sampling and point list parsing
#[derive(Debug, Error)]
pub enum MorphError {
    /// I/O error while reading an image, point list or config file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The raster data could not be decoded
    #[error("Image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// Malformed JSON in a point list or config file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Chunk count outside the accepted range
    #[error("Chunk count {count} outside [{min}, {max}]")]
    InvalidChunkCount { count: u32, min: u32, max: u32 },

    /// Every pixel was transparent or background
    #[error("Image has no visible pixels")]
    NoVisiblePixels,

    /// A point list contained no records
    #[error("Point list is empty")]
    EmptyPointList,

    /// A point list record could not be read as a point
    #[error("Invalid point at index {index}: {reason}")]
    InvalidPoint { index: usize, reason: String },

    /// Configuration values that cannot work together
    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MorphError>;
