use thiserror::Error;

/// Failures surfaced by the classification pipeline.
///
/// A failure at any stage aborts the whole invocation; nothing is retried
/// and no partial result is returned.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// Network or HTTP failure while fetching the image.
    #[error("failed to fetch image: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Downloaded bytes are not a supported raster image.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// Opaque failure inside the inference runtime.
    #[error("inference failed: {0}")]
    Inference(#[from] tensorflow::Status),

    /// Class-label file could not be read.
    #[error("failed to read labels: {0}")]
    Labels(#[from] std::io::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, ClassifyError>;
