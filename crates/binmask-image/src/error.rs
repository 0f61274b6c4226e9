/// The broad category an [`ImageError`] belongs to.
///
/// Callers that only need to decide how to report a failure (e.g. a UI showing a message) can
/// match on the kind instead of on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The raster itself is malformed: zero dimensions, jagged rows or a buffer of the wrong size.
    InvalidRaster,
    /// The raster has a channel count the operation cannot handle.
    UnsupportedFormat,
    /// An argument other than the raster is out of its domain.
    InvalidParameter,
}

/// An error type for the image module.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// Error when the image has zero width or height.
    #[error("Image size must be non-zero, got {0}x{1}")]
    EmptyImage(usize, usize),

    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the rows of an image do not all have the same length.
    #[error("Row {0} has {1} samples, expected {2}")]
    InconsistentRowLength(usize, usize, usize),

    /// Error when the source and destination sizes do not match.
    #[error("Image size mismatch: source is {0}x{1}, destination is {2}x{3}")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel index ({0}, {1}) is out of bounds ({2}x{3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} is out of bounds ({1} channels)")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when the operation does not support the number of channels of the image.
    #[error("Unsupported number of channels: {0}")]
    UnsupportedChannels(usize),

    /// Error when the number of histogram bins is invalid.
    #[error("Invalid number of histogram bins: {0}")]
    InvalidHistogramBins(usize),

    /// Error when an operation parameter is invalid.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ImageError {
    /// Classify the error into one of the [`ErrorKind`] categories.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ImageError::EmptyImage(..)
            | ImageError::InvalidChannelShape(..)
            | ImageError::InconsistentRowLength(..)
            | ImageError::InvalidImageSize(..) => ErrorKind::InvalidRaster,
            ImageError::UnsupportedChannels(_) => ErrorKind::UnsupportedFormat,
            ImageError::PixelIndexOutOfBounds(..)
            | ImageError::ChannelIndexOutOfBounds(..)
            | ImageError::InvalidHistogramBins(_)
            | ImageError::InvalidParameter(_) => ErrorKind::InvalidParameter,
        }
    }
}
