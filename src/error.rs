use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TgaError {
    #[error("File header is missing or truncated")]
    MissingHeader,
    #[error("Unsupported bit depth: {0}")]
    UnsupportedBitdepth(u8),
    #[error("Unsupported image format: {0}")]
    UnsupportedImageFormat(u8),
    #[error("Image data ended unexpectedly")]
    UnexpectedEof,
    #[error("Encoder produced a zero-length run")]
    ZeroRunLength,
    #[error("Image dimensions exceed the format limit: {0}x{1}")]
    DimensionsTooLarge(usize, usize),
    #[error("Failed to allocate pixel buffer: {0}")]
    Alloc(#[from] TryReserveError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_the_offending_value() {
        let err = TgaError::UnsupportedBitdepth(8);
        assert!(err.to_string().contains("8"));

        let err = TgaError::UnsupportedImageFormat(33);
        assert!(err.to_string().contains("33"));
    }
}
