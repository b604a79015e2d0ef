//! Error types for chroma operations.

use hdrkit_core::{Component, SampleFormat};
use thiserror::Error;

/// Error type for chroma operations.
///
/// [`FormatMismatch`](OpsError::FormatMismatch) and
/// [`SizeMismatch`](OpsError::SizeMismatch) are raised by
/// [`ChromaSubsampler::process`](crate::ChromaSubsampler::process) before any
/// output sample is written.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Input and output frames use different sample representations.
    #[error("sample format mismatch: input is {expected}, output is {actual}")]
    FormatMismatch {
        /// Input frame format
        expected: SampleFormat,
        /// Output frame format
        actual: SampleFormat,
    },

    /// A plane does not have the size the conversion requires.
    ///
    /// For luma, `expected` is the input plane size and `actual` the output
    /// plane size. For chroma, `expected` is the input size implied by the
    /// output plane (twice its width) and `actual` the input plane size.
    #[error(
        "size mismatch on {plane} plane: expected {}x{}, got {}x{}",
        .expected.0, .expected.1, .actual.0, .actual.1
    )]
    SizeMismatch {
        /// Offending plane
        plane: Component,
        /// Expected width and height
        expected: (usize, usize),
        /// Actual width and height
        actual: (usize, usize),
    },

    /// Invalid dimensions or buffer lengths.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Malformed filter table.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Frame-level error.
    #[error(transparent)]
    Core(#[from] hdrkit_core::Error),
}

impl OpsError {
    /// Returns `true` for format or size mismatches between frames.
    #[inline]
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::FormatMismatch { .. } | Self::SizeMismatch { .. })
    }
}

/// Result type for chroma operations.
pub type OpsResult<T> = Result<T, OpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_mismatch_message() {
        let err = OpsError::SizeMismatch {
            plane: Component::Y,
            expected: (1920, 1080),
            actual: (1280, 720),
        };
        let msg = err.to_string();
        assert!(msg.contains("Y plane"));
        assert!(msg.contains("1920x1080"));
        assert!(msg.contains("1280x720"));
        assert!(err.is_mismatch());
    }

    #[test]
    fn test_format_mismatch_message() {
        let err = OpsError::FormatMismatch {
            expected: SampleFormat::Fixed { bit_depth: 10 },
            actual: SampleFormat::Fixed { bit_depth: 8 },
        };
        assert!(err.to_string().contains("10-bit"));
        assert!(err.to_string().contains("8-bit"));
        assert!(!OpsError::InvalidFilter("x".into()).is_mismatch());
    }
}
