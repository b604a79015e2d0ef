//! Error types for hdrkit-core operations.
//!
//! The [`Error`] enum covers failures while building frames and planes:
//! invalid geometry for a chroma format, unsupported bit depths and
//! buffers of the wrong representation.
//!
//! # Usage
//!
//! ```rust
//! use hdrkit_core::{ChromaFormat, Error, Frame, SampleFormat};
//!
//! // 4:2:2 needs an even luma width
//! let err = Frame::new(7, 4, ChromaFormat::Yuv422, SampleFormat::Float).unwrap_err();
//! assert!(matches!(err, Error::InvalidDimensions { .. }));
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing or mutating frames.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid frame or plane dimensions.
    ///
    /// Returned when width or height is zero, when the geometry does not
    /// fit the chroma format, or when the sample count would overflow.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Sample format is not supported.
    #[error("unsupported sample format: {format}")]
    UnsupportedFormat {
        /// Format description
        format: String,
    },

    /// Chroma location code outside the six defined sitings.
    #[error("invalid chroma location {0} (expected 0..=5)")]
    InvalidChromaLocation(u8),

    /// Plane buffer does not match the plane's representation or size.
    #[error("plane mismatch: expected {expected}, got {got}")]
    PlaneMismatch {
        /// Expected buffer description
        expected: String,
        /// Supplied buffer description
        got: String,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: usize, height: usize, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::UnsupportedFormat`] error.
    #[inline]
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Creates an [`Error::PlaneMismatch`] error.
    #[inline]
    pub fn plane_mismatch(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::PlaneMismatch {
            expected: expected.into(),
            got: got.into(),
        }
    }
}
