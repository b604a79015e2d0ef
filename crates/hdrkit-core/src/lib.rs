//! # hdrkit-core
//!
//! Core frame types for HDR/SDR video processing.
//!
//! This crate provides the foundational types used throughout hdrkit:
//!
//! - [`Frame`] - Planar Y'CbCr frame with per-plane buffers and value ranges
//! - [`Plane`], [`PlaneData`], [`PlaneRange`] - A single color plane
//! - [`SampleFormat`] - Float or fixed-point representation (8..=16 bits)
//! - [`ChromaFormat`] - 4:4:4 / 4:2:2 plane geometry
//! - [`ChromaLocation`], [`Phase`] - Chroma siting and the resulting filter phase
//!
//! ## Crate Structure
//!
//! ```text
//! hdrkit-core (this crate)
//!    ^
//!    |
//!    +-- hdrkit-ops (chroma subsampling)
//!    +-- hdrkit-transfer (transfer functions)
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Enable serialization for format and siting enums

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod format;
pub mod frame;

pub use error::*;
pub use format::*;
pub use frame::*;

/// Prelude module for convenient imports.
///
/// ```
/// use hdrkit_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::format::{ChromaFormat, ChromaLocation, Phase, SampleFormat};
    pub use crate::frame::{Component, Frame, Plane, PlaneData, PlaneRange};
}
