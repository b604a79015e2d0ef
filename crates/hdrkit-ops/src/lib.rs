//! # hdrkit-ops
//!
//! Chroma subsampling for Y'CbCr video frames.
//!
//! # Modules
//!
//! - [`filter`] - FIR tap tables and the 2:1 decimation table generator
//! - [`chroma`] - 4:4:4 to 4:2:2 horizontal subsampling
//! - [`overshoot`] - Ringing suppression policies
//! - [`sample`] - Float and fixed-point filtering paths
//!
//! # Example
//!
//! ```rust
//! use hdrkit_core::{ChromaFormat, ChromaLocation, Frame, SampleFormat};
//! use hdrkit_ops::{ChromaSubsampler, OvershootPolicy, SubsamplerConfig};
//!
//! let config = SubsamplerConfig::default()
//!     .with_location(ChromaLocation::Center)
//!     .with_policy(OvershootPolicy::BlendIfOutside);
//! let subsampler = ChromaSubsampler::new(&config).unwrap();
//!
//! let fmt = SampleFormat::fixed(10).unwrap();
//! let inp = Frame::new(32, 8, ChromaFormat::Yuv444, fmt).unwrap();
//! let mut out = Frame::new(32, 8, ChromaFormat::Yuv422, fmt).unwrap();
//! subsampler.process(&mut out, &inp).unwrap();
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` (default) - Filter rows on the rayon thread pool
//! - `serde` - Serialization for configuration types

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod chroma;
pub mod filter;
pub mod overshoot;
pub mod sample;

pub use chroma::{ChromaSubsampler, SubsamplerConfig};
pub use error::{OpsError, OpsResult};
pub use filter::{FilterTable, FilterTableBuilder, ResampleFilter};
pub use overshoot::{OvershootPolicy, RangeWindow, Suppressor};
pub use sample::Sample;
