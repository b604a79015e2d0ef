//! # hdrkit-transfer
//!
//! Transfer functions for moving pixel values between linear light and
//! broadcast-encoded signals.
//!
//! # Terminology
//!
//! - **OETF** (Opto-Electronic Transfer Function): Linear -> Encoded
//! - **EOTF** (Electro-Optical Transfer Function): Encoded -> Linear
//!
//! Every variant implements [`TransferFunction`]:
//!
//! - [`TransferFunction::inverse`] encodes linear light into a signal (the
//!   standard's OETF)
//! - [`TransferFunction::forward`] maps a signal back to linear light
//!
//! # Supported Transfer Functions
//!
//! | Variant | Standard | Range |
//! |---------|----------|-------|
//! | [`ToePowerLaw::st240`] | SMPTE ST 240M | [0, 1] |
//! | [`ToePowerLaw::bt709`] | ITU-R BT.709 | [0, 1] |
//! | [`ToePowerLaw::bt2020`] | ITU-R BT.2020 (12-bit constants) | [0, 1] |
//! | [`ToePowerLaw::srgb`] | IEC 61966-2-1 | [0, 1] |
//! | [`Pq`] | SMPTE ST 2084 | [0, 1] (1.0 = 10000 cd/m2) |
//! | [`Hlg`] | ITU-R BT.2100 | [0, 1] scene-referred |
//!
//! # Usage
//!
//! ```rust
//! use hdrkit_transfer::{ToePowerLaw, TransferFunction};
//!
//! let tf = ToePowerLaw::st240();
//! let signal = tf.inverse(0.18);
//! let linear = tf.forward(signal);
//! assert!((linear - 0.18).abs() < 1e-9);
//! ```
//!
//! Variants are immutable and `Send + Sync`; one instance can be shared by
//! any number of threads.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod hlg;
pub mod piecewise;
pub mod pq;

pub use hlg::Hlg;
pub use piecewise::ToePowerLaw;
pub use pq::Pq;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A pair of mutually inverse per-sample mappings.
///
/// Inputs are typically in `[0, 1]`; implementations stay defined outside
/// that interval (see each variant for its behavior).
pub trait TransferFunction: Send + Sync {
    /// Maps an encoded signal to linear light.
    fn forward(&self, value: f64) -> f64;

    /// Maps linear light to an encoded signal.
    fn inverse(&self, value: f64) -> f64;

    /// Applies [`forward`](Self::forward) to every sample.
    fn forward_in_place(&self, values: &mut [f32]) {
        for v in values.iter_mut() {
            *v = self.forward(*v as f64) as f32;
        }
    }

    /// Applies [`inverse`](Self::inverse) to every sample.
    fn inverse_in_place(&self, values: &mut [f32]) {
        for v in values.iter_mut() {
            *v = self.inverse(*v as f64) as f32;
        }
    }
}

/// Named transfer function, for configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TransferKind {
    /// SMPTE ST 240M.
    #[default]
    St240,
    /// ITU-R BT.709.
    Bt709,
    /// ITU-R BT.2020.
    Bt2020,
    /// sRGB.
    Srgb,
    /// SMPTE ST 2084 (PQ).
    Pq,
    /// Hybrid Log-Gamma.
    Hlg,
}

impl TransferKind {
    /// Every kind.
    pub const ALL: [TransferKind; 6] = [
        Self::St240,
        Self::Bt709,
        Self::Bt2020,
        Self::Srgb,
        Self::Pq,
        Self::Hlg,
    ];

    /// Instantiates the transfer function.
    pub fn build(&self) -> Box<dyn TransferFunction> {
        match self {
            Self::St240 => Box::new(ToePowerLaw::st240()),
            Self::Bt709 => Box::new(ToePowerLaw::bt709()),
            Self::Bt2020 => Box::new(ToePowerLaw::bt2020()),
            Self::Srgb => Box::new(ToePowerLaw::srgb()),
            Self::Pq => Box::new(Pq),
            Self::Hlg => Box::new(Hlg),
        }
    }

    /// Short identifier.
    pub fn name(&self) -> &'static str {
        match self {
            Self::St240 => "st240",
            Self::Bt709 => "bt709",
            Self::Bt2020 => "bt2020",
            Self::Srgb => "srgb",
            Self::Pq => "pq",
            Self::Hlg => "hlg",
        }
    }
}
