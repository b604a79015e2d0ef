//! SMPTE ST 2084 Perceptual Quantizer (PQ) transfer function.
//!
//! PQ encodes luminance up to 10,000 cd/m2 in a perceptually uniform way.
//!
//! # Range
//!
//! - Encoded: [0, 1]
//! - Linear: [0, 1], where 1.0 = [`L_MAX`] cd/m2
//!
//! # Reference
//!
//! SMPTE ST 2084:2014
//!
//! # Usage
//!
//! ```rust
//! use hdrkit_transfer::{Pq, TransferFunction};
//!
//! // 100 nits reference white
//! let signal = Pq.inverse(100.0 / hdrkit_transfer::pq::L_MAX);
//! assert!((signal - 0.508).abs() < 1e-3);
//! ```

use crate::TransferFunction;

/// Maximum luminance in cd/m2 (nits).
pub const L_MAX: f64 = 10000.0;

const M1: f64 = 2610.0 / 16384.0;
const M2: f64 = 2523.0 / 4096.0 * 128.0;
const C1: f64 = 3424.0 / 4096.0;
const C2: f64 = 2413.0 / 4096.0 * 32.0;
const C3: f64 = 2392.0 / 4096.0 * 32.0;

/// PQ transfer function. `forward` is the EOTF, `inverse` its inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pq;

impl TransferFunction for Pq {
    /// Decodes a PQ signal to normalized linear light.
    ///
    /// Non-positive signals decode to 0.
    #[inline]
    fn forward(&self, value: f64) -> f64 {
        if value <= 0.0 {
            return 0.0;
        }

        let vp = value.powf(1.0 / M2);
        let num = (vp - C1).max(0.0);
        let den = C2 - C3 * vp;
        if den <= 0.0 {
            return 1.0;
        }

        (num / den).powf(1.0 / M1)
    }

    /// Encodes normalized linear light to a PQ signal.
    #[inline]
    fn inverse(&self, value: f64) -> f64 {
        if value <= 0.0 {
            return 0.0;
        }

        let yp = value.powf(M1);
        ((C1 + C2 * yp) / (1.0 + C3 * yp)).powf(M2)
    }
}
