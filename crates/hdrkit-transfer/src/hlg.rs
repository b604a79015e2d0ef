//! Hybrid Log-Gamma (HLG) transfer function.
//!
//! HLG targets HDR broadcast while staying viewable on SDR displays: a
//! square-root segment for shadows and a logarithmic one for highlights.
//!
//! # Range
//!
//! - Encoded: [0, 1]
//! - Linear: [0, 1] (scene-referred, relative)
//!
//! # Reference
//!
//! ITU-R BT.2100-2

use crate::TransferFunction;

const A: f64 = 0.178_832_77;
const B: f64 = 1.0 - 4.0 * A;
const C: f64 = 0.559_910_729_529_562;

/// HLG transfer function. `inverse` is the OETF, `forward` its inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hlg;

impl TransferFunction for Hlg {
    /// Decodes an HLG signal to scene linear light.
    ///
    /// ```text
    /// if E' <= 0.5:
    ///     E = E'^2 / 3
    /// else:
    ///     E = (exp((E' - C) / A) + B) / 12
    /// ```
    #[inline]
    fn forward(&self, value: f64) -> f64 {
        if value <= 0.0 {
            0.0
        } else if value <= 0.5 {
            value * value / 3.0
        } else {
            (((value - C) / A).exp() + B) / 12.0
        }
    }

    /// Encodes scene linear light to an HLG signal.
    ///
    /// ```text
    /// if E <= 1/12:
    ///     E' = sqrt(3 * E)
    /// else:
    ///     E' = A * ln(12*E - B) + C
    /// ```
    #[inline]
    fn inverse(&self, value: f64) -> f64 {
        if value <= 0.0 {
            0.0
        } else if value <= 1.0 / 12.0 {
            (3.0 * value).sqrt()
        } else {
            A * (12.0 * value - B).ln() + C
        }
    }
}
