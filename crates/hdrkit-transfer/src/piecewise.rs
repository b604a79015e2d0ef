//! Transfer functions with a linear toe and a power-law segment.
//!
//! ST 240M, BT.709, BT.2020 and sRGB share one law and differ only in
//! their constants:
//!
//! ```text
//! inverse(L) = s * L                              if L <= beta
//!            = (1 + alpha) * L^inverse_gamma - alpha  otherwise
//!
//! forward(V) = V / s                              if V <= inv_beta
//!            = max((V + alpha) / (1 + alpha), 0)^gamma   otherwise
//!
//! gamma    = 1 / inverse_gamma
//! inv_beta = inverse(beta)
//! ```
//!
//! `inv_beta` is derived from `beta`, so the breakpoints of the two
//! mappings always refer to the same point on the curve.
//!
//! # Continuity
//!
//! Published constants are rounded. ST 240M leaves a gap of about 6e-5
//! between the two segments of `inverse` at `beta`, BT.709 about 2.5e-4.
//! BT.2020 uses the full-precision constants and is continuous to 1e-11.

use crate::TransferFunction;

/// Linear-toe / power-law transfer function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToePowerLaw {
    inverse_gamma: f64,
    gamma: f64,
    alpha: f64,
    beta: f64,
    inv_beta: f64,
    toe_slope: f64,
}

impl ToePowerLaw {
    /// Builds a variant from its constants.
    ///
    /// # Arguments
    ///
    /// * `inverse_gamma` - Exponent of the encoding power segment
    /// * `alpha` - Power segment offset
    /// * `beta` - Linear-light breakpoint
    /// * `toe_slope` - Slope of the encoding toe segment
    pub fn new(inverse_gamma: f64, alpha: f64, beta: f64, toe_slope: f64) -> Self {
        let mut tf = Self {
            inverse_gamma,
            gamma: 1.0 / inverse_gamma,
            alpha,
            beta,
            inv_beta: 0.0,
            toe_slope,
        };
        tf.inv_beta = tf.inverse(beta);
        tf
    }

    /// SMPTE ST 240M.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hdrkit_transfer::{ToePowerLaw, TransferFunction};
    ///
    /// let tf = ToePowerLaw::st240();
    /// assert!((tf.inv_beta() - 0.0912).abs() < 1e-12);
    /// assert_eq!(tf.forward(0.04), 0.01);
    /// ```
    pub fn st240() -> Self {
        Self::new(0.45, 0.1115, 0.0228, 4.0)
    }

    /// ITU-R BT.709.
    pub fn bt709() -> Self {
        Self::new(0.45, 0.099, 0.018, 4.5)
    }

    /// ITU-R BT.2020, full-precision constants.
    pub fn bt2020() -> Self {
        Self::new(0.45, 0.099_296_826_809_44, 0.018_053_968_510_807, 4.5)
    }

    /// sRGB (IEC 61966-2-1).
    pub fn srgb() -> Self {
        Self::new(1.0 / 2.4, 0.055, 0.003_130_8, 12.92)
    }

    /// Encoding exponent.
    #[inline]
    pub fn inverse_gamma(&self) -> f64 {
        self.inverse_gamma
    }

    /// Decoding exponent (`1 / inverse_gamma`).
    #[inline]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Power segment offset.
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Linear-light breakpoint.
    #[inline]
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Signal breakpoint, `inverse(beta)`.
    #[inline]
    pub fn inv_beta(&self) -> f64 {
        self.inv_beta
    }

    /// Toe slope.
    #[inline]
    pub fn toe_slope(&self) -> f64 {
        self.toe_slope
    }
}

impl TransferFunction for ToePowerLaw {
    #[inline]
    fn forward(&self, value: f64) -> f64 {
        if value <= self.inv_beta {
            value / self.toe_slope
        } else {
            // clamp keeps powf away from negative bases
            ((value + self.alpha) / (1.0 + self.alpha))
                .max(0.0)
                .powf(self.gamma)
        }
    }

    #[inline]
    fn inverse(&self, value: f64) -> f64 {
        if value <= self.beta {
            self.toe_slope * value
        } else {
            (1.0 + self.alpha) * value.powf(self.inverse_gamma) - self.alpha
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_st240_constants() {
        let tf = ToePowerLaw::st240();
        assert_abs_diff_eq!(tf.gamma(), 1.0 / 0.45, epsilon = 1e-15);
        assert_abs_diff_eq!(tf.inv_beta(), 4.0 * 0.0228, epsilon = 1e-15);
    }

    #[test]
    fn test_st240_toe() {
        let tf = ToePowerLaw::st240();
        assert_eq!(tf.forward(0.0), 0.0);
        assert_abs_diff_eq!(tf.forward(0.08), 0.02, epsilon = 1e-15);
        assert_abs_diff_eq!(tf.inverse(0.01), 0.04, epsilon = 1e-15);
    }

    #[test]
    fn test_st240_white() {
        let tf = ToePowerLaw::st240();
        assert_abs_diff_eq!(tf.inverse(1.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(tf.forward(1.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bt709_matches_reference_formula() {
        let tf = ToePowerLaw::bt709();
        for i in 0..=100 {
            let l = i as f64 / 100.0;
            let expected = if l <= 0.018 { 4.5 * l } else { 1.099 * l.powf(0.45) - 0.099 };
            assert_abs_diff_eq!(tf.inverse(l), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_srgb_breakpoint() {
        let tf = ToePowerLaw::srgb();
        assert_abs_diff_eq!(tf.inv_beta(), 0.04045, epsilon = 1e-6);
    }

    #[test]
    fn test_negative_input_stays_in_toe() {
        let tf = ToePowerLaw::st240();
        assert_abs_diff_eq!(tf.forward(-0.2), -0.05, epsilon = 1e-15);
        assert_abs_diff_eq!(tf.inverse(-0.05), -0.2, epsilon = 1e-15);
    }

    #[test]
    fn test_monotonic() {
        for tf in [ToePowerLaw::st240(), ToePowerLaw::bt2020(), ToePowerLaw::srgb()] {
            let mut prev = tf.inverse(0.0);
            for i in 1..=1000 {
                let y = tf.inverse(i as f64 / 1000.0);
                assert!(y > prev);
                prev = y;
            }
        }
    }
}
