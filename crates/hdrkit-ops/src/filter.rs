//! FIR filter tables for horizontal chroma decimation.
//!
//! A [`FilterTable`] holds one kernel in two numeric forms:
//!
//! ```text
//! float:   (sum(float_taps[k] * s[k]) + float_offset) * float_scale
//! integer: (sum(int_taps[k]   * s[k]) + int_offset)  >> int_shift
//! ```
//!
//! where `s[k]` is the source sample at `pos + k - center_offset`, clamped
//! into the row (border replication).
//!
//! Tables are built either from explicit coefficients with
//! [`FilterTable::builder`], or generated for 2:1 decimation from a
//! [`ResampleFilter`] kernel with [`FilterTable::downsample_2x`].
//!
//! # Example
//!
//! ```rust
//! use hdrkit_core::Phase;
//! use hdrkit_ops::filter::{FilterTable, ResampleFilter};
//!
//! let t = FilterTable::downsample_2x(ResampleFilter::Bilinear, Phase::CoSited).unwrap();
//! assert_eq!(t.float_taps(), &[0.25, 0.5, 0.25]);
//! assert_eq!(t.int_taps(), &[16, 32, 16]);
//! assert_eq!(t.center_offset(), 1);
//! ```

use hdrkit_core::Phase;
use tracing::debug;

use crate::{OpsError, OpsResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Precision of integer taps derived from float taps.
pub const DEFAULT_INT_SHIFT: u32 = 6;

/// Largest accepted integer shift.
const MAX_INT_SHIFT: u32 = 30;

/// Largest sample value an integer table is applied to (16-bit storage).
const MAX_INT_SAMPLE: i64 = u16::MAX as i64;

/// Weights below this magnitude are treated as zero by the generator.
const WEIGHT_EPS: f64 = 1e-12;

/// Resampling kernel used to generate decimation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ResampleFilter {
    /// Box kernel.
    Nearest,
    /// Triangle kernel.
    Bilinear,
    /// Mitchell-Netravali cubic (B = C = 1/3).
    Bicubic,
    /// Lanczos-3 (sharpest, rings on edges).
    #[default]
    Lanczos3,
}

impl ResampleFilter {
    /// Support radius of the kernel, in output samples.
    #[inline]
    pub fn support(&self) -> f64 {
        match self {
            Self::Nearest => 0.5,
            Self::Bilinear => 1.0,
            Self::Bicubic => 2.0,
            Self::Lanczos3 => 3.0,
        }
    }

    /// Evaluates the kernel at `x`.
    #[inline]
    pub fn weight(&self, x: f64) -> f64 {
        match self {
            Self::Nearest => nearest_weight(x),
            Self::Bilinear => bilinear_weight(x),
            Self::Bicubic => bicubic_weight(x),
            Self::Lanczos3 => lanczos_weight(x, 3.0),
        }
    }
}

#[inline]
fn nearest_weight(x: f64) -> f64 {
    if x.abs() < 0.5 { 1.0 } else { 0.0 }
}

#[inline]
fn bilinear_weight(x: f64) -> f64 {
    let ax = x.abs();
    if ax < 1.0 { 1.0 - ax } else { 0.0 }
}

#[inline]
fn bicubic_weight(x: f64) -> f64 {
    const B: f64 = 1.0 / 3.0;
    const C: f64 = 1.0 / 3.0;

    let ax = x.abs();
    if ax < 1.0 {
        ((12.0 - 9.0 * B - 6.0 * C) * ax * ax * ax
            + (-18.0 + 12.0 * B + 6.0 * C) * ax * ax
            + (6.0 - 2.0 * B))
            / 6.0
    } else if ax < 2.0 {
        ((-B - 6.0 * C) * ax * ax * ax
            + (6.0 * B + 30.0 * C) * ax * ax
            + (-12.0 * B - 48.0 * C) * ax
            + (8.0 * B + 24.0 * C))
            / 6.0
    } else {
        0.0
    }
}

#[inline]
fn lanczos_weight(x: f64, a: f64) -> f64 {
    let ax = x.abs();
    if ax < 1e-8 {
        1.0
    } else if ax < a {
        let pi_x = std::f64::consts::PI * ax;
        let pi_x_a = pi_x / a;
        (pi_x.sin() / pi_x) * (pi_x_a.sin() / pi_x_a)
    } else {
        0.0
    }
}

/// Immutable FIR tap table.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterTable {
    center: usize,
    float_taps: Vec<f64>,
    float_offset: f64,
    float_scale: f64,
    int_taps: Vec<i32>,
    int_offset: i32,
    int_shift: u32,
    clip: bool,
}

impl FilterTable {
    /// Starts a table from its float taps.
    ///
    /// Defaults: center 0, offset 0, scale 1, no clipping, integer taps
    /// derived at [`DEFAULT_INT_SHIFT`] bits.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hdrkit_ops::filter::FilterTable;
    ///
    /// let t = FilterTable::builder(vec![0.0, 1.0, 1.0, 0.0])
    ///     .center(1)
    ///     .scale(0.5)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(t.int_taps(), &[0, 32, 32, 0]);
    /// assert_eq!(t.int_offset(), 32);
    /// ```
    pub fn builder(float_taps: impl Into<Vec<f64>>) -> FilterTableBuilder {
        FilterTableBuilder {
            float_taps: float_taps.into(),
            center: 0,
            offset: 0.0,
            scale: 1.0,
            shift: DEFAULT_INT_SHIFT,
            int: None,
            clip: false,
        }
    }

    /// Generates a 2:1 horizontal decimation table.
    ///
    /// Output sample `i` is anchored at source column `2i`; the kernel is
    /// centered `phase.offset()` columns to its right and stretched by the
    /// decimation factor. Zero-weight edge taps are dropped and the float
    /// taps are normalized to unit gain. Tables with negative taps clip.
    pub fn downsample_2x(method: ResampleFilter, phase: Phase) -> OpsResult<Self> {
        let support = method.support() * 2.0;
        let reach = support.ceil() as i64 + 1;
        let c = phase.offset();

        let weights: Vec<(i64, f64)> = (-reach..=reach)
            .map(|j| {
                let w = method.weight((j as f64 - c) / 2.0);
                (j, if w.abs() < WEIGHT_EPS { 0.0 } else { w })
            })
            .collect();

        let first = weights.iter().position(|&(_, w)| w != 0.0);
        let last = weights.iter().rposition(|&(_, w)| w != 0.0);
        let (first, last) = match (first, last) {
            (Some(f), Some(l)) => (f, l),
            _ => {
                return Err(OpsError::InvalidFilter(format!(
                    "{method:?} kernel has no support at phase {}",
                    phase.index()
                )));
            }
        };
        let window = &weights[first..=last];

        let origin = window[0].0;
        if origin > 0 {
            return Err(OpsError::InvalidFilter(format!(
                "{method:?} kernel does not cover its anchor sample"
            )));
        }

        let sum: f64 = window.iter().map(|&(_, w)| w).sum();
        let taps: Vec<f64> = window.iter().map(|&(_, w)| w / sum).collect();
        let clip = taps.iter().any(|&t| t < 0.0);

        debug!(
            ?method,
            phase = phase.index(),
            taps = taps.len(),
            center = -origin,
            clip,
            "generated decimation table"
        );

        FilterTable::builder(taps).center((-origin) as usize).clip(clip).build()
    }

    /// Number of taps.
    #[inline]
    pub fn tap_count(&self) -> usize {
        self.float_taps.len()
    }

    /// Index of the tap aligned with the output's anchor column.
    #[inline]
    pub fn center_offset(&self) -> usize {
        self.center
    }

    /// Float coefficients.
    #[inline]
    pub fn float_taps(&self) -> &[f64] {
        &self.float_taps
    }

    /// Offset added to the float sum before scaling.
    #[inline]
    pub fn float_offset(&self) -> f64 {
        self.float_offset
    }

    /// Float scale factor.
    #[inline]
    pub fn float_scale(&self) -> f64 {
        self.float_scale
    }

    /// Integer coefficients.
    #[inline]
    pub fn int_taps(&self) -> &[i32] {
        &self.int_taps
    }

    /// Offset added to the integer sum before shifting.
    #[inline]
    pub fn int_offset(&self) -> i32 {
        self.int_offset
    }

    /// Arithmetic right shift applied to the integer sum.
    #[inline]
    pub fn int_shift(&self) -> u32 {
        self.int_shift
    }

    /// Whether results are clamped to the caller's value range.
    #[inline]
    pub fn clip(&self) -> bool {
        self.clip
    }

    /// Source column read by tap `k` for anchor `pos`, clamped to `[0, last]`.
    #[inline]
    pub fn source_index(&self, pos: usize, k: usize, last: usize) -> usize {
        (pos + k).saturating_sub(self.center).min(last)
    }

    /// Applies offset and scale to a float tap sum.
    #[inline]
    pub fn scale_float(&self, sum: f64) -> f64 {
        (sum + self.float_offset) * self.float_scale
    }

    /// Applies offset and shift to an integer tap sum.
    #[inline]
    pub fn scale_int(&self, sum: i64) -> i64 {
        (sum + i64::from(self.int_offset)) >> self.int_shift
    }
}

/// Builder for [`FilterTable`].
#[derive(Debug, Clone)]
pub struct FilterTableBuilder {
    float_taps: Vec<f64>,
    center: usize,
    offset: f64,
    scale: f64,
    shift: u32,
    int: Option<(Vec<i32>, i32, u32)>,
    clip: bool,
}

impl FilterTableBuilder {
    /// Tap aligned with the output's anchor column.
    pub fn center(mut self, center: usize) -> Self {
        self.center = center;
        self
    }

    /// Float offset.
    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Float scale.
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Precision used when integer taps are derived.
    pub fn int_precision(mut self, shift: u32) -> Self {
        self.shift = shift;
        self
    }

    /// Explicit integer taps, offset and shift.
    pub fn int_taps(mut self, taps: impl Into<Vec<i32>>, offset: i32, shift: u32) -> Self {
        self.int = Some((taps.into(), offset, shift));
        self
    }

    /// Clamp results to the caller's value range.
    pub fn clip(mut self, clip: bool) -> Self {
        self.clip = clip;
        self
    }

    /// Validates and builds the table.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidFilter`] for an empty tap list, a center outside
    /// the taps, non-finite coefficients, mismatched integer tap count, a
    /// shift above 30, derived integer coefficients outside `i32`, or
    /// integer taps whose sum over 16-bit samples overflows `i64`.
    pub fn build(self) -> OpsResult<FilterTable> {
        let n = self.float_taps.len();
        if n == 0 {
            return Err(OpsError::InvalidFilter("filter has no taps".into()));
        }
        if self.center >= n {
            return Err(OpsError::InvalidFilter(format!(
                "center offset {} outside {} taps",
                self.center, n
            )));
        }
        if !self.float_taps.iter().all(|t| t.is_finite())
            || !self.offset.is_finite()
            || !self.scale.is_finite()
        {
            return Err(OpsError::InvalidFilter("non-finite float coefficient".into()));
        }

        let (int_taps, int_offset, int_shift) = match self.int {
            Some((taps, offset, shift)) => {
                if taps.len() != n {
                    return Err(OpsError::InvalidFilter(format!(
                        "{} integer taps for {} float taps",
                        taps.len(),
                        n
                    )));
                }
                (taps, offset, shift)
            }
            None => {
                if self.shift > MAX_INT_SHIFT {
                    return Err(OpsError::InvalidFilter(format!("shift {} > {MAX_INT_SHIFT}", self.shift)));
                }
                let (taps, offset) = quantize(&self.float_taps, self.offset, self.scale, self.shift)?;
                (taps, offset, self.shift)
            }
        };
        if int_shift > MAX_INT_SHIFT {
            return Err(OpsError::InvalidFilter(format!("shift {int_shift} > {MAX_INT_SHIFT}")));
        }
        let peak = int_taps.iter().try_fold(i64::from(int_offset).abs(), |acc, &t| {
            i64::from(t)
                .abs()
                .checked_mul(MAX_INT_SAMPLE)
                .and_then(|m| acc.checked_add(m))
        });
        if peak.is_none() {
            return Err(OpsError::InvalidFilter(
                "integer taps overflow the accumulator on 16-bit samples".into(),
            ));
        }

        Ok(FilterTable {
            center: self.center,
            float_taps: self.float_taps,
            float_offset: self.offset,
            float_scale: self.scale,
            int_taps,
            int_offset,
            int_shift,
            clip: self.clip,
        })
    }
}

/// Derives integer taps and offset from float coefficients.
///
/// The largest-magnitude tap absorbs the rounding residual so the integer
/// gain matches the float gain. The offset includes round-half-up.
fn quantize(taps: &[f64], offset: f64, scale: f64, shift: u32) -> OpsResult<(Vec<i32>, i32)> {
    let unit = (1u64 << shift) as f64;
    let out_of_range = |what: &str| {
        OpsError::InvalidFilter(format!("{what} does not fit 32 bits at shift {shift}"))
    };
    let to_int = |v: f64| -> Option<i64> {
        let r = v.round();
        (r >= i32::MIN as f64 && r <= i32::MAX as f64).then_some(r as i64)
    };

    let mut q = taps
        .iter()
        .map(|t| to_int(t * scale * unit).map(|v| v as i32))
        .collect::<Option<Vec<i32>>>()
        .ok_or_else(|| out_of_range("integer tap"))?;

    let target = to_int(taps.iter().sum::<f64>() * scale * unit)
        .ok_or_else(|| out_of_range("filter gain"))?;
    let residual = target - q.iter().map(|&t| i64::from(t)).sum::<i64>();
    if residual != 0 {
        let largest = taps
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
            .map(|(k, _)| k);
        if let Some(k) = largest {
            q[k] = i32::try_from(i64::from(q[k]) + residual).map_err(|_| out_of_range("integer tap"))?;
        }
    }

    let rounding: i64 = if shift > 0 { 1 << (shift - 1) } else { 0 };
    let int_offset = to_int(offset * scale * unit)
        .and_then(|o| i32::try_from(o + rounding).ok())
        .ok_or_else(|| out_of_range("integer offset"))?;
    Ok((q, int_offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_nearest_tables() {
        let t = FilterTable::downsample_2x(ResampleFilter::Nearest, Phase::CoSited).unwrap();
        assert_eq!(t.float_taps(), &[1.0]);
        assert_eq!(t.center_offset(), 0);

        let t = FilterTable::downsample_2x(ResampleFilter::Nearest, Phase::Interstitial).unwrap();
        assert_eq!(t.float_taps(), &[0.5, 0.5]);
        assert_eq!(t.center_offset(), 0);
        assert_eq!(t.int_taps(), &[32, 32]);
    }

    #[test]
    fn test_bilinear_interstitial() {
        let t = FilterTable::downsample_2x(ResampleFilter::Bilinear, Phase::Interstitial).unwrap();
        let expected = [0.125, 0.375, 0.375, 0.125];
        for (a, b) in t.float_taps().iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
        assert_eq!(t.center_offset(), 1);
        assert_eq!(t.int_taps(), &[8, 24, 24, 8]);
        assert!(!t.clip());
    }

    #[test]
    fn test_generated_tables_have_unit_gain() {
        for method in [
            ResampleFilter::Nearest,
            ResampleFilter::Bilinear,
            ResampleFilter::Bicubic,
            ResampleFilter::Lanczos3,
        ] {
            for phase in [Phase::CoSited, Phase::Interstitial] {
                let t = FilterTable::downsample_2x(method, phase).unwrap();
                let sum: f64 = t.float_taps().iter().sum();
                assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-12);
                assert_eq!(t.int_taps().iter().sum::<i32>(), 1 << DEFAULT_INT_SHIFT);
                assert!(t.center_offset() < t.tap_count());
            }
        }
    }

    #[test]
    fn test_sharp_kernels_clip() {
        let t = FilterTable::downsample_2x(ResampleFilter::Lanczos3, Phase::CoSited).unwrap();
        assert!(t.clip());
        let t = FilterTable::downsample_2x(ResampleFilter::Bicubic, Phase::CoSited).unwrap();
        assert!(t.clip());
    }

    #[test]
    fn test_builder_validation() {
        assert!(FilterTable::builder(Vec::<f64>::new()).build().is_err());
        assert!(FilterTable::builder(vec![1.0]).center(1).build().is_err());
        assert!(FilterTable::builder(vec![f64::NAN]).build().is_err());
        assert!(FilterTable::builder(vec![0.5, 0.5]).int_taps(vec![1], 0, 1).build().is_err());
        assert!(FilterTable::builder(vec![0.5, 0.5]).int_taps(vec![1, 1], 0, 31).build().is_err());
        assert!(FilterTable::builder(vec![0.5, 0.5]).int_precision(31).build().is_err());
    }

    #[test]
    fn test_explicit_int_taps_kept() {
        let t = FilterTable::builder(vec![0.25, 0.5, 0.25])
            .center(1)
            .int_taps(vec![1, 2, 1], 2, 2)
            .build()
            .unwrap();
        assert_eq!(t.int_taps(), &[1, 2, 1]);
        assert_eq!(t.scale_int(4 * 100), 100);
    }

    #[test]
    fn test_quantize_residual() {
        // thirds do not quantize exactly; gain must still be 64
        let (q, off) = quantize(&[1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0], 0.0, 1.0, 6).unwrap();
        assert_eq!(q.iter().sum::<i32>(), 64);
        assert_eq!(off, 32);
    }

    #[test]
    fn test_source_index_replicates_borders() {
        let t = FilterTable::builder(vec![0.25; 4]).center(2).build().unwrap();
        let idx: Vec<usize> = (0..4).map(|k| t.source_index(0, k, 5)).collect();
        assert_eq!(idx, vec![0, 0, 0, 1]);
        let idx: Vec<usize> = (0..4).map(|k| t.source_index(4, k, 5)).collect();
        assert_eq!(idx, vec![2, 3, 4, 5]);
        let idx: Vec<usize> = (0..4).map(|k| t.source_index(5, k, 5)).collect();
        assert_eq!(idx, vec![3, 4, 5, 5]);
    }

    #[test]
    fn test_oversized_coefficients_rejected() {
        let err = FilterTable::builder(vec![0.5, 0.5]).scale(1.0e9).build().unwrap_err();
        assert!(matches!(err, OpsError::InvalidFilter(_)));
        let err = FilterTable::builder(vec![1.0])
            .offset(1.0e9)
            .int_precision(30)
            .build()
            .unwrap_err();
        assert!(matches!(err, OpsError::InvalidFilter(_)));
    }

    #[test]
    fn test_high_precision_taps_accepted() {
        let t = FilterTable::builder(vec![0.25, 0.5, 0.25])
            .center(1)
            .int_precision(16)
            .build()
            .unwrap();
        assert_eq!(t.int_taps(), &[16384, 32768, 16384]);
        assert_eq!(t.int_offset(), 32768);
        // full-scale 16-bit sum exceeds i32
        assert_eq!(t.scale_int(65536 * 65535), 65535);
    }

    #[test]
    fn test_scale_int_is_arithmetic() {
        let t = FilterTable::builder(vec![1.0]).int_taps(vec![64], 32, 6).build().unwrap();
        assert_eq!(t.scale_int(-64 * 3), -3);
    }
}
