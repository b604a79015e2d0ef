//! Overshoot (ringing) suppression for the float filtering path.
//!
//! Sharp decimation kernels overshoot next to high-contrast edges. Each
//! policy compares the primary filter result with the local range of the
//! source samples under a tap window and corrects results that leave it.
//!
//! | Policy | Range window (default) | Correction |
//! |--------|------------------------|------------|
//! | [`None`](OvershootPolicy::None) | - | none |
//! | [`RecomputeIfOutside`](OvershootPolicy::RecomputeIfOutside) | primary | recompute with fallback taps |
//! | [`BlendIfOutside`](OvershootPolicy::BlendIfOutside) | fallback | substitute fallback result |
//! | [`ClampToLocalRange`](OvershootPolicy::ClampToLocalRange) | fallback | saturate into range |
//!
//! The policy is resolved once into a [`Suppressor`] when the subsampler is
//! built; the hot loop only calls [`Suppressor::evaluate`].

use std::sync::Arc;

use crate::filter::FilterTable;
use crate::sample::convolve;
use crate::{OpsError, OpsResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How out-of-range filter results are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OvershootPolicy {
    /// Keep the primary result.
    #[default]
    None,
    /// Recompute from the fallback table when the primary result leaves the
    /// local range.
    RecomputeIfOutside,
    /// Evaluate the fallback table alongside and substitute its result when
    /// the primary result leaves the local range.
    BlendIfOutside,
    /// Saturate the primary result into the local range.
    ClampToLocalRange,
}

impl OvershootPolicy {
    /// Whether the policy needs a fallback table.
    #[inline]
    pub fn uses_fallback(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Range window the policy uses unless overridden.
    #[inline]
    pub fn default_window(&self) -> RangeWindow {
        match self {
            Self::RecomputeIfOutside => RangeWindow::Primary,
            _ => RangeWindow::Fallback,
        }
    }
}

/// Whose tap window defines the local min/max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RangeWindow {
    /// Samples under the primary table's taps.
    Primary,
    /// Samples under the fallback table's taps.
    Fallback,
}

/// Sum and extrema of the samples under a tap window.
#[derive(Debug, Clone, Copy)]
struct WindowStats {
    sum: f64,
    min: f64,
    max: f64,
}

#[inline]
fn scan(row: &[f32], table: &FilterTable, pos: usize, last: usize) -> WindowStats {
    let mut stats = WindowStats {
        sum: 0.0,
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };
    for (k, &tap) in table.float_taps().iter().enumerate() {
        let s = row[table.source_index(pos, k, last)] as f64;
        stats.sum = stats.sum + tap * s;
        if s < stats.min {
            stats.min = s;
        }
        if s > stats.max {
            stats.max = s;
        }
    }
    stats
}

/// Scaled primary result and the stats of the range window.
///
/// The primary taps are walked once. With a fallback window the returned
/// `sum` is the fallback tap sum.
#[inline]
fn primary_in_window(
    primary: &FilterTable,
    fallback: &FilterTable,
    window: RangeWindow,
    row: &[f32],
    pos: usize,
    last: usize,
) -> (f64, WindowStats) {
    match window {
        RangeWindow::Primary => {
            let stats = scan(row, primary, pos, last);
            (primary.scale_float(stats.sum), stats)
        }
        RangeWindow::Fallback => (
            primary.scale_float(convolve(row, primary, pos, last)),
            scan(row, fallback, pos, last),
        ),
    }
}

#[inline]
fn outside(value: f64, min: f64, max: f64) -> bool {
    value > max || value < min
}

/// Overshoot policy bound to its fallback table and range window.
#[derive(Debug, Clone)]
pub enum Suppressor {
    /// No suppression.
    Off,
    /// See [`OvershootPolicy::RecomputeIfOutside`].
    Recompute {
        /// Fallback table
        fallback: Arc<FilterTable>,
        /// Range window
        window: RangeWindow,
    },
    /// See [`OvershootPolicy::BlendIfOutside`].
    Blend {
        /// Fallback table
        fallback: Arc<FilterTable>,
        /// Range window
        window: RangeWindow,
    },
    /// See [`OvershootPolicy::ClampToLocalRange`].
    Clamp {
        /// Fallback table
        fallback: Arc<FilterTable>,
        /// Range window
        window: RangeWindow,
    },
}

impl Suppressor {
    /// Binds `policy` to its fallback table.
    ///
    /// `window` overrides the policy's default range window. The fallback
    /// table is dropped for [`OvershootPolicy::None`].
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] if a suppressing policy has no
    /// fallback table.
    pub fn new(
        policy: OvershootPolicy,
        fallback: Option<Arc<FilterTable>>,
        window: Option<RangeWindow>,
    ) -> OpsResult<Self> {
        if !policy.uses_fallback() {
            return Ok(Self::Off);
        }
        let fallback = fallback.ok_or_else(|| {
            OpsError::InvalidParameter(format!("{policy:?} requires a fallback filter table"))
        })?;
        let window = window.unwrap_or(policy.default_window());

        Ok(match policy {
            OvershootPolicy::RecomputeIfOutside => Self::Recompute { fallback, window },
            OvershootPolicy::BlendIfOutside => Self::Blend { fallback, window },
            OvershootPolicy::ClampToLocalRange => Self::Clamp { fallback, window },
            OvershootPolicy::None => Self::Off,
        })
    }

    /// Policy this suppressor implements.
    pub fn policy(&self) -> OvershootPolicy {
        match self {
            Self::Off => OvershootPolicy::None,
            Self::Recompute { .. } => OvershootPolicy::RecomputeIfOutside,
            Self::Blend { .. } => OvershootPolicy::BlendIfOutside,
            Self::Clamp { .. } => OvershootPolicy::ClampToLocalRange,
        }
    }

    /// Fallback table, if any.
    pub fn fallback(&self) -> Option<&Arc<FilterTable>> {
        match self {
            Self::Off => None,
            Self::Recompute { fallback, .. }
            | Self::Blend { fallback, .. }
            | Self::Clamp { fallback, .. } => Some(fallback),
        }
    }

    /// Range window, if any.
    pub fn window(&self) -> Option<RangeWindow> {
        match self {
            Self::Off => None,
            Self::Recompute { window, .. }
            | Self::Blend { window, .. }
            | Self::Clamp { window, .. } => Some(*window),
        }
    }

    /// Scaled primary result at anchor `pos`, corrected by the policy.
    ///
    /// `row` is the source row, `last` its final column. The fallback
    /// window uses the same border replication as the primary one.
    /// Recompute and blend differ only in their default window: both
    /// substitute the scaled fallback result when the primary result
    /// leaves the local range.
    #[inline]
    pub fn evaluate(&self, primary: &FilterTable, row: &[f32], pos: usize, last: usize) -> f64 {
        match self {
            Self::Off => primary.scale_float(convolve(row, primary, pos, last)),
            Self::Recompute { fallback, window } | Self::Blend { fallback, window } => {
                let (value, range) = primary_in_window(primary, fallback, *window, row, pos, last);
                if !outside(value, range.min, range.max) {
                    return value;
                }
                let sum = match window {
                    RangeWindow::Fallback => range.sum,
                    RangeWindow::Primary => convolve(row, fallback, pos, last),
                };
                fallback.scale_float(sum)
            }
            Self::Clamp { fallback, window } => {
                let (value, range) = primary_in_window(primary, fallback, *window, row, pos, last);
                if value > range.max {
                    range.max
                } else if value < range.min {
                    range.min
                } else {
                    value
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primary() -> FilterTable {
        // reads pos - 1 and pos + 1
        FilterTable::builder(vec![0.5, 0.0, 0.5]).center(1).build().unwrap()
    }

    fn fallback() -> Arc<FilterTable> {
        Arc::new(FilterTable::builder(vec![1.0]).build().unwrap())
    }

    #[test]
    fn test_policy_defaults() {
        assert_eq!(OvershootPolicy::RecomputeIfOutside.default_window(), RangeWindow::Primary);
        assert_eq!(OvershootPolicy::BlendIfOutside.default_window(), RangeWindow::Fallback);
        assert_eq!(OvershootPolicy::ClampToLocalRange.default_window(), RangeWindow::Fallback);
        assert!(!OvershootPolicy::None.uses_fallback());
    }

    #[test]
    fn test_missing_fallback_rejected() {
        let err = Suppressor::new(OvershootPolicy::BlendIfOutside, None, None).unwrap_err();
        assert!(matches!(err, OpsError::InvalidParameter(_)));
        let off = Suppressor::new(OvershootPolicy::None, Some(fallback()), None).unwrap();
        assert!(off.fallback().is_none());
    }

    #[test]
    fn test_recompute_window_choice() {
        let row = [7.0f32, 10.0, 0.0, 20.0];
        let p = primary();
        // primary result at pos 2 is 15, inside [0, 20] of its own window
        let s = Suppressor::new(OvershootPolicy::RecomputeIfOutside, Some(fallback()), None).unwrap();
        assert_eq!(s.evaluate(&p, &row, 2, 3), 15.0);
        // fallback window is just the anchor sample (0)
        let s = Suppressor::new(
            OvershootPolicy::RecomputeIfOutside,
            Some(fallback()),
            Some(RangeWindow::Fallback),
        )
        .unwrap();
        assert_eq!(s.evaluate(&p, &row, 2, 3), 0.0);
    }

    #[test]
    fn test_blend_substitutes_fallback() {
        let row = [7.0f32, 10.0, 0.0, 20.0];
        let s = Suppressor::new(OvershootPolicy::BlendIfOutside, Some(fallback()), None).unwrap();
        assert_eq!(s.evaluate(&primary(), &row, 2, 3), 0.0);
        // flat neighborhood: primary result equals the anchor
        let flat = [4.0f32, 4.0, 4.0, 4.0];
        assert_eq!(s.evaluate(&primary(), &flat, 2, 3), 4.0);
        let s = Suppressor::new(
            OvershootPolicy::BlendIfOutside,
            Some(fallback()),
            Some(RangeWindow::Primary),
        )
        .unwrap();
        assert_eq!(s.evaluate(&primary(), &row, 2, 3), 15.0);
    }

    #[test]
    fn test_clamp_saturates() {
        let row = [0.0f32, 1.0, 2.0, 3.0];
        let wide = Arc::new(FilterTable::builder(vec![0.5, 0.0, 0.5]).center(1).build().unwrap());
        let s = Suppressor::new(OvershootPolicy::ClampToLocalRange, Some(wide), None).unwrap();
        // tap sum at pos 1 is 1.0, local range [0, 2]
        let gain = |scale: f64, offset: f64| {
            FilterTable::builder(vec![0.5, 0.0, 0.5])
                .center(1)
                .offset(offset)
                .scale(scale)
                .build()
                .unwrap()
        };
        assert_eq!(s.evaluate(&gain(5.0, 0.0), &row, 1, 3), 2.0);
        assert_eq!(s.evaluate(&gain(1.0, -2.0), &row, 1, 3), 0.0);
        assert_eq!(s.evaluate(&gain(1.5, 0.0), &row, 1, 3), 1.5);
    }

    #[test]
    fn test_off_matches_plain_convolution() {
        let row = [0.1f32, 0.7, 0.3, 0.9];
        let p = primary();
        let s = Suppressor::new(OvershootPolicy::None, None, None).unwrap();
        assert_eq!(s.evaluate(&p, &row, 2, 3), p.scale_float(convolve(&row, &p, 2, 3)));
    }
}
