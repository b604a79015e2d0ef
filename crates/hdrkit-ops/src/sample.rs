//! Numeric paths for plane filtering.
//!
//! [`Sample`] ties a storage type to its accumulator and to the part of a
//! [`FilterTable`] it uses:
//!
//! | Storage | Accumulator | Taps | Finalize |
//! |---------|-------------|------|----------|
//! | `f32` | `f64` | float | `(sum + offset) * scale` |
//! | `u16` | `i64` | integer | `(sum + offset) >> shift` |
//! | `u8` | `i64` | integer | `(sum + offset) >> shift` |
//!
//! The float path accumulates in double precision whatever the storage
//! precision. Integer taps are stored as `i32` and widened on use, so any
//! table accepted by [`FilterTableBuilder::build`](crate::filter::FilterTableBuilder::build)
//! sums 16-bit samples without overflow.
//!
//! Only the float path takes part in overshoot suppression.

use std::ops::{Add, Mul};

use hdrkit_core::PlaneSample;

use crate::filter::FilterTable;
use crate::overshoot::Suppressor;

/// Sample type a plane can be filtered in.
pub trait Sample: PlaneSample {
    /// Accumulator for tap sums.
    type Acc: Copy
        + PartialOrd
        + Add<Output = Self::Acc>
        + Mul<Output = Self::Acc>
        + Send
        + Sync;

    /// Additive identity of the accumulator.
    const ZERO: Self::Acc;

    /// Converts a sample to the accumulator type.
    fn widen(self) -> Self::Acc;

    /// Coefficient `k` of `table` for this path.
    fn tap(table: &FilterTable, k: usize) -> Self::Acc;

    /// Applies the table's offset and scale (or shift) to a tap sum.
    fn finalize(table: &FilterTable, sum: Self::Acc) -> Self::Acc;

    /// Converts a final value back to storage, saturating to the type range.
    fn narrow(value: Self::Acc) -> Self;

    /// Finalized primary result at anchor `pos`, after overshoot
    /// suppression. Integer paths ignore the suppressor.
    #[inline]
    fn evaluate(
        _suppressor: &Suppressor,
        primary: &FilterTable,
        row: &[Self],
        pos: usize,
        last: usize,
    ) -> Self::Acc {
        Self::finalize(primary, convolve(row, primary, pos, last))
    }
}

/// Tap sum of `table` anchored at `pos` in `row`; `last` is the final column.
#[inline]
pub fn convolve<T: Sample>(row: &[T], table: &FilterTable, pos: usize, last: usize) -> T::Acc {
    let mut sum = T::ZERO;
    for k in 0..table.tap_count() {
        sum = sum + T::tap(table, k) * row[table.source_index(pos, k, last)].widen();
    }
    sum
}

/// Clamps `value` into `[lo, hi]`.
#[inline]
pub(crate) fn clamp_acc<A: PartialOrd>(value: A, lo: A, hi: A) -> A {
    if value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}

impl Sample for f32 {
    type Acc = f64;
    const ZERO: f64 = 0.0;

    #[inline]
    fn widen(self) -> f64 {
        self as f64
    }

    #[inline]
    fn tap(table: &FilterTable, k: usize) -> f64 {
        table.float_taps()[k]
    }

    #[inline]
    fn finalize(table: &FilterTable, sum: f64) -> f64 {
        table.scale_float(sum)
    }

    #[inline]
    fn narrow(value: f64) -> f32 {
        value as f32
    }

    #[inline]
    fn evaluate(
        suppressor: &Suppressor,
        primary: &FilterTable,
        row: &[f32],
        pos: usize,
        last: usize,
    ) -> f64 {
        suppressor.evaluate(primary, row, pos, last)
    }
}

impl Sample for u16 {
    type Acc = i64;
    const ZERO: i64 = 0;

    #[inline]
    fn widen(self) -> i64 {
        i64::from(self)
    }

    #[inline]
    fn tap(table: &FilterTable, k: usize) -> i64 {
        i64::from(table.int_taps()[k])
    }

    #[inline]
    fn finalize(table: &FilterTable, sum: i64) -> i64 {
        table.scale_int(sum)
    }

    #[inline]
    fn narrow(value: i64) -> u16 {
        value.clamp(0, i64::from(u16::MAX)) as u16
    }
}

impl Sample for u8 {
    type Acc = i64;
    const ZERO: i64 = 0;

    #[inline]
    fn widen(self) -> i64 {
        i64::from(self)
    }

    #[inline]
    fn tap(table: &FilterTable, k: usize) -> i64 {
        i64::from(table.int_taps()[k])
    }

    #[inline]
    fn finalize(table: &FilterTable, sum: i64) -> i64 {
        table.scale_int(sum)
    }

    #[inline]
    fn narrow(value: i64) -> u8 {
        value.clamp(0, i64::from(u8::MAX)) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> FilterTable {
        FilterTable::builder(vec![0.25, 0.5, 0.25]).center(1).build().unwrap()
    }

    #[test]
    fn test_float_convolve_uses_float_taps() {
        let row = [0.0f32, 4.0, 8.0];
        let sum = convolve(&row, &tri(), 1, 2);
        assert_eq!(f32::finalize(&tri(), sum), 4.0);
    }

    #[test]
    fn test_int_convolve_uses_int_taps() {
        let row = [0u16, 400, 800];
        let sum = convolve(&row, &tri(), 1, 2);
        assert_eq!(sum, 32 * 400 + 16 * 800);
        assert_eq!(u16::finalize(&tri(), sum), 400);
    }

    #[test]
    fn test_narrow_saturates() {
        assert_eq!(u8::narrow(300), 255);
        assert_eq!(u8::narrow(-4), 0);
        assert_eq!(u16::narrow(70_000), u16::MAX);
    }

    #[test]
    fn test_clamp_acc() {
        assert_eq!(clamp_acc(5, 0, 3), 3);
        assert_eq!(clamp_acc(-1.0, 0.0, 3.0), 0.0);
        assert_eq!(clamp_acc(2, 0, 3), 2);
    }
}
