//! 4:4:4 to 4:2:2 chroma subsampling.
//!
//! [`ChromaSubsampler`] halves the horizontal chroma resolution of a frame
//! with a FIR decimation filter. Output sample `i` of a row is the primary
//! table evaluated at source column `2i`, with border replication, optional
//! overshoot suppression (float path) and optional clipping to the plane's
//! value range. Luma is copied unchanged.
//!
//! # Example
//!
//! ```rust
//! use hdrkit_core::{ChromaFormat, Frame, SampleFormat};
//! use hdrkit_ops::chroma::{ChromaSubsampler, SubsamplerConfig};
//! use hdrkit_ops::OvershootPolicy;
//!
//! let config = SubsamplerConfig::default().with_policy(OvershootPolicy::ClampToLocalRange);
//! let subsampler = ChromaSubsampler::new(&config).unwrap();
//!
//! let inp = Frame::new(64, 16, ChromaFormat::Yuv444, SampleFormat::Float).unwrap();
//! let mut out = Frame::new(64, 16, ChromaFormat::Yuv422, SampleFormat::Float).unwrap();
//! subsampler.process(&mut out, &inp).unwrap();
//! ```

use std::sync::Arc;

use hdrkit_core::{ChromaLocation, Component, Frame, Phase};
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::filter::{FilterTable, ResampleFilter};
use crate::overshoot::{OvershootPolicy, RangeWindow, Suppressor};
use crate::sample::{Sample, clamp_acc};
use crate::{OpsError, OpsResult};

/// Subsampler configuration.
///
/// `chroma_location` holds the frame (or top field) siting followed by the
/// bottom field siting. Only the first entry is used.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SubsamplerConfig {
    /// Kernel for the primary table.
    pub primary: ResampleFilter,
    /// Kernel for the fallback table.
    pub fallback: ResampleFilter,
    /// Chroma siting of the output.
    pub chroma_location: [ChromaLocation; 2],
    /// Overshoot handling.
    pub policy: OvershootPolicy,
    /// Overrides the policy's default range window.
    pub window: Option<RangeWindow>,
}

impl Default for SubsamplerConfig {
    fn default() -> Self {
        Self {
            primary: ResampleFilter::Lanczos3,
            fallback: ResampleFilter::Bilinear,
            chroma_location: [ChromaLocation::Left; 2],
            policy: OvershootPolicy::None,
            window: None,
        }
    }
}

impl SubsamplerConfig {
    /// Sets the primary kernel.
    pub fn with_primary(mut self, filter: ResampleFilter) -> Self {
        self.primary = filter;
        self
    }

    /// Sets the fallback kernel.
    pub fn with_fallback(mut self, filter: ResampleFilter) -> Self {
        self.fallback = filter;
        self
    }

    /// Sets the frame siting (bottom field siting is set to the same value).
    pub fn with_location(mut self, location: ChromaLocation) -> Self {
        self.chroma_location = [location; 2];
        self
    }

    /// Sets the overshoot policy.
    pub fn with_policy(mut self, policy: OvershootPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Overrides the range window.
    pub fn with_window(mut self, window: RangeWindow) -> Self {
        self.window = Some(window);
        self
    }
}

/// Horizontal 2:1 chroma decimator.
///
/// Immutable after construction and shareable across threads.
#[derive(Debug, Clone)]
pub struct ChromaSubsampler {
    phase: Phase,
    primary: Arc<FilterTable>,
    suppressor: Suppressor,
}

impl ChromaSubsampler {
    /// Builds a subsampler with generated tables.
    ///
    /// The fallback table is only generated when the policy uses one.
    pub fn new(config: &SubsamplerConfig) -> OpsResult<Self> {
        let phase = config.chroma_location[0].horizontal_phase();
        let primary = Arc::new(FilterTable::downsample_2x(config.primary, phase)?);
        let fallback = if config.policy.uses_fallback() {
            Some(Arc::new(FilterTable::downsample_2x(config.fallback, phase)?))
        } else {
            None
        };
        let suppressor = Suppressor::new(config.policy, fallback, config.window)?;

        debug!(
            phase = phase.index(),
            primary = ?config.primary,
            policy = ?config.policy,
            window = ?suppressor.window(),
            "chroma subsampler ready"
        );
        if config.chroma_location[1] != config.chroma_location[0] {
            debug!(bottom = ?config.chroma_location[1], "bottom field siting ignored");
        }

        Ok(Self {
            phase,
            primary,
            suppressor,
        })
    }

    /// Builds a subsampler from explicit tables.
    ///
    /// `fallback` is dropped when `policy` is [`OvershootPolicy::None`].
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] if a suppressing policy has no
    /// fallback table.
    pub fn from_tables(
        phase: Phase,
        primary: Arc<FilterTable>,
        fallback: Option<Arc<FilterTable>>,
        policy: OvershootPolicy,
        window: Option<RangeWindow>,
    ) -> OpsResult<Self> {
        Ok(Self {
            phase,
            primary,
            suppressor: Suppressor::new(policy, fallback, window)?,
        })
    }

    /// Horizontal filter phase.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Primary table.
    #[inline]
    pub fn primary(&self) -> &Arc<FilterTable> {
        &self.primary
    }

    /// Fallback table, present only for suppressing policies.
    #[inline]
    pub fn fallback(&self) -> Option<&Arc<FilterTable>> {
        self.suppressor.fallback()
    }

    /// Overshoot policy.
    #[inline]
    pub fn policy(&self) -> OvershootPolicy {
        self.suppressor.policy()
    }

    /// Bound overshoot suppressor.
    #[inline]
    pub fn suppressor(&self) -> &Suppressor {
        &self.suppressor
    }

    /// Filters one source row into `dst`.
    ///
    /// `src` must hold at least `2 * dst.len()` samples; `dst[i]` is
    /// evaluated at `src[2 * i]`.
    pub fn filter_row<T: Sample>(&self, dst: &mut [T], src: &[T], min: T::Acc, max: T::Acc) {
        let Some(last) = src.len().checked_sub(1) else {
            return;
        };
        let table = self.primary.as_ref();
        for (i, out) in dst.iter_mut().enumerate() {
            let pos = 2 * i;
            let mut v = T::evaluate(&self.suppressor, table, src, pos, last);
            if table.clip() {
                v = clamp_acc(v, min, max);
            }
            *out = T::narrow(v);
        }
    }

    /// Decimates a plane of `2 * out_width` by `out_height` samples.
    ///
    /// `min` and `max` are the clip range used when the primary table
    /// clips. Zero width or height is a no-op.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidDimensions`] if either buffer is too short.
    pub fn convert_plane<T: Sample>(
        &self,
        out: &mut [T],
        inp: &[T],
        out_width: usize,
        out_height: usize,
        min: T,
        max: T,
    ) -> OpsResult<()> {
        if out_width == 0 || out_height == 0 {
            return Ok(());
        }
        let in_width = out_width
            .checked_mul(2)
            .ok_or_else(|| OpsError::InvalidDimensions("plane width overflows".into()))?;
        let out_len = out_width
            .checked_mul(out_height)
            .ok_or_else(|| OpsError::InvalidDimensions("plane size overflows".into()))?;
        let in_len = in_width
            .checked_mul(out_height)
            .ok_or_else(|| OpsError::InvalidDimensions("plane size overflows".into()))?;

        if out.len() < out_len {
            return Err(OpsError::InvalidDimensions(format!(
                "output holds {} samples, {}x{} needs {}",
                out.len(),
                out_width,
                out_height,
                out_len
            )));
        }
        if inp.len() < in_len {
            return Err(OpsError::InvalidDimensions(format!(
                "input holds {} samples, {}x{} needs {}",
                inp.len(),
                in_width,
                out_height,
                in_len
            )));
        }

        trace!(out_width, out_height, "converting chroma plane");

        let (lo, hi) = (min.widen(), max.widen());
        let dst = &mut out[..out_len];
        let src = &inp[..in_len];

        #[cfg(feature = "parallel")]
        dst.par_chunks_mut(out_width)
            .zip(src.par_chunks(in_width))
            .for_each(|(d, s)| self.filter_row(d, s, lo, hi));

        #[cfg(not(feature = "parallel"))]
        for (d, s) in dst.chunks_mut(out_width).zip(src.chunks(in_width)) {
            self.filter_row(d, s, lo, hi);
        }

        Ok(())
    }

    /// Converts a 4:4:4 frame into the 4:2:2 frame `out`.
    ///
    /// Luma is copied, each chroma plane is decimated with its own value
    /// range as the clip range, and frame number, availability and plane
    /// ranges are copied from `inp`.
    ///
    /// # Errors
    ///
    /// All checks run before `out` is modified:
    ///
    /// - [`OpsError::FormatMismatch`] if the sample formats differ
    /// - [`OpsError::SizeMismatch`] if the luma sample counts differ, or an
    ///   input chroma plane is not twice as wide as the output plane
    pub fn process(&self, out: &mut Frame, inp: &Frame) -> OpsResult<()> {
        if inp.format() != out.format() {
            return Err(OpsError::FormatMismatch {
                expected: inp.format(),
                actual: out.format(),
            });
        }

        let (iy, oy) = (inp.plane(Component::Y), out.plane(Component::Y));
        if iy.sample_count() != oy.sample_count() {
            return Err(OpsError::SizeMismatch {
                plane: Component::Y,
                expected: (iy.width(), iy.height()),
                actual: (oy.width(), oy.height()),
            });
        }
        for c in Component::CHROMA {
            let (ip, op) = (inp.plane(c), out.plane(c));
            let expected = (op.width().saturating_mul(2), op.height());
            if (ip.width(), ip.height()) != expected {
                return Err(OpsError::SizeMismatch {
                    plane: c,
                    expected,
                    actual: (ip.width(), ip.height()),
                });
            }
        }

        let format = inp.format();
        if format.is_float() {
            self.process_planes::<f32>(out, inp)
        } else if format.stores_u8() {
            self.process_planes::<u8>(out, inp)
        } else {
            self.process_planes::<u16>(out, inp)
        }
    }

    fn process_planes<T: Sample>(&self, out: &mut Frame, inp: &Frame) -> OpsResult<()> {
        for c in [Component::Y, Component::U, Component::V] {
            let (ip, op) = (inp.plane(c), out.plane(c));
            if ip.samples::<T>().is_none() || op.samples::<T>().is_none() {
                return Err(hdrkit_core::Error::plane_mismatch(
                    format!("{c} plane of {}", inp.format()),
                    format!("{} / {}", ip.data().kind(), op.data().kind()),
                )
                .into());
            }
        }

        out.copy_metadata_from(inp);

        if let (Some(src), Some(dst)) = (
            inp.plane(Component::Y).samples::<T>(),
            out.plane_mut(Component::Y).samples_mut::<T>(),
        ) {
            dst.copy_from_slice(src);
        }

        for c in Component::CHROMA {
            let ip = inp.plane(c);
            let range = ip.range;
            let op = out.plane_mut(c);
            let (w, h) = (op.width(), op.height());
            if let (Some(src), Some(dst)) = (ip.samples::<T>(), op.samples_mut::<T>()) {
                self.convert_plane(
                    dst,
                    src,
                    w,
                    h,
                    T::from_range_value(range.min),
                    T::from_range_value(range.max),
                )?;
            }
        }

        Ok(())
    }
}
