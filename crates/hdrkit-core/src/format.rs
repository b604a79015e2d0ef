//! Sample formats, chroma formats and chroma siting.
//!
//! # Types
//!
//! - [`SampleFormat`] - Float or fixed-point sample representation
//! - [`ChromaFormat`] - Chroma plane geometry relative to luma
//! - [`ChromaLocation`] - Six-valued chroma sample siting
//! - [`Phase`] - Horizontal filter phase derived from siting
//!
//! # Usage
//!
//! ```rust
//! use hdrkit_core::format::{ChromaLocation, Phase, SampleFormat};
//!
//! let fmt = SampleFormat::fixed(10).unwrap();
//! assert_eq!(fmt.bit_depth(), Some(10));
//! assert!(fmt.stores_u16());
//!
//! assert_eq!(ChromaLocation::Center.horizontal_phase(), Phase::Interstitial);
//! ```

use std::fmt;

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sample representation of every plane in a frame.
///
/// Fixed-point bit depths 8 through 16 are supported. Depth 8 is stored
/// as `u8`, depths 9..=16 as `u16`, floats as `f32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SampleFormat {
    /// 32-bit floating point samples.
    #[default]
    Float,
    /// Unsigned integer samples with the given bit depth.
    Fixed {
        /// Significant bits per sample (8..=16).
        bit_depth: u8,
    },
}

impl SampleFormat {
    /// Fixed-point format with the given bit depth.
    pub fn fixed(bit_depth: u8) -> Result<Self> {
        if !(8..=16).contains(&bit_depth) {
            return Err(Error::unsupported_format(format!(
                "{bit_depth}-bit fixed point (supported: 8..=16)"
            )));
        }
        Ok(Self::Fixed { bit_depth })
    }

    /// Whether this is the floating-point representation.
    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float)
    }

    /// Bit depth for fixed-point formats, `None` for float.
    #[inline]
    pub const fn bit_depth(&self) -> Option<u8> {
        match self {
            Self::Float => None,
            Self::Fixed { bit_depth } => Some(*bit_depth),
        }
    }

    /// Whether samples are stored as `u8`.
    #[inline]
    pub const fn stores_u8(&self) -> bool {
        matches!(self, Self::Fixed { bit_depth: 8 })
    }

    /// Whether samples are stored as `u16`.
    #[inline]
    pub const fn stores_u16(&self) -> bool {
        matches!(self, Self::Fixed { bit_depth } if *bit_depth > 8)
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float => f.write_str("float"),
            Self::Fixed { bit_depth } => write!(f, "{bit_depth}-bit"),
        }
    }
}

/// Chroma plane geometry relative to the luma plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChromaFormat {
    /// Full resolution chroma.
    #[default]
    Yuv444,
    /// Half horizontal chroma resolution.
    Yuv422,
}

impl ChromaFormat {
    /// Horizontal and vertical subsampling shifts.
    #[inline]
    pub const fn shifts(&self) -> (u32, u32) {
        match self {
            Self::Yuv444 => (0, 0),
            Self::Yuv422 => (1, 0),
        }
    }

    /// Chroma plane size for a luma plane of `width` x `height`.
    ///
    /// Fails when the luma size is not divisible by the subsampling factors.
    pub fn chroma_size(&self, width: usize, height: usize) -> Result<(usize, usize)> {
        let (sx, sy) = self.shifts();
        if width % (1 << sx) != 0 || height % (1 << sy) != 0 {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("{self} requires luma size divisible by {}x{}", 1 << sx, 1 << sy),
            ));
        }
        Ok((width >> sx, height >> sy))
    }
}

impl fmt::Display for ChromaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Yuv444 => "4:4:4",
            Self::Yuv422 => "4:2:2",
        })
    }
}

/// Horizontal sub-pixel phase of the chroma grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Phase {
    /// Chroma co-sited with even luma columns (phase 0).
    #[default]
    CoSited,
    /// Chroma centered between luma columns `2i` and `2i + 1` (phase 1).
    Interstitial,
}

impl Phase {
    /// Numeric phase (0 or 1).
    #[inline]
    pub const fn index(&self) -> u8 {
        match self {
            Self::CoSited => 0,
            Self::Interstitial => 1,
        }
    }

    /// Offset of the chroma sample from column `2i`, in luma samples.
    #[inline]
    pub const fn offset(&self) -> f64 {
        match self {
            Self::CoSited => 0.0,
            Self::Interstitial => 0.5,
        }
    }
}

/// Chroma sample location (H.273 `chroma_sample_loc_type`).
///
/// ```text
/// 0 Left        1 Center
/// 2 TopLeft     3 Top
/// 4 BottomLeft  5 Bottom
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum ChromaLocation {
    /// Co-sited horizontally, centered vertically.
    #[default]
    Left = 0,
    /// Centered in both directions.
    Center = 1,
    /// Co-sited with the top-left luma sample.
    TopLeft = 2,
    /// Centered horizontally, co-sited with the top row.
    Top = 3,
    /// Co-sited with the bottom-left luma sample.
    BottomLeft = 4,
    /// Centered horizontally, co-sited with the bottom row.
    Bottom = 5,
}

impl ChromaLocation {
    /// All six sitings in code order.
    pub const ALL: [ChromaLocation; 6] = [
        Self::Left,
        Self::Center,
        Self::TopLeft,
        Self::Top,
        Self::BottomLeft,
        Self::Bottom,
    ];

    /// Horizontal filter phase for this siting.
    #[inline]
    pub const fn horizontal_phase(&self) -> Phase {
        match self {
            Self::Left | Self::TopLeft | Self::BottomLeft => Phase::CoSited,
            Self::Center | Self::Top | Self::Bottom => Phase::Interstitial,
        }
    }
}

impl TryFrom<u8> for ChromaLocation {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or(Error::InvalidChromaLocation(code))
    }
}
