//! Planar Y'CbCr frame buffers.
//!
//! A [`Frame`] owns three planes (Y, U, V). Every plane shares the frame's
//! [`SampleFormat`] and carries its own dimensions and nominal value range.
//!
//! # Memory Layout
//!
//! Planes are stored row-major without padding:
//!
//! ```text
//! Y: [y00 y01 y02 ...]   width x height
//! U: [u00 u01 ...]       chroma width x chroma height
//! V: [v00 v01 ...]       chroma width x chroma height
//! ```
//!
//! # Usage
//!
//! ```rust
//! use hdrkit_core::{ChromaFormat, Component, Frame, SampleFormat};
//!
//! let mut frame = Frame::new(8, 2, ChromaFormat::Yuv422, SampleFormat::fixed(10).unwrap()).unwrap();
//! assert_eq!(frame.plane(Component::U).width(), 4);
//!
//! let luma = frame.plane_mut(Component::Y).samples_mut::<u16>().unwrap();
//! luma.fill(512);
//! ```

use crate::{ChromaFormat, Error, Result, SampleFormat};

/// Plane index within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// Luma.
    Y = 0,
    /// Blue-difference chroma.
    U = 1,
    /// Red-difference chroma.
    V = 2,
}

impl Component {
    /// Both chroma components.
    pub const CHROMA: [Component; 2] = [Component::U, Component::V];

    /// Whether this is a chroma component.
    #[inline]
    pub const fn is_chroma(&self) -> bool {
        !matches!(self, Self::Y)
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Y => "Y",
            Self::U => "U",
            Self::V => "V",
        })
    }
}

/// Nominal value range of a plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneRange {
    /// Lowest legal sample value.
    pub min: f64,
    /// Neutral value (black for luma, zero color difference for chroma).
    pub mid: f64,
    /// Highest legal sample value.
    pub max: f64,
}

impl PlaneRange {
    /// Creates a range.
    #[inline]
    pub const fn new(min: f64, mid: f64, max: f64) -> Self {
        Self { min, mid, max }
    }

    /// Full-scale default range for a plane of `format`.
    ///
    /// Fixed-point planes span `[0, 2^b - 1]` with mid `2^(b-1)`.
    /// Float luma spans `[0, 1]`, float chroma `[-0.5, 0.5]`.
    pub fn full(format: SampleFormat, component: Component) -> Self {
        match format.bit_depth() {
            Some(b) => Self::new(0.0, (1u32 << (b - 1)) as f64, ((1u32 << b) - 1) as f64),
            None if component.is_chroma() => Self::new(-0.5, 0.0, 0.5),
            None => Self::new(0.0, 0.5, 1.0),
        }
    }
}

/// Sample buffer of one plane.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaneData {
    /// Floating point samples.
    F32(Vec<f32>),
    /// 9..=16 bit samples.
    U16(Vec<u16>),
    /// 8-bit samples.
    U8(Vec<u8>),
}

impl PlaneData {
    fn zeroed(format: SampleFormat, len: usize) -> Self {
        if format.stores_u8() {
            Self::U8(vec![0; len])
        } else if format.stores_u16() {
            Self::U16(vec![0; len])
        } else {
            Self::F32(vec![0.0; len])
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        match self {
            Self::F32(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::U8(v) => v.len(),
        }
    }

    /// Whether the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name of the storage type.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::F32(_) => "f32",
            Self::U16(_) => "u16",
            Self::U8(_) => "u8",
        }
    }
}

/// Storage types a plane can hold.
///
/// Implemented for `f32`, `u16` and `u8`; lets generic code borrow a
/// plane's samples as a typed slice.
pub trait PlaneSample: Copy + Send + Sync + 'static {
    /// Borrows the samples if `data` holds this type.
    fn slice(data: &PlaneData) -> Option<&[Self]>;

    /// Mutably borrows the samples if `data` holds this type.
    fn slice_mut(data: &mut PlaneData) -> Option<&mut [Self]>;

    /// Converts a nominal range value into this storage type, saturating.
    fn from_range_value(v: f64) -> Self;
}

impl PlaneSample for f32 {
    fn slice(data: &PlaneData) -> Option<&[Self]> {
        match data {
            PlaneData::F32(v) => Some(v),
            _ => None,
        }
    }

    fn slice_mut(data: &mut PlaneData) -> Option<&mut [Self]> {
        match data {
            PlaneData::F32(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    fn from_range_value(v: f64) -> Self {
        v as f32
    }
}

impl PlaneSample for u16 {
    fn slice(data: &PlaneData) -> Option<&[Self]> {
        match data {
            PlaneData::U16(v) => Some(v),
            _ => None,
        }
    }

    fn slice_mut(data: &mut PlaneData) -> Option<&mut [Self]> {
        match data {
            PlaneData::U16(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    fn from_range_value(v: f64) -> Self {
        // `as` saturates float -> int
        v.round() as u16
    }
}

impl PlaneSample for u8 {
    fn slice(data: &PlaneData) -> Option<&[Self]> {
        match data {
            PlaneData::U8(v) => Some(v),
            _ => None,
        }
    }

    fn slice_mut(data: &mut PlaneData) -> Option<&mut [Self]> {
        match data {
            PlaneData::U8(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    fn from_range_value(v: f64) -> Self {
        v.round() as u8
    }
}

/// One color plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    width: usize,
    height: usize,
    /// Nominal value range.
    pub range: PlaneRange,
    data: PlaneData,
}

impl Plane {
    /// Plane width in samples.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Plane height in rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of samples (`width * height`).
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.width * self.height
    }

    /// Sample buffer.
    #[inline]
    pub fn data(&self) -> &PlaneData {
        &self.data
    }

    /// Typed view of the samples, `None` if the plane stores another type.
    #[inline]
    pub fn samples<T: PlaneSample>(&self) -> Option<&[T]> {
        T::slice(&self.data)
    }

    /// Typed mutable view of the samples.
    #[inline]
    pub fn samples_mut<T: PlaneSample>(&mut self) -> Option<&mut [T]> {
        T::slice_mut(&mut self.data)
    }

    /// Replaces the sample buffer.
    ///
    /// The new buffer must have the same storage type and length.
    pub fn set_data(&mut self, data: PlaneData) -> Result<()> {
        if data.kind() != self.data.kind() || data.len() != self.data.len() {
            return Err(Error::plane_mismatch(
                format!("{} x {}", self.data.kind(), self.data.len()),
                format!("{} x {}", data.kind(), data.len()),
            ));
        }
        self.data = data;
        Ok(())
    }
}

/// Planar Y'CbCr frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    chroma_format: ChromaFormat,
    format: SampleFormat,
    /// Sequence number within the stream.
    pub frame_no: u64,
    /// Whether the frame holds valid picture data.
    pub is_available: bool,
    planes: [Plane; 3],
}

impl Frame {
    /// Allocates a zeroed frame with full-scale plane ranges.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] for zero sizes, sizes that do not fit
    ///   `chroma_format`, or sample counts that overflow `usize`
    pub fn new(
        width: usize,
        height: usize,
        chroma_format: ChromaFormat,
        format: SampleFormat,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_dimensions(width, height, "width and height must be > 0"));
        }
        let (cw, ch) = chroma_format.chroma_size(width, height)?;
        let luma_len = width
            .checked_mul(height)
            .ok_or_else(|| Error::invalid_dimensions(width, height, "sample count overflows"))?;

        let plane = |component: Component, w: usize, h: usize, len: usize| Plane {
            width: w,
            height: h,
            range: PlaneRange::full(format, component),
            data: PlaneData::zeroed(format, len),
        };

        Ok(Self {
            width,
            height,
            chroma_format,
            format,
            frame_no: 0,
            is_available: false,
            planes: [
                plane(Component::Y, width, height, luma_len),
                plane(Component::U, cw, ch, cw * ch),
                plane(Component::V, cw, ch, cw * ch),
            ],
        })
    }

    /// Luma width.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Luma height.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Chroma plane geometry.
    #[inline]
    pub fn chroma_format(&self) -> ChromaFormat {
        self.chroma_format
    }

    /// Sample representation shared by all planes.
    #[inline]
    pub fn format(&self) -> SampleFormat {
        self.format
    }

    /// Plane `c`.
    #[inline]
    pub fn plane(&self, c: Component) -> &Plane {
        &self.planes[c as usize]
    }

    /// Mutable plane `c`.
    #[inline]
    pub fn plane_mut(&mut self, c: Component) -> &mut Plane {
        &mut self.planes[c as usize]
    }

    /// Copies frame number, availability and every plane range from `src`.
    pub fn copy_metadata_from(&mut self, src: &Frame) {
        self.frame_no = src.frame_no;
        self.is_available = src.is_available;
        for (dst, src) in self.planes.iter_mut().zip(src.planes.iter()) {
            dst.range = src.range;
        }
    }
}
