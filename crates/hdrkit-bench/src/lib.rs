//! Benchmark fixtures for hdrkit.
//!
//! Run with: `cargo bench -p hdrkit-bench`

use hdrkit_core::{ChromaFormat, Component, Frame, SampleFormat};

/// 4:4:4 source and 4:2:2 destination frames with busy chroma.
pub fn frame_pair(width: usize, height: usize, format: SampleFormat) -> (Frame, Frame) {
    let mut inp = Frame::new(width, height, ChromaFormat::Yuv444, format)
        .unwrap_or_else(|e| panic!("bench source frame: {e}"));
    let out = Frame::new(width, height, ChromaFormat::Yuv422, format)
        .unwrap_or_else(|e| panic!("bench destination frame: {e}"));

    for c in Component::CHROMA {
        let plane = inp.plane_mut(c);
        let (lo, hi) = (plane.range.min, plane.range.max);
        let value = |i: usize| lo + (hi - lo) * ((i * 7919) % 1000) as f64 / 999.0;
        if let Some(s) = plane.samples_mut::<f32>() {
            s.iter_mut().enumerate().for_each(|(i, v)| *v = value(i) as f32);
        } else if let Some(s) = plane.samples_mut::<u16>() {
            s.iter_mut().enumerate().for_each(|(i, v)| *v = value(i).round() as u16);
        } else if let Some(s) = plane.samples_mut::<u8>() {
            s.iter_mut().enumerate().for_each(|(i, v)| *v = value(i).round() as u8);
        }
    }
    (inp, out)
}
