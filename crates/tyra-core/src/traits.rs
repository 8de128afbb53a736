//! Capability interfaces between the engine's stages
//!
//! Instead of tables of raw function pointers with an opaque closure
//! argument, each stage boundary is a trait: the decomposer drives an
//! [`OutlinePen`], the sweeper feeds a [`SpanSink`], and any per-call state
//! lives in the implementor itself. Dispatch stays monomorphic; no heap
//! closures are involved.

use crate::bitmap::BitmapRef;
use crate::error::Result;
use crate::outline::{OutlineRef, Point};
use crate::span::Span;

/// A glyph image as handed to a renderer by the glyph loader.
///
/// Scalable glyphs arrive as outlines; fonts with embedded bitmaps (and
/// the small-bitmap cache) deliver pre-rendered strikes instead. Each
/// renderer consumes exactly one of these forms and answers
/// [`InvalidGlyphFormat`](crate::error::RasterError::InvalidGlyphFormat)
/// for the others.
#[derive(Copy, Clone, Debug)]
pub enum GlyphImage<'a> {
    Outline(OutlineRef<'a>),
    Bitmap(BitmapRef<'a>),
}

/// Receiver for decomposed outline segments.
///
/// The decomposer emits one `move_to` per contour followed by a mix of
/// line, conic and cubic segments, and guarantees each contour is closed
/// back to its start vertex. Any method may fail; the first error aborts
/// the walk and propagates to the caller.
pub trait OutlinePen {
    /// Begin a new contour at `to`.
    fn move_to(&mut self, to: Point) -> Result<()>;

    /// Straight segment from the current position to `to`.
    fn line_to(&mut self, to: Point) -> Result<()>;

    /// Quadratic arc with control point `control`, ending at `to`.
    fn conic_to(&mut self, control: Point, to: Point) -> Result<()>;

    /// Cubic arc with control points `control1` and `control2`, ending at
    /// `to`.
    fn cubic_to(&mut self, control1: Point, control2: Point, to: Point) -> Result<()>;
}

/// Receiver for rendered gray spans.
///
/// Spans arrive in strictly increasing scanline order; within a scanline,
/// strictly increasing in x and already merged where contiguous runs share
/// a coverage value. A batch holds at most [`MAX_SPANS`](crate::span::MAX_SPANS)
/// spans, so one scanline may span several calls.
pub trait SpanSink {
    fn spans(&mut self, y: i32, spans: &[Span]);
}

impl<S: SpanSink + ?Sized> SpanSink for &mut S {
    #[inline]
    fn spans(&mut self, y: i32, spans: &[Span]) {
        (**self).spans(y, spans);
    }
}
