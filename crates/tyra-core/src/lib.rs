//! Tyra Core - data model and trait definitions
//!
//! This crate provides the shared vocabulary of the Tyra scan-conversion
//! engine: the outline record and its tags, 26.6 fixed-point coordinates,
//! gray spans, the target bitmap descriptor, the outline decomposer, and
//! the capability traits that connect them.
//!
//! # Overview
//!
//! Rendering an outline is a one-way pipeline:
//!
//! 1. **Outline** - points, tags and contour ends from a glyph loader
//! 2. **Decomposition** - replay as move/line/conic/cubic pen events
//! 3. **Scan conversion** - exact per-cell coverage (a rendering backend,
//!    see `tyra-render-gray`)
//! 4. **Spans** - batched horizontal coverage runs into a [`SpanSink`]
//!
//! This crate owns stages 1, 2 and 4; backends own stage 3. Everything
//! that crosses a stage boundary is defined here so backends and callers
//! agree on one contract.
//!
//! # Example
//!
//! ```
//! use tyra_core::{decompose, Outline, Point, Transform};
//! use tyra_core::traits::OutlinePen;
//! # use tyra_core::Result;
//!
//! struct Counter(usize);
//!
//! impl OutlinePen for Counter {
//!     fn move_to(&mut self, _: Point) -> Result<()> { self.0 += 1; Ok(()) }
//!     fn line_to(&mut self, _: Point) -> Result<()> { self.0 += 1; Ok(()) }
//!     fn conic_to(&mut self, _: Point, _: Point) -> Result<()> { self.0 += 1; Ok(()) }
//!     fn cubic_to(&mut self, _: Point, _: Point, _: Point) -> Result<()> { self.0 += 1; Ok(()) }
//! }
//!
//! let mut outline = Outline::new();
//! outline.add_polygon(&[
//!     Point::from_raw(0, 0),
//!     Point::from_raw(64, 0),
//!     Point::from_raw(64, 64),
//! ])?;
//!
//! let mut pen = Counter(0);
//! decompose(outline.view()?, &mut pen, Transform::IDENTITY)?;
//! assert_eq!(pen.0, 4); // move + two lines + closing line
//! # Ok::<(), tyra_core::RasterError>(())
//! ```

pub mod bitmap;
pub mod decompose;
pub mod error;
pub mod fixed;
pub mod outline;
pub mod span;
pub mod traits;

pub use bitmap::{Bitmap, BitmapRef, PixelMode};
pub use decompose::{decompose, Transform};
pub use error::{RasterError, Result};
pub use fixed::F26Dot6;
pub use outline::{
    ControlBox, FillRule, Outline, OutlineFlags, OutlineRef, Point, PointTag, TagKind,
};
pub use span::{Span, MAX_SPANS};
