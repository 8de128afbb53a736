//! Tyra - exact anti-aliased scan conversion for font outlines
//!
//! Tyra turns Bézier outlines into 256-level gray coverage, computed
//! analytically per pixel cell rather than by supersampling. The engine is
//! split the usual way:
//!
//! 1. **Core** - outline record, tags, 26.6 coordinates, spans, traits
//! 2. **Decomposition** - contours replayed as move/line/conic/cubic events
//! 3. **Gray raster** - cell generation, scanline sweep, span emission
//!
//! This crate re-exports the pieces so most users depend on `tyra` alone.
//!
//! # Example
//!
//! ```
//! use tyra::prelude::*;
//!
//! let mut outline = Outline::new();
//! outline.add_polygon(&[
//!     Point::from_raw(0, 0),
//!     Point::from_raw(256, 0),
//!     Point::from_raw(256, 256),
//!     Point::from_raw(0, 256),
//! ])?;
//!
//! let mut raster = GrayRaster::new(RenderPool::with_bytes(16 * 1024))?;
//! let mut pixels = [0u8; 16];
//! let mut bitmap = Bitmap::new_gray(4, 4, &mut pixels)?;
//! raster.render(outline.view()?, &mut bitmap)?;
//! assert!(pixels.iter().all(|&p| p == 255));
//! # Ok::<(), RasterError>(())
//! ```

pub use tyra_core::{bitmap, error, fixed, outline, span, traits};

pub use tyra_core::{
    decompose, Bitmap, BitmapRef, ControlBox, F26Dot6, FillRule, Outline, OutlineFlags,
    OutlineRef, PixelMode, Point, PointTag, RasterError, Result, Span, TagKind, Transform,
    MAX_SPANS,
};

pub use tyra_render_gray as render_gray;

pub use tyra_render_gray::{ClipBox, GrayRaster, RenderPool, MIN_POOL_BYTES};

/// Common imports for typical usage
pub mod prelude {
    pub use tyra_core::{
        error::{RasterError, Result},
        traits::{GlyphImage, OutlinePen, SpanSink},
        Bitmap, F26Dot6, FillRule, Outline, OutlineFlags, OutlineRef, PixelMode, Point,
        PointTag, Span,
    };
    pub use tyra_render_gray::{ClipBox, GrayRaster, RenderPool};
}
