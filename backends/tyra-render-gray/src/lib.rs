//! Tyra gray renderer - exact anti-aliased scan conversion
//!
//! This backend converts an outline into 256-level coverage spans by
//! computing the *exact* signed area the outline sweeps over every pixel
//! cell. No sampling, no floating point: straight segments and flattened
//! Béziers are walked through a 128-steps-per-pixel grid, each cell
//! collects an (area, cover) pair, and a scanline sweep turns the sorted
//! cells into spans.
//!
//! The raster needs no intermediate bitmap of its own. Spans either go to
//! the built-in blitter, which writes coverage bytes into a caller-owned
//! [`Bitmap`], or to any [`SpanSink`] for direct composition.
//!
//! # Example
//!
//! ```
//! use tyra_core::{Bitmap, Outline, Point};
//! use tyra_render_gray::{GrayRaster, RenderPool};
//!
//! // A 2x2-pixel triangle in 26.6 coordinates.
//! let mut outline = Outline::new();
//! outline.add_polygon(&[
//!     Point::from_raw(0, 0),
//!     Point::from_raw(128, 0),
//!     Point::from_raw(0, 128),
//! ])?;
//!
//! let mut raster = GrayRaster::new(RenderPool::with_bytes(16 * 1024))?;
//! let mut pixels = [0u8; 4];
//! let mut bitmap = Bitmap::new_gray(2, 2, &mut pixels)?;
//! raster.render(outline.view()?, &mut bitmap)?;
//! assert_eq!(pixels[2], 255); // bottom-left pixel is fully covered
//! # Ok::<(), tyra_core::RasterError>(())
//! ```

mod cell;
mod raster;
mod sweep;

pub use cell::{Cell, RenderPool, MIN_POOL_BYTES};
pub use raster::{ONE_PIXEL, PIXEL_BITS};

use tyra_core::traits::{GlyphImage, SpanSink};
use tyra_core::{
    decompose, Bitmap, OutlineRef, PixelMode, RasterError, Result, Span, Transform,
};

use raster::Worker;

/// Clip window in whole pixels: `[x_min, x_max) x [y_min, y_max)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ClipBox {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl ClipBox {
    pub const fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        ClipBox {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }
}

/// The anti-aliased raster object.
///
/// A raster binds one [`RenderPool`] and converts one outline at a time;
/// concurrent renders need separate rasters, each with its own pool.
/// Dropping the raster (or calling [`into_pool`](Self::into_pool)) hands
/// the pool back to the caller - the raster never allocates.
#[derive(Debug)]
pub struct GrayRaster {
    pool: RenderPool,
}

impl GrayRaster {
    /// Bind a render pool. Pools under 4 KiB are rejected.
    pub fn new(pool: RenderPool) -> Result<Self> {
        pool.check()?;
        Ok(GrayRaster { pool })
    }

    /// Rebind to a new pool, returning the old one. On error (the offered
    /// pool is too small) the raster keeps its current pool.
    pub fn reset(&mut self, pool: RenderPool) -> Result<RenderPool> {
        pool.check()?;
        Ok(std::mem::replace(&mut self.pool, pool))
    }

    /// Tear down the raster, recovering the pool.
    pub fn into_pool(self) -> RenderPool {
        self.pool
    }

    /// Render an outline into a gray bitmap through the built-in blitter.
    ///
    /// The clip window is the bitmap's extent intersected with the
    /// outline's control box. Partial failure leaves already-written spans
    /// in the bitmap; zero it beforehand if that matters.
    pub fn render(&mut self, outline: OutlineRef<'_>, target: &mut Bitmap<'_>) -> Result<()> {
        if target.pixel_mode() != PixelMode::Gray
            || target.width() > i16::MAX as u32
            || target.rows() > i16::MAX as u32
        {
            return Err(RasterError::InvalidBitmap);
        }
        let clip = ClipBox::new(0, 0, target.width() as i32, target.rows() as i32);
        let mut writer = BitmapWriter { target };
        self.convert(outline, clip, &mut writer)
    }

    /// Render an outline directly to a span sink, clipped to `clip`.
    ///
    /// This is the composition path: no bitmap is involved and the sink
    /// sees every batch of spans in scanline order.
    pub fn render_spans<S: SpanSink>(
        &mut self,
        outline: OutlineRef<'_>,
        clip: ClipBox,
        sink: &mut S,
    ) -> Result<()> {
        // Span coordinates are i16; keep the window representable.
        let clip = ClipBox::new(
            clip.x_min.max(i32::from(i16::MIN)),
            clip.y_min.max(i32::from(i16::MIN)),
            clip.x_max.min(i32::from(i16::MAX)),
            clip.y_max.min(i32::from(i16::MAX)),
        );
        self.convert(outline, clip, sink)
    }

    /// Render a glyph image. Outlines are scan-converted; anything else
    /// answers [`RasterError::InvalidGlyphFormat`].
    pub fn render_image(
        &mut self,
        image: &GlyphImage<'_>,
        target: &mut Bitmap<'_>,
    ) -> Result<()> {
        match image {
            GlyphImage::Outline(outline) => self.render(*outline, target),
            GlyphImage::Bitmap(_) => Err(RasterError::InvalidGlyphFormat),
        }
    }

    fn convert<S: SpanSink>(
        &mut self,
        outline: OutlineRef<'_>,
        clip: ClipBox,
        sink: &mut S,
    ) -> Result<()> {
        if outline.is_empty() {
            return Ok(());
        }

        // Truncate the control box to pixels and intersect with the clip.
        let cbox = outline.control_box();
        let min_ex = cbox.x_min.pixel().max(clip.x_min);
        let min_ey = cbox.y_min.pixel().max(clip.y_min);
        let max_ex = cbox.x_max.ceil_pixel().min(clip.x_max);
        let max_ey = cbox.y_max.ceil_pixel().min(clip.y_max);
        if min_ex >= max_ex || min_ey >= max_ey {
            return Ok(());
        }

        log::debug!(
            "gray raster: {} contours, {} points, window ({}, {})..({}, {})",
            outline.contours().len(),
            outline.points().len(),
            min_ex,
            min_ey,
            max_ex,
            max_ey
        );

        let fill_rule = outline.fill_rule();
        let mut worker = Worker::new(
            self.pool.cells_mut(),
            min_ex,
            max_ex,
            min_ey,
            max_ey,
            fill_rule,
            sink,
        );

        // 26.6 outline units to the subpixel grid.
        decompose(outline, &mut worker, Transform::upscale(PIXEL_BITS - 6))?;
        worker.record_cell()?;

        log::trace!("gray raster: {} cells recorded", worker.num_cells);
        worker.sweep();
        Ok(())
    }
}

/// Built-in span sink: writes coverage bytes into a gray bitmap.
struct BitmapWriter<'a, 'buf> {
    target: &'a mut Bitmap<'buf>,
}

impl SpanSink for BitmapWriter<'_, '_> {
    fn spans(&mut self, y: i32, spans: &[Span]) {
        if y < 0 || y >= self.target.rows() as i32 {
            return;
        }
        let row = self.target.row_mut(y as u32);
        for span in spans {
            if span.coverage == 0 {
                continue;
            }
            let start = span.x as usize;
            let end = (start + span.len as usize).min(row.len());
            if start < end {
                row[start..end].fill(span.coverage);
            }
        }
    }
}
