//! Cell generation
//!
//! The worker walks straight segments through a subpixel grid and keeps
//! two running accumulators for the pixel cell the pen is currently in:
//! `area`, the trapezoidal integral of the segment fragments inside the
//! cell, and `cover`, their signed vertical extent. Whenever the pen
//! crosses into another cell the pair is committed to the cell array and
//! reset. Curves never reach this level: conic and cubic arcs are
//! flattened to line segments first, with an explicit subdivision stack
//! whose depth comes from the control polygon's deviation.
//!
//! Everything here works in subpixel units: `ONE_PIXEL` units per pixel,
//! produced by upscaling the outline's 26.6 coordinates during
//! decomposition.

use tyra_core::traits::{OutlinePen, SpanSink};
use tyra_core::{FillRule, Point, RasterError, Result, Span, MAX_SPANS};

use crate::cell::Cell;

/// Subpixel precision: 2^7 = 128 steps per pixel.
pub const PIXEL_BITS: i32 = 7;

/// One pixel in subpixel units.
pub const ONE_PIXEL: i64 = 1 << PIXEL_BITS;

/// Hard ceiling on Bézier subdivision depth. The deviation estimate at
/// least halves per level, so 32 levels exhaust any 32-bit input.
const MAX_LEVELS: usize = 32;

/// Subpixel position. Wide enough that every intermediate product in the
/// stepping code stays exact.
pub(crate) type Pos = i64;

#[inline]
pub(crate) fn trunc(x: Pos) -> i32 {
    (x >> PIXEL_BITS) as i32
}

#[inline]
pub(crate) fn subpixels(x: i32) -> Pos {
    (x as Pos) << PIXEL_BITS
}

#[derive(Copy, Clone, Debug, Default)]
struct Vec2 {
    x: Pos,
    y: Pos,
}

/// Per-render scan conversion state.
///
/// Borrowed mutably for exactly one render call: the cell array comes from
/// the raster's pool, the sink from the caller. Nothing in here outlives
/// the call.
pub(crate) struct Worker<'a, S: SpanSink> {
    // Clip window in pixels: [min_ex, max_ex) x [min_ey, max_ey).
    pub(crate) min_ex: i32,
    pub(crate) max_ex: i32,
    pub(crate) min_ey: i32,
    pub(crate) max_ey: i32,

    // Current cell and its live accumulators.
    ex: i32,
    ey: i32,
    area: i32,
    cover: i32,
    /// Set while the current cell lies outside the clip window, so its
    /// accumulators are discarded instead of committed.
    invalid: bool,

    // Pen position in subpixels; last_ey is the subpixel origin of the
    // scanline the pen last settled on.
    x: Pos,
    y: Pos,
    last_ey: Pos,

    pub(crate) cells: &'a mut [Cell],
    pub(crate) num_cells: usize,

    pub(crate) fill_rule: FillRule,

    // Span batch for the sweep phase.
    pub(crate) spans: [Span; MAX_SPANS],
    pub(crate) num_spans: usize,
    pub(crate) span_y: i32,

    pub(crate) sink: &'a mut S,
}

impl<'a, S: SpanSink> Worker<'a, S> {
    pub(crate) fn new(
        cells: &'a mut [Cell],
        min_ex: i32,
        max_ex: i32,
        min_ey: i32,
        max_ey: i32,
        fill_rule: FillRule,
        sink: &'a mut S,
    ) -> Self {
        Worker {
            min_ex,
            max_ex,
            min_ey,
            max_ey,
            ex: 0,
            ey: 0,
            area: 0,
            cover: 0,
            invalid: true,
            x: 0,
            y: 0,
            last_ey: 0,
            cells,
            num_cells: 0,
            fill_rule,
            spans: [Span::default(); MAX_SPANS],
            num_spans: 0,
            span_y: i32::MIN,
            sink,
        }
    }

    /// Commit the current cell to the array if it is inside the clip and
    /// carries any coverage.
    pub(crate) fn record_cell(&mut self) -> Result<()> {
        if !self.invalid && (self.area | self.cover) != 0 {
            if self.num_cells >= self.cells.len() {
                return Err(RasterError::PoolOverflow);
            }
            self.cells[self.num_cells] = Cell {
                x: self.ex - self.min_ex,
                y: self.ey - self.min_ey,
                area: self.area,
                cover: self.cover,
            };
            self.num_cells += 1;
        }
        Ok(())
    }

    /// Move the cell cursor to `(ex, ey)`, committing the previous cell on
    /// any transition. Cells left of the clip collapse onto the gutter
    /// column `min_ex - 1` so their winding still reaches the first
    /// visible pixel through the scanline prefix sum.
    fn set_cell(&mut self, mut ex: i32, ey: i32) -> Result<()> {
        let mut record = false;
        let mut clean = true;

        let invalid = ey < self.min_ey || ey >= self.max_ey || ex >= self.max_ex;
        if !invalid {
            if ex < self.min_ex {
                ex = self.min_ex - 1;
            }
            if ex != self.ex || ey != self.ey {
                record = true;
            } else {
                // Do not clean if we did not move from a valid cell.
                clean = self.invalid;
            }
        }

        if self.invalid != invalid || record {
            self.record_cell()?;
        }
        if clean {
            self.area = 0;
            self.cover = 0;
        }

        self.invalid = invalid;
        self.ex = ex;
        self.ey = ey;
        Ok(())
    }

    /// Open a fresh cell at the start of a contour.
    fn start_cell(&mut self, mut ex: i32, ey: i32) -> Result<()> {
        if ex < self.min_ex {
            ex = self.min_ex - 1;
        }
        self.area = 0;
        self.cover = 0;
        self.ex = ex;
        self.ey = ey;
        self.last_ey = subpixels(ey);
        self.invalid = false;
        self.set_cell(ex, ey)
    }

    /// Accumulate one segment confined to scanline `ey`, from `(x1, y1)`
    /// to `(x2, y2)` with the y values already local to the scanline.
    fn render_scanline(&mut self, ey: i32, x1: Pos, y1: i32, x2: Pos, y2: i32) -> Result<()> {
        let ex1 = trunc(x1);
        let ex2 = trunc(x2);
        let fx1 = (x1 - subpixels(ex1)) as i32;
        let fx2 = (x2 - subpixels(ex2)) as i32;

        // Pure horizontal motion only moves the cell cursor.
        if y1 == y2 {
            return self.set_cell(ex2, ey);
        }

        // Everything in a single cell: accumulate and stay put.
        if ex1 == ex2 {
            let delta = y2 - y1;
            self.area += (fx1 + fx2) * delta;
            self.cover += delta;
            return Ok(());
        }

        // A run of adjacent cells. Split the y advance across the columns
        // with a Bresenham-style remainder so every cell gets its exact
        // share.
        let mut dx = x2 - x1;
        let mut p;
        let first;
        let incr;
        if dx > 0 {
            p = (ONE_PIXEL - fx1 as i64) * (y2 - y1) as i64;
            first = ONE_PIXEL as i32;
            incr = 1;
        } else {
            p = fx1 as i64 * (y2 - y1) as i64;
            first = 0;
            incr = -1;
            dx = -dx;
        }

        let mut delta = p / dx;
        let mut module = p % dx;
        if module < 0 {
            delta -= 1;
            module += dx;
        }

        self.area += ((fx1 + first) as i64 * delta) as i32;
        self.cover += delta as i32;

        let mut ex1 = ex1 + incr;
        self.set_cell(ex1, ey)?;
        let mut y1 = y1 as i64 + delta;

        if ex1 != ex2 {
            p = ONE_PIXEL * (y2 as i64 - y1);
            let mut lift = p / dx;
            let mut rem = p % dx;
            if rem < 0 {
                lift -= 1;
                rem += dx;
            }
            module -= dx;

            while ex1 != ex2 {
                delta = lift;
                module += rem;
                if module >= 0 {
                    module -= dx;
                    delta += 1;
                }
                self.area += (ONE_PIXEL * delta) as i32;
                self.cover += delta as i32;
                y1 += delta;
                ex1 += incr;
                self.set_cell(ex1, ey)?;
            }
        }

        let delta = y2 as i64 - y1;
        self.area += ((fx2 as i64 + ONE_PIXEL - first as i64) * delta) as i32;
        self.cover += delta as i32;
        Ok(())
    }

    /// Walk a straight segment from the pen position to `(to_x, to_y)`,
    /// slicing it into per-scanline pieces.
    fn render_line(&mut self, to_x: Pos, to_y: Pos) -> Result<()> {
        let ey1 = trunc(self.last_ey);
        let ey2 = trunc(to_y);
        let fy1 = (self.y - self.last_ey) as i32;
        let fy2 = (to_y - subpixels(ey2)) as i32;

        let dx = to_x - self.x;
        let mut dy = to_y - self.y;

        if ey1 == ey2 {
            self.render_scanline(ey1, self.x, fy1, to_x, fy2)?;
        } else {
            let mut p;
            let first;
            let incr;
            if dy > 0 {
                p = (ONE_PIXEL - fy1 as i64) * dx;
                first = ONE_PIXEL as i32;
                incr = 1;
            } else {
                p = fy1 as i64 * dx;
                first = 0;
                incr = -1;
                dy = -dy;
            }

            let mut delta = p / dy;
            let mut module = p % dy;
            if module < 0 {
                delta -= 1;
                module += dy;
            }

            let mut x = self.x + delta;
            self.render_scanline(ey1, self.x, fy1, x, first)?;

            let mut ey1 = ey1 + incr;
            self.set_cell(trunc(x), ey1)?;

            if ey1 != ey2 {
                p = ONE_PIXEL * dx;
                let mut lift = p / dy;
                let mut rem = p % dy;
                if rem < 0 {
                    lift -= 1;
                    rem += dy;
                }
                module -= dy;

                while ey1 != ey2 {
                    delta = lift;
                    module += rem;
                    if module >= 0 {
                        module -= dy;
                        delta += 1;
                    }
                    let x2 = x + delta;
                    self.render_scanline(ey1, x, ONE_PIXEL as i32 - first, x2, first)?;
                    x = x2;
                    ey1 += incr;
                    self.set_cell(trunc(x), ey1)?;
                }
            }

            self.render_scanline(ey1, x, ONE_PIXEL as i32 - first, to_x, fy2)?;
        }

        self.x = to_x;
        self.y = to_y;
        self.last_ey = subpixels(ey2);
        Ok(())
    }

    /// Flatten one conic arc with an explicit subdivision stack.
    fn render_conic(&mut self, control: Vec2, to: Vec2) -> Result<()> {
        // Deviation of the control point from the chord midpoint, L-inf.
        // It at least halves per subdivision, so the level is the number
        // of halvings that bring it under one pixel.
        let dx = (self.x + to.x - (control.x << 1)).abs();
        let dy = (self.y + to.y - (control.y << 1)).abs();
        let mut d = dx.max(dy) >> PIXEL_BITS;

        let mut level = 1usize;
        while d > 0 {
            d >>= 1;
            level += 1;
        }
        if level <= 1 {
            return self.render_line(to.x, to.y);
        }
        let level = level.min(MAX_LEVELS);

        // The stack stores arcs end-first, overlapping at shared points;
        // each push advances the base by two.
        let mut arcs = [Vec2::default(); 2 * MAX_LEVELS + 3];
        let mut levels = [0usize; MAX_LEVELS];
        arcs[0] = to;
        arcs[1] = control;
        arcs[2] = Vec2 { x: self.x, y: self.y };
        levels[0] = level;

        let mut base = 0usize;
        let mut top = 0usize;
        loop {
            let level = levels[top];
            if level > 1 {
                split_conic(&mut arcs[base..base + 5]);
                base += 2;
                top += 1;
                levels[top] = level - 1;
                levels[top - 1] = level - 1;
            } else {
                let end = arcs[base];
                self.render_line(end.x, end.y)?;
                if top == 0 {
                    return Ok(());
                }
                top -= 1;
                base -= 2;
            }
        }
    }

    /// Flatten one cubic arc with an explicit subdivision stack.
    fn render_cubic(&mut self, control1: Vec2, control2: Vec2, to: Vec2) -> Result<()> {
        // L-inf second differences of the control polygon; both quarter
        // per midpoint subdivision, so each level buys two bits.
        let d1 = (self.x - (control1.x << 1) + control2.x)
            .abs()
            .max((self.y - (control1.y << 1) + control2.y).abs());
        let d2 = (control1.x - (control2.x << 1) + to.x)
            .abs()
            .max((control1.y - (control2.y << 1) + to.y).abs());
        let mut d = d1.max(d2) >> PIXEL_BITS;

        let mut level = 1usize;
        while d > 0 {
            d >>= 2;
            level += 1;
        }
        if level <= 1 {
            return self.render_line(to.x, to.y);
        }
        let level = level.min(MAX_LEVELS);

        let mut arcs = [Vec2::default(); 3 * MAX_LEVELS + 4];
        let mut levels = [0usize; MAX_LEVELS];
        arcs[0] = to;
        arcs[1] = control2;
        arcs[2] = control1;
        arcs[3] = Vec2 { x: self.x, y: self.y };
        levels[0] = level;

        let mut base = 0usize;
        let mut top = 0usize;
        loop {
            let level = levels[top];
            if level > 1 {
                split_cubic(&mut arcs[base..base + 7]);
                base += 3;
                top += 1;
                levels[top] = level - 1;
                levels[top - 1] = level - 1;
            } else {
                let end = arcs[base];
                self.render_line(end.x, end.y)?;
                if top == 0 {
                    return Ok(());
                }
                top -= 1;
                base -= 3;
            }
        }
    }
}

/// De Casteljau split of a conic at t = 1/2, in place. `arc[0..=2]` holds
/// the arc end-first; afterwards `arc[0..=2]` and `arc[2..=4]` hold the
/// two halves.
fn split_conic(arc: &mut [Vec2]) {
    arc[4] = arc[2];

    let bx = arc[1].x;
    let ax = (arc[2].x + bx) / 2;
    arc[3].x = ax;
    let bx = (arc[0].x + bx) / 2;
    arc[1].x = bx;
    arc[2].x = (ax + bx) / 2;

    let by = arc[1].y;
    let ay = (arc[2].y + by) / 2;
    arc[3].y = ay;
    let by = (arc[0].y + by) / 2;
    arc[1].y = by;
    arc[2].y = (ay + by) / 2;
}

/// De Casteljau split of a cubic at t = 1/2, in place; `arc[0..=3]`
/// becomes `arc[0..=3]` and `arc[3..=6]`.
fn split_cubic(arc: &mut [Vec2]) {
    arc[6] = arc[3];

    let cx = arc[1].x;
    let dx = arc[2].x;
    let ax = (arc[0].x + cx) / 2;
    arc[1].x = ax;
    let bx = (arc[3].x + dx) / 2;
    arc[5].x = bx;
    let cx = (cx + dx) / 2;
    let ax = (ax + cx) / 2;
    arc[2].x = ax;
    let bx = (bx + cx) / 2;
    arc[4].x = bx;
    arc[3].x = (ax + bx) / 2;

    let cy = arc[1].y;
    let dy = arc[2].y;
    let ay = (arc[0].y + cy) / 2;
    arc[1].y = ay;
    let by = (arc[3].y + dy) / 2;
    arc[5].y = by;
    let cy = (cy + dy) / 2;
    let ay = (ay + cy) / 2;
    arc[2].y = ay;
    let by = (by + cy) / 2;
    arc[4].y = by;
    arc[3].y = (ay + by) / 2;
}

impl<S: SpanSink> OutlinePen for Worker<'_, S> {
    fn move_to(&mut self, to: Point) -> Result<()> {
        // Commit whatever the previous contour left open, then restart at
        // the new position.
        self.record_cell()?;
        let x = to.x.raw() as Pos;
        let y = to.y.raw() as Pos;
        self.start_cell(trunc(x), trunc(y))?;
        self.x = x;
        self.y = y;
        Ok(())
    }

    fn line_to(&mut self, to: Point) -> Result<()> {
        self.render_line(to.x.raw() as Pos, to.y.raw() as Pos)
    }

    fn conic_to(&mut self, control: Point, to: Point) -> Result<()> {
        self.render_conic(
            Vec2 {
                x: control.x.raw() as Pos,
                y: control.y.raw() as Pos,
            },
            Vec2 {
                x: to.x.raw() as Pos,
                y: to.y.raw() as Pos,
            },
        )
    }

    fn cubic_to(&mut self, control1: Point, control2: Point, to: Point) -> Result<()> {
        self.render_cubic(
            Vec2 {
                x: control1.x.raw() as Pos,
                y: control1.y.raw() as Pos,
            },
            Vec2 {
                x: control2.x.raw() as Pos,
                y: control2.y.raw() as Pos,
            },
            Vec2 {
                x: to.x.raw() as Pos,
                y: to.y.raw() as Pos,
            },
        )
    }
}
