//! Scanline sweep and span emission
//!
//! After decomposition the cell array holds coverage fragments in emission
//! order. The sweep sorts them by (y, x), merges co-located cells, runs a
//! winding prefix sum along each scanline and turns the result into gray
//! spans: one-pixel spans where a cell carries area, flat runs between and
//! after cells while the winding is non-zero. Spans are batched and pushed
//! through the sink in bounded chunks.

use tyra_core::traits::SpanSink;
use tyra_core::{FillRule, Span, MAX_SPANS};

use crate::cell::Cell;
use crate::raster::{Worker, ONE_PIXEL, PIXEL_BITS};

/// In-place shell sort over the cell array, ordering by (y, x).
///
/// Shell sort needs no pool memory and behaves well on the nearly sorted
/// arrays that top-to-bottom contours produce. The sweep merges equal
/// positions, so stability is irrelevant.
pub(crate) fn sort_cells(cells: &mut [Cell]) {
    #[inline]
    fn ordered(a: &Cell, b: &Cell) -> bool {
        a.y < b.y || (a.y == b.y && a.x <= b.x)
    }

    let count = cells.len();
    let mut gap = 1;
    while gap < count {
        gap = gap * 3 + 1;
    }
    loop {
        gap /= 3;
        if gap == 0 {
            break;
        }
        for i in gap..count {
            let mut j = i;
            while j >= gap {
                if ordered(&cells[j - gap], &cells[j]) {
                    break;
                }
                cells.swap(j - gap, j);
                j -= gap;
            }
        }
    }
}

impl<S: SpanSink> Worker<'_, S> {
    /// Sort, sweep and flush. Call once, after the whole outline has been
    /// decomposed and the final cell committed.
    pub(crate) fn sweep(&mut self) {
        if self.num_cells == 0 {
            return;
        }

        sort_cells(&mut self.cells[..self.num_cells]);

        self.num_spans = 0;
        self.span_y = i32::MIN;

        let width = self.max_ex - self.min_ex;
        let mut cover: i64 = 0;

        let mut i = 0;
        while i < self.num_cells {
            let cur = self.cells[i];
            let mut area = i64::from(cur.area);
            let mut cell_cover = i64::from(cur.cover);
            i += 1;

            // Merge every cell sharing this position.
            while i < self.num_cells
                && self.cells[i].y == cur.y
                && self.cells[i].x == cur.x
            {
                area += i64::from(self.cells[i].area);
                cell_cover += i64::from(self.cells[i].cover);
                i += 1;
            }

            cover += cell_cover;
            let mut x = cur.x;

            // A cell with area is a partially covered pixel: its fill is
            // the full winding column minus what the fragments carved out.
            if area != 0 && x >= 0 {
                self.hline(x, cur.y, cover * (ONE_PIXEL * 2) - area, 1);
                x += 1;
            }
            if x < 0 {
                x = 0;
            }

            if i < self.num_cells && self.cells[i].y == cur.y {
                // Flat run up to the next cell on this scanline.
                let next_x = self.cells[i].x;
                if next_x > x {
                    self.hline(x, cur.y, cover * (ONE_PIXEL * 2), next_x - x);
                }
            } else {
                // Last cell of the scanline: a closed contour winds back
                // to zero here, but if it does not (clipped on the right),
                // fill out to the window edge.
                if cover != 0 && x < width {
                    self.hline(x, cur.y, cover * (ONE_PIXEL * 2), width - x);
                }
                cover = 0;
            }
        }

        self.flush_spans();
    }

    /// Emit `count` pixels of coverage at cell-relative `(x, y)`. `area`
    /// is the raw doubled-area value; it is scaled to 0..=256 and folded
    /// through the fill rule here.
    fn hline(&mut self, x: i32, y: i32, area: i64, count: i32) {
        // The coverage fraction is area / (ONE_PIXEL^2 * 2), rescaled to
        // the 0..=256 range.
        let mut coverage = (area >> (2 * PIXEL_BITS + 1 - 8)) as i32;
        if coverage < 0 {
            coverage = -coverage;
        }
        match self.fill_rule {
            FillRule::EvenOdd => {
                coverage &= 511;
                if coverage > 256 {
                    coverage = 0;
                } else if coverage == 256 {
                    coverage = 255;
                }
            }
            FillRule::NonZero => {
                if coverage >= 256 {
                    coverage = 255;
                }
            }
        }
        if coverage == 0 {
            return;
        }
        let coverage = coverage as u8;

        // Back to absolute pixel coordinates for the sink.
        let y = y + self.min_ey;
        let mut x = x + self.min_ex;
        let mut remaining = count;

        // Extend the previous span when this run continues it at the same
        // coverage, within the per-span length cap.
        if self.num_spans > 0 && self.span_y == y {
            let last = &mut self.spans[self.num_spans - 1];
            if i32::from(last.x) + i32::from(last.len) == x && last.coverage == coverage {
                let take = remaining.min(255 - i32::from(last.len));
                if take > 0 {
                    last.len += take as i16;
                    x += take;
                    remaining -= take;
                }
            }
        }

        while remaining > 0 {
            if self.span_y != y || self.num_spans >= MAX_SPANS {
                self.flush_spans();
                self.span_y = y;
            }
            let take = remaining.min(255);
            self.spans[self.num_spans] = Span {
                x: x as i16,
                len: take as i16,
                coverage,
            };
            self.num_spans += 1;
            x += take;
            remaining -= take;
        }
    }

    pub(crate) fn flush_spans(&mut self) {
        if self.num_spans > 0 {
            self.sink.spans(self.span_y, &self.spans[..self.num_spans]);
            self.num_spans = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(x: i32, y: i32, area: i32, cover: i32) -> Cell {
        Cell { x, y, area, cover }
    }

    #[test]
    fn test_sort_orders_by_y_then_x() {
        let mut cells = vec![
            cell(3, 1, 0, 0),
            cell(0, 2, 0, 0),
            cell(1, 0, 0, 0),
            cell(0, 0, 0, 0),
            cell(2, 1, 0, 0),
        ];
        sort_cells(&mut cells);
        let order: Vec<(i32, i32)> = cells.iter().map(|c| (c.y, c.x)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 2), (1, 3), (2, 0)]);
    }

    #[test]
    fn test_sort_large_shuffled() {
        // Deterministic pseudo-shuffle, big enough to need several gaps.
        let mut cells: Vec<Cell> = (0..257)
            .map(|i| {
                let k = (i * 101) % 257;
                cell(k % 16, k / 16, 0, 0)
            })
            .collect();
        sort_cells(&mut cells);
        for pair in cells.windows(2) {
            assert!(
                (pair[0].y, pair[0].x) <= (pair[1].y, pair[1].x),
                "mis-ordered: {:?}",
                pair
            );
        }
    }

    #[test]
    fn test_sort_empty_and_single() {
        let mut none: Vec<Cell> = vec![];
        sort_cells(&mut none);
        let mut one = vec![cell(5, 5, 1, 1)];
        sort_cells(&mut one);
        assert_eq!(one[0].x, 5);
    }
}
