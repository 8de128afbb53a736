//! Integration tests for the gray scan converter
//!
//! Exercises whole renders through both the span path and the built-in
//! blitter, with expected values computed from the cell algebra at the
//! 128-steps-per-pixel grid.

use tyra_core::{Bitmap, Outline, OutlineFlags, Point, PointTag, RasterError, Span};
use tyra_core::traits::SpanSink;
use tyra_render_gray::{ClipBox, GrayRaster, RenderPool};

fn pt(x: i32, y: i32) -> Point {
    Point::from_raw(x, y)
}

/// Collects every span as (y, x, len, coverage).
#[derive(Default)]
struct Collector {
    spans: Vec<(i32, i16, i16, u8)>,
}

impl SpanSink for Collector {
    fn spans(&mut self, y: i32, spans: &[Span]) {
        for s in spans {
            self.spans.push((y, s.x, s.len, s.coverage));
        }
    }
}

fn render_collect(outline: &Outline, clip: ClipBox) -> Vec<(i32, i16, i16, u8)> {
    let mut raster = GrayRaster::new(RenderPool::with_bytes(64 * 1024)).unwrap();
    let mut sink = Collector::default();
    raster
        .render_spans(outline.view().unwrap(), clip, &mut sink)
        .unwrap();
    sink.spans
}

#[test]
fn unit_square_covers_one_pixel() {
    let mut outline = Outline::new();
    outline
        .add_polygon(&[pt(0, 0), pt(64, 0), pt(64, 64), pt(0, 64)])
        .unwrap();
    let spans = render_collect(&outline, ClipBox::new(0, 0, 4, 4));
    assert_eq!(spans, vec![(0, 0, 1, 255)]);
}

#[test]
fn right_triangle_two_pixels() {
    let mut outline = Outline::new();
    outline
        .add_polygon(&[pt(0, 0), pt(128, 0), pt(0, 128)])
        .unwrap();
    let spans = render_collect(&outline, ClipBox::new(0, 0, 4, 4));
    // Half-covered pixels come out at exactly 128 on the 2^7 grid.
    assert_eq!(
        spans,
        vec![(0, 0, 1, 255), (0, 1, 1, 128), (1, 0, 1, 128)]
    );
}

#[test]
fn triangle_through_builtin_blitter() {
    let mut outline = Outline::new();
    outline
        .add_polygon(&[pt(0, 0), pt(128, 0), pt(0, 128)])
        .unwrap();
    let mut raster = GrayRaster::new(RenderPool::with_bytes(64 * 1024)).unwrap();
    let mut pixels = [0u8; 16];
    let mut bitmap = Bitmap::new_gray(4, 4, &mut pixels).unwrap();
    raster.render(outline.view().unwrap(), &mut bitmap).unwrap();
    // Positive pitch: scanline 0 lands on the last buffer row.
    assert_eq!(&pixels[12..16], &[255, 128, 0, 0]);
    assert_eq!(&pixels[8..12], &[128, 0, 0, 0]);
    assert_eq!(&pixels[0..8], &[0; 8]);
}

#[test]
fn diamond_inside_one_pixel() {
    // Centered on the middle of pixel (0, 0); half the pixel is covered.
    let mut outline = Outline::new();
    outline
        .add_polygon(&[pt(32, 0), pt(64, 32), pt(32, 64), pt(0, 32)])
        .unwrap();
    let spans = render_collect(&outline, ClipBox::new(0, 0, 4, 4));
    assert_eq!(spans, vec![(0, 0, 1, 128)]);
}

#[test]
fn diamond_straddling_pixel_corner_is_symmetric() {
    // Centered on the corner shared by four pixels: each is half covered
    // and equal runs merge into one span per scanline.
    let mut outline = Outline::new();
    outline
        .add_polygon(&[pt(64, 0), pt(128, 64), pt(64, 128), pt(0, 64)])
        .unwrap();
    let spans = render_collect(&outline, ClipBox::new(0, 0, 4, 4));
    assert_eq!(spans, vec![(0, 0, 2, 128), (1, 0, 2, 128)]);
}

#[test]
fn nested_squares_even_odd_ring() {
    let mut outline = Outline::with_flags(OutlineFlags::EVEN_ODD_FILL);
    outline
        .add_polygon(&[pt(0, 0), pt(256, 0), pt(256, 256), pt(0, 256)])
        .unwrap();
    outline
        .add_polygon(&[pt(64, 64), pt(192, 64), pt(192, 192), pt(64, 192)])
        .unwrap();
    let spans = render_collect(&outline, ClipBox::new(0, 0, 4, 4));
    assert_eq!(
        spans,
        vec![
            (0, 0, 4, 255),
            (1, 0, 1, 255),
            (1, 3, 1, 255),
            (2, 0, 1, 255),
            (2, 3, 1, 255),
            (3, 0, 4, 255),
        ]
    );
}

#[test]
fn nested_squares_non_zero_fills_solid() {
    let mut outline = Outline::new();
    outline
        .add_polygon(&[pt(0, 0), pt(256, 0), pt(256, 256), pt(0, 256)])
        .unwrap();
    outline
        .add_polygon(&[pt(64, 64), pt(192, 64), pt(192, 192), pt(64, 192)])
        .unwrap();
    let spans = render_collect(&outline, ClipBox::new(0, 0, 4, 4));
    // Same winding direction: non-zero fill sees winding 2 inside and
    // stays opaque.
    assert_eq!(
        spans,
        vec![
            (0, 0, 4, 255),
            (1, 0, 4, 255),
            (2, 0, 4, 255),
            (3, 0, 4, 255),
        ]
    );
}

#[test]
fn quadratic_arch_total_coverage() {
    // Arch from (0,0) to (2,0) pixels with the control half a pixel up:
    // enclosed area is 2/3 * 2 * 1/2 px^2, i.e. a coverage sum near
    // 2/3 * 256.
    let mut outline = Outline::new();
    outline
        .add_contour(
            &[pt(0, 0), pt(64, 64), pt(128, 0)],
            &[PointTag::ON, PointTag::CONIC, PointTag::ON],
        )
        .unwrap();
    let spans = render_collect(&outline, ClipBox::new(0, 0, 4, 4));
    let total: i32 = spans
        .iter()
        .map(|&(_, _, len, cov)| i32::from(len) * i32::from(cov))
        .sum();
    assert!((155..=180).contains(&total), "total coverage {total}");
    // Symmetric arch: the two pixels carry equal coverage and merge into
    // a single span.
    assert_eq!(spans, vec![(0, 0, 2, 80)]);
}

#[test]
fn degenerate_conic_matches_straight_line() {
    let mut curved = Outline::new();
    curved
        .add_contour(
            &[pt(0, 0), pt(64, 64), pt(128, 128), pt(0, 128)],
            &[PointTag::ON, PointTag::CONIC, PointTag::ON, PointTag::ON],
        )
        .unwrap();
    let mut straight = Outline::new();
    straight
        .add_polygon(&[pt(0, 0), pt(128, 128), pt(0, 128)])
        .unwrap();
    let clip = ClipBox::new(0, 0, 4, 4);
    assert_eq!(render_collect(&curved, clip), render_collect(&straight, clip));
}

#[test]
fn renders_are_deterministic() {
    let mut outline = Outline::new();
    outline
        .add_contour(
            &[pt(10, 3), pt(200, 37), pt(143, 181), pt(5, 140)],
            &[PointTag::ON, PointTag::CONIC, PointTag::ON, PointTag::CONIC],
        )
        .unwrap();
    let clip = ClipBox::new(0, 0, 8, 8);
    let first = render_collect(&outline, clip);
    let second = render_collect(&outline, clip);
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn whole_pixel_translation_shifts_spans() {
    let mut outline = Outline::new();
    outline
        .add_polygon(&[pt(0, 0), pt(128, 0), pt(0, 128)])
        .unwrap();
    let clip = ClipBox::new(0, 0, 8, 8);
    let base = render_collect(&outline, clip);

    let mut moved = outline.clone();
    moved.translate(tyra_core::F26Dot6::from_int(2), tyra_core::F26Dot6::from_int(1));
    let shifted = render_collect(&moved, clip);

    let expected: Vec<_> = base
        .iter()
        .map(|&(y, x, len, cov)| (y + 1, x + 2, len, cov))
        .collect();
    assert_eq!(shifted, expected);
}

#[test]
fn reversed_contour_same_coverage() {
    let mut outline = Outline::new();
    outline
        .add_polygon(&[pt(0, 0), pt(128, 0), pt(64, 128)])
        .unwrap();
    let clip = ClipBox::new(0, 0, 4, 4);
    let forward = render_collect(&outline, clip);

    let mut reversed = outline.clone();
    reversed.reverse();
    assert!(reversed.flags().contains(OutlineFlags::REVERSE_FILL));
    assert_eq!(render_collect(&reversed, clip), forward);
}

#[test]
fn empty_and_degenerate_outlines() {
    let clip = ClipBox::new(0, 0, 4, 4);

    let empty = Outline::new();
    assert!(render_collect(&empty, clip).is_empty());

    let mut point = Outline::new();
    point.add_contour(&[pt(100, 100)], &[PointTag::ON]).unwrap();
    assert!(render_collect(&point, clip).is_empty());
}

#[test]
fn outline_outside_clip_emits_nothing() {
    let mut outline = Outline::new();
    outline
        .add_polygon(&[pt(640, 640), pt(768, 640), pt(640, 768)])
        .unwrap();
    assert!(render_collect(&outline, ClipBox::new(0, 0, 4, 4)).is_empty());
}

#[test]
fn spans_are_ordered_and_disjoint() {
    let mut outline = Outline::new();
    outline
        .add_contour(
            &[pt(16, 0), pt(496, 23), pt(400, 490), pt(0, 350)],
            &[PointTag::ON, PointTag::CONIC, PointTag::ON, PointTag::CONIC],
        )
        .unwrap();
    let spans = render_collect(&outline, ClipBox::new(0, 0, 8, 8));
    assert!(!spans.is_empty());
    for pair in spans.windows(2) {
        let (y0, x0, len0, _) = pair[0];
        let (y1, x1, _, _) = pair[1];
        assert!(y1 >= y0);
        if y1 == y0 {
            assert!(i32::from(x1) >= i32::from(x0) + i32::from(len0));
        }
    }
}

#[test]
fn pool_overflow_reported_and_recoverable() {
    // A 300-pixel right triangle needs far more cells than a minimum pool
    // holds.
    let mut outline = Outline::new();
    outline
        .add_polygon(&[pt(0, 0), pt(19200, 0), pt(0, 19200)])
        .unwrap();
    let clip = ClipBox::new(0, 0, 300, 300);

    let mut raster = GrayRaster::new(RenderPool::with_bytes(4096)).unwrap();
    let mut sink = Collector::default();
    assert_eq!(
        raster
            .render_spans(outline.view().unwrap(), clip, &mut sink)
            .unwrap_err(),
        RasterError::PoolOverflow
    );

    // Rebinding a bigger pool makes the same render succeed.
    let small = raster.reset(RenderPool::with_bytes(64 * 1024)).unwrap();
    assert_eq!(small.byte_size(), 4096);
    let mut sink = Collector::default();
    raster
        .render_spans(outline.view().unwrap(), clip, &mut sink)
        .unwrap();
    assert!(!sink.spans.is_empty());
}

#[test]
fn wide_runs_chunk_at_255() {
    // A solid 300-pixel-wide band: flat runs must arrive as <= 255-pixel
    // spans that tile the row exactly.
    let mut outline = Outline::new();
    outline
        .add_polygon(&[pt(0, 0), pt(19200, 0), pt(19200, 64), pt(0, 64)])
        .unwrap();
    let spans = render_collect(&outline, ClipBox::new(0, 0, 300, 1));
    assert!(spans.iter().all(|&(_, _, len, _)| len <= 255));
    let total: i32 = spans
        .iter()
        .filter(|&&(_, _, _, cov)| cov == 255)
        .map(|&(_, _, len, _)| i32::from(len))
        .sum();
    assert_eq!(total, 300);
}
