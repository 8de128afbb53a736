//! Outline decomposition
//!
//! Walks every contour of an outline and replays it as pen events. The
//! interesting part is the tag state machine: TrueType-style contours may
//! start on an off-curve conic control, chain conic controls with implied
//! on points between them, and spell cubics as exactly two controls
//! followed by an on point. The walker sorts all of that out and always
//! closes each contour back to its chosen start vertex.

use crate::error::{RasterError, Result};
use crate::outline::{OutlineRef, Point, TagKind};
use crate::traits::OutlinePen;

/// Per-emitter coordinate transform: `(raw << shift) - delta`, applied to
/// both axes before a point reaches the pen. A negative shift divides. The
/// identity transform is the default.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Transform {
    pub shift: i32,
    pub delta: i32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform { shift: 0, delta: 0 };

    /// Pure upscale by `shift` bits.
    pub const fn upscale(shift: i32) -> Transform {
        Transform { shift, delta: 0 }
    }

    #[inline]
    fn scale(self, raw: i32) -> i32 {
        let shifted = if self.shift >= 0 {
            raw << self.shift
        } else {
            raw >> -self.shift
        };
        shifted - self.delta
    }

    #[inline]
    fn apply(self, p: Point) -> Point {
        Point::from_raw(self.scale(p.x.raw()), self.scale(p.y.raw()))
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Phase {
    /// The previous point was on the curve.
    OnPoint,
    /// The previous point was a conic control.
    Conic,
    /// The previous point was the first cubic control.
    Cubic,
    /// The two previous points were cubic controls.
    Cubic2,
}

/// Walk `outline` and emit its segments into `pen`.
///
/// Start-vertex selection per contour:
/// - an on-curve first point starts the contour;
/// - a conic-control first point hands the start to the last point when
///   that one is on-curve, otherwise to the midpoint of first and last;
/// - a cubic-control first point is invalid.
///
/// The first pen error aborts the walk. A tag sequence the state machine
/// cannot accept yields [`RasterError::InvalidOutline`].
pub fn decompose<P: OutlinePen>(
    outline: OutlineRef<'_>,
    pen: &mut P,
    transform: Transform,
) -> Result<()> {
    let points = outline.points();
    let tags = outline.tags();

    log::trace!(
        "decompose: {} contours, {} points",
        outline.contours().len(),
        points.len()
    );

    let mut first = 0usize;
    for &end in outline.contours() {
        let last = end as usize;

        let v_first = transform.apply(points[first]);
        let v_last = transform.apply(points[last]);
        let mut v_start = v_first;
        let mut v_control = v_first;
        let mut v_control2 = v_first;

        let first_kind = tags[first].kind();
        let mut phase = match first_kind {
            TagKind::Cubic => return Err(RasterError::InvalidOutline),
            TagKind::Conic => {
                if tags[last].kind() == TagKind::On {
                    // Start at the last point if it is on the curve.
                    v_start = v_last;
                } else {
                    // Both ends are conic controls: start at their middle
                    // and close against that synthetic vertex.
                    v_start = Point::midpoint(v_start, v_last);
                }
                Phase::Conic
            }
            TagKind::On => Phase::OnPoint,
        };

        pen.move_to(v_start)?;

        let mut index = first;
        while index < last {
            index += 1;
            let point = transform.apply(points[index]);
            let kind = tags[index].kind();

            phase = match phase {
                Phase::OnPoint => match kind {
                    TagKind::On => {
                        pen.line_to(point)?;
                        Phase::OnPoint
                    }
                    TagKind::Conic => {
                        v_control = point;
                        Phase::Conic
                    }
                    TagKind::Cubic => {
                        v_control = point;
                        Phase::Cubic
                    }
                },
                Phase::Conic => match kind {
                    TagKind::On => {
                        pen.conic_to(v_control, point)?;
                        Phase::OnPoint
                    }
                    TagKind::Conic => {
                        // Two successive conic controls imply an on point
                        // halfway between them.
                        let middle = Point::midpoint(v_control, point);
                        pen.conic_to(v_control, middle)?;
                        v_control = point;
                        Phase::Conic
                    }
                    TagKind::Cubic => return Err(RasterError::InvalidOutline),
                },
                Phase::Cubic => {
                    if kind != TagKind::Cubic {
                        return Err(RasterError::InvalidOutline);
                    }
                    v_control2 = point;
                    Phase::Cubic2
                }
                Phase::Cubic2 => {
                    if kind != TagKind::On {
                        return Err(RasterError::InvalidOutline);
                    }
                    pen.cubic_to(v_control, v_control2, point)?;
                    Phase::OnPoint
                }
            };
        }

        // Close the contour against its start vertex. When the contour
        // began on a conic control the walk already ended on the start
        // vertex, so the on state has nothing left to emit.
        match phase {
            Phase::OnPoint => {
                if first_kind == TagKind::On {
                    pen.line_to(v_first)?;
                }
            }
            Phase::Conic => pen.conic_to(v_control, v_start)?,
            Phase::Cubic2 => {
                if first_kind != TagKind::On {
                    return Err(RasterError::InvalidOutline);
                }
                pen.cubic_to(v_control, v_control2, v_first)?;
            }
            Phase::Cubic => return Err(RasterError::InvalidOutline),
        }

        first = last + 1;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{Outline, OutlineFlags, PointTag};

    fn pt(x: i32, y: i32) -> Point {
        Point::from_raw(x, y)
    }

    #[derive(Debug, PartialEq, Eq)]
    enum Event {
        Move(Point),
        Line(Point),
        Conic(Point, Point),
        Cubic(Point, Point, Point),
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
    }

    impl OutlinePen for Recorder {
        fn move_to(&mut self, to: Point) -> Result<()> {
            self.events.push(Event::Move(to));
            Ok(())
        }

        fn line_to(&mut self, to: Point) -> Result<()> {
            self.events.push(Event::Line(to));
            Ok(())
        }

        fn conic_to(&mut self, control: Point, to: Point) -> Result<()> {
            self.events.push(Event::Conic(control, to));
            Ok(())
        }

        fn cubic_to(&mut self, c1: Point, c2: Point, to: Point) -> Result<()> {
            self.events.push(Event::Cubic(c1, c2, to));
            Ok(())
        }
    }

    fn walk(points: &[Point], tags: &[PointTag]) -> Result<Vec<Event>> {
        let mut outline = Outline::new();
        outline.add_contour(points, tags)?;
        let mut pen = Recorder::default();
        decompose(outline.view()?, &mut pen, Transform::IDENTITY)?;
        Ok(pen.events)
    }

    #[test]
    fn test_polygon_closes_with_line() {
        let events = walk(
            &[pt(0, 0), pt(64, 0), pt(64, 64)],
            &[PointTag::ON, PointTag::ON, PointTag::ON],
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                Event::Move(pt(0, 0)),
                Event::Line(pt(64, 0)),
                Event::Line(pt(64, 64)),
                Event::Line(pt(0, 0)),
            ]
        );
    }

    #[test]
    fn test_conic_chain_inserts_midpoints() {
        // on, conic, conic, on: the two controls imply an on point between
        // them.
        let events = walk(
            &[pt(0, 0), pt(32, 64), pt(96, 64), pt(128, 0)],
            &[PointTag::ON, PointTag::CONIC, PointTag::CONIC, PointTag::ON],
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                Event::Move(pt(0, 0)),
                Event::Conic(pt(32, 64), pt(64, 64)),
                Event::Conic(pt(96, 64), pt(128, 0)),
                Event::Line(pt(0, 0)),
            ]
        );
    }

    #[test]
    fn test_conic_first_point_starts_at_last_on() {
        // First point is a conic control, last is on-curve: the walk
        // starts there and the contour needs no extra closing segment.
        let events = walk(
            &[pt(64, 64), pt(128, 0), pt(0, 0)],
            &[PointTag::CONIC, PointTag::ON, PointTag::ON],
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                Event::Move(pt(0, 0)),
                Event::Conic(pt(64, 64), pt(128, 0)),
                Event::Line(pt(0, 0)),
            ]
        );
    }

    #[test]
    fn test_conic_first_and_last_start_at_midpoint() {
        let events = walk(
            &[pt(0, 64), pt(64, 0), pt(128, 64)],
            &[PointTag::CONIC, PointTag::ON, PointTag::CONIC],
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                Event::Move(pt(64, 64)),
                Event::Conic(pt(0, 64), pt(64, 0)),
                Event::Conic(pt(128, 64), pt(64, 64)),
            ]
        );
    }

    #[test]
    fn test_cubic_sequence() {
        let events = walk(
            &[pt(0, 0), pt(0, 64), pt(64, 64), pt(64, 0)],
            &[PointTag::ON, PointTag::CUBIC, PointTag::CUBIC, PointTag::ON],
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                Event::Move(pt(0, 0)),
                Event::Cubic(pt(0, 64), pt(64, 64), pt(64, 0)),
                Event::Line(pt(0, 0)),
            ]
        );
    }

    #[test]
    fn test_cubic_closure() {
        // The trailing cubic pair closes against the first point.
        let events = walk(
            &[pt(0, 0), pt(64, 0), pt(64, 64), pt(0, 64)],
            &[PointTag::ON, PointTag::ON, PointTag::CUBIC, PointTag::CUBIC],
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                Event::Move(pt(0, 0)),
                Event::Line(pt(64, 0)),
                Event::Cubic(pt(64, 64), pt(0, 64), pt(0, 0)),
            ]
        );
    }

    #[test]
    fn test_invalid_sequences() {
        // Contour starting on a cubic control.
        assert_eq!(
            walk(&[pt(0, 0), pt(64, 0)], &[PointTag::CUBIC, PointTag::ON]).unwrap_err(),
            RasterError::InvalidOutline
        );
        // Conic control followed by a cubic control.
        assert_eq!(
            walk(
                &[pt(0, 0), pt(32, 32), pt(64, 64), pt(96, 0)],
                &[PointTag::ON, PointTag::CONIC, PointTag::CUBIC, PointTag::ON],
            )
            .unwrap_err(),
            RasterError::InvalidOutline
        );
        // Lone cubic control before an on point.
        assert_eq!(
            walk(
                &[pt(0, 0), pt(32, 32), pt(64, 0)],
                &[PointTag::ON, PointTag::CUBIC, PointTag::ON],
            )
            .unwrap_err(),
            RasterError::InvalidOutline
        );
        // Contour ending after a single cubic control.
        assert_eq!(
            walk(
                &[pt(0, 0), pt(32, 32)],
                &[PointTag::ON, PointTag::CUBIC],
            )
            .unwrap_err(),
            RasterError::InvalidOutline
        );
    }

    #[test]
    fn test_transform_upscale_and_delta() {
        let mut outline = Outline::with_flags(OutlineFlags::NONE);
        outline
            .add_polygon(&[pt(0, 0), pt(64, 0), pt(64, 64)])
            .unwrap();
        let mut pen = Recorder::default();
        decompose(
            outline.view().unwrap(),
            &mut pen,
            Transform { shift: 1, delta: 32 },
        )
        .unwrap();
        assert_eq!(pen.events[0], Event::Move(pt(-32, -32)));
        assert_eq!(pen.events[1], Event::Line(pt(96, -32)));
    }
}
