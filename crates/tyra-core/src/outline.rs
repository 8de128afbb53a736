//! Outline data model
//!
//! An outline is a flat, read-only record: one run of points, one parallel
//! run of tag bytes, and a table of end-of-contour indices. Glyph loaders
//! produce them; the scan converter consumes them through [`OutlineRef`]
//! without ever mutating or owning the buffers. [`Outline`] is the owned
//! counterpart for callers that assemble geometry themselves.

use crate::error::{RasterError, Result};
use crate::fixed::F26Dot6;

/// A 2-D vector in 26.6 font coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: F26Dot6,
    pub y: F26Dot6,
}

impl Point {
    #[inline]
    pub const fn new(x: F26Dot6, y: F26Dot6) -> Self {
        Point { x, y }
    }

    /// Both coordinates from raw 26.6 bits.
    #[inline]
    pub const fn from_raw(x: i32, y: i32) -> Self {
        Point {
            x: F26Dot6::from_raw(x),
            y: F26Dot6::from_raw(y),
        }
    }

    #[inline]
    pub const fn midpoint(a: Point, b: Point) -> Point {
        Point {
            x: F26Dot6::midpoint(a.x, b.x),
            y: F26Dot6::midpoint(a.y, b.y),
        }
    }
}

/// What a point means on its contour.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TagKind {
    /// The point lies on the curve.
    On,
    /// Off-curve control of a quadratic (conic) arc.
    Conic,
    /// Off-curve control of a cubic arc.
    Cubic,
}

/// One tag byte per outline point.
///
/// Bits 0-1 select the [`TagKind`]; bits 3-4 belong to an external hinter
/// and travel through the engine untouched (nothing here ever writes a
/// tag). Bit pattern 3 is reserved and reads as a cubic control.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct PointTag(pub u8);

impl PointTag {
    pub const ON: PointTag = PointTag(1);
    pub const CONIC: PointTag = PointTag(0);
    pub const CUBIC: PointTag = PointTag(2);

    #[inline]
    pub const fn kind(self) -> TagKind {
        match self.0 & 0x03 {
            1 => TagKind::On,
            0 => TagKind::Conic,
            _ => TagKind::Cubic,
        }
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// Outline-level processing flags.
///
/// Only [`EVEN_ODD_FILL`](OutlineFlags::EVEN_ODD_FILL) changes what the
/// gray scan converter computes; the remaining recognized bits are hints
/// for other renderers and pass through unchanged.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct OutlineFlags(pub u32);

impl OutlineFlags {
    pub const NONE: OutlineFlags = OutlineFlags(0);
    pub const EVEN_ODD_FILL: OutlineFlags = OutlineFlags(0x2);
    pub const REVERSE_FILL: OutlineFlags = OutlineFlags(0x4);
    pub const IGNORE_DROPOUTS: OutlineFlags = OutlineFlags(0x8);
    pub const HIGH_PRECISION: OutlineFlags = OutlineFlags(0x100);
    pub const SINGLE_PASS: OutlineFlags = OutlineFlags(0x200);

    #[inline]
    pub const fn contains(self, other: OutlineFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn union(self, other: OutlineFlags) -> OutlineFlags {
        OutlineFlags(self.0 | other.0)
    }

    #[inline]
    pub const fn toggle(self, other: OutlineFlags) -> OutlineFlags {
        OutlineFlags(self.0 ^ other.0)
    }

    /// The fill rule these flags select.
    #[inline]
    pub const fn fill_rule(self) -> FillRule {
        if self.contains(Self::EVEN_ODD_FILL) {
            FillRule::EvenOdd
        } else {
            FillRule::NonZero
        }
    }
}

/// How a signed winding number turns into coverage.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FillRule {
    /// Algebraic winding: any non-zero winding is inside.
    #[default]
    NonZero,
    /// Parity: odd winding is inside.
    EvenOdd,
}

/// Axis-aligned box enclosing every outline point, controls included.
///
/// This is the control box of the glossary: cheap, conservative, and used
/// for clipping. It is not a tight bounding box of the rendered shape.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ControlBox {
    pub x_min: F26Dot6,
    pub y_min: F26Dot6,
    pub x_max: F26Dot6,
    pub y_max: F26Dot6,
}

/// Maximum point or contour count; the record uses signed 16-bit counts.
pub const MAX_POINTS: usize = i16::MAX as usize;

/// A borrowed, validated outline.
///
/// The constructor checks the structural invariants once, so downstream
/// consumers can walk contours without re-validating: `points` and `tags`
/// are the same length, contour ends strictly increase, and the last end
/// names the last point.
#[derive(Copy, Clone, Debug)]
pub struct OutlineRef<'a> {
    points: &'a [Point],
    tags: &'a [PointTag],
    contours: &'a [u16],
    flags: OutlineFlags,
}

impl<'a> OutlineRef<'a> {
    pub fn new(
        points: &'a [Point],
        tags: &'a [PointTag],
        contours: &'a [u16],
        flags: OutlineFlags,
    ) -> Result<Self> {
        if points.len() != tags.len()
            || points.len() > MAX_POINTS
            || contours.len() > MAX_POINTS
        {
            return Err(RasterError::InvalidOutline);
        }
        if contours.is_empty() {
            if !points.is_empty() {
                return Err(RasterError::InvalidOutline);
            }
        } else {
            let mut previous: i32 = -1;
            for &end in contours {
                if i32::from(end) <= previous {
                    return Err(RasterError::InvalidOutline);
                }
                previous = i32::from(end);
            }
            if previous as usize != points.len().wrapping_sub(1) {
                return Err(RasterError::InvalidOutline);
            }
        }
        Ok(OutlineRef {
            points,
            tags,
            contours,
            flags,
        })
    }

    #[inline]
    pub fn points(&self) -> &'a [Point] {
        self.points
    }

    #[inline]
    pub fn tags(&self) -> &'a [PointTag] {
        self.tags
    }

    #[inline]
    pub fn contours(&self) -> &'a [u16] {
        self.contours
    }

    #[inline]
    pub fn flags(&self) -> OutlineFlags {
        self.flags
    }

    #[inline]
    pub fn fill_rule(&self) -> FillRule {
        self.flags.fill_rule()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() || self.contours.is_empty()
    }

    /// Compute the control box. An empty outline collapses to the origin.
    pub fn control_box(&self) -> ControlBox {
        let mut iter = self.points.iter();
        let Some(first) = iter.next() else {
            return ControlBox::default();
        };
        let mut cbox = ControlBox {
            x_min: first.x,
            y_min: first.y,
            x_max: first.x,
            y_max: first.y,
        };
        for p in iter {
            cbox.x_min = cbox.x_min.min(p.x);
            cbox.x_max = cbox.x_max.max(p.x);
            cbox.y_min = cbox.y_min.min(p.y);
            cbox.y_max = cbox.y_max.max(p.y);
        }
        cbox
    }
}

/// Owned outline storage, built contour by contour.
///
/// Loaders that stream geometry out of font tables use their own storage
/// and hand the raster an [`OutlineRef`]; this type exists for everyone
/// else: tools, tests, and callers composing synthetic shapes.
#[derive(Clone, Debug, Default)]
pub struct Outline {
    points: Vec<Point>,
    tags: Vec<PointTag>,
    contours: Vec<u16>,
    flags: OutlineFlags,
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flags(flags: OutlineFlags) -> Self {
        Outline {
            flags,
            ..Self::default()
        }
    }

    pub fn set_flags(&mut self, flags: OutlineFlags) {
        self.flags = flags;
    }

    pub fn flags(&self) -> OutlineFlags {
        self.flags
    }

    /// Append one contour with explicit tags.
    pub fn add_contour(&mut self, points: &[Point], tags: &[PointTag]) -> Result<()> {
        if points.is_empty()
            || points.len() != tags.len()
            || self.points.len() + points.len() > MAX_POINTS
        {
            return Err(RasterError::InvalidOutline);
        }
        self.points.extend_from_slice(points);
        self.tags.extend_from_slice(tags);
        self.contours.push((self.points.len() - 1) as u16);
        Ok(())
    }

    /// Append a closed polygon: every vertex on-curve.
    pub fn add_polygon(&mut self, points: &[Point]) -> Result<()> {
        let tags = vec![PointTag::ON; points.len()];
        self.add_contour(points, &tags)
    }

    /// Shift every point, controls included.
    pub fn translate(&mut self, dx: F26Dot6, dy: F26Dot6) {
        for p in &mut self.points {
            p.x = p.x + dx;
            p.y = p.y + dy;
        }
    }

    /// Reverse the drawing direction of every contour and flag the outline
    /// as reversed so fill semantics stay the same.
    pub fn reverse(&mut self) {
        let mut first = 0usize;
        for &end in &self.contours {
            let last = end as usize;
            self.points[first..=last].reverse();
            self.tags[first..=last].reverse();
            first = last + 1;
        }
        self.flags = self.flags.toggle(OutlineFlags::REVERSE_FILL);
    }

    /// Validate the record; same checks as [`OutlineRef::new`].
    pub fn check(&self) -> Result<()> {
        self.view().map(|_| ())
    }

    /// Borrow as a validated read-only view.
    pub fn view(&self) -> Result<OutlineRef<'_>> {
        OutlineRef::new(&self.points, &self.tags, &self.contours, self.flags)
    }
}
