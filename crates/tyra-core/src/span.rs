//! Gray spans
//!
//! The scan converter never touches pixels itself; it describes coverage
//! as horizontal runs and hands them to a sink in bounded batches.

/// A run of adjacent pixels on one scanline sharing a coverage value.
///
/// `coverage` is 0 (transparent) through 255 (opaque). A single emitted
/// span never exceeds 255 pixels; wider runs arrive as several spans.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub x: i16,
    pub len: i16,
    pub coverage: u8,
}

/// Upper bound on spans per sink invocation.
///
/// The sweeper batches spans per scanline and flushes whenever the batch
/// fills or the scanline changes, so a sink sees at most this many spans
/// per call and may be called several times for one scanline.
pub const MAX_SPANS: usize = 32;
