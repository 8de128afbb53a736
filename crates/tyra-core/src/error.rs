//! Error types for Tyra

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RasterError>;

/// Everything that can go wrong between an outline and its spans.
///
/// The scan converter deliberately keeps this list short: a render either
/// completes, or fails with one of these and leaves the target in an
/// indeterminate (but not corrupted) state. Callers that zero their bitmap
/// before rendering are robust to partial failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RasterError {
    /// The outline's tag sequence or contour table is inconsistent: a
    /// contour starting on a cubic control, a cubic control not followed by
    /// a second cubic control and an on point, or contour ends that do not
    /// match the point count.
    #[error("outline structure is inconsistent")]
    InvalidOutline,

    /// The cell array filled up mid-render. Re-invoke with a larger pool.
    #[error("render pool exhausted during scan conversion")]
    PoolOverflow,

    /// The render pool handed to the raster is below the 4 KiB minimum.
    #[error("render pool is smaller than the 4 KiB minimum")]
    PoolTooSmall,

    /// The target bitmap cannot be written: zero pitch, a pitch narrower
    /// than a row, a short buffer, or a pixel mode the renderer does not
    /// produce.
    #[error("target bitmap is unusable")]
    InvalidBitmap,

    /// The renderer was handed something that is not an outline. The gray
    /// raster only converts outlines; the engine's driver layer surfaces
    /// this when dispatching other glyph image formats.
    #[error("glyph image is not an outline")]
    InvalidGlyphFormat,
}
