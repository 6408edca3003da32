//! Construction-time error type.
//!
//! Drawing paths never fail: degenerate input is resolved locally and the
//! framebuffer is simply left untouched. The only fallible operations are
//! constructors taking user-supplied dimensions, which fail fast here.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("raster dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("pattern source must be non-empty, got {width}x{height} with {pixels} pixels")]
    InvalidPatternSource {
        width: usize,
        height: usize,
        pixels: usize,
    },
}
