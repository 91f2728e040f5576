//
// Copyright 2023-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
//! Typed errors for every stage of the atlas pipeline.
//!
//! Each stage reports its own enum so callers can match on the failure they
//! care about; [`CompileError`] folds them together for the compiler.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while laying out glyph rectangles.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PackError {
    /// The packed rows need more vertical space than the configured ceiling.
    #[error("atlas height {required} exceeds the maximum of {limit} pixels, try increasing --max-width and --max-height")]
    AtlasTooLarge {
        /// Height the packed rows would occupy.
        required: i64,
        /// Configured maximum height.
        limit: i32,
    },

    /// A single glyph is wider than a whole atlas row.
    #[error("glyph U+{code:04X} is {width} pixels wide, wider than the maximum atlas width of {limit}")]
    GlyphTooWide {
        /// Character code of the offending glyph.
        code: u32,
        /// Bitmap width of the glyph.
        width: i32,
        /// Configured maximum width.
        limit: i32,
    },

    /// The atlas does not fit the 16-bit dimensions of the file header.
    #[error("atlas size {width}x{height} does not fit in 16-bit dimensions")]
    DimensionOverflow {
        /// Computed atlas width.
        width: i64,
        /// Computed atlas height.
        height: i64,
    },
}

/// Failures raised while writing glyph bitmaps into an atlas target.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompositeError {
    /// The destination rectangle is not fully inside the atlas grid.
    #[error("rectangle {x},{y} {width}x{height} lies outside the {atlas_width}x{atlas_height} atlas")]
    OutOfBounds {
        /// Left edge of the rejected rectangle.
        x: i32,
        /// Top edge of the rejected rectangle.
        y: i32,
        /// Width of the rejected rectangle.
        width: i32,
        /// Height of the rejected rectangle.
        height: i32,
        /// Width of the atlas grid.
        atlas_width: usize,
        /// Height of the atlas grid.
        atlas_height: usize,
    },

    /// The pixel buffer does not cover the destination rectangle exactly.
    #[error("expected {expected} coverage bytes, found {found}")]
    PixelCount {
        /// `width * height` of the destination rectangle.
        expected: usize,
        /// Length of the supplied buffer.
        found: usize,
    },

    /// The glyph sequence and the placement list disagree.
    #[error("glyph sequence does not match the packed placements (glyph #{index})")]
    PlacementMismatch {
        /// Index of the first glyph that disagrees.
        index: usize,
    },
}

/// Failures raised while encoding or decoding a `.bfa` file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The file does not start with `.bfa`.
    #[error("bad magic {0:02x?}, not a .bfa file")]
    BadMagic([u8; 4]),

    /// A section ends before its declared size.
    #[error("truncated {section}: needed {needed} bytes, {available} available")]
    Truncated {
        /// Name of the section being read.
        section: &'static str,
        /// Bytes the section requires.
        needed: usize,
        /// Bytes left in the input.
        available: usize,
    },

    /// The header names an addressing scheme this reader does not know.
    #[error("unknown map type {0}")]
    UnknownMapType(u8),

    /// The stored pixel blob is larger than the atlas grid.
    #[error("stored image size {stored} exceeds the {capacity} byte atlas grid")]
    ImageSizeMismatch {
        /// Declared blob size.
        stored: usize,
        /// `atlas_width * atlas_height`.
        capacity: usize,
    },

    /// Character codes are not strictly increasing.
    #[error("character codes are not strictly increasing at U+{0:04X}")]
    UnsortedCodes(u32),

    /// A character code cannot be addressed by the selected scheme.
    #[error("character code U+{code:04X} does not fit a {limit}-entry table")]
    CodeOutOfRange {
        /// The offending code.
        code: u32,
        /// Number of addressable codes.
        limit: u32,
    },

    /// More glyphs than the 16-bit glyph count can describe.
    #[error("{0} glyphs do not fit in a 16-bit glyph count")]
    TooManyGlyphs(usize),

    /// The atlas image does not match the declared dimensions.
    #[error("atlas image is {width}x{height}, which does not fit the header")]
    DimensionMismatch {
        /// Image width.
        width: usize,
        /// Image height.
        height: usize,
    },
}

/// Errors surfaced by [`crate::Compiler`] and the file helpers.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The compile configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The rasterizer rejected the font data.
    #[error("invalid font data: {0}")]
    InvalidFont(String),

    /// The font has no Unicode character map.
    #[error("font does not have a unicode character map")]
    MissingUnicodeMap,

    /// A pre-rasterized bitmap has the wrong number of bytes.
    #[error("expected {expected} bitmap bytes, found {found}")]
    InvalidBitmap {
        /// `width * height`.
        expected: usize,
        /// Length of the supplied buffer.
        found: usize,
    },

    /// Reading or writing a file failed.
    #[error("{}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Packing failed.
    #[error(transparent)]
    Pack(#[from] PackError),

    /// Writing bitmaps into the atlas failed.
    #[error(transparent)]
    Composite(#[from] CompositeError),

    /// Encoding the file failed.
    #[error(transparent)]
    Format(#[from] FormatError),
}

impl CompileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self { Self::Io { path: path.into(), source } }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn io_cause_is_reported_once() {
        let err = CompileError::io("/missing/font.bfa", std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"));
        assert_eq!(err.to_string(), "/missing/font.bfa");
        assert_eq!(err.source().map(|s| s.to_string()), Some("no such file".to_string()));

        let chain = anyhow::Error::from(err).context("failed to write the atlas");
        assert_eq!(format!("{:#}", chain), "failed to write the atlas: /missing/font.bfa: no such file");
    }

    #[test]
    fn font_errors_describe_the_data() {
        let err = CompileError::InvalidFont("bad table".into());
        assert_eq!(err.to_string(), "invalid font data: bad table");
    }
}
