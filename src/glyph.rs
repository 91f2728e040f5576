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
use super::*;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    /// Per-glyph flag bits stored in a [`GlyphRecord`].
    pub struct GlyphFlags : u16 {
        /// The glyph has no pixel data (zero width or height); only its metrics matter.
        const IS_SPACE = 0x1;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Metrics and atlas coordinates for a glyph, as stored in a `.bfa` file.
pub struct GlyphRecord {
    /// Left edge inside the atlas.
    pub x: u16,
    /// Top edge inside the atlas.
    pub y: u16,
    /// Bitmap width.
    pub w: u16,
    /// Bitmap height.
    pub h: u16,
    /// Horizontal offset from the pen origin to the bitmap's left edge.
    pub x_bearing: i16,
    /// Vertical offset from the baseline up to the bitmap's top edge.
    pub y_bearing: i16,
    /// Horizontal pen advance after drawing this glyph.
    pub advance: u16,
    /// Flag bits.
    pub flags: GlyphFlags,
}

impl GlyphRecord {
    /// Size of one record on disk.
    pub const SIZE: usize = 16;

    /// The all-zero record used for unpopulated dense table slots.
    pub const EMPTY: GlyphRecord = GlyphRecord {
        x: 0,
        y: 0,
        w: 0,
        h: 0,
        x_bearing: 0,
        y_bearing: 0,
        advance: 0,
        flags: GlyphFlags::empty(),
    };

    /// Returns true when the glyph carries no pixel data.
    pub fn is_space(&self) -> bool { self.flags.contains(GlyphFlags::IS_SPACE) }

    /// Returns the glyph rectangle inside the atlas.
    pub fn rect(&self) -> Recti { Recti::new(self.x as i32, self.y as i32, self.w as i32, self.h as i32) }

    /// Appends the little-endian encoding of the record.
    pub fn write_le(&self, out: &mut Vec<u8>) {
        for word in [
            self.x,
            self.y,
            self.w,
            self.h,
            self.x_bearing as u16,
            self.y_bearing as u16,
            self.advance,
            self.flags.bits(),
        ] {
            out.extend_from_slice(&word.to_le_bytes());
        }
    }

    /// Decodes a record from exactly [`GlyphRecord::SIZE`] bytes.
    pub fn read_le(bytes: &[u8; Self::SIZE]) -> Self {
        let word = |i: usize| u16::from_le_bytes([bytes[i * 2], bytes[i * 2 + 1]]);
        Self {
            x: word(0),
            y: word(1),
            w: word(2),
            h: word(3),
            x_bearing: word(4) as i16,
            y_bearing: word(5) as i16,
            advance: word(6),
            flags: GlyphFlags::from_bits_retain(word(7)),
        }
    }
}

impl Default for GlyphRecord {
    fn default() -> Self { Self::EMPTY }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
/// How a `.bfa` file maps a character code to its glyph record.
pub enum AddressingScheme {
    /// Direct 16384-entry table covering the start of the Basic Multilingual Plane.
    Dense16 = 0,
    /// Direct 256-entry table.
    Dense8 = 1,
    /// Sorted code index parallel to a compact record table.
    #[default]
    Sparse = 2,
}

impl AddressingScheme {
    /// Number of entries in a [`AddressingScheme::Dense16`] table.
    pub const DENSE16_LEN: usize = 16384;
    /// Number of entries in a [`AddressingScheme::Dense8`] table.
    pub const DENSE8_LEN: usize = 256;

    /// Exclusive upper bound of the character codes visited while compiling.
    pub fn code_limit(self) -> u32 {
        match self {
            AddressingScheme::Dense8 => Self::DENSE8_LEN as u32,
            AddressingScheme::Dense16 | AddressingScheme::Sparse => Self::DENSE16_LEN as u32,
        }
    }

    /// Fixed table length for dense schemes, `None` for [`AddressingScheme::Sparse`].
    pub fn dense_len(self) -> Option<usize> {
        match self {
            AddressingScheme::Dense16 => Some(Self::DENSE16_LEN),
            AddressingScheme::Dense8 => Some(Self::DENSE8_LEN),
            AddressingScheme::Sparse => None,
        }
    }

    /// Tag stored in the file header.
    pub fn tag(self) -> u8 { self as u8 }

    /// Parses a header tag.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(AddressingScheme::Dense16),
            1 => Some(AddressingScheme::Dense8),
            2 => Some(AddressingScheme::Sparse),
            _ => None,
        }
    }

    /// Command line token naming the scheme.
    pub fn name(self) -> &'static str {
        match self {
            AddressingScheme::Dense16 => "utf16",
            AddressingScheme::Dense8 => "ascii",
            AddressingScheme::Sparse => "mapped",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// A single-channel glyph bitmap, one coverage byte per pixel, row-major.
pub struct GlyphBitmap {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl GlyphBitmap {
    /// Wraps coverage bytes, checking that they cover `width * height` pixels.
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self, CompileError> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(CompileError::InvalidBitmap { expected, found: pixels.len() });
        }
        Ok(Self { width, height, pixels })
    }

    /// Creates a bitmap without pixels, as produced for blank glyphs like the space.
    pub fn blank(width: usize, height: usize) -> Self {
        let pixels = if width == 0 || height == 0 { Vec::new() } else { vec![0; width * height] };
        Self { width, height, pixels }
    }

    /// Bitmap width in pixels.
    pub fn width(&self) -> usize { self.width }

    /// Bitmap height in pixels.
    pub fn height(&self) -> usize { self.height }

    /// Coverage bytes.
    pub fn pixels(&self) -> &[u8] { &self.pixels }

    /// Returns true when the bitmap has no area.
    pub fn is_empty(&self) -> bool { self.width == 0 || self.height == 0 }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
/// Whole-pixel layout metrics for a glyph.
pub struct GlyphMetrics {
    /// Offset from the pen origin to the bitmap's left edge.
    pub bearing_x: i32,
    /// Offset from the baseline up to the bitmap's top edge.
    pub bearing_y: i32,
    /// Horizontal pen advance.
    pub advance: i32,
}

impl GlyphMetrics {
    /// Builds whole-pixel metrics from 26.6 fixed-point values.
    pub fn from_26_6(bearing_x: i32, bearing_y: i32, advance: i32) -> Self {
        Self {
            bearing_x: truncate_26_6(bearing_x),
            bearing_y: truncate_26_6(bearing_y),
            advance: truncate_26_6(advance),
        }
    }
}

/// Truncates a 26.6 fixed-point value to whole pixels, rounding towards negative infinity.
pub fn truncate_26_6(value: i32) -> i32 { value >> 6 }
