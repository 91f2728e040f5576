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
//! `.bfa` file layout and encoder.
//!
//! All multi-byte fields are little-endian:
//!
//! ```text
//! magic ".bfa" | flags u32 | glyph_count u16 | map_type u8 | font_size u8
//! atlas_width u16 | atlas_height u16 | stored_image_size u32
//! [codes: glyph_count x u16]            (sparse only)
//! records: table_len x 16 bytes
//! pixels: stored_image_size bytes       (atlas rows, trailing zero rows trimmed)
//! ```

use super::*;

/// File signature.
pub const MAGIC: [u8; 4] = *b".bfa";
/// Size of the fixed header.
pub const HEADER_SIZE: usize = 20;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Fixed-size header at the start of every `.bfa` file.
pub struct Header {
    /// Reserved, always zero when written by this crate.
    pub flags: u32,
    /// Number of glyphs present in the font.
    pub glyph_count: u16,
    /// Addressing scheme of the record table.
    pub map_type: AddressingScheme,
    /// Requested pixel size.
    pub font_size: u8,
    /// Atlas width in pixels.
    pub atlas_width: u16,
    /// Atlas height in pixels.
    pub atlas_height: u16,
    /// Length of the pixel blob.
    pub stored_image_size: u32,
}

impl Header {
    /// Number of records in the table that follows the header.
    pub fn table_len(&self) -> usize { self.map_type.dense_len().unwrap_or(self.glyph_count as usize) }

    /// Byte length of the sparse code index, zero for dense schemes.
    pub fn code_index_size(&self) -> usize {
        match self.map_type {
            AddressingScheme::Sparse => self.glyph_count as usize * 2,
            _ => 0,
        }
    }

    /// Appends the little-endian encoding of the header.
    pub fn write_le(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&self.flags.to_le_bytes());
        out.extend_from_slice(&self.glyph_count.to_le_bytes());
        out.push(self.map_type.tag());
        out.push(self.font_size);
        out.extend_from_slice(&self.atlas_width.to_le_bytes());
        out.extend_from_slice(&self.atlas_height.to_le_bytes());
        out.extend_from_slice(&self.stored_image_size.to_le_bytes());
    }

    /// Parses and validates the header at the start of `bytes`.
    pub fn read_le(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < HEADER_SIZE {
            return Err(FormatError::Truncated {
                section: "header",
                needed: HEADER_SIZE,
                available: bytes.len(),
            });
        }
        let magic = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if magic != MAGIC {
            return Err(FormatError::BadMagic(magic));
        }
        let u16_at = |i: usize| u16::from_le_bytes([bytes[i], bytes[i + 1]]);
        let u32_at = |i: usize| u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
        let map_type = AddressingScheme::from_tag(bytes[10]).ok_or(FormatError::UnknownMapType(bytes[10]))?;

        let header = Header {
            flags: u32_at(4),
            glyph_count: u16_at(8),
            map_type,
            font_size: bytes[11],
            atlas_width: u16_at(12),
            atlas_height: u16_at(14),
            stored_image_size: u32_at(16),
        };
        let capacity = header.atlas_width as usize * header.atlas_height as usize;
        if header.stored_image_size as usize > capacity {
            return Err(FormatError::ImageSizeMismatch {
                stored: header.stored_image_size as usize,
                capacity,
            });
        }
        Ok(header)
    }
}

#[derive(Clone, Debug)]
/// A compiled font ready to be encoded: glyph records sorted by code plus the atlas grid.
pub struct BakedFont {
    /// Requested pixel size.
    pub font_size: u8,
    /// Addressing scheme of the record table.
    pub scheme: AddressingScheme,
    /// `(code, record)` pairs in strictly increasing code order.
    pub glyphs: Vec<(u32, GlyphRecord)>,
    /// The composed atlas.
    pub image: AtlasImage,
}

impl BakedFont {
    /// Builds the header describing this font.
    pub fn header(&self) -> Result<Header, FormatError> {
        let glyph_count = u16::try_from(self.glyphs.len()).map_err(|_| FormatError::TooManyGlyphs(self.glyphs.len()))?;
        let dimension_error = || FormatError::DimensionMismatch {
            width: self.image.width(),
            height: self.image.height(),
        };
        let atlas_width = u16::try_from(self.image.width()).map_err(|_| dimension_error())?;
        let atlas_height = u16::try_from(self.image.height()).map_err(|_| dimension_error())?;
        let stored_image_size = u32::try_from(self.image.trimmed_pixels().len()).map_err(|_| dimension_error())?;

        Ok(Header {
            flags: 0,
            glyph_count,
            map_type: self.scheme,
            font_size: self.font_size,
            atlas_width,
            atlas_height,
            stored_image_size,
        })
    }

    fn check_codes(&self) -> Result<(), FormatError> {
        let limit = match self.scheme {
            AddressingScheme::Sparse => u16::MAX as u32 + 1,
            scheme => scheme.code_limit(),
        };
        let mut previous: Option<u32> = None;
        for &(code, _) in &self.glyphs {
            if previous.is_some_and(|p| code <= p) {
                return Err(FormatError::UnsortedCodes(code));
            }
            if code >= limit {
                return Err(FormatError::CodeOutOfRange { code, limit });
            }
            previous = Some(code);
        }
        Ok(())
    }

    /// Serializes the font into `.bfa` bytes.
    pub fn encode(&self) -> Result<Vec<u8>, FormatError> {
        self.check_codes()?;
        let header = self.header()?;
        let pixels = self.image.trimmed_pixels();

        let mut out = Vec::with_capacity(HEADER_SIZE + header.code_index_size() + header.table_len() * GlyphRecord::SIZE + pixels.len());
        header.write_le(&mut out);

        match self.scheme.dense_len() {
            Some(len) => {
                let mut table = vec![GlyphRecord::EMPTY; len];
                for &(code, record) in &self.glyphs {
                    table[code as usize] = record;
                }
                for record in &table {
                    record.write_le(&mut out);
                }
            }
            None => {
                for &(code, _) in &self.glyphs {
                    out.extend_from_slice(&(code as u16).to_le_bytes());
                }
                for (_, record) in &self.glyphs {
                    record.write_le(&mut out);
                }
            }
        }

        out.extend_from_slice(pixels);
        log::debug!(
            "encoded {} glyphs ({:?}), {} pixel bytes, {} bytes total",
            self.glyphs.len(),
            self.scheme,
            pixels.len(),
            out.len()
        );
        Ok(out)
    }
}
