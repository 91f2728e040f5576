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

/// Read-only view over the bytes of a `.bfa` file.
#[derive(Clone, Debug)]
pub struct BfaFile<'a> {
    header: Header,
    codes: Vec<u16>,
    records: &'a [u8],
    pixels: &'a [u8],
}

fn take<'a>(bytes: &'a [u8], at: usize, len: usize, section: &'static str) -> Result<&'a [u8], FormatError> {
    let available = bytes.len().saturating_sub(at);
    if available < len {
        return Err(FormatError::Truncated { section, needed: len, available });
    }
    Ok(&bytes[at..at + len])
}

impl<'a> BfaFile<'a> {
    /// Parses the header and locates every section, without copying the record table or pixels.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, FormatError> {
        let header = Header::read_le(bytes)?;
        let mut at = HEADER_SIZE;

        let code_bytes = take(bytes, at, header.code_index_size(), "code index")?;
        at += code_bytes.len();
        let codes: Vec<u16> = code_bytes.chunks_exact(2).map(|c| u16::from_le_bytes([c[0], c[1]])).collect();
        if let Some(pair) = codes.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(FormatError::UnsortedCodes(pair[1] as u32));
        }

        let records = take(bytes, at, header.table_len() * GlyphRecord::SIZE, "glyph table")?;
        at += records.len();
        let pixels = take(bytes, at, header.stored_image_size as usize, "pixel data")?;
        at += pixels.len();

        if at < bytes.len() {
            log::debug!("ignoring {} trailing bytes after the pixel data", bytes.len() - at);
        }
        Ok(Self { header, codes, records, pixels })
    }

    /// The file header.
    pub fn header(&self) -> &Header { &self.header }

    /// Number of glyphs declared by the header.
    pub fn glyph_count(&self) -> usize { self.header.glyph_count as usize }

    /// Sorted code index of a sparse file, empty for dense files.
    pub fn codes(&self) -> &[u16] { &self.codes }

    fn record_at(&self, index: usize) -> GlyphRecord {
        let start = index * GlyphRecord::SIZE;
        let mut raw = [0u8; GlyphRecord::SIZE];
        raw.copy_from_slice(&self.records[start..start + GlyphRecord::SIZE]);
        GlyphRecord::read_le(&raw)
    }

    /// Resolves the record for `code`, `None` when the code is absent or outside the table.
    ///
    /// Dense tables return the zeroed record for codes the font does not have.
    pub fn lookup(&self, code: u32) -> Option<GlyphRecord> {
        match self.header.map_type.dense_len() {
            Some(len) => {
                let index = code as usize;
                if index >= len {
                    return None;
                }
                Some(self.record_at(index))
            }
            None => {
                let code = u16::try_from(code).ok()?;
                let index = self.codes.binary_search(&code).ok()?;
                Some(self.record_at(index))
            }
        }
    }

    /// Iterates over every table slot as `(code, record)`.
    pub fn entries(&self) -> impl Iterator<Item = (u32, GlyphRecord)> + '_ {
        (0..self.header.table_len()).map(move |index| {
            let code = if self.codes.is_empty() { index as u32 } else { self.codes[index] as u32 };
            (code, self.record_at(index))
        })
    }

    /// The stored pixel bytes, trailing zero rows trimmed.
    pub fn pixel_blob(&self) -> &'a [u8] { self.pixels }

    /// Rebuilds the full atlas grid.
    pub fn image(&self) -> Result<AtlasImage, FormatError> {
        let width = self.header.atlas_width as usize;
        let height = self.header.atlas_height as usize;
        AtlasImage::from_pixels(width, height, self.pixels.to_vec()).map_err(|_| FormatError::ImageSizeMismatch {
            stored: self.pixels.len(),
            capacity: width * height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(x: u16, w: u16, advance: u16) -> GlyphRecord {
        GlyphRecord {
            x,
            y: 0,
            w,
            h: 2,
            x_bearing: -1,
            y_bearing: 7,
            advance,
            flags: GlyphFlags::empty(),
        }
    }

    fn encoded(scheme: AddressingScheme, codes: &[u32]) -> Vec<u8> {
        let glyphs = codes.iter().enumerate().map(|(i, &code)| (code, record(i as u16, 1, code as u16 % 50 + 1))).collect();
        let mut image = AtlasImage::new(8, 4);
        image.write_rect(Recti::new(0, 0, 8, 2), &[0x11; 16]).unwrap();
        BakedFont { font_size: 20, scheme, glyphs, image }.encode().unwrap()
    }

    #[test]
    fn sparse_lookup_finds_present_codes_and_reports_gaps() {
        let codes = [32u32, 33, 65, 1000, 16383];
        let bytes = encoded(AddressingScheme::Sparse, &codes);
        let file = BfaFile::parse(&bytes).unwrap();

        assert_eq!(file.glyph_count(), 5);
        assert_eq!(file.codes(), &[32, 33, 65, 1000, 16383]);
        for (i, &code) in codes.iter().enumerate() {
            assert_eq!(file.lookup(code), Some(record(i as u16, 1, code as u16 % 50 + 1)));
        }
        for gap in [0u32, 31, 34, 64, 66, 999, 1001, 16382, 16384, 70000] {
            assert_eq!(file.lookup(gap), None, "code {} should be absent", gap);
        }
    }

    #[test]
    fn dense_lookup_is_bounded_by_table() {
        let bytes = encoded(AddressingScheme::Dense8, &[65, 255]);
        let file = BfaFile::parse(&bytes).unwrap();
        assert_eq!(file.lookup(65), Some(record(0, 1, 16)));
        assert_eq!(file.lookup(255), Some(record(1, 1, 6)));
        assert_eq!(file.lookup(66), Some(GlyphRecord::EMPTY));
        assert_eq!(file.lookup(256), None);
        assert_eq!(file.entries().count(), 256);

        let bytes = encoded(AddressingScheme::Dense16, &[16383]);
        let file = BfaFile::parse(&bytes).unwrap();
        assert!(file.lookup(16383).is_some());
        assert_eq!(file.lookup(16384), None);
        assert_eq!(file.lookup(65535), None);
        assert_eq!(file.entries().count(), 16384);
    }

    #[test]
    fn image_is_restored_from_trimmed_blob() {
        let bytes = encoded(AddressingScheme::Sparse, &[1]);
        let file = BfaFile::parse(&bytes).unwrap();
        assert_eq!(file.pixel_blob().len(), 16);
        let image = file.image().unwrap();
        assert_eq!((image.width(), image.height()), (8, 4));
        assert_eq!(image.get(7, 1), Some(0x11));
        assert_eq!(image.get(0, 3), Some(0));
    }

    #[test]
    fn truncated_sections_are_reported() {
        let bytes = encoded(AddressingScheme::Sparse, &[10, 20]);
        let code_end = HEADER_SIZE + 4;
        let table_end = code_end + 2 * GlyphRecord::SIZE;

        assert!(matches!(BfaFile::parse(&bytes[..HEADER_SIZE + 3]), Err(FormatError::Truncated { section: "code index", needed: 4, available: 3 })));
        assert!(matches!(BfaFile::parse(&bytes[..table_end - 1]), Err(FormatError::Truncated { section: "glyph table", .. })));
        assert!(matches!(BfaFile::parse(&bytes[..bytes.len() - 1]), Err(FormatError::Truncated { section: "pixel data", needed: 16, available: 15 })));
    }

    #[test]
    fn bad_magic_is_a_parse_error() {
        let mut bytes = encoded(AddressingScheme::Sparse, &[10]);
        bytes[1] = b'B';
        assert_eq!(BfaFile::parse(&bytes).unwrap_err(), FormatError::BadMagic(*b".Bfa"));
    }

    #[test]
    fn unsorted_index_is_rejected() {
        let mut bytes = encoded(AddressingScheme::Sparse, &[10, 20]);
        bytes[HEADER_SIZE] = 30;
        assert_eq!(BfaFile::parse(&bytes).unwrap_err(), FormatError::UnsortedCodes(20));
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut bytes = encoded(AddressingScheme::Sparse, &[10]);
        bytes.extend_from_slice(&[1, 2, 3]);
        let file = BfaFile::parse(&bytes).unwrap();
        assert_eq!(file.pixel_blob().len(), 16);
    }
}
