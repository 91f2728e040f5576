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
use std::collections::BTreeMap;

/// Rasterizer seam: turns character codes into bitmaps and whole-pixel metrics.
pub trait GlyphSource {
    /// Returns true when the font has a glyph for `code`.
    fn exists(&self, code: u32) -> bool;
    /// Renders the glyph for `code`.
    fn rasterize(&mut self, code: u32) -> GlyphBitmap;
    /// Returns the layout metrics for `code`.
    fn metrics(&mut self, code: u32) -> GlyphMetrics;
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A glyph rendered once and kept for the packer and the compositor.
pub struct RasterizedGlyph {
    /// Character code.
    pub code: u32,
    /// Coverage bitmap.
    pub bitmap: GlyphBitmap,
    /// Layout metrics.
    pub metrics: GlyphMetrics,
}

/// Rasterizes every existing glyph below the scheme's code limit, in increasing code order.
pub fn collect_glyphs<S: GlyphSource>(source: &mut S, scheme: AddressingScheme) -> Vec<RasterizedGlyph> {
    let mut glyphs = Vec::new();
    for code in 0..scheme.code_limit() {
        if !source.exists(code) {
            log::trace!("no glyph for U+{:04X}, skipping", code);
            continue;
        }
        let bitmap = source.rasterize(code);
        let metrics = source.metrics(code);
        glyphs.push(RasterizedGlyph { code, bitmap, metrics });
    }
    log::debug!("collected {} glyphs below U+{:04X}", glyphs.len(), scheme.code_limit());
    glyphs
}

#[derive(Clone, Debug, Default)]
/// Glyph source backed by pre-rasterized bitmaps held in memory.
pub struct BitmapSource {
    glyphs: BTreeMap<u32, (GlyphBitmap, GlyphMetrics)>,
}

impl BitmapSource {
    /// Creates an empty source.
    pub fn new() -> Self { Self::default() }

    /// Adds or replaces the glyph for `code`.
    pub fn insert(&mut self, code: u32, bitmap: GlyphBitmap, metrics: GlyphMetrics) { self.glyphs.insert(code, (bitmap, metrics)); }

    /// Builder-style variant of [`BitmapSource::insert`].
    pub fn with_glyph(mut self, code: u32, bitmap: GlyphBitmap, metrics: GlyphMetrics) -> Self {
        self.insert(code, bitmap, metrics);
        self
    }

    /// Number of glyphs held.
    pub fn len(&self) -> usize { self.glyphs.len() }

    /// Returns true when no glyph has been added.
    pub fn is_empty(&self) -> bool { self.glyphs.is_empty() }
}

impl GlyphSource for BitmapSource {
    fn exists(&self, code: u32) -> bool { self.glyphs.contains_key(&code) }

    fn rasterize(&mut self, code: u32) -> GlyphBitmap { self.glyphs.get(&code).map(|(bitmap, _)| bitmap.clone()).unwrap_or_default() }

    fn metrics(&mut self, code: u32) -> GlyphMetrics { self.glyphs.get(&code).map(|(_, metrics)| *metrics).unwrap_or_default() }
}

#[cfg(feature = "builder")]
pub use fontdue_source::FontdueSource;

#[cfg(feature = "builder")]
mod fontdue_source {
    use super::*;
    use fontdue::FontSettings;
    use std::fs::File;
    use std::io::Read;
    use std::path::Path;

    /// [`GlyphSource`] rasterizing a TrueType/OpenType font with `fontdue`.
    pub struct FontdueSource {
        font: fontdue::Font,
        px: f32,
    }

    impl FontdueSource {
        /// Parses font data and prepares it for rasterizing at `px` pixels.
        pub fn from_bytes(data: Vec<u8>, px: f32) -> Result<Self, CompileError> {
            let settings = FontSettings { scale: px, ..FontSettings::default() };
            let font = fontdue::Font::from_bytes(data, settings).map_err(|error| CompileError::InvalidFont(error.to_string()))?;
            if font.chars().is_empty() {
                return Err(CompileError::MissingUnicodeMap);
            }
            log::info!("loaded font with {} mapped characters at {}px", font.chars().len(), px);
            Ok(Self { font, px })
        }

        /// Loads a font file from disk.
        pub fn from_file(path: impl AsRef<Path>, px: f32) -> Result<Self, CompileError> {
            let path = path.as_ref();
            let mut data = Vec::new();
            File::open(path)
                .and_then(|mut f| f.read_to_end(&mut data))
                .map_err(|e| CompileError::io(path, e))?;
            Self::from_bytes(data, px)
        }

        fn char_for(code: u32) -> Option<char> { char::from_u32(code) }
    }

    impl GlyphSource for FontdueSource {
        fn exists(&self, code: u32) -> bool { Self::char_for(code).map(|ch| self.font.lookup_glyph_index(ch) != 0).unwrap_or(false) }

        fn rasterize(&mut self, code: u32) -> GlyphBitmap {
            let ch = match Self::char_for(code) {
                Some(ch) => ch,
                None => return GlyphBitmap::default(),
            };
            let (metrics, bitmap) = self.font.rasterize(ch, self.px);
            GlyphBitmap::new(metrics.width, metrics.height, bitmap).unwrap_or_else(|_| GlyphBitmap::blank(metrics.width, metrics.height))
        }

        fn metrics(&mut self, code: u32) -> GlyphMetrics {
            let ch = match Self::char_for(code) {
                Some(ch) => ch,
                None => return GlyphMetrics::default(),
            };
            let m = self.font.metrics(ch, self.px);
            let top = m.ymin + m.height as i32;
            GlyphMetrics::from_26_6(m.xmin * 64, top * 64, (m.advance_width * 64.0) as i32)
        }
    }

}
