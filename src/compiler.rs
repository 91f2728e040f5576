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
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Settings for one compilation.
pub struct CompileConfig {
    /// Pixel size glyphs are rasterized at, stored in the header.
    pub font_size: u8,
    /// Maximum atlas width.
    pub max_width: u16,
    /// Maximum atlas height.
    pub max_height: u16,
    /// Addressing scheme of the emitted table.
    pub scheme: AddressingScheme,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            font_size: 16,
            max_width: 8192,
            max_height: 8192,
            scheme: AddressingScheme::Sparse,
        }
    }
}

impl CompileConfig {
    /// Rejects settings that cannot produce an atlas.
    pub fn validate(&self) -> Result<(), CompileError> {
        if self.font_size == 0 {
            return Err(CompileError::InvalidConfig("font size must be > 0".into()));
        }
        if self.max_width == 0 || self.max_height == 0 {
            return Err(CompileError::InvalidConfig(format!(
                "maximum atlas size {}x{} must be positive",
                self.max_width, self.max_height
            )));
        }
        Ok(())
    }

    /// Packer limits derived from this configuration.
    pub fn pack_config(&self) -> PackConfig {
        PackConfig {
            max_width: self.max_width as i32,
            max_height: self.max_height as i32,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Summary of a finished compilation.
pub struct AtlasStats {
    /// Number of glyphs emitted.
    pub glyph_count: usize,
    /// Glyphs that produced pixel writes.
    pub drawn_count: usize,
    /// Atlas width.
    pub width: usize,
    /// Atlas height.
    pub height: usize,
    /// Number of atlas rows.
    pub row_count: usize,
    /// Shared row height.
    pub row_height: usize,
}

impl AtlasStats {
    /// Size of the atlas grid in mebibytes.
    pub fn texture_megabytes(&self) -> f64 { (self.width * self.height) as f64 / (1 << 20) as f64 }
}

#[derive(Clone, Debug)]
/// Output of [`Compiler::compile`].
pub struct CompiledAtlas {
    /// Records and pixels ready for encoding.
    pub font: BakedFont,
    /// Layout summary.
    pub stats: AtlasStats,
}

/// Per-compilation context owning the glyph source and the settings.
pub struct Compiler<S: GlyphSource> {
    config: CompileConfig,
    source: S,
}

impl<S: GlyphSource> Compiler<S> {
    /// Creates a compiler after validating `config`.
    pub fn new(config: CompileConfig, source: S) -> Result<Self, CompileError> {
        config.validate()?;
        Ok(Self { config, source })
    }

    /// Compiles into an in-memory atlas grid.
    pub fn compile(&mut self) -> Result<CompiledAtlas, CompileError> { self.compile_with(AtlasImage::new) }

    /// Compiles and writes the result to `path`. The file is only created once compilation succeeded.
    pub fn compile_to_file(&mut self, path: impl AsRef<Path>) -> Result<CompiledAtlas, CompileError> {
        let compiled = self.compile()?;
        write_bfa_file(path, &compiled.font)?;
        Ok(compiled)
    }

    /// Compiles using the target returned by `make_target(width, height)` for the pixel writes.
    pub fn compile_with<T, F>(&mut self, make_target: F) -> Result<CompiledAtlas, CompileError>
    where
        T: AtlasTarget,
        F: FnOnce(usize, usize) -> T,
    {
        let scheme = self.config.scheme;
        let glyphs = collect_glyphs(&mut self.source, scheme);

        let packed = pack(
            self.config.pack_config(),
            glyphs.iter().map(|g| (g.code, g.bitmap.width() as i32, g.bitmap.height() as i32)),
        )?;

        let mut target = make_target(packed.width as usize, packed.height as usize);
        let drawn_count = compose(&packed, &glyphs, &mut target)?;
        let image = target.finish()?;

        let records = glyphs.iter().zip(packed.placements.iter()).map(|(glyph, placement)| (glyph.code, glyph_record(glyph, placement))).collect();

        let stats = AtlasStats {
            glyph_count: glyphs.len(),
            drawn_count,
            width: image.width(),
            height: image.height(),
            row_count: packed.row_count as usize,
            row_height: packed.row_height as usize,
        };
        log::info!(
            "compiled {} glyphs into a {}x{} atlas ({} rows, {} scheme)",
            stats.glyph_count,
            stats.width,
            stats.height,
            stats.row_count,
            scheme.name()
        );

        Ok(CompiledAtlas {
            font: BakedFont {
                font_size: self.config.font_size,
                scheme,
                glyphs: records,
                image,
            },
            stats,
        })
    }
}

fn clamp_i16(code: u32, what: &str, value: i32) -> i16 {
    let clamped = value.clamp(i16::MIN as i32, i16::MAX as i32);
    if clamped != value {
        log::warn!("U+{:04X}: {} {} clamped to {}", code, what, value, clamped);
    }
    clamped as i16
}

fn glyph_record(glyph: &RasterizedGlyph, placement: &Placement) -> GlyphRecord {
    let rect = placement.rect;
    let mut flags = GlyphFlags::empty();
    if glyph.bitmap.is_empty() {
        flags |= GlyphFlags::IS_SPACE;
    }
    let advance = glyph.metrics.advance.clamp(0, u16::MAX as i32);
    if advance != glyph.metrics.advance {
        log::warn!("U+{:04X}: advance {} clamped to {}", glyph.code, glyph.metrics.advance, advance);
    }

    // the packer keeps every rectangle inside 16-bit atlas bounds
    GlyphRecord {
        x: rect.x as u16,
        y: rect.y as u16,
        w: rect.width as u16,
        h: rect.height as u16,
        x_bearing: clamp_i16(glyph.code, "x bearing", glyph.metrics.bearing_x),
        y_bearing: clamp_i16(glyph.code, "y bearing", glyph.metrics.bearing_y),
        advance: advance as u16,
        flags,
    }
}

/// Writes `bytes` to a new file at `path` through the writer built by `wrap`.
/// A file that could not be written completely is removed.
pub(crate) fn write_or_discard<W: Write>(path: &Path, bytes: &[u8], wrap: impl FnOnce(File) -> W) -> Result<(), CompileError> {
    let file = File::create(path).map_err(|e| CompileError::io(path, e))?;
    let mut w = wrap(file);
    let result = w.write_all(bytes).and_then(|()| w.flush());
    drop(w);
    if let Err(e) = result {
        if let Err(remove) = std::fs::remove_file(path) {
            log::warn!("could not remove partial file {}: {}", path.display(), remove);
        }
        return Err(CompileError::io(path, e));
    }
    Ok(())
}

/// Encodes `font` and writes it to `path`. Nothing is created if encoding fails, and a partial write is removed.
pub fn write_bfa_file(path: impl AsRef<Path>, font: &BakedFont) -> Result<usize, CompileError> {
    let path = path.as_ref();
    let bytes = font.encode()?;
    write_or_discard(path, &bytes, BufWriter::new)?;
    log::info!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(bytes.len())
}
