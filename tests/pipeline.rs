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
use bfa::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SCHEMES: [AddressingScheme; 3] = [AddressingScheme::Dense16, AddressingScheme::Dense8, AddressingScheme::Sparse];

fn glyph_bitmap(code: u32, width: usize, height: usize) -> GlyphBitmap {
    let pixels = (0..width * height).map(|i| ((code as usize * 31 + i * 7) % 255) as u8 + 1).collect();
    GlyphBitmap::new(width, height, pixels).unwrap()
}

/// A font with a blank space, printable ASCII, some Latin-1 and a few codes above the 8-bit range.
fn synthetic_font() -> BitmapSource {
    let mut source = BitmapSource::new();
    source.insert(32, GlyphBitmap::blank(0, 0), GlyphMetrics { bearing_x: 0, bearing_y: 0, advance: 5 });
    source.insert(0xA0, GlyphBitmap::blank(0, 14), GlyphMetrics { bearing_x: 0, bearing_y: 0, advance: 5 });
    for code in (33u32..127).chain([0xC9, 0xE9, 0xFF, 0x3A9, 0x20AC, 0x3FFF]) {
        let width = 3 + (code as usize % 7);
        let height = 6 + (code as usize % 9);
        let metrics = GlyphMetrics {
            bearing_x: (code % 3) as i32 - 1,
            bearing_y: height as i32 - 3,
            advance: width as i32 + 1,
        };
        source.insert(code, glyph_bitmap(code, width, height), metrics);
    }
    source
}

fn compile(scheme: AddressingScheme, max_width: u16) -> CompiledAtlas {
    let config = CompileConfig {
        font_size: 18,
        max_width,
        max_height: 4096,
        scheme,
    };
    Compiler::new(config, synthetic_font()).unwrap().compile().unwrap()
}

#[test]
fn every_record_survives_the_file() {
    for scheme in SCHEMES {
        let compiled = compile(scheme, 128);
        let bytes = compiled.font.encode().unwrap();
        let file = BfaFile::parse(&bytes).unwrap();

        assert_eq!(file.header().map_type, scheme);
        assert_eq!(file.header().font_size, 18);
        assert_eq!(file.glyph_count(), compiled.stats.glyph_count);
        assert_eq!(file.header().atlas_width as usize, compiled.stats.width);
        assert_eq!(file.header().atlas_height as usize, compiled.stats.height);
        for &(code, record) in &compiled.font.glyphs {
            assert_eq!(file.lookup(code), Some(record), "{:?} U+{:04X}", scheme, code);
        }
        assert_eq!(file.image().unwrap(), compiled.font.image);
    }
}

#[test]
fn tables_have_the_scheme_shape() {
    let dense8 = compile(AddressingScheme::Dense8, 128).font.encode().unwrap();
    let dense8 = BfaFile::parse(&dense8).unwrap();
    assert_eq!(dense8.entries().count(), 256);
    assert_eq!(dense8.glyph_count(), 2 + 94 + 3);

    let dense16 = compile(AddressingScheme::Dense16, 128).font.encode().unwrap();
    let dense16 = BfaFile::parse(&dense16).unwrap();
    assert_eq!(dense16.entries().count(), 16384);
    assert_eq!(dense16.glyph_count(), 2 + 94 + 6);

    let sparse = compile(AddressingScheme::Sparse, 128).font.encode().unwrap();
    let sparse = BfaFile::parse(&sparse).unwrap();
    assert_eq!(sparse.entries().count(), sparse.glyph_count());
    assert_eq!(sparse.glyph_count(), 2 + 94 + 6);
    assert!(sparse.codes().windows(2).all(|pair| pair[0] < pair[1]));
    let listed: Vec<u32> = sparse.entries().map(|(code, _)| code).collect();
    assert_eq!(listed.first(), Some(&32));
    assert_eq!(listed.last(), Some(&0x3FFF));
}

#[test]
fn absent_codes_are_not_found() {
    let sparse = compile(AddressingScheme::Sparse, 128).font.encode().unwrap();
    let sparse = BfaFile::parse(&sparse).unwrap();
    for code in [0, 31, 127, 0x100, 0x3FFE, 0x4000, 0x10FFFF] {
        assert_eq!(sparse.lookup(code), None, "U+{:04X}", code);
    }

    let dense8 = compile(AddressingScheme::Dense8, 128).font.encode().unwrap();
    let dense8 = BfaFile::parse(&dense8).unwrap();
    assert_eq!(dense8.lookup(31), Some(GlyphRecord::EMPTY));
    assert_eq!(dense8.lookup(0x3A9), None);
}

#[test]
fn spaces_keep_their_advance_without_pixels() {
    let compiled = compile(AddressingScheme::Sparse, 128);
    let bytes = compiled.font.encode().unwrap();
    let file = BfaFile::parse(&bytes).unwrap();

    for code in [32, 0xA0] {
        let record = file.lookup(code).unwrap();
        assert!(record.is_space(), "U+{:04X}", code);
        assert!(record.w == 0 || record.h == 0);
        assert_eq!(record.advance, 5);
    }
    assert!(!file.lookup(65).unwrap().is_space());
    assert_eq!(compiled.stats.drawn_count, compiled.stats.glyph_count - 2);
}

#[test]
fn glyph_pixels_are_found_at_their_records() {
    let compiled = compile(AddressingScheme::Dense16, 96);
    let bytes = compiled.font.encode().unwrap();
    let file = BfaFile::parse(&bytes).unwrap();
    let image = file.image().unwrap();

    for code in [33u32, 65, 0xE9, 0x20AC] {
        let record = file.lookup(code).unwrap();
        let expected = glyph_bitmap(code, record.w as usize, record.h as usize);
        for y in 0..record.h as usize {
            for x in 0..record.w as usize {
                let at = image.get(record.x as usize + x, record.y as usize + y);
                assert_eq!(at, Some(expected.pixels()[x + y * record.w as usize]));
            }
        }
    }
}

#[test]
fn narrow_atlas_uses_the_full_width_and_more_rows() {
    let wide = compile(AddressingScheme::Sparse, 4096);
    let narrow = compile(AddressingScheme::Sparse, 64);
    assert_eq!(wide.stats.row_count, 1);
    assert!(wide.stats.width <= 4096);
    assert_eq!(narrow.stats.width, 64);
    assert!(narrow.stats.row_count > 1);
    assert_eq!(narrow.stats.height, narrow.stats.row_count * narrow.stats.row_height);
}

#[test]
fn overflow_writes_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("font.bfa");
    let config = CompileConfig {
        max_width: 32,
        max_height: 40,
        ..CompileConfig::default()
    };

    let result = Compiler::new(config, synthetic_font()).unwrap().compile_to_file(&path);
    assert!(matches!(result, Err(CompileError::Pack(PackError::AtlasTooLarge { limit: 40, .. }))));
    assert!(!path.exists());

    let roomy = CompileConfig { max_height: 4096, ..config };
    let compiled = Compiler::new(roomy, synthetic_font()).unwrap().compile_to_file(&path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    let file = BfaFile::parse(&bytes).unwrap();
    assert_eq!(file.glyph_count(), compiled.stats.glyph_count);
}

#[test]
fn written_file_matches_encoding() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("font.bfa");
    let compiled = compile(AddressingScheme::Sparse, 256);

    let written = write_bfa_file(&path, &compiled.font).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), written);
    assert_eq!(bytes, compiled.font.encode().unwrap());
    assert_eq!(&bytes[..4], b".bfa");
}

#[test]
fn unwritable_output_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("font.bfa");
    let compiled = compile(AddressingScheme::Dense8, 256);
    assert!(matches!(write_bfa_file(&path, &compiled.font), Err(CompileError::Io { .. })));
}

#[test]
fn staged_backend_produces_identical_files() {
    let config = CompileConfig {
        max_width: 100,
        ..CompileConfig::default()
    };
    let direct = Compiler::new(config, synthetic_font()).unwrap().compile().unwrap();
    let staged = Compiler::new(config, synthetic_font()).unwrap().compile_with(StagedTarget::new).unwrap();
    assert_eq!(direct.font.encode().unwrap(), staged.font.encode().unwrap());
}

#[test]
fn random_fonts_round_trip() {
    let mut rng = StdRng::seed_from_u64(0xB17_F0A7);
    for _ in 0..20 {
        let mut source = BitmapSource::new();
        let count = rng.random_range(1..200);
        for _ in 0..count {
            let code = rng.random_range(0..16384u32);
            let width = rng.random_range(0..12usize);
            let height = rng.random_range(0..12usize);
            let metrics = GlyphMetrics {
                bearing_x: rng.random_range(-4..4),
                bearing_y: rng.random_range(-4..12),
                advance: rng.random_range(0..16),
            };
            source.insert(code, glyph_bitmap(code, width, height), metrics);
        }
        let scheme = SCHEMES[rng.random_range(0..SCHEMES.len())];
        let config = CompileConfig {
            max_width: rng.random_range(12..300),
            scheme,
            ..CompileConfig::default()
        };

        let compiled = Compiler::new(config, source).unwrap().compile().unwrap();
        let bytes = compiled.font.encode().unwrap();
        let file = BfaFile::parse(&bytes).unwrap();
        let atlas = Recti::new(0, 0, compiled.stats.width as i32, compiled.stats.height as i32);
        for &(code, record) in &compiled.font.glyphs {
            assert_eq!(file.lookup(code), Some(record));
            assert!(atlas.contains_rect(&record.rect()));
        }
    }
}
