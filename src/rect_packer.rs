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
////////////////////////////////////////////////////////////////////////////////
//
// The MIT License (MIT)
//
// Copyright (c) 2014 Coeuvre Wong
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Row packing of glyph rectangles into a single atlas.
//!
//! Glyphs are laid out left to right in the order they are pushed. A new row
//! starts whenever the next glyph would cross the maximum width. Every row has
//! the same height: the tallest glyph of the whole sequence. Rectangles are
//! recorded in a single pass, and their final `y` is resolved once that height
//! is known.
//!
//! ```
//! use bfa::{pack, PackConfig};
//!
//! let config = PackConfig { max_width: 25, max_height: 100 };
//! let glyphs = (0..5).map(|code| (code, 10, 8));
//! let atlas = pack(config, glyphs).unwrap();
//!
//! assert_eq!(atlas.row_count, 3);
//! assert_eq!(atlas.width, 25);
//! assert_eq!(atlas.height, 24);
//! ```

use crate::*;

/// Size limits of the encompassing atlas.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct PackConfig {
    /// Maximum width of a row.
    pub max_width: i32,
    /// Maximum height of the whole atlas.
    pub max_height: i32,
}

/// Edge accessors and containment tests for integer rectangles.
pub trait RectTrait {
    /// Top edge (inclusive).
    fn top(&self) -> i32;
    /// Bottom edge (exclusive).
    fn bottom(&self) -> i32;
    /// Left edge (inclusive).
    fn left(&self) -> i32;
    /// Right edge (exclusive).
    fn right(&self) -> i32;

    /// Number of pixels covered.
    fn area(&self) -> i32 { (self.bottom() - self.top()) * (self.right() - self.left()) }

    /// Check if intersection of two non-empty rectangles is non empty.
    fn intersects(&self, other: &Self) -> bool {
        self.left() < other.right() && other.left() < self.right() && self.top() < other.bottom() && other.top() < self.bottom()
    }

    /// Check if `other` rectangle is completely inside `self`.
    fn contains_rect(&self, other: &Self) -> bool {
        self.left() <= other.left() && self.right() >= other.right() && self.top() <= other.top() && self.bottom() >= other.bottom()
    }
}

impl RectTrait for Recti {
    #[inline(always)]
    fn top(&self) -> i32 { self.y }

    #[inline(always)]
    fn bottom(&self) -> i32 { self.y + self.height }

    #[inline(always)]
    fn left(&self) -> i32 { self.x }

    #[inline(always)]
    fn right(&self) -> i32 { self.x + self.width }
}

#[derive(Copy, Clone, Debug)]
/// Rectangle assigned to one glyph.
pub struct Placement {
    /// Character code of the glyph.
    pub code: u32,
    /// Zero-based row the glyph was placed in.
    pub row: i32,
    /// Atlas-local rectangle.
    pub rect: Recti,
}

#[derive(Clone, Debug)]
/// Result of packing a glyph sequence.
pub struct PackedAtlas {
    /// Atlas width: the maximum width when several rows are used, the exact row width otherwise.
    pub width: i32,
    /// Atlas height: `row_height * row_count`.
    pub height: i32,
    /// Height shared by every row.
    pub row_height: i32,
    /// Number of rows, at least one.
    pub row_count: i32,
    /// One placement per pushed glyph, in push order.
    pub placements: Vec<Placement>,
}

impl PackedAtlas {
    /// Returns the atlas bounds as a rectangle at the origin.
    pub fn bounds(&self) -> Recti { Recti::new(0, 0, self.width, self.height) }
}

/// `Packer` holds the row cursor while glyphs are pushed.
#[derive(Clone)]
pub struct Packer {
    config: PackConfig,
    cursor_x: i32,
    row: i32,
    row_height: i32,
    placements: Vec<Placement>,
}

impl Packer {
    /// Create new empty `Packer` with the provided limits.
    pub fn new(config: PackConfig) -> Packer {
        Packer {
            config,
            cursor_x: 0,
            row: 0,
            row_height: 0,
            placements: Vec::new(),
        }
    }

    /// Number of glyphs pushed so far.
    pub fn len(&self) -> usize { self.placements.len() }

    /// Returns true when nothing has been pushed.
    pub fn is_empty(&self) -> bool { self.placements.is_empty() }

    /// Places the next glyph. Zero-sized glyphs are recorded at the cursor without advancing it.
    pub fn push(&mut self, code: u32, width: i32, height: i32) -> Result<(), PackError> {
        let width = width.max(0);
        let height = height.max(0);
        if width > self.config.max_width {
            return Err(PackError::GlyphTooWide { code, width, limit: self.config.max_width });
        }

        if self.cursor_x > 0 && self.cursor_x + width > self.config.max_width {
            self.cursor_x = 0;
            self.row += 1;
        }

        self.placements.push(Placement {
            code,
            row: self.row,
            rect: Recti::new(self.cursor_x, 0, width, height),
        });
        self.cursor_x += width;
        self.row_height = self.row_height.max(height);
        Ok(())
    }

    /// Resolves the row offsets and the atlas size, failing if the rows do not fit the height limit.
    pub fn finish(self) -> Result<PackedAtlas, PackError> {
        let row_count = self.row + 1;
        let width = if row_count > 1 { self.config.max_width } else { self.cursor_x };
        let required = self.row_height as i64 * row_count as i64;
        if required > self.config.max_height as i64 {
            return Err(PackError::AtlasTooLarge { required, limit: self.config.max_height });
        }
        if width > u16::MAX as i32 || required > u16::MAX as i64 {
            return Err(PackError::DimensionOverflow { width: width as i64, height: required });
        }

        let row_height = self.row_height;
        let mut placements = self.placements;
        for p in placements.iter_mut() {
            p.rect.y = p.row * row_height;
        }

        log::debug!("packed {} glyphs into {} rows of {}px ({}x{})", placements.len(), row_count, row_height, width, required);
        Ok(PackedAtlas {
            width,
            height: required as i32,
            row_height,
            row_count,
            placements,
        })
    }
}

/// Packs `(code, width, height)` triples in iteration order.
pub fn pack<I>(config: PackConfig, glyphs: I) -> Result<PackedAtlas, PackError>
where
    I: IntoIterator<Item = (u32, i32, i32)>,
{
    let mut packer = Packer::new(config);
    for (code, width, height) in glyphs {
        packer.push(code, width, height)?;
    }
    packer.finish()
}
