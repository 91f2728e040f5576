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

/// Destination that accepts rectangular coverage writes.
///
/// Implementations may defer the writes; [`AtlasTarget::finish`] is the barrier
/// after which every write is visible in the returned grid.
pub trait AtlasTarget {
    /// Copies `pixels` (row-major, `rect.width * rect.height` bytes) into `rect`.
    fn write_rect(&mut self, rect: Recti, pixels: &[u8]) -> Result<(), CompositeError>;

    /// Blocks until all writes have landed and returns the composed grid.
    fn finish(self) -> Result<AtlasImage, CompositeError>
    where
        Self: Sized;
}

#[derive(Clone, PartialEq, Eq)]
/// Single-channel atlas grid, one coverage byte per pixel, row-major.
pub struct AtlasImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl std::fmt::Debug for AtlasImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("AtlasImage {{ width: {}, height: {}, bytes: {} }}", self.width, self.height, self.pixels.len()))
    }
}

impl AtlasImage {
    /// Creates a zero-filled grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    /// Builds a grid from row-major bytes. A shorter buffer is zero-padded, which restores trimmed trailing rows.
    pub fn from_pixels(width: usize, height: usize, mut pixels: Vec<u8>) -> Result<Self, CompositeError> {
        let expected = width * height;
        if pixels.len() > expected {
            return Err(CompositeError::PixelCount { expected, found: pixels.len() });
        }
        pixels.resize(expected, 0);
        Ok(Self { width, height, pixels })
    }

    /// Grid width.
    pub fn width(&self) -> usize { self.width }

    /// Grid height.
    pub fn height(&self) -> usize { self.height }

    /// All coverage bytes.
    pub fn pixels(&self) -> &[u8] { &self.pixels }

    /// Coverage at `(x, y)`, `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[x + y * self.width])
    }

    /// The grid with trailing all-zero rows removed.
    pub fn trimmed_pixels(&self) -> &[u8] {
        if self.width == 0 {
            return &[];
        }
        let used_rows = self.pixels.chunks(self.width).rposition(|row| row.iter().any(|&c| c != 0)).map(|last| last + 1).unwrap_or(0);
        &self.pixels[..used_rows * self.width]
    }

    fn bounds(&self) -> Recti { Recti::new(0, 0, self.width as i32, self.height as i32) }

    fn check_write(&self, rect: &Recti, pixels: &[u8]) -> Result<(), CompositeError> {
        if rect.width < 0 || rect.height < 0 || !self.bounds().contains_rect(rect) {
            return Err(CompositeError::OutOfBounds {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                atlas_width: self.width,
                atlas_height: self.height,
            });
        }
        let expected = (rect.width * rect.height) as usize;
        if pixels.len() != expected {
            return Err(CompositeError::PixelCount { expected, found: pixels.len() });
        }
        Ok(())
    }

    fn blit(&mut self, rect: &Recti, pixels: &[u8]) {
        let w = rect.width as usize;
        if w == 0 {
            return;
        }
        for (row, src) in pixels.chunks_exact(w).enumerate() {
            let start = rect.x as usize + (rect.y as usize + row) * self.width;
            self.pixels[start..start + w].copy_from_slice(src);
        }
    }
}

impl AtlasTarget for AtlasImage {
    fn write_rect(&mut self, rect: Recti, pixels: &[u8]) -> Result<(), CompositeError> {
        self.check_write(&rect, pixels)?;
        self.blit(&rect, pixels);
        Ok(())
    }

    fn finish(self) -> Result<AtlasImage, CompositeError> { Ok(self) }
}

#[derive(Copy, Clone, Debug)]
struct CopyCommand {
    offset: usize,
    rect: Recti,
}

/// Target that stages bitmaps and replays the queued copies on [`AtlasTarget::finish`].
///
/// This mirrors an upload through a transfer queue: nothing reaches the grid
/// until the queue is submitted and waited on.
pub struct StagedTarget {
    image: AtlasImage,
    staging: Vec<u8>,
    commands: Vec<CopyCommand>,
}

impl StagedTarget {
    /// Creates a staged target over a zero-filled grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            image: AtlasImage::new(width, height),
            staging: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Number of copies waiting for submission.
    pub fn pending(&self) -> usize { self.commands.len() }

    /// Bytes held in the staging buffer.
    pub fn staged_bytes(&self) -> usize { self.staging.len() }

    /// The grid as currently visible, without the pending copies.
    pub fn visible(&self) -> &AtlasImage { &self.image }
}

impl AtlasTarget for StagedTarget {
    fn write_rect(&mut self, rect: Recti, pixels: &[u8]) -> Result<(), CompositeError> {
        self.image.check_write(&rect, pixels)?;
        self.commands.push(CopyCommand { offset: self.staging.len(), rect });
        self.staging.extend_from_slice(pixels);
        Ok(())
    }

    fn finish(mut self) -> Result<AtlasImage, CompositeError> {
        log::debug!("submitting {} staged copies ({} bytes)", self.commands.len(), self.staging.len());
        for cmd in &self.commands {
            let len = (cmd.rect.width * cmd.rect.height) as usize;
            self.image.blit(&cmd.rect, &self.staging[cmd.offset..cmd.offset + len]);
        }
        Ok(self.image)
    }
}

/// Writes every glyph bitmap with a non-empty area at its packed rectangle.
///
/// `glyphs` must be the sequence that produced `packed`.
pub fn compose<T: AtlasTarget>(packed: &PackedAtlas, glyphs: &[RasterizedGlyph], target: &mut T) -> Result<usize, CompositeError> {
    if packed.placements.len() != glyphs.len() {
        return Err(CompositeError::PlacementMismatch { index: packed.placements.len().min(glyphs.len()) });
    }

    let mut written = 0;
    for (index, (placement, glyph)) in packed.placements.iter().zip(glyphs.iter()).enumerate() {
        let rect = placement.rect;
        if placement.code != glyph.code || rect.width as usize != glyph.bitmap.width() || rect.height as usize != glyph.bitmap.height() {
            return Err(CompositeError::PlacementMismatch { index });
        }
        if glyph.bitmap.is_empty() {
            continue;
        }
        target.write_rect(rect, glyph.bitmap.pixels())?;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(code: u32, width: usize, height: usize, value: u8) -> RasterizedGlyph {
        RasterizedGlyph {
            code,
            bitmap: GlyphBitmap::new(width, height, vec![value; width * height]).unwrap(),
            metrics: GlyphMetrics::default(),
        }
    }

    fn packed_for(glyphs: &[RasterizedGlyph], max_width: i32) -> PackedAtlas {
        pack(
            PackConfig { max_width, max_height: 1000 },
            glyphs.iter().map(|g| (g.code, g.bitmap.width() as i32, g.bitmap.height() as i32)),
        )
        .unwrap()
    }

    #[test]
    fn writes_land_at_their_rectangles() {
        let glyphs = vec![glyph(1, 2, 2, 10), glyph(2, 3, 1, 20), glyph(3, 2, 2, 30)];
        let packed = packed_for(&glyphs, 5);
        let mut image = AtlasImage::new(packed.width as usize, packed.height as usize);

        assert_eq!(compose(&packed, &glyphs, &mut image).unwrap(), 3);
        let image = image.finish().unwrap();

        assert_eq!(image.width(), 5);
        assert_eq!(image.height(), 4);
        assert_eq!(image.get(0, 0), Some(10));
        assert_eq!(image.get(1, 1), Some(10));
        assert_eq!(image.get(2, 0), Some(20));
        assert_eq!(image.get(4, 0), Some(20));
        assert_eq!(image.get(2, 1), Some(0));
        assert_eq!(image.get(0, 2), Some(30));
        assert_eq!(image.get(1, 3), Some(30));
        assert_eq!(image.get(5, 0), None);
    }

    #[test]
    fn empty_glyphs_are_not_written() {
        let glyphs = vec![glyph(32, 0, 0, 0), glyph(65, 2, 2, 7), glyph(160, 0, 5, 0)];
        let packed = packed_for(&glyphs, 10);
        let mut image = AtlasImage::new(packed.width as usize, packed.height as usize);
        assert_eq!(compose(&packed, &glyphs, &mut image).unwrap(), 1);
    }

    #[test]
    fn out_of_bounds_write_is_rejected() {
        let mut image = AtlasImage::new(4, 4);
        assert!(matches!(image.write_rect(Recti::new(3, 0, 2, 1), &[1, 1]), Err(CompositeError::OutOfBounds { .. })));
        assert!(matches!(image.write_rect(Recti::new(0, 0, 2, 2), &[1, 1]), Err(CompositeError::PixelCount { expected: 4, found: 2 })));
    }

    #[test]
    fn mismatched_sequence_is_rejected() {
        let glyphs = vec![glyph(1, 2, 2, 1), glyph(2, 2, 2, 1)];
        let packed = packed_for(&glyphs, 10);
        let mut image = AtlasImage::new(packed.width as usize, packed.height as usize);
        assert!(matches!(compose(&packed, &glyphs[..1], &mut image), Err(CompositeError::PlacementMismatch { index: 1 })));

        let swapped = vec![glyph(2, 2, 2, 1), glyph(1, 2, 2, 1)];
        assert!(matches!(compose(&packed, &swapped, &mut image), Err(CompositeError::PlacementMismatch { index: 0 })));
    }

    #[test]
    fn staged_writes_appear_only_after_finish() {
        let glyphs = vec![glyph(1, 2, 3, 9), glyph(2, 4, 1, 5), glyph(3, 1, 1, 3)];
        let packed = packed_for(&glyphs, 6);

        let mut staged = StagedTarget::new(packed.width as usize, packed.height as usize);
        compose(&packed, &glyphs, &mut staged).unwrap();
        assert_eq!(staged.pending(), 3);
        assert_eq!(staged.staged_bytes(), 6 + 4 + 1);
        assert!(staged.visible().pixels().iter().all(|&c| c == 0));

        let mut direct = AtlasImage::new(packed.width as usize, packed.height as usize);
        compose(&packed, &glyphs, &mut direct).unwrap();

        assert_eq!(staged.finish().unwrap(), direct.finish().unwrap());
    }

    #[test]
    fn trailing_zero_rows_are_trimmed() {
        let mut image = AtlasImage::new(3, 5);
        image.write_rect(Recti::new(0, 0, 1, 1), &[1]).unwrap();
        image.write_rect(Recti::new(2, 2, 1, 1), &[2]).unwrap();
        assert_eq!(image.trimmed_pixels(), &[1, 0, 0, 0, 0, 0, 0, 0, 2]);

        let blank = AtlasImage::new(3, 5);
        assert!(blank.trimmed_pixels().is_empty());

        let restored = AtlasImage::from_pixels(3, 5, image.trimmed_pixels().to_vec()).unwrap();
        assert_eq!(restored, image);
    }
}
