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
use std::io::BufWriter;
use std::path::Path;

const TGA_HEADER_SIZE: usize = 18;
const TGA_TRUE_COLOR: u8 = 2;
// 8 alpha bits, top-left origin
const TGA_DESCRIPTOR: u8 = 0x28;

/// Encodes the atlas grid as an uncompressed 32 bpp TGA: black pixels whose alpha is the coverage.
pub fn tga_image_bytes(image: &AtlasImage) -> Result<Vec<u8>, FormatError> {
    let dimension_error = || FormatError::DimensionMismatch {
        width: image.width(),
        height: image.height(),
    };
    let width = u16::try_from(image.width()).map_err(|_| dimension_error())?;
    let height = u16::try_from(image.height()).map_err(|_| dimension_error())?;

    let mut out = Vec::with_capacity(TGA_HEADER_SIZE + image.pixels().len() * 4);
    out.extend_from_slice(&[0, 0, TGA_TRUE_COLOR, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.push(32);
    out.push(TGA_DESCRIPTOR);
    out.extend(image.pixels().iter().flat_map(|&a| [0, 0, 0, a]));
    Ok(out)
}

/// Writes the atlas grid to disk as a TGA.
pub fn save_tga(image: &AtlasImage, path: impl AsRef<Path>) -> Result<(), CompileError> {
    let path = path.as_ref();
    let bytes = tga_image_bytes(image)?;
    crate::compiler::write_or_discard(path, &bytes, BufWriter::new)?;
    log::info!("wrote {}x{} TGA dump to {}", image.width(), image.height(), path.display());
    Ok(())
}

/// Serializes the atlas grid into PNG bytes: white pixels whose alpha is the coverage.
#[cfg(feature = "builder")]
pub fn png_image_bytes(image: &AtlasImage) -> std::io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let pixels = image.pixels().iter().flat_map(|&a| [0xFF, 0xFF, 0xFF, a]).collect::<Vec<u8>>();
    {
        let mut encoder = png::Encoder::new(&mut bytes, image.width() as u32, image.height() as u32);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(pixels.as_slice())?;
    }
    Ok(bytes)
}

/// Writes the atlas grid to disk as a PNG.
#[cfg(feature = "builder")]
pub fn save_png(image: &AtlasImage, path: impl AsRef<Path>) -> Result<(), CompileError> {
    let path = path.as_ref();
    let bytes = png_image_bytes(image).map_err(|e| CompileError::io(path, e))?;
    crate::compiler::write_or_discard(path, &bytes, BufWriter::new)?;
    log::info!("wrote {}x{} PNG dump to {}", image.width(), image.height(), path.display());
    Ok(())
}
