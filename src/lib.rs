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
#![deny(missing_docs)]
//! `bfa` compiles scalable fonts into `.bfa` bitmap font atlases and reads them back.
//!
//! A compilation rasterizes every glyph once through a [`GlyphSource`], packs the
//! bitmaps into fixed-height rows ([`pack`]), writes them into an [`AtlasTarget`]
//! ([`compose`]) and serializes the records and pixels ([`BakedFont::encode`]).
//! [`BfaFile`] parses the result and resolves a glyph record by character code.

mod compiler;
mod compositor;
mod debug_image;
mod error;
mod format;
mod glyph;
mod glyph_source;
mod reader;
mod rect_packer;

pub use compiler::*;
pub use compositor::*;
pub use debug_image::*;
pub use error::*;
pub use format::*;
pub use glyph::*;
pub use glyph_source::*;
pub use reader::*;
pub use rect_packer::*;
pub use rs_math3d::*;

use bitflags::*;
