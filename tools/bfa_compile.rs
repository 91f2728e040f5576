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
use anyhow::Context;
use bfa::{AddressingScheme, CompileConfig, Compiler, FontdueSource};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process::ExitCode;

#[path = "common/cli.rs"]
mod cli;

use cli::LogLevelArg;

/// Addressing scheme argument for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum MapTypeArg {
    /// 256-entry table indexed by code
    Ascii,
    /// 16384-entry table indexed by code
    Utf16,
    /// Sorted code index, only existing glyphs are stored
    Mapped,
}

impl From<MapTypeArg> for AddressingScheme {
    fn from(arg: MapTypeArg) -> Self {
        match arg {
            MapTypeArg::Ascii => AddressingScheme::Dense8,
            MapTypeArg::Utf16 => AddressingScheme::Dense16,
            MapTypeArg::Mapped => AddressingScheme::Sparse,
        }
    }
}

/// Bake a unicode font (TTF, OTF) into a .bfa bitmap font atlas
#[derive(Parser, Debug)]
#[command(name = "bfa-compile", version, about, disable_help_flag = true)]
struct Cli {
    /// Maximum width of the atlas. Tweak it to avoid empty space in the texture
    #[arg(short = 'w', long, value_name = "DIMENSION", default_value_t = 8192, value_parser = clap::value_parser!(u16).range(1..))]
    max_width: u16,

    /// Maximum height of the atlas
    #[arg(short = 'h', long, value_name = "DIMENSION", default_value_t = 8192, value_parser = clap::value_parser!(u16).range(1..))]
    max_height: u16,

    /// Also dump the atlas to a Targa file (overwrites if exists)
    #[arg(short = 't', long, value_name = "PATH")]
    output_tga: Option<PathBuf>,

    /// Also dump the atlas to a PNG file (overwrites if exists)
    #[arg(short = 'p', long, value_name = "PATH")]
    output_png: Option<PathBuf>,

    /// Glyph table layout
    #[arg(short = 'm', long, value_enum, value_name = "TYPE", default_value_t = MapTypeArg::Mapped)]
    map_type: MapTypeArg,

    /// Log verbosity (overrides BFA_LOG)
    #[arg(long, value_enum, value_name = "LEVEL")]
    log_level: Option<LogLevelArg>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Font file to bake
    input: PathBuf,

    /// Pixel size to rasterize at
    #[arg(value_parser = clap::value_parser!(u8).range(1..))]
    font_size: u8,

    /// Output .bfa path
    output: PathBuf,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = CompileConfig {
        font_size: cli.font_size,
        max_width: cli.max_width,
        max_height: cli.max_height,
        scheme: cli.map_type.into(),
    };

    let source = FontdueSource::from_file(&cli.input, cli.font_size as f32)
        .with_context(|| format!("failed to load font {} (is it a valid TTF/OTF file?)", cli.input.display()))?;
    let compiled = Compiler::new(config, source)?.compile_to_file(&cli.output).context("failed to compile the atlas")?;

    if let Some(path) = &cli.output_tga {
        bfa::save_tga(&compiled.font.image, path).context("failed to write the TGA dump")?;
    }
    if let Some(path) = &cli.output_png {
        bfa::save_png(&compiled.font.image, path).context("failed to write the PNG dump")?;
    }

    let stats = compiled.stats;
    println!("No. Glyphs: {}", stats.glyph_count);
    println!("Width: {}", stats.width);
    println!("Height: {}", stats.height);
    println!("Total texture size: {} MB", stats.texture_megabytes());
    println!("Output written to {}", cli.output.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };
    cli::init_logging(cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("{:?}", err);
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
