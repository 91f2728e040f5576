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
use bfa::{BfaFile, GlyphRecord};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[path = "common/cli.rs"]
mod cli;

use cli::LogLevelArg;

const NOT_FOUND: u8 = 2;

/// Print the summary of a .bfa file and the glyph record for one character code
#[derive(Parser, Debug)]
#[command(name = "bfa-lookup", version, about)]
struct Cli {
    /// Log verbosity (overrides BFA_LOG)
    #[arg(long, value_enum, value_name = "LEVEL")]
    log_level: Option<LogLevelArg>,

    /// The .bfa file to read
    file: PathBuf,

    /// Character code: decimal, 0x-prefixed hex, U+-prefixed hex, or a single character
    #[arg(value_parser = parse_code)]
    code: u32,
}

fn parse_code(text: &str) -> Result<u32, String> {
    let hex = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")).or_else(|| text.strip_prefix("U+")).or_else(|| text.strip_prefix("u+"));
    if let Some(digits) = hex {
        return u32::from_str_radix(digits, 16).map_err(|e| format!("invalid hex character code \"{}\": {}", text, e));
    }

    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if !ch.is_ascii_digit() => Ok(ch as u32),
        _ => text.parse::<u32>().map_err(|e| format!("invalid character code \"{}\": {}", text, e)),
    }
}

fn print_record(record: &GlyphRecord) {
    println!("x: {}", record.x);
    println!("y: {}", record.y);
    println!("w: {}", record.w);
    println!("h: {}", record.h);
    println!("x bearing: {}", record.x_bearing);
    println!("y bearing: {}", record.y_bearing);
    println!("advance: {}", record.advance);
    println!("flags: 0x{:x}", record.flags.bits());
}

fn run(cli: &Cli) -> anyhow::Result<bool> {
    let bytes = std::fs::read(&cli.file).with_context(|| format!("failed to read {}", cli.file.display()))?;
    let file = BfaFile::parse(&bytes).with_context(|| format!("{} is not a valid .bfa file", cli.file.display()))?;
    let header = file.header();

    println!("File size: {}", bytes.len());
    println!("Magic: {}", String::from_utf8_lossy(&bfa::MAGIC));
    println!("No. Glyphs: {}", header.glyph_count);
    println!("Map type: {}", header.map_type.name());
    println!("Font size: {}", header.font_size);
    println!("Atlas width: {}", header.atlas_width);
    println!("Atlas height: {}", header.atlas_height);
    println!("Size of stored image data: {} MB", header.stored_image_size as f64 / (1 << 20) as f64);
    println!();

    match file.lookup(cli.code) {
        Some(record) => {
            print_record(&record);
            Ok(true)
        }
        None => {
            log::debug!("U+{:04X} is not in the {} table", cli.code, header.map_type.name());
            println!("Glyph not found");
            Ok(false)
        }
    }
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

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(NOT_FOUND),
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() { Cli::command().debug_assert(); }

    #[test]
    fn code_notations() {
        assert_eq!(parse_code("65"), Ok(65));
        assert_eq!(parse_code("0x41"), Ok(0x41));
        assert_eq!(parse_code("U+03A9"), Ok(0x3A9));
        assert_eq!(parse_code("A"), Ok(65));
        assert_eq!(parse_code("Ω"), Ok(0x3A9));
        assert_eq!(parse_code("7"), Ok(7));
        assert_eq!(parse_code("0"), Ok(0));
        assert!(parse_code("AB").is_err());
        assert!(parse_code("0xZZ").is_err());
        assert!(parse_code("-1").is_err());
    }
}
