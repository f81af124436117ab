//! Binary entry point for the `deflatr` command-line tool.
//!
//! Parses arguments, resolves the input/output files (including the
//! `stdin`/`stdout` sentinels and the `<input>.deflate` auto-naming
//! convention), and drives a [`deflatr::Deflate`] stream chunk by chunk,
//! applying `--flush` after every chunk but the last to demonstrate the
//! streaming flush contract — the way the teacher's `main()` dispatches to
//! `compress_filename` after argument parsing, just with a DEFLATE-core
//! streaming loop in place of the teacher's whole-file LZ4 frame API.

use std::io::{Read, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;

use deflatr::cli::args::Cli;
use deflatr::cli::constants::{set_display_level, DEFLATR_EXTENSION};
use deflatr::io::file_io::{open_dst_file, open_src_file, STDIN_MARK, STDOUT_MARK};
use deflatr::util::get_file_size;
use deflatr::{config, displaylevel, Deflate, FlushMode, Status};

/// Bytes read from the source per `write` call. Chosen to exercise the
/// window-slide path at the default `windowBits=15` (2 * 32 KiB) without
/// being so large that `--flush sync` demonstrations produce a single chunk.
const CHUNK_SIZE: usize = 64 * 1024;

fn main() {
    let cli = Cli::parse();
    set_display_level(cli.display_level());

    if cli.zlib && !cfg!(feature = "zlib-wrapper") {
        eprintln!("deflatr: --zlib requires the crate to be built with the `zlib-wrapper` feature");
        std::process::exit(1);
    }

    match run(cli) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("deflatr: {e:#}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let input_name = cli
        .input
        .clone()
        .filter(|s| s != "-")
        .unwrap_or_else(|| STDIN_MARK.to_owned());

    let output_name = resolve_output_name(&cli, &input_name);

    displaylevel!(
        3,
        "deflatr: level={} windowBits={} memLevel={} strategy={:?} -> {}\n",
        cli.level,
        cli.window_bits,
        cli.mem_level,
        cli.strategy,
        output_name
    );

    let mut src = open_src_file(&input_name).with_context(|| format!("opening {input_name}"))?;
    let mut dst =
        open_dst_file(&output_name, cli.force || output_name == STDOUT_MARK)
            .with_context(|| format!("opening {output_name}"))?;

    let strategy = config::Strategy::from(cli.strategy);
    let per_chunk_flush = config::FlushMode::from(cli.flush);

    if cli.zlib {
        compress_zlib(&mut src, &mut dst, cli.level)?;
    } else {
        compress_raw(
            &mut src,
            &mut dst,
            cli.level,
            cli.window_bits,
            cli.mem_level,
            strategy,
            per_chunk_flush,
        )?;
    }

    dst.flush().context("flushing output")?;
    report_ratio(&input_name, &output_name);
    Ok(())
}

/// Prints a `lz4`-style compression ratio line at the normal display level,
/// skipped entirely for the `stdin`/`stdout` sentinels (there's no regular
/// file to stat, and the ratio would just clutter a piped stdout stream).
fn report_ratio(input_name: &str, output_name: &str) {
    if input_name == STDIN_MARK || output_name == STDOUT_MARK {
        return;
    }
    let in_size = get_file_size(std::path::Path::new(input_name));
    let out_size = get_file_size(std::path::Path::new(output_name));
    if in_size == 0 {
        return;
    }
    let ratio = 100.0 * out_size as f64 / in_size as f64;
    displaylevel!(
        2,
        "{input_name}: compressed {in_size} bytes into {out_size} bytes ==> {ratio:.2}%\n"
    );
}

fn resolve_output_name(cli: &Cli, input_name: &str) -> String {
    if let Some(out) = &cli.output {
        return out.clone();
    }
    if cli.stdout || input_name == STDIN_MARK {
        return STDOUT_MARK.to_owned();
    }
    format!("{input_name}{DEFLATR_EXTENSION}")
}

/// Drives a [`Deflate`] stream over `src`, applying `flush` after every
/// chunk but the last (which always finishes the stream).
fn compress_raw(
    src: &mut dyn Read,
    dst: &mut dyn Write,
    level: i32,
    window_bits: u32,
    mem_level: u32,
    strategy: config::Strategy,
    flush: FlushMode,
) -> Result<()> {
    let mut deflate = Deflate::new(level, window_bits, mem_level, strategy)
        .context("constructing compressor")?;
    let mut in_buf = vec![0u8; CHUNK_SIZE];
    let mut out_buf = vec![0u8; CHUNK_SIZE * 2 + 4096];

    loop {
        let n = src.read(&mut in_buf).context("reading input")?;
        let is_last = n == 0;
        let mode = if is_last { FlushMode::Finish } else { flush };
        let chunk = &in_buf[..n];

        let mut offset = 0;
        loop {
            let result = deflate
                .write(&chunk[offset..], &mut out_buf, mode)
                .context("compressing chunk")?;
            offset += result.consumed;
            if result.produced > 0 {
                dst.write_all(&out_buf[..result.produced])
                    .context("writing output")?;
            }
            if result.status == Status::StreamEnd {
                return Ok(());
            }
            if offset >= chunk.len() && result.produced == 0 {
                break;
            }
            if result.status == Status::BufError {
                bail!("internal invariant violation: no progress made");
            }
        }

        if is_last {
            // `Finish` was requested above but the stream did not report
            // `StreamEnd`; drain remaining pending output defensively.
            loop {
                let result = deflate.write(&[], &mut out_buf, FlushMode::Finish)?;
                if result.produced > 0 {
                    dst.write_all(&out_buf[..result.produced])?;
                }
                if result.status == Status::StreamEnd {
                    break;
                }
            }
            return Ok(());
        }
    }
}

#[cfg(feature = "zlib-wrapper")]
fn compress_zlib(src: &mut dyn Read, dst: &mut dyn Write, level: i32) -> Result<()> {
    let mut data = Vec::new();
    src.read_to_end(&mut data).context("reading input")?;
    let out = deflatr::zlib_compress_to_vec(&data, level).context("compressing (zlib)")?;
    dst.write_all(&out).context("writing output")
}

#[cfg(not(feature = "zlib-wrapper"))]
fn compress_zlib(_src: &mut dyn Read, _dst: &mut dyn Write, _level: i32) -> Result<()> {
    bail!("built without the `zlib-wrapper` feature")
}
