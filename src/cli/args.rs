//! Command-line argument parsing for the `deflatr` binary.
//!
//! Grounded on the teacher's `cli/args.rs` in spirit only: the teacher
//! declares `clap` as a dependency but hand-rolls a `getopt`-style parser
//! instead of using it (its own migration notes call this out). This crate
//! is small enough that the idiomatic choice — and the one that actually
//! uses the stack its `Cargo.toml` commits to — is to wire `clap`'s derive
//! macros up for real, the way `clap`'s own documentation and the bulk of
//! its downstream users do.

use clap::{Parser, ValueEnum};

use crate::config::{
    LEVEL_DEFAULT, LEVEL_MAX, LEVEL_MIN, MEM_LEVEL_DEFAULT, MEM_LEVEL_MAX, MEM_LEVEL_MIN,
    WINDOW_BITS_DEFAULT, WINDOW_BITS_MAX, WINDOW_BITS_MIN,
};

/// A streaming DEFLATE (RFC 1951) compressor.
#[derive(Debug, Parser)]
#[command(name = "deflatr", version, about, long_about = None)]
pub struct Cli {
    /// Input file. Omit or pass `-` to read from standard input.
    pub input: Option<String>,

    /// Output file. Defaults to `<input>.deflate`, or standard output when
    /// reading from standard input.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Write compressed output to standard output.
    #[arg(short('c'), long)]
    pub stdout: bool,

    /// Overwrite an existing output file without prompting.
    #[arg(short, long)]
    pub force: bool,

    /// Compression level (0 = stored only, 9 = best compression).
    #[arg(short, long, value_name = "0-9", default_value_t = LEVEL_DEFAULT)]
    #[arg(value_parser = clap::value_parser!(i32).range(LEVEL_MIN as i64..=LEVEL_MAX as i64))]
    pub level: i32,

    /// Sliding window size, as a power of two (2^9 .. 2^15 bytes).
    #[arg(long = "window-bits", value_name = "9-15", default_value_t = WINDOW_BITS_DEFAULT)]
    #[arg(value_parser = clap::value_parser!(u32).range(WINDOW_BITS_MIN as i64..=WINDOW_BITS_MAX as i64))]
    pub window_bits: u32,

    /// Memory level: controls hash-table and literal-buffer sizing (1-9).
    #[arg(long = "mem-level", value_name = "1-9", default_value_t = MEM_LEVEL_DEFAULT)]
    #[arg(value_parser = clap::value_parser!(u32).range(MEM_LEVEL_MIN as i64..=MEM_LEVEL_MAX as i64))]
    pub mem_level: u32,

    /// Match-finding strategy.
    #[arg(long, value_enum, default_value_t = StrategyArg::Default)]
    pub strategy: StrategyArg,

    /// Flush mode applied after every input chunk (demonstrates the
    /// streaming flush contract); the final chunk always finishes the stream
    /// regardless of this setting.
    #[arg(long, value_enum, default_value_t = FlushArg::NoFlush)]
    pub flush: FlushArg,

    /// Wrap the output in an RFC 1950 zlib header and Adler-32 trailer
    /// instead of emitting a raw DEFLATE stream. Requires the `zlib-wrapper`
    /// feature.
    #[arg(long)]
    pub zlib: bool,

    /// Increase diagnostic verbosity; may be repeated (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all diagnostics except fatal errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// CLI-facing mirror of [`crate::config::Strategy`] (kept separate so
/// `clap::ValueEnum`'s derive doesn't have to reach into the library's own
/// enum, and so renaming CLI flags never forces a library API change).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Default,
    Filtered,
    #[value(name = "huffman-only")]
    HuffmanOnly,
    Rle,
    Fixed,
}

impl From<StrategyArg> for crate::config::Strategy {
    fn from(a: StrategyArg) -> Self {
        match a {
            StrategyArg::Default => crate::config::Strategy::Default,
            StrategyArg::Filtered => crate::config::Strategy::Filtered,
            StrategyArg::HuffmanOnly => crate::config::Strategy::HuffmanOnly,
            StrategyArg::Rle => crate::config::Strategy::Rle,
            StrategyArg::Fixed => crate::config::Strategy::Fixed,
        }
    }
}

/// CLI-facing mirror of [`crate::config::FlushMode`], excluding `Finish`
/// (the driver always finishes the stream once input is exhausted, so it is
/// never a meaningful per-chunk choice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FlushArg {
    #[value(name = "none")]
    NoFlush,
    Partial,
    Sync,
    Full,
    Block,
}

impl From<FlushArg> for crate::config::FlushMode {
    fn from(a: FlushArg) -> Self {
        match a {
            FlushArg::NoFlush => crate::config::FlushMode::NoFlush,
            FlushArg::Partial => crate::config::FlushMode::PartialFlush,
            FlushArg::Sync => crate::config::FlushMode::SyncFlush,
            FlushArg::Full => crate::config::FlushMode::FullFlush,
            FlushArg::Block => crate::config::FlushMode::Block,
        }
    }
}

impl Cli {
    /// Resolves the effective display level from `--verbose`/`--quiet`.
    pub fn display_level(&self) -> u32 {
        if self.quiet {
            0
        } else {
            2 + self.verbose as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["deflatr"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).expect("args should parse")
    }

    #[test]
    fn defaults_match_config_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.level, LEVEL_DEFAULT);
        assert_eq!(cli.window_bits, WINDOW_BITS_DEFAULT);
        assert_eq!(cli.mem_level, MEM_LEVEL_DEFAULT);
        assert_eq!(cli.strategy, StrategyArg::Default);
        assert!(!cli.zlib);
    }

    #[test]
    fn rejects_out_of_range_level() {
        let full = vec!["deflatr", "--level", "10"];
        assert!(Cli::try_parse_from(full).is_err());
    }

    #[test]
    fn parses_strategy_and_flush_flags() {
        let cli = parse(&["--strategy", "huffman-only", "--flush", "sync"]);
        assert_eq!(cli.strategy, StrategyArg::HuffmanOnly);
        assert_eq!(cli.flush, FlushArg::Sync);
        assert_eq!(
            crate::config::Strategy::from(cli.strategy),
            crate::config::Strategy::HuffmanOnly
        );
        assert_eq!(
            crate::config::FlushMode::from(cli.flush),
            crate::config::FlushMode::SyncFlush
        );
    }

    #[test]
    fn verbose_and_quiet_drive_display_level() {
        let cli = parse(&["-vv"]);
        assert_eq!(cli.display_level(), 4);
        let cli = parse(&["--quiet"]);
        assert_eq!(cli.display_level(), 0);
    }

    #[test]
    fn input_and_output_positional_and_flag() {
        let cli = parse(&["in.txt", "-o", "out.deflate"]);
        assert_eq!(cli.input.as_deref(), Some("in.txt"));
        assert_eq!(cli.output.as_deref(), Some("out.deflate"));
    }
}
