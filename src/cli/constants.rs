//! Diagnostics constants and the verbosity-gated display macros.
//!
//! Grounded on the teacher's `cli/constants.rs` (itself a port of
//! `lz4cli.c`'s `DISPLAYLEVEL`/`g_displayLevel` convention): a single
//! crate-wide atomic controls how chatty the CLI is, and every diagnostic
//! print goes through one of these macros rather than scattered
//! `if verbose { ... }` checks at call sites. Trimmed relative to the
//! teacher's version: the legacy-alias global (`g_lz4c_legacy_commands`,
//! needed only because the LZ4 CLI ships several differently-named
//! binaries with different default flags) and `end_process!`/`debugoutput!`
//! have no counterpart — this crate has one binary and propagates errors
//! through `anyhow` rather than an inline `exit()`.

use std::sync::atomic::{AtomicU32, Ordering};

pub const COMPRESSOR_NAME: &str = "deflatr";
pub const DEFLATR_EXTENSION: &str = ".deflate";

/// 0 = silent; 1 = errors only; 2 = normal (downgradable); 3 = non-downgradable; 4 = verbose.
pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(2);

/// Returns the current display level.
#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Sets the display level.
#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

/// Print to stdout — equivalent to the teacher's `displayout!`.
#[macro_export]
macro_rules! displayout {
    ($($arg:tt)*) => { print!($($arg)*) };
}

/// Print to stderr unconditionally — equivalent to the teacher's `display!`.
#[macro_export]
macro_rules! display {
    ($($arg:tt)*) => { eprint!($($arg)*) };
}

/// Conditionally print to stderr at or above `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::cli::constants::display_level() >= $level {
            eprint!($($arg)*);
        }
    };
}
