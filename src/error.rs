//! Error types for the DEFLATE encoder core.
//!
//! Three kinds, exactly as laid out by the error-handling design:
//!
//! - [`ConfigError`] — invalid parameters at [`crate::Deflate::new`] time.
//! - [`StreamErrorKind::BufferError`] — progress impossible for this call
//!   (neither input consumed nor output produced); non-fatal, state preserved.
//! - [`StreamErrorKind::InvariantViolation`] — an internal invariant failed;
//!   indicates a bug in the encoder, not bad input, and should be unreachable
//!   in a correct build (most such conditions are instead caught early by
//!   `debug_assert!` in debug builds, mirroring the teacher's own
//!   `debug_assert!`-as-bug-detector style rather than runtime `assert!`).
//!
//! Both error kinds are folded into [`DeflateError`], which implements
//! `Display` and `std::error::Error` so it composes with `anyhow` at the CLI
//! boundary.

use std::fmt;

/// Invalid construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `level` was outside `0..=9`.
    LevelOutOfRange(i32),
    /// `window_bits` was outside `9..=15`.
    WindowBitsOutOfRange(u32),
    /// `mem_level` was outside `1..=9`.
    MemLevelOutOfRange(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LevelOutOfRange(l) => {
                write!(f, "compression level {l} out of range (expected 0..=9)")
            }
            ConfigError::WindowBitsOutOfRange(w) => {
                write!(f, "windowBits {w} out of range (expected 9..=15)")
            }
            ConfigError::MemLevelOutOfRange(m) => {
                write!(f, "memLevel {m} out of range (expected 1..=9)")
            }
        }
    }
}

/// Errors surfaced by a steady-state [`crate::Deflate::write`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamErrorKind {
    /// Neither input was consumed nor output produced this call. The caller
    /// must supply more input or a larger output buffer and retry; internal
    /// state is unchanged.
    BufferError,
    /// An internal invariant was violated. This indicates a bug in the
    /// encoder itself, not a property of the input (any byte sequence is
    /// valid DEFLATE input). Carries a short static description of which
    /// invariant failed.
    InvariantViolation(&'static str),
}

impl fmt::Display for StreamErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamErrorKind::BufferError => {
                write!(f, "no progress: supply more input or output space")
            }
            StreamErrorKind::InvariantViolation(what) => {
                write!(f, "internal invariant violated: {what}")
            }
        }
    }
}

/// The top-level error type for this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeflateError {
    Config(ConfigError),
    Stream(StreamErrorKind),
}

impl From<ConfigError> for DeflateError {
    fn from(e: ConfigError) -> Self {
        DeflateError::Config(e)
    }
}

impl From<StreamErrorKind> for DeflateError {
    fn from(e: StreamErrorKind) -> Self {
        DeflateError::Stream(e)
    }
}

impl fmt::Display for DeflateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeflateError::Config(e) => write!(f, "{e}"),
            DeflateError::Stream(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DeflateError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_mentions_value() {
        let e = ConfigError::LevelOutOfRange(42);
        assert!(e.to_string().contains("42"));
    }

    #[test]
    fn buffer_error_is_non_fatal_by_convention() {
        // BufferError carries no payload — its meaning is "retry", not "bug".
        let e = StreamErrorKind::BufferError;
        assert_eq!(e, StreamErrorKind::BufferError);
    }

    #[test]
    fn deflate_error_from_conversions() {
        let e: DeflateError = ConfigError::MemLevelOutOfRange(0).into();
        assert!(matches!(e, DeflateError::Config(_)));
        let e: DeflateError = StreamErrorKind::BufferError.into();
        assert!(matches!(e, DeflateError::Stream(_)));
    }

    #[test]
    fn deflate_error_implements_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&DeflateError::Stream(StreamErrorKind::BufferError));
    }
}
