//! `deflatr` — a streaming DEFLATE (RFC 1951) encoder core: sliding window,
//! hash-chain match finder, dynamic/static Huffman block selection, and a
//! bit-packed output sink, driven through an explicit flush-mode state
//! machine.
//!
//! This crate implements only the *compressor*; it never decodes. Tests and
//! benches lean on `miniz_oxide` as an external decode oracle.

pub mod bitstream;
pub mod block;
pub mod cli;
pub mod config;
pub mod deflate;
pub mod error;
pub mod hash;
pub mod huffman;
pub mod io;
pub mod literals;
pub mod lorem;
pub mod match_finder;
pub mod tables;
pub mod util;
pub mod window;

#[cfg(feature = "zlib-wrapper")]
pub mod wrapper;

pub use config::{DataType, FlushMode, Strategy};
pub use deflate::{Deflate, Status, WriteResult};
pub use error::{ConfigError, DeflateError, StreamErrorKind};

#[cfg(feature = "zlib-wrapper")]
pub use wrapper::zlib_compress_to_vec;

/// One-shot convenience wrapper: compresses `data` at `level` using default
/// window/memory tunables and returns the complete raw DEFLATE stream.
///
/// Mirrors the teacher's `lz4_compress_default` top-level re-export: a
/// one-shot convenience sitting atop the streaming primitive, for callers
/// who don't need incremental control.
pub fn compress_to_vec(data: &[u8], level: i32) -> Result<Vec<u8>, DeflateError> {
    let mut deflate = Deflate::new(level, config::WINDOW_BITS_DEFAULT, config::MEM_LEVEL_DEFAULT, Strategy::Default)?;
    let mut out = Vec::with_capacity(data.len() / 2 + 64);
    let mut scratch = vec![0u8; (data.len() / 2).max(256) + 64];
    let mut offset = 0;
    loop {
        let result = deflate.write(&data[offset..], &mut scratch, FlushMode::Finish)?;
        offset += result.consumed;
        out.extend_from_slice(&scratch[..result.produced]);
        if result.status == Status::StreamEnd {
            break;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_to_vec_round_trips_through_miniz_oxide() {
        let data = b"one two three one two three one two three".to_vec();
        let out = compress_to_vec(&data, 6).unwrap();
        let decoded = miniz_oxide::inflate::decompress_to_vec(&out).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn compress_to_vec_handles_empty_input() {
        let out = compress_to_vec(b"", 6).unwrap();
        assert!(!out.is_empty());
        let decoded = miniz_oxide::inflate::decompress_to_vec(&out).unwrap();
        assert!(decoded.is_empty());
    }
}
