//! Optional RFC 1950 (zlib) outer framing over the raw DEFLATE core.
//!
//! Not part of the compression core proper — the core speaks only raw
//! DEFLATE, per spec — but a thin additive convenience layer, the same way
//! the teacher's own frame API (`src/frame/`) wraps its block API with outer
//! framing rather than duplicating the compressor. Grounded on
//! `image-rs/deflate-rs`'s `zlib` module, which wraps its own raw deflate
//! writer with exactly this 2-byte header / Adler-32 trailer and uses the
//! `adler32` crate for the checksum, the same dependency used here.
//!
//! Feature-gated behind `zlib-wrapper` since it pulls in `adler32`.

use adler32::RollingAdler32;

use crate::config::{FlushMode, Strategy};
use crate::deflate::Deflate;
use crate::error::DeflateError;

/// Compresses `data` into a complete RFC 1950 zlib stream: a 2-byte header
/// (`CMF`/`FLG`, bounds-checked so `(CMF*256 + FLG) % 31 == 0` as the format
/// requires), the raw DEFLATE payload, and a big-endian Adler-32 trailer.
pub fn zlib_compress_to_vec(data: &[u8], level: i32) -> Result<Vec<u8>, DeflateError> {
    let mut out = zlib_header(level);

    let mut deflate = Deflate::new(level, 15, 8, Strategy::Default)?;
    let mut scratch = vec![0u8; (data.len() / 2).max(256) + 64];
    let mut offset = 0;
    loop {
        let result = deflate.write(&data[offset..], &mut scratch, FlushMode::Finish)?;
        offset += result.consumed;
        out.extend_from_slice(&scratch[..result.produced]);
        if result.status == crate::deflate::Status::StreamEnd {
            break;
        }
    }

    out.extend_from_slice(&adler32_of(data).to_be_bytes());
    Ok(out)
}

/// Builds the 2-byte zlib header for `level`, matching zlib's own
/// `CMF`/`FLG` construction: `CMF = 0x78` (32K window, deflate method),
/// `FLG`'s `FLEVEL` bits reflect the compression level tier, and the whole
/// 16-bit value is adjusted to be a multiple of 31.
fn zlib_header(level: i32) -> Vec<u8> {
    const CMF: u8 = 0x78;
    let flevel: u8 = match level {
        0 => 0,
        1..=5 => 1,
        6 => 2,
        _ => 3,
    };
    let mut flg = flevel << 6;
    let check = (CMF as u16 * 256 + flg as u16) % 31;
    if check != 0 {
        flg += (31 - check) as u8;
    }
    vec![CMF, flg]
}

fn adler32_of(data: &[u8]) -> u32 {
    let mut hasher = RollingAdler32::new();
    hasher.update_buffer(data);
    hasher.hash()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_multiple_of_31() {
        for level in 0..=9 {
            let h = zlib_header(level);
            let val = (h[0] as u16) * 256 + h[1] as u16;
            assert_eq!(val % 31, 0, "level {level} header {h:?}");
        }
    }

    #[test]
    fn zlib_compress_to_vec_round_trips_via_miniz_oxide() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(5);
        let out = zlib_compress_to_vec(&data, 6).unwrap();
        let decoded = miniz_oxide::inflate::decompress_to_vec_zlib(&out).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn zlib_compress_to_vec_handles_empty_input() {
        let out = zlib_compress_to_vec(b"", 6).unwrap();
        let decoded = miniz_oxide::inflate::decompress_to_vec_zlib(&out).unwrap();
        assert!(decoded.is_empty());
    }
}
