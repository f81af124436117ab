#![no_main]
use libfuzzer_sys::fuzz_target;

use deflatr::{Deflate, FlushMode, Status, Strategy};

/// Splits `data` into pieces at every byte equal to 0, feeding each piece
/// through a `SyncFlush` before the final `Finish` — exercising the
/// streaming flush contract rather than only the one-shot path.
fuzz_target!(|data: &[u8]| {
    let mut deflate = match Deflate::new(6, 15, 8, Strategy::Default) {
        Ok(d) => d,
        Err(_) => return,
    };

    let mut out = Vec::new();
    let mut scratch = vec![0u8; 8192];
    let pieces: Vec<&[u8]> = data.split(|&b| b == 0).collect();
    let expected: Vec<u8> = pieces.concat();

    for (i, piece) in pieces.iter().enumerate() {
        let mode = if i + 1 == pieces.len() {
            FlushMode::Finish
        } else {
            FlushMode::SyncFlush
        };
        let mut offset = 0;
        loop {
            let result = match deflate.write(&piece[offset..], &mut scratch, mode) {
                Ok(r) => r,
                Err(_) => return,
            };
            offset += result.consumed;
            out.extend_from_slice(&scratch[..result.produced]);
            if result.status == Status::StreamEnd {
                break;
            }
            if offset >= piece.len() && result.produced == 0 {
                break;
            }
        }
    }

    let recovered = miniz_oxide::inflate::decompress_to_vec(&out)
        .expect("miniz_oxide must decode a stream this crate produced");
    assert_eq!(recovered, expected, "flushed round-trip mismatch");
});
