//! Black-box tests for the streaming flush contract via the library API
//! (not the CLI): every [`FlushMode`] produces a valid DEFLATE stream that
//! `miniz_oxide` can decode once finished, and [`FlushMode::SyncFlush`]
//! leaves a byte-aligned, decodable prefix mid-stream.

use deflatr::{Deflate, FlushMode, Status, Strategy};

fn drain(deflate: &mut Deflate, input: &[u8], mode: FlushMode, out: &mut Vec<u8>) {
    let mut scratch = vec![0u8; input.len() * 2 + 4096];
    let mut offset = 0;
    loop {
        let result = deflate
            .write(&input[offset..], &mut scratch, mode)
            .unwrap();
        offset += result.consumed;
        out.extend_from_slice(&scratch[..result.produced]);
        if result.status == Status::StreamEnd {
            break;
        }
        if offset >= input.len() && result.produced == 0 {
            break;
        }
    }
}

#[test]
fn sync_flush_leaves_a_decodable_prefix() {
    let mut deflate = Deflate::new(6, 15, 8, Strategy::Default).unwrap();
    let mut out = Vec::new();

    drain(&mut deflate, b"the quick brown fox jumps over the lazy dog, ", FlushMode::SyncFlush, &mut out);

    // Sync flush must produce a stream ending in the empty-stored-block
    // marker 00 00 FF FF, decodable on its own.
    let decoded = miniz_oxide::inflate::decompress_to_vec(&out).unwrap();
    assert_eq!(decoded, b"the quick brown fox jumps over the lazy dog, ");

    drain(&mut deflate, b"repeated many times over.", FlushMode::Finish, &mut out);
    let decoded = miniz_oxide::inflate::decompress_to_vec(&out).unwrap();
    assert_eq!(
        decoded,
        b"the quick brown fox jumps over the lazy dog, repeated many times over."
    );
}

#[test]
fn full_flush_resets_match_history_but_stays_decodable() {
    let mut deflate = Deflate::new(6, 15, 8, Strategy::Default).unwrap();
    let mut out = Vec::new();

    drain(&mut deflate, b"aaaaaaaaaaaaaaaaaaaaaaaa", FlushMode::FullFlush, &mut out);
    drain(&mut deflate, b"bbbbbbbbbbbbbbbbbbbbbbbb", FlushMode::Finish, &mut out);

    let decoded = miniz_oxide::inflate::decompress_to_vec(&out).unwrap();
    assert_eq!(decoded, b"aaaaaaaaaaaaaaaaaaaaaaaabbbbbbbbbbbbbbbbbbbbbbbb");
}

#[test]
fn block_flush_emits_without_finishing_stream() {
    let mut deflate = Deflate::new(6, 15, 8, Strategy::Default).unwrap();
    let mut scratch = vec![0u8; 4096];

    let result = deflate
        .write(b"one two three", &mut scratch, FlushMode::Block)
        .unwrap();
    assert_ne!(result.status, Status::StreamEnd);
    assert!(result.produced > 0);

    let mut out = scratch[..result.produced].to_vec();
    drain(&mut deflate, b" four five", FlushMode::Finish, &mut out);

    let decoded = miniz_oxide::inflate::decompress_to_vec(&out).unwrap();
    assert_eq!(decoded, b"one two three four five");
}

#[test]
fn many_small_writes_interleaved_with_partial_flush() {
    let mut deflate = Deflate::new(9, 15, 9, Strategy::Default).unwrap();
    let mut out = Vec::new();
    let words = ["alpha ", "beta ", "gamma ", "delta "];

    for (i, w) in words.iter().enumerate() {
        let mode = if i + 1 == words.len() {
            FlushMode::Finish
        } else {
            FlushMode::PartialFlush
        };
        drain(&mut deflate, w.as_bytes(), mode, &mut out);
    }

    let decoded = miniz_oxide::inflate::decompress_to_vec(&out).unwrap();
    assert_eq!(decoded, words.concat().as_bytes());
}
