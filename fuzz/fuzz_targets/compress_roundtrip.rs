#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Level is derived from the first byte (if any) so the fuzzer explores
    // every level, not just the default.
    let level = data.first().map(|b| (*b % 10) as i32).unwrap_or(6);
    let payload = if data.is_empty() { data } else { &data[1..] };

    let compressed = match deflatr::compress_to_vec(payload, level) {
        Ok(c) => c,
        Err(_) => return,
    };

    let recovered = miniz_oxide::inflate::decompress_to_vec(&compressed)
        .expect("miniz_oxide must decode a stream this crate produced");
    assert_eq!(recovered, payload, "round-trip mismatch at level {level}");
});
