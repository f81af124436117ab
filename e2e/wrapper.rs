//! Black-box tests for the `zlib-wrapper` feature: the RFC 1950 header and
//! Adler-32 trailer around the raw DEFLATE payload, both through the
//! library API and the `--zlib` CLI flag.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use deflatr::zlib_compress_to_vec;
use tempfile::TempDir;

fn deflatr_bin() -> PathBuf {
    if let Ok(p) = std::env::var("CARGO_BIN_EXE_deflatr") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop();
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("deflatr");
    p
}

#[test]
fn library_wrapper_round_trips_through_miniz_oxide() {
    let data = b"the five boxing wizards jump quickly".repeat(50);
    let out = zlib_compress_to_vec(&data, 6).unwrap();

    assert_eq!((out[0] as u16 * 256 + out[1] as u16) % 31, 0);

    let decoded = miniz_oxide::inflate::decompress_to_vec_zlib(&out).unwrap();
    assert_eq!(decoded, data);
}

#[test]
fn cli_zlib_flag_produces_zlib_framed_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.txt");
    let content = "zlib wrapper round trip test\n".repeat(200);
    fs::write(&input, &content).unwrap();

    let output = Command::new(deflatr_bin())
        .args(["--zlib", "--stdout", input.to_str().unwrap()])
        .current_dir(dir.path())
        .output()
        .expect("failed to run deflatr");
    assert!(output.status.success());

    let decoded = miniz_oxide::inflate::decompress_to_vec_zlib(&output.stdout).unwrap();
    assert_eq!(decoded, content.as_bytes());
}
