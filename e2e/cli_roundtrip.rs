//! Black-box tests for the `deflatr` binary as a subprocess.
//!
//! Covers argument parsing, compress dispatch, exit codes, and the file
//! I/O conventions (`<input>.deflate` default naming, `--stdout`, `-f`
//! overwrite). Decodes the binary's output through `miniz_oxide` to check
//! for a correct, standalone DEFLATE stream.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

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

fn make_temp_input() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let input_path = dir.path().join("input.txt");
    let content = "Hello, DEFLATE!\n".repeat(341);
    fs::write(&input_path, content).unwrap();
    (dir, input_path)
}

#[test]
fn compress_creates_default_named_output() {
    let (dir, input) = make_temp_input();
    let original = fs::read(&input).unwrap();

    let status = Command::new(deflatr_bin())
        .arg(input.to_str().unwrap())
        .current_dir(dir.path())
        .status()
        .expect("failed to run deflatr");
    assert!(status.success(), "compress should exit 0");

    let expected_output = dir.path().join("input.txt.deflate");
    assert!(expected_output.exists(), "default output file should exist");

    let compressed = fs::read(&expected_output).unwrap();
    let decoded = miniz_oxide::inflate::decompress_to_vec(&compressed).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn compress_to_stdout_flag() {
    let (dir, input) = make_temp_input();
    let original = fs::read(&input).unwrap();

    let output = Command::new(deflatr_bin())
        .args(["--stdout", input.to_str().unwrap()])
        .current_dir(dir.path())
        .output()
        .expect("failed to run deflatr");
    assert!(output.status.success());

    let decoded = miniz_oxide::inflate::decompress_to_vec(&output.stdout).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn refuses_to_overwrite_without_force() {
    let (dir, input) = make_temp_input();
    let existing = dir.path().join("input.txt.deflate");
    fs::write(&existing, b"not deflate data").unwrap();

    let status = Command::new(deflatr_bin())
        .args(["-q", input.to_str().unwrap()])
        .current_dir(dir.path())
        .status()
        .expect("failed to run deflatr");
    assert!(!status.success(), "should refuse to overwrite without -f");

    let status = Command::new(deflatr_bin())
        .args(["-f", input.to_str().unwrap()])
        .current_dir(dir.path())
        .status()
        .expect("failed to run deflatr");
    assert!(status.success(), "-f should allow overwriting");
}

#[test]
fn level_flag_controls_output_size_ordering() {
    let (dir, input) = make_temp_input();

    let mut sizes = Vec::new();
    for level in ["0", "1", "9"] {
        let out_path = dir.path().join(format!("level_{level}.deflate"));
        let status = Command::new(deflatr_bin())
            .args([
                "--level",
                level,
                "-o",
                out_path.to_str().unwrap(),
                input.to_str().unwrap(),
            ])
            .current_dir(dir.path())
            .status()
            .expect("failed to run deflatr");
        assert!(status.success());
        sizes.push(fs::metadata(&out_path).unwrap().len());
    }

    // Level 0 is stored-only and must be no smaller than level 9 on
    // highly-repetitive input.
    assert!(sizes[0] >= sizes[2], "stored output should not beat level 9: {sizes:?}");
}

#[test]
fn rejects_out_of_range_level() {
    let (dir, input) = make_temp_input();
    let status = Command::new(deflatr_bin())
        .args(["--level", "10", input.to_str().unwrap()])
        .current_dir(dir.path())
        .status()
        .expect("failed to run deflatr");
    assert!(!status.success());
}

#[test]
fn cli_version_runs() {
    let output = Command::new(deflatr_bin())
        .arg("--version")
        .output()
        .expect("failed to run deflatr --version");
    assert!(output.status.success());
}
