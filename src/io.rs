//! File and stdio plumbing for the `deflatr` CLI.
//!
//! Trimmed from the teacher's `lz4io.h`-mirroring module: only the sentinel
//! handling and overwrite-prompt behaviour survive (see [`file_io`]); the
//! frame-format helpers, sparse-file tracking, and multi-worker dispatch
//! have no DEFLATE-core counterpart and are dropped (see `DESIGN.md`).

pub mod file_io;

pub use file_io::{open_dst_file, open_src_file, DstFile, STDIN_MARK, STDOUT_MARK};
