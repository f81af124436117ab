//! CLI surface for the `deflatr` binary.
//!
//! Trimmed from the teacher's `cli/` (multiple submodules mirroring
//! `lz4cli.c` section by section): only the diagnostics constants and the
//! argument parser survive, since everything else (alias detection,
//! benchmark-mode help text, op-mode dispatch tables) is specific to the
//! LZ4 CLI's much larger surface.

pub mod args;
pub mod constants;
