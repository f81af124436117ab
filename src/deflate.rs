//! Stream driver: the top-level state machine that orchestrates input
//! intake, the match-finding strategy, block emission, and flush semantics.
//!
//! Ported from zlib's `deflate()`/`fill_window`/`deflate_slow`/`deflate_fast`/
//! `deflate_rle`/`deflate_stored` family in `deflate.c`. Unlike the C source
//! (which suspends mid-block when the caller's fixed output buffer fills),
//! this driver accumulates encoded bytes in [`crate::bitstream::BitSink`]'s
//! unbounded internal buffer and drains as much as fits into the caller's
//! slice on the way out — the same simplification the other pure-Rust
//! deflate ports in the reference pack make (no raw pointers into a
//! caller-owned output buffer), while preserving the externally-observable
//! ordering guarantee: all bytes for call N precede any byte of call N+1.

use crate::bitstream::BitSink;
use crate::block;
use crate::config::{self, DataType, FlushMode, Strategy, MIN_LOOKAHEAD, MIN_MATCH};
use crate::error::DeflateError;
use crate::hash::{HashIndex, NIL};
use crate::literals::LiteralBuffer;
use crate::tables::L_CODES;
use crate::window::Window;

/// Outcome of a single [`Deflate::write`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    StreamEnd,
    /// No progress was possible this call (no input consumed, no output
    /// produced): supply more input or a larger output buffer and retry.
    /// Internal state is unchanged.
    BufError,
}

/// Result of a single [`Deflate::write`] call: how much input was consumed,
/// how many output bytes were produced, and the resulting status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteResult {
    pub consumed: usize,
    pub produced: usize,
    pub status: Status,
}

/// One-byte-behind match bookkeeping used by the lazy-matching policy
/// (levels >= 4). Mirrors zlib's `match_available`/`prev_length`/
/// `prev_match` fields in `deflate_state`.
#[derive(Debug, Default)]
struct LazyState {
    match_available: bool,
    prev_length: usize,
    prev_match: usize,
}

/// A streaming DEFLATE (RFC 1951) encoder.
///
/// All working memory — the sliding window, hash chains, literal buffer, and
/// pending-output buffer — is allocated in [`Deflate::new`] and never
/// reallocated during steady-state [`Deflate::write`] calls.
pub struct Deflate {
    window: Window,
    hash: HashIndex,
    literals: LiteralBuffer,
    sink: BitSink,
    level: i32,
    strategy: Strategy,
    params: config::LevelParams,
    window_bits: u32,
    lazy: LazyState,
    byte_histogram: [u32; 256],
    finished: bool,
}

impl Deflate {
    /// Constructs a new encoder. `level` must be `0..=9`, `window_bits`
    /// `9..=15`, `mem_level` `1..=9`.
    pub fn new(
        level: i32,
        window_bits: u32,
        mem_level: u32,
        strategy: Strategy,
    ) -> Result<Self, DeflateError> {
        config::validate_params(level, window_bits, mem_level).map_err(DeflateError::from)?;
        let hash_bits = config::hash_bits(mem_level);
        let lit_bufsize = config::lit_bufsize(mem_level);
        let window = Window::new(window_bits);
        let hash = HashIndex::new(hash_bits, window.window_size());
        Ok(Self {
            window,
            hash,
            literals: LiteralBuffer::new(lit_bufsize),
            sink: BitSink::new(),
            level,
            strategy,
            params: config::level_params(level),
            window_bits,
            lazy: LazyState::default(),
            byte_histogram: [0; 256],
            finished: false,
        })
    }

    /// Returns the encoder to its freshly-constructed state, reusing all
    /// existing allocations.
    pub fn reset(&mut self) {
        self.window = Window::new(self.window_bits);
        self.hash.reset();
        self.literals.clear();
        self.sink = BitSink::new();
        self.lazy = LazyState::default();
        self.byte_histogram = [0; 256];
        self.finished = false;
    }

    /// Content-type classification accumulated from literal bytes seen so
    /// far. Advisory only; never changes the emitted bitstream.
    pub fn data_type(&self) -> DataType {
        let mut padded = [0u32; L_CODES + 2];
        padded[..256].copy_from_slice(&self.byte_histogram);
        block::detect_data_type(&padded)
    }

    fn min_lookahead(&self) -> usize {
        MIN_LOOKAHEAD
    }

    /// Drives one `write` call: copies as much of `input` as fits into the
    /// window, matches/tallies as policy demands, emits blocks as the
    /// literal buffer fills or `flush` requires, and drains as many encoded
    /// bytes as fit into `output`.
    pub fn write(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        flush: FlushMode,
    ) -> Result<WriteResult, DeflateError> {
        if self.finished {
            let produced = self.sink.drain_into(output);
            let status = if self.sink.is_empty() {
                Status::StreamEnd
            } else {
                Status::Ok
            };
            return Ok(WriteResult {
                consumed: 0,
                produced,
                status,
            });
        }

        let mut consumed = 0usize;
        let is_finish = flush == FlushMode::Finish;

        loop {
            let room = self.window.free_space();
            let remaining = input.len() - consumed;
            let take = room.min(remaining);
            if take > 0 {
                self.window.append(&input[consumed..consumed + take]);
                consumed += take;
            }

            if self.window.needs_slide(self.min_lookahead()) {
                // A slide discards the first half of the buffer; anything
                // still unflushed there (`block_start` within it) would be
                // lost. zlib's `block_start` is a signed offset that can go
                // negative across a slide and still address history
                // correctly; ours is a plain `usize`, so instead we force
                // the pending block out first whenever it starts inside the
                // half about to be dropped.
                if self.window.block_start < self.window.window_size() {
                    self.flush_pending_block(false, false);
                }
                self.slide();
            }

            let more_input_may_come = consumed < input.len();
            let draining_fully = is_finish || !more_input_may_come && flush != FlushMode::NoFlush;

            self.run_until_stalled(draining_fully);

            if consumed >= input.len() {
                break;
            }
            if self.window.free_space() == 0 {
                // Nothing more can be buffered this call; let the caller
                // drain output (or retry) before supplying more input.
                break;
            }
        }

        match flush {
            FlushMode::NoFlush => {}
            FlushMode::PartialFlush => {
                self.flush_pending_block(false, false);
                self.sink.align_to_byte();
            }
            FlushMode::Block => {
                self.flush_pending_block(false, false);
            }
            FlushMode::SyncFlush => {
                self.flush_pending_block(false, false);
                block::emit_empty_stored_sync(&mut self.sink);
            }
            FlushMode::FullFlush => {
                self.flush_pending_block(false, false);
                block::emit_empty_stored_sync(&mut self.sink);
                self.hash.reset();
            }
            FlushMode::Finish => {
                self.flush_pending_block(true, false);
                self.sink.align_to_byte();
                self.finished = true;
            }
        }
        self.sink.flush_bits();

        let produced = self.sink.drain_into(output);
        let status = if self.finished && self.sink.is_empty() {
            Status::StreamEnd
        } else {
            Status::Ok
        };

        let status = if consumed == 0 && produced == 0 && status != Status::StreamEnd {
            Status::BufError
        } else {
            status
        };

        Ok(WriteResult {
            consumed,
            produced,
            status,
        })
    }

    fn slide(&mut self) {
        self.window.slide();
        self.hash.slide(self.window.window_size());
    }

    /// Emits whatever the literal buffer (or, at level 0, the unprocessed
    /// window range) currently holds as one block.
    fn flush_pending_block(&mut self, is_last: bool, force_static: bool) {
        if self.level == 0 {
            let start = self.window.block_start;
            let end = self.window.strstart;
            let bytes = self.window.as_slice()[start..end].to_vec();
            block::emit_stored_chunks(&mut self.sink, &bytes, is_last);
            self.window.block_start = end;
            return;
        }
        let start = self.window.block_start;
        let end = self.window.strstart;
        let stored_bytes = self.window.as_slice()[start..end].to_vec();
        let force_static = force_static || self.strategy == Strategy::Fixed;
        block::emit_block(&mut self.sink, &mut self.literals, &stored_bytes, is_last, force_static);
        self.window.block_start = end;
    }

    /// Processes positions from `strstart` onward until either the window
    /// runs out of usable lookahead (and `drain_fully` is false) or
    /// lookahead reaches zero.
    fn run_until_stalled(&mut self, drain_fully: bool) {
        loop {
            let lookahead = self.window.lookahead;
            if lookahead == 0 {
                self.flush_held_literal();
                break;
            }
            if !drain_fully && lookahead < self.min_lookahead() {
                break;
            }

            if self.level == 0 {
                self.window.advance(lookahead);
                break;
            }

            match self.strategy {
                Strategy::HuffmanOnly => self.step_huffman_only(),
                Strategy::Rle => self.step_rle(),
                Strategy::Default | Strategy::Filtered | Strategy::Fixed => {
                    if self.params.lazy_match {
                        self.step_lazy()
                    } else {
                        self.step_fast()
                    }
                }
            }

            if self.literals.is_full() {
                self.flush_pending_block(false, false);
            }
        }
    }

    /// Flushes the one byte `step_lazy` may be holding back as "available"
    /// when lookahead has truly run out (no more input is coming this call),
    /// mirroring zlib's post-loop `if (s->match_available) { tally it }` in
    /// `deflate_slow` — without this, the last deferred byte of every
    /// lazy-matched stream would never reach the literal buffer.
    fn flush_held_literal(&mut self) {
        if self.lazy.match_available {
            self.tally_literal_at(self.window.strstart - 1);
            self.lazy.match_available = false;
        }
    }

    fn tally_literal_at(&mut self, pos: usize) {
        let byte = self.window.byte_at(pos);
        self.byte_histogram[byte as usize] += 1;
        self.literals.tally_literal(byte);
    }

    /// Inserts the 3-byte prefix at `pos` into the hash chains, returning
    /// the previous chain head (the best existing candidate), or [`NIL`] if
    /// there isn't enough lookahead left to hash at `pos`.
    fn insert_at(&mut self, pos: usize) -> i32 {
        let filled_end = self.window.strstart + self.window.lookahead;
        if pos + MIN_MATCH > filled_end {
            return NIL;
        }
        let h = self.hash.hash3(self.window.as_slice(), pos);
        self.hash.insert(h, pos)
    }

    fn find_match(&self, pos: usize, head: i32, prev_length: usize) -> Option<crate::match_finder::Match> {
        let max_dist = self.window.max_dist(self.min_lookahead());
        if head == NIL || (pos as i32 - head) as usize > max_dist {
            return None;
        }
        crate::match_finder::longest_match(
            &self.window,
            &self.hash,
            pos,
            head,
            prev_length,
            self.params.max_chain,
            self.params.good_match,
            self.params.nice_match,
            max_dist,
        )
    }

    /// Greedy matching: levels 1-3, no one-byte lookahead deferral.
    fn step_fast(&mut self) {
        let pos = self.window.strstart;
        let head = self.insert_at(pos);
        let found = self.find_match(pos, head, MIN_MATCH - 1);
        if let Some(m) = self.accept(found) {
            self.literals.tally_match(m.distance, m.length);
            self.insert_range(pos + 1, m.length.saturating_sub(1));
            self.window.advance(m.length);
        } else {
            self.tally_literal_at(pos);
            self.window.advance(1);
        }
    }

    /// Lazy matching: levels >= 4. Defers emission by one byte to see if the
    /// next position offers a strictly longer match.
    fn step_lazy(&mut self) {
        let pos = self.window.strstart;
        let head = self.insert_at(pos);
        let found = self.find_match(pos, head, self.lazy.prev_length.max(MIN_MATCH - 1));
        let match_length = self.accept(found).map(|m| m.length).unwrap_or(MIN_MATCH - 1);
        let match_start = found.map(|m| pos - m.distance);

        if self.lazy.prev_length >= MIN_MATCH && match_length <= self.lazy.prev_length {
            // The match found one byte ago was at least as good as anything
            // available here: take it, emitting it at its original position.
            let prev_pos = pos - 1;
            let dist = prev_pos - self.lazy.prev_match;
            let len = self.lazy.prev_length;
            self.literals.tally_match(dist, len);
            self.insert_range(pos + 1, len.saturating_sub(2));
            self.window.advance(len - 1);
            self.lazy.match_available = false;
            self.lazy.prev_length = MIN_MATCH - 1;
        } else if self.lazy.match_available {
            // Nothing better appeared: the byte held one step back is a literal.
            self.tally_literal_at(pos - 1);
            // Flush here, with `strstart` still at `pos` (one behind the byte
            // just tallied's successor), before advancing past it — mirrors
            // zlib's `deflate_slow`, which calls `FLUSH_BLOCK_ONLY` between
            // `_tr_tally_lit` and `s->strstart++`. Deferring this flush to the
            // caller (after `advance`) would let the stored-block byte range
            // run one byte ahead of what the literal buffer actually covers,
            // since the next held byte hasn't been tallied yet.
            if self.literals.is_full() {
                self.flush_pending_block(false, false);
            }
            self.window.advance(1);
            self.lazy.prev_length = match_length;
            self.lazy.prev_match = match_start.unwrap_or(0);
            self.lazy.match_available = true;
        } else {
            // First position: hold it and look one byte further before deciding.
            self.lazy.match_available = true;
            self.lazy.prev_length = match_length;
            self.lazy.prev_match = match_start.unwrap_or(0);
            self.window.advance(1);
        }
    }

    /// Applies the strategy's acceptance policy to a raw match-finder result.
    fn accept(&self, found: Option<crate::match_finder::Match>) -> Option<crate::match_finder::Match> {
        match found {
            Some(m) if self.strategy == Strategy::Filtered && m.length < 6 => None,
            other => other,
        }
    }

    fn insert_range(&mut self, from: usize, count: usize) {
        let filled_end = self.window.strstart + self.window.lookahead;
        for p in from..from + count {
            if p + MIN_MATCH > filled_end {
                break;
            }
            self.insert_at(p);
        }
    }

    /// No matching at all: every byte becomes a literal.
    fn step_huffman_only(&mut self) {
        let pos = self.window.strstart;
        self.tally_literal_at(pos);
        self.window.advance(1);
    }

    /// Distance restricted to 1 (byte-wise run-length encoding).
    fn step_rle(&mut self) {
        let pos = self.window.strstart;
        let max_len = crate::config::MAX_MATCH.min(self.window.lookahead);
        if pos > 0 {
            let buf = self.window.as_slice();
            let b = buf[pos - 1];
            let mut len = 0usize;
            while len < max_len && buf[pos + len] == b {
                len += 1;
            }
            if len >= MIN_MATCH {
                self.literals.tally_match(1, len);
                self.window.advance(len);
                return;
            }
        }
        self.tally_literal_at(pos);
        self.window.advance(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compress_all(data: &[u8], level: i32, strategy: Strategy) -> Vec<u8> {
        let mut d = Deflate::new(level, 15, 8, strategy).unwrap();
        let mut out = vec![0u8; data.len() * 2 + 4096];
        let r = d.write(data, &mut out, FlushMode::Finish).unwrap();
        assert_eq!(r.status, Status::StreamEnd);
        out.truncate(r.produced);
        out
    }

    #[test]
    fn empty_input_produces_nonempty_terminated_stream() {
        let out = compress_all(b"", 6, Strategy::Default);
        assert!(!out.is_empty());
    }

    #[test]
    fn single_literal_roundtrips_through_miniz_oxide() {
        let out = compress_all(b"A", 6, Strategy::Default);
        let decoded = miniz_oxide::inflate::decompress_to_vec(&out).expect("valid deflate stream");
        assert_eq!(decoded, b"A");
    }

    #[test]
    fn highly_compressible_input_is_small() {
        let data = b"a".repeat(1000);
        let out = compress_all(&data, 6, Strategy::Default);
        assert!(out.len() < 50, "compressed size {}", out.len());
        let decoded = miniz_oxide::inflate::decompress_to_vec(&out).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn incompressible_random_bytes_round_trip_with_small_overhead() {
        // Deterministic pseudo-random bytes (no external RNG dependency in tests).
        let mut data = vec![0u8; 4096];
        let mut x: u32 = 0x9E3779B9;
        for b in data.iter_mut() {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            *b = (x & 0xFF) as u8;
        }
        let out = compress_all(&data, 9, Strategy::Default);
        assert!(out.len() <= data.len() + 16, "overhead too large: {}", out.len());
        let decoded = miniz_oxide::inflate::decompress_to_vec(&out).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn lazy_matching_round_trips_across_a_forced_mid_stream_flush() {
        // A tiny `lit_bufsize` (mem_level=1) forces `run_until_stalled` to
        // flush mid-stream well before any explicit flush call, repeatedly
        // landing on `step_lazy`'s "emit held literal" branch since
        // low-redundancy input rarely finds a match. This exercises the
        // stored/Huffman block boundary right at a held byte.
        let mut d = Deflate::new(6, 15, 1, Strategy::Default).unwrap();
        let mut data = vec![0u8; 20_000];
        let mut x: u32 = 0x2545F491;
        for b in data.iter_mut() {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            *b = (x & 0xFF) as u8;
        }
        let mut out = vec![0u8; data.len() * 2 + 4096];
        let r = d.write(&data, &mut out, FlushMode::Finish).unwrap();
        assert_eq!(r.status, Status::StreamEnd);
        out.truncate(r.produced);
        let decoded = miniz_oxide::inflate::decompress_to_vec(&out).expect("valid deflate stream");
        assert_eq!(decoded, data);
    }

    #[test]
    fn sync_flush_then_finish_both_decode_to_full_input() {
        let mut d = Deflate::new(6, 15, 8, Strategy::Default).unwrap();
        let mut out1 = vec![0u8; 4096];
        let r1 = d.write(b"hello ", &mut out1, FlushMode::SyncFlush).unwrap();
        out1.truncate(r1.produced);
        assert!(out1.ends_with(&[0x00, 0x00, 0xFF, 0xFF]));

        let mut out2 = vec![0u8; 4096];
        let r2 = d.write(b"world", &mut out2, FlushMode::Finish).unwrap();
        out2.truncate(r2.produced);

        let mut combined = out1.clone();
        combined.extend_from_slice(&out2);
        let decoded = miniz_oxide::inflate::decompress_to_vec(&combined).unwrap();
        assert_eq!(decoded, b"hello world");
    }

    #[test]
    fn level_1_and_level_9_both_round_trip_and_9_not_larger() {
        let data = b"abcdef".repeat(200);
        let fast = compress_all(&data, 1, Strategy::Default);
        let best = compress_all(&data, 9, Strategy::Default);
        assert_eq!(
            miniz_oxide::inflate::decompress_to_vec(&fast).unwrap(),
            data.to_vec()
        );
        assert_eq!(
            miniz_oxide::inflate::decompress_to_vec(&best).unwrap(),
            data.to_vec()
        );
        assert!(best.len() <= fast.len());
    }

    #[test]
    fn level_zero_is_stored_only_and_round_trips() {
        let data = b"some text that level 0 should store verbatim, verbatim, verbatim".to_vec();
        let out = compress_all(&data, 0, Strategy::Default);
        let decoded = miniz_oxide::inflate::decompress_to_vec(&out).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn huffman_only_strategy_never_emits_matches_but_still_round_trips() {
        let data = b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_vec();
        let out = compress_all(&data, 6, Strategy::HuffmanOnly);
        let decoded = miniz_oxide::inflate::decompress_to_vec(&out).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn rle_strategy_round_trips() {
        let data = b"xxxxxxxxxxxxxxxxxxxxxxyyyyyyyyyyyyyyyyyyyyzzzzzzzzzzzzzzzzzzz".to_vec();
        let out = compress_all(&data, 6, Strategy::Rle);
        let decoded = miniz_oxide::inflate::decompress_to_vec(&out).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn fixed_strategy_round_trips() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(10);
        let out = compress_all(&data, 6, Strategy::Fixed);
        let decoded = miniz_oxide::inflate::decompress_to_vec(&out).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn config_error_propagates_from_new() {
        let err = Deflate::new(10, 15, 8, Strategy::Default).unwrap_err();
        assert!(matches!(
            err,
            DeflateError::Config(crate::error::ConfigError::LevelOutOfRange(10))
        ));
    }

    #[test]
    fn reset_allows_reuse_for_a_second_independent_stream() {
        let mut d = Deflate::new(6, 15, 8, Strategy::Default).unwrap();
        let mut out = vec![0u8; 256];
        let r1 = d.write(b"first stream", &mut out, FlushMode::Finish).unwrap();
        assert_eq!(r1.status, Status::StreamEnd);
        d.reset();
        let mut out2 = vec![0u8; 256];
        let r2 = d.write(b"second stream", &mut out2, FlushMode::Finish).unwrap();
        assert_eq!(r2.status, Status::StreamEnd);
        let decoded = miniz_oxide::inflate::decompress_to_vec(&out2[..r2.produced]).unwrap();
        assert_eq!(decoded, b"second stream");
    }

    #[test]
    fn data_type_detects_text() {
        let mut d = Deflate::new(6, 15, 8, Strategy::Default).unwrap();
        let mut out = vec![0u8; 256];
        let _ = d.write(b"hello world, this is plain text.\n", &mut out, FlushMode::Finish).unwrap();
        assert_eq!(d.data_type(), DataType::Text);
    }
}
