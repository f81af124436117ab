//! Sliding input window: a `2 * W`-byte buffer holding the current lookahead
//! plus up to `W` bytes of already-processed history, so back-references can
//! point anywhere within the format's maximum distance.
//!
//! Grounded on zlib's `deflate_state` window fields (`window`, `window_size`,
//! `strstart`, `block_start`, `lookahead`) and `fill_window`'s slide-left
//! step in `deflate.c`. The teacher's own windowing is `LZ4HC_init_internal`
//! (`hc/types.rs`) sliding the 64 KB dictionary forward by a fixed 1 GB
//! threshold; this window instead slides whenever the write cursor reaches
//! the far half of the buffer, matching zlib's `MAX_DIST`-driven slide
//! rather than the fixed-threshold HC convention, since DEFLATE's window
//! size is configurable via `windowBits`.

/// Owns the `2 * W` history buffer and the cursors into it.
pub struct Window {
    buf: Vec<u8>,
    window_size: usize,
    /// Index of the next byte to be matched/emitted.
    pub strstart: usize,
    /// Index of the first byte not yet flushed as a literal/match.
    pub block_start: usize,
    /// Number of valid, not-yet-consumed bytes starting at `strstart`.
    pub lookahead: usize,
    /// Highest index ever written into `buf`, used to bound lazy-match lookahead.
    high_water: usize,
}

impl Window {
    pub fn new(window_bits: u32) -> Self {
        let window_size = 1usize << window_bits;
        Self {
            buf: vec![0u8; window_size * 2],
            window_size,
            strstart: 0,
            block_start: 0,
            lookahead: 0,
            high_water: 0,
        }
    }

    #[inline]
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Largest back-reference distance this window can offer, mirroring
    /// zlib's `MAX_DIST(s)` macro (`w_size - MIN_LOOKAHEAD`): candidates
    /// closer to the tail than `MIN_LOOKAHEAD` bytes are still needed as
    /// lookahead, not history, so they're excluded from the usable range.
    #[inline]
    pub fn max_dist(&self, min_lookahead: usize) -> usize {
        self.window_size.saturating_sub(min_lookahead)
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    pub fn byte_at(&self, pos: usize) -> u8 {
        self.buf[pos]
    }

    /// Appends `data` at `strstart + lookahead`, growing `lookahead`.
    ///
    /// Caller must ensure `data.len()` does not overrun the buffer; the
    /// stream driver only calls this after computing how much room
    /// `fill_window` has available.
    pub fn append(&mut self, data: &[u8]) {
        let at = self.strstart + self.lookahead;
        self.buf[at..at + data.len()].copy_from_slice(data);
        self.lookahead += data.len();
        self.high_water = self.high_water.max(at + data.len());
    }

    /// Bytes of free space at the tail of the buffer before a slide is needed.
    #[inline]
    pub fn free_space(&self) -> usize {
        (self.window_size * 2).saturating_sub(self.strstart + self.lookahead)
    }

    /// `true` once the write cursor has reached the point where a
    /// `deflate_slow`/`deflate_fast` style driver should slide the window
    /// before requesting more input, mirroring zlib's `fill_window` check
    /// `strstart >= wsize + MAX_DIST(s)`.
    #[inline]
    pub fn needs_slide(&self, min_lookahead: usize) -> bool {
        self.strstart >= self.window_size + (self.window_size - min_lookahead)
    }

    /// Slides the second half of the buffer down to the first half,
    /// rebasing `strstart`/`block_start` by `window_size`. The hash chains
    /// are rebased separately by the caller (see [`crate::hash::HashIndex::slide`]).
    pub fn slide(&mut self) {
        let ws = self.window_size;
        self.buf.copy_within(ws..ws * 2, 0);
        self.strstart -= ws;
        self.block_start = self.block_start.saturating_sub(ws);
        self.high_water = self.high_water.saturating_sub(ws);
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.strstart += n;
        self.lookahead -= n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_advance_track_lookahead() {
        let mut w = Window::new(9); // 512-byte window
        w.append(b"hello");
        assert_eq!(w.lookahead, 5);
        w.advance(3);
        assert_eq!(w.strstart, 3);
        assert_eq!(w.lookahead, 2);
    }

    #[test]
    fn needs_slide_triggers_near_buffer_end() {
        let mut w = Window::new(9); // window_size = 512
        w.strstart = 512 + (512 - 258) + 1;
        assert!(w.needs_slide(258));
    }

    #[test]
    fn slide_rebases_cursors_and_preserves_recent_bytes() {
        let mut w = Window::new(9);
        let ws = w.window_size();
        w.append(&vec![7u8; ws]);
        w.advance(ws);
        w.append(b"tail");
        assert_eq!(w.strstart, ws);
        w.slide();
        assert_eq!(w.strstart, 0);
        assert_eq!(w.byte_at(0), 7);
    }
}
