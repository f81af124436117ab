//! Chained hash index over 3-byte prefixes, used by the match finder to
//! locate candidate back-references in the sliding window.
//!
//! Grounded on zlib's `ins_h`/`head`/`prev` hash chain in `deflate.c`
//! (`INSERT_STRING`, `UPDATE_HASH`) — a rolling hash over `MIN_MATCH` bytes
//! indexes a `head` table of most-recent positions, and a `prev` table
//! threads each position back to the previous occurrence of the same hash.
//!
//! One deliberate departure from the C source: zlib uses position `0` as
//! its own "no entry" sentinel (safe there only because position 0 can
//! never be a valid *previous* match for itself once probing excludes the
//! current position). That convention does not carry over cleanly to a
//! `Vec`-indexed Rust table, so this index uses `-1` as an explicit NIL
//! value in `i32`-typed chains instead.
pub const NIL: i32 = -1;

pub struct HashIndex {
    head: Vec<i32>,
    prev: Vec<i32>,
    hash_mask: u32,
    hash_shift: u32,
    window_mask: usize,
}

impl HashIndex {
    pub fn new(hash_bits: u32, window_size: usize) -> Self {
        let hash_size = 1usize << hash_bits;
        let hash_shift = (hash_bits + crate::config::MIN_MATCH as u32 - 1)
            / crate::config::MIN_MATCH as u32;
        Self {
            head: vec![NIL; hash_size],
            prev: vec![NIL; window_size],
            hash_mask: (hash_size - 1) as u32,
            hash_shift,
            window_mask: window_size - 1,
        }
    }

    /// Rolls an existing hash forward by one byte: `((h << shift) ^ byte) & mask`.
    #[inline]
    pub fn update_hash(&self, h: u32, byte: u8) -> u32 {
        ((h << self.hash_shift) ^ byte as u32) & self.hash_mask
    }

    /// Computes the initial hash for the 3 bytes at `window[pos..pos+3]`.
    #[inline]
    pub fn hash3(&self, window: &[u8], pos: usize) -> u32 {
        let mut h = window[pos] as u32;
        h = self.update_hash(h, window[pos + 1]);
        h = self.update_hash(h, window[pos + 2]);
        h
    }

    /// Inserts `pos` into the chain for hash `h`, returning the previous head
    /// of that chain (the best existing match candidate, or [`NIL`]).
    #[inline]
    pub fn insert(&mut self, h: u32, pos: usize) -> i32 {
        let prev_head = self.head[h as usize];
        self.prev[pos & self.window_mask] = prev_head;
        self.head[h as usize] = pos as i32;
        prev_head
    }

    /// Next (older) candidate position in the chain starting at `cur`.
    #[inline]
    pub fn prev_of(&self, cur: i32) -> i32 {
        self.prev[cur as usize & self.window_mask]
    }

    #[inline]
    pub fn head_of(&self, h: u32) -> i32 {
        self.head[h as usize]
    }

    /// Rebases every chain entry by `window_size` after the caller slides the
    /// underlying window, clamping anything that would go negative to [`NIL`]
    /// since it refers to history dropped by the slide.
    pub fn slide(&mut self, window_size: usize) {
        let ws = window_size as i32;
        for h in self.head.iter_mut() {
            *h = if *h >= ws { *h - ws } else { NIL };
        }
        for p in self.prev.iter_mut() {
            *p = if *p >= ws { *p - ws } else { NIL };
        }
    }

    /// Clears all chains, used by `FullFlush` so a decoder need not rely on
    /// history before the flush point.
    pub fn reset(&mut self) {
        self.head.fill(NIL);
        self.prev.fill(NIL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_chain_walk() {
        let mut idx = HashIndex::new(10, 1 << 9);
        let h = 42;
        assert_eq!(idx.insert(h, 5), NIL);
        assert_eq!(idx.insert(h, 20), 5);
        assert_eq!(idx.head_of(h), 20);
        assert_eq!(idx.prev_of(20), 5);
        assert_eq!(idx.prev_of(5), NIL);
    }

    #[test]
    fn slide_rebases_and_drops_stale_entries() {
        let mut idx = HashIndex::new(10, 1 << 9);
        idx.insert(1, 100);
        idx.insert(1, 600);
        idx.slide(512);
        // 600 - 512 = 88 remains valid; 100 - 512 is negative -> NIL
        assert_eq!(idx.head_of(1), 88);
        assert_eq!(idx.prev_of(88), NIL);
    }

    #[test]
    fn reset_clears_all_chains() {
        let mut idx = HashIndex::new(8, 1 << 9);
        idx.insert(3, 10);
        idx.reset();
        assert_eq!(idx.head_of(3), NIL);
    }

    #[test]
    fn hash3_is_stable_for_identical_bytes() {
        let idx = HashIndex::new(10, 1 << 9);
        let window = [b'a', b'b', b'c', b'a', b'b', b'c'];
        assert_eq!(idx.hash3(&window, 0), idx.hash3(&window, 3));
    }
}
