//! Hash-chain match finder: given the current write cursor, returns the
//! longest usable back-reference within the policy limits of the active
//! compression level and strategy.
//!
//! Ported from zlib's `longest_match` in `deflate.c`. The chain walk itself
//! is identical across strategies; only the bounds (`max_chain`, `good_match`,
//! `nice_match`) and the accept/reject rule at the call site change, which is
//! why this module exposes a single [`longest_match`] plus the per-strategy
//! policy check lives in `deflate.rs` alongside the block-splitting state
//! machine that calls it (mirroring zlib's own split between `longest_match`
//! and `deflate_slow`/`deflate_fast`).

use crate::config::{MAX_MATCH, MIN_MATCH};
use crate::hash::{HashIndex, NIL};
use crate::window::Window;

/// Result of a chain search: `None` if nothing `>= MIN_MATCH` was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub length: usize,
    pub distance: usize,
}

/// Walks the hash chain starting at `start` (the most recent candidate
/// position for the current 3-byte prefix, or [`NIL`]) looking for the
/// longest run of bytes equal to the `MAX_MATCH`-or-lookahead-bounded window
/// starting at `strstart`.
///
/// `prev_length` seeds the initial "best so far" so a caller doing lazy
/// one-byte-ahead evaluation can require the candidate to beat the match it
/// already has in hand before bothering to compare bytes.
///
/// The search rejects candidates further than `max_dist` behind `strstart`
/// (the configured window's representable distance — see
/// [`Window::max_dist`]), stops early once a match `>= nice_match` is found,
/// and if `prev_length` (the match already in hand before this call) is
/// already `>= good_match`, quarters the `max_chain` budget up front —
/// exactly zlib's `longest_match` policy.
#[allow(clippy::too_many_arguments)]
pub fn longest_match(
    window: &Window,
    hash: &HashIndex,
    strstart: usize,
    mut start: i32,
    prev_length: usize,
    max_chain: u32,
    good_match: u32,
    nice_match: u32,
    max_dist: usize,
) -> Option<Match> {
    if start == NIL {
        return None;
    }

    let buf = window.as_slice();
    let limit = if strstart > max_dist { strstart - max_dist } else { 0 };
    let nice_match = (nice_match as usize).min(window.lookahead);
    let max_len = MAX_MATCH.min(window.lookahead);

    let mut best_len = prev_length;
    let mut best_dist = 0usize;
    // Seeded once from the caller's `prev_length`, not re-applied every time
    // a new best match turns up mid-walk: a lazily-deferred byte that
    // already has a long match in hand is unlikely to do much better, so the
    // chain budget is cut up front, exactly as zlib's `longest_match` does.
    let mut chain_count = if prev_length as u32 >= good_match {
        (max_chain >> 2).max(1)
    } else {
        max_chain
    };

    // Comparing the byte one past the current best length first lets most
    // chain candidates be rejected with a single comparison, since a false
    // candidate very rarely matches exactly `best_len` bytes by chance.
    let mut scan_end = if best_len > 0 {
        buf[strstart + best_len - 1]
    } else {
        0
    };

    loop {
        let cur = start as usize;
        if cur < limit {
            break;
        }

        if best_len > 0
            && (buf[cur + best_len - 1] != scan_end
                || buf[cur + best_len] != buf[strstart + best_len]
                || buf[cur] != buf[strstart]
                || buf[cur + 1] != buf[strstart + 1])
        {
            start = hash.prev_of(start);
            if start == NIL || start <= (strstart as i32) - (max_dist as i32) {
                break;
            }
            chain_count -= 1;
            if chain_count == 0 {
                break;
            }
            continue;
        }

        let mut len = 0usize;
        while len < max_len && buf[cur + len] == buf[strstart + len] {
            len += 1;
        }

        if len > best_len {
            best_len = len;
            best_dist = strstart - cur;
            scan_end = buf[strstart + best_len - 1];
            if len >= nice_match {
                break;
            }
        }

        if best_len >= max_len {
            break;
        }

        start = hash.prev_of(start);
        if start == NIL || start <= (strstart as i32) - (max_dist as i32) {
            break;
        }
        chain_count -= 1;
        if chain_count == 0 {
            break;
        }
    }

    if best_len >= MIN_MATCH && best_dist > 0 {
        Some(Match {
            length: best_len,
            distance: best_dist,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MIN_MATCH as MM;

    fn setup(data: &[u8]) -> (Window, HashIndex) {
        let mut window = Window::new(15);
        window.append(data);
        let mut hash = HashIndex::new(15, window.window_size());
        let mut pos = 0;
        while pos + MM <= data.len() {
            let h = hash.hash3(window.as_slice(), pos);
            hash.insert(h, pos);
            pos += 1;
        }
        (window, hash)
    }

    #[test]
    fn finds_exact_repeat() {
        let data = b"abcabcabc";
        let (window, hash) = setup(data);
        let h = hash.hash3(window.as_slice(), 3);
        let start = hash.prev_of(hash.head_of(h));
        let m = longest_match(&window, &hash, 3, start, 0, 128, 8, 128, 32768);
        assert!(m.is_some());
        let m = m.unwrap();
        assert_eq!(m.distance, 3);
        assert!(m.length >= MIN_MATCH);
    }

    #[test]
    fn no_match_when_chain_empty() {
        let data = b"xyz";
        let (window, hash) = setup(data);
        let m = longest_match(&window, &hash, 0, NIL, 0, 128, 8, 128, 32768);
        assert!(m.is_none());
    }

    #[test]
    fn stops_early_on_nice_match() {
        let data = vec![b'a'; 300];
        let (window, hash) = setup(&data);
        let h = hash.hash3(window.as_slice(), 100);
        let start = hash.prev_of(hash.head_of(h));
        let m = longest_match(&window, &hash, 100, start, 0, 4096, 258, 16, 32768).unwrap();
        assert!(m.length >= 16);
    }

    #[test]
    fn respects_prev_length_floor() {
        let data = b"abcabcabc";
        let (window, hash) = setup(data);
        let h = hash.hash3(window.as_slice(), 3);
        let start = hash.prev_of(hash.head_of(h));
        // A very high prev_length means no candidate can beat it, so no
        // match is returned even though one technically exists.
        let m = longest_match(&window, &hash, 3, start, 200, 128, 8, 128, 32768);
        assert!(m.is_none());
    }
}
