//! Block emitter: builds the dynamic Huffman trees for the current block,
//! compares the three candidate encodings (stored / static Huffman / dynamic
//! Huffman), and writes whichever is smallest.
//!
//! Ported from zlib's `_tr_flush_block` and its helpers (`build_tree`,
//! `scan_tree`/`send_tree`, `build_bl_tree`, `compress_block`) in `trees.c`.
//! One structural simplification relative to the C source: zlib's
//! `scan_tree` (count occurrences) and `send_tree` (emit bits) are two
//! independent walks over the same run-length state machine, which is easy
//! to let drift out of sync in a port. Here a single [`run_length_encode`]
//! produces the run-length event stream once; both the frequency tally and
//! the bit emission replay that same event list, so there is exactly one
//! place the RLE thresholds (`(4,7)` / `(3,138)` / `(3,6)` runs, per spec)
//! are encoded.

use crate::bitstream::BitSink;
use crate::config::DataType;
use crate::huffman::{build_tree, BuiltTree, ExtraBits, TreeSpec, MAX_BITS};
use crate::literals::LiteralBuffer;
use crate::tables::{
    self, BASE_DIST, BASE_LENGTH, BL_ORDER, D_CODES, EXTRA_BLBITS, EXTRA_DBITS, EXTRA_LBITS,
    END_BLOCK, L_CODES, LITERALS,
};

const STORED_BLOCK: u32 = 0;
const STATIC_TREES: u32 = 1;
const DYN_TREES: u32 = 2;

const REP_3_6: u8 = 16;
const REPZ_3_10: u8 = 17;
const REPZ_11_138: u8 = 18;

/// One entry in the run-length-encoded transmission of a tree's bit lengths.
#[derive(Debug, Clone, Copy)]
enum BlEvent {
    /// Emit the literal code-length symbol `0..=15`.
    Len(u8),
    /// Emit bit-length-alphabet symbol `16`/`17`/`18` with the already
    /// range-adjusted extra-bits payload (`count - 3`, `count - 3`, or
    /// `count - 11` respectively).
    Rep(u8, u8),
}

/// Replays zlib's `scan_tree`/`send_tree` run-detection as a single pass,
/// returning the sequence of RLE events needed to transmit `lengths[0..=max_code]`.
fn run_length_encode(lengths: &[u8], max_code: usize) -> Vec<BlEvent> {
    let get = |i: usize| -> u8 {
        if i <= max_code {
            lengths[i]
        } else {
            u8::MAX // guard: no real bit length reaches this value
        }
    };

    let mut events = Vec::new();
    let mut prevlen: i32 = -1;
    let mut nextlen = get(0);
    let mut count: u32 = 0;
    let mut max_count: u32 = 7;
    let mut min_count: u32 = 4;
    if nextlen == 0 {
        max_count = 138;
        min_count = 3;
    }

    for n in 0..=max_code {
        let curlen = nextlen;
        nextlen = get(n + 1);
        count += 1;

        if count < max_count && curlen == nextlen {
            continue;
        }

        if count < min_count {
            for _ in 0..count {
                events.push(BlEvent::Len(curlen));
            }
        } else if curlen != 0 {
            if curlen as i32 != prevlen {
                events.push(BlEvent::Len(curlen));
                count -= 1;
            }
            events.push(BlEvent::Rep(REP_3_6, (count - 3) as u8));
        } else if count <= 10 {
            events.push(BlEvent::Rep(REPZ_3_10, (count - 3) as u8));
        } else {
            events.push(BlEvent::Rep(REPZ_11_138, (count - 11) as u8));
        }

        count = 0;
        prevlen = curlen as i32;
        if nextlen == 0 {
            max_count = 138;
            min_count = 3;
        } else if curlen == nextlen {
            max_count = 6;
            min_count = 3;
        } else {
            max_count = 7;
            min_count = 4;
        }
    }
    events
}

fn tally_bl_events(events: &[BlEvent], freq: &mut [u32; tables::BL_CODES]) {
    for ev in events {
        match *ev {
            BlEvent::Len(l) => freq[l as usize] += 1,
            BlEvent::Rep(sym, _) => freq[sym as usize] += 1,
        }
    }
}

fn send_bl_events(events: &[BlEvent], sink: &mut BitSink, bl_tree: &BuiltTree) {
    for ev in events {
        match *ev {
            BlEvent::Len(l) => {
                sink.send_bits(bl_tree.code[l as usize] as u32, bl_tree.len[l as usize] as u32);
            }
            BlEvent::Rep(sym, extra) => {
                sink.send_bits(bl_tree.code[sym as usize] as u32, bl_tree.len[sym as usize] as u32);
                let extra_bits = EXTRA_BLBITS[sym as usize] as u32;
                sink.send_bits(extra as u32, extra_bits);
            }
        }
    }
}

/// Classifies the literal-byte frequency distribution of a block as
/// TEXT/BINARY/UNKNOWN per spec.md §4.8's black/white/gray-list rule.
/// Purely advisory; never affects the emitted bits.
pub fn detect_data_type(lit_freq: &[u32; L_CODES + 2]) -> DataType {
    const BLACK_LIST: [usize; 13] = [0, 1, 2, 3, 4, 5, 6, 14, 15, 16, 17, 18, 19];
    // 20..=27 also black-listed per the control-byte ranges 14-25, 28-31.
    let black_has_nonzero = BLACK_LIST.iter().any(|&b| lit_freq[b] != 0)
        || (20..=25).any(|b| lit_freq[b] != 0)
        || (28..=31).any(|b| lit_freq[b] != 0);
    if black_has_nonzero {
        return DataType::Binary;
    }
    let white_has_nonzero =
        lit_freq[9] != 0 || lit_freq[10] != 0 || lit_freq[13] != 0 || (32..256).any(|b| lit_freq[b] != 0);
    if white_has_nonzero {
        DataType::Text
    } else {
        DataType::Binary
    }
}

struct DynamicTrees {
    ltree: BuiltTree,
    dtree: BuiltTree,
    bltree: BuiltTree,
    ltree_events: Vec<BlEvent>,
    dtree_events: Vec<BlEvent>,
    max_blindex: usize,
    dynamic_bits: u64,
    static_bits: u64,
}

fn build_dynamic_trees(literals: &LiteralBuffer) -> DynamicTrees {
    let mut lit_freq = *literals.lit_freq();
    lit_freq[END_BLOCK] += 1;
    let dist_freq = *literals.dist_freq();

    let ltree_spec = TreeSpec {
        elems: L_CODES,
        max_length: MAX_BITS,
        extra: Some(ExtraBits {
            bits: &EXTRA_LBITS,
            base: LITERALS + 1,
        }),
        static_lengths: Some(tables::static_ltree_lengths().to_vec()),
    };
    let ltree = build_tree(&lit_freq, &ltree_spec);

    let dtree_spec = TreeSpec {
        elems: D_CODES,
        max_length: MAX_BITS,
        extra: Some(ExtraBits {
            bits: &EXTRA_DBITS,
            base: 0,
        }),
        static_lengths: Some(tables::static_dtree_lengths().to_vec()),
    };
    let dtree = build_tree(&dist_freq, &dtree_spec);

    let ltree_events = run_length_encode(&ltree.len, ltree.max_code);
    let dtree_events = run_length_encode(&dtree.len, dtree.max_code);

    let mut bl_freq = [0u32; tables::BL_CODES];
    tally_bl_events(&ltree_events, &mut bl_freq);
    tally_bl_events(&dtree_events, &mut bl_freq);

    let bltree_spec = TreeSpec {
        elems: tables::BL_CODES,
        max_length: 7,
        extra: Some(ExtraBits {
            bits: &EXTRA_BLBITS,
            base: 0,
        }),
        static_lengths: None,
    };
    let bltree = build_tree(&bl_freq, &bltree_spec);

    let mut max_blindex = tables::BL_CODES - 1;
    while max_blindex >= 3 && bltree.len[BL_ORDER[max_blindex] as usize] == 0 {
        max_blindex -= 1;
    }

    let header_bits = 5 + 5 + 4 + 3 * (max_blindex as u64 + 1);
    let dynamic_bits =
        ltree.opt_len_bits + dtree.opt_len_bits + bltree.opt_len_bits + header_bits;
    let static_bits = ltree.static_len_bits + dtree.static_len_bits;

    DynamicTrees {
        ltree,
        dtree,
        bltree,
        ltree_events,
        dtree_events,
        max_blindex,
        dynamic_bits,
        static_bits,
    }
}

fn send_payload(sink: &mut BitSink, literals: &LiteralBuffer, ltree_code: &[u16], ltree_len: &[u8], dtree_code: &[u16], dtree_len: &[u8]) {
    for (dist, lc) in literals.entries() {
        if dist == 0 {
            let sym = lc as usize;
            sink.send_bits(ltree_code[sym] as u32, ltree_len[sym] as u32);
        } else {
            let length_idx = lc as usize;
            let code = crate::tables::length_code(length_idx) as usize;
            let sym = code + LITERALS + 1;
            sink.send_bits(ltree_code[sym] as u32, ltree_len[sym] as u32);
            let extra_lbits = EXTRA_LBITS[code] as u32;
            if extra_lbits > 0 {
                let extra_val = lc as u32 - BASE_LENGTH[code] as u32;
                sink.send_bits(extra_val, extra_lbits);
            }

            let d = dist as usize - 1;
            let dcode = crate::tables::dist_code(d) as usize;
            sink.send_bits(dtree_code[dcode] as u32, dtree_len[dcode] as u32);
            let extra_dbits = EXTRA_DBITS[dcode] as u32;
            if extra_dbits > 0 {
                let extra_val = d as u32 - BASE_DIST[dcode] as u32;
                sink.send_bits(extra_val, extra_dbits);
            }
        }
    }
    sink.send_bits(ltree_code[END_BLOCK] as u32, ltree_len[END_BLOCK] as u32);
}

/// Emits one complete DEFLATE block: header, trees (if dynamic), and payload.
///
/// `stored_bytes` is the raw byte range the block covers in the sliding
/// window, needed only if the stored encoding wins. `force_static` implements
/// `Strategy::Fixed` (always BTYPE=01, skipping the stored/dynamic bit-cost
/// comparison). Resets `literals`'s frequency tables and entries for the next
/// block before returning.
pub fn emit_block(
    sink: &mut BitSink,
    literals: &mut LiteralBuffer,
    stored_bytes: &[u8],
    is_last: bool,
    force_static: bool,
) {
    let last_bit = if is_last { 1u32 } else { 0 };

    if literals.is_empty() && stored_bytes.is_empty() {
        // Degenerate empty block (e.g. FINISH with nothing pending): still
        // needs a valid END_BLOCK-only static block so the stream has a
        // well-formed terminator.
        emit_static_or_dynamic(sink, literals, last_bit, true);
        literals.clear();
        return;
    }

    if force_static {
        emit_static_or_dynamic(sink, literals, last_bit, true);
        literals.clear();
        return;
    }

    let dyn_trees = build_dynamic_trees(literals);

    let stored_cost_bytes = stored_bytes.len() as u64 + 5;
    let static_cost_bytes = (dyn_trees.static_bits + 3 + 7) >> 3;
    let dynamic_cost_bytes = (dyn_trees.dynamic_bits + 3 + 7) >> 3;

    if stored_cost_bytes <= static_cost_bytes.min(dynamic_cost_bytes) {
        sink.send_bits((STORED_BLOCK << 1) | last_bit, 3);
        sink.align_to_byte();
        let len = stored_bytes.len() as u16;
        sink.send_bits(len as u32, 16);
        sink.send_bits((!len) as u32, 16);
        sink.flush_bits();
        sink.write_bytes(stored_bytes);
    } else if static_cost_bytes <= dynamic_cost_bytes {
        emit_static_or_dynamic(sink, literals, last_bit, true);
    } else {
        emit_dynamic_payload(sink, literals, &dyn_trees, last_bit);
    }

    literals.clear();
}

fn emit_static_or_dynamic(sink: &mut BitSink, literals: &LiteralBuffer, last_bit: u32, is_static: bool) {
    debug_assert!(is_static);
    sink.send_bits((STATIC_TREES << 1) | last_bit, 3);
    let ltree_len = tables::static_ltree_lengths();
    let dtree_len = tables::static_dtree_lengths();
    send_payload(
        sink,
        literals,
        tables::static_ltree_codes(),
        &ltree_len,
        tables::static_dtree_codes(),
        &dtree_len,
    );
}

fn emit_dynamic_payload(sink: &mut BitSink, literals: &LiteralBuffer, dyn_trees: &DynamicTrees, last_bit: u32) {
    sink.send_bits((DYN_TREES << 1) | last_bit, 3);

    let hlit = dyn_trees.ltree.max_code + 1 - 257;
    let hdist = (dyn_trees.dtree.max_code + 1).max(1) - 1;
    let hclen = dyn_trees.max_blindex + 1 - 4;
    sink.send_bits(hlit as u32, 5);
    sink.send_bits(hdist as u32, 5);
    sink.send_bits(hclen as u32, 4);

    for i in 0..=dyn_trees.max_blindex {
        let sym = BL_ORDER[i] as usize;
        sink.send_bits(dyn_trees.bltree.len[sym] as u32, 3);
    }

    send_bl_events(&dyn_trees.ltree_events, sink, &dyn_trees.bltree);
    send_bl_events(&dyn_trees.dtree_events, sink, &dyn_trees.bltree);

    send_payload(
        sink,
        literals,
        &dyn_trees.ltree.code,
        &dyn_trees.ltree.len,
        &dyn_trees.dtree.code,
        &dyn_trees.dtree.len,
    );
}

/// Emits an empty stored block (`00 00 FF FF` after byte alignment), used to
/// implement `SyncFlush`/`FullFlush`.
pub fn emit_empty_stored_sync(sink: &mut BitSink) {
    sink.send_bits(STORED_BLOCK << 1, 3); // last_bit = 0
    sink.align_to_byte();
    sink.send_bits(0, 16);
    sink.send_bits(0xFFFF, 16);
}

/// Emits a stored block directly from `data` (no Huffman coding at all),
/// splitting into chunks of at most 65535 bytes. Used by level 0.
pub fn emit_stored_chunks(sink: &mut BitSink, data: &[u8], is_last: bool) {
    if data.is_empty() {
        sink.send_bits(((STORED_BLOCK << 1) | if is_last { 1 } else { 0 }) as u32, 3);
        sink.align_to_byte();
        sink.send_bits(0, 16);
        sink.send_bits(0xFFFF, 16);
        return;
    }
    let mut offset = 0;
    while offset < data.len() {
        let chunk_len = (data.len() - offset).min(0xFFFF);
        let chunk = &data[offset..offset + chunk_len];
        let last_chunk = is_last && offset + chunk_len == data.len();
        sink.send_bits(((STORED_BLOCK << 1) | if last_chunk { 1 } else { 0 }) as u32, 3);
        sink.align_to_byte();
        let len = chunk_len as u16;
        sink.send_bits(len as u32, 16);
        sink.send_bits((!len) as u32, 16);
        sink.flush_bits();
        sink.write_bytes(chunk);
        offset += chunk_len;
    }
}
