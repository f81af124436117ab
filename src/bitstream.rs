//! Bit-level output sink: accumulates code bits LSB-first into whole bytes
//! and appends them to a caller-visible pending buffer.
//!
//! Grounded on zlib's `send_bits`/`bi_windup`/`bi_flush` family in
//! `trees.c`: a small accumulator (`bi_buf`, `bi_valid`) is filled one code
//! at a time and spilled to the byte buffer whenever it holds a full byte
//! or more. DEFLATE packs bits into bytes LSB-first, so codes shorter than
//! 8 bits are simply OR'd in at the current bit position rather than
//! reversed or padded.

/// Accumulates Huffman codes and fixed-width fields into a byte buffer,
/// least-significant-bit first, as RFC 1951 §3.1.1 requires.
#[derive(Debug, Default)]
pub struct BitSink {
    buf: Vec<u8>,
    bi_buf: u32,
    bi_valid: u32,
}

impl BitSink {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            bi_buf: 0,
            bi_valid: 0,
        }
    }

    /// Appends `count` bits of `value` (`count` in `0..=16`), LSB first.
    pub fn send_bits(&mut self, value: u32, count: u32) {
        debug_assert!(count <= 16);
        if self.bi_valid > 16 - count {
            self.bi_buf |= value.wrapping_shl(self.bi_valid) & 0xFFFF;
            self.buf.push(self.bi_buf as u8);
            self.buf.push((self.bi_buf >> 8) as u8);
            self.bi_buf = value >> (16 - self.bi_valid);
            self.bi_valid += count - 16;
        } else {
            self.bi_buf |= (value & mask(count)).wrapping_shl(self.bi_valid);
            self.bi_valid += count;
        }
    }

    /// Flushes any whole bytes currently buffered in the bit accumulator,
    /// leaving behind fewer than 8 pending bits.
    pub fn flush_bits(&mut self) {
        while self.bi_valid >= 8 {
            self.buf.push(self.bi_buf as u8);
            self.bi_buf >>= 8;
            self.bi_valid -= 8;
        }
    }

    /// Pads the accumulator out to the next byte boundary with zero bits and
    /// flushes it, so the next `send_bits` call starts at bit 0 of a fresh
    /// byte. Used at `Z_SYNC_FLUSH`/`Z_FULL_FLUSH` points and before the
    /// stored-block length header.
    pub fn align_to_byte(&mut self) {
        if self.bi_valid > 0 {
            self.buf.push(self.bi_buf as u8);
        }
        if self.bi_valid > 8 {
            self.buf.push((self.bi_buf >> 8) as u8);
        }
        self.bi_buf = 0;
        self.bi_valid = 0;
    }

    /// Appends raw, already byte-aligned bytes (used for STORED block bodies).
    ///
    /// # Panics
    /// Panics (via `debug_assert!`) if the accumulator is not byte-aligned.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        debug_assert_eq!(self.bi_valid, 0, "write_bytes requires byte alignment");
        self.buf.extend_from_slice(bytes);
    }

    /// Number of bits currently pending in the accumulator (always `< 8`
    /// after a `flush_bits` call).
    pub fn bits_pending(&self) -> u32 {
        self.bi_valid
    }

    /// Total bytes produced so far, including any the caller has already
    /// drained with [`BitSink::drain_into`].
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Copies as many pending bytes as fit into `out`, removing them from
    /// the internal buffer. Returns the number of bytes copied.
    pub fn drain_into(&mut self, out: &mut [u8]) -> usize {
        let n = out.len().min(self.buf.len());
        out[..n].copy_from_slice(&self.buf[..n]);
        self.buf.drain(..n);
        n
    }

    pub fn pending_bytes(&self) -> &[u8] {
        &self.buf
    }
}

#[inline]
fn mask(bits: u32) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_bits_within_single_byte() {
        let mut s = BitSink::new();
        s.send_bits(0b101, 3);
        s.flush_bits();
        assert!(s.pending_bytes().is_empty() || s.len() == 0);
    }

    #[test]
    fn send_bits_spanning_byte_boundary_matches_lsb_first_packing() {
        let mut s = BitSink::new();
        s.send_bits(0b1, 1);
        s.send_bits(0b1111111, 7);
        s.send_bits(0b1, 1);
        s.flush_bits();
        assert_eq!(s.pending_bytes(), &[0xFF, 0x01]);
    }

    #[test]
    fn align_to_byte_pads_with_zero_bits() {
        let mut s = BitSink::new();
        s.send_bits(0b1, 1);
        s.align_to_byte();
        assert_eq!(s.pending_bytes(), &[0x01]);
        assert_eq!(s.bits_pending(), 0);
    }

    #[test]
    fn drain_into_removes_copied_bytes() {
        let mut s = BitSink::new();
        s.send_bits(0xAB, 8);
        s.send_bits(0xCD, 8);
        s.flush_bits();
        let mut out = [0u8; 1];
        let n = s.drain_into(&mut out);
        assert_eq!(n, 1);
        assert_eq!(out[0], 0xAB);
        assert_eq!(s.len(), 1);
        let n2 = s.drain_into(&mut out);
        assert_eq!(n2, 1);
        assert_eq!(out[0], 0xCD);
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn send_bits_wide_value_over_two_bytes() {
        let mut s = BitSink::new();
        s.send_bits(0x3FFF, 14);
        s.flush_bits();
        assert_eq!(s.pending_bytes(), &[0xFF, 0x3F]);
    }
}
