use zeroize::Zeroize;

/// The size of one memory block, in bytes
pub const BLOCK_SIZE: usize = 1024;

pub(crate) const QWORDS_IN_BLOCK: usize = BLOCK_SIZE / 8;

/// A 1 KiB memory block, viewed as 128 little-endian 64-bit words.
///
/// The alignment is that of `u64`, so a block can live anywhere in an arena
/// that hands out 8-byte aligned addresses. Blocks wipe themselves on drop.
#[derive(Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct Block(pub(crate) [u64; QWORDS_IN_BLOCK]);

impl Block {
    /// A block of zeroes
    pub const ZERO: Self = Self([0; QWORDS_IN_BLOCK]);

    /// Read a block from its little-endian byte representation
    pub fn from_bytes(bytes: &[u8; BLOCK_SIZE]) -> Self {
        let mut block = Self::ZERO;
        block.load_bytes(bytes);
        block
    }

    pub(crate) fn load_bytes(&mut self, bytes: &[u8; BLOCK_SIZE]) {
        for (word, chunk) in self.0.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut le = [0u8; 8];
            le.copy_from_slice(chunk);
            *word = u64::from_le_bytes(le);
        }
    }

    /// Write the block's little-endian byte representation into `out`
    pub fn store_bytes(&self, out: &mut [u8; BLOCK_SIZE]) {
        for (chunk, word) in out.chunks_exact_mut(8).zip(self.0.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
    }

    /// The block's words
    pub fn words(&self) -> &[u64; QWORDS_IN_BLOCK] {
        &self.0
    }

    #[inline]
    pub(crate) fn xor_with(&mut self, other: &Self) {
        for (dst, src) in self.0.iter_mut().zip(other.0.iter()) {
            *dst ^= src;
        }
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::ZERO
    }
}

impl core::fmt::Debug for Block {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Block").field("first_word", &self.0[0]).finish_non_exhaustive()
    }
}

impl Zeroize for Block {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// The compression function G.
///
/// Computes `R = prev ^ reference`, runs the BLAKE2b based permutation over the
/// rows and then the columns of `R` (viewed as an 8x8 matrix of 16-byte
/// registers) and stores `P(R) ^ R` into `next`. With `with_xor` the result is
/// additionally XORed into the previous contents of `next`, as version `0x13`
/// does on every pass after the first.
pub fn compress(prev: &Block, reference: &Block, next: &mut Block, with_xor: bool) {
    let mut r = [0u64; QWORDS_IN_BLOCK];
    for ((word, a), b) in r.iter_mut().zip(&prev.0).zip(&reference.0) {
        *word = a ^ b;
    }

    let mut tmp = r;
    if with_xor {
        tmp.iter_mut().zip(&next.0).for_each(|(t, n)| *t ^= n);
    }

    for row in 0..8 {
        round(&mut r, core::array::from_fn(|k| 16 * row + k));
    }
    for column in 0..8 {
        round(&mut r, core::array::from_fn(|k| 2 * column + (k / 2) * 16 + (k % 2)));
    }

    for ((word, p), t) in next.0.iter_mut().zip(&r).zip(&tmp) {
        *word = p ^ t;
    }
}

/// One BLAKE2b round over the 16 words at `i`
#[inline(always)]
fn round(v: &mut [u64; QWORDS_IN_BLOCK], i: [usize; 16]) {
    gb(v, i[0], i[4], i[8], i[12]);
    gb(v, i[1], i[5], i[9], i[13]);
    gb(v, i[2], i[6], i[10], i[14]);
    gb(v, i[3], i[7], i[11], i[15]);

    gb(v, i[0], i[5], i[10], i[15]);
    gb(v, i[1], i[6], i[11], i[12]);
    gb(v, i[2], i[7], i[8], i[13]);
    gb(v, i[3], i[4], i[9], i[14]);
}

#[inline(always)]
fn gb(v: &mut [u64; QWORDS_IN_BLOCK], a: usize, b: usize, c: usize, d: usize) {
    v[a] = fblamka(v[a], v[b]);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = fblamka(v[c], v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(24);

    v[a] = fblamka(v[a], v[b]);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = fblamka(v[c], v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(63);
}

// a + b + 2 * lo32(a) * lo32(b)
#[inline(always)]
fn fblamka(x: u64, y: u64) -> u64 {
    let m = u64::from(x as u32) * u64::from(y as u32);
    x.wrapping_add(y).wrapping_add(m.wrapping_mul(2))
}

#[cfg(test)]
mod block_tests {
    use super::*;

    fn pattern(seed: u64) -> Block {
        let mut block = Block::ZERO;
        for (i, word) in block.0.iter_mut().enumerate() {
            *word = seed.wrapping_mul(0x9e37_79b9_7f4a_7c15).rotate_left(i as u32) ^ i as u64;
        }
        block
    }

    #[test]
    fn test_fblamka() {
        assert_eq!(fblamka(0, 0), 0);
        assert_eq!(fblamka(1, 1), 4);
        // the high halves only take part in the plain addition
        assert_eq!(fblamka(1 << 32, 1 << 32), 1 << 33);
        assert_eq!(fblamka(u64::MAX, 1), u64::MAX.wrapping_add(1).wrapping_add(2 * 0xffff_ffff));
    }

    #[test]
    fn test_zero_is_fixed_point() {
        let mut next = pattern(7);
        compress(&Block::ZERO, &Block::ZERO, &mut next, false);
        assert_eq!(next, Block::ZERO);
    }

    #[test]
    fn test_xor_flag() {
        let (prev, reference, old) = (pattern(1), pattern(2), pattern(3));

        let mut plain = old.clone();
        compress(&prev, &reference, &mut plain, false);
        assert_ne!(plain, old);

        let mut xored = old.clone();
        compress(&prev, &reference, &mut xored, true);

        let mut expected = plain.clone();
        expected.xor_with(&old);
        assert_eq!(xored, expected);
    }

    #[test]
    fn test_inputs_commute() {
        // G only sees prev ^ reference
        let mut a = Block::ZERO;
        let mut b = Block::ZERO;
        compress(&pattern(4), &pattern(5), &mut a, false);
        compress(&pattern(5), &pattern(4), &mut b, false);
        assert_eq!(a, b);
        assert_ne!(a, Block::ZERO);
    }

    #[test]
    fn test_bytes() {
        let mut bytes = [0u8; BLOCK_SIZE];
        bytes[0] = 1;
        bytes[9] = 2;
        let block = Block::from_bytes(&bytes);
        assert_eq!(block.words()[0], 1);
        assert_eq!(block.words()[1], 2 << 8);

        let mut out = [0xffu8; BLOCK_SIZE];
        block.store_bytes(&mut out);
        assert_eq!(out, bytes);
    }

    #[test]
    fn test_zeroize() {
        let mut block = pattern(9);
        block.zeroize();
        assert_eq!(block, Block::ZERO);
    }
}
