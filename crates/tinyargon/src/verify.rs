use alloc::vec;
use zeroize::Zeroizing;

use crate::{Block, EngineInstance, Error, HashRequest, Result, compute};

/// Compare two byte strings in time that depends only on their length.
///
/// Every byte pair is visited and the differences are folded together before
/// a single branch-free reduction; slices of different lengths are unequal.
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let diff = a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y));
    let diff = core::hint::black_box(diff);
    (u16::from(diff).wrapping_sub(1) >> 8) & 1 == 1
}

/// Recompute the tag of `request` and compare it with `expected` in constant time.
///
/// The tag length is taken from `expected`, so `request.output_len` is
/// ignored. Returns [`Error::VerifyMismatch`] when the tags differ and any
/// other error when the tag could not be computed at all.
pub fn verify(request: &HashRequest<'_>, expected: &[u8], work_area: &mut [Block]) -> Result<()> {
    let request = request.with_output_len(expected.len());
    let mut out = Zeroizing::new(vec![0u8; expected.len()]);
    compute(&request, work_area, &mut out)?;

    if ct_eq(&out, expected) { Ok(()) } else { Err(Error::VerifyMismatch) }
}

/// Like [`verify`], with a heap-allocated work area
pub fn verify_hash(request: &HashRequest<'_>, expected: &[u8]) -> Result<()> {
    let request = request.with_output_len(expected.len());
    let instance = EngineInstance::new(&request)?;
    let mut work_area = vec![Block::ZERO; instance.block_count()];
    verify(&request, expected, &mut work_area)
}
