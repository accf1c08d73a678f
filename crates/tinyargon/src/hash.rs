use blake2::digest::generic_array::GenericArray;
use blake2::digest::{Update, VariableOutput};
use blake2::{Blake2b512, Blake2bVar, Digest};
use zeroize::Zeroizing;

use crate::{Error, HashRequest, Result};

/// The length of the BLAKE2b-512 digest H0
pub(crate) const PREHASH_DIGEST_LENGTH: usize = 64;

/// H0 followed by room for the block counter and the lane index
pub(crate) const PREHASH_SEED_LENGTH: usize = PREHASH_DIGEST_LENGTH + 8;

const BLAKE2B_OUTBYTES: usize = 64;

/// Plain BLAKE2b with a variable digest length of 1 to 64 bytes.
///
/// The digest length is `out.len()`.
pub fn blake2b(out: &mut [u8], message: &[u8]) -> Result<()> {
    if out.is_empty() {
        return Err(Error::OutputTooShort);
    }
    if out.len() > BLAKE2B_OUTBYTES {
        return Err(Error::OutputTooLong);
    }

    let mut hasher = Blake2bVar::new(out.len()).map_err(|_| Error::OutputTooLong)?;
    Update::update(&mut hasher, message);
    hasher.finalize_variable(out).map_err(|_| Error::OutputTooLong)
}

fn blake2b512_into(out: &mut [u8; BLAKE2B_OUTBYTES], inputs: &[&[u8]]) {
    let mut hasher = Blake2b512::new();
    for input in inputs {
        Digest::update(&mut hasher, input);
    }
    hasher.finalize_into(GenericArray::from_mut_slice(out));
}

/// The variable-length hash H' over the concatenation of `inputs`.
///
/// Up to 64 bytes this is BLAKE2b of `LE32(len) || inputs`. Longer outputs
/// chain BLAKE2b-512 digests, keeping the first 32 bytes of each, and end with
/// one digest sized to whatever is left.
pub(crate) fn blake2b_long(out: &mut [u8], inputs: &[&[u8]]) -> Result<()> {
    let len = u32::try_from(out.len()).map_err(|_| Error::OutputTooLong)?;
    if out.is_empty() {
        return Err(Error::OutputTooShort);
    }

    if out.len() <= BLAKE2B_OUTBYTES {
        let mut hasher = Blake2bVar::new(out.len()).map_err(|_| Error::OutputTooLong)?;
        Update::update(&mut hasher, &len.to_le_bytes());
        for input in inputs {
            Update::update(&mut hasher, input);
        }
        return hasher.finalize_variable(out).map_err(|_| Error::OutputTooLong);
    }

    let mut v = Zeroizing::new([0u8; BLAKE2B_OUTBYTES]);
    let mut next = Zeroizing::new([0u8; BLAKE2B_OUTBYTES]);

    let mut hasher = Blake2b512::new();
    Digest::update(&mut hasher, len.to_le_bytes());
    for input in inputs {
        Digest::update(&mut hasher, input);
    }
    hasher.finalize_into(GenericArray::from_mut_slice(&mut v[..]));

    let (head, mut rest) = out.split_at_mut(BLAKE2B_OUTBYTES / 2);
    head.copy_from_slice(&v[..BLAKE2B_OUTBYTES / 2]);

    while rest.len() > BLAKE2B_OUTBYTES {
        blake2b512_into(&mut next, &[&v[..]]);
        core::mem::swap(&mut *v, &mut *next);

        let (chunk, tail) = rest.split_at_mut(BLAKE2B_OUTBYTES / 2);
        chunk.copy_from_slice(&v[..BLAKE2B_OUTBYTES / 2]);
        rest = tail;
    }

    let mut hasher = Blake2bVar::new(rest.len()).map_err(|_| Error::OutputTooLong)?;
    Update::update(&mut hasher, &v[..]);
    hasher.finalize_variable(rest).map_err(|_| Error::OutputTooLong)
}

/// H0: BLAKE2b-512 over the cost parameters and the length-prefixed inputs.
///
/// Returns the digest with 8 trailing zero bytes, ready to receive the block
/// counter and lane index when the first blocks of each lane are derived.
/// Lengths were checked against `u32::MAX` by [`HashRequest::validate`].
pub(crate) fn initial_hash(request: &HashRequest<'_>) -> Zeroizing<[u8; PREHASH_SEED_LENGTH]> {
    let mut hasher = Blake2b512::new();

    let params = [
        request.lanes,
        request.output_len as u32,
        request.memory_cost,
        request.time_cost,
        request.version as u32,
        request.variant as u32,
    ];
    for param in params {
        Digest::update(&mut hasher, param.to_le_bytes());
    }

    let inputs = [Some(request.password), Some(request.salt), request.secret, request.associated_data];
    for input in inputs {
        let input = input.unwrap_or_default();
        Digest::update(&mut hasher, (input.len() as u32).to_le_bytes());
        Digest::update(&mut hasher, input);
    }

    let mut seed = Zeroizing::new([0u8; PREHASH_SEED_LENGTH]);
    hasher.finalize_into(GenericArray::from_mut_slice(&mut seed[..PREHASH_DIGEST_LENGTH]));
    seed
}
