use alloc::vec;
use alloc::vec::Vec;
use zeroize::{Zeroize, Zeroizing};

use crate::block::BLOCK_SIZE;
use crate::fill::fill_memory;
use crate::hash::{PREHASH_DIGEST_LENGTH, blake2b_long, initial_hash};
use crate::{Block, EngineInstance, Error, HashRequest, ParamError, Result, log};

/// Compute the Argon2 tag of `request` into `out`, using `work_area` as the memory matrix.
///
/// `out.len()` must equal `request.output_len`, and `work_area` must hold at
/// least [`EngineInstance::block_count`] blocks; only that prefix is used. All
/// parameters are checked before the work area is touched, and the used blocks
/// are wiped before returning, also on failure. `out` is only written once the
/// tag is complete.
pub fn compute(request: &HashRequest<'_>, work_area: &mut [Block], out: &mut [u8]) -> Result<()> {
    let instance = EngineInstance::new(request)?;
    if out.len() != request.output_len {
        return Err(if out.len() < request.output_len { Error::OutputTooShort } else { Error::OutputTooLong });
    }

    let required = instance.block_count();
    let provided = work_area.len();
    let Some(memory) = work_area.get_mut(..required) else {
        return Err(ParamError::WorkAreaTooSmall { required, provided }.into());
    };

    log::debug!(
        "{} v{:#x}: {} blocks, {} lanes, {} passes, {} threads",
        instance.variant,
        instance.version as u32,
        instance.memory_blocks,
        instance.lanes,
        instance.passes,
        instance.active_threads
    );

    let mut memory = WorkArea(memory);
    initialize(request, &instance, &mut memory)?;
    fill_memory(&instance, &mut memory);
    finalize(&instance, &memory, out)
}

/// Hash `request` with a heap-allocated work area.
///
/// Returns a tag of `request.output_len` bytes that is wiped on drop.
pub fn hash(request: &HashRequest<'_>) -> Result<Zeroizing<Vec<u8>>> {
    let instance = EngineInstance::new(request)?;
    let mut work_area = vec![Block::ZERO; instance.block_count()];
    let mut out = Zeroizing::new(vec![0u8; request.output_len]);
    compute(request, &mut work_area, &mut out)?;
    Ok(out)
}

/// Wipes the borrowed blocks when the computation ends, however it ends
struct WorkArea<'a>(&'a mut [Block]);

impl core::ops::Deref for WorkArea<'_> {
    type Target = [Block];

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl core::ops::DerefMut for WorkArea<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.0
    }
}

impl Drop for WorkArea<'_> {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(Zeroize::zeroize);
    }
}

/// Derive the first two blocks of every lane from H0
fn initialize(request: &HashRequest<'_>, instance: &EngineInstance, memory: &mut [Block]) -> Result<()> {
    let mut seed = initial_hash(request);
    let mut bytes = Zeroizing::new([0u8; BLOCK_SIZE]);

    for lane in 0..instance.lanes {
        seed[PREHASH_DIGEST_LENGTH + 4..].copy_from_slice(&lane.to_le_bytes());
        for counter in 0..2u32 {
            seed[PREHASH_DIGEST_LENGTH..PREHASH_DIGEST_LENGTH + 4].copy_from_slice(&counter.to_le_bytes());
            blake2b_long(&mut bytes[..], &[&seed[..]])?;
            memory[instance.block_index(lane, counter)].load_bytes(&bytes);
        }
    }

    Ok(())
}

/// XOR the last block of every lane and hash it down to the tag
fn finalize(instance: &EngineInstance, memory: &[Block], out: &mut [u8]) -> Result<()> {
    let last = instance.lane_length - 1;
    let mut acc = memory[instance.block_index(0, last)].clone();
    for lane in 1..instance.lanes {
        acc.xor_with(&memory[instance.block_index(lane, last)]);
    }

    let mut bytes = Zeroizing::new([0u8; BLOCK_SIZE]);
    acc.store_bytes(&mut bytes);
    blake2b_long(out, &[&bytes[..]])
}
