//! Pointer/length entry points behind the guest exports.
//!
//! Every function takes raw pointers into the module's linear memory, turns
//! them into slices once, and reports the outcome as a status code:
//! [`STATUS_OK`] or the negative [`Error::code`].

use alloc::vec;
use core::slice;
use zeroize::{Zeroize, Zeroizing};

use tinyargon::{Block, Error, HashRequest, ParamError, Result, STATUS_OK, Variant, Version};

/// Status returned by the compare functions for unequal inputs
pub const STATUS_DIFFERENT: i32 = -1;

/// The scalar and buffer arguments shared by the hash and verify entry points.
///
/// `pass` and `key` are owned by the module for the duration of the call and
/// are wiped before it returns, successful or not.
#[derive(Debug, Clone, Copy)]
pub struct RawRequest {
    /// Variant code: 0 Argon2d, 1 Argon2i, 2 Argon2id
    pub algorithm: u32,
    /// Version code, `0x10` or `0x13`
    pub version: u32,
    /// Memory cost in KiB; the work area must hold this many blocks
    pub nb_blocks: u32,
    /// Time cost
    pub nb_passes: u32,
    /// Parallelism
    pub nb_lanes: u32,
    pub pass: *mut u8,
    pub pass_size: u32,
    pub salt: *const u8,
    pub salt_size: u32,
    pub key: *mut u8,
    pub key_size: u32,
    pub ad: *const u8,
    pub ad_size: u32,
}

/// Zeroes a caller buffer when dropped
struct WipeOnDrop {
    ptr: *mut u8,
    len: usize,
}

impl WipeOnDrop {
    fn new(ptr: *mut u8, len: u32) -> Self {
        Self { ptr, len: len as usize }
    }
}

impl Drop for WipeOnDrop {
    fn drop(&mut self) {
        if !self.ptr.is_null() && self.len > 0 {
            // SAFETY: the caller vouched for `len` writable bytes at `ptr` and
            // every slice borrowed from them is gone by now
            unsafe { slice::from_raw_parts_mut(self.ptr, self.len) }.zeroize();
        }
    }
}

/// # Safety
/// `ptr` must be null or point to `len` readable bytes that outlive `'a`.
unsafe fn bytes<'a>(ptr: *const u8, len: u32) -> Result<&'a [u8]> {
    match (ptr.is_null(), len) {
        (_, 0) => Ok(&[]),
        (true, _) => Err(ParamError::NullPointer.into()),
        // SAFETY: guaranteed by the caller
        (false, len) => Ok(unsafe { slice::from_raw_parts(ptr, len as usize) }),
    }
}

/// # Safety
/// `ptr` must be null or point to `len` writable bytes that outlive `'a` and
/// are not otherwise borrowed.
unsafe fn bytes_mut<'a>(ptr: *mut u8, len: u32) -> Result<&'a mut [u8]> {
    match (ptr.is_null(), len) {
        (_, 0) => Ok(&mut []),
        (true, _) => Err(ParamError::NullPointer.into()),
        // SAFETY: guaranteed by the caller
        (false, len) => Ok(unsafe { slice::from_raw_parts_mut(ptr, len as usize) }),
    }
}

/// # Safety
/// `ptr` must be null or point to `count` writable blocks that outlive `'a`
/// and are not otherwise borrowed.
unsafe fn blocks<'a>(ptr: *mut u8, count: u32) -> Result<&'a mut [Block]> {
    if count == 0 {
        return Ok(&mut []);
    }
    if ptr.is_null() {
        return Err(ParamError::NullPointer.into());
    }
    if ptr as usize % align_of::<Block>() != 0 {
        return Err(ParamError::Misaligned.into());
    }

    // SAFETY: guaranteed by the caller; every bit pattern is a valid block
    Ok(unsafe { slice::from_raw_parts_mut(ptr.cast::<Block>(), count as usize) })
}

fn status(result: Result<()>) -> i32 {
    match result {
        Ok(()) => STATUS_OK,
        Err(err) => err.code(),
    }
}

impl RawRequest {
    /// Borrow the inputs and check the parameters, variant and version last
    ///
    /// # Safety
    /// The input pointers must satisfy the contract of [`hash_raw`].
    unsafe fn request<'a>(&self, output_len: usize) -> Result<HashRequest<'a>> {
        // SAFETY: guaranteed by the caller
        let (password, salt, secret, ad) = unsafe {
            (
                bytes(self.pass, self.pass_size)?,
                bytes(self.salt, self.salt_size)?,
                bytes(self.key, self.key_size)?,
                bytes(self.ad, self.ad_size)?,
            )
        };

        let mut request = HashRequest::new(password, salt)
            .with_memory_cost(self.nb_blocks)
            .with_time_cost(self.nb_passes)
            .with_lanes(self.nb_lanes)
            .with_output_len(output_len);
        request.secret = (!secret.is_empty()).then_some(secret);
        request.associated_data = (!ad.is_empty()).then_some(ad);

        request.validate()?;
        request.variant = Variant::try_from(self.algorithm)?;
        request.version = Version::try_from(self.version)?;
        Ok(request)
    }
}

/// Hash into `hash_size` bytes at `hash`, using `request.nb_blocks` blocks at `work_area`.
///
/// The tag is computed into a scrubbed temporary and only copied to `hash` on
/// success. The password and key buffers are wiped on every path.
///
/// # Safety
/// Every non-null pointer must be valid for its length (`work_area` for
/// `nb_blocks * 1024` bytes), 8-byte aligned in the case of `work_area`, and
/// the output and work area must not overlap any other buffer.
pub unsafe fn hash_raw(hash: *mut u8, hash_size: u32, work_area: *mut u8, request: &RawRequest) -> i32 {
    let _password = WipeOnDrop::new(request.pass, request.pass_size);
    let _secret = WipeOnDrop::new(request.key, request.key_size);

    // SAFETY: guaranteed by the caller
    status(unsafe { hash_into(hash, hash_size, work_area, request) })
}

unsafe fn hash_into(hash: *mut u8, hash_size: u32, work_area: *mut u8, raw: &RawRequest) -> Result<()> {
    // SAFETY: guaranteed by the caller
    let request = unsafe { raw.request(hash_size as usize)? };
    let (out, work_area) = unsafe { (bytes_mut(hash, hash_size)?, blocks(work_area, raw.nb_blocks)?) };

    let mut tag = Zeroizing::new(vec![0u8; out.len()]);
    tinyargon::compute(&request, work_area, &mut tag)?;
    out.copy_from_slice(&tag);
    Ok(())
}

/// Recompute the tag for `request` and compare it with the `expected_size` bytes at `expected`.
///
/// Returns [`STATUS_OK`] on a match, the code of [`Error::VerifyMismatch`]
/// on a mismatch and any other negative code when the tag could not be
/// computed.
///
/// # Safety
/// As for [`hash_raw`], with `expected` readable for `expected_size` bytes.
pub unsafe fn verify_raw(expected: *const u8, expected_size: u32, work_area: *mut u8, request: &RawRequest) -> i32 {
    let _password = WipeOnDrop::new(request.pass, request.pass_size);
    let _secret = WipeOnDrop::new(request.key, request.key_size);

    // SAFETY: guaranteed by the caller
    status(unsafe { verify_against(expected, expected_size, work_area, request) })
}

unsafe fn verify_against(expected: *const u8, expected_size: u32, work_area: *mut u8, raw: &RawRequest) -> Result<()> {
    // SAFETY: guaranteed by the caller
    let request = unsafe { raw.request(expected_size as usize)? };
    let (expected, work_area) = unsafe { (bytes(expected, expected_size)?, blocks(work_area, raw.nb_blocks)?) };
    tinyargon::verify(&request, expected, work_area)
}

/// Plain BLAKE2b of `message_len` bytes at `message` into `out_len` (1 to 64) bytes at `out`.
///
/// # Safety
/// `out` and `message` must be valid for their lengths.
pub unsafe fn blake2b_raw(out: *mut u8, out_len: u32, message: *const u8, message_len: u32) -> i32 {
    // SAFETY: guaranteed by the caller
    status(unsafe { blake2b_into(out, out_len, message, message_len) })
}

unsafe fn blake2b_into(out: *mut u8, out_len: u32, message: *const u8, message_len: u32) -> Result<()> {
    // hash into a scratch buffer so `out` may overlap `message`
    let mut scratch = Zeroizing::new([0u8; 64]);
    let digest = scratch.get_mut(..out_len as usize).ok_or(Error::OutputTooLong)?;

    // SAFETY: guaranteed by the caller
    tinyargon::blake2b(digest, unsafe { bytes(message, message_len)? })?;
    let out = unsafe { bytes_mut(out, out_len)? };
    out.copy_from_slice(digest);
    Ok(())
}

/// Zero `len` bytes at `ptr`.
///
/// # Safety
/// `ptr` must be null or valid for `len` writable bytes.
pub unsafe fn wipe_raw(ptr: *mut u8, len: u32) {
    drop(WipeOnDrop::new(ptr, len));
}

/// Compare `len` bytes at `a` and `b` in constant time.
///
/// Returns [`STATUS_OK`] when equal and [`STATUS_DIFFERENT`] otherwise.
///
/// # Safety
/// Both pointers must be valid for `len` readable bytes.
pub unsafe fn compare_raw(a: *const u8, b: *const u8, len: u32) -> i32 {
    // SAFETY: guaranteed by the caller
    let (a, b) = unsafe { (bytes(a, len), bytes(b, len)) };
    match (a, b) {
        (Ok(a), Ok(b)) if tinyargon::ct_eq(a, b) => STATUS_OK,
        _ => STATUS_DIFFERENT,
    }
}
