//! The module's `extern "C"` exports. Names are single letters to keep the
//! host glue small.

use tinyargon::{ALIGNMENT, Version};

use crate::session::SESSION;
use crate::surface::{RawRequest, blake2b_raw, compare_raw, hash_raw, verify_raw, wipe_raw};

/// Allocate `size` bytes for the host; traps when memory can not grow
#[unsafe(no_mangle)]
pub extern "C" fn m(size: usize) -> *mut u8 {
    match SESSION.allocate(size, ALIGNMENT) {
        Ok(address) => core::ptr::with_exposed_provenance_mut(address),
        Err(_) => core::arch::wasm32::unreachable(),
    }
}

/// Hash with version `0x13`
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn a(
    hash: *mut u8,
    hash_size: u32,
    work_area: *mut u8,
    algorithm: u32,
    nb_blocks: u32,
    nb_passes: u32,
    nb_lanes: u32,
    pass: *mut u8,
    salt: *const u8,
    pass_size: u32,
    salt_size: u32,
    key: *mut u8,
    ad: *const u8,
    key_size: u32,
    ad_size: u32,
) -> i32 {
    // SAFETY: the host passes buffers it allocated with `m`
    unsafe {
        h(
            hash,
            hash_size,
            work_area,
            algorithm,
            nb_blocks,
            nb_passes,
            nb_lanes,
            pass,
            salt,
            pass_size,
            salt_size,
            key,
            ad,
            key_size,
            ad_size,
            Version::V0x13 as u32,
        )
    }
}

/// Hash with an explicit version
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn h(
    hash: *mut u8,
    hash_size: u32,
    work_area: *mut u8,
    algorithm: u32,
    nb_blocks: u32,
    nb_passes: u32,
    nb_lanes: u32,
    pass: *mut u8,
    salt: *const u8,
    pass_size: u32,
    salt_size: u32,
    key: *mut u8,
    ad: *const u8,
    key_size: u32,
    ad_size: u32,
    version: u32,
) -> i32 {
    let request = RawRequest {
        algorithm,
        version,
        nb_blocks,
        nb_passes,
        nb_lanes,
        pass,
        pass_size,
        salt,
        salt_size,
        key,
        key_size,
        ad,
        ad_size,
    };
    // SAFETY: the host passes buffers it allocated with `m`
    unsafe { hash_raw(hash, hash_size, work_area, &request) }
}

/// Verify `expected` against a fresh computation
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn v(
    expected: *const u8,
    expected_size: u32,
    work_area: *mut u8,
    algorithm: u32,
    nb_blocks: u32,
    nb_passes: u32,
    nb_lanes: u32,
    pass: *mut u8,
    salt: *const u8,
    pass_size: u32,
    salt_size: u32,
    key: *mut u8,
    ad: *const u8,
    key_size: u32,
    ad_size: u32,
    version: u32,
) -> i32 {
    let request = RawRequest {
        algorithm,
        version,
        nb_blocks,
        nb_passes,
        nb_lanes,
        pass,
        pass_size,
        salt,
        salt_size,
        key,
        key_size,
        ad,
        ad_size,
    };
    // SAFETY: the host passes buffers it allocated with `m`
    unsafe { verify_raw(expected, expected_size, work_area, &request) }
}

/// Wipe a buffer
#[unsafe(no_mangle)]
pub unsafe extern "C" fn w(ptr: *mut u8, len: u32) {
    // SAFETY: the host passes buffers it allocated with `m`
    unsafe { wipe_raw(ptr, len) }
}

/// BLAKE2b with a 1 to 64 byte digest
#[unsafe(no_mangle)]
pub unsafe extern "C" fn b(out: *mut u8, out_len: u32, message: *const u8, message_len: u32) -> i32 {
    // SAFETY: the host passes buffers it allocated with `m`
    unsafe { blake2b_raw(out, out_len, message, message_len) }
}

/// Compare two 32 byte tags in constant time
#[unsafe(no_mangle)]
pub unsafe extern "C" fn t(a: *const u8, b: *const u8) -> i32 {
    // SAFETY: the host passes buffers it allocated with `m`
    unsafe { compare_raw(a, b, 32) }
}

/// Compare two 64 byte tags in constant time
#[unsafe(no_mangle)]
pub unsafe extern "C" fn s(a: *const u8, b: *const u8) -> i32 {
    // SAFETY: the host passes buffers it allocated with `m`
    unsafe { compare_raw(a, b, 64) }
}
