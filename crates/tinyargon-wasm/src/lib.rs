#![cfg_attr(target_arch = "wasm32", no_std)]
#![warn(missing_debug_implementations, rust_2018_idioms, unreachable_pub)]
#![deny(unsafe_op_in_unsafe_fn)]

//! The guest side of tinyargon: a `wasm32-unknown-unknown` module that owns its
//! linear memory through a single [`Arena`](tinyargon::Arena) and exposes the
//! engine to the host as a handful of `extern "C"` functions.
//!
//! The host allocates every buffer with `m`, writes the inputs, calls `a`
//! (or `h`/`v`) and reads the tag back. Everything below [`surface`] is plain
//! pointer/length plumbing and compiles on any target, so it can be exercised
//! natively; the exports, the allocator and the panic handler only exist on
//! wasm32.
//!
//! Build with `cargo build -p tinyargon-wasm --target wasm32-unknown-unknown --profile wasm`.

extern crate alloc;

pub mod surface;

#[cfg(target_arch = "wasm32")]
mod session;

#[cfg(target_arch = "wasm32")]
pub mod exports;

#[cfg(target_arch = "wasm32")]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo<'_>) -> ! {
    core::arch::wasm32::unreachable()
}
