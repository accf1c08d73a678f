#![no_std]
#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_assignments, unused_variables))
))]
#![warn(missing_debug_implementations, rust_2018_idioms, unreachable_pub)]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A small Argon2 password hashing engine (Argon2d, Argon2i and Argon2id, versions
//! `0x10` and `0x13`) for sandboxed hosts that hand it a flat linear memory.
//!
//! The crate is `no_std` with `alloc`. The engine never allocates its own work area
//! when called through [`compute`]: the caller lends it a `&mut [Block]`, usually
//! carved out of an [`Arena`] over the guest's linear memory. [`hash`] and
//! [`verify_hash`] are conveniences that allocate the work area on the heap.
//!
//! ## Features
//! - **`std`**\
//!   Links `std` and enables the `std` features of `blake2` and `zeroize`. This is enabled by default.
//! - **`log`**\
//!   Enables logging using the `log` crate. This is enabled by default.
//! - **`parallel`**\
//!   Fills the lanes of each segment on scoped threads, up to the requested thread count. Requires `std`.
//!
//! With all these features disabled, the engine only depends on `core`, `alloc`,
//! `blake2` and `zeroize`, and can be compiled for `wasm32-unknown-unknown`.
//!
//! ## Getting Started
//! ```rust
//! use tinyargon::{HashRequest, Variant};
//!
//! let request = HashRequest::new(b"password", b"somesalt")
//!     .with_variant(Variant::Argon2id)
//!     .with_time_cost(2)
//!     .with_memory_cost(64)
//!     .with_output_len(32);
//!
//! let tag = tinyargon::hash(&request)?;
//! assert_eq!(tag.len(), 32);
//! tinyargon::verify_hash(&request, &tag)?;
//! # Ok::<(), tinyargon::Error>(())
//! ```

mod std;
extern crate alloc;

// log for logging (optional).
#[cfg(feature = "log")]
#[allow(clippy::single_component_path_imports)]
use log;

// noop fallback if logging is disabled.
#[cfg(not(feature = "log"))]
pub(crate) mod log {
    macro_rules! trace    ( ($($tt:tt)*) => {{}} );
    macro_rules! debug    ( ($($tt:tt)*) => {{}} );
    macro_rules! error    ( ($($tt:tt)*) => {{}} );
    pub(crate) use debug;
    pub(crate) use error;
    pub(crate) use trace;
}

mod arena;
pub use arena::*;

mod block;
pub use block::{BLOCK_SIZE, Block, compress};

mod engine;
pub use engine::*;

mod error;
pub use error::*;

mod fill;

mod hash;
pub use hash::blake2b;

mod instance;
pub use instance::{EngineInstance, align_memory};

mod memory;
pub use memory::VecMemory;

mod params;
pub use params::*;

mod reference;

mod verify;
pub use verify::*;
