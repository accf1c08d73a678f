use core::alloc::{GlobalAlloc, Layout};
use core::cell::RefCell;
use core::ptr;

use tinyargon::{Arena, LinearMemory, Result};

unsafe extern "C" {
    /// End of the module's static data, provided by the linker
    static __heap_base: u8;
}

/// The module's own linear memory (memory index 0)
#[derive(Debug)]
pub(crate) struct Wasm32Memory;

impl LinearMemory for Wasm32Memory {
    fn page_count(&self) -> usize {
        core::arch::wasm32::memory_size(0)
    }

    fn grow(&mut self, delta: usize) -> Option<usize> {
        match core::arch::wasm32::memory_grow(0, delta) {
            usize::MAX => None,
            previous => Some(previous),
        }
    }

    #[allow(unused_unsafe)]
    fn heap_base(&self) -> usize {
        // SAFETY: only the address is taken, the byte is never read
        unsafe { ptr::addr_of!(__heap_base) }.expose_provenance()
    }
}

/// The arena every allocation in the module goes through, host buffers
/// from `m` and the engine's own `alloc` use alike.
pub(crate) struct Session {
    arena: RefCell<Arena<Wasm32Memory>>,
}

// SAFETY: wasm32-unknown-unknown modules run on a single thread
unsafe impl Sync for Session {}

impl Session {
    const fn new() -> Self {
        Self { arena: RefCell::new(Arena::new(Wasm32Memory)) }
    }

    pub(crate) fn allocate(&self, size: usize, align: usize) -> Result<usize> {
        self.arena.borrow_mut().allocate_aligned(size, align)
    }
}

unsafe impl GlobalAlloc for Session {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        // a nested allocation while the arena is borrowed is reported as OOM
        let Ok(mut arena) = self.arena.try_borrow_mut() else {
            return ptr::null_mut();
        };
        match arena.allocate_aligned(layout.size(), layout.align()) {
            Ok(address) => ptr::with_exposed_provenance_mut(address),
            Err(_) => ptr::null_mut(),
        }
    }

    // bump allocation: memory is reclaimed when the host drops the instance
    unsafe fn dealloc(&self, _ptr: *mut u8, _layout: Layout) {}
}

#[global_allocator]
pub(crate) static SESSION: Session = Session::new();
