use crate::{Error, Result, log};

/// The size of one linear memory page, in bytes
pub const PAGE_SIZE: usize = 65536;

/// The minimum alignment of every arena allocation, in bytes
pub const ALIGNMENT: usize = 8;

/// A page-granular linear memory the [`Arena`] can carve allocations from.
///
/// Implemented by the guest over the real wasm32 memory and by [`VecMemory`](crate::VecMemory)
/// on the host.
pub trait LinearMemory {
    /// The current size of the memory in pages
    fn page_count(&self) -> usize;

    /// Grow the memory by `delta` pages, returning the previous page count,
    /// or `None` if the memory can not grow that far.
    fn grow(&mut self, delta: usize) -> Option<usize>;

    /// The first address past the module's static data
    fn heap_base(&self) -> usize;

    /// The current size of the memory in bytes
    fn capacity(&self) -> usize {
        self.page_count().saturating_mul(PAGE_SIZE)
    }
}

/// A bump allocator over a [`LinearMemory`].
///
/// Allocations are never freed individually; the whole arena lives as long as
/// the memory it manages. Every returned address is aligned to at least
/// [`ALIGNMENT`] and no two allocations overlap.
#[derive(Debug)]
pub struct Arena<M> {
    memory: M,
    cursor: Option<usize>,
}

impl<M: LinearMemory> Arena<M> {
    /// Create an arena; the cursor starts at the memory's heap base on first use
    pub const fn new(memory: M) -> Self {
        Self { memory, cursor: None }
    }

    /// Allocate `size` bytes aligned to [`ALIGNMENT`]
    pub fn allocate(&mut self, size: usize) -> Result<usize> {
        self.allocate_aligned(size, ALIGNMENT)
    }

    /// Allocate `size` bytes aligned to `max(align, ALIGNMENT)`.
    ///
    /// The memory grows by whole pages when the allocation does not fit. On
    /// failure nothing changes: the cursor stays where it was. Zero-sized
    /// requests still take one byte, so addresses are strictly increasing.
    pub fn allocate_aligned(&mut self, size: usize, align: usize) -> Result<usize> {
        let align = align.max(ALIGNMENT);
        let failure = |memory: &M| Error::AllocationFailure { size, pages: memory.page_count() };
        if !align.is_power_of_two() {
            return Err(failure(&self.memory));
        }

        let start = self.cursor();
        let Some(address) = start.checked_add(align - 1).map(|end| end & !(align - 1)) else {
            return Err(failure(&self.memory));
        };
        let Some(end) = address.checked_add(size.max(1)) else {
            return Err(failure(&self.memory));
        };

        if !self.reserve(end) {
            log::error!("arena: failed to reserve {size} bytes at {address:#x}");
            return Err(failure(&self.memory));
        }

        self.cursor = Some(end);
        Ok(address)
    }

    /// Make sure the memory extends at least up to `end`
    fn reserve(&mut self, end: usize) -> bool {
        let capacity = self.memory.capacity();
        if end <= capacity {
            return true;
        }

        let pages = (end - capacity).div_ceil(PAGE_SIZE);
        log::debug!("arena: growing memory by {pages} pages");
        self.memory.grow(pages).is_some() && self.memory.capacity() >= end
    }

    /// The address the next allocation starts searching from
    pub fn cursor(&self) -> usize {
        self.cursor.unwrap_or_else(|| self.memory.heap_base())
    }

    /// The size of the underlying memory in bytes
    pub fn capacity(&self) -> usize {
        self.memory.capacity()
    }

    /// The underlying memory
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// The underlying memory, mutably
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }
}
