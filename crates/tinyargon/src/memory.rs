use alloc::vec;
use alloc::vec::Vec;

use crate::{Error, LinearMemory, PAGE_SIZE, Result, log};

/// The default heap base of a [`VecMemory`]; addresses below it stand in for static data.
const DEFAULT_HEAP_BASE: usize = 1024;

/// A linear memory backed by a `Vec<u8>`.
///
/// This is the host-side stand-in for a wasm32 memory, used to drive an [`Arena`](crate::Arena)
/// and the byte buffers a guest would hand to the engine.
#[derive(Debug)]
pub struct VecMemory {
    data: Vec<u8>,
    page_count: usize,
    max_pages: usize,
    heap_base: usize,
}

impl VecMemory {
    /// Create a zeroed memory of `initial_pages` pages that may grow up to `max_pages`
    pub fn new(initial_pages: usize, max_pages: Option<usize>) -> Self {
        let max_pages = max_pages.unwrap_or(PAGE_SIZE).max(initial_pages);
        log::debug!("initializing memory with {initial_pages} pages of {PAGE_SIZE} bytes");

        Self {
            data: vec![0; initial_pages * PAGE_SIZE],
            page_count: initial_pages,
            max_pages,
            heap_base: DEFAULT_HEAP_BASE,
        }
    }

    /// Use a different heap base
    pub fn with_heap_base(mut self, heap_base: usize) -> Self {
        self.heap_base = heap_base;
        self
    }

    /// The size of the memory in bytes
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the memory has no pages
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The maximum number of pages this memory may grow to
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    #[inline(never)]
    #[cold]
    fn trap_oob(&self, addr: usize, len: usize) -> Error {
        Error::MemoryOutOfBounds { offset: addr, len, max: self.data.len() }
    }

    fn range(&self, addr: usize, len: usize) -> Result<core::ops::Range<usize>> {
        match addr.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(addr..end),
            _ => Err(self.trap_oob(addr, len)),
        }
    }

    /// Copy `data` into memory at `addr`
    pub fn store(&mut self, addr: usize, data: &[u8]) -> Result<()> {
        let range = self.range(addr, data.len())?;
        self.data[range].copy_from_slice(data);
        Ok(())
    }

    /// Borrow `len` bytes at `addr`
    pub fn load(&self, addr: usize, len: usize) -> Result<&[u8]> {
        let range = self.range(addr, len)?;
        Ok(&self.data[range])
    }

    /// Set `len` bytes at `addr` to `val`
    pub fn fill(&mut self, addr: usize, len: usize, val: u8) -> Result<()> {
        let range = self.range(addr, len)?;
        self.data[range].fill(val);
        Ok(())
    }
}

impl LinearMemory for VecMemory {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn grow(&mut self, delta: usize) -> Option<usize> {
        let current_pages = self.page_count;
        let new_pages = current_pages.checked_add(delta)?;
        if new_pages > self.max_pages {
            return None;
        }

        // Zero initialize the new pages
        let new_size = new_pages.checked_mul(PAGE_SIZE)?;
        self.data.resize(new_size, 0);
        self.page_count = new_pages;
        Some(current_pages)
    }

    fn heap_base(&self) -> usize {
        self.heap_base
    }
}
