use std::collections::HashMap;
use std::fmt::Debug;

use crate::report::Violation;

use super::block::*;

/// Lowest handle address. Keeps null and its neighborhood out of the handle
/// space so a forged null-ish pointer is always recognized as invalid.
const BASE_ADDR: u64 = 0x1000;

/// wasm32-like 4 GiB address space.
pub const DEFAULT_LIMIT: u64 = 1 << 32;

/// Tracked heap allocator for one exploration path. Handles come from a
/// monotonic bump over a bounded virtual address space and are never
/// reused, so liveness of any handle ever minted stays decidable for the
/// whole path.
#[derive(Clone)]
pub struct Allocator {
    blocks: HashMap<Handle, Block>,
    bump: u64,
    limit: u64,
    live_bytes: u64,
    sites: AllocSite,
}

impl Allocator {
    pub fn new() -> Self {
        Allocator::with_limit(DEFAULT_LIMIT)
    }

    pub fn with_limit(limit: u64) -> Self {
        assert!(limit > BASE_ADDR);
        Allocator {
            blocks: HashMap::new(),
            bump: BASE_ADDR,
            limit,
            live_bytes: 0,
            sites: 0,
        }
    }

    /// Request a new block. `size == 0` is permitted and yields a fresh
    /// handle carrying no usable storage. `align` is a hint; it is
    /// normalized to a power of two.
    pub fn allocate(&mut self, size: u32, align: u32) -> Result<Handle, Violation> {
        let align = align.max(1).next_power_of_two() as u64;
        let base = self.bump.next_multiple_of(align);
        // A zero-sized block still consumes one address, so every handle
        // stays distinct.
        let end = base + (size as u64).max(1);
        if end > self.limit {
            return Err(Violation::OutOfMemory { size, align: align as u32 });
        }

        let handle = Handle(base);
        let site = self.sites;
        self.sites += 1;
        self.blocks.insert(handle, Block::new(handle, size, align as u32, site));
        self.bump = end;
        self.live_bytes += size as u64;
        Ok(handle)
    }

    /// Mark a block as freed. Freed is terminal; the second free of the
    /// same handle and the free of an unknown handle are violations, never
    /// silently ignored.
    pub fn deallocate(&mut self, handle: Handle) -> Result<(), Violation> {
        match self.blocks.get_mut(&handle) {
            None => Err(Violation::InvalidFree(handle)),
            Some(block) if !block.is_live() => Err(Violation::DoubleFree(handle)),
            Some(block) => {
                block.mark_freed();
                self.live_bytes -= block.size() as u64;
                Ok(())
            }
        }
    }

    /// Hook for the host memory checker: validate a dereference of
    /// `handle` before any access.
    pub fn check_deref(&self, handle: Handle) -> Result<&Block, Violation> {
        match self.blocks.get(&handle) {
            None => Err(Violation::InvalidPointer(handle)),
            Some(block) if !block.is_live() => Err(Violation::UseAfterFree(handle)),
            Some(block) => Ok(block),
        }
    }

    pub fn is_live(&self, handle: Handle) -> bool {
        matches!(self.blocks.get(&handle), Some(b) if b.is_live())
    }

    pub fn block(&self, handle: Handle) -> Option<&Block> {
        self.blocks.get(&handle)
    }

    pub fn num_live(&self) -> usize {
        self.blocks.values().filter(|b| b.is_live()).count()
    }

    pub fn live_bytes(&self) -> u64 {
        self.live_bytes
    }
}

impl Default for Allocator {
    fn default() -> Self {
        Allocator::new()
    }
}

impl Debug for Allocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut blocks = self.blocks.values().collect::<Vec<_>>();
        blocks.sort_by_key(|b| b.handle());
        write!(f, "Allocator ({} live bytes)", self.live_bytes)?;
        for b in blocks {
            write!(f, "\n  {b:?}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_handles_never_collide() {
        let mut alloc = Allocator::new();
        let mut handles = Vec::new();
        for i in 0..64 {
            handles.push(alloc.allocate(i % 7, 1 << (i % 4)).unwrap());
        }
        // free every other block, then allocate again
        for h in handles.iter().step_by(2) {
            alloc.deallocate(*h).unwrap();
        }
        for _ in 0..32 {
            handles.push(alloc.allocate(16, 8).unwrap());
        }
        let mut sorted = handles.clone();
        sorted.sort();
        sorted.dedup();
        assert!(sorted.len() == handles.len());
    }

    #[test]
    fn zero_sized_allocations_get_distinct_handles() {
        let mut alloc = Allocator::new();
        let a = alloc.allocate(0, 1).unwrap();
        let b = alloc.allocate(0, 1).unwrap();
        assert!(a != b);
        assert!(alloc.block(a).unwrap().size() == 0);
    }

    #[test]
    fn second_free_is_a_double_free() {
        let mut alloc = Allocator::new();
        let h = alloc.allocate(8, 8).unwrap();
        alloc.deallocate(h).unwrap();
        assert!(alloc.deallocate(h) == Err(Violation::DoubleFree(h)));
    }

    #[test]
    fn free_of_unknown_handle_is_invalid() {
        let mut alloc = Allocator::new();
        let h = Handle::from_addr(0xdead_beef);
        assert!(alloc.deallocate(h) == Err(Violation::InvalidFree(h)));
    }

    #[test]
    fn deref_after_free_is_flagged() {
        let mut alloc = Allocator::new();
        let h = alloc.allocate(8, 8).unwrap();
        assert!(alloc.check_deref(h).is_ok());
        alloc.deallocate(h).unwrap();
        assert!(matches!(alloc.check_deref(h), Err(Violation::UseAfterFree(x)) if x == h));
    }

    #[test]
    fn exhaustion_is_reported_not_fatal() {
        let mut alloc = Allocator::with_limit(0x1100);
        let h = alloc.allocate(0xf0, 1).unwrap();
        let res = alloc.allocate(0x100, 1);
        assert!(matches!(res, Err(Violation::OutOfMemory { .. })));
        // the failed request leaves the allocator usable
        assert!(alloc.is_live(h));
        assert!(alloc.allocate(0x8, 1).is_ok());
    }

    #[test]
    fn freed_is_terminal_and_accounted() {
        let mut alloc = Allocator::new();
        let a = alloc.allocate(32, 8).unwrap();
        let b = alloc.allocate(32, 8).unwrap();
        assert!(alloc.live_bytes() == 64);
        alloc.deallocate(a).unwrap();
        assert!(alloc.live_bytes() == 32);
        assert!(alloc.num_live() == 1);
        assert!(!alloc.is_live(a) && alloc.is_live(b));
    }
}
