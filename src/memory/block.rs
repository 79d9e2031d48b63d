use std::fmt::Debug;

/// Opaque, address-equivalent identity of one tracked allocation. Minted by
/// a monotonic bump, so a handle is never reused even after its block is
/// freed.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(pub(crate) u64);

impl Handle {
    pub fn addr(&self) -> u64 {
        self.0
    }

    /// Forge a handle from a raw address. Only useful for feeding the
    /// checker addresses the allocator never produced.
    pub fn from_addr(addr: u64) -> Self {
        Handle(addr)
    }
}

impl Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Allocation-site sequence number, for diagnostics.
pub type AllocSite = usize;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BlockState {
    Live,
    /// Terminal: a freed block never returns to live.
    Freed,
}

/// One live or freed heap allocation. Owned exclusively by the allocator.
#[derive(Clone)]
pub struct Block {
    handle: Handle,
    size: u32,
    align: u32,
    site: AllocSite,
    state: BlockState,
}

impl Block {
    pub(super) fn new(handle: Handle, size: u32, align: u32, site: AllocSite) -> Self {
        Block { handle, size, align, site, state: BlockState::Live }
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn align(&self) -> u32 {
        self.align
    }

    pub fn site(&self) -> AllocSite {
        self.site
    }

    pub fn is_live(&self) -> bool {
        self.state == BlockState::Live
    }

    pub(super) fn mark_freed(&mut self) {
        assert!(self.is_live());
        self.state = BlockState::Freed;
    }
}

impl Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Block({:?}, {} bytes, site {}, {:?})",
            self.handle, self.size, self.site, self.state
        )
    }
}
