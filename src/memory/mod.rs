pub mod allocator;
pub mod block;
