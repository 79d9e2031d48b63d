use crate::expr::expr::Expr;
use crate::memory::block::Handle;

use super::runtime::Runtime;

/// The allocation half of the boundary. Instrumented code imports these
/// under their own namespace so the host can swap memory models without
/// touching call sites.
pub trait MemSummaries {
    fn alloc(&mut self, size: u32, align: u32) -> Option<Handle>;
    fn dealloc(&mut self, handle: Handle);
}

/// The value and constraint half of the boundary.
pub trait Symbolic {
    fn i8_symbol(&mut self) -> Expr;
    fn i32_symbol(&mut self) -> Expr;
    fn i64_symbol(&mut self) -> Expr;
    fn f32_symbol(&mut self) -> Expr;
    fn f64_symbol(&mut self) -> Expr;
    fn assume(&mut self, cond: Expr);
    fn assert(&mut self, cond: Expr);
}

impl MemSummaries for Runtime<'_> {
    fn alloc(&mut self, size: u32, align: u32) -> Option<Handle> {
        self.allocate(size, align)
    }

    fn dealloc(&mut self, handle: Handle) {
        self.deallocate(handle)
    }
}

impl Symbolic for Runtime<'_> {
    fn i8_symbol(&mut self) -> Expr {
        self.symbol_i8()
    }

    fn i32_symbol(&mut self) -> Expr {
        self.symbol_i32()
    }

    fn i64_symbol(&mut self) -> Expr {
        self.symbol_i64()
    }

    fn f32_symbol(&mut self) -> Expr {
        self.symbol_f32()
    }

    fn f64_symbol(&mut self) -> Expr {
        self.symbol_f64()
    }

    fn assume(&mut self, cond: Expr) {
        Runtime::assume(self, cond)
    }

    fn assert(&mut self, cond: Expr) {
        Runtime::assert(self, cond)
    }
}

/// Link-time stand-in for the overridable assumption entry point. Release
/// builds compose [`AssumeBinding::Unlinked`], which accepts and discards
/// the condition instead of touching a path condition that does not exist.
pub enum AssumeBinding<'rt, 'ctx> {
    Host(&'rt mut Runtime<'ctx>),
    Unlinked,
}

impl AssumeBinding<'_, '_> {
    pub fn assume(&mut self, cond: Expr) {
        match self {
            AssumeBinding::Host(runtime) => runtime.assume(cond),
            AssumeBinding::Unlinked => {}
        }
    }
}
