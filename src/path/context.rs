use std::fmt::Debug;

use crate::expr::context::ExprCtx;
use crate::memory::allocator::Allocator;
use crate::symbol::store::SymbolStore;

use super::condition::PathCond;

/// Everything that is private to one explored path: the heap picture, the
/// path condition and the symbols minted so far.
///
/// Forking deep-clones all of it, so a free or an assumption on one path is
/// invisible to its sibling. Fresh handles keep coming from a monotonic
/// counter, so no two paths ever mint the same address either.
#[derive(Clone)]
pub struct PathCtx {
    pub allocator: Allocator,
    pub cond: PathCond,
    pub store: SymbolStore,
}

impl PathCtx {
    pub fn new(ctx: ExprCtx) -> Self {
        PathCtx {
            allocator: Allocator::new(),
            cond: PathCond::new(ctx.clone()),
            store: SymbolStore::new(ctx),
        }
    }

    /// Snapshot this path for a sibling branch.
    pub fn fork(&self) -> Self {
        self.clone()
    }

    pub fn is_infeasible(&self) -> bool {
        self.cond.is_false()
    }
}

impl Debug for PathCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "path({:?}, {} live blocks)", self.cond, self.allocator.num_live())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::context::new_ctx;
    use crate::expr::expr::ExprBuilder;
    use crate::expr::ty::Type;

    #[test]
    fn fork_isolates_the_heap() {
        let ctx = new_ctx();
        let mut path = PathCtx::new(ctx);
        let h = path.allocator.allocate(16, 8).unwrap();

        let mut sibling = path.fork();
        sibling.allocator.deallocate(h).unwrap();

        assert!(path.allocator.is_live(h));
        assert!(!sibling.allocator.is_live(h));
    }

    #[test]
    fn fork_isolates_the_condition() {
        let ctx = new_ctx();
        let mut path = PathCtx::new(ctx.clone());
        let x = path.store.fresh(Type::I32);
        let claim = ctx.gt(x.clone(), ctx.constant_i32(0));

        let mut sibling = path.fork();
        sibling.cond.add(ctx.not(claim.clone()));
        path.cond.add(claim);

        assert!(!path.is_infeasible());
        assert!(!sibling.is_infeasible());
        assert_ne!(format!("{:?}", path.cond), format!("{:?}", sibling.cond));
    }

    #[test]
    fn forked_paths_share_the_symbol_numbering() {
        let ctx = new_ctx();
        let mut path = PathCtx::new(ctx);
        path.store.fresh(Type::I8);

        let mut sibling = path.fork();
        let a = path.store.fresh(Type::I32);
        let b = sibling.store.fresh(Type::I32);

        // Both branches continue from the same counter. The host is expected
        // to explore them one at a time, replaying the prefix.
        assert_eq!(a.extract_symbol().name(), b.extract_symbol().name());
    }
}
