use crate::expr::context::ExprCtx;
use crate::expr::expr::*;
use crate::expr::ty::Type;

use super::symbol::*;

/// Side table correlating minted symbolic identities with their
/// representation. The instrumented program owns the returned values; the
/// store keeps only this weak back reference for constraint tracking.
#[derive(Clone)]
pub struct SymbolStore {
    ctx: ExprCtx,
    symbols: Vec<Expr>,
}

impl SymbolStore {
    pub fn new(ctx: ExprCtx) -> Self {
        SymbolStore { ctx, symbols: Vec::new() }
    }

    /// Mint a fresh variable of `ty`. Identities are monotonic across all
    /// types: two calls never return the same identity, even for the same
    /// type.
    pub fn fresh(&mut self, ty: Type) -> Expr {
        assert!(ty.is_numeric(), "only value types cross the host boundary");
        let id = self.symbols.len();
        let name = format!("{}_symbol_{id}", ty.prefix());
        let expr = self.ctx.mk_symbol(Symbol::new(name, id), ty);
        self.symbols.push(expr.clone());
        expr
    }

    pub fn lookup(&self, id: SymbolId) -> Option<Expr> {
        self.symbols.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
