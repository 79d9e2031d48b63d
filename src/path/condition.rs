use std::collections::HashSet;
use std::fmt::Debug;

use crate::expr::context::*;
use crate::expr::expr::*;
use crate::expr::op::BinOp;

/// The accumulated path condition, kept as a conjunct set.
///
/// `assume` narrows it, `assert` consults it. Once it goes false it stays
/// false: every later `add` is absorbed and the path is infeasible.
#[derive(Clone)]
pub struct PathCond {
    ctx: ExprCtx,
    conjuncts: HashSet<Expr>,
}

impl PathCond {
    pub fn new(ctx: ExprCtx) -> Self {
        let mut conjuncts = HashSet::new();
        conjuncts.insert(ctx._true());
        PathCond { ctx, conjuncts }
    }

    pub fn make_true(&mut self) {
        self.conjuncts.clear();
        self.conjuncts.insert(self.ctx._true());
    }

    pub fn make_false(&mut self) {
        self.conjuncts.clear();
        self.conjuncts.insert(self.ctx._false());
    }

    pub fn is_true(&self) -> bool {
        self.conjuncts.len() == 1 && self.conjuncts.contains(&self.ctx._true())
    }

    pub fn is_false(&self) -> bool {
        self.conjuncts.len() == 1 && self.conjuncts.contains(&self.ctx._false())
    }

    /// Conjoin a constraint. Conjunctions are flattened so each conjunct is
    /// tracked separately, which lets `x` and `!x` cancel syntactically
    /// without a solver call.
    pub fn add(&mut self, mut expr: Expr) {
        assert!(expr.ty().is_bool());
        expr.simplify();
        if self.is_false() || expr.is_true() {
            return;
        }
        if expr.is_false() {
            self.make_false();
            return;
        }

        if expr.is_binary() && expr.extract_bin_op() == BinOp::And {
            self.add(expr.extract_lhs());
            self.add(expr.extract_rhs());
        } else {
            let mut not_expr = self.ctx.not(expr.clone());
            not_expr.simplify();
            if self.conjuncts.contains(&not_expr) {
                self.make_false();
            } else {
                self.conjuncts.insert(expr);
            }
        }
    }

    pub fn to_expr(&self) -> Expr {
        let mut res =
            self.conjuncts.iter().fold(self.ctx._true(), |acc, x| self.ctx.and(acc, x.clone()));
        res.simplify();
        res
    }

    pub fn iter(&self) -> std::collections::hash_set::Iter<'_, Expr> {
        self.conjuncts.iter()
    }
}

impl Debug for PathCond {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.to_expr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ty::Type;
    use crate::symbol::store::SymbolStore;

    fn setup() -> (ExprCtx, SymbolStore) {
        let ctx = new_ctx();
        let store = SymbolStore::new(ctx.clone());
        (ctx, store)
    }

    #[test]
    fn starts_true() {
        let (ctx, _) = setup();
        let cond = PathCond::new(ctx);
        assert!(cond.is_true());
        assert!(!cond.is_false());
    }

    #[test]
    fn conjunctions_are_flattened() {
        let (ctx, mut store) = setup();
        let x = store.fresh(Type::I32);
        let a = ctx.gt(x.clone(), ctx.constant_i32(0));
        let b = ctx.lt(x.clone(), ctx.constant_i32(10));
        let mut cond = PathCond::new(ctx.clone());
        cond.add(ctx.and(a.clone(), b.clone()));
        let conjuncts: HashSet<_> = cond.iter().cloned().collect();
        assert!(conjuncts.contains(&a));
        assert!(conjuncts.contains(&b));
    }

    #[test]
    fn negated_conjunct_makes_the_path_infeasible() {
        let (ctx, mut store) = setup();
        let x = store.fresh(Type::I32);
        let claim = ctx.gt(x.clone(), ctx.constant_i32(0));
        let mut cond = PathCond::new(ctx.clone());
        cond.add(claim.clone());
        cond.add(ctx.not(claim));
        assert!(cond.is_false());
    }

    #[test]
    fn false_is_absorbing() {
        let (ctx, mut store) = setup();
        let x = store.fresh(Type::I32);
        let mut cond = PathCond::new(ctx.clone());
        cond.add(ctx._false());
        assert!(cond.is_false());
        cond.add(ctx.gt(x, ctx.constant_i32(0)));
        assert!(cond.is_false());
    }

    #[test]
    fn to_expr_folds_trivial_conditions() {
        let (ctx, _) = setup();
        let mut cond = PathCond::new(ctx.clone());
        cond.add(ctx._true());
        assert!(cond.to_expr().is_true());
    }
}
