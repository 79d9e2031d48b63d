use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use num_bigint::BigInt;

use super::ast::*;
use super::constant::*;
use super::context::*;
use super::op::*;
use super::ty::*;
use crate::symbol::symbol::*;

/// `Expr` is a wrapper for an AST node. It only carries the node index used
/// to construct the AST; the corresponding information is retrieved from
/// `Context`.
#[derive(Clone)]
pub struct Expr {
    pub ctx: ExprCtx,
    pub(super) id: NodeId,
}

impl Expr {
    pub fn ty(&self) -> Type {
        self.ctx.borrow().ty(self.id)
    }

    pub fn is_terminal(&self) -> bool {
        self.ctx.borrow().is_terminal(self.id)
    }
    pub fn is_true(&self) -> bool {
        self.ctx.borrow().is_true(self.id)
    }
    pub fn is_false(&self) -> bool {
        self.ctx.borrow().is_false(self.id)
    }
    pub fn is_constant(&self) -> bool {
        self.ctx.borrow().is_constant(self.id)
    }
    pub fn is_symbol(&self) -> bool {
        self.ctx.borrow().is_symbol(self.id)
    }
    pub fn is_binary(&self) -> bool {
        self.ctx.borrow().is_binary(self.id)
    }
    pub fn is_unary(&self) -> bool {
        self.ctx.borrow().is_unary(self.id)
    }
    pub fn is_ite(&self) -> bool {
        self.ctx.borrow().is_ite(self.id)
    }
    pub fn is_not(&self) -> bool {
        self.is_unary() && self.extract_un_op().is_not()
    }

    pub fn extract_constant(&self) -> Constant {
        self.ctx
            .borrow()
            .terminal(self.id)
            .expect("Not terminal")
            .to_constant()
    }

    pub fn extract_symbol(&self) -> Symbol {
        self.ctx
            .borrow()
            .terminal(self.id)
            .expect("Not terminal")
            .to_symbol()
    }

    pub fn extract_bin_op(&self) -> BinOp {
        self.ctx.borrow().bin_op(self.id)
    }

    pub fn extract_un_op(&self) -> UnOp {
        self.ctx.borrow().un_op(self.id)
    }

    pub fn extract_lhs(&self) -> Expr {
        assert!(self.is_binary());
        self.extract_sub_expr(0)
    }

    pub fn extract_rhs(&self) -> Expr {
        assert!(self.is_binary());
        self.extract_sub_expr(1)
    }

    pub fn extract_operand(&self) -> Expr {
        assert!(self.is_unary());
        self.extract_sub_expr(0)
    }

    pub fn extract_cond(&self) -> Expr {
        assert!(self.is_ite());
        self.extract_sub_expr(0)
    }

    pub fn extract_true_value(&self) -> Expr {
        assert!(self.is_ite());
        self.extract_sub_expr(1)
    }

    pub fn extract_false_value(&self) -> Expr {
        assert!(self.is_ite());
        self.extract_sub_expr(2)
    }

    fn extract_sub_expr(&self, i: usize) -> Expr {
        let sub_exprs = self.sub_exprs().expect("Must be non-empty");
        assert!(i < sub_exprs.len());
        sub_exprs[i].clone()
    }

    /// Construct sub-exprs from AST
    pub fn sub_exprs(&self) -> Option<Vec<Expr>> {
        match self.ctx.borrow().sub_nodes(self.id) {
            Some(ids) => {
                let mut sub_exprs = Vec::new();
                for id in ids {
                    sub_exprs.push(Expr { ctx: self.ctx.clone(), id });
                }
                Some(sub_exprs)
            }
            None => None,
        }
    }

    pub fn replace_sub_exprs(&mut self, sub_exprs: Vec<Expr>) {
        if self.is_terminal() {
            return;
        }

        if self.is_binary() {
            let lhs = sub_exprs[0].clone();
            let rhs = sub_exprs[1].clone();
            *self = match self.extract_bin_op() {
                BinOp::Add => self.ctx.add(lhs, rhs),
                BinOp::Sub => self.ctx.sub(lhs, rhs),
                BinOp::Mul => self.ctx.mul(lhs, rhs),
                BinOp::Div => self.ctx.div(lhs, rhs),
                BinOp::Eq => self.ctx.eq(lhs, rhs),
                BinOp::Ne => self.ctx.ne(lhs, rhs),
                BinOp::Ge => self.ctx.ge(lhs, rhs),
                BinOp::Gt => self.ctx.gt(lhs, rhs),
                BinOp::Le => self.ctx.le(lhs, rhs),
                BinOp::Lt => self.ctx.lt(lhs, rhs),
                BinOp::And => self.ctx.and(lhs, rhs),
                BinOp::Or => self.ctx.or(lhs, rhs),
                BinOp::Implies => self.ctx.implies(lhs, rhs),
            };
            return;
        }

        if self.is_unary() {
            let operand = sub_exprs[0].clone();
            *self = match self.extract_un_op() {
                UnOp::Not => self.ctx.not(operand),
                UnOp::Neg => self.ctx.neg(operand),
            };
            return;
        }

        if self.is_ite() {
            let cond = sub_exprs[0].clone();
            let true_value = sub_exprs[1].clone();
            let false_value = sub_exprs[2].clone();
            *self = self.ctx.ite(cond, true_value, false_value);
            return;
        }

        panic!("Need implementing for {self:?}");
    }

    /// All distinct symbol terminals occurring in this expression, ordered
    /// by minting id. Used to build counterexample assignments.
    pub fn symbols(&self) -> Vec<Expr> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.collect_symbols(&mut seen, &mut out);
        out.sort_by_key(|e| e.extract_symbol().id());
        out
    }

    pub(crate) fn collect_symbols(&self, seen: &mut HashSet<NodeId>, out: &mut Vec<Expr>) {
        if self.is_symbol() {
            if seen.insert(self.id) {
                out.push(self.clone());
            }
            return;
        }
        if let Some(sub_exprs) = self.sub_exprs() {
            for e in sub_exprs {
                e.collect_symbols(seen, out);
            }
        }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_terminal() {
            return write!(f, "{:?}", self.ctx.borrow().terminal(self.id).unwrap());
        }

        let sub_exprs = self.sub_exprs().unwrap();

        if self.is_binary() {
            let lhs = &sub_exprs[0];
            let rhs = &sub_exprs[1];
            return write!(f, "({lhs:?} {:?} {rhs:?})", self.extract_bin_op());
        }

        if self.is_unary() {
            return write!(f, "{:?}({:?})", self.extract_un_op(), sub_exprs[0]);
        }

        if self.is_ite() {
            let cond = &sub_exprs[0];
            let true_value = &sub_exprs[1];
            let false_value = &sub_exprs[2];
            return write!(f, "{cond:?} ? {true_value:?} : {false_value:?}");
        }

        panic!("Incomplete Debug for Expr");
    }
}

pub trait ExprBuilder {
    fn constant_bool(&self, b: bool) -> Expr;
    fn _true(&self) -> Expr;
    fn _false(&self) -> Expr;
    fn constant_integer(&self, i: BigInt, ty: Type) -> Expr;
    fn constant_i8(&self, i: i8) -> Expr;
    fn constant_i32(&self, i: i32) -> Expr;
    fn constant_i64(&self, i: i64) -> Expr;
    fn constant_f32(&self, v: f32) -> Expr;
    fn constant_f64(&self, v: f64) -> Expr;
    fn mk_symbol(&self, symbol: Symbol, ty: Type) -> Expr;

    fn add(&self, lhs: Expr, rhs: Expr) -> Expr;
    fn sub(&self, lhs: Expr, rhs: Expr) -> Expr;
    fn mul(&self, lhs: Expr, rhs: Expr) -> Expr;
    fn div(&self, lhs: Expr, rhs: Expr) -> Expr;
    fn eq(&self, lhs: Expr, rhs: Expr) -> Expr;
    fn ne(&self, lhs: Expr, rhs: Expr) -> Expr;
    fn ge(&self, lhs: Expr, rhs: Expr) -> Expr;
    fn gt(&self, lhs: Expr, rhs: Expr) -> Expr;
    fn le(&self, lhs: Expr, rhs: Expr) -> Expr;
    fn lt(&self, lhs: Expr, rhs: Expr) -> Expr;
    fn and(&self, lhs: Expr, rhs: Expr) -> Expr;
    fn or(&self, lhs: Expr, rhs: Expr) -> Expr;
    fn implies(&self, cond: Expr, conseq: Expr) -> Expr;
    fn not(&self, operand: Expr) -> Expr;
    fn neg(&self, operand: Expr) -> Expr;
    fn ite(&self, cond: Expr, true_value: Expr, false_value: Expr) -> Expr;
}
