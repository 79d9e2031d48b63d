use num_bigint::BigInt;

use crate::expr::constant::Constant;
use crate::expr::expr::*;
use crate::expr::op::*;
use crate::expr::ty::Type;
use crate::report::Counterexample;
use crate::solvers::solver::PResult;

/// What the runtime needs from a backend: push constraints, ask for
/// satisfiability, and read back a model for a chosen set of variables.
pub trait SmtSolver<'ctx> {
    fn init(&mut self);
    fn assert_expr(&mut self, expr: Expr);
    fn check(&self) -> PResult;
    fn reset(&mut self);
    fn model_for(&self, symbols: &[Expr]) -> Counterexample;
}

/// Lowering from the host expression language to a backend ast.
///
/// `convert_ast` does the structural walk and memoization; a backend only
/// supplies the leaf and operator constructors.
pub trait Convert<SmtAst: Clone> {
    fn cache_ast(&mut self, expr: Expr, ast: SmtAst);
    fn get_cache_ast(&self, expr: &Expr) -> Option<SmtAst>;

    fn convert_ast(&mut self, expr: Expr) -> SmtAst {
        if let Some(ast) = self.get_cache_ast(&expr) {
            return ast;
        }

        // Convert sub exprs firstly
        let mut args: Vec<SmtAst> = Vec::new();
        if let Some(sub_exprs) = expr.sub_exprs() {
            for e in sub_exprs {
                args.push(self.convert_ast(e));
            }
        }

        let ast = if expr.is_constant() {
            match expr.extract_constant() {
                Constant::Bool(b) => self.mk_smt_bool(b),
                Constant::Integer(i) => self.mk_smt_int(i),
                Constant::Float32(v) => self.mk_smt_f32(v),
                Constant::Float64(v) => self.mk_smt_f64(v),
            }
        } else if expr.is_symbol() {
            self.mk_variable(expr.extract_symbol().name().to_string(), expr.ty())
        } else if expr.is_binary() {
            let (lhs, rhs) = (&args[0], &args[1]);
            match expr.extract_bin_op() {
                BinOp::Add => self.mk_add(lhs, rhs),
                BinOp::Sub => self.mk_sub(lhs, rhs),
                BinOp::Mul => self.mk_mul(lhs, rhs),
                BinOp::Div => self.mk_div(lhs, rhs),
                BinOp::Eq => self.mk_eq(lhs, rhs),
                BinOp::Ne => self.mk_ne(lhs, rhs),
                BinOp::Ge => self.mk_ge(lhs, rhs),
                BinOp::Gt => self.mk_gt(lhs, rhs),
                BinOp::Le => self.mk_le(lhs, rhs),
                BinOp::Lt => self.mk_lt(lhs, rhs),
                BinOp::And => self.mk_and(lhs, rhs),
                BinOp::Or => self.mk_or(lhs, rhs),
                BinOp::Implies => self.mk_implies(lhs, rhs),
            }
        } else if expr.is_unary() {
            match expr.extract_un_op() {
                UnOp::Not => self.mk_not(&args[0]),
                UnOp::Neg => self.mk_neg(&args[0]),
            }
        } else if expr.is_ite() {
            self.mk_ite(&args[0], &args[1], &args[2])
        } else {
            panic!("Not support {expr:?}")
        };

        self.cache_ast(expr, ast.clone());
        ast
    }

    // constant
    fn mk_smt_bool(&self, b: bool) -> SmtAst;
    fn mk_smt_int(&self, i: BigInt) -> SmtAst;
    fn mk_smt_f32(&self, v: f32) -> SmtAst;
    fn mk_smt_f64(&self, v: f64) -> SmtAst;

    // variable
    fn mk_variable(&self, name: String, ty: Type) -> SmtAst;

    // expr
    fn mk_add(&self, lhs: &SmtAst, rhs: &SmtAst) -> SmtAst;
    fn mk_sub(&self, lhs: &SmtAst, rhs: &SmtAst) -> SmtAst;
    fn mk_mul(&self, lhs: &SmtAst, rhs: &SmtAst) -> SmtAst;
    fn mk_div(&self, lhs: &SmtAst, rhs: &SmtAst) -> SmtAst;
    fn mk_eq(&self, lhs: &SmtAst, rhs: &SmtAst) -> SmtAst;
    fn mk_ne(&self, lhs: &SmtAst, rhs: &SmtAst) -> SmtAst;
    fn mk_ge(&self, lhs: &SmtAst, rhs: &SmtAst) -> SmtAst;
    fn mk_gt(&self, lhs: &SmtAst, rhs: &SmtAst) -> SmtAst;
    fn mk_le(&self, lhs: &SmtAst, rhs: &SmtAst) -> SmtAst;
    fn mk_lt(&self, lhs: &SmtAst, rhs: &SmtAst) -> SmtAst;
    fn mk_and(&self, lhs: &SmtAst, rhs: &SmtAst) -> SmtAst;
    fn mk_or(&self, lhs: &SmtAst, rhs: &SmtAst) -> SmtAst;
    fn mk_implies(&self, cond: &SmtAst, conseq: &SmtAst) -> SmtAst;
    fn mk_not(&self, operand: &SmtAst) -> SmtAst;
    fn mk_neg(&self, operand: &SmtAst) -> SmtAst;
    fn mk_ite(&self, cond: &SmtAst, true_value: &SmtAst, false_value: &SmtAst) -> SmtAst;
}
