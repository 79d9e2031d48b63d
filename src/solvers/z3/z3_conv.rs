use std::collections::HashMap;

use num_bigint::BigInt;

use z3;
use z3::ast::Ast;

use crate::expr::expr::*;
use crate::expr::ty::Type;
use crate::report::{Counterexample, ModelValue};
use crate::solvers::smt::smt_conv::*;
use crate::solvers::solver::PResult;

pub struct Z3Conv<'ctx> {
    z3_ctx: &'ctx z3::Context,
    z3_solver: z3::Solver<'ctx>,
    /// Cache Ast
    cache: HashMap<Expr, z3::ast::Dynamic<'ctx>>,
}

impl<'ctx> Z3Conv<'ctx> {
    pub fn new(z3_ctx: &'ctx z3::Context) -> Self {
        let z3_solver = z3::Solver::new(z3_ctx);
        Z3Conv { z3_ctx, z3_solver, cache: HashMap::new() }
    }

    fn assert(&self, e: z3::ast::Dynamic<'ctx>) {
        self.z3_solver.assert(&e.as_bool().unwrap());
    }

    fn value_of(&self, model: &z3::Model<'ctx>, ast: &z3::ast::Dynamic<'ctx>) -> ModelValue {
        let val = model.eval(ast, true).expect("Model does not interprete this expr");
        if let Some(b) = val.as_bool().and_then(|b| b.as_bool()) {
            ModelValue::Bool(b)
        } else if let Some(i) = val.as_int().and_then(|i| i.as_i64()) {
            ModelValue::Int(BigInt::from(i))
        } else {
            // Floats and oversized integers come back in solver syntax.
            ModelValue::Term(format!("{val:?}"))
        }
    }
}

impl<'ctx> SmtSolver<'ctx> for Z3Conv<'ctx> {
    fn init(&mut self) {}

    fn assert_expr(&mut self, expr: Expr) {
        let e = self.convert_ast(expr);
        self.assert(e);
    }

    fn check(&self) -> PResult {
        match self.z3_solver.check() {
            z3::SatResult::Sat => PResult::PSat,
            z3::SatResult::Unknown => PResult::PUnknow,
            z3::SatResult::Unsat => PResult::PUnsat,
        }
    }

    fn reset(&mut self) {
        // Clear solver assertions
        self.z3_solver.reset();
        // Clear cache
        self.cache.clear();
    }

    fn model_for(&self, symbols: &[Expr]) -> Counterexample {
        let model = self.z3_solver.get_model().expect("No model");
        let mut res = Counterexample::new();
        for symbol in symbols {
            let ast = self.get_cache_ast(symbol).expect("Not put into solver");
            let name = symbol.extract_symbol().name().to_string();
            res.push((name, self.value_of(&model, &ast)));
        }
        res
    }
}

impl<'ctx> Convert<z3::ast::Dynamic<'ctx>> for Z3Conv<'ctx> {
    fn cache_ast(&mut self, expr: Expr, ast: z3::ast::Dynamic<'ctx>) {
        self.cache.entry(expr).and_modify(|x| *x = ast.clone()).or_insert(ast);
    }

    fn get_cache_ast(&self, expr: &Expr) -> Option<z3::ast::Dynamic<'ctx>> {
        self.cache.get(expr).cloned()
    }

    fn mk_smt_bool(&self, b: bool) -> z3::ast::Dynamic<'ctx> {
        z3::ast::Dynamic::from(z3::ast::Bool::from_bool(&self.z3_ctx, b))
    }

    fn mk_smt_int(&self, i: BigInt) -> z3::ast::Dynamic<'ctx> {
        let num = i.to_string();
        z3::ast::Dynamic::from(
            z3::ast::Int::from_str(&self.z3_ctx, num.as_str()).expect("Wrong integer"),
        )
    }

    fn mk_smt_f32(&self, v: f32) -> z3::ast::Dynamic<'ctx> {
        z3::ast::Dynamic::from(z3::ast::Float::from_f32(&self.z3_ctx, v))
    }

    fn mk_smt_f64(&self, v: f64) -> z3::ast::Dynamic<'ctx> {
        z3::ast::Dynamic::from(z3::ast::Float::from_f64(&self.z3_ctx, v))
    }

    fn mk_variable(&self, name: String, ty: Type) -> z3::ast::Dynamic<'ctx> {
        match ty {
            Type::Bool => z3::ast::Dynamic::from(z3::ast::Bool::new_const(&self.z3_ctx, name)),
            Type::I8 | Type::I32 | Type::I64 => {
                z3::ast::Dynamic::from(z3::ast::Int::new_const(&self.z3_ctx, name))
            }
            Type::F32 => {
                z3::ast::Dynamic::from(z3::ast::Float::new_const_float32(&self.z3_ctx, name))
            }
            Type::F64 => {
                z3::ast::Dynamic::from(z3::ast::Float::new_const_double(&self.z3_ctx, name))
            }
        }
    }

    fn mk_add(
        &self,
        lhs: &z3::ast::Dynamic<'ctx>,
        rhs: &z3::ast::Dynamic<'ctx>,
    ) -> z3::ast::Dynamic<'ctx> {
        z3::ast::Dynamic::from(
            lhs.as_int().expect("lhs is not integer") + rhs.as_int().expect("rhs is not integer"),
        )
    }

    fn mk_sub(
        &self,
        lhs: &z3::ast::Dynamic<'ctx>,
        rhs: &z3::ast::Dynamic<'ctx>,
    ) -> z3::ast::Dynamic<'ctx> {
        z3::ast::Dynamic::from(
            lhs.as_int().expect("lhs is not integer") - rhs.as_int().expect("rhs is not integer"),
        )
    }

    fn mk_mul(
        &self,
        lhs: &z3::ast::Dynamic<'ctx>,
        rhs: &z3::ast::Dynamic<'ctx>,
    ) -> z3::ast::Dynamic<'ctx> {
        z3::ast::Dynamic::from(
            lhs.as_int().expect("lhs is not integer") * rhs.as_int().expect("rhs is not integer"),
        )
    }

    fn mk_div(
        &self,
        lhs: &z3::ast::Dynamic<'ctx>,
        rhs: &z3::ast::Dynamic<'ctx>,
    ) -> z3::ast::Dynamic<'ctx> {
        z3::ast::Dynamic::from(
            lhs.as_int().expect("lhs is not integer") / rhs.as_int().expect("rhs is not integer"),
        )
    }

    fn mk_eq(
        &self,
        lhs: &z3::ast::Dynamic<'ctx>,
        rhs: &z3::ast::Dynamic<'ctx>,
    ) -> z3::ast::Dynamic<'ctx> {
        z3::ast::Dynamic::from(lhs._eq(rhs))
    }

    fn mk_ne(
        &self,
        lhs: &z3::ast::Dynamic<'ctx>,
        rhs: &z3::ast::Dynamic<'ctx>,
    ) -> z3::ast::Dynamic<'ctx> {
        z3::ast::Dynamic::from(&self.mk_eq(lhs, rhs).as_bool().unwrap().not())
    }

    fn mk_ge(
        &self,
        lhs: &z3::ast::Dynamic<'ctx>,
        rhs: &z3::ast::Dynamic<'ctx>,
    ) -> z3::ast::Dynamic<'ctx> {
        if let Some(l) = lhs.as_int() {
            z3::ast::Dynamic::from(l.ge(&rhs.as_int().expect("rhs is not integer")))
        } else {
            let l = lhs.as_float().expect("lhs is not float");
            z3::ast::Dynamic::from(l.ge(&rhs.as_float().expect("rhs is not float")))
        }
    }

    fn mk_gt(
        &self,
        lhs: &z3::ast::Dynamic<'ctx>,
        rhs: &z3::ast::Dynamic<'ctx>,
    ) -> z3::ast::Dynamic<'ctx> {
        if let Some(l) = lhs.as_int() {
            z3::ast::Dynamic::from(l.gt(&rhs.as_int().expect("rhs is not integer")))
        } else {
            let l = lhs.as_float().expect("lhs is not float");
            z3::ast::Dynamic::from(l.gt(&rhs.as_float().expect("rhs is not float")))
        }
    }

    fn mk_le(
        &self,
        lhs: &z3::ast::Dynamic<'ctx>,
        rhs: &z3::ast::Dynamic<'ctx>,
    ) -> z3::ast::Dynamic<'ctx> {
        if let Some(l) = lhs.as_int() {
            z3::ast::Dynamic::from(l.le(&rhs.as_int().expect("rhs is not integer")))
        } else {
            let l = lhs.as_float().expect("lhs is not float");
            z3::ast::Dynamic::from(l.le(&rhs.as_float().expect("rhs is not float")))
        }
    }

    fn mk_lt(
        &self,
        lhs: &z3::ast::Dynamic<'ctx>,
        rhs: &z3::ast::Dynamic<'ctx>,
    ) -> z3::ast::Dynamic<'ctx> {
        if let Some(l) = lhs.as_int() {
            z3::ast::Dynamic::from(l.lt(&rhs.as_int().expect("rhs is not integer")))
        } else {
            let l = lhs.as_float().expect("lhs is not float");
            z3::ast::Dynamic::from(l.lt(&rhs.as_float().expect("rhs is not float")))
        }
    }

    fn mk_and(
        &self,
        lhs: &z3::ast::Dynamic<'ctx>,
        rhs: &z3::ast::Dynamic<'ctx>,
    ) -> z3::ast::Dynamic<'ctx> {
        z3::ast::Dynamic::from(z3::ast::Bool::and(
            &self.z3_ctx,
            &[&lhs.as_bool().expect("lhs is not bool"), &rhs.as_bool().expect("rhs is not bool")],
        ))
    }

    fn mk_or(
        &self,
        lhs: &z3::ast::Dynamic<'ctx>,
        rhs: &z3::ast::Dynamic<'ctx>,
    ) -> z3::ast::Dynamic<'ctx> {
        z3::ast::Dynamic::from(z3::ast::Bool::or(
            &self.z3_ctx,
            &[&lhs.as_bool().expect("lhs is not bool"), &rhs.as_bool().expect("rhs is not bool")],
        ))
    }

    fn mk_implies(
        &self,
        cond: &z3::ast::Dynamic<'ctx>,
        conseq: &z3::ast::Dynamic<'ctx>,
    ) -> z3::ast::Dynamic<'ctx> {
        z3::ast::Dynamic::from(
            cond.as_bool()
                .expect("cond is not bool")
                .implies(&conseq.as_bool().expect("conseq is not bool")),
        )
    }

    fn mk_not(&self, operand: &z3::ast::Dynamic<'ctx>) -> z3::ast::Dynamic<'ctx> {
        z3::ast::Dynamic::from(operand.as_bool().expect("operand is not bool").not())
    }

    fn mk_neg(&self, operand: &z3::ast::Dynamic<'ctx>) -> z3::ast::Dynamic<'ctx> {
        if let Some(i) = operand.as_int() {
            z3::ast::Dynamic::from(-i)
        } else {
            let f = operand.as_float().expect("operand is not float");
            z3::ast::Dynamic::from(f.unary_neg())
        }
    }

    fn mk_ite(
        &self,
        cond: &z3::ast::Dynamic<'ctx>,
        true_value: &z3::ast::Dynamic<'ctx>,
        false_value: &z3::ast::Dynamic<'ctx>,
    ) -> z3::ast::Dynamic<'ctx> {
        cond.as_bool().expect("condition must be bool").ite(true_value, false_value)
    }
}
