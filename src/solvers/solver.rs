use crate::expr::expr::Expr;
use crate::report::Counterexample;

use super::context::SolverCtx;
use super::smt::smt_conv::*;
use super::z3::z3_conv::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PResult {
    PSat,
    PUnknow,
    PUnsat,
}

pub struct Solver<'ctx> {
    smt_solver: Box<dyn SmtSolver<'ctx> + 'ctx>,
}

impl<'ctx> Solver<'ctx> {
    pub fn new(solver_ctx: &'ctx SolverCtx) -> Self {
        let mut smt_solver = match solver_ctx {
            SolverCtx::Z3(ctx) => Box::new(Z3Conv::new(ctx)),
        };
        smt_solver.init();
        Solver { smt_solver }
    }

    pub fn check(&self) -> PResult {
        self.smt_solver.check()
    }

    pub fn reset(&mut self) {
        self.smt_solver.reset();
    }

    pub fn assert_expr(&mut self, expr: Expr) {
        self.smt_solver.assert_expr(expr);
    }

    /// Read the current model back for the given symbolic variables. Only
    /// meaningful right after a `PSat` check.
    pub fn model_for(&self, symbols: &[Expr]) -> Counterexample {
        self.smt_solver.model_for(symbols)
    }
}
