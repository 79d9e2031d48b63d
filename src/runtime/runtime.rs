use std::cell::RefCell;
use std::rc::Rc;

use crate::expr::context::ExprCtx;
use crate::expr::expr::*;
use crate::expr::ty::Type;
use crate::memory::block::Handle;
use crate::path::context::PathCtx;
use crate::report::*;
use crate::solvers::context::SolverCtx;
use crate::solvers::solver::*;

/// One explored path's view of the host: its heap, its path condition, its
/// symbol numbering, and a solver to decide claims against the condition.
///
/// Operations never fail into the caller. Everything reportable goes into
/// the shared [`Report`] and the call returns a plain value.
pub struct Runtime<'ctx> {
    ctx: ExprCtx,
    pub path: PathCtx,
    solver: Solver<'ctx>,
    report: ReportPtr,
    /// When set, every accepted assumption is also checked for
    /// satisfiability so semantic contradictions prune the path as early as
    /// syntactic ones.
    feasibility_checks: bool,
}

impl<'ctx> Runtime<'ctx> {
    pub fn new(ctx: ExprCtx, solver_ctx: &'ctx SolverCtx) -> Self {
        Runtime {
            ctx: ctx.clone(),
            path: PathCtx::new(ctx),
            solver: Solver::new(solver_ctx),
            report: Rc::new(RefCell::new(Report::default())),
            feasibility_checks: false,
        }
    }

    pub fn report(&self) -> ReportPtr {
        self.report.clone()
    }

    pub fn set_feasibility_checks(&mut self, on: bool) {
        self.feasibility_checks = on;
    }

    /// Branch off a sibling path. Heap, condition and symbol numbering are
    /// deep-copied; the report stays shared so the host sees one stream of
    /// outcomes.
    pub fn fork(&self, solver_ctx: &'ctx SolverCtx) -> Self {
        Runtime {
            ctx: self.ctx.clone(),
            path: self.path.fork(),
            solver: Solver::new(solver_ctx),
            report: self.report.clone(),
            feasibility_checks: self.feasibility_checks,
        }
    }

    pub fn allocate(&mut self, size: u32, align: u32) -> Option<Handle> {
        match self.path.allocator.allocate(size, align) {
            Ok(handle) => Some(handle),
            Err(violation) => {
                self.report.borrow_mut().report(Outcome::Memory(violation));
                None
            }
        }
    }

    pub fn deallocate(&mut self, handle: Handle) {
        if let Err(violation) = self.path.allocator.deallocate(handle) {
            self.report.borrow_mut().report(Outcome::Memory(violation));
        }
    }

    /// Gate for the host's memory-access checker. A dead handle files a
    /// use-after-free and the access must not go through.
    pub fn check_deref(&mut self, handle: Handle) -> bool {
        match self.path.allocator.check_deref(handle) {
            Ok(_) => true,
            Err(violation) => {
                self.report.borrow_mut().report(Outcome::Memory(violation));
                false
            }
        }
    }

    pub fn symbol_i8(&mut self) -> Expr {
        self.path.store.fresh(Type::I8)
    }

    pub fn symbol_i32(&mut self) -> Expr {
        self.path.store.fresh(Type::I32)
    }

    pub fn symbol_i64(&mut self) -> Expr {
        self.path.store.fresh(Type::I64)
    }

    pub fn symbol_f32(&mut self) -> Expr {
        self.path.store.fresh(Type::F32)
    }

    pub fn symbol_f64(&mut self) -> Expr {
        self.path.store.fresh(Type::F64)
    }

    /// Narrow the current path. Never fails; a contradiction files
    /// [`Outcome::Infeasible`] once and leaves the path dead.
    pub fn assume(&mut self, cond: Expr) {
        assert!(cond.ty().is_bool());
        if self.path.is_infeasible() {
            return;
        }

        self.path.cond.add(cond);
        if self.path.is_infeasible() {
            self.report.borrow_mut().report(Outcome::Infeasible);
            return;
        }

        if self.feasibility_checks {
            self.solver.reset();
            for conjunct in self.path.cond.iter() {
                self.solver.assert_expr(conjunct.clone());
            }
            if self.solver.check() == PResult::PUnsat {
                self.path.cond.make_false();
                self.report.borrow_mut().report(Outcome::Infeasible);
            }
        }
    }

    /// Check a claim against the path condition: satisfiability of the
    /// negation is a bug, with the model as witness. Execution continues
    /// either way.
    pub fn assert(&mut self, cond: Expr) {
        assert!(cond.ty().is_bool());
        if self.path.is_infeasible() {
            // Vacuously true, the path is already dead.
            return;
        }

        let mut claim = cond;
        claim.simplify();
        if claim.is_true() {
            return;
        }

        self.solver.reset();
        for conjunct in self.path.cond.iter() {
            self.solver.assert_expr(conjunct.clone());
        }
        let mut negated = self.ctx.not(claim.clone());
        negated.simplify();
        self.solver.assert_expr(negated);

        match self.solver.check() {
            PResult::PSat => {
                let involved = self.ctx.and(self.path.cond.to_expr(), claim.clone());
                let counterexample = self.solver.model_for(&involved.symbols());
                self.report.borrow_mut().report(Outcome::AssertFailed {
                    claim: format!("{claim:?}"),
                    counterexample,
                });
            }
            PResult::PUnknow => {
                self.report
                    .borrow_mut()
                    .report(Outcome::Unknown { claim: format!("{claim:?}") });
            }
            PResult::PUnsat => {}
        }
    }
}
