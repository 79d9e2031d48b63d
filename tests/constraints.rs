use num_bigint::BigInt;

use symrt::{
    AssumeBinding, ExprBuilder, ModelValue, Outcome, Runtime, SolverCtx, Symbolic, new_ctx,
};

#[test]
fn entailed_assertion_is_silent() {
    let solver_ctx = SolverCtx::new();
    let ctx = new_ctx();
    let mut rt = Runtime::new(ctx.clone(), &solver_ctx);

    let x = rt.i32_symbol();
    rt.assume(ctx.gt(x.clone(), ctx.constant_i32(0)));
    rt.assert(ctx.gt(x, ctx.constant_i32(0)));

    assert!(rt.report().borrow().is_empty());
}

#[test]
fn weaker_claim_is_still_entailed() {
    let solver_ctx = SolverCtx::new();
    let ctx = new_ctx();
    let mut rt = Runtime::new(ctx.clone(), &solver_ctx);

    let x = rt.i32_symbol();
    rt.assume(ctx.gt(x.clone(), ctx.constant_i32(5)));
    rt.assert(ctx.gt(x, ctx.constant_i32(0)));

    assert!(rt.report().borrow().is_empty());
}

#[test]
fn unconstrained_claim_fails_with_counterexample() {
    let solver_ctx = SolverCtx::new();
    let ctx = new_ctx();
    let mut rt = Runtime::new(ctx.clone(), &solver_ctx);

    let x = rt.i32_symbol();
    rt.assert(ctx.gt(x, ctx.constant_i32(0)));

    let report = rt.report();
    let report = report.borrow();
    assert_eq!(report.num_violations(), 1);
    match report.iter().next().unwrap() {
        Outcome::AssertFailed { counterexample, .. } => {
            let (name, value) = &counterexample[0];
            assert_eq!(name, "i32_symbol_0");
            match value {
                ModelValue::Int(v) => assert!(*v <= BigInt::ZERO),
                other => panic!("expected an integer witness, got {other:?}"),
            }
        }
        other => panic!("expected an assertion failure, got {other:?}"),
    }
}

#[test]
fn assume_false_kills_the_path_and_later_asserts_are_vacuous() {
    let solver_ctx = SolverCtx::new();
    let ctx = new_ctx();
    let mut rt = Runtime::new(ctx.clone(), &solver_ctx);

    let x = rt.i32_symbol();
    rt.assume(ctx._false());

    let report = rt.report();
    assert_eq!(report.borrow().len(), 1);
    assert!(report.borrow().iter().next().unwrap().is_infeasible());

    // Anything asserted on a dead path holds vacuously.
    rt.assert(ctx.gt(x.clone(), ctx.constant_i32(0)));
    rt.assert(ctx.lt(x, ctx.constant_i32(0)));
    assert_eq!(report.borrow().len(), 1);
    assert_eq!(report.borrow().num_violations(), 0);
}

#[test]
fn contradictory_assumptions_are_caught_syntactically() {
    let solver_ctx = SolverCtx::new();
    let ctx = new_ctx();
    let mut rt = Runtime::new(ctx.clone(), &solver_ctx);

    let x = rt.i32_symbol();
    let claim = ctx.gt(x, ctx.constant_i32(0));
    rt.assume(claim.clone());
    rt.assume(ctx.not(claim));

    let report = rt.report();
    let report = report.borrow();
    assert_eq!(report.len(), 1);
    assert!(report.iter().next().unwrap().is_infeasible());
}

#[test]
fn semantic_contradictions_need_the_feasibility_check() {
    let solver_ctx = SolverCtx::new();
    let ctx = new_ctx();
    let mut rt = Runtime::new(ctx.clone(), &solver_ctx);
    rt.set_feasibility_checks(true);

    let x = rt.i32_symbol();
    rt.assume(ctx.gt(x.clone(), ctx.constant_i32(5)));
    rt.assume(ctx.lt(x, ctx.constant_i32(3)));

    let report = rt.report();
    let report = report.borrow();
    assert_eq!(report.len(), 1);
    assert!(report.iter().next().unwrap().is_infeasible());
}

#[test]
fn every_minted_symbol_is_distinct() {
    let solver_ctx = SolverCtx::new();
    let ctx = new_ctx();
    let mut rt = Runtime::new(ctx, &solver_ctx);

    let symbols =
        [rt.i8_symbol(), rt.i32_symbol(), rt.i32_symbol(), rt.i64_symbol(), rt.f32_symbol()];
    for (i, a) in symbols.iter().enumerate() {
        for b in symbols.iter().skip(i + 1) {
            assert_ne!(a, b);
            assert_ne!(a.extract_symbol().name(), b.extract_symbol().name());
        }
    }
}

#[test]
fn float_claims_go_through_the_solver() {
    let solver_ctx = SolverCtx::new();
    let ctx = new_ctx();
    let mut rt = Runtime::new(ctx.clone(), &solver_ctx);

    let f = rt.f64_symbol();
    rt.assume(ctx.lt(f.clone(), ctx.constant_f64(1.0)));
    rt.assert(ctx.lt(f.clone(), ctx.constant_f64(2.0)));
    assert!(rt.report().borrow().is_empty());

    rt.assert(ctx.gt(f, ctx.constant_f64(2.0)));
    let report = rt.report();
    let report = report.borrow();
    assert_eq!(report.num_violations(), 1);
    assert!(matches!(report.iter().next().unwrap(), Outcome::AssertFailed { .. }));
}

#[test]
fn conditional_values_respect_the_path_condition() {
    let solver_ctx = SolverCtx::new();
    let ctx = new_ctx();
    let mut rt = Runtime::new(ctx.clone(), &solver_ctx);

    let x = rt.i32_symbol();
    let y = ctx.ite(
        ctx.gt(x.clone(), ctx.constant_i32(0)),
        ctx.constant_i32(1),
        ctx.constant_i32(0),
    );
    rt.assert(ctx.ge(y.clone(), ctx.constant_i32(0)));
    assert!(rt.report().borrow().is_empty());

    rt.assume(ctx.gt(x, ctx.constant_i32(10)));
    rt.assert(ctx.eq(y, ctx.constant_i32(1)));
    assert!(rt.report().borrow().is_empty());
}

#[test]
fn forked_paths_keep_independent_conditions_but_one_report() {
    let solver_ctx = SolverCtx::new();
    let ctx = new_ctx();
    let mut rt = Runtime::new(ctx.clone(), &solver_ctx);

    let x = rt.i32_symbol();
    let positive = ctx.gt(x.clone(), ctx.constant_i32(0));

    let mut branch = rt.fork(&solver_ctx);
    rt.assume(positive.clone());
    branch.assume(ctx.not(positive.clone()));

    rt.assert(positive.clone());
    branch.assert(positive);

    // Only the negative branch can violate the claim, and both branches
    // file into the same report.
    let report = rt.report();
    let report = report.borrow();
    assert_eq!(report.num_violations(), 1);
}

#[test]
fn unlinked_assume_binding_discards_the_condition() {
    let solver_ctx = SolverCtx::new();
    let ctx = new_ctx();
    let mut rt = Runtime::new(ctx.clone(), &solver_ctx);

    let mut binding = AssumeBinding::Unlinked;
    binding.assume(ctx._false());

    // Nothing was narrowed and nothing was reported.
    let x = rt.i32_symbol();
    rt.assert(ctx.eq(x.clone(), x));
    assert!(rt.report().borrow().is_empty());

    let mut binding = AssumeBinding::Host(&mut rt);
    binding.assume(ctx._false());
    assert_eq!(rt.report().borrow().len(), 1);
}
