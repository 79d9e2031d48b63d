use symrt::{Handle, MemSummaries, Outcome, Runtime, SolverCtx, Violation, new_ctx};

fn runtime(solver_ctx: &SolverCtx) -> Runtime<'_> {
    Runtime::new(new_ctx(), solver_ctx)
}

#[test]
fn live_handles_are_unique() {
    let solver_ctx = SolverCtx::new();
    let mut rt = runtime(&solver_ctx);

    let mut handles = Vec::new();
    for size in [0u32, 1, 8, 8, 4096] {
        handles.push(rt.alloc(size, 8).unwrap());
    }
    for (i, a) in handles.iter().enumerate() {
        for b in handles.iter().skip(i + 1) {
            assert_ne!(a, b);
        }
    }
    assert!(rt.report().borrow().is_empty());
}

#[test]
fn handles_stay_unique_across_frees() {
    let solver_ctx = SolverCtx::new();
    let mut rt = runtime(&solver_ctx);

    let first = rt.alloc(16, 8).unwrap();
    rt.dealloc(first);
    let second = rt.alloc(16, 8).unwrap();

    // Freed is terminal. Storage may be reused by a real memory model, the
    // handle never is.
    assert_ne!(first, second);
    assert!(rt.report().borrow().is_empty());
}

#[test]
fn second_free_reports_double_free() {
    let solver_ctx = SolverCtx::new();
    let mut rt = runtime(&solver_ctx);

    let p = rt.alloc(8, 8).unwrap();
    rt.dealloc(p);
    rt.dealloc(p);

    let report = rt.report();
    let report = report.borrow();
    assert_eq!(report.len(), 1);
    assert!(matches!(
        report.iter().next().unwrap(),
        Outcome::Memory(Violation::DoubleFree(h)) if *h == p
    ));
}

#[test]
fn free_of_unknown_handle_reports_invalid_free() {
    let solver_ctx = SolverCtx::new();
    let mut rt = runtime(&solver_ctx);

    let bogus = Handle::from_addr(0xdead_beef);
    rt.dealloc(bogus);

    let report = rt.report();
    let report = report.borrow();
    assert!(matches!(
        report.iter().next().unwrap(),
        Outcome::Memory(Violation::InvalidFree(h)) if *h == bogus
    ));
}

#[test]
fn deref_of_freed_handle_reports_use_after_free() {
    let solver_ctx = SolverCtx::new();
    let mut rt = runtime(&solver_ctx);

    let p = rt.alloc(32, 8).unwrap();
    assert!(rt.check_deref(p));
    rt.dealloc(p);
    assert!(!rt.check_deref(p));

    let report = rt.report();
    let report = report.borrow();
    assert_eq!(report.num_violations(), 1);
    assert!(matches!(
        report.iter().next().unwrap(),
        Outcome::Memory(Violation::UseAfterFree(h)) if *h == p
    ));
}

#[test]
fn zero_sized_allocation_is_permitted() {
    let solver_ctx = SolverCtx::new();
    let mut rt = runtime(&solver_ctx);

    let a = rt.alloc(0, 1).unwrap();
    let b = rt.alloc(0, 1).unwrap();
    assert_ne!(a, b);

    rt.dealloc(a);
    rt.dealloc(b);
    assert!(rt.report().borrow().is_empty());
}

#[test]
fn forked_paths_do_not_share_heap_state() {
    let solver_ctx = SolverCtx::new();
    let mut rt = runtime(&solver_ctx);
    let p = rt.alloc(8, 8).unwrap();

    let mut branch = rt.fork(&solver_ctx);
    branch.dealloc(p);
    // A free on one branch is invisible to the sibling.
    rt.dealloc(p);

    assert!(rt.report().borrow().is_empty());
}

#[test]
fn exhaustion_is_a_reported_outcome_not_a_panic() {
    let solver_ctx = SolverCtx::new();
    let mut rt = runtime(&solver_ctx);

    // The default address space limit is 2^32 bytes.
    let mut got_failure = false;
    for _ in 0..3 {
        if rt.alloc(u32::MAX, 8).is_none() {
            got_failure = true;
            break;
        }
    }
    assert!(got_failure);

    let report = rt.report();
    let report = report.borrow();
    assert!(matches!(
        report.iter().next().unwrap(),
        Outcome::Memory(Violation::OutOfMemory { .. })
    ));
    // The path survives; a later small allocation on a fresh runtime works.
    drop(report);
    let mut fresh = runtime(&solver_ctx);
    assert!(fresh.alloc(8, 8).is_some());
}
