//! Runtime support layer for running instrumented programs under a
//! symbolic-execution host.
//!
//! Three cooperating components:
//! - a tracked heap allocator ([`memory`]) that detects invalid frees and
//!   use-after-free at the handle level,
//! - a symbolic value source ([`symbol`]) minting fresh unconstrained
//!   variables of primitive types,
//! - a constraint gate (`assume` / `assert` on [`runtime::Runtime`]) that
//!   narrows the current path condition and checks claims against it.
//!
//! None of these outcomes ever propagate into instrumented-program control
//! flow. Everything is filed into a [`report::Report`] that the host
//! observes to drive exploration.

pub mod expr;
pub mod memory;
pub mod path;
pub mod report;
pub mod runtime;
pub mod solvers;
pub mod symbol;

pub use expr::context::{new_ctx, Context, ExprCtx};
pub use expr::expr::{Expr, ExprBuilder};
pub use expr::ty::Type;
pub use memory::allocator::Allocator;
pub use memory::block::Handle;
pub use path::context::PathCtx;
pub use report::{Counterexample, ModelValue, Outcome, Report, ReportPtr, Violation};
pub use runtime::api::{AssumeBinding, MemSummaries, Symbolic};
pub use runtime::runtime::Runtime;
pub use solvers::context::SolverCtx;
