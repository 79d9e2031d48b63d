/// Backend-owned solver state. Created once by the host and borrowed by
/// every [`super::solver::Solver`] built on top of it.
pub enum SolverCtx {
    Z3(z3::Context),
}

impl SolverCtx {
    pub fn new() -> Self {
        let cfg = z3::Config::new();
        SolverCtx::Z3(z3::Context::new(&cfg))
    }
}

impl Default for SolverCtx {
    fn default() -> Self {
        SolverCtx::new()
    }
}
