pub mod context;
pub mod smt;
pub mod solver;
pub mod z3;
