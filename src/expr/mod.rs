pub mod ast;
pub mod constant;
pub mod context;
pub mod expr;
pub mod op;
pub mod simplify;
pub mod ty;
