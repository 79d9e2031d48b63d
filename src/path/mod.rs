pub mod condition;
pub mod context;
