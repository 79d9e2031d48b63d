pub mod store;
pub mod symbol;
