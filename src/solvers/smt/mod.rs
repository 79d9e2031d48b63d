pub mod smt_conv;
