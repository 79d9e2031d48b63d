pub mod z3_conv;
