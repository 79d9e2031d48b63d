use std::fmt::Debug;

use num_bigint::BigInt;

#[derive(Clone)]
pub enum Constant {
    Bool(bool),
    Integer(BigInt),
    Float32(f32),
    Float64(f64),
}

impl Constant {
    pub fn is_bool(&self) -> bool {
        matches!(self, Constant::Bool(..))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Constant::Integer(..))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Constant::Float32(..) | Constant::Float64(..))
    }

    pub fn to_bool(&self) -> bool {
        match self {
            Constant::Bool(b) => *b,
            _ => panic!("Not constant bool"),
        }
    }

    pub fn to_integer(&self) -> BigInt {
        match self {
            Constant::Integer(i) => i.clone(),
            _ => panic!("Not constant integer"),
        }
    }

    /// Widen either float variant to f64 for folding.
    pub fn to_float(&self) -> f64 {
        match self {
            Constant::Float32(v) => *v as f64,
            Constant::Float64(v) => *v,
            _ => panic!("Not constant float"),
        }
    }

    /// Interning key. Bit-exact for floats so distinct NaN payloads and
    /// `-0.0` / `0.0` stay distinct terminals.
    pub fn key(&self) -> String {
        match self {
            Constant::Bool(b) => b.to_string(),
            Constant::Integer(i) => i.to_string(),
            Constant::Float32(v) => format!("f32:{:08x}", v.to_bits()),
            Constant::Float64(v) => format!("f64:{:016x}", v.to_bits()),
        }
    }
}

impl Debug for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constant::Bool(b) => write!(f, "{b}"),
            Constant::Integer(i) => write!(f, "{i}"),
            Constant::Float32(v) => write!(f, "{v}f32"),
            Constant::Float64(v) => write!(f, "{v}f64"),
        }
    }
}
