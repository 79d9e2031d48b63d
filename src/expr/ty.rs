use std::fmt::Debug;

/// Primitive types that may cross the host boundary. The symbolic value
/// source mints variables of the five value types; `Bool` only appears as
/// the type of conditions handed to the constraint gate.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    I8,
    I32,
    I64,
    F32,
    F64,
}

impl Type {
    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Bool)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::I8 | Type::I32 | Type::I64)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Type::F32 | Type::F64)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    pub fn bits(&self) -> u32 {
        match self {
            Type::Bool => 1,
            Type::I8 => 8,
            Type::I32 | Type::F32 => 32,
            Type::I64 | Type::F64 => 64,
        }
    }

    /// Wire prefix used when naming minted symbols, `i32_symbol_7`.
    pub fn prefix(&self) -> &'static str {
        match self {
            Type::Bool => "bool",
            Type::I8 => "i8",
            Type::I32 => "i32",
            Type::I64 => "i64",
            Type::F32 => "f32",
            Type::F64 => "f64",
        }
    }
}

impl Debug for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix())
    }
}
