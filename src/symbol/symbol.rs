use std::fmt::Debug;
use std::hash::Hash;

/// Host-assigned identity of a symbolic variable. Monotonic across all
/// minted variables regardless of type, so two variables never share an
/// identity even when their types repeat.
pub type SymbolId = usize;

/// A fresh unconstrained variable. The name embeds the minting id, so the
/// name itself is unique and doubles as the solver-level variable name.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    name: String,
    id: SymbolId,
}

impl Symbol {
    pub fn new(name: String, id: SymbolId) -> Self {
        Symbol { name, id }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> SymbolId {
        self.id
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
