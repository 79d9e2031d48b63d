use std::fmt::Debug;
use std::hash::Hash;

use super::constant::*;
use super::op::*;
use super::ty::*;
use crate::symbol::symbol::*;

pub type TerminalId = usize;
pub type NodeId = usize;

#[derive(Clone)]
pub(super) enum Terminal {
    Constant(Constant),
    Symbol(Symbol),
}

impl Terminal {
    pub fn identifier(&self) -> String {
        match self {
            Terminal::Constant(c) => c.key(),
            Terminal::Symbol(s) => s.name().to_string(),
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Terminal::Constant(..))
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Terminal::Symbol(..))
    }

    pub fn to_constant(&self) -> Constant {
        match self {
            Terminal::Constant(c) => c.clone(),
            _ => panic!("Not constant"),
        }
    }

    pub fn to_symbol(&self) -> Symbol {
        match self {
            Terminal::Symbol(s) => s.clone(),
            _ => panic!("Not symbol"),
        }
    }
}

impl Debug for Terminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Terminal::Constant(c) => write!(f, "{c:?}"),
            Terminal::Symbol(s) => write!(f, "{s:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) enum NodeKind {
    /// Terminal is the bridge connecting with terminals.
    Terminal(TerminalId),
    /// Binary expression
    Binary(BinOp, NodeId, NodeId),
    /// Unary expression
    Unary(UnOp, NodeId),
    /// If cond { true_expression } else { false_expression }
    Ite(NodeId, NodeId, NodeId),
}

impl NodeKind {
    pub fn is_terminal(&self) -> bool {
        matches!(self, NodeKind::Terminal(_))
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, NodeKind::Binary(..))
    }

    pub fn is_unary(&self) -> bool {
        matches!(self, NodeKind::Unary(..))
    }

    pub fn is_ite(&self) -> bool {
        matches!(self, NodeKind::Ite(..))
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub(super) struct Node {
    kind: NodeKind,
    ty: Type,
}

impl Node {
    pub fn new(kind: NodeKind, ty: Type) -> Self {
        Node { kind, ty }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn ty(&self) -> Type {
        self.ty
    }

    pub fn sub_nodes(&self) -> Option<Vec<NodeId>> {
        match self.kind {
            NodeKind::Terminal(_) => None,
            NodeKind::Binary(_, lhs, rhs) => Some(vec![lhs, rhs]),
            NodeKind::Unary(_, operand) => Some(vec![operand]),
            NodeKind::Ite(cond, t, f) => Some(vec![cond, t, f]),
        }
    }
}
