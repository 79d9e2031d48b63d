use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use num_bigint::BigInt;

use super::ast::*;
use super::constant::*;
use super::expr::*;
use super::op::*;
use super::ty::*;
use crate::symbol::symbol::*;

/// Context manages types and expressions. All expressions are hash-consed:
/// structurally equal expressions share one node, so node ids double as
/// cheap equality witnesses.
#[derive(Default)]
pub struct Context {
    nodes: Vec<Node>,
    node_map: HashMap<Node, NodeId>,
    terminals: Vec<Rc<Terminal>>,
    terminal_map: HashMap<String, TerminalId>,
}

pub type ExprCtx = Rc<RefCell<Context>>;

pub fn new_ctx() -> ExprCtx {
    Rc::new(RefCell::new(Context::new()))
}

impl Context {
    pub fn new() -> Self {
        let mut ctx = Context::default();
        ctx.init_terminals();
        ctx
    }

    fn init_terminals(&mut self) {
        let bool_type = Type::Bool;

        self.add_terminal(Terminal::Constant(Constant::Bool(true)));
        self.add_node(Node::new(NodeKind::Terminal(0), bool_type));

        self.add_terminal(Terminal::Constant(Constant::Bool(false)));
        self.add_node(Node::new(NodeKind::Terminal(1), bool_type));
    }

    pub(super) fn add_node(&mut self, node: Node) -> NodeId {
        if let Some(i) = self.node_map.get(&node) {
            *i
        } else {
            self.nodes.push(node.clone());
            self.node_map.insert(node, self.nodes.len() - 1);
            self.nodes.len() - 1
        }
    }

    pub(super) fn add_terminal(&mut self, terminal: Terminal) -> TerminalId {
        let ident = terminal.identifier();
        if let Some(i) = self.terminal_map.get(&ident) {
            *i
        } else {
            self.terminals.push(Rc::new(terminal));
            let id = self.terminals.len() - 1;
            self.terminal_map.insert(ident, id);
            id
        }
    }

    pub fn ty(&self, i: NodeId) -> Type {
        assert!(i < self.nodes.len());
        self.nodes[i].ty()
    }

    pub fn is_terminal(&self, i: NodeId) -> bool {
        assert!(i < self.nodes.len());
        self.nodes[i].kind().is_terminal()
    }

    pub fn is_true(&self, i: NodeId) -> bool {
        i == 0
    }

    pub fn is_false(&self, i: NodeId) -> bool {
        i == 1
    }

    pub fn is_constant(&self, i: NodeId) -> bool {
        matches!(self.terminal(i), Some(t) if t.is_constant())
    }

    pub fn is_symbol(&self, i: NodeId) -> bool {
        matches!(self.terminal(i), Some(t) if t.is_symbol())
    }

    pub fn is_binary(&self, i: NodeId) -> bool {
        assert!(i < self.nodes.len());
        self.nodes[i].kind().is_binary()
    }

    pub fn is_unary(&self, i: NodeId) -> bool {
        assert!(i < self.nodes.len());
        self.nodes[i].kind().is_unary()
    }

    pub fn is_ite(&self, i: NodeId) -> bool {
        assert!(i < self.nodes.len());
        self.nodes[i].kind().is_ite()
    }

    pub(super) fn terminal(&self, i: NodeId) -> Option<Rc<Terminal>> {
        assert!(i < self.nodes.len());
        match self.nodes[i].kind() {
            NodeKind::Terminal(t) => Some(self.terminals[*t].clone()),
            _ => None,
        }
    }

    pub(super) fn bin_op(&self, i: NodeId) -> BinOp {
        match self.nodes[i].kind() {
            NodeKind::Binary(op, ..) => *op,
            _ => panic!("Not binary"),
        }
    }

    pub(super) fn un_op(&self, i: NodeId) -> UnOp {
        match self.nodes[i].kind() {
            NodeKind::Unary(op, ..) => *op,
            _ => panic!("Not unary"),
        }
    }

    pub(super) fn sub_nodes(&self, i: NodeId) -> Option<Vec<NodeId>> {
        assert!(i < self.nodes.len());
        self.nodes[i].sub_nodes()
    }
}

impl ExprBuilder for ExprCtx {
    fn constant_bool(&self, b: bool) -> Expr {
        // true and false are pre-interned at fixed ids
        Expr { ctx: self.clone(), id: if b { 0 } else { 1 } }
    }

    fn _true(&self) -> Expr {
        self.constant_bool(true)
    }

    fn _false(&self) -> Expr {
        self.constant_bool(false)
    }

    fn constant_integer(&self, i: BigInt, ty: Type) -> Expr {
        assert!(ty.is_integer());
        let mut ctx = self.borrow_mut();
        let t = ctx.add_terminal(Terminal::Constant(Constant::Integer(i)));
        let id = ctx.add_node(Node::new(NodeKind::Terminal(t), ty));
        drop(ctx);
        Expr { ctx: self.clone(), id }
    }

    fn constant_i8(&self, i: i8) -> Expr {
        self.constant_integer(BigInt::from(i), Type::I8)
    }

    fn constant_i32(&self, i: i32) -> Expr {
        self.constant_integer(BigInt::from(i), Type::I32)
    }

    fn constant_i64(&self, i: i64) -> Expr {
        self.constant_integer(BigInt::from(i), Type::I64)
    }

    fn constant_f32(&self, v: f32) -> Expr {
        let mut ctx = self.borrow_mut();
        let t = ctx.add_terminal(Terminal::Constant(Constant::Float32(v)));
        let id = ctx.add_node(Node::new(NodeKind::Terminal(t), Type::F32));
        drop(ctx);
        Expr { ctx: self.clone(), id }
    }

    fn constant_f64(&self, v: f64) -> Expr {
        let mut ctx = self.borrow_mut();
        let t = ctx.add_terminal(Terminal::Constant(Constant::Float64(v)));
        let id = ctx.add_node(Node::new(NodeKind::Terminal(t), Type::F64));
        drop(ctx);
        Expr { ctx: self.clone(), id }
    }

    fn mk_symbol(&self, symbol: Symbol, ty: Type) -> Expr {
        let mut ctx = self.borrow_mut();
        let t = ctx.add_terminal(Terminal::Symbol(symbol));
        let id = ctx.add_node(Node::new(NodeKind::Terminal(t), ty));
        drop(ctx);
        Expr { ctx: self.clone(), id }
    }

    fn add(&self, lhs: Expr, rhs: Expr) -> Expr {
        arith(self, BinOp::Add, lhs, rhs)
    }

    fn sub(&self, lhs: Expr, rhs: Expr) -> Expr {
        arith(self, BinOp::Sub, lhs, rhs)
    }

    fn mul(&self, lhs: Expr, rhs: Expr) -> Expr {
        arith(self, BinOp::Mul, lhs, rhs)
    }

    fn div(&self, lhs: Expr, rhs: Expr) -> Expr {
        arith(self, BinOp::Div, lhs, rhs)
    }

    fn eq(&self, lhs: Expr, rhs: Expr) -> Expr {
        comparison(self, BinOp::Eq, lhs, rhs)
    }

    fn ne(&self, lhs: Expr, rhs: Expr) -> Expr {
        comparison(self, BinOp::Ne, lhs, rhs)
    }

    fn ge(&self, lhs: Expr, rhs: Expr) -> Expr {
        comparison(self, BinOp::Ge, lhs, rhs)
    }

    fn gt(&self, lhs: Expr, rhs: Expr) -> Expr {
        comparison(self, BinOp::Gt, lhs, rhs)
    }

    fn le(&self, lhs: Expr, rhs: Expr) -> Expr {
        comparison(self, BinOp::Le, lhs, rhs)
    }

    fn lt(&self, lhs: Expr, rhs: Expr) -> Expr {
        comparison(self, BinOp::Lt, lhs, rhs)
    }

    fn and(&self, lhs: Expr, rhs: Expr) -> Expr {
        logical(self, BinOp::And, lhs, rhs)
    }

    fn or(&self, lhs: Expr, rhs: Expr) -> Expr {
        logical(self, BinOp::Or, lhs, rhs)
    }

    fn implies(&self, cond: Expr, conseq: Expr) -> Expr {
        logical(self, BinOp::Implies, cond, conseq)
    }

    fn not(&self, operand: Expr) -> Expr {
        assert!(operand.ty().is_bool());
        let id = self
            .borrow_mut()
            .add_node(Node::new(NodeKind::Unary(UnOp::Not, operand.id), Type::Bool));
        Expr { ctx: self.clone(), id }
    }

    fn neg(&self, operand: Expr) -> Expr {
        assert!(operand.ty().is_numeric());
        let ty = operand.ty();
        let id = self
            .borrow_mut()
            .add_node(Node::new(NodeKind::Unary(UnOp::Neg, operand.id), ty));
        Expr { ctx: self.clone(), id }
    }

    fn ite(&self, cond: Expr, true_value: Expr, false_value: Expr) -> Expr {
        assert!(cond.ty().is_bool());
        assert!(true_value.ty() == false_value.ty());
        let ty = true_value.ty();
        let id = self.borrow_mut().add_node(Node::new(
            NodeKind::Ite(cond.id, true_value.id, false_value.id),
            ty,
        ));
        Expr { ctx: self.clone(), id }
    }

}

fn arith(ctx: &ExprCtx, op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    assert!(op.is_arith());
    // Symbolic arithmetic lowers to the SMT integer sort only; rejecting
    // float operands here keeps the failure at the construction site.
    assert!(lhs.ty().is_integer() && lhs.ty() == rhs.ty());
    let ty = lhs.ty();
    let id = ctx
        .borrow_mut()
        .add_node(Node::new(NodeKind::Binary(op, lhs.id, rhs.id), ty));
    Expr { ctx: ctx.clone(), id }
}

fn comparison(ctx: &ExprCtx, op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    assert!(op.is_comparison());
    assert!(lhs.ty() == rhs.ty());
    let id = ctx
        .borrow_mut()
        .add_node(Node::new(NodeKind::Binary(op, lhs.id, rhs.id), Type::Bool));
    Expr { ctx: ctx.clone(), id }
}

fn logical(ctx: &ExprCtx, op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    assert!(op.is_logical());
    assert!(lhs.ty().is_bool() && rhs.ty().is_bool());
    let id = ctx
        .borrow_mut()
        .add_node(Node::new(NodeKind::Binary(op, lhs.id, rhs.id), Type::Bool));
    Expr { ctx: ctx.clone(), id }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_arithmetic_builds_with_the_operand_type() {
        let ctx = new_ctx();
        let e = ctx.add(ctx.constant_i32(1), ctx.constant_i32(2));
        assert!(e.ty() == Type::I32);
    }

    #[test]
    #[should_panic]
    fn float_arithmetic_is_rejected_at_construction() {
        let ctx = new_ctx();
        let f = ctx.mk_symbol(Symbol::new("f64_symbol_0".into(), 0), Type::F64);
        ctx.add(f.clone(), f);
    }
}
