use num_bigint::BigInt;

use super::expr::*;
use super::op::*;
use super::ty::Type;

impl Expr {
    /// Local rewriting: constant folding plus the boolean identities the
    /// path condition relies on for syntactic contradiction detection.
    pub fn simplify(&mut self) {
        if self.is_terminal() {
            return;
        }

        let args = match self.simplify_args() {
            Some(args) => args,
            None => return,
        };

        if self.is_binary() {
            self.simplify_binary(args[0].clone(), args[1].clone());
            return;
        }

        if self.is_unary() {
            self.simplify_unary(args[0].clone());
            return;
        }

        if self.is_ite() {
            self.simplify_ite(args[0].clone(), args[1].clone(), args[2].clone());
        }
    }

    fn simplify_args(&mut self) -> Option<Vec<Expr>> {
        let sub_exprs = self.sub_exprs()?;
        let mut args = Vec::new();
        for mut e in sub_exprs {
            e.simplify();
            args.push(e);
        }
        self.replace_sub_exprs(args.clone());
        Some(args)
    }

    fn simplify_binary(&mut self, lhs: Expr, rhs: Expr) {
        let op = self.extract_bin_op();

        if op.is_logical() {
            self.simplify_logical(op, lhs, rhs);
            return;
        }

        if op.is_comparison() {
            self.simplify_comparison(op, lhs, rhs);
            return;
        }

        if lhs.is_constant() && rhs.is_constant() && lhs.ty().is_integer() {
            let a = lhs.extract_constant().to_integer();
            let b = rhs.extract_constant().to_integer();
            let folded = match op {
                BinOp::Add => Some(a + b),
                BinOp::Sub => Some(a - b),
                BinOp::Mul => Some(a * b),
                // Division by zero stays symbolic; the claim it folds
                // under would be wrong either way.
                BinOp::Div if b != BigInt::ZERO => Some(a / b),
                _ => None,
            };
            if let Some(i) = folded {
                *self = self.ctx.constant_integer(i, lhs.ty());
            }
        }
    }

    fn simplify_logical(&mut self, op: BinOp, lhs: Expr, rhs: Expr) {
        let ctx = self.ctx.clone();
        match op {
            BinOp::And => {
                if lhs.is_false() || rhs.is_false() {
                    *self = ctx._false();
                } else if lhs.is_true() {
                    *self = rhs;
                } else if rhs.is_true() || lhs == rhs {
                    *self = lhs;
                } else if complements(&lhs, &rhs) {
                    *self = ctx._false();
                }
            }
            BinOp::Or => {
                if lhs.is_true() || rhs.is_true() {
                    *self = ctx._true();
                } else if lhs.is_false() {
                    *self = rhs;
                } else if rhs.is_false() || lhs == rhs {
                    *self = lhs;
                } else if complements(&lhs, &rhs) {
                    *self = ctx._true();
                }
            }
            BinOp::Implies => {
                if lhs.is_false() || rhs.is_true() {
                    *self = ctx._true();
                } else if lhs.is_true() {
                    *self = rhs;
                }
            }
            _ => unreachable!(),
        }
    }

    fn simplify_comparison(&mut self, op: BinOp, lhs: Expr, rhs: Expr) {
        let ctx = self.ctx.clone();

        // x == x holds for every non-float type; NaN forbids the float case.
        if lhs == rhs && !lhs.ty().is_float() {
            match op {
                BinOp::Eq | BinOp::Ge | BinOp::Le => {
                    *self = ctx._true();
                    return;
                }
                BinOp::Ne | BinOp::Gt | BinOp::Lt => {
                    *self = ctx._false();
                    return;
                }
                _ => {}
            }
        }

        if !lhs.is_constant() || !rhs.is_constant() {
            return;
        }

        if lhs.ty().is_bool() {
            let a = lhs.extract_constant().to_bool();
            let b = rhs.extract_constant().to_bool();
            match op {
                BinOp::Eq => *self = ctx.constant_bool(a == b),
                BinOp::Ne => *self = ctx.constant_bool(a != b),
                _ => {}
            }
            return;
        }

        let res = if lhs.ty().is_integer() {
            let a = lhs.extract_constant().to_integer();
            let b = rhs.extract_constant().to_integer();
            match op {
                BinOp::Eq => a == b,
                BinOp::Ne => a != b,
                BinOp::Ge => a >= b,
                BinOp::Gt => a > b,
                BinOp::Le => a <= b,
                BinOp::Lt => a < b,
                _ => unreachable!(),
            }
        } else {
            let a = lhs.extract_constant().to_float();
            let b = rhs.extract_constant().to_float();
            match op {
                BinOp::Eq => a == b,
                BinOp::Ne => a != b,
                BinOp::Ge => a >= b,
                BinOp::Gt => a > b,
                BinOp::Le => a <= b,
                BinOp::Lt => a < b,
                _ => unreachable!(),
            }
        };
        *self = ctx.constant_bool(res);
    }

    fn simplify_unary(&mut self, operand: Expr) {
        let ctx = self.ctx.clone();
        match self.extract_un_op() {
            UnOp::Not => {
                if operand.is_true() {
                    *self = ctx._false();
                } else if operand.is_false() {
                    *self = ctx._true();
                } else if operand.is_not() {
                    *self = operand.extract_operand();
                }
            }
            UnOp::Neg => {
                if operand.is_constant() && operand.ty().is_integer() {
                    let i = operand.extract_constant().to_integer();
                    *self = ctx.constant_integer(-i, operand.ty());
                } else if operand.is_constant() && operand.ty() == Type::F32 {
                    *self = ctx.constant_f32(-(operand.extract_constant().to_float() as f32));
                } else if operand.is_constant() && operand.ty() == Type::F64 {
                    *self = ctx.constant_f64(-operand.extract_constant().to_float());
                } else if operand.is_unary() && operand.extract_un_op().is_neg() {
                    *self = operand.extract_operand();
                }
            }
        }
    }

    fn simplify_ite(&mut self, cond: Expr, true_value: Expr, false_value: Expr) {
        if cond.is_true() {
            *self = true_value;
        } else if cond.is_false() {
            *self = false_value;
        } else if true_value == false_value {
            *self = true_value;
        }
    }
}

/// `a` and `!a` (either side negated) refute each other.
fn complements(lhs: &Expr, rhs: &Expr) -> bool {
    (lhs.is_not() && lhs.extract_operand() == *rhs)
        || (rhs.is_not() && rhs.extract_operand() == *lhs)
}

#[cfg(test)]
mod tests {
    use crate::expr::context::new_ctx;
    use crate::expr::expr::ExprBuilder;
    use crate::expr::ty::Type;
    use crate::symbol::symbol::Symbol;

    #[test]
    fn folds_integer_comparison() {
        let ctx = new_ctx();
        let mut e = ctx.gt(ctx.constant_i32(3), ctx.constant_i32(2));
        e.simplify();
        assert!(e.is_true());
    }

    #[test]
    fn folds_nested_boolean_structure() {
        let ctx = new_ctx();
        let x = ctx.mk_symbol(Symbol::new("i32_symbol_0".into(), 0), Type::I32);
        let gt = ctx.gt(x.clone(), ctx.constant_i32(0));
        let mut e = ctx.and(ctx._true(), ctx.or(gt.clone(), ctx._false()));
        e.simplify();
        assert!(e == gt);
    }

    #[test]
    fn detects_syntactic_contradiction() {
        let ctx = new_ctx();
        let x = ctx.mk_symbol(Symbol::new("i32_symbol_0".into(), 0), Type::I32);
        let gt = ctx.gt(x.clone(), ctx.constant_i32(0));
        let mut e = ctx.and(gt.clone(), ctx.not(gt));
        e.simplify();
        assert!(e.is_false());
    }

    #[test]
    fn float_reflexive_equality_is_not_folded() {
        let ctx = new_ctx();
        let x = ctx.mk_symbol(Symbol::new("f64_symbol_0".into(), 0), Type::F64);
        let mut e = ctx.eq(x.clone(), x);
        e.simplify();
        // NaN != NaN, so this must stay symbolic
        assert!(!e.is_true());
    }

    #[test]
    fn ite_collapses_on_constant_condition() {
        let ctx = new_ctx();
        let x = ctx.mk_symbol(Symbol::new("i32_symbol_0".into(), 0), Type::I32);
        let mut e = ctx.ite(ctx._false(), x.clone(), ctx.constant_i32(7));
        e.simplify();
        assert!(e == ctx.constant_i32(7));
    }

    #[test]
    fn double_negation_cancels() {
        let ctx = new_ctx();
        let x = ctx.mk_symbol(Symbol::new("i32_symbol_0".into(), 0), Type::I32);
        let gt = ctx.gt(x, ctx.constant_i32(0));
        let mut e = ctx.not(ctx.not(gt.clone()));
        e.simplify();
        assert!(e == gt);
    }
}
