//! Eliminate negated comparison and membership operators.
//!
//! Every negated binary operator is replaced by logical negation of its
//! positive counterpart:
//!
//! ```text
//! (neq 3 3)           =>  (not (eq 3 3))
//! (set.not_in x s)    =>  (not (set.in x s))
//! ```
//!
//! Downstream phases then only handle the positive forms. Both forms fail
//! on exactly the same operands, so the rewrite preserves behavior.

use trellis_ir::{BinaryOp, EagerOp, Expr, Operator, UnaryOp};

use crate::pass::{BottomUp, RewriteResult};

/// The positive counterpart of a negated operator; every other operator
/// maps to itself.
pub fn flip(op: BinaryOp) -> BinaryOp {
    use BinaryOp::*;
    match op {
        Neq => Eq,
        NotInSeq => InSeq,
        NotInSet => InSet,
        NotInMultiset => InMultiset,
        NotInMap => InMap,
        SetNeq => SetEq,
        MultisetNeq => MultisetEq,
        SeqNeq => SeqEq,
        MapNeq => MapEq,
        other => other,
    }
}

pub fn is_negated(op: BinaryOp) -> bool {
    flip(op) != op
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EliminateNegatedBinops;

impl BottomUp for EliminateNegatedBinops {
    fn name(&self) -> &'static str {
        "eliminate-negated-binops"
    }

    fn apply(&self, expr: Expr) -> RewriteResult {
        match expr {
            Expr::Apply {
                op: Operator::Eager(EagerOp::Binary(op)),
                args,
            } if is_negated(op) => {
                let positive = Expr::apply(Operator::Eager(EagerOp::Binary(flip(op))), args);
                RewriteResult::Replace(Expr::unary(UnaryOp::BoolNot, positive))
            }
            other => RewriteResult::Unchanged(other),
        }
    }

    fn post(&self, expr: &Expr) -> bool {
        !matches!(expr.as_binary(), Some((op, _)) if is_negated(op))
    }
}
