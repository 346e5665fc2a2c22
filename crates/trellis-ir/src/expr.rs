//! Expression nodes.

use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use serde::{Deserialize, Serialize};

use crate::ops::{BinaryOp, CollectionKind, EagerOp, LazyOp, Operator, TernaryOp, UnaryOp};

/// Variable and parameter names.
pub type Identifier = String;

/// Immediate scalar carried by a [`Expr::Literal`] node.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Literal {
    Unit,
    Bool(bool),
    Int(BigInt),
    /// Exact rational number.
    Real(BigRational),
    Char(char),
    /// Bit-vector of an explicit width. The interpreter rejects literals
    /// whose magnitude does not fit in `width` bits.
    BitVector { width: u32, magnitude: BigUint },
    Ordinal(BigUint),
}

/// IR node.
///
/// Trees are built by upstream phases and never mutated in place: rewrites
/// produce new trees.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Expr {
    /// Variable reference
    Var(Identifier),

    /// Immediate scalar
    Literal(Literal),

    /// Lambda abstraction: evaluates to a closure capturing the current
    /// environment; the body is not evaluated.
    Abs {
        params: Vec<Identifier>,
        body: Box<Expr>,
    },

    /// Operator application
    Apply { op: Operator, args: Vec<Expr> },

    /// Sequential evaluation, threading the environment through each item
    Block(Vec<Expr>),

    /// Conditional; only the taken branch is evaluated
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },

    /// Local binding: `vals` are evaluated in order, then `body` runs with
    /// `vars` bound to them.
    Bind {
        vars: Vec<Identifier>,
        vals: Vec<Expr>,
        body: Box<Expr>,
    },
}

impl Expr {
    pub fn var(name: impl Into<Identifier>) -> Self {
        Expr::Var(name.into())
    }

    pub fn unit() -> Self {
        Expr::Literal(Literal::Unit)
    }

    pub fn bool(b: bool) -> Self {
        Expr::Literal(Literal::Bool(b))
    }

    pub fn int(n: impl Into<BigInt>) -> Self {
        Expr::Literal(Literal::Int(n.into()))
    }

    pub fn char(c: char) -> Self {
        Expr::Literal(Literal::Char(c))
    }

    /// Real literal `numer / denom`. Panics if `denom` is zero.
    pub fn real(numer: i64, denom: i64) -> Self {
        Expr::Literal(Literal::Real(BigRational::new(numer.into(), denom.into())))
    }

    pub fn bitvector(width: u32, magnitude: impl Into<BigUint>) -> Self {
        Expr::Literal(Literal::BitVector {
            width,
            magnitude: magnitude.into(),
        })
    }

    pub fn ordinal(n: impl Into<BigUint>) -> Self {
        Expr::Literal(Literal::Ordinal(n.into()))
    }

    pub fn abs<S: Into<Identifier>>(params: impl IntoIterator<Item = S>, body: Expr) -> Self {
        Expr::Abs {
            params: params.into_iter().map(Into::into).collect(),
            body: Box::new(body),
        }
    }

    pub fn apply(op: Operator, args: Vec<Expr>) -> Self {
        Expr::Apply { op, args }
    }

    pub fn lazy(op: LazyOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::apply(Operator::Lazy(op), vec![lhs, rhs])
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::apply(Operator::Eager(EagerOp::Unary(op)), vec![operand])
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::apply(Operator::Eager(EagerOp::Binary(op)), vec![lhs, rhs])
    }

    pub fn ternary(op: TernaryOp, first: Expr, second: Expr, third: Expr) -> Self {
        Expr::apply(
            Operator::Eager(EagerOp::Ternary(op)),
            vec![first, second, third],
        )
    }

    pub fn display(kind: CollectionKind, elems: Vec<Expr>) -> Self {
        Expr::apply(Operator::Eager(EagerOp::Display(kind)), elems)
    }

    /// Map display from `(key, value)` pairs. Each pair is encoded as a
    /// two-element sequence display, which is what the interpreter expects.
    pub fn map_display(pairs: Vec<(Expr, Expr)>) -> Self {
        let elems = pairs
            .into_iter()
            .map(|(k, v)| Expr::display(CollectionKind::Seq, vec![k, v]))
            .collect();
        Expr::display(CollectionKind::Map, elems)
    }

    /// Function call: `callee` applied to `args`.
    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        let mut all = Vec::with_capacity(args.len() + 1);
        all.push(callee);
        all.extend(args);
        Expr::apply(Operator::Eager(EagerOp::FunctionCall), all)
    }

    pub fn block(items: Vec<Expr>) -> Self {
        Expr::Block(items)
    }

    pub fn if_then_else(cond: Expr, then_branch: Expr, else_branch: Expr) -> Self {
        Expr::If {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    pub fn bind<S: Into<Identifier>>(
        vars: impl IntoIterator<Item = S>,
        vals: Vec<Expr>,
        body: Expr,
    ) -> Self {
        Expr::Bind {
            vars: vars.into_iter().map(Into::into).collect(),
            vals,
            body: Box::new(body),
        }
    }

    /// The binary operator applied at this node, if any.
    pub fn as_binary(&self) -> Option<(BinaryOp, &[Expr])> {
        match self {
            Expr::Apply {
                op: Operator::Eager(EagerOp::Binary(op)),
                args,
            } => Some((*op, args)),
            _ => None,
        }
    }

    /// Structural well-formedness required by the interpreter: operator
    /// argument counts match their arity and `Bind` pairs every variable
    /// with a value. Checked over the whole tree.
    pub fn supports_interp(&self) -> bool {
        self.all(|node| match node {
            Expr::Apply { op, args } => op.arity().accepts(args.len()),
            Expr::Bind { vars, vals, .. } => vars.len() == vals.len(),
            _ => true,
        })
    }
}

impl From<Literal> for Expr {
    fn from(lit: Literal) -> Self {
        Expr::Literal(lit)
    }
}
