//! Random IR generators for property-based testing.
//!
//! Provides `proptest` strategies that generate interpretable trees over
//! the free variables in [`VARS`]. Two flavours are offered:
//! - typed generators (`arb_int_expr`, `arb_bool_expr`) whose output mostly
//!   evaluates successfully when the free variables hold integers,
//! - `arb_untyped_expr`, which mixes arbitrary operators and operands and
//!   mostly exercises failure paths.

use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use proptest::prelude::*;

use crate::{BinaryOp, CollectionKind, Expr, LazyOp, Literal, TernaryOp, UnaryOp};

/// Free variables used by generated expressions.
pub const VARS: [&str; 3] = ["x", "y", "z"];

/// Negated comparison and membership operators.
pub const NEGATED_BINOPS: [BinaryOp; 9] = [
    BinaryOp::Neq,
    BinaryOp::NotInSeq,
    BinaryOp::NotInSet,
    BinaryOp::NotInMultiset,
    BinaryOp::NotInMap,
    BinaryOp::SetNeq,
    BinaryOp::MultisetNeq,
    BinaryOp::SeqNeq,
    BinaryOp::MapNeq,
];

// ============================================================================
// Leaf strategies
// ============================================================================

pub fn arb_var() -> impl Strategy<Value = Expr> {
    proptest::sample::select(VARS.to_vec()).prop_map(Expr::var)
}

/// Strategy for all literal kinds, kept small so that collisions happen.
pub fn arb_literal() -> impl Strategy<Value = Literal> {
    prop_oneof![
        Just(Literal::Unit),
        any::<bool>().prop_map(Literal::Bool),
        (-3i64..=3).prop_map(|n| Literal::Int(BigInt::from(n))),
        (-3i64..=3, 1i64..=3)
            .prop_map(|(n, d)| Literal::Real(BigRational::new(n.into(), d.into()))),
        proptest::sample::select(vec!['a', 'b', 'z']).prop_map(Literal::Char),
        (0u32..16).prop_map(|m| Literal::BitVector {
            width: 4,
            magnitude: BigUint::from(m),
        }),
        (0u32..3).prop_map(|n| Literal::Ordinal(BigUint::from(n))),
    ]
}

fn arb_small_int() -> impl Strategy<Value = Expr> {
    (-3i64..=3).prop_map(Expr::int)
}

// ============================================================================
// Typed strategies
// ============================================================================

fn arb_int_leaf() -> impl Strategy<Value = Expr> {
    prop_oneof![3 => arb_small_int(), 2 => arb_var()]
}

/// Integer-valued expressions: arithmetic, lengths, calls and bindings.
pub fn arb_int_expr() -> impl Strategy<Value = Expr> {
    arb_int_leaf().prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            (
                proptest::sample::select(vec![BinaryOp::Add, BinaryOp::Sub, BinaryOp::Mul]),
                inner.clone(),
                inner.clone()
            )
                .prop_map(|(op, lhs, rhs)| Expr::binary(op, lhs, rhs)),
            prop::collection::vec(inner.clone(), 0..3).prop_map(|elems| {
                Expr::unary(UnaryOp::SeqLength, Expr::display(CollectionKind::Seq, elems))
            }),
            (inner.clone(), inner.clone()).prop_map(|(arg, extra)| {
                let body = Expr::binary(BinaryOp::Add, Expr::var("a"), extra);
                Expr::call(Expr::abs(["a"], body), vec![arg])
            }),
            (inner.clone(), inner.clone()).prop_map(|(val, extra)| {
                Expr::bind(
                    ["w"],
                    vec![val],
                    Expr::binary(BinaryOp::Mul, Expr::var("w"), extra),
                )
            }),
        ]
    })
}

/// Collection display of the given kind with integer elements.
pub fn arb_collection(kind: CollectionKind) -> impl Strategy<Value = Expr> {
    let elems = prop::collection::vec(arb_int_leaf(), 0..4);
    match kind {
        CollectionKind::Map => prop::collection::vec((arb_int_leaf(), arb_int_leaf()), 0..4)
            .prop_map(Expr::map_display)
            .boxed(),
        _ => elems
            .prop_map(move |elems| Expr::display(kind, elems))
            .boxed(),
    }
}

/// Well-typed comparison or membership test, negated or not.
pub fn arb_comparison() -> impl Strategy<Value = Expr> {
    use BinaryOp::*;
    prop_oneof![
        (
            proptest::sample::select(vec![Eq, Neq, Lt, Le]),
            arb_int_expr(),
            arb_int_expr()
        )
            .prop_map(|(op, l, r)| Expr::binary(op, l, r)),
        (
            proptest::sample::select(vec![InSet, NotInSet]),
            arb_int_leaf(),
            arb_collection(CollectionKind::Set)
        )
            .prop_map(|(op, l, r)| Expr::binary(op, l, r)),
        (
            proptest::sample::select(vec![InSeq, NotInSeq]),
            arb_int_leaf(),
            arb_collection(CollectionKind::Seq)
        )
            .prop_map(|(op, l, r)| Expr::binary(op, l, r)),
        (
            proptest::sample::select(vec![InMultiset, NotInMultiset]),
            arb_int_leaf(),
            arb_collection(CollectionKind::Multiset)
        )
            .prop_map(|(op, l, r)| Expr::binary(op, l, r)),
        (
            proptest::sample::select(vec![InMap, NotInMap]),
            arb_int_leaf(),
            arb_collection(CollectionKind::Map)
        )
            .prop_map(|(op, l, r)| Expr::binary(op, l, r)),
        (
            proptest::sample::select(vec![SetEq, SetNeq]),
            arb_collection(CollectionKind::Set),
            arb_collection(CollectionKind::Set)
        )
            .prop_map(|(op, l, r)| Expr::binary(op, l, r)),
        (
            proptest::sample::select(vec![SeqEq, SeqNeq]),
            arb_collection(CollectionKind::Seq),
            arb_collection(CollectionKind::Seq)
        )
            .prop_map(|(op, l, r)| Expr::binary(op, l, r)),
        (
            proptest::sample::select(vec![MultisetEq, MultisetNeq]),
            arb_collection(CollectionKind::Multiset),
            arb_collection(CollectionKind::Multiset)
        )
            .prop_map(|(op, l, r)| Expr::binary(op, l, r)),
        (
            proptest::sample::select(vec![MapEq, MapNeq]),
            arb_collection(CollectionKind::Map),
            arb_collection(CollectionKind::Map)
        )
            .prop_map(|(op, l, r)| Expr::binary(op, l, r)),
    ]
}

/// Boolean-valued expressions built over [`arb_comparison`].
pub fn arb_bool_expr() -> impl Strategy<Value = Expr> {
    arb_comparison().prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            inner
                .clone()
                .prop_map(|e| Expr::unary(UnaryOp::BoolNot, e)),
            (
                proptest::sample::select(LazyOp::ALL.to_vec()),
                inner.clone(),
                inner.clone()
            )
                .prop_map(|(op, l, r)| Expr::lazy(op, l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expr::binary(BinaryOp::Iff, l, r)),
            (inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(c, t, e)| Expr::if_then_else(c, t, e)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr::block(vec![a, b])),
            (arb_int_expr(), inner.clone()).prop_map(|(arg, body)| {
                // The parameter shadows `x` inside the closure body.
                Expr::call(Expr::abs(["x"], body), vec![arg])
            }),
            (inner.clone(), inner.clone()).prop_map(|(val, body)| {
                Expr::bind(["b"], vec![val], Expr::lazy(LazyOp::Or, Expr::var("b"), body))
            }),
        ]
    })
}

/// Expressions that return closures or call functions: unapplied
/// abstractions, functions taking function arguments, and free variables
/// used as functions.
pub fn arb_higher_order_expr() -> impl Strategy<Value = Expr> {
    let apply_f = |arg: Expr| Expr::abs(["f"], Expr::call(Expr::var("f"), vec![arg]));
    prop_oneof![
        arb_bool_expr().prop_map(|body| Expr::abs(["x"], body)),
        arb_bool_expr().prop_map(apply_f),
        (arb_var(), arb_bool_expr()).prop_map(|(f, arg)| Expr::call(f, vec![arg])),
        (arb_bool_expr(), arb_bool_expr())
            .prop_map(move |(body, arg)| Expr::call(apply_f(arg), vec![Expr::abs(["y"], body)])),
    ]
}

// ============================================================================
// Untyped strategy
// ============================================================================

fn arb_untyped_leaf() -> impl Strategy<Value = Expr> {
    prop_oneof![3 => arb_literal().prop_map(Expr::Literal), 1 => arb_var()]
}

/// Arbitrary interpretable expressions with no attention to operand kinds.
pub fn arb_untyped_expr() -> impl Strategy<Value = Expr> {
    arb_untyped_leaf().prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            (proptest::sample::select(UnaryOp::ALL.to_vec()), inner.clone())
                .prop_map(|(op, e)| Expr::unary(op, e)),
            (
                proptest::sample::select(BinaryOp::ALL.to_vec()),
                inner.clone(),
                inner.clone()
            )
                .prop_map(|(op, l, r)| Expr::binary(op, l, r)),
            (
                proptest::sample::select(TernaryOp::ALL.to_vec()),
                inner.clone(),
                inner.clone(),
                inner.clone()
            )
                .prop_map(|(op, a, b, c)| Expr::ternary(op, a, b, c)),
            (
                proptest::sample::select(LazyOp::ALL.to_vec()),
                inner.clone(),
                inner.clone()
            )
                .prop_map(|(op, l, r)| Expr::lazy(op, l, r)),
            (
                proptest::sample::select(vec![
                    CollectionKind::Seq,
                    CollectionKind::Set,
                    CollectionKind::Multiset,
                    CollectionKind::Map,
                ]),
                prop::collection::vec(inner.clone(), 0..3)
            )
                .prop_map(|(kind, elems)| Expr::display(kind, elems)),
            (inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(c, t, e)| Expr::if_then_else(c, t, e)),
            prop::collection::vec(inner.clone(), 0..3).prop_map(Expr::block),
            (inner.clone(), inner.clone()).prop_map(|(body, arg)| {
                Expr::call(Expr::abs(["y"], body), vec![arg])
            }),
            (inner.clone(), inner.clone())
                .prop_map(|(val, body)| Expr::bind(["z"], vec![val], body)),
        ]
    })
}

/// Strategy mixing typed and untyped expressions.
pub fn arb_expr() -> impl Strategy<Value = Expr> {
    prop_oneof![
        3 => arb_bool_expr(),
        1 => arb_int_expr(),
        2 => arb_untyped_expr(),
    ]
}
