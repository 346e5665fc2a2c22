//! Trellis IR crate.
//!
//! The tree-shaped intermediate representation consumed by the reference
//! interpreter and rewritten by the bottom-up engine. Nodes are plain sum
//! types; every transformation builds a new tree instead of mutating one.

// === IR definitions ===
pub mod expr;
pub mod ops;
pub mod program;

// === IR infrastructure ===
pub mod printer;
pub mod walk;

#[cfg(any(test, feature = "proptest"))]
pub mod prop;

pub use expr::{Expr, Identifier, Literal};
pub use ops::{
    Arity, BinaryFamily, BinaryOp, CollectionKind, EagerOp, LazyOp, Operator, TernaryOp, UnaryOp,
};
pub use program::Program;
pub use walk::{Shape, WalkAction};
