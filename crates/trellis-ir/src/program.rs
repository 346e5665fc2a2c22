//! Whole programs.

use serde::{Deserialize, Serialize};

use crate::Expr;

/// A program: a single entry point wrapping one body expression.
///
/// Passes rewrite the body and leave the wrapper as is.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Program {
    pub body: Expr,
}

impl Program {
    pub fn new(body: Expr) -> Self {
        Self { body }
    }

    /// Replace the body with `f(body)`.
    pub fn map_body(self, f: impl FnOnce(Expr) -> Expr) -> Self {
        Self { body: f(self.body) }
    }
}
