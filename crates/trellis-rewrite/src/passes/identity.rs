//! The pass that changes nothing.
//!
//! Trivially satisfies every obligation; useful as a baseline when checking
//! the engine itself.

use trellis_ir::Expr;

use crate::pass::{BottomUp, RewriteResult};

#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl BottomUp for Identity {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn apply(&self, expr: Expr) -> RewriteResult {
        RewriteResult::Unchanged(expr)
    }

    fn post(&self, _expr: &Expr) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite_bottom_up;
    use trellis_ir::{BinaryOp, LazyOp};

    #[test]
    fn returns_input_unchanged() {
        let e = Expr::lazy(
            LazyOp::Imp,
            Expr::binary(BinaryOp::Neq, Expr::var("x"), Expr::int(1)),
            Expr::bool(false),
        );
        assert_eq!(rewrite_bottom_up(&Identity, e.clone()), e);
    }
}
