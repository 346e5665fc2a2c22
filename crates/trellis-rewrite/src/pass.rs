//! Bottom-up pass trait.
//!
//! A pass is a local node rewrite together with the contract that makes
//! its bottom-up application sound.

use trellis_equiv::Oracle;
use trellis_ir::Expr;

/// Result of applying a pass to one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RewriteResult {
    /// The pass did not match; the node is handed back as is.
    Unchanged(Expr),
    /// The node is replaced by a new one.
    Replace(Expr),
}

impl RewriteResult {
    pub fn is_changed(&self) -> bool {
        matches!(self, RewriteResult::Replace(_))
    }

    pub fn into_expr(self) -> Expr {
        match self {
            RewriteResult::Unchanged(expr) | RewriteResult::Replace(expr) => expr,
        }
    }
}

/// A rewrite applied at every node, children first.
///
/// Implementations must uphold three obligations, checked by
/// [`crate::check_contract`]:
///
/// 1. **Closure under children**: if `applicable(e)`, and `e'` has the
///    shape of `e` with children that all satisfy
///    [`deep_post`](crate::deep_post), then `applicable(e')`. The engine
///    relies on this to apply the pass to nodes rebuilt over rewritten
///    children.
/// 2. **Postcondition propagation**: if every child of `e` satisfies
///    `deep_post`, the result of `apply(e)` does too.
/// 3. **Relation lifting**: if `e` and `e'` have the same shape and every
///    child of `e` is `rel`-related to the matching child of `e'`, then
///    `rel(e, apply(e'))`. This makes the whole bottom-up rewrite related
///    to its input.
///
/// # Example
///
/// ```
/// use trellis_ir::Expr;
/// use trellis_rewrite::{BottomUp, RewriteResult, rewrite_bottom_up};
///
/// /// Unwraps single-item blocks.
/// struct UnwrapBlock;
///
/// impl BottomUp for UnwrapBlock {
///     fn apply(&self, expr: Expr) -> RewriteResult {
///         match expr {
///             Expr::Block(mut items) if items.len() == 1 => RewriteResult::Replace(items.remove(0)),
///             other => RewriteResult::Unchanged(other),
///         }
///     }
///
///     fn post(&self, expr: &Expr) -> bool {
///         !matches!(expr, Expr::Block(items) if items.len() == 1)
///     }
/// }
///
/// let e = Expr::block(vec![Expr::block(vec![Expr::int(1)])]);
/// assert_eq!(rewrite_bottom_up(&UnwrapBlock, e), Expr::int(1));
/// ```
pub trait BottomUp {
    /// Human-readable name for logs and contract reports.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Precondition on input nodes. Defaults to every node.
    fn applicable(&self, expr: &Expr) -> bool {
        let _ = expr;
        true
    }

    /// Rewrite one node whose children have already been rewritten.
    fn apply(&self, expr: Expr) -> RewriteResult;

    /// Local postcondition on output nodes.
    fn post(&self, expr: &Expr) -> bool;

    /// Relation between a node and its rewritten form. Defaults to
    /// behavioral equivalence.
    fn rel(&self, oracle: &Oracle, before: &Expr, after: &Expr) -> bool {
        oracle.eq_interp(before, after)
    }
}
