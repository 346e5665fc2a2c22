//! Structural traversal utilities.
//!
//! Every node exposes its immediate children in a fixed order and a
//! [`Shape`] tag. Generic passes reason about structure through these two
//! alone, without knowing node payloads.
//!
//! # Example
//!
//! ```
//! use std::ops::ControlFlow;
//! use trellis_ir::{BinaryOp, Expr, WalkAction};
//!
//! let e = Expr::if_then_else(
//!     Expr::binary(BinaryOp::Neq, Expr::var("x"), Expr::int(0)),
//!     Expr::int(1),
//!     Expr::int(2),
//! );
//!
//! // Find the first binary operator in pre-order.
//! let found = e.walk(&mut |node: &Expr| match node.as_binary() {
//!     Some((op, _)) => ControlFlow::Break(op),
//!     None => ControlFlow::Continue(WalkAction::Advance),
//! });
//! assert_eq!(found, ControlFlow::Break(BinaryOp::Neq));
//! ```

use std::collections::BTreeSet;
use std::ops::ControlFlow;

use crate::{Expr, Identifier};

/// Node kind, ignoring payloads and children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Var,
    Literal,
    Abs,
    Apply,
    Block,
    If,
    Bind,
}

/// Controls whether to descend into children during a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAction {
    /// Continue walking and descend into children.
    Advance,
    /// Skip the children of the current node.
    Skip,
}

impl Expr {
    pub fn shape(&self) -> Shape {
        match self {
            Expr::Var(_) => Shape::Var,
            Expr::Literal(_) => Shape::Literal,
            Expr::Abs { .. } => Shape::Abs,
            Expr::Apply { .. } => Shape::Apply,
            Expr::Block(_) => Shape::Block,
            Expr::If { .. } => Shape::If,
            Expr::Bind { .. } => Shape::Bind,
        }
    }

    /// Whether two nodes carry the same shape tag.
    pub fn matches(&self, other: &Expr) -> bool {
        self.shape() == other.shape()
    }

    /// Immediate children in evaluation order.
    ///
    /// `Bind` lists its values first and its body last.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Var(_) | Expr::Literal(_) => Vec::new(),
            Expr::Abs { body, .. } => vec![body.as_ref()],
            Expr::Apply { args, .. } => args.iter().collect(),
            Expr::Block(items) => items.iter().collect(),
            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => vec![cond.as_ref(), then_branch.as_ref(), else_branch.as_ref()],
            Expr::Bind { vals, body, .. } => {
                vals.iter().chain(std::iter::once(body.as_ref())).collect()
            }
        }
    }

    /// Rebuild this node with every child replaced by `f(child)`.
    ///
    /// The result matches `self`: same shape and payload, same child count.
    pub fn map_children(self, mut f: impl FnMut(Expr) -> Expr) -> Expr {
        match self {
            Expr::Var(_) | Expr::Literal(_) => self,
            Expr::Abs { params, body } => Expr::Abs {
                params,
                body: Box::new(f(*body)),
            },
            Expr::Apply { op, args } => Expr::Apply {
                op,
                args: args.into_iter().map(f).collect(),
            },
            Expr::Block(items) => Expr::Block(items.into_iter().map(f).collect()),
            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => Expr::If {
                cond: Box::new(f(*cond)),
                then_branch: Box::new(f(*then_branch)),
                else_branch: Box::new(f(*else_branch)),
            },
            Expr::Bind { vars, vals, body } => {
                let vals = vals.into_iter().map(&mut f).collect();
                Expr::Bind {
                    vars,
                    vals,
                    body: Box::new(f(*body)),
                }
            }
        }
    }

    /// Rebuild this node with the given children, keeping its payload.
    ///
    /// # Panics
    ///
    /// Panics if `children` does not have exactly as many entries as
    /// [`Expr::children`] returns for `self`.
    pub fn with_children(&self, children: Vec<Expr>) -> Expr {
        let expected = self.children().len();
        assert_eq!(
            children.len(),
            expected,
            "with_children: {:?} node expects {} children",
            self.shape(),
            expected
        );
        let mut replacements = children.into_iter();
        self.clone()
            .map_children(|_| replacements.next().expect("child count checked above"))
    }

    /// Walk the tree in pre-order, applying `f` to each node.
    ///
    /// Returns `ControlFlow::Break(b)` as soon as the callback does. The
    /// callback can return `Continue(Skip)` to skip a node's children.
    pub fn walk<B>(
        &self,
        f: &mut impl FnMut(&Expr) -> ControlFlow<B, WalkAction>,
    ) -> ControlFlow<B, ()> {
        walk_internal(self, f)
    }

    /// Whether `pred` holds at every node of the tree.
    pub fn all(&self, mut pred: impl FnMut(&Expr) -> bool) -> bool {
        self.walk(&mut |node: &Expr| {
            if pred(node) {
                ControlFlow::Continue(WalkAction::Advance)
            } else {
                ControlFlow::Break(())
            }
        })
        .is_continue()
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        1 + self.children().into_iter().map(Expr::size).sum::<usize>()
    }

    /// Height of the tree; 1 for leaves.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(Expr::depth)
            .max()
            .unwrap_or(0)
    }

    /// Variables referenced but not bound inside the tree.
    ///
    /// `Abs` binds its parameters in its body. `Bind` binds its variables in
    /// its body only; its values see the enclosing scope.
    pub fn free_vars(&self) -> BTreeSet<Identifier> {
        let mut free = BTreeSet::new();
        collect_free(self, &mut Vec::new(), &mut free);
        free
    }
}

fn collect_free<'a>(expr: &'a Expr, bound: &mut Vec<&'a str>, free: &mut BTreeSet<Identifier>) {
    match expr {
        Expr::Var(name) => {
            if !bound.contains(&name.as_str()) {
                free.insert(name.clone());
            }
        }
        Expr::Abs { params, body } => {
            let mark = bound.len();
            bound.extend(params.iter().map(String::as_str));
            collect_free(body, bound, free);
            bound.truncate(mark);
        }
        Expr::Bind { vars, vals, body } => {
            for val in vals {
                collect_free(val, bound, free);
            }
            let mark = bound.len();
            bound.extend(vars.iter().map(String::as_str));
            collect_free(body, bound, free);
            bound.truncate(mark);
        }
        _ => {
            for child in expr.children() {
                collect_free(child, bound, free);
            }
        }
    }
}

// Internal helper to avoid recursion limit issues with impl FnMut
fn walk_internal<B>(
    expr: &Expr,
    f: &mut dyn FnMut(&Expr) -> ControlFlow<B, WalkAction>,
) -> ControlFlow<B, ()> {
    match f(expr) {
        ControlFlow::Break(b) => return ControlFlow::Break(b),
        ControlFlow::Continue(WalkAction::Skip) => return ControlFlow::Continue(()),
        ControlFlow::Continue(WalkAction::Advance) => {}
    }
    for child in expr.children() {
        walk_internal(child, f)?;
    }
    ControlFlow::Continue(())
}
