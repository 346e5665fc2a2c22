//! Bottom-up rewrite driver.
//!
//! [`rewrite_bottom_up`] rewrites every child of a node, reassembles a node
//! of the same shape over the rewritten children, then applies the pass to
//! it. Recursion follows the tree structure, so it always terminates.

use std::convert::Infallible;

use tracing::{debug, info_span, trace};
use trellis_ir::{Expr, Program};

use crate::pass::BottomUp;

/// Counts the nodes a pass replaced.
#[derive(Debug, Default)]
pub struct RewriteContext {
    changes: usize,
}

impl RewriteContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changes(&self) -> usize {
        self.changes
    }

    fn record_change(&mut self) {
        self.changes += 1;
    }
}

/// Rewrite `expr` with `pass`, children first.
///
/// The pass contract is checked with debug assertions: every node the pass
/// is applied to, rebuilt over rewritten children, must be applicable and
/// every produced node must satisfy `post`.
pub fn rewrite_bottom_up<P: BottomUp + ?Sized>(pass: &P, expr: Expr) -> Expr {
    rewrite_with(pass, expr, &mut RewriteContext::new())
}

/// Like [`rewrite_bottom_up`], recording replacements in `ctx`.
pub fn rewrite_with<P: BottomUp + ?Sized>(pass: &P, expr: Expr, ctx: &mut RewriteContext) -> Expr {
    let node = expr.map_children(|child| rewrite_with(pass, child, ctx));
    debug_assert!(
        pass.applicable(&node),
        "{}: applying to {node}, which is outside the pass precondition",
        pass.name()
    );
    let result = pass.apply(node);
    if result.is_changed() {
        ctx.record_change();
    }
    let out = result.into_expr();
    debug_assert!(
        pass.post(&out),
        "{}: postcondition fails on {out}",
        pass.name()
    );
    out
}

/// Whether `pass.post` holds at every node of `expr`.
pub fn deep_post<P: BottomUp + ?Sized>(pass: &P, expr: &Expr) -> bool {
    expr.all(|node| pass.post(node))
}

// =============================================================================
// Rewriter
// =============================================================================

/// Changes made by one pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassReport {
    pub name: &'static str,
    pub changes: usize,
}

/// Result of running a [`Rewriter`] over a program.
#[derive(Clone, Debug)]
pub struct RewriteOutcome {
    /// The transformed program.
    pub program: Program,
    /// One entry per pass, in run order.
    pub reports: Vec<PassReport>,
}

impl RewriteOutcome {
    pub fn total_changes(&self) -> usize {
        self.reports.iter().map(|r| r.changes).sum()
    }
}

/// Runs a sequence of bottom-up passes over a program, each exactly once.
#[derive(Default)]
pub struct Rewriter {
    passes: Vec<Box<dyn BottomUp>>,
}

impl Rewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pass to the sequence.
    pub fn add_pass<P>(mut self, pass: P) -> Self
    where
        P: BottomUp + 'static,
    {
        self.passes.push(Box::new(pass));
        self
    }

    pub fn passes(&self) -> impl Iterator<Item = &dyn BottomUp> {
        self.passes.iter().map(|p| p.as_ref())
    }

    pub fn apply(&self, program: Program) -> RewriteOutcome {
        match self.try_apply(program, |_, _| Ok::<(), Infallible>(())) {
            Ok(outcome) => outcome,
            Err(never) => match never {},
        }
    }

    /// Like [`Rewriter::apply`], calling `check` with each pass and the
    /// program body it is about to rewrite. The first error aborts the run.
    pub fn try_apply<E>(
        &self,
        program: Program,
        mut check: impl FnMut(&dyn BottomUp, &Expr) -> Result<(), E>,
    ) -> Result<RewriteOutcome, E> {
        let mut reports = Vec::with_capacity(self.passes.len());
        let mut program = program;
        for pass in &self.passes {
            let span = info_span!("pass", name = pass.name());
            let _enter = span.enter();

            check(pass.as_ref(), &program.body)?;
            let mut ctx = RewriteContext::new();
            program = program.map_body(|body| rewrite_with(pass.as_ref(), body, &mut ctx));
            debug!(changes = ctx.changes(), "pass finished");
            trace!(%program, "after pass");

            reports.push(PassReport {
                name: pass.name(),
                changes: ctx.changes(),
            });
        }
        Ok(RewriteOutcome { program, reports })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass::RewriteResult;
    use trellis_ir::{BinaryOp, Literal, Shape};

    /// Rewrites every integer literal to zero.
    struct Zero;

    impl BottomUp for Zero {
        fn name(&self) -> &'static str {
            "zero"
        }

        fn apply(&self, expr: Expr) -> RewriteResult {
            if is_nonzero_int(&expr) {
                RewriteResult::Replace(Expr::int(0))
            } else {
                RewriteResult::Unchanged(expr)
            }
        }

        fn post(&self, expr: &Expr) -> bool {
            !is_nonzero_int(expr)
        }
    }

    /// Zero with a precondition the rewritten children break.
    struct ZeroFree;

    impl BottomUp for ZeroFree {
        fn applicable(&self, expr: &Expr) -> bool {
            expr.all(|node| *node != Expr::int(0))
        }

        fn apply(&self, expr: Expr) -> RewriteResult {
            Zero.apply(expr)
        }

        fn post(&self, expr: &Expr) -> bool {
            Zero.post(expr)
        }
    }

    fn is_nonzero_int(expr: &Expr) -> bool {
        matches!(expr, Expr::Literal(Literal::Int(_))) && *expr != Expr::int(0)
    }

    fn sample() -> Expr {
        Expr::binary(
            BinaryOp::Add,
            Expr::int(1),
            Expr::block(vec![Expr::int(0), Expr::int(2)]),
        )
    }

    #[test]
    fn rewrites_every_node() {
        let out = rewrite_bottom_up(&Zero, sample());
        insta::assert_snapshot!(out, @"(add 0 (block 0 0))");
        assert!(deep_post(&Zero, &out));
        assert!(!deep_post(&Zero, &sample()));
    }

    #[test]
    fn shape_is_preserved_when_pass_only_touches_leaves() {
        let out = rewrite_bottom_up(&Zero, sample());
        assert_eq!(out.shape(), Shape::Apply);
        assert_eq!(out.size(), sample().size());
    }

    #[test]
    fn context_counts_replacements() {
        let mut ctx = RewriteContext::new();
        let _ = rewrite_with(&Zero, sample(), &mut ctx);
        assert_eq!(ctx.changes(), 2);
    }

    #[test]
    fn rewriter_reports_per_pass() {
        let outcome = Rewriter::new()
            .add_pass(Zero)
            .add_pass(Zero)
            .apply(Program::new(sample()));
        assert_eq!(
            outcome.reports,
            vec![
                PassReport {
                    name: "zero",
                    changes: 2
                },
                PassReport {
                    name: "zero",
                    changes: 0
                },
            ]
        );
        assert_eq!(outcome.total_changes(), 2);
    }

    #[test]
    fn try_apply_stops_at_first_error() {
        let rewriter = Rewriter::new().add_pass(Zero).add_pass(Zero);
        let mut seen = Vec::new();
        let result = rewriter.try_apply(Program::new(sample()), |pass, body| {
            seen.push(body.to_string());
            if seen.len() == 2 {
                Err(pass.name())
            } else {
                Ok(())
            }
        });
        assert_eq!(result.unwrap_err(), "zero");
        // The second pass saw the output of the first.
        assert_eq!(seen, ["(add 1 (block 0 2))", "(add 0 (block 0 0))"]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside the pass precondition")]
    fn precondition_is_asserted_on_rebuilt_nodes() {
        // (add 1 2) is applicable, but (add 0 0) is not.
        let e = Expr::binary(BinaryOp::Add, Expr::int(1), Expr::int(2));
        assert!(ZeroFree.applicable(&e));
        rewrite_bottom_up(&ZeroFree, e);
    }
}
