//! Executable check of the [`BottomUp`] obligations.
//!
//! The engine only debug-asserts the local parts of a pass contract. The
//! checker here tests all three obligations on concrete inputs and reports
//! the first one that fails, so tests can pin down which guarantee a pass
//! breaks.

use derive_more::{Display, Error};
use tracing::debug;
use trellis_equiv::Oracle;
use trellis_ir::Expr;

use crate::engine::deep_post;
use crate::pass::BottomUp;

#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum ContractViolation {
    #[display("{pass}: {node} is applicable but its rebuilt form {reassembled} is not")]
    NotClosedUnderChildren {
        pass: &'static str,
        node: Expr,
        reassembled: Expr,
    },

    #[display("{pass}: postcondition does not hold throughout {output}")]
    PostconditionNotPropagated { pass: &'static str, output: Expr },

    #[display("{pass}: rewriting {before} to {after} breaks the relation")]
    RelationBroken {
        pass: &'static str,
        before: Expr,
        after: Expr,
    },
}

/// Check the pass obligations at the root of `expr`.
///
/// The children of `expr` are rewritten bottom-up and a node of the same
/// shape is rebuilt over them; call it `expr'`. Inputs outside the pass
/// precondition pass vacuously. For applicable inputs:
///
/// 1. when the rewritten children satisfy the postcondition everywhere,
///    `expr'` must be applicable;
/// 2. under the same condition, `apply(expr')` must satisfy the
///    postcondition everywhere;
/// 3. when every child is related to its rewritten form, `expr` must be
///    related to `apply(expr')`.
pub fn check_contract<P: BottomUp + ?Sized>(
    pass: &P,
    oracle: &Oracle,
    expr: &Expr,
) -> Result<(), ContractViolation> {
    if !pass.applicable(expr) {
        return Ok(());
    }
    let name = pass.name();

    let children = expr.children();
    let rewritten: Vec<Expr> = children
        .iter()
        .map(|child| rewrite_unchecked(pass, (*child).clone()))
        .collect();
    let reassembled = expr.with_children(rewritten.clone());

    let children_post = rewritten.iter().all(|child| deep_post(pass, child));
    if !pass.applicable(&reassembled) {
        if children_post {
            return Err(ContractViolation::NotClosedUnderChildren {
                pass: name,
                node: expr.clone(),
                reassembled,
            });
        }
        // A child already broke its postcondition; that node is blamed when
        // it is checked itself.
        return Ok(());
    }

    let output = pass.apply(reassembled).into_expr();
    if children_post && !deep_post(pass, &output) {
        return Err(ContractViolation::PostconditionNotPropagated { pass: name, output });
    }

    let children_related = children
        .iter()
        .zip(&rewritten)
        .all(|(before, after)| pass.rel(oracle, before, after));
    if children_related && !pass.rel(oracle, expr, &output) {
        return Err(ContractViolation::RelationBroken {
            pass: name,
            before: expr.clone(),
            after: output,
        });
    }
    Ok(())
}

/// Bottom-up rewrite without the engine's debug assertions, so a broken
/// pass is reported instead of panicking.
fn rewrite_unchecked<P: BottomUp + ?Sized>(pass: &P, expr: Expr) -> Expr {
    let node = expr.map_children(|child| rewrite_unchecked(pass, child));
    if pass.applicable(&node) {
        pass.apply(node).into_expr()
    } else {
        node
    }
}

/// Run [`check_contract`] at every node of `expr`, innermost first.
pub fn check_contract_deep<P: BottomUp + ?Sized>(
    pass: &P,
    oracle: &Oracle,
    expr: &Expr,
) -> Result<(), ContractViolation> {
    for child in expr.children() {
        check_contract_deep(pass, oracle, child)?;
    }
    check_contract(pass, oracle, expr).inspect_err(|violation| {
        debug!(%violation, "contract violation");
    })
}
