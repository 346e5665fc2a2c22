//! Properties of the negated-operator elimination pass on generated trees.

use proptest::prelude::*;
use trellis_equiv::{Oracle, OracleConfig};
use trellis_interp::{Env, Value, evaluate};
use trellis_ir::prop::{NEGATED_BINOPS, arb_bool_expr, arb_expr, arb_higher_order_expr};
use trellis_ir::{BinaryOp, CollectionKind, Expr};
use trellis_rewrite::passes::{EliminateNegatedBinops, Identity, flip, is_negated};
use trellis_rewrite::{BottomUp, check_contract_deep, deep_post, rewrite_bottom_up};

fn small_oracle() -> Oracle {
    Oracle::new(OracleConfig {
        depth: 2,
        max_fuel: 2,
        max_arg_tuples: 8,
    })
}

#[test]
fn neq_scenario() {
    let before = Expr::binary(BinaryOp::Neq, Expr::int(3), Expr::int(3));
    let after = rewrite_bottom_up(&EliminateNegatedBinops, before.clone());
    insta::assert_snapshot!(after, @"(not (eq 3 3))");
    for fuel in 1..4 {
        let (b, _) = evaluate(&before, fuel, &Env::new()).unwrap();
        let (a, _) = evaluate(&after, fuel, &Env::new()).unwrap();
        assert_eq!(b, Value::Bool(false));
        assert_eq!(a, Value::Bool(false));
    }
}

#[test]
fn not_in_set_scenario() {
    let set = Expr::display(CollectionKind::Set, vec![Expr::int(1), Expr::int(2)]);
    let before = Expr::binary(BinaryOp::NotInSet, Expr::int(1), set);
    let after = rewrite_bottom_up(&EliminateNegatedBinops, before.clone());
    insta::assert_snapshot!(after, @"(not (set.in 1 (set 1 2)))");
    for e in [&before, &after] {
        let (value, _) = evaluate(e, 1, &Env::new()).unwrap();
        assert_eq!(value, Value::Bool(false));
    }
}

#[test]
fn flip_agrees_with_generator_table() {
    for op in NEGATED_BINOPS {
        assert!(is_negated(op), "{op:?}");
        assert_ne!(flip(op), op);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn rewrite_preserves_behavior(expr in arb_expr()) {
        let out = rewrite_bottom_up(&EliminateNegatedBinops, expr.clone());
        let oracle = small_oracle();
        prop_assert!(
            oracle.eq_interp(&expr, &out),
            "{}",
            oracle.find_discrepancy(&expr, &out).map(|d| d.to_string()).unwrap_or_default()
        );
    }

    #[test]
    fn output_has_no_negated_operators(expr in arb_expr()) {
        let out = rewrite_bottom_up(&EliminateNegatedBinops, expr);
        prop_assert!(deep_post(&EliminateNegatedBinops, &out));
    }

    #[test]
    fn rewrite_is_idempotent(expr in arb_expr()) {
        let once = rewrite_bottom_up(&EliminateNegatedBinops, expr);
        let twice = rewrite_bottom_up(&EliminateNegatedBinops, once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn identity_rewrite_is_identity(expr in arb_expr()) {
        prop_assert_eq!(rewrite_bottom_up(&Identity, expr.clone()), expr);
    }

    #[test]
    fn engine_contract_holds(expr in arb_bool_expr()) {
        let oracle = small_oracle();
        prop_assert_eq!(check_contract_deep(&Identity, &oracle, &expr), Ok(()));
        prop_assert_eq!(check_contract_deep(&EliminateNegatedBinops, &oracle, &expr), Ok(()));
    }

    #[test]
    fn rewrite_preserves_functions(expr in arb_higher_order_expr()) {
        let out = rewrite_bottom_up(&EliminateNegatedBinops, expr.clone());
        let oracle = small_oracle();
        prop_assert!(
            oracle.eq_interp(&expr, &out),
            "{}",
            oracle.find_discrepancy(&expr, &out).map(|d| d.to_string()).unwrap_or_default()
        );
    }

    #[test]
    fn engine_contract_holds_on_functions(expr in arb_higher_order_expr()) {
        let oracle = small_oracle();
        prop_assert_eq!(check_contract_deep(&Identity, &oracle, &expr), Ok(()));
        prop_assert_eq!(check_contract_deep(&EliminateNegatedBinops, &oracle, &expr), Ok(()));
    }

    /// Rewriting changes the tree size by exactly one `not` per negation.
    #[test]
    fn size_grows_by_negation_count(expr in arb_expr()) {
        let negations = count_negated(&expr);
        let out = rewrite_bottom_up(&EliminateNegatedBinops, expr.clone());
        prop_assert_eq!(out.size(), expr.size() + negations);
        prop_assert!(EliminateNegatedBinops.post(&out));
    }
}

fn count_negated(expr: &Expr) -> usize {
    let here = match expr.as_binary() {
        Some((op, _)) if is_negated(op) => 1,
        _ => 0,
    };
    here + expr.children().into_iter().map(count_negated).sum::<usize>()
}
