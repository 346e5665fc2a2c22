//! The oracle relates every program and value to itself.

use proptest::prelude::*;
use trellis_equiv::{Oracle, OracleConfig, probe};
use trellis_ir::prop::{arb_bool_expr, arb_expr, arb_higher_order_expr};

fn small_oracle() -> Oracle {
    Oracle::new(OracleConfig {
        depth: 2,
        max_fuel: 2,
        max_arg_tuples: 8,
    })
}

#[test]
fn probes_are_self_equivalent() {
    let oracle = Oracle::default();
    for value in probe::default_probes() {
        assert!(oracle.values_equivalent(&value, &value), "{value}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn eq_interp_is_reflexive(expr in arb_expr()) {
        prop_assert!(small_oracle().eq_interp(&expr, &expr));
    }

    #[test]
    fn eq_interp_is_reflexive_on_functions(expr in arb_higher_order_expr()) {
        prop_assert!(small_oracle().eq_interp(&expr, &expr));
    }

    /// A program and its double negation agree.
    #[test]
    fn double_negation_is_equivalent(expr in arb_bool_expr()) {
        use trellis_ir::{Expr, UnaryOp};
        let twice = Expr::unary(UnaryOp::BoolNot, Expr::unary(UnaryOp::BoolNot, expr.clone()));
        prop_assert!(small_oracle().eq_interp(&expr, &twice));
    }
}
