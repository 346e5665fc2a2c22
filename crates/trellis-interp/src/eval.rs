//! Reference interpreter.
//!
//! Evaluation threads an environment through every node: each call returns
//! the value together with the environment that later siblings observe.
//! Recursion through closures is bounded by an explicit [`Fuel`] budget, so
//! [`evaluate`] is total even for programs that would loop forever.

use tracing::trace;
use trellis_ir::{Arity, EagerOp, Expr, LazyOp, Operator};

use crate::env::Env;
use crate::error::{EvalError, EvalResult};
use crate::operators::{apply_binary, apply_ternary, apply_unary, build_display};
use crate::value::{Closure, Value};

/// Closure-call budget. Each invocation consumes one unit.
pub type Fuel = usize;

/// Evaluate `expr` in `env`, returning its value and the environment
/// visible to whatever is evaluated next.
pub fn evaluate(expr: &Expr, fuel: Fuel, env: &Env) -> EvalResult<(Value, Env)> {
    match expr {
        Expr::Var(name) => Ok((env.lookup(name)?.clone(), env.clone())),
        Expr::Literal(lit) => Ok((Value::from_literal(lit)?, env.clone())),
        Expr::Abs { params, body } => {
            let closure = Closure::new(env.clone(), params.clone(), (**body).clone());
            Ok((Value::Closure(closure), env.clone()))
        }
        Expr::If {
            cond,
            then_branch,
            else_branch,
        } => {
            let (cond, env) = evaluate(cond, fuel, env)?;
            let branch = if cond.as_bool("if")? {
                then_branch
            } else {
                else_branch
            };
            evaluate(branch, fuel, &env)
        }
        Expr::Apply { op, args } => {
            if !op.arity().accepts(args.len()) {
                let expected = match op.arity() {
                    Arity::Exactly(n) | Arity::AtLeast(n) => n,
                };
                return Err(EvalError::arity_mismatch(expected, args.len()));
            }
            match op {
                Operator::Lazy(op) => lazy(*op, &args[0], &args[1], fuel, env),
                Operator::Eager(op) => {
                    let (values, env) = evaluate_seq(args, fuel, env)?;
                    let value = eager(*op, values, fuel)?;
                    Ok((value, env))
                }
            }
        }
        Expr::Block(items) => {
            let (mut values, env) = evaluate_seq(items, fuel, env)?;
            Ok((values.pop().unwrap_or(Value::Unit), env))
        }
        Expr::Bind { vars, vals, body } => {
            if vars.len() != vals.len() {
                return Err(EvalError::arity_mismatch(vars.len(), vals.len()));
            }
            let (values, env) = evaluate_seq(vals, fuel, env)?;
            let scope = env.child(vars.iter().cloned().zip(values));
            let (value, _) = evaluate(body, fuel, &scope)?;
            Ok((value, env))
        }
    }
}

/// Evaluate `exprs` left to right, threading the environment. The first
/// failure aborts the rest.
pub fn evaluate_seq(exprs: &[Expr], fuel: Fuel, env: &Env) -> EvalResult<(Vec<Value>, Env)> {
    let mut env = env.clone();
    let mut values = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let (value, next) = evaluate(expr, fuel, &env)?;
        values.push(value);
        env = next;
    }
    Ok((values, env))
}

fn lazy(op: LazyOp, lhs: &Expr, rhs: &Expr, fuel: Fuel, env: &Env) -> EvalResult<(Value, Env)> {
    let name = op.mnemonic();
    let (first, env) = evaluate(lhs, fuel, env)?;
    let decided = match (op, first.as_bool(name)?) {
        (LazyOp::And, false) => Some(false),
        (LazyOp::Or, true) | (LazyOp::Imp, false) => Some(true),
        _ => None,
    };
    if let Some(result) = decided {
        return Ok((Value::Bool(result), env));
    }
    let (second, env) = evaluate(rhs, fuel, &env)?;
    let result = second.as_bool(name)?;
    Ok((Value::Bool(result), env))
}

fn eager(op: EagerOp, mut values: Vec<Value>, fuel: Fuel) -> EvalResult<Value> {
    match op {
        EagerOp::Unary(op) => apply_unary(op, &values[0]),
        EagerOp::Binary(op) => apply_binary(op, &values[0], &values[1]),
        EagerOp::Ternary(op) => apply_ternary(op, &values[0], &values[1], &values[2]),
        EagerOp::Display(kind) => build_display(kind, values),
        EagerOp::FunctionCall => {
            let args = values.split_off(1);
            call(&values[0], args, fuel)
        }
    }
}

/// Invoke `callee` on already evaluated arguments.
///
/// The body runs in the captured environment extended with the parameters,
/// with one unit of fuel less than the caller had.
pub fn call(callee: &Value, args: Vec<Value>, fuel: Fuel) -> EvalResult<Value> {
    if fuel == 0 {
        return Err(EvalError::out_of_fuel());
    }
    let Value::Closure(closure) = callee else {
        return Err(EvalError::type_mismatch("call", "closure", callee));
    };
    if closure.arity() != args.len() {
        return Err(EvalError::arity_mismatch(closure.arity(), args.len()));
    }
    trace!(params = ?closure.params, fuel, "calling closure");
    let scope = closure.env.child(closure.params.iter().cloned().zip(args));
    let (value, _) = evaluate(&closure.body, fuel - 1, &scope)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalErrorKind;
    use trellis_ir::{BinaryOp, CollectionKind, UnaryOp};

    fn eval(expr: &Expr, fuel: Fuel) -> EvalResult<Value> {
        evaluate(expr, fuel, &Env::new()).map(|(value, _)| value)
    }

    #[test]
    fn identity_call_consumes_fuel() {
        let expr = Expr::call(Expr::abs(["x"], Expr::var("x")), vec![Expr::int(5)]);
        assert_eq!(eval(&expr, 1).unwrap(), Value::int(5));
        assert_eq!(eval(&expr, 10).unwrap(), Value::int(5));
        assert_eq!(eval(&expr, 0).unwrap_err().kind(), &EvalErrorKind::OutOfFuel);
    }

    #[test]
    fn empty_block_is_unit() {
        let env: Env = [("x", Value::int(1))].into_iter().collect();
        let (value, out) = evaluate(&Expr::block(vec![Expr::unit()]), 0, &env).unwrap();
        assert_eq!(value, Value::Unit);
        assert_eq!(out, env);
        assert_eq!(eval(&Expr::block(vec![]), 0).unwrap(), Value::Unit);
    }

    #[test]
    fn lazy_ops_short_circuit() {
        // The right operand would fail if evaluated.
        let boom = Expr::var("unbound");
        for (op, first, expected) in [
            (LazyOp::And, false, false),
            (LazyOp::Or, true, true),
            (LazyOp::Imp, false, true),
        ] {
            let expr = Expr::lazy(op, Expr::bool(first), boom.clone());
            assert_eq!(eval(&expr, 0).unwrap(), Value::Bool(expected), "{op:?}");
        }
        let expr = Expr::lazy(LazyOp::And, Expr::bool(true), boom);
        assert!(eval(&expr, 0).is_err());
    }

    #[test]
    fn lazy_requires_bool_operands() {
        let expr = Expr::lazy(LazyOp::Or, Expr::bool(false), Expr::int(1));
        assert!(matches!(
            eval(&expr, 0).unwrap_err().kind(),
            EvalErrorKind::TypeMismatch { op: "or", .. }
        ));
    }

    #[test]
    fn if_evaluates_one_branch() {
        let expr = Expr::if_then_else(Expr::bool(true), Expr::int(1), Expr::var("unbound"));
        assert_eq!(eval(&expr, 0).unwrap(), Value::int(1));
        let expr = Expr::if_then_else(Expr::int(0), Expr::int(1), Expr::int(2));
        assert!(eval(&expr, 0).is_err());
    }

    #[test]
    fn bind_is_scoped_to_its_body() {
        let expr = Expr::bind(
            ["x", "y"],
            vec![Expr::int(2), Expr::int(3)],
            Expr::binary(BinaryOp::Mul, Expr::var("x"), Expr::var("y")),
        );
        let (value, env) = evaluate(&expr, 0, &Env::new()).unwrap();
        assert_eq!(value, Value::int(6));
        assert!(env.is_empty());
    }

    #[test]
    fn closures_capture_their_definition_env() {
        // let k = 10 in (let f = fn(a) a + k in (let k = 0 in f(1)))
        let add_k = Expr::abs(
            ["a"],
            Expr::binary(BinaryOp::Add, Expr::var("a"), Expr::var("k")),
        );
        let expr = Expr::bind(
            ["k"],
            vec![Expr::int(10)],
            Expr::bind(
                ["f"],
                vec![add_k],
                Expr::bind(
                    ["k"],
                    vec![Expr::int(0)],
                    Expr::call(Expr::var("f"), vec![Expr::int(1)]),
                ),
            ),
        );
        assert_eq!(eval(&expr, 1).unwrap(), Value::int(11));
    }

    #[test]
    fn call_checks_head_and_arity() {
        let not_closure = Expr::call(Expr::int(1), vec![]);
        assert!(matches!(
            eval(&not_closure, 1).unwrap_err().kind(),
            EvalErrorKind::TypeMismatch { .. }
        ));

        let too_many = Expr::call(
            Expr::abs(["x"], Expr::var("x")),
            vec![Expr::int(1), Expr::int(2)],
        );
        assert_eq!(
            eval(&too_many, 1).unwrap_err().kind(),
            &EvalErrorKind::ArityMismatch {
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn malformed_apply_is_an_arity_error() {
        let expr = Expr::apply(
            Operator::Eager(EagerOp::Binary(BinaryOp::Add)),
            vec![Expr::int(1)],
        );
        assert!(!expr.supports_interp());
        assert_eq!(
            eval(&expr, 0).unwrap_err().kind(),
            &EvalErrorKind::ArityMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn first_failing_argument_wins() {
        let expr = Expr::display(
            CollectionKind::Seq,
            vec![
                Expr::unary(UnaryOp::SetCard, Expr::int(1)),
                Expr::var("unbound"),
            ],
        );
        assert!(matches!(
            eval(&expr, 0).unwrap_err().kind(),
            EvalErrorKind::TypeMismatch { op: "set.card", .. }
        ));
    }

    #[test]
    fn recursion_runs_out_of_fuel() {
        // f = fn(g) g(g); f(f)
        let omega = Expr::abs(["g"], Expr::call(Expr::var("g"), vec![Expr::var("g")]));
        let expr = Expr::bind(
            ["f"],
            vec![omega],
            Expr::call(Expr::var("f"), vec![Expr::var("f")]),
        );
        assert_eq!(eval(&expr, 50).unwrap_err().kind(), &EvalErrorKind::OutOfFuel);
    }
}
