//! Finite samples standing in for "every value".

use num_rational::BigRational;
use trellis_interp::{Closure, Env, Value};
use trellis_ir::{BinaryOp, Expr, Identifier};

/// Default probe values: one or two of each scalar kind, a handful of
/// small collections and a few unary functions, so that higher-order
/// closures are exercised with function arguments. The functions come
/// early so that small tuple budgets still reach them.
pub fn default_probes() -> Vec<Value> {
    vec![
        Value::Unit,
        unary_fn(Expr::var("x")),
        unary_fn(Expr::int(0)),
        unary_fn(Expr::binary(BinaryOp::Add, Expr::var("x"), Expr::int(1))),
        Value::Bool(false),
        Value::Bool(true),
        Value::int(-1),
        Value::int(0),
        Value::int(1),
        Value::int(2),
        Value::Real(BigRational::new(1.into(), 2.into())),
        Value::Char('a'),
        Value::bitvector(4, 3u32),
        Value::Ordinal(1u32.into()),
        Value::seq([]),
        Value::seq([Value::int(1), Value::int(2)]),
        Value::set([Value::int(0), Value::int(1)]),
        Value::multiset([Value::int(1), Value::int(1)]),
        Value::map([(Value::int(1), Value::Bool(true))]),
    ]
}

/// Closure of one parameter `x` over an empty environment.
fn unary_fn(body: Expr) -> Value {
    Value::Closure(Closure::new(Env::new(), vec!["x".into()], body))
}

/// Up to `limit` tuples of length `arity` drawn from `pool`, enumerated
/// in lexicographic order of pool indices.
///
/// Arity zero yields exactly one empty tuple. An empty pool yields none
/// for positive arity.
pub fn tuples(pool: &[Value], arity: usize, limit: usize) -> Vec<Vec<Value>> {
    if arity == 0 {
        return if limit > 0 { vec![Vec::new()] } else { Vec::new() };
    }
    if pool.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut indices = vec![0usize; arity];
    while out.len() < limit {
        out.push(indices.iter().map(|&i| pool[i].clone()).collect());

        // Odometer increment; the last position varies fastest.
        let mut pos = arity;
        loop {
            if pos == 0 {
                return out;
            }
            pos -= 1;
            indices[pos] += 1;
            if indices[pos] < pool.len() {
                break;
            }
            indices[pos] = 0;
        }
    }
    out
}

/// Environments binding every name in `names` to probe values, at most
/// `limit` of them.
pub fn environments<'a>(
    names: impl IntoIterator<Item = &'a Identifier>,
    pool: &[Value],
    limit: usize,
) -> Vec<Env> {
    let names: Vec<&Identifier> = names.into_iter().collect();
    tuples(pool, names.len(), limit)
        .into_iter()
        .map(|values| {
            names
                .iter()
                .map(|name| (*name).clone())
                .zip(values)
                .collect()
        })
        .collect()
}
