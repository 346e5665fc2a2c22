//! Semantics of eager operators.
//!
//! All functions here are pure functions of already-evaluated operands.
//! They follow a consistent pattern:
//! - validate operand kinds, failing with `TypeMismatch`,
//! - validate operation-specific preconditions (indices, divisors, keys),
//!   failing with `InvalidOperation`,
//! - build the result without touching their inputs.

use std::cmp::Ordering;

use im::{OrdMap, OrdSet, Vector};
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};
use trellis_ir::{BinaryOp, CollectionKind, TernaryOp, UnaryOp};

use crate::error::{EvalError, EvalResult};
use crate::value::{Value, bv_modulus};

// =============================================================================
// Unary operators
// =============================================================================

pub fn apply_unary(op: UnaryOp, operand: &Value) -> EvalResult<Value> {
    let name = op.mnemonic();
    Ok(match op {
        UnaryOp::BoolNot => Value::Bool(!operand.as_bool(name)?),
        UnaryOp::BvNot => match operand {
            Value::BitVector { width, magnitude } => {
                let mask = bv_modulus(*width) - 1u32;
                Value::BitVector {
                    width: *width,
                    magnitude: mask ^ magnitude,
                }
            }
            other => return Err(EvalError::type_mismatch(name, "bitvector", other)),
        },
        UnaryOp::SeqLength => Value::int(operand.as_seq(name)?.len()),
        UnaryOp::SetCard => Value::int(operand.as_set(name)?.len()),
        UnaryOp::MultisetCard => {
            let total: BigUint = operand.as_multiset(name)?.values().sum();
            Value::Int(total.into())
        }
        UnaryOp::MapCard => Value::int(operand.as_map(name)?.len()),
    })
}

// =============================================================================
// Binary operators
// =============================================================================

pub fn apply_binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> EvalResult<Value> {
    use BinaryOp::*;
    let name = op.mnemonic();
    Ok(match op {
        Lt => Value::Bool(compare(name, lhs, rhs)? == Ordering::Less),
        Le => Value::Bool(compare(name, lhs, rhs)? != Ordering::Greater),
        Ge => Value::Bool(compare(name, lhs, rhs)? != Ordering::Less),
        Gt => Value::Bool(compare(name, lhs, rhs)? == Ordering::Greater),
        Add | Sub | Mul | Div | Mod => arithmetic(op, lhs, rhs)?,

        Iff => Value::Bool(lhs.as_bool(name)? == rhs.as_bool(name)?),

        Eq => Value::Bool(equal(name, lhs, rhs)?),
        Neq => Value::Bool(!equal(name, lhs, rhs)?),

        BvAnd | BvOr | BvXor | BvShl | BvShr => bitwise(op, lhs, rhs)?,

        SetEq | SetNeq | Subset | Superset | ProperSubset | ProperSuperset | Disjoint | Union
        | Intersection | SetDifference => set_op(op, lhs.as_set(name)?, rhs.as_set(name)?),
        InSet => Value::Bool(set_contains(name, lhs, rhs)?),
        NotInSet => Value::Bool(!set_contains(name, lhs, rhs)?),

        MultisetEq | MultisetNeq | MultiSubset | MultiSuperset | ProperMultiSubset
        | ProperMultiSuperset | MultisetDisjoint | MultisetUnion | MultisetIntersection
        | MultisetDifference => multiset_op(op, lhs.as_multiset(name)?, rhs.as_multiset(name)?),
        InMultiset => Value::Bool(multiset_contains(name, lhs, rhs)?),
        NotInMultiset => Value::Bool(!multiset_contains(name, lhs, rhs)?),
        MultisetCount => {
            let counts = lhs.as_multiset(name)?;
            require_equality(name, rhs)?;
            Value::Int(counts.get(rhs).cloned().unwrap_or_default().into())
        }

        SeqEq => Value::Bool(equal(name, lhs.seq_checked(name)?, rhs.seq_checked(name)?)?),
        SeqNeq => Value::Bool(!equal(name, lhs.seq_checked(name)?, rhs.seq_checked(name)?)?),
        Prefix | ProperPrefix => {
            let (prefix, full) = (lhs.as_seq(name)?, rhs.as_seq(name)?);
            require_equality(name, lhs)?;
            require_equality(name, rhs)?;
            let is_prefix =
                prefix.len() <= full.len() && prefix.iter().zip(full.iter()).all(|(a, b)| a == b);
            Value::Bool(is_prefix && (op == Prefix || prefix.len() < full.len()))
        }
        Concat => {
            let mut joined = lhs.as_seq(name)?.clone();
            joined.append(rhs.as_seq(name)?.clone());
            Value::Seq(joined)
        }
        InSeq => Value::Bool(seq_contains(name, lhs, rhs)?),
        NotInSeq => Value::Bool(!seq_contains(name, lhs, rhs)?),
        SeqSelect => {
            let elems = lhs.as_seq(name)?;
            let index = index_in(name, rhs.as_int(name)?, elems.len())?;
            elems[index].clone()
        }
        SeqTake | SeqDrop => {
            let elems = lhs.as_seq(name)?;
            let n = bound_in(name, rhs.as_int(name)?, elems.len())?;
            let part: Vector<Value> = if op == SeqTake {
                elems.iter().take(n).cloned().collect()
            } else {
                elems.iter().skip(n).cloned().collect()
            };
            Value::Seq(part)
        }

        MapEq => Value::Bool(equal(name, lhs.map_checked(name)?, rhs.map_checked(name)?)?),
        MapNeq => Value::Bool(!equal(name, lhs.map_checked(name)?, rhs.map_checked(name)?)?),
        InMap => Value::Bool(map_contains(name, lhs, rhs)?),
        NotInMap => Value::Bool(!map_contains(name, lhs, rhs)?),
        MapMerge => {
            let mut merged = lhs.as_map(name)?.clone();
            for (k, v) in rhs.as_map(name)? {
                merged.insert(k.clone(), v.clone());
            }
            Value::Map(merged)
        }
        MapSubtraction => {
            let map = lhs.as_map(name)?;
            let removed = rhs.as_set(name)?;
            Value::Map(
                map.iter()
                    .filter(|(k, _)| !removed.contains(*k))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            )
        }
        MapSelect => {
            let map = lhs.as_map(name)?;
            require_equality(name, rhs)?;
            match map.get(rhs) {
                Some(v) => v.clone(),
                None => return Err(EvalError::invalid(name, format!("key {rhs} not in map"))),
            }
        }
    })
}

impl Value {
    fn seq_checked(&self, op: &'static str) -> EvalResult<&Value> {
        self.as_seq(op)?;
        Ok(self)
    }

    fn map_checked(&self, op: &'static str) -> EvalResult<&Value> {
        self.as_map(op)?;
        Ok(self)
    }
}

fn require_equality(op: &'static str, value: &Value) -> EvalResult<()> {
    if value.supports_equality() {
        Ok(())
    } else {
        Err(EvalError::type_mismatch(op, "value with equality", value))
    }
}

/// Structural equality, defined only for values without closures.
fn equal(op: &'static str, lhs: &Value, rhs: &Value) -> EvalResult<bool> {
    require_equality(op, lhs)?;
    require_equality(op, rhs)?;
    Ok(lhs == rhs)
}

fn compare(op: &'static str, lhs: &Value, rhs: &Value) -> EvalResult<Ordering> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
        (Value::Real(a), Value::Real(b)) => Ok(a.cmp(b)),
        (Value::Char(a), Value::Char(b)) => Ok(a.cmp(b)),
        (Value::Ordinal(a), Value::Ordinal(b)) => Ok(a.cmp(b)),
        (
            Value::BitVector {
                width: wa,
                magnitude: a,
            },
            Value::BitVector {
                width: wb,
                magnitude: b,
            },
        ) if wa == wb => Ok(a.cmp(b)),
        (Value::Int(_) | Value::Real(_) | Value::Char(_) | Value::Ordinal(_), other)
        | (Value::BitVector { .. }, other) => Err(EvalError::type_mismatch(op, lhs.kind_name(), other)),
        (other, _) => Err(EvalError::type_mismatch(op, "number", other)),
    }
}

fn arithmetic(op: BinaryOp, lhs: &Value, rhs: &Value) -> EvalResult<Value> {
    let name = op.mnemonic();
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => int_arith(op, a, b).map(Value::Int),
        (Value::Real(a), Value::Real(b)) => Ok(Value::Real(match op {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div if b.is_zero() => return Err(EvalError::invalid(name, "division by zero")),
            BinaryOp::Div => a / b,
            _ => return Err(EvalError::type_mismatch(name, "int or bitvector", lhs)),
        })),
        (
            Value::BitVector {
                width: wa,
                magnitude: a,
            },
            Value::BitVector {
                width: wb,
                magnitude: b,
            },
        ) if wa == wb => {
            let modulus = bv_modulus(*wa);
            let magnitude = match op {
                BinaryOp::Add => (a + b) % &modulus,
                BinaryOp::Sub => (a + &modulus - b) % &modulus,
                BinaryOp::Mul => (a * b) % &modulus,
                _ if b.is_zero() => return Err(EvalError::invalid(name, "division by zero")),
                BinaryOp::Div => a / b,
                _ => a % b,
            };
            Ok(Value::BitVector {
                width: *wa,
                magnitude,
            })
        }
        (Value::Char(a), Value::Char(b)) => {
            let (a, b) = (u32::from(*a), u32::from(*b));
            let code = match op {
                BinaryOp::Add => a.checked_add(b),
                BinaryOp::Sub => a.checked_sub(b),
                _ => return Err(EvalError::type_mismatch(name, "int, real or bitvector", lhs)),
            };
            code.and_then(char::from_u32)
                .map(Value::Char)
                .ok_or_else(|| EvalError::invalid(name, "result is not a character"))
        }
        (Value::Ordinal(a), Value::Ordinal(b)) if op == BinaryOp::Add => {
            Ok(Value::Ordinal(a + b))
        }
        (
            Value::Int(_)
            | Value::Real(_)
            | Value::BitVector { .. }
            | Value::Char(_)
            | Value::Ordinal(_),
            other,
        ) => Err(EvalError::type_mismatch(name, lhs.kind_name(), other)),
        (other, _) => Err(EvalError::type_mismatch(name, "number", other)),
    }
}

/// Integer arithmetic; division and modulus are Euclidean.
fn int_arith(op: BinaryOp, a: &BigInt, b: &BigInt) -> EvalResult<BigInt> {
    let name = op.mnemonic();
    match op {
        BinaryOp::Add => Ok(a + b),
        BinaryOp::Sub => Ok(a - b),
        BinaryOp::Mul => Ok(a * b),
        _ if b.is_zero() => Err(EvalError::invalid(name, "division by zero")),
        BinaryOp::Div => {
            let r = a.mod_floor(&b.abs());
            Ok((a - r) / b)
        }
        _ => Ok(a.mod_floor(&b.abs())),
    }
}

fn bitwise(op: BinaryOp, lhs: &Value, rhs: &Value) -> EvalResult<Value> {
    let name = op.mnemonic();
    let Value::BitVector {
        width,
        magnitude: a,
    } = lhs
    else {
        return Err(EvalError::type_mismatch(name, "bitvector", lhs));
    };
    let modulus = bv_modulus(*width);
    let magnitude = match op {
        BinaryOp::BvShl | BinaryOp::BvShr => {
            let amount = match rhs {
                Value::BitVector { magnitude, .. } => magnitude.to_usize(),
                Value::Int(n) => n.to_usize(),
                other => return Err(EvalError::type_mismatch(name, "bitvector or int", other)),
            };
            let amount = amount
                .filter(|amount| *amount <= *width as usize)
                .ok_or_else(|| EvalError::invalid(name, "shift amount out of range"))?;
            if op == BinaryOp::BvShl {
                (a << amount) % &modulus
            } else {
                a >> amount
            }
        }
        _ => {
            let b = match rhs {
                Value::BitVector {
                    width: wb,
                    magnitude,
                } if wb == width => magnitude,
                other => return Err(EvalError::type_mismatch(name, "bitvector", other)),
            };
            match op {
                BinaryOp::BvAnd => a & b,
                BinaryOp::BvOr => a | b,
                _ => a ^ b,
            }
        }
    };
    Ok(Value::BitVector {
        width: *width,
        magnitude,
    })
}

fn set_op(op: BinaryOp, lhs: &OrdSet<Value>, rhs: &OrdSet<Value>) -> Value {
    use BinaryOp::*;
    let subset = |a: &OrdSet<Value>, b: &OrdSet<Value>| a.iter().all(|x| b.contains(x));
    match op {
        SetEq => Value::Bool(lhs == rhs),
        SetNeq => Value::Bool(lhs != rhs),
        Subset => Value::Bool(subset(lhs, rhs)),
        Superset => Value::Bool(subset(rhs, lhs)),
        ProperSubset => Value::Bool(subset(lhs, rhs) && lhs.len() < rhs.len()),
        ProperSuperset => Value::Bool(subset(rhs, lhs) && rhs.len() < lhs.len()),
        Disjoint => Value::Bool(lhs.iter().all(|x| !rhs.contains(x))),
        Union => {
            let mut out = lhs.clone();
            out.extend(rhs.iter().cloned());
            Value::Set(out)
        }
        Intersection => Value::Set(lhs.iter().filter(|x| rhs.contains(x)).cloned().collect()),
        _ => Value::Set(lhs.iter().filter(|x| !rhs.contains(x)).cloned().collect()),
    }
}

fn multiset_op(
    op: BinaryOp,
    lhs: &OrdMap<Value, BigUint>,
    rhs: &OrdMap<Value, BigUint>,
) -> Value {
    use BinaryOp::*;
    let count = |m: &OrdMap<Value, BigUint>, x: &Value| m.get(x).cloned().unwrap_or_default();
    let subset = |a: &OrdMap<Value, BigUint>, b: &OrdMap<Value, BigUint>| {
        a.iter().all(|(x, n)| *n <= count(b, x))
    };
    match op {
        MultisetEq => Value::Bool(lhs == rhs),
        MultisetNeq => Value::Bool(lhs != rhs),
        MultiSubset => Value::Bool(subset(lhs, rhs)),
        MultiSuperset => Value::Bool(subset(rhs, lhs)),
        ProperMultiSubset => Value::Bool(subset(lhs, rhs) && lhs != rhs),
        ProperMultiSuperset => Value::Bool(subset(rhs, lhs) && lhs != rhs),
        MultisetDisjoint => Value::Bool(lhs.keys().all(|x| !rhs.contains_key(x))),
        MultisetUnion => {
            let mut out = lhs.clone();
            for (x, n) in rhs {
                *out.entry(x.clone()).or_insert_with(BigUint::zero) += n;
            }
            Value::Multiset(out)
        }
        MultisetIntersection => Value::Multiset(
            lhs.iter()
                .filter_map(|(x, n)| {
                    let m = count(rhs, x);
                    (!m.is_zero()).then(|| (x.clone(), n.min(&m).clone()))
                })
                .collect(),
        ),
        _ => Value::Multiset(
            lhs.iter()
                .filter_map(|(x, n)| {
                    let m = count(rhs, x);
                    (*n > m).then(|| (x.clone(), n - m))
                })
                .collect(),
        ),
    }
}

fn set_contains(op: &'static str, elem: &Value, set: &Value) -> EvalResult<bool> {
    let set = set.as_set(op)?;
    require_equality(op, elem)?;
    Ok(set.contains(elem))
}

fn multiset_contains(op: &'static str, elem: &Value, multiset: &Value) -> EvalResult<bool> {
    let counts = multiset.as_multiset(op)?;
    require_equality(op, elem)?;
    Ok(counts.contains_key(elem))
}

fn seq_contains(op: &'static str, elem: &Value, seq: &Value) -> EvalResult<bool> {
    let elems = seq.as_seq(op)?;
    require_equality(op, elem)?;
    require_equality(op, seq)?;
    Ok(elems.contains(elem))
}

fn map_contains(op: &'static str, key: &Value, map: &Value) -> EvalResult<bool> {
    let map = map.as_map(op)?;
    require_equality(op, key)?;
    Ok(map.contains_key(key))
}

/// `index` as a valid position in a sequence of length `len`.
fn index_in(op: &'static str, index: &BigInt, len: usize) -> EvalResult<usize> {
    index
        .to_usize()
        .filter(|i| *i < len)
        .ok_or_else(|| EvalError::invalid(op, format!("index {index} out of range 0..{len}")))
}

/// `bound` as a valid cut point (`0..=len`) in a sequence of length `len`.
fn bound_in(op: &'static str, bound: &BigInt, len: usize) -> EvalResult<usize> {
    bound
        .to_usize()
        .filter(|i| *i <= len)
        .ok_or_else(|| EvalError::invalid(op, format!("bound {bound} out of range 0..={len}")))
}

// =============================================================================
// Ternary operators
// =============================================================================

pub fn apply_ternary(op: TernaryOp, first: &Value, second: &Value, third: &Value) -> EvalResult<Value> {
    let name = op.mnemonic();
    Ok(match op {
        TernaryOp::SeqUpdate => {
            let elems = first.as_seq(name)?;
            let index = index_in(name, second.as_int(name)?, elems.len())?;
            Value::Seq(elems.update(index, third.clone()))
        }
        TernaryOp::SeqSubseq => {
            let elems = first.as_seq(name)?;
            let lo = bound_in(name, second.as_int(name)?, elems.len())?;
            let hi = bound_in(name, third.as_int(name)?, elems.len())?;
            if lo > hi {
                return Err(EvalError::invalid(name, format!("empty range {lo}..{hi}")));
            }
            Value::Seq(elems.iter().skip(lo).take(hi - lo).cloned().collect())
        }
        TernaryOp::MultisetUpdate => {
            let mut counts = first.as_multiset(name)?.clone();
            require_equality(name, second)?;
            let count = third.as_int(name)?;
            let Some(count) = count.to_biguint() else {
                return Err(EvalError::invalid(name, "negative multiplicity"));
            };
            if count.is_zero() {
                counts.remove(second);
            } else {
                counts.insert(second.clone(), count);
            }
            Value::Multiset(counts)
        }
        TernaryOp::MapUpdate => {
            let map = first.as_map(name)?;
            require_equality(name, second)?;
            Value::Map(map.update(second.clone(), third.clone()))
        }
    })
}

// =============================================================================
// Collection displays
// =============================================================================

/// Build a collection of `kind` from evaluated elements.
///
/// Set and multiset elements and map keys need decidable equality. Map
/// elements are `[key, value]` sequences; a repeated key is an error.
pub fn build_display(kind: CollectionKind, elems: Vec<Value>) -> EvalResult<Value> {
    let name = kind.mnemonic();
    match kind {
        CollectionKind::Seq => Ok(Value::Seq(elems.into_iter().collect())),
        CollectionKind::Set => {
            for elem in &elems {
                require_equality(name, elem)?;
            }
            Ok(Value::set(elems))
        }
        CollectionKind::Multiset => {
            for elem in &elems {
                require_equality(name, elem)?;
            }
            Ok(Value::multiset(elems))
        }
        CollectionKind::Map => {
            let mut map = OrdMap::new();
            for elem in elems {
                let pair = elem.as_seq(name)?;
                if pair.len() != 2 {
                    return Err(EvalError::invalid(
                        name,
                        format!("expected a [key, value] pair, found {} elements", pair.len()),
                    ));
                }
                let (key, value) = (pair[0].clone(), pair[1].clone());
                require_equality(name, &key)?;
                if map.contains_key(&key) {
                    return Err(EvalError::duplicate_key(&key));
                }
                map.insert(key, value);
            }
            Ok(Value::Map(map))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalErrorKind;
    use crate::{Closure, Env};
    use num_rational::BigRational;
    use trellis_ir::Expr;

    fn ints(ns: &[i64]) -> Vec<Value> {
        ns.iter().map(|n| Value::int(*n)).collect()
    }

    fn closure() -> Value {
        Value::Closure(Closure::new(Env::new(), vec![], Expr::unit()))
    }

    #[test]
    fn euclidean_division() {
        let div = |a: i64, b: i64| apply_binary(BinaryOp::Div, &Value::int(a), &Value::int(b));
        let rem = |a: i64, b: i64| apply_binary(BinaryOp::Mod, &Value::int(a), &Value::int(b));
        assert_eq!(div(7, 2).unwrap(), Value::int(3));
        assert_eq!(div(-7, 2).unwrap(), Value::int(-4));
        assert_eq!(div(-7, -2).unwrap(), Value::int(4));
        assert_eq!(rem(-7, 2).unwrap(), Value::int(1));
        assert_eq!(rem(-7, -2).unwrap(), Value::int(1));
        assert!(matches!(
            div(1, 0).unwrap_err().kind(),
            EvalErrorKind::InvalidOperation { .. }
        ));
    }

    #[test]
    fn real_arithmetic_is_exact() {
        let half = Value::Real(BigRational::new(1.into(), 2.into()));
        let third = Value::Real(BigRational::new(1.into(), 3.into()));
        let sum = apply_binary(BinaryOp::Add, &half, &third).unwrap();
        assert_eq!(sum, Value::Real(BigRational::new(5.into(), 6.into())));
        assert!(apply_binary(BinaryOp::Mod, &half, &third).is_err());
    }

    #[test]
    fn bitvectors_wrap() {
        let a = Value::bitvector(4, 12u32);
        let b = Value::bitvector(4, 7u32);
        assert_eq!(
            apply_binary(BinaryOp::Add, &a, &b).unwrap(),
            Value::bitvector(4, 3u32)
        );
        assert_eq!(
            apply_binary(BinaryOp::Sub, &b, &a).unwrap(),
            Value::bitvector(4, 11u32)
        );
        assert_eq!(
            apply_unary(UnaryOp::BvNot, &a).unwrap(),
            Value::bitvector(4, 3u32)
        );
        assert_eq!(
            apply_binary(BinaryOp::BvShl, &b, &Value::int(2)).unwrap(),
            Value::bitvector(4, 12u32)
        );
        // Width mismatch is a kind error.
        assert!(apply_binary(BinaryOp::BvAnd, &a, &Value::bitvector(8, 1u32)).is_err());
        assert!(apply_binary(BinaryOp::BvShr, &a, &Value::int(5)).is_err());
    }

    #[test]
    fn equality_rejects_closures() {
        let err = apply_binary(BinaryOp::Eq, &closure(), &closure()).unwrap_err();
        assert!(matches!(err.kind(), EvalErrorKind::TypeMismatch { .. }));
        assert_eq!(
            apply_binary(BinaryOp::Neq, &Value::int(1), &Value::Bool(true)).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn negated_ops_complement_positive_ops() {
        let set = Value::set(ints(&[1, 2]));
        let seq = Value::seq(ints(&[1, 2]));
        let ms = Value::multiset(ints(&[1, 1]));
        let map = Value::map([(Value::int(1), Value::int(9))]);
        let cases = [
            (BinaryOp::InSet, BinaryOp::NotInSet, Value::int(1), set.clone()),
            (BinaryOp::InSeq, BinaryOp::NotInSeq, Value::int(3), seq.clone()),
            (BinaryOp::InMultiset, BinaryOp::NotInMultiset, Value::int(1), ms.clone()),
            (BinaryOp::InMap, BinaryOp::NotInMap, Value::int(2), map.clone()),
            (BinaryOp::SetEq, BinaryOp::SetNeq, set.clone(), set),
            (BinaryOp::SeqEq, BinaryOp::SeqNeq, seq, Value::seq([])),
            (BinaryOp::MapEq, BinaryOp::MapNeq, map.clone(), map),
        ];
        for (pos, neg, l, r) in cases {
            let Value::Bool(p) = apply_binary(pos, &l, &r).unwrap() else {
                panic!("{pos:?} did not produce a bool");
            };
            assert_eq!(apply_binary(neg, &l, &r).unwrap(), Value::Bool(!p), "{neg:?}");
        }
    }

    #[test]
    fn set_algebra() {
        let a = Value::set(ints(&[1, 2, 3]));
        let b = Value::set(ints(&[2, 3, 4]));
        assert_eq!(
            apply_binary(BinaryOp::SetDifference, &a, &b).unwrap(),
            Value::set(ints(&[1]))
        );
        assert_eq!(
            apply_binary(BinaryOp::Union, &a, &b).unwrap(),
            Value::set(ints(&[1, 2, 3, 4]))
        );
        assert_eq!(
            apply_binary(BinaryOp::ProperSubset, &Value::set(ints(&[2])), &a).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            apply_binary(BinaryOp::Disjoint, &a, &b).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn multiset_algebra() {
        let a = Value::multiset(ints(&[1, 1, 2]));
        let b = Value::multiset(ints(&[1, 3]));
        assert_eq!(
            apply_binary(BinaryOp::MultisetUnion, &a, &b).unwrap(),
            Value::multiset(ints(&[1, 1, 1, 2, 3]))
        );
        assert_eq!(
            apply_binary(BinaryOp::MultisetIntersection, &a, &b).unwrap(),
            Value::multiset(ints(&[1]))
        );
        assert_eq!(
            apply_binary(BinaryOp::MultisetDifference, &a, &b).unwrap(),
            Value::multiset(ints(&[1, 2]))
        );
        assert_eq!(
            apply_binary(BinaryOp::MultisetCount, &a, &Value::int(1)).unwrap(),
            Value::int(2)
        );
        assert_eq!(apply_unary(UnaryOp::MultisetCard, &a).unwrap(), Value::int(3));
    }

    #[test]
    fn sequence_slicing() {
        let s = Value::seq(ints(&[10, 20, 30]));
        assert_eq!(
            apply_binary(BinaryOp::SeqSelect, &s, &Value::int(1)).unwrap(),
            Value::int(20)
        );
        assert!(apply_binary(BinaryOp::SeqSelect, &s, &Value::int(3)).is_err());
        assert!(apply_binary(BinaryOp::SeqSelect, &s, &Value::int(-1)).is_err());
        assert_eq!(
            apply_binary(BinaryOp::SeqTake, &s, &Value::int(3)).unwrap(),
            s
        );
        assert_eq!(
            apply_binary(BinaryOp::SeqDrop, &s, &Value::int(2)).unwrap(),
            Value::seq(ints(&[30]))
        );
        assert_eq!(
            apply_ternary(TernaryOp::SeqSubseq, &s, &Value::int(1), &Value::int(2)).unwrap(),
            Value::seq(ints(&[20]))
        );
        assert!(apply_ternary(TernaryOp::SeqSubseq, &s, &Value::int(2), &Value::int(1)).is_err());
        assert_eq!(
            apply_ternary(TernaryOp::SeqUpdate, &s, &Value::int(0), &Value::Unit).unwrap(),
            Value::seq([Value::Unit, Value::int(20), Value::int(30)])
        );
        assert_eq!(
            apply_binary(BinaryOp::ProperPrefix, &Value::seq(ints(&[10])), &s).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn map_operations() {
        let m = Value::map([(Value::int(1), Value::int(10)), (Value::int(2), Value::int(20))]);
        assert_eq!(
            apply_binary(BinaryOp::MapSelect, &m, &Value::int(2)).unwrap(),
            Value::int(20)
        );
        assert!(apply_binary(BinaryOp::MapSelect, &m, &Value::int(3)).is_err());
        assert_eq!(
            apply_binary(BinaryOp::MapSubtraction, &m, &Value::set(ints(&[1]))).unwrap(),
            Value::map([(Value::int(2), Value::int(20))])
        );
        let updated =
            apply_ternary(TernaryOp::MapUpdate, &m, &Value::int(1), &Value::int(11)).unwrap();
        assert_eq!(apply_unary(UnaryOp::MapCard, &updated).unwrap(), Value::int(2));
    }

    #[test]
    fn map_display_rejects_duplicate_keys() {
        let pair = |k: i64, v: i64| Value::seq(ints(&[k, v]));
        let ok = build_display(CollectionKind::Map, vec![pair(1, 2), pair(2, 3)]).unwrap();
        assert_eq!(apply_unary(UnaryOp::MapCard, &ok).unwrap(), Value::int(2));

        let err = build_display(CollectionKind::Map, vec![pair(1, 2), pair(1, 2)]).unwrap_err();
        assert_eq!(err.kind(), &EvalErrorKind::DuplicateKey("1".to_owned()));

        assert!(build_display(CollectionKind::Map, vec![Value::int(1)]).is_err());
    }

    #[test]
    fn set_display_requires_equality() {
        assert!(build_display(CollectionKind::Set, vec![closure()]).is_err());
        assert!(build_display(CollectionKind::Seq, vec![closure()]).is_ok());
    }

    #[test]
    fn char_arithmetic_stays_in_range() {
        assert_eq!(
            apply_binary(BinaryOp::Sub, &Value::Char('b'), &Value::Char('\u{1}')).unwrap(),
            Value::Char('a')
        );
        assert!(apply_binary(BinaryOp::Sub, &Value::Char('a'), &Value::Char('b')).is_err());
    }
}
