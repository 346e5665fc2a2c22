//! Runtime values.
//!
//! Values are immutable and share structure through persistent
//! collections. The derived `Eq`/`Ord` impls are structural and exist so
//! values can live inside sets and map keys; program-level equality goes
//! through [`Value::supports_equality`] first, since closures have no
//! decidable equality.

use std::fmt;
use std::sync::Arc;

use im::{OrdMap, OrdSet, Vector};
use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};
use trellis_ir::{Expr, Identifier, Literal};

use crate::Env;
use crate::error::{EvalError, EvalErrorKind, EvalResult};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    Unit,
    Bool(bool),
    Char(char),
    Int(BigInt),
    Real(BigRational),
    Ordinal(BigUint),
    /// Invariant: `magnitude < 2^width`.
    BitVector { width: u32, magnitude: BigUint },
    Seq(Vector<Value>),
    Set(OrdSet<Value>),
    /// Element to multiplicity; multiplicities are never zero.
    Multiset(OrdMap<Value, BigUint>),
    Map(OrdMap<Value, Value>),
    Closure(Closure),
}

/// First-class function value.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Closure {
    /// Snapshot of the defining environment.
    pub env: Env,
    pub params: Vec<Identifier>,
    pub body: Arc<Expr>,
}

impl Closure {
    pub fn new(env: Env, params: Vec<Identifier>, body: Expr) -> Self {
        Self {
            env,
            params,
            body: Arc::new(body),
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Widest bit-vector a literal may denote.
pub const MAX_BITVECTOR_WIDTH: u32 = 1 << 16;

/// `2^width`, the modulus of bit-vectors of that width.
pub fn bv_modulus(width: u32) -> BigUint {
    BigUint::one() << width as usize
}

impl Value {
    pub fn int(n: impl Into<BigInt>) -> Self {
        Value::Int(n.into())
    }

    /// Bit-vector value, reduced modulo `2^width`.
    pub fn bitvector(width: u32, magnitude: impl Into<BigUint>) -> Self {
        Value::BitVector {
            width,
            magnitude: magnitude.into() % bv_modulus(width),
        }
    }

    pub fn seq(elems: impl IntoIterator<Item = Value>) -> Self {
        Value::Seq(elems.into_iter().collect())
    }

    pub fn set(elems: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(elems.into_iter().collect())
    }

    /// Multiset counting each occurrence in `elems`.
    pub fn multiset(elems: impl IntoIterator<Item = Value>) -> Self {
        let mut counts = OrdMap::new();
        for elem in elems {
            *counts.entry(elem).or_insert_with(BigUint::zero) += 1u32;
        }
        Value::Multiset(counts)
    }

    pub fn map(pairs: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Map(pairs.into_iter().collect())
    }

    /// The value denoted by a literal. Bit-vector literals must fit their
    /// width, which is at most [`MAX_BITVECTOR_WIDTH`].
    pub fn from_literal(lit: &Literal) -> EvalResult<Self> {
        Ok(match lit {
            Literal::Unit => Value::Unit,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(n) => Value::Int(n.clone()),
            Literal::Real(r) => Value::Real(r.clone()),
            Literal::Char(c) => Value::Char(*c),
            Literal::Ordinal(n) => Value::Ordinal(n.clone()),
            Literal::BitVector { width, .. } if *width > MAX_BITVECTOR_WIDTH => {
                return Err(EvalErrorKind::TypeMismatch {
                    op: "literal",
                    expected: "bitvector of at most 65536 bits",
                    found: "oversized bitvector width",
                }
                .into());
            }
            Literal::BitVector { width, magnitude } => {
                if *magnitude >= bv_modulus(*width) {
                    return Err(EvalErrorKind::TypeMismatch {
                        op: "literal",
                        expected: "bitvector within its width",
                        found: "oversized bitvector",
                    }
                    .into());
                }
                Value::BitVector {
                    width: *width,
                    magnitude: magnitude.clone(),
                }
            }
        })
    }

    /// Human-readable kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::Int(_) => "int",
            Value::Real(_) => "real",
            Value::Ordinal(_) => "ordinal",
            Value::BitVector { .. } => "bitvector",
            Value::Seq(_) => "seq",
            Value::Set(_) => "set",
            Value::Multiset(_) => "multiset",
            Value::Map(_) => "map",
            Value::Closure(_) => "closure",
        }
    }

    /// Whether the value has decidable structural equality, i.e. contains
    /// no closure anywhere.
    pub fn supports_equality(&self) -> bool {
        match self {
            Value::Unit
            | Value::Bool(_)
            | Value::Char(_)
            | Value::Int(_)
            | Value::Real(_)
            | Value::Ordinal(_)
            | Value::BitVector { .. } => true,
            Value::Seq(elems) => elems.iter().all(Value::supports_equality),
            Value::Set(elems) => elems.iter().all(Value::supports_equality),
            Value::Multiset(counts) => counts.keys().all(Value::supports_equality),
            Value::Map(map) => map
                .iter()
                .all(|(k, v)| k.supports_equality() && v.supports_equality()),
            Value::Closure(_) => false,
        }
    }

    /// Depth-based complexity metric: 1 for scalars, one more than the
    /// most complex component otherwise. A closure's components are the
    /// values it captured.
    pub fn complexity(&self) -> usize {
        let inner = match self {
            Value::Unit
            | Value::Bool(_)
            | Value::Char(_)
            | Value::Int(_)
            | Value::Real(_)
            | Value::Ordinal(_)
            | Value::BitVector { .. } => 0,
            Value::Seq(elems) => max_complexity(elems.iter()),
            Value::Set(elems) => max_complexity(elems.iter()),
            Value::Multiset(counts) => max_complexity(counts.keys()),
            Value::Map(map) => max_complexity(map.keys().chain(map.values())),
            Value::Closure(closure) => max_complexity(closure.env.values()),
        };
        1 + inner
    }

    /// Representation invariants: bit-vectors in range, positive
    /// multiplicities, set elements and map keys with decidable equality.
    pub fn well_formed(&self) -> bool {
        match self {
            Value::BitVector { width, magnitude } => *magnitude < bv_modulus(*width),
            Value::Seq(elems) => elems.iter().all(Value::well_formed),
            Value::Set(elems) => elems
                .iter()
                .all(|e| e.supports_equality() && e.well_formed()),
            Value::Multiset(counts) => counts
                .iter()
                .all(|(e, n)| !n.is_zero() && e.supports_equality() && e.well_formed()),
            Value::Map(map) => map
                .iter()
                .all(|(k, v)| k.supports_equality() && k.well_formed() && v.well_formed()),
            Value::Closure(closure) => closure.env.values().all(Value::well_formed),
            _ => true,
        }
    }

    pub(crate) fn as_bool(&self, op: &'static str) -> EvalResult<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(EvalError::type_mismatch(op, "bool", other)),
        }
    }

    pub(crate) fn as_int(&self, op: &'static str) -> EvalResult<&BigInt> {
        match self {
            Value::Int(n) => Ok(n),
            other => Err(EvalError::type_mismatch(op, "int", other)),
        }
    }

    pub(crate) fn as_seq(&self, op: &'static str) -> EvalResult<&Vector<Value>> {
        match self {
            Value::Seq(elems) => Ok(elems),
            other => Err(EvalError::type_mismatch(op, "seq", other)),
        }
    }

    pub(crate) fn as_set(&self, op: &'static str) -> EvalResult<&OrdSet<Value>> {
        match self {
            Value::Set(elems) => Ok(elems),
            other => Err(EvalError::type_mismatch(op, "set", other)),
        }
    }

    pub(crate) fn as_multiset(&self, op: &'static str) -> EvalResult<&OrdMap<Value, BigUint>> {
        match self {
            Value::Multiset(counts) => Ok(counts),
            other => Err(EvalError::type_mismatch(op, "multiset", other)),
        }
    }

    pub(crate) fn as_map(&self, op: &'static str) -> EvalResult<&OrdMap<Value, Value>> {
        match self {
            Value::Map(map) => Ok(map),
            other => Err(EvalError::type_mismatch(op, "map", other)),
        }
    }
}

fn max_complexity<'a>(values: impl Iterator<Item = &'a Value>) -> usize {
    values.map(Value::complexity).max().unwrap_or(0)
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => f.write_str("()"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Char(c) => write!(f, "{c:?}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Real(r) => write!(f, "{r}r"),
            Value::Ordinal(n) => write!(f, "{n}ord"),
            Value::BitVector { width, magnitude } => write!(f, "{magnitude}bv{width}"),
            Value::Seq(elems) => {
                f.write_str("[")?;
                write_list(f, elems.iter())?;
                f.write_str("]")
            }
            Value::Set(elems) => {
                f.write_str("{")?;
                write_list(f, elems.iter())?;
                f.write_str("}")
            }
            Value::Multiset(counts) => {
                f.write_str("multiset{")?;
                let expanded = counts
                    .iter()
                    .flat_map(|(elem, n)| std::iter::repeat_n(elem, n.to_usize().unwrap_or(0)));
                write_list(f, expanded)?;
                f.write_str("}")
            }
            Value::Map(map) => {
                f.write_str("map[")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k} := {v}")?;
                }
                f.write_str("]")
            }
            Value::Closure(closure) => write!(f, "<closure ({})>", closure.params.join(" ")),
        }
    }
}

fn write_list<'a>(f: &mut fmt::Formatter<'_>, items: impl Iterator<Item = &'a Value>) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closure() -> Value {
        Value::Closure(Closure::new(Env::new(), vec!["x".into()], Expr::var("x")))
    }

    #[test]
    fn closures_have_no_equality() {
        assert!(Value::seq([Value::int(1), Value::Bool(true)]).supports_equality());
        assert!(!closure().supports_equality());
        assert!(!Value::seq([Value::int(1), closure()]).supports_equality());
        assert!(!Value::map([(Value::int(1), closure())]).supports_equality());
    }

    #[test]
    fn complexity_is_depth() {
        assert_eq!(Value::int(3).complexity(), 1);
        assert_eq!(Value::seq([]).complexity(), 1);
        assert_eq!(Value::seq([Value::int(1)]).complexity(), 2);
        assert_eq!(
            Value::seq([Value::set([Value::int(1)]), Value::Unit]).complexity(),
            3
        );

        let env: Env = [("f", closure())].into_iter().collect();
        let captured = Value::Closure(Closure::new(env, vec![], Expr::var("f")));
        assert_eq!(closure().complexity(), 1);
        assert_eq!(captured.complexity(), 2);
    }

    #[test]
    fn multiset_counts_occurrences() {
        let ms = Value::multiset([Value::int(1), Value::int(1), Value::int(2)]);
        let Value::Multiset(counts) = &ms else {
            panic!("expected multiset");
        };
        assert_eq!(counts.get(&Value::int(1)), Some(&BigUint::from(2u32)));
        assert_eq!(ms.to_string(), "multiset{1, 1, 2}");
    }

    #[test]
    fn bitvector_literals_must_fit() {
        let ok = Literal::BitVector {
            width: 4,
            magnitude: BigUint::from(15u32),
        };
        let too_big = Literal::BitVector {
            width: 4,
            magnitude: BigUint::from(16u32),
        };
        assert_eq!(Value::from_literal(&ok).unwrap(), Value::bitvector(4, 15u32));
        assert!(Value::from_literal(&too_big).is_err());
    }

    #[test]
    fn bitvector_widths_are_capped() {
        let widest = Literal::BitVector {
            width: MAX_BITVECTOR_WIDTH,
            magnitude: BigUint::from(1u32),
        };
        assert!(Value::from_literal(&widest).is_ok());

        let too_wide = Literal::BitVector {
            width: u32::MAX,
            magnitude: BigUint::zero(),
        };
        let err = Value::from_literal(&too_wide).unwrap_err();
        assert_eq!(
            err.kind(),
            &EvalErrorKind::TypeMismatch {
                op: "literal",
                expected: "bitvector of at most 65536 bits",
                found: "oversized bitvector width",
            }
        );
    }

    #[test]
    fn well_formedness() {
        assert!(Value::set([Value::int(1)]).well_formed());
        assert!(!Value::set([closure()]).well_formed());
        assert!(
            !Value::BitVector {
                width: 2,
                magnitude: BigUint::from(4u32)
            }
            .well_formed()
        );
        assert!(!Value::Multiset(OrdMap::unit(Value::int(1), BigUint::zero())).well_formed());
    }

    #[test]
    fn display() {
        let v = Value::map([(Value::int(1), Value::seq([Value::Char('a'), Value::Unit]))]);
        assert_eq!(v.to_string(), "map[1 := ['a', ()]]");
        assert_eq!(closure().to_string(), "<closure (x)>");
    }
}
