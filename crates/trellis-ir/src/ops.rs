//! Operator vocabulary.
//!
//! Operators split into two evaluation disciplines:
//! - [`LazyOp`]: short-circuit boolean connectives, whose second operand is
//!   only evaluated when the first does not decide the result.
//! - [`EagerOp`]: everything else; all arguments are evaluated left to
//!   right before the operator runs.

use serde::{Deserialize, Serialize};

/// Operator tag carried by [`crate::Expr::Apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Operator {
    Lazy(LazyOp),
    Eager(EagerOp),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LazyOp {
    And,
    Or,
    /// Implication: `a ==> b`
    Imp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EagerOp {
    Unary(UnaryOp),
    Binary(BinaryOp),
    Ternary(TernaryOp),
    /// Builds a collection of the given kind from the evaluated arguments.
    Display(CollectionKind),
    /// Applies the first argument (a closure) to the remaining ones.
    FunctionCall,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Logical not
    BoolNot,
    /// Bitwise not
    BvNot,
    SeqLength,
    SetCard,
    MultisetCard,
    MapCard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Numeric
    Lt,
    Le,
    Ge,
    Gt,
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Logical
    Iff,

    // Equality over any values supporting it
    Eq,
    Neq,

    // Bit-vectors
    BvAnd,
    BvOr,
    BvXor,
    BvShl,
    BvShr,

    // Sets
    SetEq,
    SetNeq,
    Subset,
    Superset,
    ProperSubset,
    ProperSuperset,
    Disjoint,
    Union,
    Intersection,
    SetDifference,
    InSet,
    NotInSet,

    // Multisets
    MultisetEq,
    MultisetNeq,
    MultiSubset,
    MultiSuperset,
    ProperMultiSubset,
    ProperMultiSuperset,
    MultisetDisjoint,
    MultisetUnion,
    MultisetIntersection,
    MultisetDifference,
    InMultiset,
    NotInMultiset,
    /// Multiplicity of the second operand in the first: `ms[x]`
    MultisetCount,

    // Sequences
    SeqEq,
    SeqNeq,
    Prefix,
    ProperPrefix,
    Concat,
    InSeq,
    NotInSeq,
    SeqSelect,
    SeqTake,
    SeqDrop,

    // Maps
    MapEq,
    MapNeq,
    InMap,
    NotInMap,
    MapMerge,
    MapSubtraction,
    MapSelect,
}

/// Coarse grouping of [`BinaryOp`]s by the kind of operands they expect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryFamily {
    Numeric,
    Logical,
    Equality,
    BitVector,
    Set,
    Multiset,
    Seq,
    Map,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TernaryOp {
    /// `s[i := v]`
    SeqUpdate,
    /// `s[lo..hi]`
    SeqSubseq,
    /// `ms[x := n]`
    MultisetUpdate,
    /// `m[k := v]`
    MapUpdate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    Seq,
    Set,
    Multiset,
    Map,
}

/// Number of arguments an operator accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl Operator {
    pub fn arity(self) -> Arity {
        match self {
            Operator::Lazy(_) => Arity::Exactly(2),
            Operator::Eager(EagerOp::Unary(_)) => Arity::Exactly(1),
            Operator::Eager(EagerOp::Binary(_)) => Arity::Exactly(2),
            Operator::Eager(EagerOp::Ternary(_)) => Arity::Exactly(3),
            Operator::Eager(EagerOp::Display(_)) => Arity::AtLeast(0),
            Operator::Eager(EagerOp::FunctionCall) => Arity::AtLeast(1),
        }
    }

    /// Short name used by the printer.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Operator::Lazy(op) => op.mnemonic(),
            Operator::Eager(EagerOp::Unary(op)) => op.mnemonic(),
            Operator::Eager(EagerOp::Binary(op)) => op.mnemonic(),
            Operator::Eager(EagerOp::Ternary(op)) => op.mnemonic(),
            Operator::Eager(EagerOp::Display(kind)) => kind.mnemonic(),
            Operator::Eager(EagerOp::FunctionCall) => "call",
        }
    }
}

impl LazyOp {
    pub const ALL: [LazyOp; 3] = [LazyOp::And, LazyOp::Or, LazyOp::Imp];

    pub fn mnemonic(self) -> &'static str {
        match self {
            LazyOp::And => "and",
            LazyOp::Or => "or",
            LazyOp::Imp => "imp",
        }
    }
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 6] = [
        UnaryOp::BoolNot,
        UnaryOp::BvNot,
        UnaryOp::SeqLength,
        UnaryOp::SetCard,
        UnaryOp::MultisetCard,
        UnaryOp::MapCard,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            UnaryOp::BoolNot => "not",
            UnaryOp::BvNot => "bv.not",
            UnaryOp::SeqLength => "seq.len",
            UnaryOp::SetCard => "set.card",
            UnaryOp::MultisetCard => "mset.card",
            UnaryOp::MapCard => "map.card",
        }
    }
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 59] = [
        BinaryOp::Lt,
        BinaryOp::Le,
        BinaryOp::Ge,
        BinaryOp::Gt,
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Mod,
        BinaryOp::Iff,
        BinaryOp::Eq,
        BinaryOp::Neq,
        BinaryOp::BvAnd,
        BinaryOp::BvOr,
        BinaryOp::BvXor,
        BinaryOp::BvShl,
        BinaryOp::BvShr,
        BinaryOp::SetEq,
        BinaryOp::SetNeq,
        BinaryOp::Subset,
        BinaryOp::Superset,
        BinaryOp::ProperSubset,
        BinaryOp::ProperSuperset,
        BinaryOp::Disjoint,
        BinaryOp::Union,
        BinaryOp::Intersection,
        BinaryOp::SetDifference,
        BinaryOp::InSet,
        BinaryOp::NotInSet,
        BinaryOp::MultisetEq,
        BinaryOp::MultisetNeq,
        BinaryOp::MultiSubset,
        BinaryOp::MultiSuperset,
        BinaryOp::ProperMultiSubset,
        BinaryOp::ProperMultiSuperset,
        BinaryOp::MultisetDisjoint,
        BinaryOp::MultisetUnion,
        BinaryOp::MultisetIntersection,
        BinaryOp::MultisetDifference,
        BinaryOp::InMultiset,
        BinaryOp::NotInMultiset,
        BinaryOp::MultisetCount,
        BinaryOp::SeqEq,
        BinaryOp::SeqNeq,
        BinaryOp::Prefix,
        BinaryOp::ProperPrefix,
        BinaryOp::Concat,
        BinaryOp::InSeq,
        BinaryOp::NotInSeq,
        BinaryOp::SeqSelect,
        BinaryOp::SeqTake,
        BinaryOp::SeqDrop,
        BinaryOp::MapEq,
        BinaryOp::MapNeq,
        BinaryOp::InMap,
        BinaryOp::NotInMap,
        BinaryOp::MapMerge,
        BinaryOp::MapSubtraction,
        BinaryOp::MapSelect,
    ];

    pub fn family(self) -> BinaryFamily {
        use BinaryOp::*;
        match self {
            Lt | Le | Ge | Gt | Add | Sub | Mul | Div | Mod => BinaryFamily::Numeric,
            Iff => BinaryFamily::Logical,
            Eq | Neq => BinaryFamily::Equality,
            BvAnd | BvOr | BvXor | BvShl | BvShr => BinaryFamily::BitVector,
            SetEq | SetNeq | Subset | Superset | ProperSubset | ProperSuperset | Disjoint
            | Union | Intersection | SetDifference | InSet | NotInSet => BinaryFamily::Set,
            MultisetEq | MultisetNeq | MultiSubset | MultiSuperset | ProperMultiSubset
            | ProperMultiSuperset | MultisetDisjoint | MultisetUnion | MultisetIntersection
            | MultisetDifference | InMultiset | NotInMultiset | MultisetCount => {
                BinaryFamily::Multiset
            }
            SeqEq | SeqNeq | Prefix | ProperPrefix | Concat | InSeq | NotInSeq | SeqSelect
            | SeqTake | SeqDrop => BinaryFamily::Seq,
            MapEq | MapNeq | InMap | NotInMap | MapMerge | MapSubtraction | MapSelect => {
                BinaryFamily::Map
            }
        }
    }

    pub fn mnemonic(self) -> &'static str {
        use BinaryOp::*;
        match self {
            Lt => "lt",
            Le => "le",
            Ge => "ge",
            Gt => "gt",
            Add => "add",
            Sub => "sub",
            Mul => "mul",
            Div => "div",
            Mod => "mod",
            Iff => "iff",
            Eq => "eq",
            Neq => "neq",
            BvAnd => "bv.and",
            BvOr => "bv.or",
            BvXor => "bv.xor",
            BvShl => "bv.shl",
            BvShr => "bv.shr",
            SetEq => "set.eq",
            SetNeq => "set.neq",
            Subset => "set.subset",
            Superset => "set.superset",
            ProperSubset => "set.proper_subset",
            ProperSuperset => "set.proper_superset",
            Disjoint => "set.disjoint",
            Union => "set.union",
            Intersection => "set.intersection",
            SetDifference => "set.difference",
            InSet => "set.in",
            NotInSet => "set.not_in",
            MultisetEq => "mset.eq",
            MultisetNeq => "mset.neq",
            MultiSubset => "mset.subset",
            MultiSuperset => "mset.superset",
            ProperMultiSubset => "mset.proper_subset",
            ProperMultiSuperset => "mset.proper_superset",
            MultisetDisjoint => "mset.disjoint",
            MultisetUnion => "mset.union",
            MultisetIntersection => "mset.intersection",
            MultisetDifference => "mset.difference",
            InMultiset => "mset.in",
            NotInMultiset => "mset.not_in",
            MultisetCount => "mset.count",
            SeqEq => "seq.eq",
            SeqNeq => "seq.neq",
            Prefix => "seq.prefix",
            ProperPrefix => "seq.proper_prefix",
            Concat => "seq.concat",
            InSeq => "seq.in",
            NotInSeq => "seq.not_in",
            SeqSelect => "seq.select",
            SeqTake => "seq.take",
            SeqDrop => "seq.drop",
            MapEq => "map.eq",
            MapNeq => "map.neq",
            InMap => "map.in",
            NotInMap => "map.not_in",
            MapMerge => "map.merge",
            MapSubtraction => "map.subtract",
            MapSelect => "map.select",
        }
    }
}

impl TernaryOp {
    pub const ALL: [TernaryOp; 4] = [
        TernaryOp::SeqUpdate,
        TernaryOp::SeqSubseq,
        TernaryOp::MultisetUpdate,
        TernaryOp::MapUpdate,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            TernaryOp::SeqUpdate => "seq.update",
            TernaryOp::SeqSubseq => "seq.subseq",
            TernaryOp::MultisetUpdate => "mset.update",
            TernaryOp::MapUpdate => "map.update",
        }
    }
}

impl CollectionKind {
    pub fn mnemonic(self) -> &'static str {
        match self {
            CollectionKind::Seq => "seq",
            CollectionKind::Set => "set",
            CollectionKind::Multiset => "mset",
            CollectionKind::Map => "map",
        }
    }
}
