//! Error types for interpretation

use derive_more::Display;
use trellis_ir::Identifier;

use crate::Value;

pub type EvalResult<T> = Result<T, EvalError>;

/// Failure of a single evaluation.
///
/// Every failure is terminal for the evaluation in progress: it propagates
/// through enclosing `Block`/`Apply`/`If` nodes without recovery.
#[derive(Display, Debug, Clone, PartialEq, Eq)]
#[display("{kind}")]
pub struct EvalError {
    kind: Box<EvalErrorKind>,
}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        EvalError {
            kind: Box::new(kind),
        }
    }
}

impl EvalError {
    pub fn kind(&self) -> &EvalErrorKind {
        &self.kind
    }

    pub(crate) fn out_of_fuel() -> Self {
        EvalErrorKind::OutOfFuel.into()
    }

    pub(crate) fn unbound_variable(name: &str) -> Self {
        EvalErrorKind::UnboundVariable(name.to_owned()).into()
    }

    pub(crate) fn type_mismatch(op: &'static str, expected: &'static str, found: &Value) -> Self {
        EvalErrorKind::TypeMismatch {
            op,
            expected,
            found: found.kind_name(),
        }
        .into()
    }

    pub(crate) fn arity_mismatch(expected: usize, found: usize) -> Self {
        EvalErrorKind::ArityMismatch { expected, found }.into()
    }

    pub(crate) fn duplicate_key(key: &Value) -> Self {
        EvalErrorKind::DuplicateKey(key.to_string()).into()
    }

    pub(crate) fn invalid(op: &'static str, reason: impl std::fmt::Display) -> Self {
        EvalErrorKind::InvalidOperation {
            op,
            reason: reason.to_string(),
        }
        .into()
    }
}

#[derive(Display, Debug, Clone, PartialEq, Eq)]
pub enum EvalErrorKind {
    #[display("out of fuel")]
    OutOfFuel,

    #[display("unbound variable: {_0}")]
    UnboundVariable(Identifier),

    #[display("type mismatch in {op}: expected {expected}, found {found}")]
    TypeMismatch {
        op: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[display("arity mismatch: expected {expected} arguments, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[display("duplicate key in map display: {_0}")]
    DuplicateKey(String),

    #[display("invalid operation in {op}: {reason}")]
    InvalidOperation { op: &'static str, reason: String },
}

impl std::error::Error for EvalError {}
