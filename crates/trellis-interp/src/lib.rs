//! Reference interpreter for the Trellis IR.
//!
//! [`evaluate`] maps an expression, a fuel budget and an environment to a
//! value and the environment later siblings see, or to an [`EvalError`].

pub mod env;
pub mod error;
pub mod eval;
pub mod operators;
pub mod value;

pub use env::Env;
pub use error::{EvalError, EvalErrorKind, EvalResult};
pub use eval::{Fuel, call, evaluate, evaluate_seq};
pub use value::{Closure, MAX_BITVECTOR_WIDTH, Value};
