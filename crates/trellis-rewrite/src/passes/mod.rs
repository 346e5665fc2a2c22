//! Concrete bottom-up passes.

mod identity;
mod negated_binops;

pub use identity::Identity;
pub use negated_binops::{EliminateNegatedBinops, flip, is_negated};
