//! Behavioral-equivalence oracle for the Trellis IR.
//!
//! Defines what it means for a rewrite to preserve meaning: two values,
//! environments or expressions are equivalent when no sampled observation
//! tells them apart. See [`oracle`] for how the sampling is bounded.

pub mod oracle;
pub mod probe;

pub use oracle::{Discrepancy, Oracle, OracleConfig, Outcome};
