//! Trellis: a verified-rewriting core for a small functional IR.
//!
//! The workspace is split the same way the data flows:
//!
//! - [`ir`]: expression trees, operators, printer and traversal
//! - [`interp`]: the fuel-bounded reference interpreter
//! - [`equiv`]: the behavioral-equivalence oracle
//! - [`rewrite`]: the bottom-up rewrite engine and its passes
//!
//! [`Pipeline`] ties them together for callers that just want to run the
//! standard passes over a program and evaluate the result.

pub mod pipeline;

pub use trellis_equiv as equiv;
pub use trellis_interp as interp;
pub use trellis_ir as ir;
pub use trellis_rewrite as rewrite;

pub use pipeline::{Pipeline, PipelineConfig, PipelineError};
