//! Bottom-up rewriting of Trellis IR.
//!
//! # Overview
//!
//! - [`BottomUp`]: a local node rewrite plus the contract that makes its
//!   children-first application sound
//! - [`rewrite_bottom_up`]: drives one pass over a tree
//! - [`Rewriter`]: runs a sequence of passes over a [`Program`] and reports
//!   how many nodes each one changed
//! - [`check_contract`]: tests the pass obligations on concrete inputs
//!
//! [`Program`]: trellis_ir::Program

pub mod contract;
pub mod engine;
pub mod pass;
pub mod passes;

pub use contract::{ContractViolation, check_contract, check_contract_deep};
pub use engine::{
    PassReport, RewriteContext, RewriteOutcome, Rewriter, deep_post, rewrite_bottom_up,
    rewrite_with,
};
pub use pass::{BottomUp, RewriteResult};
