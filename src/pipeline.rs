//! Rewrite-then-evaluate pipeline.
//!
//! ## Stages
//!
//! ```text
//! Program
//!     │
//!     ▼
//! [check_contracts] ─► check_contract_deep per pass (optional)
//!     │
//!     ▼
//! eliminate-negated-binops ─► Program (positive operators only)
//!     │
//!     ▼
//! evaluate(body, fuel, env) ─► (Value, Env)
//! ```
//!
//! The pass list can be replaced with [`Pipeline::with_rewriter`]. All
//! budgets come from [`PipelineConfig`], which deserializes from any serde
//! format with missing fields filled from the defaults.

use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use trellis_equiv::{Oracle, OracleConfig};
use trellis_interp::{Env, EvalError, Fuel, Value, evaluate};
use trellis_ir::Program;
use trellis_rewrite::passes::EliminateNegatedBinops;
use trellis_rewrite::{ContractViolation, RewriteOutcome, Rewriter, check_contract_deep};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Fuel given to [`Pipeline::evaluate`].
    pub fuel: Fuel,
    /// Sampling budget for contract checks.
    pub oracle: OracleConfig,
    /// Check every pass contract at every node before running the pass.
    pub check_contracts: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fuel: 64,
            oracle: OracleConfig::default(),
            check_contracts: false,
        }
    }
}

#[derive(Debug, Display, Error, From)]
pub enum PipelineError {
    #[display("contract violation: {_0}")]
    Contract(ContractViolation),
    #[display("evaluation failed: {_0}")]
    Eval(EvalError),
}

pub struct Pipeline {
    config: PipelineConfig,
    oracle: Oracle,
    rewriter: Rewriter,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl Pipeline {
    /// Pipeline running the standard passes.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            oracle: Oracle::new(config.oracle.clone()),
            config,
            rewriter: Rewriter::new().add_pass(EliminateNegatedBinops),
        }
    }

    /// Replace the pass list.
    pub fn with_rewriter(mut self, rewriter: Rewriter) -> Self {
        self.rewriter = rewriter;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every pass over `program`.
    pub fn rewrite(&self, program: Program) -> Result<RewriteOutcome, PipelineError> {
        let outcome = if self.config.check_contracts {
            self.rewriter.try_apply(program, |pass, body| {
                debug!(pass = pass.name(), "checking contract");
                check_contract_deep(pass, &self.oracle, body)
            })?
        } else {
            self.rewriter.apply(program)
        };
        info!(
            passes = outcome.reports.len(),
            changes = outcome.total_changes(),
            "rewrite finished"
        );
        Ok(outcome)
    }

    /// Evaluate the program body with the configured fuel.
    pub fn evaluate(&self, program: &Program, env: &Env) -> Result<(Value, Env), PipelineError> {
        Ok(evaluate(&program.body, self.config.fuel, env)?)
    }

    /// Rewrite `program`, then evaluate the result.
    pub fn run(&self, program: Program, env: &Env) -> Result<(RewriteOutcome, Value), PipelineError> {
        let outcome = self.rewrite(program)?;
        let (value, _) = self.evaluate(&outcome.program, env)?;
        Ok((outcome, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_ir::{BinaryOp, Expr};

    #[test]
    fn default_pipeline_removes_negations() {
        let program = Program::new(Expr::binary(BinaryOp::Neq, Expr::int(3), Expr::int(4)));
        let (outcome, value) = Pipeline::default().run(program, &Env::new()).unwrap();
        insta::assert_snapshot!(outcome.program, @"(program (not (eq 3 4)))");
        assert_eq!(value, Value::Bool(true));
        assert_eq!(outcome.total_changes(), 1);
    }

    #[test]
    fn evaluation_errors_are_wrapped() {
        let program = Program::new(Expr::var("missing"));
        let err = Pipeline::default()
            .evaluate(&program, &Env::new())
            .unwrap_err();
        insta::assert_snapshot!(err, @"evaluation failed: unbound variable: missing");
    }

    #[test]
    fn empty_rewriter_keeps_program() {
        let body = Expr::binary(BinaryOp::NotInSeq, Expr::int(1), Expr::var("s"));
        let pipeline = Pipeline::default().with_rewriter(Rewriter::new());
        let outcome = pipeline.rewrite(Program::new(body.clone())).unwrap();
        assert_eq!(outcome.program.body, body);
        assert!(outcome.reports.is_empty());
    }
}
