//! Behavioral equivalence of values, environments and expressions.
//!
//! Closures are compared extensionally, which in general quantifies over
//! infinitely many argument lists and fuel levels. The oracle makes this
//! executable in two ways:
//!
//! - Every relation takes an explicit depth index. Comparing closures at
//!   depth `d` compares their results at depth `d - 1`, and at depth 0 any
//!   two closures of equal arity are related. Recursion therefore stops
//!   even when closures capture other closures.
//! - The quantifiers range over finite samples: fuel levels up to
//!   [`OracleConfig::max_fuel`], argument lists drawn from probe values
//!   whose complexity is below the current depth, and environments built
//!   from the same probes.
//!
//! Failures are compared coarsely: any two failed evaluations are related,
//! whatever their reason.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use trellis_interp::{Closure, Env, EvalResult, Fuel, Value, call, evaluate};
use trellis_ir::Expr;

use crate::probe;

/// Outcome of a single evaluation.
pub type Outcome = EvalResult<(Value, Env)>;

/// Sampling budget of an [`Oracle`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Depth index used by the top-level comparisons.
    pub depth: usize,
    /// Every fuel level in `0..=max_fuel` is tried.
    pub max_fuel: Fuel,
    /// Cap on argument lists per closure comparison and on generated
    /// environments per expression comparison.
    pub max_arg_tuples: usize,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            max_fuel: 3,
            max_arg_tuples: 64,
        }
    }
}

/// Why two expressions were found inequivalent.
#[derive(Clone, Debug, PartialEq)]
pub enum Discrepancy {
    /// The first expression is interpretable but the second is not.
    NotInterpretable,
    /// The two evaluations produced unrelated outcomes.
    Diverged {
        fuel: Fuel,
        env: Env,
        left: Outcome,
        right: Outcome,
    },
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discrepancy::NotInterpretable => f.write_str("rewritten expression is not interpretable"),
            Discrepancy::Diverged {
                fuel,
                env,
                left,
                right,
            } => {
                write!(f, "outcomes diverge at fuel {fuel} in {{")?;
                for (i, (name, value)) in env.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name} = {value}")?;
                }
                write!(f, "}}: ")?;
                write_outcome(f, left)?;
                f.write_str(" vs ")?;
                write_outcome(f, right)
            }
        }
    }
}

fn write_outcome(f: &mut fmt::Formatter<'_>, outcome: &Outcome) -> fmt::Result {
    match outcome {
        Ok((value, _)) => write!(f, "{value}"),
        Err(err) => write!(f, "error ({err})"),
    }
}

/// Bounded, executable equivalence oracle.
#[derive(Clone, Debug)]
pub struct Oracle {
    config: OracleConfig,
    probes: Vec<Value>,
    envs: Option<Vec<Env>>,
}

impl Default for Oracle {
    fn default() -> Self {
        Self::new(OracleConfig::default())
    }
}

impl Oracle {
    pub fn new(config: OracleConfig) -> Self {
        Self {
            config,
            probes: probe::default_probes(),
            envs: None,
        }
    }

    /// Replace the probe values used for closure arguments and generated
    /// environments.
    pub fn with_probes(mut self, probes: Vec<Value>) -> Self {
        self.probes = probes;
        self
    }

    /// Compare expressions in exactly these environments instead of ones
    /// generated over their free variables.
    pub fn with_envs(mut self, envs: Vec<Env>) -> Self {
        self.envs = Some(envs);
        self
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    // =========================================================================
    // Values and environments
    // =========================================================================

    /// `eq_value` at the configured depth.
    pub fn values_equivalent(&self, left: &Value, right: &Value) -> bool {
        self.eq_value(left, right, self.config.depth)
    }

    pub fn eq_value(&self, left: &Value, right: &Value, depth: usize) -> bool {
        match (left, right) {
            (Value::Seq(xs), Value::Seq(ys)) => {
                xs.len() == ys.len()
                    && xs.iter().zip(ys.iter()).all(|(x, y)| self.eq_value(x, y, depth))
            }
            (Value::Map(xs), Value::Map(ys)) => {
                xs.len() == ys.len()
                    && xs.iter().all(|(k, x)| match ys.get(k) {
                        Some(y) => self.eq_value(x, y, depth),
                        None => false,
                    })
            }
            (Value::Closure(f), Value::Closure(g)) => self.eq_closure(f, g, depth),
            // Scalars, sets and multisets hold no closures.
            _ => left == right,
        }
    }

    /// Same names bound, related values pointwise.
    pub fn eq_env(&self, left: &Env, right: &Env, depth: usize) -> bool {
        left.same_keys(right)
            && left.iter().all(|(name, value)| match right.get(name) {
                Some(other) => self.eq_value(value, other, depth),
                None => false,
            })
    }

    /// Both failed, or both succeeded with related values and environments.
    pub fn eq_outcome(&self, left: &Outcome, right: &Outcome, depth: usize) -> bool {
        match (left, right) {
            (Err(_), Err(_)) => true,
            (Ok((v, env)), Ok((w, env2))) => {
                self.eq_value(v, w, depth) && self.eq_env(env, env2, depth)
            }
            _ => false,
        }
    }

    fn eq_closure(&self, f: &Closure, g: &Closure, depth: usize) -> bool {
        if f.arity() != g.arity() {
            return false;
        }
        if depth == 0 {
            return true;
        }
        let pool: Vec<Value> = self
            .probes
            .iter()
            .filter(|p| p.complexity() < depth)
            .cloned()
            .collect();
        let callee_f = Value::Closure(f.clone());
        let callee_g = Value::Closure(g.clone());
        for args in probe::tuples(&pool, f.arity(), self.config.max_arg_tuples) {
            for fuel in 0..=self.config.max_fuel {
                let left = call(&callee_f, args.clone(), fuel);
                let right = call(&callee_g, args.clone(), fuel);
                let related = match (&left, &right) {
                    (Err(_), Err(_)) => true,
                    (Ok(v), Ok(w)) => self.eq_value(v, w, depth - 1),
                    _ => false,
                };
                if !related {
                    return false;
                }
            }
        }
        true
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Whether `after` behaves like `before` in every sampled environment
    /// and at every sampled fuel level.
    ///
    /// Vacuously true when `before` is not interpretable.
    pub fn eq_interp(&self, before: &Expr, after: &Expr) -> bool {
        self.find_discrepancy(before, after).is_none()
    }

    /// The first sampled evaluation on which `before` and `after` disagree.
    pub fn find_discrepancy(&self, before: &Expr, after: &Expr) -> Option<Discrepancy> {
        if !before.supports_interp() {
            return None;
        }
        if !after.supports_interp() {
            debug!(%after, "rewritten expression is not interpretable");
            return Some(Discrepancy::NotInterpretable);
        }

        let envs = match &self.envs {
            Some(envs) => envs.clone(),
            None => self.environments_for(before, after),
        };
        let depth = self.config.depth;
        for env in &envs {
            for fuel in 0..=self.config.max_fuel {
                let left = evaluate(before, fuel, env);
                let right = evaluate(after, fuel, env);
                if !self.eq_outcome(&left, &right, depth) {
                    debug!(%before, %after, fuel, "outcomes diverge");
                    return Some(Discrepancy::Diverged {
                        fuel,
                        env: env.clone(),
                        left,
                        right,
                    });
                }
            }
        }
        None
    }

    /// Environments over the free variables of both expressions, filled
    /// with probes below the configured depth.
    fn environments_for(&self, before: &Expr, after: &Expr) -> Vec<Env> {
        let names: BTreeSet<_> = before.free_vars().into_iter().chain(after.free_vars()).collect();
        let pool: Vec<Value> = self
            .probes
            .iter()
            .filter(|p| p.complexity() < self.config.depth)
            .cloned()
            .collect();
        probe::environments(&names, &pool, self.config.max_arg_tuples)
    }
}
