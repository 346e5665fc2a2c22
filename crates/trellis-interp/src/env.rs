//! Evaluation environments.

use im::OrdMap;
use trellis_ir::Identifier;

use crate::error::{EvalError, EvalResult};
use crate::Value;

/// Finite mapping from variable names to values.
///
/// Backed by a persistent map, so cloning is cheap and closures can capture
/// a snapshot by value without tying its lifetime to the defining scope.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Env {
    bindings: OrdMap<Identifier, Value>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> EvalResult<&Value> {
        self.bindings
            .get(name)
            .ok_or_else(|| EvalError::unbound_variable(name))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn bind(&mut self, name: impl Into<Identifier>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// A copy of this environment extended (and shadowed) by `bindings`.
    pub fn child(&self, bindings: impl IntoIterator<Item = (Identifier, Value)>) -> Env {
        let mut env = self.clone();
        for (name, value) in bindings {
            env.bind(name, value);
        }
        env
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Whether both environments bind exactly the same names.
    pub fn same_keys(&self, other: &Env) -> bool {
        self.len() == other.len() && self.bindings.keys().all(|k| other.contains(k))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Identifier, &Value)> {
        self.bindings.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.bindings.values()
    }
}

impl<S: Into<Identifier>> FromIterator<(S, Value)> for Env {
    fn from_iter<T: IntoIterator<Item = (S, Value)>>(iter: T) -> Self {
        let mut env = Env::new();
        for (name, value) in iter {
            env.bind(name, value);
        }
        env
    }
}
