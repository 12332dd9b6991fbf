//! Access to the environment that secrets are read from.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The name of an environment variable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct Variable(String);

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("the environment variable {0} is not set")]
    NonExistentVariable(Variable),
    #[error("the environment variable {0} is not valid unicode")]
    VariableIsNotUnicode(Variable),
}

/// Somewhere to read variables from.
pub trait Environment {
    fn read(&self, variable: &Variable) -> Result<String, Error>;
}

impl<T: Environment> Environment for &T {
    fn read(&self, variable: &Variable) -> Result<String, Error> {
        (**self).read(variable)
    }
}

/// The environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn read(&self, variable: &Variable) -> Result<String, Error> {
        std::env::var(variable.as_str()).map_err(|err| match err {
            std::env::VarError::NotPresent => Error::NonExistentVariable(variable.clone()),
            std::env::VarError::NotUnicode(_) => Error::VariableIsNotUnicode(variable.clone()),
        })
    }
}

/// A fixed set of variables, for tests and tools that must not depend on
/// the process environment.
#[derive(Debug, Clone, Default)]
pub struct FixedEnvironment(BTreeMap<Variable, String>);

impl<const N: usize> From<[(String, String); N]> for FixedEnvironment {
    fn from(value: [(String, String); N]) -> Self {
        Self(
            value
                .into_iter()
                .map(|(name, value)| (Variable(name), value))
                .collect(),
        )
    }
}

impl Environment for FixedEnvironment {
    fn read(&self, variable: &Variable) -> Result<String, Error> {
        self.0
            .get(variable)
            .cloned()
            .ok_or_else(|| Error::NonExistentVariable(variable.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_environment_reads_only_what_it_was_given() {
        let environment = FixedEnvironment::from([("A".into(), "1".into())]);
        assert_eq!(environment.read(&Variable::new("A")).unwrap(), "1");
        assert!(matches!(
            environment.read(&Variable::new("B")),
            Err(Error::NonExistentVariable(_))
        ));
    }
}
