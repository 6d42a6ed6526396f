//! Check registry.
//!
//! Maps check names to a handler and the number of parameters it takes. The
//! driver builds one registry during startup, then only reads from it:
//! [`Registry::register`] needs `&mut self` while [`Registry::invoke`] takes
//! `&self`, so once the registry is shared it cannot change.

use crate::acquire::Host;
use crate::core::error::{Error, Result};
use crate::core::verdict::Verdict;
use std::collections::HashMap;

/// A check implementation. `parameters` always has the registered length.
pub type Handler = fn(&Host, &[String]) -> Result<Verdict>;

/// A registered check.
#[derive(Debug, Clone)]
pub struct CheckDefinition {
    /// Unique name the check is invoked by.
    pub name: String,
    /// Exact number of parameters the handler expects.
    pub parameter_count: usize,
    /// The implementation.
    pub handler: Handler,
}

/// Registry of checks, keyed by name.
#[derive(Debug, Default)]
pub struct Registry {
    checks: HashMap<String, CheckDefinition>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in check.
    #[must_use]
    pub fn with_builtin_checks() -> Self {
        let mut registry = Self::new();
        crate::checks::builtin::register_all(&mut registry);
        registry
    }

    /// Registers `handler` under `name`.
    ///
    /// Re-registering a name replaces the earlier definition (last write
    /// wins) and returns it.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: Handler,
        parameter_count: usize,
    ) -> Option<CheckDefinition> {
        let name = name.into();
        let definition = CheckDefinition {
            name: name.clone(),
            parameter_count,
            handler,
        };

        let previous = self.checks.insert(name, definition);
        if let Some(ref old) = previous {
            tracing::debug!(check = %old.name, "Replacing registered check");
        }
        previous
    }

    /// Looks up a check by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CheckDefinition> {
        self.checks.get(name)
    }

    /// Verifies that `name` exists and accepts `parameter_count` parameters.
    pub fn validate(&self, name: &str, parameter_count: usize) -> Result<&CheckDefinition> {
        let definition = self.get(name).ok_or_else(|| Error::UnknownCheck {
            name: name.to_string(),
        })?;

        if definition.parameter_count != parameter_count {
            return Err(Error::ArityMismatch {
                name: name.to_string(),
                expected: definition.parameter_count,
                actual: parameter_count,
            });
        }

        Ok(definition)
    }

    /// Invokes the check `name` against `host`.
    ///
    /// Fails with [`Error::UnknownCheck`] or [`Error::ArityMismatch`] before
    /// the handler runs; otherwise returns the handler's result unchanged.
    pub fn invoke(&self, host: &Host, name: &str, parameters: &[String]) -> Result<Verdict> {
        let definition = self.validate(name, parameters.len())?;
        tracing::debug!(check = name, ?parameters, "Invoking check");
        (definition.handler)(host, parameters)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.checks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
