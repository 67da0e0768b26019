use std::collections::HashMap;

use super::error::ScriptError;
use super::value::Value;

/// The persistent binding table shared by every line of one run.
/// Created fresh on start/restart, dropped when the run ends.
#[derive(Debug, Default)]
pub struct Env {
    vars: HashMap<String, Value>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// `let` binding. Redeclaring a name is an error.
    pub fn declare(&mut self, name: &str, value: Value) -> Result<(), ScriptError> {
        if self.vars.contains_key(name) {
            return Err(ScriptError::AlreadyDeclared(name.to_string()));
        }
        self.vars.insert(name.to_string(), value);
        Ok(())
    }

    /// Plain assignment. The name must already be declared.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), ScriptError> {
        match self.vars.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(ScriptError::UndefinedVariable(name.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Result<Value, ScriptError> {
        self.vars
            .get(name)
            .cloned()
            .ok_or_else(|| ScriptError::UndefinedVariable(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
