//! Variable tables

use super::fault::SemanticFault;
use crate::types::Type;
use std::collections::HashMap;

/// A declared variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableEntry {
    pub name: String,
    pub ty: Type,
}

/// Variables of one function, or of the global scope, in declaration order
#[derive(Debug, Clone)]
pub struct VariableScope {
    owner: String,
    entries: Vec<VariableEntry>,
    index: HashMap<String, usize>,
}

impl VariableScope {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Declare `name`. A second declaration fails and keeps the first.
    pub fn declare(&mut self, name: &str, ty: Type) -> Result<(), SemanticFault> {
        if self.index.contains_key(name) {
            return Err(SemanticFault::DuplicateVariable {
                name: name.to_string(),
                scope: self.owner.clone(),
            });
        }
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push(VariableEntry {
            name: name.to_string(),
            ty,
        });
        Ok(())
    }

    /// Type of `name` in this scope only
    pub fn lookup(&self, name: &str) -> Option<Type> {
        self.index.get(name).map(|&i| self.entries[i].ty)
    }

    /// Read-only view in declaration order
    pub fn snapshot(&self) -> &[VariableEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
