//! Function directory
//!
//! Functions live in an append-only arena and are addressed by
//! [`FunctionId`]. Names are interned and only looked up at the boundary;
//! nothing is ever removed, so ids stay valid for the registry's lifetime.
//! The reserved `global` entry always sits at id 0 and holds the
//! file-scope variables.

use super::fault::{FatalError, SemanticFault};
use super::scope::{VariableEntry, VariableScope};
use crate::types::{ReturnType, Type};
use std::collections::HashMap;
use std::fmt;
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Name of the reserved entry holding file-scope variables
pub const GLOBAL: &str = "global";

/// Stable index of a function in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId(usize);

impl FunctionId {
    pub const GLOBAL: FunctionId = FunctionId(0);
}

/// A declared function: signature plus its local variables
#[derive(Debug, Clone)]
pub struct FunctionEntry {
    pub name: String,
    pub return_type: ReturnType,
    pub params: Vec<Type>,
    pub locals: VariableScope,
}

impl FunctionEntry {
    pub fn new(name: impl Into<String>, return_type: ReturnType) -> Self {
        let name = name.into();
        Self {
            locals: VariableScope::new(name.clone()),
            name,
            return_type,
            params: Vec::new(),
        }
    }

    fn summary(&self) -> FunctionSummary {
        FunctionSummary {
            name: self.name.clone(),
            return_type: self.return_type,
            params: self.params.clone(),
            variables: self.locals.snapshot().to_vec(),
        }
    }
}

/// All functions of one program, in declaration order
pub struct FunctionRegistry {
    functions: Vec<FunctionEntry>,
    names: DefaultStringInterner,
    index: HashMap<DefaultSymbol, FunctionId>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            functions: Vec::new(),
            names: DefaultStringInterner::new(),
            index: HashMap::new(),
        };
        registry.insert(FunctionEntry::new(GLOBAL, ReturnType::Void));
        registry
    }

    fn insert(&mut self, entry: FunctionEntry) -> FunctionId {
        let id = FunctionId(self.functions.len());
        let symbol = self.names.get_or_intern(&entry.name);
        self.index.insert(symbol, id);
        self.functions.push(entry);
        id
    }

    /// Register a new function with no parameters and no locals
    pub fn declare_function(
        &mut self,
        name: &str,
        return_type: ReturnType,
    ) -> Result<FunctionId, SemanticFault> {
        if self.id_of(name).is_some() {
            return Err(SemanticFault::DuplicateFunction {
                name: name.to_string(),
            });
        }
        Ok(self.insert(FunctionEntry::new(name, return_type)))
    }

    /// Append a parameter type to `function`'s signature
    pub fn add_param(&mut self, function: &str, ty: Type) -> Result<(), FatalError> {
        let id = self.require(function)?;
        self.functions[id.0].params.push(ty);
        Ok(())
    }

    pub fn id_of(&self, name: &str) -> Option<FunctionId> {
        let symbol = self.names.get(name)?;
        self.index.get(&symbol).copied()
    }

    fn require(&self, name: &str) -> Result<FunctionId, FatalError> {
        self.id_of(name).ok_or_else(|| FatalError::UnknownFunction {
            name: name.to_string(),
        })
    }

    pub fn get_function(&self, name: &str) -> Option<&FunctionEntry> {
        self.id_of(name).map(|id| &self.functions[id.0])
    }

    pub fn get_return_type(&self, name: &str) -> Result<ReturnType, FatalError> {
        let id = self.require(name)?;
        Ok(self.functions[id.0].return_type)
    }

    pub fn get_locals(&mut self, name: &str) -> Result<&mut VariableScope, FatalError> {
        let id = self.require(name)?;
        Ok(&mut self.functions[id.0].locals)
    }

    pub fn entry(&self, id: FunctionId) -> &FunctionEntry {
        &self.functions[id.0]
    }

    pub fn entry_mut(&mut self, id: FunctionId) -> &mut FunctionEntry {
        &mut self.functions[id.0]
    }

    pub fn global(&self) -> &VariableScope {
        &self.functions[FunctionId::GLOBAL.0].locals
    }

    /// Resolve `name` from inside `current_function`: its own scope first,
    /// then the global one. An unknown `current_function` only sees globals.
    pub fn resolve_variable(&self, name: &str, current_function: &str) -> Option<Type> {
        match self.id_of(current_function) {
            Some(id) => self.resolve_in(id, name),
            None => self.global().lookup(name),
        }
    }

    /// Id-based form of [`Self::resolve_variable`]
    pub fn resolve_in(&self, current: FunctionId, name: &str) -> Option<Type> {
        self.functions[current.0]
            .locals
            .lookup(name)
            .or_else(|| self.global().lookup(name))
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Snapshot of every function and its variables, in declaration order
    pub fn dump(&self) -> Dump {
        Dump(self.functions.iter().map(FunctionEntry::summary).collect())
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.functions).finish()
    }
}

/// One line of the function directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSummary {
    pub name: String,
    pub return_type: ReturnType,
    pub params: Vec<Type>,
    pub variables: Vec<VariableEntry>,
}

impl fmt::Display for FunctionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ret={}, params=[", self.name, self.return_type)?;
        for (i, ty) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{ty}")?;
        }
        f.write_str("], vars={")?;
        for (i, var) in self.variables.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}:{}", var.name, var.ty)?;
        }
        f.write_str("}}")
    }
}

/// Rendered function directory, one line per function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dump(pub Vec<FunctionSummary>);

impl Dump {
    pub fn functions(&self) -> &[FunctionSummary] {
        &self.0
    }
}

impl fmt::Display for Dump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for function in &self.0 {
            writeln!(f, "{function}")?;
        }
        Ok(())
    }
}
