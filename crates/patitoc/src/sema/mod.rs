//! Semantic analysis module
//!
//! Scope-aware symbol tables plus the type compatibility rules. The
//! [`SemanticAnalyzer`] is driven by a front end, one event per recognized
//! construct, and accumulates every recoverable fault it finds in a pass.

mod analyzer;
pub mod compat;
mod fault;
mod registry;
mod scope;

pub use analyzer::{Analysis, SemanticAnalyzer};
pub use fault::{FatalError, Fault, SemanticFault};
pub use registry::{Dump, FunctionEntry, FunctionId, FunctionRegistry, FunctionSummary, GLOBAL};
pub use scope::{VariableEntry, VariableScope};
