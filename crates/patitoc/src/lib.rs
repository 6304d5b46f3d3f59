//! Patito compiler front end - semantic analysis core
//!
//! This library checks programs written in Patito, a small imperative
//! teaching language with `int` and `float` variables, global and
//! function-local scopes, and void or value-returning functions.
//!
//! ## Architecture
//!
//! - **Sema** (`sema/`): function directory, variable scopes, type
//!   compatibility rules and the event-driven [`SemanticAnalyzer`]
//! - **Frontend** (`frontend/`): logos lexer and a recursive-descent parser
//!   that drives the analyzer
//! - **Driver** (`driver/`): runs a whole file and classifies the outcome
//! - **Common** (`common/`): spans, errors and diagnostic rendering
//! - **Types** (`types/`): the Patito type system and operators

pub mod common;
pub mod types;
pub mod sema;
pub mod frontend;
pub mod driver;

// Re-exports for convenience
pub use common::{CompileError, CompileResult, DiagnosticReporter, Span};
pub use sema::{Analysis, Dump, FatalError, Fault, FunctionRegistry, SemanticAnalyzer, SemanticFault};
pub use types::{BinaryOp, ExprType, ReturnType, Type, UnaryOp};
pub use driver::{DriverConfig, Outcome};
