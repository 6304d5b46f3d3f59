//! Semantic faults

use crate::common::Span;
use crate::types::{BinaryOp, ExprType, UnaryOp};
use thiserror::Error;

/// Problem in the analyzed program. Analysis continues after reporting one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticFault {
    #[error("function '{name}' is declared more than once")]
    DuplicateFunction { name: String },

    #[error("variable '{name}' is declared more than once in '{scope}'")]
    DuplicateVariable { name: String, scope: String },

    #[error("variable '{name}' is not declared")]
    UndeclaredVariable { name: String },

    #[error("function '{name}' is not declared")]
    UndeclaredFunction { name: String },

    #[error("incompatible operand types for operator '{op}': {left} {op} {right}")]
    IncompatibleOperands {
        op: BinaryOp,
        left: ExprType,
        right: ExprType,
    },

    #[error("incompatible operand type for unary '{op}': {operand}")]
    IncompatibleOperand { op: UnaryOp, operand: ExprType },

    #[error("incompatible assignment: {target} = {value}")]
    IncompatibleAssignment { target: ExprType, value: ExprType },
}

/// A reported fault together with where the driver said it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub error: SemanticFault,
    pub span: Span,
}

impl Fault {
    pub fn new(error: SemanticFault, span: Span) -> Self {
        Self { error, span }
    }
}

/// The driver broke the event protocol; the pass is aborted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FatalError {
    #[error("function '{name}' does not exist")]
    UnknownFunction { name: String },

    #[error("function '{inner}' starts before '{outer}' ends")]
    NestedFunction { outer: String, inner: String },

    #[error("function end without a matching start")]
    UnbalancedFunctionEnd,

    #[error("parameter declared outside of a function")]
    ParamOutsideFunction,

    #[error("analysis finished inside function '{name}'")]
    UnterminatedFunction { name: String },
}
