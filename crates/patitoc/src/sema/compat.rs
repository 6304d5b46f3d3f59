//! Type compatibility rules
//!
//! Two rules make up the whole lattice: numeric operands widen to `float`
//! when either side is `float`, and assignment accepts identical types or
//! `float = int`. Nothing else coerces.

use crate::types::{BinaryOp, ExprType, OpClass, UnaryOp};

/// Result type of `left op right`, or `ExprType::Error`
pub fn result_of_operation(op: BinaryOp, left: ExprType, right: ExprType) -> ExprType {
    if !left.is_numeric() || !right.is_numeric() {
        return ExprType::Error;
    }

    let result = match op.class() {
        OpClass::Arithmetic => {
            if left == ExprType::Float || right == ExprType::Float {
                ExprType::Float
            } else {
                ExprType::Int
            }
        }
        // Truth values are ints.
        OpClass::Relational => ExprType::Int,
    };
    log::trace!("{left} {op} {right} -> {result}");
    result
}

/// Result type of `target = value`, or `ExprType::Error`
pub fn result_of_assignment(target: ExprType, value: ExprType) -> ExprType {
    match (target, value) {
        (ExprType::Int, ExprType::Int) => ExprType::Int,
        (ExprType::Float, ExprType::Float | ExprType::Int) => ExprType::Float,
        _ => ExprType::Error,
    }
}

/// Result type of a signed operand; the sign never changes the type
pub fn result_of_unary(_op: UnaryOp, operand: ExprType) -> ExprType {
    if operand.is_numeric() {
        operand
    } else {
        ExprType::Error
    }
}
