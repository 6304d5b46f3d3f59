//! Patito type system
//!
//! Two storable scalar types (`int`, `float`), the return types a function
//! may declare, and the wider attribute that flows through expressions
//! while they are being checked.

mod op;
mod value_type;

pub use op::{BinaryOp, OpClass, UnaryOp, UnknownOperator};
pub use value_type::{ExprType, ReturnType, Type};
