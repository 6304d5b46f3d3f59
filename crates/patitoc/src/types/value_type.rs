//! Scalar, return and expression types

use std::fmt;

/// Type a variable or parameter can be declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Float,
}

impl Type {
    pub fn keyword(self) -> &'static str {
        match self {
            Type::Int => "int",
            Type::Float => "float",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Declared return type of a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnType {
    Void,
    Value(Type),
}

impl From<Type> for ReturnType {
    fn from(ty: Type) -> Self {
        ReturnType::Value(ty)
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnType::Void => f.write_str("void"),
            ReturnType::Value(ty) => ty.fmt(f),
        }
    }
}

/// Type attribute of an expression.
///
/// `Error` marks an expression whose type could not be established; it is
/// never stored in a scope and makes every enclosing check fail quietly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprType {
    Int,
    Float,
    /// String constant, only meaningful as a `print` argument
    Str,
    /// Result of calling a `void` function
    Void,
    Error,
}

impl ExprType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ExprType::Int | ExprType::Float)
    }

    pub fn is_error(self) -> bool {
        self == ExprType::Error
    }

    /// The storable type, if this is a numeric expression
    pub fn as_type(self) -> Option<Type> {
        match self {
            ExprType::Int => Some(Type::Int),
            ExprType::Float => Some(Type::Float),
            _ => None,
        }
    }
}

impl From<Type> for ExprType {
    fn from(ty: Type) -> Self {
        match ty {
            Type::Int => ExprType::Int,
            Type::Float => ExprType::Float,
        }
    }
}

impl From<ReturnType> for ExprType {
    fn from(ret: ReturnType) -> Self {
        match ret {
            ReturnType::Void => ExprType::Void,
            ReturnType::Value(ty) => ty.into(),
        }
    }
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExprType::Int => "int",
            ExprType::Float => "float",
            ExprType::Str => "string",
            ExprType::Void => "void",
            ExprType::Error => "<error>",
        };
        f.write_str(name)
    }
}
