//! Common infrastructure shared by the front end and the analyzer

mod error;
mod span;

pub use error::{CompileError, CompileResult, DiagnosticReporter, fault_diagnostic};
pub use span::Span;
