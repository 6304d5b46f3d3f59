//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use thiserror::Error;
use super::Span;
use crate::sema::{FatalError, Fault};

/// Error that stops the front end
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Lexer error at {span:?}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span:?}: {message}")]
    Parser { message: String, span: Span },

    #[error("Fatal analysis error at {span:?}: {error}")]
    Fatal { error: FatalError, span: Span },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn fatal(error: FatalError, span: Span) -> Self {
        Self::Fatal { error, span }
    }

    /// Lexer and parser errors are syntax errors; everything else is not
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Lexer { .. } | Self::Parser { .. })
    }

    pub fn to_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        match self {
            CompileError::Lexer { message, span } => Diagnostic::error()
                .with_message("Lexer error")
                .with_labels(vec![
                    Label::primary(file_id, span.range()).with_message(message)
                ]),

            CompileError::Parser { message, span } => Diagnostic::error()
                .with_message("Syntax error")
                .with_labels(vec![
                    Label::primary(file_id, span.range()).with_message(message)
                ]),

            CompileError::Fatal { error, span } => Diagnostic::bug()
                .with_message(format!("Analysis aborted: {}", error))
                .with_labels(vec![Label::primary(file_id, span.range())]),

            CompileError::Io(err) => {
                Diagnostic::error().with_message(format!("IO error: {}", err))
            }
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Diagnostic for a recoverable semantic fault
pub fn fault_diagnostic(file_id: usize, fault: &Fault) -> Diagnostic<usize> {
    Diagnostic::error()
        .with_message("Semantic error")
        .with_labels(vec![
            Label::primary(file_id, fault.span.range()).with_message(fault.error.to_string())
        ])
}

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self::with_color(ColorChoice::Auto)
    }

    pub fn with_color(color: ColorChoice) -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(color),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    pub fn report_error(&self, file_id: usize, error: &CompileError) {
        self.emit(&error.to_diagnostic(file_id));
    }

    pub fn report_fault(&self, file_id: usize, fault: &Fault) {
        self.emit(&fault_diagnostic(file_id, fault));
    }

    fn emit(&self, diagnostic: &Diagnostic<usize>) {
        if let Err(err) = term::emit(&mut self.writer.lock(), &self.config, &self.files, diagnostic) {
            log::warn!("failed to render diagnostic: {err}");
        }
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
