//! Analysis driver and pipeline orchestration

use crate::common::{CompileResult, DiagnosticReporter};
use crate::frontend::{Lexer, Parser};
use crate::sema::Analysis;
use std::fmt::Write as _;

/// Configuration options for one analysis run
#[derive(Debug, Clone, Default)]
pub struct DriverConfig {
    pub dump_tokens: bool,
    pub verbose: bool,
}

/// How a run ended, from the user's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No syntax and no semantic faults
    Correct,
    /// The pass completed but reported this many semantic faults
    SemanticErrors(usize),
    /// Lexing or parsing stopped the pass
    SyntaxErrors,
    /// The analyzer was driven out of protocol, or input could not be read
    Aborted,
}

impl Outcome {
    pub fn of(result: &CompileResult<Analysis>) -> Self {
        match result {
            Ok(analysis) if analysis.is_clean() => Outcome::Correct,
            Ok(analysis) => Outcome::SemanticErrors(analysis.faults.len()),
            Err(err) if err.is_syntax() => Outcome::SyntaxErrors,
            Err(_) => Outcome::Aborted,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Outcome::Correct => "analysis completed successfully",
            Outcome::SemanticErrors(_) => "analysis completed with semantic errors",
            Outcome::SyntaxErrors => "analysis finished with syntax errors",
            Outcome::Aborted => "fatal error during analysis",
        }
    }

    /// Process exit status for this outcome
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Correct => 0,
            Outcome::SemanticErrors(_) | Outcome::SyntaxErrors => 1,
            Outcome::Aborted => 2,
        }
    }
}

/// Token listing, one token per line
pub fn dump_tokens(source: &str) -> CompileResult<String> {
    let tokens = Lexer::new(source).tokenize_all()?;
    let mut output = String::new();
    for token in &tokens {
        let _ = writeln!(output, "{:>4}..{:<4} {}", token.span.start, token.span.end, token.kind);
    }
    Ok(output)
}

/// Run the front end over `source`, driving a fresh analyzer
pub fn analyze_source(source: &str, config: &DriverConfig) -> CompileResult<Analysis> {
    if config.dump_tokens {
        eprintln!("=== Tokens ===");
        eprint!("{}", dump_tokens(source)?);
        eprintln!("=== End Tokens ===\n");
    }

    if config.verbose {
        log::info!("Parsing and analyzing...");
    }
    let analysis = Parser::new(source)?.parse()?;

    if config.verbose {
        log::info!(
            "{} functions, {} semantic faults",
            analysis.registry.len(),
            analysis.faults.len()
        );
    }
    Ok(analysis)
}

/// Analyze a named source and render every problem through `reporter`
pub fn run(
    filename: &str,
    source: &str,
    config: &DriverConfig,
    reporter: &mut DiagnosticReporter,
) -> CompileResult<Analysis> {
    let file_id = reporter.add_file(filename, source);
    let result = analyze_source(source, config);

    match &result {
        Ok(analysis) => {
            for fault in &analysis.faults {
                reporter.report_fault(file_id, fault);
            }
        }
        Err(err) => reporter.report_error(file_id, err),
    }
    result
}
