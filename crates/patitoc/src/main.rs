//! Patito semantic analyzer
//!
//! Usage: patitoc [OPTIONS] <input>

use anyhow::Context;
use clap::{Parser as ClapParser, ValueEnum};
use codespan_reporting::term::termcolor::ColorChoice;
use patito_compiler::common::DiagnosticReporter;
use patito_compiler::driver::{self, DriverConfig, Outcome};
use std::fs;
use std::path::PathBuf;
use std::process;

/// When to color diagnostics
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Default)]
enum Color {
    /// Color when writing to a terminal
    #[default]
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

impl From<Color> for ColorChoice {
    fn from(color: Color) -> Self {
        match color {
            Color::Auto => ColorChoice::Auto,
            Color::Always => ColorChoice::Always,
            Color::Never => ColorChoice::Never,
        }
    }
}

#[derive(ClapParser, Debug)]
#[command(name = "patitoc")]
#[command(author = "Patito Compiler Team")]
#[command(version)]
#[command(about = "Semantic analyzer for the Patito teaching language", long_about = None)]
struct Args {
    /// Input source file
    #[arg(required = true)]
    input: PathBuf,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,

    /// Do not print the function directory
    #[arg(long)]
    no_directory: bool,

    /// Diagnostic coloring
    #[arg(long, value_enum, default_value = "auto")]
    color: Color,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(outcome) => process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(Outcome::Aborted.exit_code());
        }
    }
}

/// `RUST_LOG` wins; otherwise `-v` enables analyzer debug output
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run(args: &Args) -> anyhow::Result<Outcome> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    let filename = args.input.display().to_string();

    println!("Analyzing {}", filename);

    let mut reporter = DiagnosticReporter::with_color(args.color.into());
    let config = DriverConfig {
        dump_tokens: args.dump_tokens,
        verbose: args.verbose,
    };

    let result = driver::run(&filename, &source, &config, &mut reporter);
    let outcome = Outcome::of(&result);

    if let Ok(analysis) = &result {
        if !args.no_directory {
            println!("\n===== Function directory =====");
            print!("{}", analysis.directory());
            println!("==============================");
        }
    }

    println!("\n{}", outcome.message());
    Ok(outcome)
}
