//! Thin CLI: read a source file, run the pipeline, print the single
//! latched diagnostic (if any) rendered against the source. Exits 0 on a
//! clean analysis, non-zero otherwise (spec.md §6.4). Deliberately thin —
//! flag parsing and file I/O are scaffolding around the library, not a
//! feature surface this crate commits to.

use std::fs;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use robin_compiler::config::{CompilerOptions, OptimizationLevel, ParserKind, ScannerKind};
use robin_compiler::pipeline;

#[derive(Parser)]
#[command(name = "robinc")]
#[command(about = "Robin compiler front end", long_about = None)]
struct Cli {
    /// Path to a Robin source file.
    path: String,

    /// Which scanner implementation to run.
    #[arg(long, value_enum, default_value_t = Scanner::FiniteAutomaton)]
    scanner: Scanner,

    /// Which parser implementation to run.
    #[arg(long, value_enum, default_value_t = ParserChoice::RecursiveDescent)]
    parser: ParserChoice,

    /// Optimization level passed through unexamined to the code generator.
    #[arg(long, value_enum, default_value_t = Opt::O0)]
    opt: Opt,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Scanner {
    HandCoded,
    FiniteAutomaton,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ParserChoice {
    RecursiveDescent,
    Ll1,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Opt {
    O0,
    O1,
    O2,
    O3,
    Os,
    Oz,
}

impl From<Scanner> for ScannerKind {
    fn from(s: Scanner) -> Self {
        match s {
            Scanner::HandCoded => ScannerKind::HandCoded,
            Scanner::FiniteAutomaton => ScannerKind::FiniteAutomaton,
        }
    }
}

impl From<ParserChoice> for ParserKind {
    fn from(p: ParserChoice) -> Self {
        match p {
            ParserChoice::RecursiveDescent => ParserKind::RecursiveDescent,
            ParserChoice::Ll1 => ParserKind::Ll1,
        }
    }
}

impl From<Opt> for OptimizationLevel {
    fn from(o: Opt) -> Self {
        match o {
            Opt::O0 => OptimizationLevel::O0,
            Opt::O1 => OptimizationLevel::O1,
            Opt::O2 => OptimizationLevel::O2,
            Opt::O3 => OptimizationLevel::O3,
            Opt::Os => OptimizationLevel::Os,
            Opt::Oz => OptimizationLevel::Oz,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: couldn't read '{}': {}", cli.path, e);
            return ExitCode::FAILURE;
        }
    };

    let options = CompilerOptions::new(source)
        .with_scanner(cli.scanner.into())
        .with_parser(cli.parser.into())
        .with_optimization(cli.opt.into());

    let result = match pipeline::compile(&options) {
        Ok(result) => result,
        Err(diagnostic) => {
            eprintln!("{}", diagnostic.render(&options.source));
            return ExitCode::FAILURE;
        }
    };

    match result.diagnostic {
        Some(diagnostic) => {
            eprintln!("{}", diagnostic.render(&options.source));
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}
