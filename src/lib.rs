//! Whole-program front end and middle end for Robin: scan, parse, and
//! semantically analyze a complete source file, producing an AST and at
//! most one latched [`error::Diagnostic`]. Single-threaded and synchronous
//! by design — no incremental or multi-file compilation.

pub mod analyzer;
pub mod ast;
pub mod config;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod pipeline;
pub mod scope;
pub mod style;
pub mod suggest;
pub mod symbol;
pub mod token;
pub mod typeck;

pub use config::{CompilerOptions, OptimizationLevel, ParserKind, ScannerKind};
pub use error::{Diagnostic, Phase};
pub use pipeline::{compile, AnalysisResult};
