//! Compiler configuration, ported from
//! `original_source/include/robin/core/options.h`. The original overloads
//! `CompilerOptions`'s constructor four ways; C++ overloading has no Rust
//! equivalent, so this exposes `Default` plus builder methods instead.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScannerKind {
    HandCoded,
    FiniteAutomaton,
}

impl Default for ScannerKind {
    fn default() -> Self {
        ScannerKind::FiniteAutomaton
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParserKind {
    RecursiveDescent,
    Ll1,
}

impl Default for ParserKind {
    fn default() -> Self {
        ParserKind::RecursiveDescent
    }
}

/// Passed through unexamined to the (external) code generator; the
/// analysis pipeline never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizationLevel {
    O0,
    O1,
    O2,
    O3,
    Os,
    Oz,
}

impl Default for OptimizationLevel {
    fn default() -> Self {
        OptimizationLevel::O0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerOptions {
    pub source: String,
    pub scanner: ScannerKind,
    pub parser: ParserKind,
    pub optimization: OptimizationLevel,
}

impl CompilerOptions {
    pub fn new(source: impl Into<String>) -> Self {
        CompilerOptions {
            source: source.into(),
            scanner: ScannerKind::default(),
            parser: ParserKind::default(),
            optimization: OptimizationLevel::default(),
        }
    }

    pub fn with_scanner(mut self, scanner: ScannerKind) -> Self {
        self.scanner = scanner;
        self
    }

    pub fn with_parser(mut self, parser: ParserKind) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_optimization(mut self, optimization: OptimizationLevel) -> Self {
        self.optimization = optimization;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_defaults() {
        let opts = CompilerOptions::new("program p is begin end");
        assert_eq!(opts.scanner, ScannerKind::FiniteAutomaton);
        assert_eq!(opts.parser, ParserKind::RecursiveDescent);
        assert_eq!(opts.optimization, OptimizationLevel::O0);
    }

    #[test]
    fn builder_methods_override_individually() {
        let opts = CompilerOptions::new("src")
            .with_scanner(ScannerKind::HandCoded)
            .with_parser(ParserKind::Ll1);
        assert_eq!(opts.scanner, ScannerKind::HandCoded);
        assert_eq!(opts.parser, ParserKind::Ll1);
    }
}
