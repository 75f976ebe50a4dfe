//! The single latched fault a compilation run can produce, and its
//! source-annotated rendering — adapted from the teacher's
//! `ParseError`/`display_with_source` (`src/error.rs`) and
//! `find_similar`/`KNOWN_WORDS` (`src/suggest.rs`), generalized from one
//! parse-error taxonomy to this language's three phases.

use std::io::IsTerminal;

use crate::style::Style;
use crate::suggest::{find_similar, KNOWN_WORDS};
use crate::token::Span;

/// Which phase latched the fault. Spec §7: a lexical fault discovered by
/// the scanner is wrapped by the parser as a `Syntax` fault; a syntax
/// fault short-circuits the analyzer entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lexical,
    Syntax,
    Semantic,
}

/// The one fault latched for a compilation run. Only the first fault of
/// the run is ever kept — later faults in the same or later phases are
/// silently dropped (spec §7's single-fault rule).
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub phase: Phase,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(phase: Phase, message: impl Into<String>, span: Span) -> Self {
        Diagnostic {
            phase,
            message: message.into(),
            span,
        }
    }

    /// Renders the fault against `source`: a line/column header, the
    /// offending source line, a caret underline, and (when the offending
    /// span looks like a bare word) a Levenshtein-based "did you mean"
    /// suggestion against the reserved-word list. Colorized only when
    /// standard output is a terminal.
    pub fn render(&self, source: &str) -> String {
        let (line_num, line_start, line_content) = self.find_context(source);
        let col = self.span.start.saturating_sub(line_start);
        let len = (self.span.end - self.span.start).max(1);
        let underline = format!("{}{}", " ".repeat(col), "^".repeat(len));

        let colorize = std::io::stdout().is_terminal();
        let label = style_if(colorize, Style::bold_red, "error");
        let line_num_str = style_if(colorize, Style::blue, &format!("{:4}", line_num));
        let pipe = style_if(colorize, Style::blue, "|");
        let underline_colored = style_if(colorize, Style::red, &underline);

        let mut result = format!(
            "{}: {}\n\n{} {} {}\n     {} {}",
            label, self.message, line_num_str, pipe, line_content, pipe, underline_colored
        );

        if let Some(word) = self.extract_word(source) {
            if let Some(suggestion) = find_similar(word, KNOWN_WORDS, 2) {
                let hint = style_if(colorize, Style::cyan, "help");
                let suggestion_colored = style_if(colorize, Style::green, suggestion);
                result.push_str(&format!(
                    "\n     {} {}: did you mean '{}'?",
                    pipe, hint, suggestion_colored
                ));
            }
        }

        result
    }

    fn extract_word<'a>(&self, source: &'a str) -> Option<&'a str> {
        if self.span.start < source.len() && self.span.end <= source.len() {
            let word = &source[self.span.start..self.span.end];
            if !word.is_empty() && word.chars().all(|c| c.is_alphabetic()) {
                return Some(word);
            }
        }
        None
    }

    fn find_context<'a>(&self, source: &'a str) -> (usize, usize, &'a str) {
        let mut line_num = 1;
        let mut line_start = 0;

        for (i, c) in source.char_indices() {
            if i >= self.span.start {
                break;
            }
            if c == '\n' {
                line_num += 1;
                line_start = i + 1;
            }
        }

        let line_end = source[line_start..]
            .find('\n')
            .map(|off| line_start + off)
            .unwrap_or(source.len());

        (line_num, line_start, &source[line_start..line_end])
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} error at line {}: {}", self.phase, self.span.line, self.message)
    }
}

fn style_if(enabled: bool, f: fn(&str) -> String, s: &str) -> String {
    if enabled {
        f(s)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_source_shows_line_and_underline() {
        let diag = Diagnostic::new(Phase::Syntax, "expected ';'", Span::new(1, 8, 14));
        let source = "All men mortal are.";
        let display = diag.render(source);
        assert!(display.contains("mortal"), "{}", display);
        assert!(display.contains("^^^^^^"), "{}", display);
    }

    #[test]
    fn display_with_source_suggests_typo_fix() {
        let diag = Diagnostic::new(Phase::Syntax, "unexpected token", Span::new(1, 0, 5));
        let source = "whiel x do skip end";
        let display = diag.render(source);
        assert!(display.contains("did you mean"), "{}", display);
        assert!(display.contains("while"), "{}", display);
    }

    #[test]
    fn display_shows_phase_and_line() {
        let diag = Diagnostic::new(Phase::Semantic, "undefined variable 'x'", Span::new(4, 0, 1));
        assert_eq!(
            diag.to_string(),
            "Semantic error at line 4: undefined variable 'x'"
        );
    }
}
