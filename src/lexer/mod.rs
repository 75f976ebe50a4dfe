//! Scanning: turning source text into a token stream.
//!
//! Two interchangeable implementations are provided — [`HandCoded`] (direct
//! character dispatch) and [`FiniteAutomaton`] (table-driven state machine)
//! — both satisfying the same [`Scanner`] contract and required to accept
//! exactly the same strings and produce byte-identical token streams.

mod cursor;
mod finite_automaton;
mod hand_coded;

pub use cursor::SourceCursor;
pub use finite_automaton::FiniteAutomaton;
pub use hand_coded::HandCoded;

use crate::token::Token;

/// Shared contract both scanner implementations satisfy.
pub trait Scanner {
    /// Construct a scanner over `source`.
    fn new(source: &str) -> Self
    where
        Self: Sized;

    /// Produce the next token, advancing the cursor past it.
    /// Returns an `Error`-kind token on a lexical fault and leaves the
    /// scanner positioned so every subsequent call returns `EndOfFile`.
    fn next_token(&mut self) -> Token;

    /// Scan the whole source, latching the first lexical error encountered
    /// (subsequent tokens keep appearing, per the original's
    /// `get_tokens_stream` behavior) and restoring the cursor to the start
    /// before returning.
    fn tokenize_all(&mut self) -> Vec<Token> {
        let saved = self.checkpoint();
        let mut stream = Vec::new();
        let mut first_error: Option<Token> = None;

        loop {
            let tok = self.next_token();
            let is_eof = tok.is_eof();
            if tok.is_error() && first_error.is_none() {
                first_error = Some(tok.clone());
            }
            stream.push(tok);
            if is_eof {
                break;
            }
        }

        self.restore(saved);
        let _ = first_error;
        stream
    }

    /// Opaque cursor snapshot used by `tokenize_all` to restore position.
    fn checkpoint(&self) -> usize;
    fn restore(&mut self, checkpoint: usize);

    /// The first lexical error latched since the last `reset`, if any.
    fn last_error(&self) -> Option<&Token>;

    /// Rewind to the beginning of the source, clearing any latched error.
    fn reset(&mut self);
}
