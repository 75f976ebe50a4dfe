//! Parsing: turning a token stream into an [`ast::Source`] tree.
//!
//! Two interchangeable implementations are provided —
//! [`recursive_descent::RecursiveDescent`] (one method per non-terminal)
//! and [`ll1::Ll1`] (an explicit symbol-stack driver over a predictive
//! table with reduce markers) — both required to build the same tree for
//! the same valid input, and to latch the same first fault for the same
//! invalid input (spec §8 parser parity).

pub mod ll1;
pub mod recursive_descent;

pub use ll1::Ll1;
pub use recursive_descent::RecursiveDescent;

use crate::ast::Source;
use crate::error::Diagnostic;

pub trait Parser {
    fn parse(tokens: Vec<crate::token::Token>) -> Result<Source, Diagnostic>;
}
