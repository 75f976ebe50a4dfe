//! Table-driven parser: an explicit stack machine over [`grammar`]'s
//! terminal/non-terminal/reduce symbols, conceptually ported from
//! `original_source/include/robin/syntax/ll1_parser.h`.

mod driver;
pub mod grammar;

pub use driver::Ll1;
