//! # akino-sql
//!
//! A hand-written lexer and Pratt-style recursive-descent parser for a
//! SQLite/MySQL-flavored SQL dialect, producing a typed, JSON-serializable
//! abstract syntax tree.
//!
//! ```rust
//! use akino_sql::parser::Parser;
//!
//! let mut parser = Parser::new("SELECT id, name FROM users WHERE active = 1;");
//! let command = parser.parse_command().unwrap();
//! let json = serde_json::to_string(&command).unwrap();
//! ```
//!
//! The crate has three layers:
//! - [`lexer`] — the scanner, turning source text into a token stream.
//! - [`ast`] — the node types the parser builds, each with a byte-offset
//!   [`ast::Node::pos`]/[`ast::Node::end`] span.
//! - [`parser`] — the recursive-descent + Pratt parser that ties the two
//!   together.

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::{Command, Expr, Node};
pub use lexer::{Lexer, Tok, TokenKind};
pub use parser::{ParseError, Parser};
