//! The typed abstract syntax tree produced by the parser.
//!
//! Nodes partition into commands and expressions; every node is a tagged
//! variant rather than a trait object, and exposes its extent through the
//! [`Node`] trait instead of Go-style interface polymorphism. All node
//! types derive [`serde::Serialize`] so a parsed tree can be pretty-printed
//! to JSON for golden-file comparison.

mod expr;
mod stmt;
mod types;

pub use expr::{
    BinaryExpr, CallExpr, CastExpr, Condition, ConditionBlock, Expr, ExprList, Identifier, Literal,
    Subquery, UnaryExpr,
};
pub use stmt::{
    join_type, Comment, Command, ConflictAction, CreateIndex, CreateTable, ColumnDefine, Delete,
    Indexed, IndexDefine, Insert, NameRef, OrderByItem, OrderDirection, Select, SelectColumn,
    SetDefine, Show, Source, Transaction, TransactionMode, Update,
};
pub use types::Type;

use crate::lexer::Span;

/// Every AST node exposes its byte extent: `pos() <= end()` always holds.
pub trait Node {
    /// Inclusive start offset.
    fn pos(&self) -> usize;
    /// Exclusive end offset (equal to `pos()` for zero-width nodes).
    fn end(&self) -> usize;

    /// Convenience: the node's full [`Span`].
    fn span(&self) -> Span {
        Span::new(self.pos(), self.end())
    }
}
