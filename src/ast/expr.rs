//! Expression nodes.
//!
//! Spans are computed, not trusted: every variant that the original grammar
//! built from a trailing token (a call's closing paren, a cast's closing
//! paren, the END of a CASE) carries its own `end_pos` set by the parser
//! rather than deriving `End()` from its last child, which is what let the
//! source implementation under-report spans for zero-arg calls and casts.

use serde::Serialize;

use super::{stmt::Select, types::Type, Node};
use crate::lexer::Tok;

/// A (possibly dotted, possibly quoted) name: `id`, `` `tbl` ``, `a.b`.
///
/// `name` is always stored with its back-tick delimiters (if any) already
/// stripped; `end_pos` is set by the parser rather than derived from
/// `name.len()` so that a quoted identifier's span still covers its two
/// delimiter bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    #[serde(rename = "NamePos")]
    pub name_pos: usize,
    #[serde(rename = "Name")]
    pub name: String,
    /// True if the source wrote this identifier back-tick quoted.
    #[serde(rename = "Quoted")]
    pub quoted: bool,
    #[serde(rename = "EndPos")]
    pub end_pos: usize,
}

impl Identifier {
    /// `name` must already have its back-tick delimiters stripped, if any.
    #[must_use]
    pub fn new(name_pos: usize, name: String, quoted: bool) -> Self {
        let end_pos = name_pos + name.len() + usize::from(quoted) * 2;
        Self {
            name_pos,
            name,
            quoted,
            end_pos,
        }
    }
}

impl Node for Identifier {
    fn pos(&self) -> usize {
        self.name_pos
    }
    fn end(&self) -> usize {
        self.end_pos
    }
}

/// A literal token: integer, float, string, or NULL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Literal {
    #[serde(rename = "ValuePos")]
    pub value_pos: usize,
    #[serde(rename = "Kind")]
    pub kind: Tok,
    /// Raw source text, unescaped and unquoted for strings.
    #[serde(rename = "Text")]
    pub text: String,
}

impl Literal {
    #[must_use]
    pub const fn new(value_pos: usize, kind: Tok, text: String) -> Self {
        Self {
            value_pos,
            kind,
            text,
        }
    }
}

impl Node for Literal {
    fn pos(&self) -> usize {
        self.value_pos
    }
    fn end(&self) -> usize {
        self.value_pos + self.text.len()
    }
}

/// Prefix (`-x`, `NOT x`) or postfix (`x IS NULL`, `x IS NOT NULL`) unary expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryExpr {
    #[serde(rename = "OpPos")]
    pub op_pos: usize,
    #[serde(rename = "Op")]
    pub op: Tok,
    #[serde(rename = "Operand")]
    pub operand: Box<Expr>,
    #[serde(rename = "Postfix")]
    pub postfix: bool,
    #[serde(rename = "EndPos")]
    pub end_pos: usize,
}

impl Node for UnaryExpr {
    /// For a postfix operator the operand comes first in the source, so the
    /// true start is whichever of the two offsets is smaller; for a prefix
    /// operator this is just `op_pos`.
    fn pos(&self) -> usize {
        self.op_pos.min(self.operand.pos())
    }
    fn end(&self) -> usize {
        self.end_pos
    }
}

/// A two-operand expression: arithmetic, comparison, logical, `LIKE`, `IN`, `.`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryExpr {
    #[serde(rename = "OpPos")]
    pub op_pos: usize,
    #[serde(rename = "Op")]
    pub op: Tok,
    #[serde(rename = "Lhs")]
    pub lhs: Box<Expr>,
    #[serde(rename = "Rhs")]
    pub rhs: Box<Expr>,
}

impl Node for BinaryExpr {
    fn pos(&self) -> usize {
        self.lhs.pos()
    }
    fn end(&self) -> usize {
        self.rhs.end()
    }
}

/// A function call: `COUNT(*)`, `SUM(DISTINCT x)`, `NOW()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallExpr {
    #[serde(rename = "Func")]
    pub func: Identifier,
    #[serde(rename = "Distinct")]
    pub distinct: bool,
    #[serde(rename = "Args")]
    pub args: Vec<Expr>,
    #[serde(rename = "EndPos")]
    pub end_pos: usize,
}

impl Node for CallExpr {
    fn pos(&self) -> usize {
        self.func.pos()
    }
    fn end(&self) -> usize {
        self.end_pos
    }
}

/// One `WHEN cond THEN result` arm of a `CASE` expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionBlock {
    #[serde(rename = "When")]
    pub when: Expr,
    #[serde(rename = "Then")]
    pub then: Expr,
}

impl Node for ConditionBlock {
    fn pos(&self) -> usize {
        self.when.pos()
    }
    fn end(&self) -> usize {
        self.then.end()
    }
}

/// `CASE [case] WHEN ... THEN ... [ELSE ...] END`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    #[serde(rename = "OpPos")]
    pub op_pos: usize,
    #[serde(rename = "Case")]
    pub case: Option<Box<Expr>>,
    #[serde(rename = "Blocks")]
    pub blocks: Vec<ConditionBlock>,
    #[serde(rename = "Else")]
    pub else_branch: Option<Box<Expr>>,
    #[serde(rename = "EndPos")]
    pub end_pos: usize,
}

impl Node for Condition {
    fn pos(&self) -> usize {
        self.op_pos
    }
    fn end(&self) -> usize {
        self.end_pos
    }
}

/// `CAST(expr AS type)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastExpr {
    #[serde(rename = "OpPos")]
    pub op_pos: usize,
    #[serde(rename = "Operand")]
    pub operand: Box<Expr>,
    #[serde(rename = "To")]
    pub to: Type,
    #[serde(rename = "EndPos")]
    pub end_pos: usize,
}

impl Node for CastExpr {
    fn pos(&self) -> usize {
        self.op_pos
    }
    fn end(&self) -> usize {
        self.end_pos
    }
}

/// A parenthesized, comma-separated expression list: the right-hand side of
/// `x IN (1, 2, 3)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExprList {
    #[serde(rename = "Items")]
    pub items: Vec<Expr>,
    #[serde(rename = "Lparen")]
    pub lparen: usize,
    #[serde(rename = "Rparen")]
    pub rparen: usize,
}

impl Node for ExprList {
    fn pos(&self) -> usize {
        self.lparen
    }
    fn end(&self) -> usize {
        self.rparen + 1
    }
}

/// A parenthesized `SELECT` used where an expression is expected: the
/// right-hand side of `x IN (SELECT ...)`, or a scalar subquery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subquery {
    #[serde(rename = "Select")]
    pub select: Box<Select>,
    #[serde(rename = "Lparen")]
    pub lparen: usize,
    #[serde(rename = "Rparen")]
    pub rparen: usize,
}

impl Node for Subquery {
    fn pos(&self) -> usize {
        self.lparen
    }
    fn end(&self) -> usize {
        self.rparen + 1
    }
}

/// Any parsed expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "NodeType")]
pub enum Expr {
    Identifier(Identifier),
    Literal(Literal),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Call(CallExpr),
    Condition(Condition),
    Cast(CastExpr),
    List(ExprList),
    Subquery(Subquery),
}

impl Node for Expr {
    fn pos(&self) -> usize {
        match self {
            Self::Identifier(n) => n.pos(),
            Self::Literal(n) => n.pos(),
            Self::Unary(n) => n.pos(),
            Self::Binary(n) => n.pos(),
            Self::Call(n) => n.pos(),
            Self::Condition(n) => n.pos(),
            Self::Cast(n) => n.pos(),
            Self::List(n) => n.pos(),
            Self::Subquery(n) => n.pos(),
        }
    }

    fn end(&self) -> usize {
        match self {
            Self::Identifier(n) => n.end(),
            Self::Literal(n) => n.end(),
            Self::Unary(n) => n.end(),
            Self::Binary(n) => n.end(),
            Self::Call(n) => n.end(),
            Self::Condition(n) => n.end(),
            Self::Cast(n) => n.end(),
            Self::List(n) => n.end(),
            Self::Subquery(n) => n.end(),
        }
    }
}
