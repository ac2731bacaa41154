//! Statement (command) nodes: the things a `;` can terminate.

use serde::Serialize;

use super::{
    expr::{Expr, Identifier},
    types::Type,
    Node,
};
use crate::lexer::Tok;

/// Bitmask flags combined in [`Source::join_type`]. Zero means "plain,
/// unjoined FROM-list element" — the first source in a FROM clause.
pub mod join_type {
    pub const INNER: u32 = 1;
    pub const CROSS: u32 = 2;
    pub const NATURAL: u32 = 4;
    pub const LEFT: u32 = 8;
    pub const RIGHT: u32 = 16;
    pub const OUTER: u32 = 32;
}

/// A possibly-schema-qualified name: `tbl`, `` `tbl` ``, `schema.tbl`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameRef {
    #[serde(rename = "NamePos")]
    pub name_pos: usize,
    #[serde(rename = "Schema")]
    pub schema: Option<String>,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "EndPos")]
    pub end_pos: usize,
}

impl NameRef {
    #[must_use]
    pub fn unqualified(name_pos: usize, name: String) -> Self {
        let end_pos = name_pos + name.len();
        Self {
            name_pos,
            schema: None,
            name,
            end_pos,
        }
    }

    /// `schema.name`, or just `name` when unqualified.
    #[must_use]
    pub fn full(&self) -> String {
        self.schema
            .as_ref()
            .map_or_else(|| self.name.clone(), |schema| format!("{schema}.{}", self.name))
    }

    #[must_use]
    pub fn database(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.name
    }
}

impl Node for NameRef {
    fn pos(&self) -> usize {
        self.name_pos
    }
    fn end(&self) -> usize {
        self.end_pos
    }
}

/// One projected column of a `SELECT` list: `expr [AS alias]`, or a bare `*`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectColumn {
    #[serde(rename = "Expr")]
    pub expr: Option<Expr>,
    #[serde(rename = "Star")]
    pub star: bool,
    #[serde(rename = "Alias")]
    pub alias: Option<Identifier>,
    #[serde(rename = "Pos")]
    pub pos: usize,
    #[serde(rename = "EndPos")]
    pub end_pos: usize,
}

impl Node for SelectColumn {
    fn pos(&self) -> usize {
        self.pos
    }
    fn end(&self) -> usize {
        self.end_pos
    }
}

/// `ASC` / `DESC` qualifier of an `ORDER BY` item. Defaults to ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderByItem {
    #[serde(rename = "Expr")]
    pub expr: Expr,
    #[serde(rename = "Direction")]
    pub direction: OrderDirection,
}

impl Node for OrderByItem {
    fn pos(&self) -> usize {
        self.expr.pos()
    }
    fn end(&self) -> usize {
        self.expr.end()
    }
}

/// `INDEXED BY name` / `NOT INDEXED` / no hint at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Indexed {
    None,
    By(Identifier),
    Not,
}

/// One element of a `FROM` clause: a table, a subquery, or a join of two
/// sources. Joins are represented by chaining `prior` rather than nesting a
/// binary tree, mirroring how the grammar accretes `JOIN` clauses left to
/// right.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Source {
    #[serde(rename = "Name")]
    pub name: Option<NameRef>,
    #[serde(rename = "Subquery")]
    pub subquery: Option<Box<Select>>,
    #[serde(rename = "Alias")]
    pub alias: Option<Identifier>,
    #[serde(rename = "Indexed")]
    pub indexed: Indexed,
    /// Bitmask of [`join_type`] flags; zero for the first, unjoined source.
    #[serde(rename = "JoinType")]
    pub join_type: u32,
    #[serde(rename = "JoinOn")]
    pub join_on: Option<Box<Expr>>,
    #[serde(rename = "JoinUsing")]
    pub join_using: Vec<Identifier>,
    #[serde(rename = "Prior")]
    pub prior: Option<Box<Source>>,
    #[serde(rename = "Pos")]
    pub pos: usize,
    #[serde(rename = "EndPos")]
    pub end_pos: usize,
}

impl Node for Source {
    fn pos(&self) -> usize {
        self.pos
    }
    fn end(&self) -> usize {
        self.end_pos
    }
}

/// A `SELECT` statement, including its `UNION`/`UNION ALL`/`EXCEPT`/`INTERSECT`
/// continuation chained through `prior`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Select {
    #[serde(rename = "SelectPos")]
    pub select_pos: usize,
    #[serde(rename = "Distinct")]
    pub distinct: bool,
    #[serde(rename = "All")]
    pub all: bool,
    #[serde(rename = "SelColList")]
    pub columns: Vec<SelectColumn>,
    #[serde(rename = "From")]
    pub from: Option<Source>,
    #[serde(rename = "Where")]
    pub where_clause: Option<Expr>,
    #[serde(rename = "GroupBy")]
    pub group_by: Vec<Expr>,
    #[serde(rename = "Having")]
    pub having: Option<Expr>,
    #[serde(rename = "OrderBy")]
    pub order_by: Vec<OrderByItem>,
    #[serde(rename = "Limit")]
    pub limit: Option<Expr>,
    #[serde(rename = "Offset")]
    pub offset: Option<Expr>,
    /// The set operator joining this block to the next, e.g. `Tok::UnionAll`.
    #[serde(rename = "PriorOp")]
    pub prior_op: Option<Tok>,
    #[serde(rename = "Prior")]
    pub prior: Option<Box<Select>>,
    #[serde(rename = "EndPos")]
    pub end_pos: usize,
}

impl Node for Select {
    fn pos(&self) -> usize {
        self.select_pos
    }
    fn end(&self) -> usize {
        self.end_pos
    }
}

/// `BEGIN` / `START TRANSACTION` / `COMMIT` / `ROLLBACK` / `END`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionMode {
    Deferred,
    Immediate,
    Exclusive,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    #[serde(rename = "OpPos")]
    pub op_pos: usize,
    #[serde(rename = "Op")]
    pub op: Tok,
    #[serde(rename = "Mode")]
    pub mode: Option<TransactionMode>,
    #[serde(rename = "EndPos")]
    pub end_pos: usize,
}

impl Node for Transaction {
    fn pos(&self) -> usize {
        self.op_pos
    }
    fn end(&self) -> usize {
        self.end_pos
    }
}

/// `SHOW DATABASES` / `SHOW TABLES`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Show {
    #[serde(rename = "OpPos")]
    pub op_pos: usize,
    #[serde(rename = "Kind")]
    pub kind: Tok,
    #[serde(rename = "EndPos")]
    pub end_pos: usize,
}

impl Node for Show {
    fn pos(&self) -> usize {
        self.op_pos
    }
    fn end(&self) -> usize {
        self.end_pos
    }
}

/// A standalone `--` or `/* */` comment parsed as its own command, preserved
/// verbatim including delimiters.
///
/// `block()`/`content()` keep the original's quirk of distinguishing the two
/// comment styles by delimiter length rather than a parsed flag: a 4-byte
/// minimum (`/**/`) says block, anything shorter is assumed to be a line
/// comment. Malformed input that is neither is treated as a line comment
/// rather than rejected, matching how the parser itself never constructs
/// anything else here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    #[serde(rename = "Pos")]
    pub pos: usize,
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "EndPos")]
    pub end_pos: usize,
}

impl Comment {
    #[must_use]
    pub fn is_block(&self) -> bool {
        self.text.starts_with("/*")
    }

    /// The comment body with its delimiters stripped.
    #[must_use]
    pub fn content(&self) -> &str {
        if self.is_block() {
            self.text
                .strip_prefix("/*")
                .and_then(|s| s.strip_suffix("*/"))
                .unwrap_or(&self.text)
        } else {
            self.text.strip_prefix("--").unwrap_or(&self.text)
        }
    }
}

impl Node for Comment {
    fn pos(&self) -> usize {
        self.pos
    }
    fn end(&self) -> usize {
        self.end_pos
    }
}

/// Conflict-resolution clause: `ON CONFLICT IGNORE`, `OR REPLACE`, etc.
/// Defaults to `Tok::Default` when the statement names no resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConflictAction {
    Ignore,
    Replace,
    Rollback,
    Abort,
    Fail,
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDefine {
    #[serde(rename = "Name")]
    pub name: Identifier,
    #[serde(rename = "Type")]
    pub ty: Type,
    #[serde(rename = "NotNull")]
    pub not_null: bool,
    #[serde(rename = "PrimaryKey")]
    pub primary_key: bool,
    #[serde(rename = "PrimaryKeyDesc")]
    pub primary_key_desc: bool,
    #[serde(rename = "AutoIncrement")]
    pub auto_increment: bool,
    #[serde(rename = "Unique")]
    pub unique: bool,
    #[serde(rename = "Check")]
    pub check: Option<Expr>,
    #[serde(rename = "Default")]
    pub default: Option<Expr>,
    #[serde(rename = "Collate")]
    pub collate: Option<Identifier>,
    #[serde(rename = "Conflict")]
    pub conflict: ConflictAction,
    #[serde(rename = "EndPos")]
    pub end_pos: usize,
}

impl Node for ColumnDefine {
    fn pos(&self) -> usize {
        self.name.pos()
    }
    fn end(&self) -> usize {
        self.end_pos
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateTable {
    #[serde(rename = "OpPos")]
    pub op_pos: usize,
    #[serde(rename = "IfNotExists")]
    pub if_not_exists: bool,
    #[serde(rename = "Temp")]
    pub temp: bool,
    #[serde(rename = "Name")]
    pub name: NameRef,
    #[serde(rename = "Columns")]
    pub columns: Vec<ColumnDefine>,
    /// Table-level `PRIMARY KEY (...)` / `UNIQUE (...)` / `CHECK (...)`.
    #[serde(rename = "TableConstraints")]
    pub table_constraints: Vec<Expr>,
    #[serde(rename = "AsSelect")]
    pub as_select: Option<Select>,
    #[serde(rename = "EndPos")]
    pub end_pos: usize,
}

impl Node for CreateTable {
    fn pos(&self) -> usize {
        self.op_pos
    }
    fn end(&self) -> usize {
        self.end_pos
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexDefine {
    #[serde(rename = "Name")]
    pub name: Identifier,
    #[serde(rename = "Direction")]
    pub direction: OrderDirection,
}

impl Node for IndexDefine {
    fn pos(&self) -> usize {
        self.name.pos()
    }
    fn end(&self) -> usize {
        self.name.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateIndex {
    #[serde(rename = "OpPos")]
    pub op_pos: usize,
    #[serde(rename = "Unique")]
    pub unique: bool,
    #[serde(rename = "IfNotExists")]
    pub if_not_exists: bool,
    #[serde(rename = "Name")]
    pub name: Identifier,
    #[serde(rename = "Table")]
    pub table: NameRef,
    #[serde(rename = "Columns")]
    pub columns: Vec<IndexDefine>,
    #[serde(rename = "EndPos")]
    pub end_pos: usize,
}

impl Node for CreateIndex {
    fn pos(&self) -> usize {
        self.op_pos
    }
    fn end(&self) -> usize {
        self.end_pos
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insert {
    #[serde(rename = "OpPos")]
    pub op_pos: usize,
    #[serde(rename = "Conflict")]
    pub conflict: ConflictAction,
    #[serde(rename = "Table")]
    pub table: NameRef,
    #[serde(rename = "Columns")]
    pub columns: Vec<Identifier>,
    #[serde(rename = "Values")]
    pub values: Vec<Expr>,
    #[serde(rename = "Select")]
    pub select: Option<Select>,
    #[serde(rename = "EndPos")]
    pub end_pos: usize,
}

impl Insert {
    /// True for `INSERT INTO tbl DEFAULT VALUES`.
    #[must_use]
    pub fn default_values(&self) -> bool {
        self.values.is_empty() && self.select.is_none()
    }
}

impl Node for Insert {
    fn pos(&self) -> usize {
        self.op_pos
    }
    fn end(&self) -> usize {
        self.end_pos
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetDefine {
    #[serde(rename = "Name")]
    pub name: Identifier,
    #[serde(rename = "Value")]
    pub value: Expr,
}

impl Node for SetDefine {
    fn pos(&self) -> usize {
        self.name.pos()
    }
    fn end(&self) -> usize {
        self.value.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Update {
    #[serde(rename = "OpPos")]
    pub op_pos: usize,
    #[serde(rename = "Conflict")]
    pub conflict: ConflictAction,
    #[serde(rename = "Table")]
    pub table: NameRef,
    #[serde(rename = "Indexed")]
    pub indexed: Indexed,
    #[serde(rename = "Set")]
    pub set: Vec<SetDefine>,
    #[serde(rename = "Where")]
    pub where_clause: Option<Expr>,
    #[serde(rename = "OrderBy")]
    pub order_by: Vec<OrderByItem>,
    #[serde(rename = "Limit")]
    pub limit: Option<Expr>,
    #[serde(rename = "Offset")]
    pub offset: Option<Expr>,
    #[serde(rename = "EndPos")]
    pub end_pos: usize,
}

impl Node for Update {
    fn pos(&self) -> usize {
        self.op_pos
    }
    fn end(&self) -> usize {
        self.end_pos
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Delete {
    #[serde(rename = "OpPos")]
    pub op_pos: usize,
    #[serde(rename = "Table")]
    pub table: NameRef,
    #[serde(rename = "Indexed")]
    pub indexed: Indexed,
    #[serde(rename = "Where")]
    pub where_clause: Option<Expr>,
    #[serde(rename = "OrderBy")]
    pub order_by: Vec<OrderByItem>,
    #[serde(rename = "Limit")]
    pub limit: Option<Expr>,
    #[serde(rename = "Offset")]
    pub offset: Option<Expr>,
    #[serde(rename = "EndPos")]
    pub end_pos: usize,
}

impl Node for Delete {
    fn pos(&self) -> usize {
        self.op_pos
    }
    fn end(&self) -> usize {
        self.end_pos
    }
}

/// Any top-level parsed command, i.e. one `;`-terminated unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "NodeType")]
pub enum Command {
    Select(Select),
    CreateTable(CreateTable),
    CreateIndex(CreateIndex),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
    Transaction(Transaction),
    Show(Show),
    Comment(Comment),
}

impl Node for Command {
    fn pos(&self) -> usize {
        match self {
            Self::Select(n) => n.pos(),
            Self::CreateTable(n) => n.pos(),
            Self::CreateIndex(n) => n.pos(),
            Self::Insert(n) => n.pos(),
            Self::Update(n) => n.pos(),
            Self::Delete(n) => n.pos(),
            Self::Transaction(n) => n.pos(),
            Self::Show(n) => n.pos(),
            Self::Comment(n) => n.pos(),
        }
    }

    fn end(&self) -> usize {
        match self {
            Self::Select(n) => n.end(),
            Self::CreateTable(n) => n.end(),
            Self::CreateIndex(n) => n.end(),
            Self::Insert(n) => n.end(),
            Self::Update(n) => n.end(),
            Self::Delete(n) => n.end(),
            Self::Transaction(n) => n.end(),
            Self::Show(n) => n.end(),
            Self::Comment(n) => n.end(),
        }
    }
}
