//! Token tags and the static keyword table.
//!
//! The variant order below is load-bearing: every tag serializes to JSON as
//! its ordinal position in this list, and golden-file tests compare that
//! output byte-for-byte. Insert new tags only at the end.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;

/// The kind of a token, independent of its specific tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// Punctuation and symbolic operators (`+`, `<=`, `IS NULL`, `UNION ALL`, …).
    Operator,
    /// A reserved word, matched case-insensitively.
    Keyword,
    /// One of the literal families (`identifier`, `integer`, `float`, `string`, `comment`).
    Literal,
    /// `ILLEGAL` or `EOF`.
    Mark,
}

/// A token tag.
///
/// Discriminants are implicit and sequential, starting at zero, mirroring
/// the original `iota`-numbered enum this dialect was distilled from. Do not
/// reorder existing variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u16")]
pub enum Tok {
    Illegal,
    Eof,
    Comment,

    Select,
    Insert,
    Update,
    Create,
    Delete,
    Drop,
    From,
    Where,
    Group,
    Asc,
    Desc,
    Order,
    Having,
    Limit,
    Offset,
    Table,
    Distinct,
    All,
    Union,
    UnionAll,
    Except,
    Intersect,
    Temp,
    If,
    Exists,
    Primary,
    Key,
    Unique,
    Check,
    Autoincr,
    Collate,
    Index,
    Into,
    Values,
    Set,

    // Source
    Using,
    Indexed,
    By,
    Inner,
    Cross,
    Natural,
    Left,
    Right,
    Outer,
    Join,
    On,

    // Misc command
    Show,
    Databases,
    Tables,
    Start,
    Begin,
    Transaction,
    Commit,
    End,
    Rollback,
    Deferred,
    Immediate,
    Exclusive,
    Ignore,
    Default,
    Replace,
    Abort,
    Fail,
    Conflict,

    Id,
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    Null,

    In,
    Is,
    IsNull,
    IsNotNull,

    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    Slash,
    Star,
    Plus,
    Minus,

    Comma,
    Dot,
    Semi,
    Lparen,
    Rparen,

    // Logic operators
    And,
    Or,
    Not,

    // Condition
    Case,
    When,
    Then,
    Else,

    // Other operators
    Like,
    Cast,
    As,

    // Row types
    Bit,
    Tinyint,
    Bool,
    Boolean,
    Smallint,
    Mediumint,
    Int,
    Integer,
    Bigint,
    Float,
    Double,
    Decimal,
    Date,
    Datetime,
    Timestamp,
    Time,
    Year,
    Char,
    Varchar,
    Binary,
    Varbinary,
    Tinyblob,
    Tinytext,
    Blob,
    Text,
    Mediumblob,
    Mediumtext,
    Longblob,
    Longtext,
    Unsigned,
}

struct Meta {
    text: &'static str,
    kind: TokenKind,
}

const fn m(text: &'static str, kind: TokenKind) -> Meta {
    Meta { text, kind }
}

/// Declared-order metadata table; index == `Tok as u16`.
static METADATA: &[Meta] = &[
    m("illegal", TokenKind::Mark),
    m("EOF", TokenKind::Mark),
    m("comment", TokenKind::Literal),
    m("SELECT", TokenKind::Keyword),
    m("INSERT", TokenKind::Keyword),
    m("UPDATE", TokenKind::Keyword),
    m("CREATE", TokenKind::Keyword),
    m("DELETE", TokenKind::Keyword),
    m("DROP", TokenKind::Keyword),
    m("FROM", TokenKind::Keyword),
    m("WHERE", TokenKind::Keyword),
    m("GROUP", TokenKind::Keyword),
    m("ASC", TokenKind::Keyword),
    m("DESC", TokenKind::Keyword),
    m("ORDER", TokenKind::Keyword),
    m("HAVING", TokenKind::Keyword),
    m("LIMIT", TokenKind::Keyword),
    m("OFFSET", TokenKind::Keyword),
    m("TABLE", TokenKind::Keyword),
    m("DISTINCT", TokenKind::Keyword),
    m("ALL", TokenKind::Keyword),
    m("UNION", TokenKind::Keyword),
    m("UNION ALL", TokenKind::Operator),
    m("EXCEPT", TokenKind::Keyword),
    m("INTERSECT", TokenKind::Keyword),
    m("TEMP", TokenKind::Keyword),
    m("IF", TokenKind::Keyword),
    m("EXISTS", TokenKind::Keyword),
    m("PRIMARY", TokenKind::Keyword),
    m("KEY", TokenKind::Keyword),
    m("UNIQUE", TokenKind::Keyword),
    m("CHECK", TokenKind::Keyword),
    m("AUTOINCR", TokenKind::Keyword),
    m("COLLATE", TokenKind::Keyword),
    m("INDEX", TokenKind::Keyword),
    m("INTO", TokenKind::Keyword),
    m("VALUES", TokenKind::Keyword),
    m("SET", TokenKind::Keyword),
    m("USING", TokenKind::Keyword),
    m("INDEXED", TokenKind::Keyword),
    m("BY", TokenKind::Keyword),
    m("INNER", TokenKind::Keyword),
    m("CROSS", TokenKind::Keyword),
    m("NATURAL", TokenKind::Keyword),
    m("LEFT", TokenKind::Keyword),
    m("RIGHT", TokenKind::Keyword),
    m("OUTER", TokenKind::Keyword),
    m("JOIN", TokenKind::Keyword),
    m("ON", TokenKind::Keyword),
    m("SHOW", TokenKind::Keyword),
    m("DATABASES", TokenKind::Keyword),
    m("TABLES", TokenKind::Keyword),
    m("START", TokenKind::Keyword),
    m("BEGIN", TokenKind::Keyword),
    m("TRANSACTION", TokenKind::Keyword),
    m("COMMIT", TokenKind::Keyword),
    m("END", TokenKind::Keyword),
    m("ROLLBACK", TokenKind::Keyword),
    m("DEFERRED", TokenKind::Keyword),
    m("IMMEDIATE", TokenKind::Keyword),
    m("EXCLUSIVE", TokenKind::Keyword),
    m("IGNORE", TokenKind::Keyword),
    m("DEFAULT", TokenKind::Keyword),
    m("REPLACE", TokenKind::Keyword),
    m("ABORT", TokenKind::Keyword),
    m("FAIL", TokenKind::Keyword),
    m("CONFLICT", TokenKind::Keyword),
    m("identifier", TokenKind::Literal),
    m("integer", TokenKind::Literal),
    m("float", TokenKind::Literal),
    m("string", TokenKind::Literal),
    m("NULL", TokenKind::Keyword),
    m("IN", TokenKind::Keyword),
    m("IS", TokenKind::Keyword),
    m("IS NULL", TokenKind::Operator),
    m("IS NOT NULL", TokenKind::Operator),
    m("=", TokenKind::Operator),
    m("<>", TokenKind::Operator),
    m("<", TokenKind::Operator),
    m("<=", TokenKind::Operator),
    m(">", TokenKind::Operator),
    m(">=", TokenKind::Operator),
    m("/", TokenKind::Operator),
    m("*", TokenKind::Operator),
    m("+", TokenKind::Operator),
    m("-", TokenKind::Operator),
    m(",", TokenKind::Operator),
    m(".", TokenKind::Operator),
    m(";", TokenKind::Operator),
    m("(", TokenKind::Operator),
    m(")", TokenKind::Operator),
    m("AND", TokenKind::Keyword),
    m("OR", TokenKind::Keyword),
    m("NOT", TokenKind::Keyword),
    m("CASE", TokenKind::Keyword),
    m("WHEN", TokenKind::Keyword),
    m("THEN", TokenKind::Keyword),
    m("ELSE", TokenKind::Keyword),
    m("LIKE", TokenKind::Keyword),
    m("CAST", TokenKind::Keyword),
    m("AS", TokenKind::Keyword),
    m("BIT", TokenKind::Keyword),
    m("TINYINT", TokenKind::Keyword),
    m("BOOL", TokenKind::Keyword),
    m("BOOLEAN", TokenKind::Keyword),
    m("SMALLINT", TokenKind::Keyword),
    m("MEDIUMINT", TokenKind::Keyword),
    m("INT", TokenKind::Keyword),
    m("INTEGER", TokenKind::Keyword),
    m("BIGINT", TokenKind::Keyword),
    m("FLOAT", TokenKind::Keyword),
    m("DOUBLE", TokenKind::Keyword),
    m("DECIMAL", TokenKind::Keyword),
    m("DATE", TokenKind::Keyword),
    m("DATETIME", TokenKind::Keyword),
    m("TIMESTAMP", TokenKind::Keyword),
    m("TIME", TokenKind::Keyword),
    m("YEAR", TokenKind::Keyword),
    m("CHAR", TokenKind::Keyword),
    m("VARCHAR", TokenKind::Keyword),
    m("BINARY", TokenKind::Keyword),
    m("VARBINARY", TokenKind::Keyword),
    m("TINYBLOB", TokenKind::Keyword),
    m("TINYTEXT", TokenKind::Keyword),
    m("BLOB", TokenKind::Keyword),
    m("TEXT", TokenKind::Keyword),
    m("MEDIUMBLOB", TokenKind::Keyword),
    m("MEDIUMTEXT", TokenKind::Keyword),
    m("LONGBLOB", TokenKind::Keyword),
    m("LONGTEXT", TokenKind::Keyword),
    m("UNSIGNED", TokenKind::Keyword),
];

impl Tok {
    /// True for prefix unary operators: unary `-` and `NOT`.
    #[must_use]
    pub const fn is_prefix(self) -> bool {
        matches!(self, Self::Minus | Self::Not)
    }

    /// True only for `IS`, the sole postfix operator (`IS [NOT] NULL`).
    #[must_use]
    pub const fn is_postfix(self) -> bool {
        matches!(self, Self::Is)
    }

    /// Display text as declared in the metadata table (uppercase for keywords).
    #[must_use]
    pub fn text(self) -> &'static str {
        METADATA[self as usize].text
    }

    /// The coarse kind this tag belongs to.
    #[must_use]
    pub fn kind(self) -> TokenKind {
        METADATA[self as usize].kind
    }
}

impl fmt::Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl From<Tok> for u16 {
    fn from(tok: Tok) -> Self {
        tok as u16
    }
}

#[rustfmt::skip]
static ALL_TOKENS: &[Tok] = &[
    Tok::Illegal, Tok::Eof, Tok::Comment,
    Tok::Select, Tok::Insert, Tok::Update, Tok::Create, Tok::Delete, Tok::Drop, Tok::From,
    Tok::Where, Tok::Group, Tok::Asc, Tok::Desc, Tok::Order, Tok::Having, Tok::Limit, Tok::Offset,
    Tok::Table, Tok::Distinct, Tok::All, Tok::Union, Tok::UnionAll, Tok::Except, Tok::Intersect,
    Tok::Temp, Tok::If, Tok::Exists, Tok::Primary, Tok::Key, Tok::Unique, Tok::Check, Tok::Autoincr,
    Tok::Collate, Tok::Index, Tok::Into, Tok::Values, Tok::Set,
    Tok::Using, Tok::Indexed, Tok::By, Tok::Inner, Tok::Cross, Tok::Natural, Tok::Left, Tok::Right,
    Tok::Outer, Tok::Join, Tok::On,
    Tok::Show, Tok::Databases, Tok::Tables, Tok::Start, Tok::Begin, Tok::Transaction, Tok::Commit,
    Tok::End, Tok::Rollback, Tok::Deferred, Tok::Immediate, Tok::Exclusive, Tok::Ignore,
    Tok::Default, Tok::Replace, Tok::Abort, Tok::Fail, Tok::Conflict,
    Tok::Id, Tok::IntLiteral, Tok::FloatLiteral, Tok::StringLiteral, Tok::Null,
    Tok::In, Tok::Is, Tok::IsNull, Tok::IsNotNull,
    Tok::Eq, Tok::Ne, Tok::Lt, Tok::Le, Tok::Gt, Tok::Ge,
    Tok::Slash, Tok::Star, Tok::Plus, Tok::Minus,
    Tok::Comma, Tok::Dot, Tok::Semi, Tok::Lparen, Tok::Rparen,
    Tok::And, Tok::Or, Tok::Not,
    Tok::Case, Tok::When, Tok::Then, Tok::Else,
    Tok::Like, Tok::Cast, Tok::As,
    Tok::Bit, Tok::Tinyint, Tok::Bool, Tok::Boolean, Tok::Smallint, Tok::Mediumint, Tok::Int,
    Tok::Integer, Tok::Bigint, Tok::Float, Tok::Double, Tok::Decimal, Tok::Date, Tok::Datetime,
    Tok::Timestamp, Tok::Time, Tok::Year, Tok::Char, Tok::Varchar, Tok::Binary, Tok::Varbinary,
    Tok::Tinyblob, Tok::Tinytext, Tok::Blob, Tok::Text, Tok::Mediumblob, Tok::Mediumtext,
    Tok::Longblob, Tok::Longtext, Tok::Unsigned,
];

/// Case-insensitive keyword lookup, built once from [`METADATA`].
///
/// Only entries tagged [`TokenKind::Keyword`] participate; `NULL` is
/// included even though it sits in the literal-tag run of the enum,
/// matching the declared metadata rather than positional grouping.
pub fn keyword(text: &str) -> Option<Tok> {
    static TABLE: OnceLock<HashMap<&'static str, Tok>> = OnceLock::new();
    let table = TABLE.get_or_init(|| {
        let mut map = HashMap::new();
        for (idx, meta) in METADATA.iter().enumerate() {
            if meta.kind == TokenKind::Keyword {
                map.insert(meta.text, ALL_TOKENS[idx]);
            }
        }
        map
    });
    table.get(text.to_ascii_uppercase().as_str()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_ordering_is_stable() {
        assert_eq!(Tok::Illegal as u16, 0);
        assert_eq!(Tok::Eof as u16, 1);
        assert_eq!(Tok::Comment as u16, 2);
        assert_eq!(Tok::Select as u16, 3);
        assert_eq!(Tok::Set as u16, 37);
        assert_eq!(Tok::Using as u16, 38);
        assert_eq!(Tok::On as u16, 48);
        assert_eq!(Tok::Show as u16, 49);
        assert_eq!(Tok::Conflict as u16, 66);
        assert_eq!(Tok::Id as u16, 67);
        assert_eq!(Tok::Null as u16, 71);
        assert_eq!(Tok::In as u16, 72);
        assert_eq!(Tok::IsNotNull as u16, 75);
        assert_eq!(Tok::Eq as u16, 76);
        assert_eq!(Tok::Rparen as u16, 90);
        assert_eq!(Tok::Not as u16, 93);
        assert_eq!(Tok::Else as u16, 97);
        assert_eq!(Tok::As as u16, 100);
        assert_eq!(Tok::Bit as u16, 101);
        assert_eq!(Tok::Unsigned as u16, 130);
        assert_eq!(METADATA.len(), 131);
        assert_eq!(ALL_TOKENS.len(), 131);
    }

    #[test]
    fn quoted_keyword_spelling_is_not_a_keyword_lookup() {
        // The lexer is responsible for never calling `keyword()` on a
        // quoted identifier; this only asserts the table itself matches
        // bare spellings case-insensitively.
        assert_eq!(keyword("select"), Some(Tok::Select));
        assert_eq!(keyword("SeLeCt"), Some(Tok::Select));
        assert_eq!(keyword("`select`"), None);
    }

    #[test]
    fn is_null_and_union_all_are_operator_kind() {
        assert_eq!(Tok::IsNull.kind(), TokenKind::Operator);
        assert_eq!(Tok::IsNotNull.kind(), TokenKind::Operator);
        assert_eq!(Tok::UnionAll.kind(), TokenKind::Operator);
        assert_eq!(Tok::Null.kind(), TokenKind::Keyword);
    }

    #[test]
    fn prefix_postfix_classification() {
        assert!(Tok::Minus.is_prefix());
        assert!(Tok::Not.is_prefix());
        assert!(!Tok::Plus.is_prefix());
        assert!(Tok::Is.is_postfix());
        assert!(!Tok::In.is_postfix());
    }
}
