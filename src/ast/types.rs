//! Column and cast target type names.
//!
//! A type name is its own little grammar: `INT`, `VARCHAR(255)`,
//! `DECIMAL(10, 2) UNSIGNED`. Width and decimal are themselves `Literal`
//! expression nodes (not raw integers) so they keep their own source
//! position, matching how every other scalar in this tree is represented.

use serde::Serialize;

use super::{expr::Literal, Node};
use crate::lexer::Tok;

/// A SQL type name as written in a column definition or `CAST(... AS ty)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Type {
    #[serde(rename = "NamePos")]
    pub name_pos: usize,
    /// The base keyword token, e.g. `Tok::Varchar`, `Tok::Decimal`.
    #[serde(rename = "Kind")]
    pub kind: Tok,
    #[serde(rename = "Width")]
    pub width: Option<Box<Literal>>,
    #[serde(rename = "Decimal")]
    pub decimal: Option<Box<Literal>>,
    #[serde(rename = "Unsigned")]
    pub unsigned: bool,
    #[serde(rename = "EndPos")]
    pub end_pos: usize,
}

impl Type {
    #[must_use]
    pub const fn new(name_pos: usize, kind: Tok, end_pos: usize) -> Self {
        Self {
            name_pos,
            kind,
            width: None,
            decimal: None,
            unsigned: false,
            end_pos,
        }
    }
}

impl Node for Type {
    fn pos(&self) -> usize {
        self.name_pos
    }
    fn end(&self) -> usize {
        self.end_pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_type_is_zero_width_span() {
        let ty = Type::new(10, Tok::Int, 13);
        assert_eq!(ty.pos(), 10);
        assert_eq!(ty.end(), 13);
        assert!(ty.width.is_none());
    }

    #[test]
    fn decimal_with_precision_carries_literal_widths() {
        let mut ty = Type::new(0, Tok::Decimal, 7);
        ty.width = Some(Box::new(Literal::new(8, Tok::IntLiteral, "10".to_string())));
        ty.decimal = Some(Box::new(Literal::new(12, Tok::IntLiteral, "2".to_string())));
        ty.end_pos = 14;
        assert_eq!(ty.end(), 14);
        assert_eq!(ty.width.as_ref().unwrap().text, "10");
    }
}
