//! Pratt (precedence-climbing) binding powers for infix/postfix operators.
//!
//! The priority table is the single source of truth for "is this token a
//! binary operator": the earlier implementation this parser is modeled on
//! kept a separate hand-written list of binary tokens that *also* listed
//! `NOT`, even though `NOT` has no entry in the priority table — any path
//! that looked up its priority would panic. Here `is_binary` and `priority`
//! both read the same table, so that class of bug can't recur.

use crate::lexer::Tok;

/// Binding power of a prefix operator (`-x`, `NOT x`). Higher binds tighter.
pub const PREFIX: u8 = 9;

/// Binding power of a postfix operator (`x IS NULL`).
pub const POSTFIX: u8 = 1;

/// Binding power of each infix operator, highest binds tightest.
const fn priority(tok: Tok) -> Option<u8> {
    match tok {
        Tok::Like => Some(8),
        Tok::Star | Tok::Slash => Some(7),
        Tok::Plus | Tok::Minus => Some(6),
        Tok::In => Some(5),
        Tok::Eq | Tok::Ne => Some(4),
        Tok::Lt | Tok::Le | Tok::Gt | Tok::Ge => Some(3),
        Tok::And => Some(2),
        Tok::Or => Some(1),
        Tok::Dot => Some(10),
        _ => None,
    }
}

/// Binding power for `tok` used as an infix operator, if it is one.
#[must_use]
pub const fn infix_binding_power(tok: Tok) -> Option<u8> {
    priority(tok)
}

/// Whether `tok` can appear as a binary operator at all. Determined solely
/// by membership in the priority table, not a separate hardcoded list.
#[must_use]
pub const fn is_binary(tok: Tok) -> bool {
    priority(tok).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_has_no_priority_and_is_not_binary() {
        assert_eq!(priority(Tok::Not), None);
        assert!(!is_binary(Tok::Not));
    }

    #[test]
    fn like_binds_tighter_than_arithmetic() {
        assert!(priority(Tok::Like).unwrap() > priority(Tok::Plus).unwrap());
    }

    #[test]
    fn and_binds_tighter_than_or() {
        assert!(priority(Tok::And).unwrap() > priority(Tok::Or).unwrap());
    }

    #[test]
    fn prefix_outranks_every_infix_operator() {
        for tok in [
            Tok::Like,
            Tok::Star,
            Tok::Plus,
            Tok::In,
            Tok::Eq,
            Tok::Lt,
            Tok::And,
            Tok::Or,
        ] {
            assert!(PREFIX > priority(tok).unwrap());
        }
    }
}
