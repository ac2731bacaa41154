//! End-to-end SELECT parsing scenarios.

mod common;
use common::*;

use akino_sql::ast::{Expr, Node};
use akino_sql::lexer::Tok;

#[test]
fn where_simple() {
    let s = parse_select("SELECT * FROM users WHERE id = 1;");
    match s.where_clause {
        Some(Expr::Binary(b)) => assert_eq!(b.op, Tok::Eq),
        other => panic!("expected binary WHERE, got {other:?}"),
    }
}

#[test]
fn where_compound_and_or() {
    let s = parse_select("SELECT * FROM users WHERE (age > 18 AND active = 1) OR admin = 1;");
    match s.where_clause {
        Some(Expr::Binary(b)) => assert_eq!(b.op, Tok::Or),
        other => panic!("expected OR at the top, got {other:?}"),
    }
}

#[test]
fn group_by_having() {
    let s = parse_select(
        "SELECT status, COUNT(*) AS cnt FROM orders GROUP BY status HAVING COUNT(*) > 5;",
    );
    assert_eq!(s.group_by.len(), 1);
    assert!(s.having.is_some());
}

#[test]
fn order_by_limit_offset() {
    let s = parse_select("SELECT * FROM t ORDER BY a DESC, b LIMIT 10 OFFSET 5;");
    assert_eq!(s.order_by.len(), 2);
    assert!(s.limit.is_some());
    assert!(s.offset.is_some());
}

#[test]
fn union_all_chains_via_prior() {
    let s = parse_select("SELECT a FROM t1 UNION ALL SELECT a FROM t2;");
    assert_eq!(s.prior_op, Some(Tok::UnionAll));
    assert!(s.prior.is_some());
}

#[test]
fn subquery_in_from_gets_an_alias() {
    let s = parse_select("SELECT x.a FROM (SELECT a FROM t) AS x;");
    let from = s.from.unwrap();
    assert!(from.subquery.is_some());
    assert!(from.alias.is_some());
}

#[test]
fn qualified_column_reference_is_dot_binary() {
    let s = parse_select("SELECT t.a FROM t;");
    match &s.columns[0].expr {
        Some(Expr::Binary(b)) => assert_eq!(b.op, Tok::Dot),
        other => panic!("expected dotted reference, got {other:?}"),
    }
}

#[test]
fn every_node_keeps_pos_le_end() {
    let s = parse_select("SELECT a, b FROM t WHERE a IS NOT NULL ORDER BY b;");
    if let Some(where_clause) = &s.where_clause {
        assert!(where_clause.pos() <= where_clause.end());
    }
    for item in &s.order_by {
        assert!(item.expr.pos() <= item.expr.end());
    }
}

#[test]
fn json_output_is_deterministic() {
    assert_deterministic_json("SELECT a, b FROM t WHERE a = 1 ORDER BY a LIMIT 5;");
}

#[test]
fn malformed_select_is_a_parse_error() {
    parse_err("SELECT FROM;");
}

#[test]
fn limit_offset_keyword_form_keeps_order() {
    let s = parse_select("SELECT * FROM t LIMIT 100 OFFSET 25;");
    match (&s.limit, &s.offset) {
        (Some(Expr::Literal(l)), Some(Expr::Literal(o))) => {
            assert_eq!(l.text, "100");
            assert_eq!(o.text, "25");
        }
        other => panic!("expected literal limit/offset, got {other:?}"),
    }
}

#[test]
fn where_in_subquery_parses_as_binary_with_subquery_rhs() {
    let s = parse_select("SELECT * FROM t WHERE id IN (SELECT a FROM u);");
    match s.where_clause {
        Some(Expr::Binary(b)) => {
            assert_eq!(b.op, Tok::In);
            assert!(matches!(*b.rhs, Expr::Subquery(_)));
        }
        other => panic!("expected IN with subquery rhs, got {other:?}"),
    }
}

#[test]
fn limit_comma_form_swaps_limit_and_offset() {
    let s = parse_select("SELECT * FROM t LIMIT 100, 25;");
    match (&s.limit, &s.offset) {
        (Some(Expr::Literal(l)), Some(Expr::Literal(o))) => {
            assert_eq!(l.text, "25");
            assert_eq!(o.text, "100");
        }
        other => panic!("expected literal limit/offset, got {other:?}"),
    }
}
