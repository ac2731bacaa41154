#![allow(dead_code)]

use akino_sql::ast::{Delete, Insert, Select, Update};
use akino_sql::{Command, ParseError, Parser};

pub fn parse(sql: &str) -> Command {
    Parser::new(sql)
        .parse_command()
        .unwrap_or_else(|e| panic!("failed to parse: {sql}\nerror: {e}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    Parser::new(sql)
        .parse_command()
        .expect_err(&format!("expected parse error for: {sql}"))
}

pub fn parse_select(sql: &str) -> Select {
    match parse(sql) {
        Command::Select(s) => s,
        other => panic!("expected SELECT, got {other:?}"),
    }
}

pub fn parse_insert(sql: &str) -> Insert {
    match parse(sql) {
        Command::Insert(i) => i,
        other => panic!("expected INSERT, got {other:?}"),
    }
}

pub fn parse_update(sql: &str) -> Update {
    match parse(sql) {
        Command::Update(u) => u,
        other => panic!("expected UPDATE, got {other:?}"),
    }
}

pub fn parse_delete(sql: &str) -> Delete {
    match parse(sql) {
        Command::Delete(d) => d,
        other => panic!("expected DELETE, got {other:?}"),
    }
}

/// Parsing the same source twice must produce byte-identical JSON.
pub fn assert_deterministic_json(sql: &str) {
    let first = serde_json::to_string(&parse(sql)).unwrap();
    let second = serde_json::to_string(&parse(sql)).unwrap();
    assert_eq!(first, second, "JSON output for {sql:?} was not stable across parses");
}
