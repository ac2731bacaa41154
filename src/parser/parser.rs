//! Recursive-descent statement parser plus the Pratt expression parser.

use super::error::ParseError;
use super::pratt::{infix_binding_power, is_binary, POSTFIX, PREFIX};
use crate::ast::{
    BinaryExpr, CallExpr, CastExpr, ColumnDefine, Command, Comment, Condition, ConditionBlock,
    ConflictAction, CreateIndex, CreateTable, Delete, Expr, ExprList, Identifier, IndexDefine,
    Indexed, Insert, Literal, NameRef, Node, OrderByItem, OrderDirection, Select, SelectColumn,
    SetDefine, Show, Source, Subquery, Transaction, TransactionMode, Type, UnaryExpr, Update,
    join_type,
};
use crate::lexer::{Emitted, Lexer, Span, Tok};

/// Hand-written recursive-descent parser with a Pratt expression core.
///
/// Statements are dispatched on the first non-comment token; expressions use
/// precedence climbing via [`infix_binding_power`]/[`is_binary`]. The parser
/// holds exactly one token of lookahead, same as the scanner beneath it.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    cur: Emitted,
    seen_real_token: bool,
    pending_comment: Option<Comment>,
}

type PResult<T> = Result<T, ParseError>;

/// A table-level `PRIMARY KEY (...)` / `UNIQUE (...)` clause, held only
/// long enough to retro-annotate the matching [`ColumnDefine`]s; it has no
/// node of its own in the tree.
struct TableKeyConstraint {
    unique: bool,
    columns: Vec<IndexDefine>,
    auto_increment: bool,
    conflict: ConflictAction,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let mut pending_comment = None;
        let cur = Self::fetch(&mut lexer, &mut pending_comment, false);
        Self {
            lexer,
            cur,
            seen_real_token: false,
            pending_comment,
        }
    }

    /// Pulls the next non-comment token, remembering the first comment seen
    /// before any real token so a comment-only input still parses as one
    /// `Comment` command instead of failing at EOF.
    fn fetch(lexer: &mut Lexer<'a>, pending: &mut Option<Comment>, seen_real: bool) -> Emitted {
        loop {
            let emitted = lexer.next();
            if emitted.tok == Tok::Illegal {
                return emitted;
            }
            if emitted.tok == Tok::Comment {
                if !seen_real && pending.is_none() {
                    *pending = Some(Comment {
                        pos: emitted.offset,
                        end_pos: emitted.offset + emitted.literal.len(),
                        text: emitted.literal.clone(),
                    });
                }
                continue;
            }
            return emitted;
        }
    }

    fn bump(&mut self) -> Emitted {
        let next = Self::fetch(&mut self.lexer, &mut self.pending_comment, self.seen_real_token);
        self.seen_real_token = true;
        core::mem::replace(&mut self.cur, next)
    }

    fn peek(&self) -> Tok {
        self.cur.tok
    }

    fn pos(&self) -> usize {
        self.cur.offset
    }

    fn span_here(&self) -> Span {
        Span::new(self.cur.offset, self.cur.offset + self.cur.literal.len().max(1))
    }

    fn err_unexpected(&self, expected: &str) -> ParseError {
        if self.peek() == Tok::Eof {
            ParseError::UnexpectedEof {
                span: self.span_here(),
                expected: expected.to_string(),
            }
        } else {
            ParseError::Unexpected {
                span: self.span_here(),
                expected: expected.to_string(),
                found: self.peek(),
            }
        }
    }

    fn expect(&mut self, tok: Tok, what: &str) -> PResult<Emitted> {
        if self.peek() == tok {
            Ok(self.bump())
        } else {
            Err(self.err_unexpected(what))
        }
    }

    fn eat(&mut self, tok: Tok) -> bool {
        if self.peek() == tok {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Parses one top-level `;`-terminated command.
    ///
    /// # Errors
    /// Returns a [`ParseError`] on any malformed input.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn parse_command(&mut self) -> PResult<Command> {
        if self.peek() == Tok::Eof {
            if let Some(comment) = self.pending_comment.take() {
                return Ok(Command::Comment(comment));
            }
            return Err(self.err_unexpected("a statement"));
        }
        self.check_illegal()?;

        let command = match self.peek() {
            Tok::Select => Command::Select(self.parse_select()?),
            Tok::Create => self.parse_create()?,
            Tok::Insert | Tok::Replace => Command::Insert(self.parse_insert()?),
            Tok::Update => Command::Update(self.parse_update()?),
            Tok::Delete => Command::Delete(self.parse_delete()?),
            Tok::Begin | Tok::Start | Tok::Commit | Tok::Rollback | Tok::End => {
                Command::Transaction(self.parse_transaction()?)
            }
            Tok::Show => Command::Show(self.parse_show()?),
            _ => return Err(self.err_unexpected("a statement")),
        };

        self.eat(Tok::Semi);
        Ok(command)
    }

    /// Parses every command up to EOF.
    ///
    /// # Errors
    /// Returns a [`ParseError`] on the first malformed command.
    pub fn parse_all(&mut self) -> PResult<Vec<Command>> {
        let mut commands = Vec::new();
        while self.peek() != Tok::Eof || self.pending_comment.is_some() {
            commands.push(self.parse_command()?);
            if self.peek() == Tok::Eof {
                break;
            }
        }
        Ok(commands)
    }

    // ---- transactions --------------------------------------------------

    fn parse_transaction(&mut self) -> PResult<Transaction> {
        let start = self.pos();
        let op_tok = self.bump();
        let op = match op_tok.tok {
            Tok::Start => Tok::Begin,
            other => other,
        };

        let mode = if op == Tok::Begin {
            match self.peek() {
                Tok::Deferred => {
                    self.bump();
                    Some(TransactionMode::Deferred)
                }
                Tok::Immediate => {
                    self.bump();
                    Some(TransactionMode::Immediate)
                }
                Tok::Exclusive => {
                    self.bump();
                    Some(TransactionMode::Exclusive)
                }
                _ => Some(TransactionMode::Deferred),
            }
        } else {
            None
        };

        let mut end_pos = op_tok.offset + op_tok.literal.len().max(1);
        if self.eat(Tok::Transaction) {
            end_pos = self.cur.offset;
        }
        Ok(Transaction {
            op_pos: start,
            op,
            mode,
            end_pos,
        })
    }

    // ---- show ------------------------------------------------------------

    fn parse_show(&mut self) -> PResult<Show> {
        let start = self.pos();
        self.bump();
        let kind = match self.peek() {
            Tok::Databases | Tok::Tables => self.bump().tok,
            _ => return Err(self.err_unexpected("DATABASES or TABLES")),
        };
        Ok(Show {
            op_pos: start,
            kind,
            end_pos: self.cur.offset,
        })
    }

    // ---- names -------------------------------------------------------------

    /// A quoted identifier's literal is at least three characters long and
    /// delimited by a matching pair of back-ticks on both ends.
    fn parse_ident(&mut self, what: &str) -> PResult<Identifier> {
        if self.peek() != Tok::Id {
            return Err(self.err_unexpected(what));
        }
        let tok = self.bump();
        let quoted = tok.literal.len() > 2
            && tok.literal.starts_with('`')
            && tok.literal.ends_with('`');
        let name = if quoted {
            tok.literal[1..tok.literal.len() - 1].to_string()
        } else {
            tok.literal
        };
        Ok(Identifier::new(tok.offset, name, quoted))
    }

    /// `[schema.]name`.
    fn parse_name_ref(&mut self) -> PResult<NameRef> {
        let first = self.parse_ident("a name")?;
        if self.eat(Tok::Dot) {
            let second = self.parse_ident("a name")?;
            return Ok(NameRef {
                name_pos: first.name_pos,
                schema: Some(first.name),
                name: second.name.clone(),
                end_pos: second.end(),
            });
        }
        Ok(NameRef::unqualified(first.name_pos, first.name))
    }

    // ---- CREATE --------------------------------------------------------

    fn parse_create(&mut self) -> PResult<Command> {
        let start = self.pos();
        self.bump();
        match self.peek() {
            Tok::Index | Tok::Unique => Ok(Command::CreateIndex(self.parse_create_index(start)?)),
            _ => Ok(Command::CreateTable(self.parse_create_table(start)?)),
        }
    }

    fn parse_create_table(&mut self, start: usize) -> PResult<CreateTable> {
        let temp = self.eat(Tok::Temp);
        self.expect(Tok::Table, "TABLE")?;
        let if_not_exists = if self.eat(Tok::If) {
            self.expect(Tok::Not, "NOT")?;
            self.expect(Tok::Exists, "EXISTS")?;
            true
        } else {
            false
        };
        let name = self.parse_name_ref()?;

        if self.eat(Tok::As) {
            let as_select = self.parse_select()?;
            let end_pos = as_select.end();
            return Ok(CreateTable {
                op_pos: start,
                if_not_exists,
                temp,
                name,
                columns: Vec::new(),
                table_constraints: Vec::new(),
                as_select: Some(as_select),
                end_pos,
            });
        }

        self.expect(Tok::Lparen, "(")?;
        let mut columns = Vec::new();
        let mut table_constraints = Vec::new();
        let mut key_constraints = Vec::new();
        loop {
            match self.peek() {
                Tok::Check => {
                    self.bump();
                    self.expect(Tok::Lparen, "(")?;
                    table_constraints.push(self.parse_expr(0)?);
                    self.expect(Tok::Rparen, ")")?;
                }
                Tok::Primary | Tok::Unique => {
                    key_constraints.push(self.parse_table_key_constraint()?);
                }
                _ => columns.push(self.parse_column_define()?),
            }
            if !self.eat(Tok::Comma) {
                break;
            }
        }
        let rparen = self.expect(Tok::Rparen, ")")?;

        // Table-level PRIMARY KEY / UNIQUE retro-annotate the matching
        // column by name rather than living as their own AST node: the
        // grammar never checks that the name actually exists in the
        // column list, it just annotates whatever matches.
        for key in key_constraints {
            for idx in &key.columns {
                if let Some(col) = columns.iter_mut().find(|c| c.name.name == idx.name.name) {
                    if key.unique {
                        col.unique = true;
                    } else {
                        col.primary_key = true;
                        col.primary_key_desc = idx.direction == OrderDirection::Desc;
                        col.auto_increment = key.auto_increment;
                    }
                    col.conflict = key.conflict;
                }
            }
        }

        Ok(CreateTable {
            op_pos: start,
            if_not_exists,
            temp,
            name,
            columns,
            table_constraints,
            as_select: None,
            end_pos: rparen.offset + 1,
        })
    }

    fn parse_table_key_constraint(&mut self) -> PResult<TableKeyConstraint> {
        let unique = match self.peek() {
            Tok::Primary => {
                self.bump();
                self.expect(Tok::Key, "KEY")?;
                false
            }
            Tok::Unique => {
                self.bump();
                true
            }
            _ => return Err(self.err_unexpected("PRIMARY KEY or UNIQUE")),
        };
        self.expect(Tok::Lparen, "(")?;
        let mut columns = vec![self.parse_index_define()?];
        while self.eat(Tok::Comma) {
            columns.push(self.parse_index_define()?);
        }
        let auto_increment = self.eat(Tok::Autoincr);
        self.expect(Tok::Rparen, ")")?;
        let conflict = if self.peek() == Tok::On {
            self.parse_on_conflict_clause()?
        } else {
            ConflictAction::Default
        };
        Ok(TableKeyConstraint {
            unique,
            columns,
            auto_increment,
            conflict,
        })
    }

    fn parse_column_define(&mut self) -> PResult<ColumnDefine> {
        let name = self.parse_ident("a column name")?;
        let ty = self.parse_type()?;
        let mut def = ColumnDefine {
            name,
            ty,
            not_null: false,
            primary_key: false,
            primary_key_desc: false,
            auto_increment: false,
            unique: false,
            check: None,
            default: None,
            collate: None,
            conflict: ConflictAction::Default,
            end_pos: 0,
        };
        loop {
            match self.peek() {
                Tok::Not => {
                    self.bump();
                    self.expect(Tok::Null, "NULL")?;
                    def.not_null = true;
                }
                Tok::Primary => {
                    self.bump();
                    self.expect(Tok::Key, "KEY")?;
                    def.primary_key = true;
                    if self.peek() == Tok::Desc {
                        def.primary_key_desc = true;
                        self.bump();
                    } else if self.peek() == Tok::Asc {
                        self.bump();
                    }
                    if self.eat(Tok::Autoincr) {
                        def.auto_increment = true;
                    }
                    if self.peek() == Tok::On {
                        def.conflict = self.parse_on_conflict_clause()?;
                    }
                }
                Tok::Unique => {
                    self.bump();
                    def.unique = true;
                    if self.peek() == Tok::On {
                        def.conflict = self.parse_on_conflict_clause()?;
                    }
                }
                // These two arms propagate real parse errors instead of
                // swallowing them: a malformed CHECK/COLLATE clause is a
                // hard error, not "this option doesn't apply here".
                Tok::Check => {
                    self.bump();
                    self.expect(Tok::Lparen, "(")?;
                    def.check = Some(self.parse_expr(0)?);
                    self.expect(Tok::Rparen, ")")?;
                }
                Tok::Collate => {
                    self.bump();
                    def.collate = Some(self.parse_ident("a collation name")?);
                }
                Tok::Default => {
                    self.bump();
                    def.default = Some(self.parse_simple_expr()?);
                }
                // A bare `NULL` option is accepted and consumed but records
                // no flag, symmetric with `NOT NULL`.
                Tok::Null => {
                    self.bump();
                }
                _ => break,
            }
        }
        def.end_pos = self.cur.offset;
        Ok(def)
    }

    fn parse_on_conflict_clause(&mut self) -> PResult<ConflictAction> {
        self.expect(Tok::On, "ON")?;
        self.expect(Tok::Conflict, "CONFLICT")?;
        let action = match self.peek() {
            Tok::Ignore => ConflictAction::Ignore,
            Tok::Replace => ConflictAction::Replace,
            Tok::Rollback => ConflictAction::Rollback,
            Tok::Abort => ConflictAction::Abort,
            Tok::Fail => ConflictAction::Fail,
            _ => return Err(self.err_unexpected("a conflict resolution")),
        };
        self.bump();
        Ok(action)
    }

    fn parse_type(&mut self) -> PResult<Type> {
        let start = self.pos();
        let kind = self.bump().tok;
        let mut end = self.cur.offset;
        let mut width = None;
        let mut decimal = None;
        if self.eat(Tok::Lparen) {
            width = Some(Box::new(self.parse_int_literal()?));
            if self.eat(Tok::Comma) {
                decimal = Some(Box::new(self.parse_int_literal()?));
            }
            let rparen = self.expect(Tok::Rparen, ")")?;
            end = rparen.offset + 1;
        }
        let unsigned = self.eat(Tok::Unsigned);
        if unsigned {
            end = self.cur.offset;
        }
        Ok(Type {
            name_pos: start,
            kind,
            width,
            decimal,
            unsigned,
            end_pos: end,
        })
    }

    fn parse_int_literal(&mut self) -> PResult<Literal> {
        if self.peek() != Tok::IntLiteral {
            return Err(self.err_unexpected("an integer"));
        }
        let tok = self.bump();
        Ok(Literal::new(tok.offset, Tok::IntLiteral, tok.literal))
    }

    fn parse_create_index(&mut self, start: usize) -> PResult<CreateIndex> {
        let unique = self.eat(Tok::Unique);
        self.expect(Tok::Index, "INDEX")?;
        let if_not_exists = if self.eat(Tok::If) {
            self.expect(Tok::Not, "NOT")?;
            self.expect(Tok::Exists, "EXISTS")?;
            true
        } else {
            false
        };
        let name = self.parse_ident("an index name")?;
        self.expect(Tok::On, "ON")?;
        let table = self.parse_name_ref()?;
        self.expect(Tok::Lparen, "(")?;
        let mut columns = vec![self.parse_index_define()?];
        while self.eat(Tok::Comma) {
            columns.push(self.parse_index_define()?);
        }
        let rparen = self.expect(Tok::Rparen, ")")?;
        Ok(CreateIndex {
            op_pos: start,
            unique,
            if_not_exists,
            name,
            table,
            columns,
            end_pos: rparen.offset + 1,
        })
    }

    fn parse_index_define(&mut self) -> PResult<IndexDefine> {
        let name = self.parse_ident("a column name")?;
        let direction = match self.peek() {
            Tok::Desc => {
                self.bump();
                OrderDirection::Desc
            }
            Tok::Asc => {
                self.bump();
                OrderDirection::Asc
            }
            _ => OrderDirection::Asc,
        };
        Ok(IndexDefine { name, direction })
    }

    // ---- INSERT ----------------------------------------------------------

    fn parse_insert(&mut self) -> PResult<Insert> {
        let start = self.pos();
        let leading = self.bump().tok;
        let conflict = if leading == Tok::Replace {
            ConflictAction::Replace
        } else if self.eat(Tok::Or) {
            self.parse_or_conflict()?
        } else {
            ConflictAction::Default
        };
        self.expect(Tok::Into, "INTO")?;
        let table = self.parse_name_ref()?;

        let mut columns = Vec::new();
        if self.eat(Tok::Lparen) {
            columns.push(self.parse_ident("a column name")?);
            while self.eat(Tok::Comma) {
                columns.push(self.parse_ident("a column name")?);
            }
            self.expect(Tok::Rparen, ")")?;
        }

        let (values, select) = if self.eat(Tok::Values) {
            self.expect(Tok::Lparen, "(")?;
            let mut values = vec![self.parse_expr(0)?];
            while self.eat(Tok::Comma) {
                values.push(self.parse_expr(0)?);
            }
            self.expect(Tok::Rparen, ")")?;
            (values, None)
        } else if self.peek() == Tok::Select {
            (Vec::new(), Some(self.parse_select()?))
        } else {
            self.expect(Tok::Default, "VALUES, SELECT, or DEFAULT VALUES")?;
            self.expect(Tok::Values, "VALUES")?;
            (Vec::new(), None)
        };

        Ok(Insert {
            op_pos: start,
            conflict,
            table,
            columns,
            end_pos: self.cur.offset,
            values,
            select,
        })
    }

    fn parse_or_conflict(&mut self) -> PResult<ConflictAction> {
        let action = match self.peek() {
            Tok::Ignore => ConflictAction::Ignore,
            Tok::Replace => ConflictAction::Replace,
            Tok::Rollback => ConflictAction::Rollback,
            Tok::Abort => ConflictAction::Abort,
            Tok::Fail => ConflictAction::Fail,
            _ => return Err(self.err_unexpected("a conflict resolution")),
        };
        self.bump();
        Ok(action)
    }

    // ---- UPDATE ------------------------------------------------------------

    fn parse_update(&mut self) -> PResult<Update> {
        let start = self.pos();
        self.bump();
        let conflict = if self.eat(Tok::Or) {
            self.parse_or_conflict()?
        } else {
            ConflictAction::Default
        };
        let table = self.parse_name_ref()?;
        let indexed = self.parse_indexed()?;
        self.expect(Tok::Set, "SET")?;
        let mut set = vec![self.parse_set_define()?];
        while self.eat(Tok::Comma) {
            set.push(self.parse_set_define()?);
        }
        let where_clause = if self.eat(Tok::Where) {
            Some(self.parse_expr(0)?)
        } else {
            None
        };
        let order_by = self.parse_order_by()?;
        let (limit, offset) = self.parse_limit_offset()?;
        Ok(Update {
            op_pos: start,
            conflict,
            table,
            indexed,
            set,
            where_clause,
            order_by,
            limit,
            offset,
            end_pos: self.cur.offset,
        })
    }

    fn parse_set_define(&mut self) -> PResult<SetDefine> {
        let name = self.parse_ident("a column name")?;
        self.expect(Tok::Eq, "=")?;
        let value = self.parse_expr(0)?;
        Ok(SetDefine { name, value })
    }

    // ---- DELETE ------------------------------------------------------------

    fn parse_delete(&mut self) -> PResult<Delete> {
        let start = self.pos();
        self.bump();
        self.expect(Tok::From, "FROM")?;
        let table = self.parse_name_ref()?;
        let indexed = self.parse_indexed()?;
        let where_clause = if self.eat(Tok::Where) {
            Some(self.parse_expr(0)?)
        } else {
            None
        };
        let order_by = self.parse_order_by()?;
        let (limit, offset) = self.parse_limit_offset()?;
        Ok(Delete {
            op_pos: start,
            table,
            indexed,
            where_clause,
            order_by,
            limit,
            offset,
            end_pos: self.cur.offset,
        })
    }

    // ---- SELECT ------------------------------------------------------------

    fn parse_select(&mut self) -> PResult<Select> {
        let start = self.pos();
        self.expect(Tok::Select, "SELECT")?;
        let distinct = self.eat(Tok::Distinct);
        let all = !distinct && self.eat(Tok::All);

        let mut columns = vec![self.parse_select_column()?];
        while self.eat(Tok::Comma) {
            columns.push(self.parse_select_column()?);
        }

        let from = if self.eat(Tok::From) {
            Some(self.parse_sel_tab_list()?)
        } else {
            None
        };

        let where_clause = if self.eat(Tok::Where) {
            Some(self.parse_expr(0)?)
        } else {
            None
        };

        let mut group_by = Vec::new();
        let mut having = None;
        if self.eat(Tok::Group) {
            self.expect(Tok::By, "BY")?;
            group_by.push(self.parse_expr(0)?);
            while self.eat(Tok::Comma) {
                group_by.push(self.parse_expr(0)?);
            }
            if self.eat(Tok::Having) {
                having = Some(self.parse_expr(0)?);
            }
        }

        let order_by = self.parse_order_by()?;
        let (limit, offset) = self.parse_limit_offset()?;

        let mut end_pos = self.cur.offset;

        let prior_op = match self.peek() {
            Tok::Union => {
                self.bump();
                if self.eat(Tok::All) {
                    Some(Tok::UnionAll)
                } else {
                    Some(Tok::Union)
                }
            }
            Tok::Except | Tok::Intersect => Some(self.bump().tok),
            _ => None,
        };

        let prior = if prior_op.is_some() {
            let next = self.parse_select()?;
            end_pos = next.end();
            Some(Box::new(next))
        } else {
            None
        };

        Ok(Select {
            select_pos: start,
            distinct,
            all,
            columns,
            from,
            where_clause,
            group_by,
            having,
            order_by,
            limit,
            offset,
            prior_op,
            prior,
            end_pos,
        })
    }

    fn parse_select_column(&mut self) -> PResult<SelectColumn> {
        let start = self.pos();
        if self.peek() == Tok::Star {
            self.bump();
            return Ok(SelectColumn {
                expr: None,
                star: true,
                alias: None,
                pos: start,
                end_pos: self.cur.offset,
            });
        }
        let expr = self.parse_expr(0)?;
        let mut end_pos = expr.end();
        let alias = if self.eat(Tok::As) {
            let id = self.parse_ident("an alias")?;
            end_pos = id.end();
            Some(id)
        } else if self.peek() == Tok::Id {
            let id = self.parse_ident("an alias")?;
            end_pos = id.end();
            Some(id)
        } else {
            None
        };
        Ok(SelectColumn {
            expr: Some(expr),
            star: false,
            alias,
            pos: start,
            end_pos,
        })
    }

    fn parse_sel_tab_list(&mut self) -> PResult<Source> {
        let mut source = self.parse_alias_name()?;
        loop {
            let join_type = match self.peek() {
                Tok::Comma => {
                    self.bump();
                    0
                }
                Tok::Join => {
                    self.bump();
                    join_type::INNER
                }
                Tok::Inner => {
                    self.bump();
                    self.expect(Tok::Join, "JOIN")?;
                    join_type::INNER
                }
                Tok::Cross => {
                    self.bump();
                    self.expect(Tok::Join, "JOIN")?;
                    join_type::CROSS
                }
                Tok::Natural => {
                    self.bump();
                    let mut flags = join_type::NATURAL;
                    flags |= self.parse_lr_outer()?;
                    self.expect(Tok::Join, "JOIN")?;
                    flags
                }
                Tok::Left | Tok::Right => {
                    let flags = self.parse_lr_outer()?;
                    self.expect(Tok::Join, "JOIN")?;
                    flags
                }
                _ => break,
            };
            let mut right = self.parse_alias_name()?;
            right.join_type = join_type;
            if self.eat(Tok::On) {
                right.join_on = Some(Box::new(self.parse_expr(0)?));
            } else if self.eat(Tok::Using) {
                self.expect(Tok::Lparen, "(")?;
                right.join_using.push(self.parse_ident("a column name")?);
                while self.eat(Tok::Comma) {
                    right.join_using.push(self.parse_ident("a column name")?);
                }
                self.expect(Tok::Rparen, ")")?;
            }
            right.prior = Some(Box::new(source));
            source = right;
        }
        Ok(source)
    }

    fn parse_lr_outer(&mut self) -> PResult<u32> {
        let mut flags = match self.peek() {
            Tok::Left => {
                self.bump();
                join_type::LEFT
            }
            Tok::Right => {
                self.bump();
                join_type::RIGHT
            }
            _ => return Ok(0),
        };
        if self.eat(Tok::Outer) {
            flags |= join_type::OUTER;
        }
        Ok(flags)
    }

    fn parse_alias_name(&mut self) -> PResult<Source> {
        let start = self.pos();
        if self.eat(Tok::Lparen) {
            let subquery = self.parse_select()?;
            self.expect(Tok::Rparen, ")")?;
            let alias = self.parse_optional_alias()?;
            return Ok(Source {
                name: None,
                subquery: Some(Box::new(subquery)),
                alias,
                indexed: Indexed::None,
                join_type: 0,
                join_on: None,
                join_using: Vec::new(),
                prior: None,
                pos: start,
                end_pos: self.cur.offset,
            });
        }
        let name = self.parse_name_ref()?;
        let alias = self.parse_optional_alias()?;
        let indexed = self.parse_indexed()?;
        Ok(Source {
            name: Some(name),
            subquery: None,
            alias,
            indexed,
            join_type: 0,
            join_on: None,
            join_using: Vec::new(),
            prior: None,
            pos: start,
            end_pos: self.cur.offset,
        })
    }

    fn parse_optional_alias(&mut self) -> PResult<Option<Identifier>> {
        if self.eat(Tok::As) {
            return Ok(Some(self.parse_ident("an alias")?));
        }
        if self.peek() == Tok::Id {
            return Ok(Some(self.parse_ident("an alias")?));
        }
        Ok(None)
    }

    fn parse_indexed(&mut self) -> PResult<Indexed> {
        if self.eat(Tok::Indexed) {
            self.expect(Tok::By, "BY")?;
            return Ok(Indexed::By(self.parse_ident("an index name")?));
        }
        if self.peek() == Tok::Not {
            self.bump();
            self.expect(Tok::Indexed, "INDEXED")?;
            return Ok(Indexed::Not);
        }
        Ok(Indexed::None)
    }

    fn parse_order_by(&mut self) -> PResult<Vec<OrderByItem>> {
        let mut items = Vec::new();
        if self.eat(Tok::Order) {
            self.expect(Tok::By, "BY")?;
            items.push(self.parse_order_by_item()?);
            while self.eat(Tok::Comma) {
                items.push(self.parse_order_by_item()?);
            }
        }
        Ok(items)
    }

    fn parse_order_by_item(&mut self) -> PResult<OrderByItem> {
        let expr = self.parse_expr(0)?;
        let direction = match self.peek() {
            Tok::Desc => {
                self.bump();
                OrderDirection::Desc
            }
            Tok::Asc => {
                self.bump();
                OrderDirection::Asc
            }
            _ => OrderDirection::Asc,
        };
        Ok(OrderByItem { expr, direction })
    }

    /// `LIMIT n` / `LIMIT n OFFSET m` keep `n` as the limit. `LIMIT n, m` is
    /// the MySQL comma form, where the first number is the offset and the
    /// second is the limit — the two forms disagree about which position
    /// means what, not just about punctuation.
    fn parse_limit_offset(&mut self) -> PResult<(Option<Expr>, Option<Expr>)> {
        if !self.eat(Tok::Limit) {
            return Ok((None, None));
        }
        let first = self.parse_expr(0)?;
        if self.eat(Tok::Offset) {
            let offset = self.parse_expr(0)?;
            return Ok((Some(first), Some(offset)));
        }
        if self.eat(Tok::Comma) {
            let limit = self.parse_expr(0)?;
            return Ok((Some(limit), Some(first)));
        }
        Ok((Some(first), None))
    }

    // ---- expressions ---------------------------------------------------

    /// Parses a single, complete expression (the `parse_expression` entry
    /// point): equivalent to [`Self::parse_expr`] at the lowest binding
    /// power, with no caller-supplied limit.
    ///
    /// # Errors
    /// Returns a [`ParseError`] on malformed input.
    pub fn parse_expression(&mut self) -> PResult<Expr> {
        self.parse_expr(0)
    }

    /// Parses an expression, recursing while the next infix operator's
    /// binding power exceeds `limit` (precedence climbing).
    ///
    /// # Errors
    /// Returns a [`ParseError`] on malformed input.
    pub fn parse_expr(&mut self, limit: u8) -> PResult<Expr> {
        let mut lhs = self.parse_prefix()?;
        loop {
            lhs = match self.parse_postfix(lhs.clone(), limit)? {
                Some(next) => next,
                None => break,
            };
        }
        loop {
            let tok = self.peek();
            if !is_binary(tok) {
                break;
            }
            let bp = infix_binding_power(tok).unwrap();
            if bp <= limit {
                break;
            }
            let op_pos = self.pos();
            self.bump();

            if tok == Tok::In {
                let rhs = self.parse_expr_list()?;
                lhs = Expr::Binary(BinaryExpr {
                    op_pos,
                    op: Tok::In,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                });
                continue;
            }

            if tok == Tok::Like {
                if self.peek() != Tok::StringLiteral {
                    return Err(self.err_unexpected("a string literal after LIKE"));
                }
                let rhs = self.parse_expr(bp)?;
                lhs = Expr::Binary(BinaryExpr {
                    op_pos,
                    op: Tok::Like,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                });
                continue;
            }

            let rhs = self.parse_expr(bp)?;
            lhs = Expr::Binary(BinaryExpr {
                op_pos,
                op: tok,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            });
        }
        Ok(lhs)
    }

    /// A non-operator-chained expression: literal, identifier, parenthesized
    /// expression, or CASE/CAST form. Used for `DEFAULT` clauses where a
    /// full operator expression would be unusual.
    fn parse_simple_expr(&mut self) -> PResult<Expr> {
        self.parse_expr(PREFIX)
    }

    fn check_illegal(&self) -> PResult<()> {
        if self.peek() == Tok::Illegal {
            let message = self.lexer.error().unwrap_or("invalid token").to_string();
            tracing::warn!(offset = self.pos(), %message, "lexer produced an illegal token");
            Err(ParseError::Lex {
                span: self.span_here(),
                message,
            })
        } else {
            Ok(())
        }
    }

    fn parse_prefix(&mut self) -> PResult<Expr> {
        self.check_illegal()?;
        match self.peek() {
            Tok::Minus | Tok::Not => {
                let op_pos = self.pos();
                let op = self.bump().tok;
                let operand = self.parse_expr(PREFIX)?;
                let end_pos = operand.end();
                Ok(Expr::Unary(UnaryExpr {
                    op_pos,
                    op,
                    operand: Box::new(operand),
                    postfix: false,
                    end_pos,
                }))
            }
            Tok::Case => self.parse_condition(),
            Tok::Cast => self.parse_cast(),
            Tok::Lparen => {
                let lparen = self.pos();
                self.bump();
                if self.peek() == Tok::Select {
                    let select = self.parse_select()?;
                    let rparen = self.expect(Tok::Rparen, ")")?;
                    return Ok(Expr::Subquery(Subquery {
                        select: Box::new(select),
                        lparen,
                        rparen: rparen.offset,
                    }));
                }
                let inner = self.parse_expr(0)?;
                self.expect(Tok::Rparen, ")")?;
                Ok(inner)
            }
            Tok::IntLiteral | Tok::FloatLiteral | Tok::StringLiteral | Tok::Null => {
                let tok = self.bump();
                Ok(Expr::Literal(Literal::new(tok.offset, tok.tok, tok.literal)))
            }
            Tok::Star => {
                let tok = self.bump();
                Ok(Expr::Literal(Literal::new(tok.offset, Tok::Star, "*".to_string())))
            }
            Tok::Id => self.parse_suffixed(),
            _ => Err(self.err_unexpected("an expression")),
        }
    }

    /// An identifier, optionally followed by a call's `( ... )` argument list.
    fn parse_suffixed(&mut self) -> PResult<Expr> {
        let id = self.parse_ident("an identifier")?;
        if self.peek() != Tok::Lparen {
            return Ok(Expr::Identifier(id));
        }
        self.bump();
        let distinct = self.eat(Tok::Distinct);
        let mut args = Vec::new();
        if self.peek() != Tok::Rparen {
            args.push(self.parse_expr(0)?);
            while self.eat(Tok::Comma) {
                args.push(self.parse_expr(0)?);
            }
        }
        let rparen = self.expect(Tok::Rparen, ")")?;
        Ok(Expr::Call(CallExpr {
            func: id,
            distinct,
            args,
            end_pos: rparen.offset + 1,
        }))
    }

    /// Applies postfix operators (`IS [NOT] NULL`) to `lhs`, if one follows
    /// and its binding power clears `limit`. Returns `None` to stop the loop.
    fn parse_postfix(&mut self, lhs: Expr, limit: u8) -> PResult<Option<Expr>> {
        if self.peek() != Tok::Is || POSTFIX <= limit {
            return Ok(None);
        }
        let op_pos = self.pos();
        self.bump();
        let negated = self.eat(Tok::Not);
        self.expect(Tok::Null, "NULL")?;
        let end_pos = self.cur.offset;
        let op = if negated { Tok::IsNotNull } else { Tok::IsNull };
        Ok(Some(Expr::Unary(UnaryExpr {
            op_pos,
            op,
            operand: Box::new(lhs),
            postfix: true,
            end_pos,
        })))
    }

    /// The right-hand side of `IN`: either a comma-separated list or a
    /// `SELECT` producing the set to test membership against.
    fn parse_expr_list(&mut self) -> PResult<Expr> {
        let lparen = self.expect(Tok::Lparen, "(")?;
        if self.peek() == Tok::Select {
            let select = self.parse_select()?;
            let rparen = self.expect(Tok::Rparen, ")")?;
            return Ok(Expr::Subquery(Subquery {
                select: Box::new(select),
                lparen: lparen.offset,
                rparen: rparen.offset,
            }));
        }
        let mut items = vec![self.parse_expr(0)?];
        while self.eat(Tok::Comma) {
            items.push(self.parse_expr(0)?);
        }
        let rparen = self.expect(Tok::Rparen, ")")?;
        Ok(Expr::List(ExprList {
            items,
            lparen: lparen.offset,
            rparen: rparen.offset,
        }))
    }

    fn parse_condition(&mut self) -> PResult<Expr> {
        let start = self.pos();
        self.bump();
        let case = if self.peek() == Tok::When {
            None
        } else {
            Some(Box::new(self.parse_expr(0)?))
        };
        let mut blocks = Vec::new();
        while self.eat(Tok::When) {
            let when = self.parse_expr(0)?;
            self.expect(Tok::Then, "THEN")?;
            let then = self.parse_expr(0)?;
            blocks.push(ConditionBlock { when, then });
        }
        if blocks.is_empty() {
            return Err(self.err_unexpected("WHEN"));
        }
        let else_branch = if self.eat(Tok::Else) {
            Some(Box::new(self.parse_expr(0)?))
        } else {
            None
        };
        let end_tok = self.expect(Tok::End, "END")?;
        Ok(Expr::Condition(Condition {
            op_pos: start,
            case,
            blocks,
            else_branch,
            end_pos: end_tok.offset + 3,
        }))
    }

    fn parse_cast(&mut self) -> PResult<Expr> {
        let start = self.pos();
        self.bump();
        self.expect(Tok::Lparen, "(")?;
        let operand = self.parse_expr(0)?;
        self.expect(Tok::As, "AS")?;
        let to = self.parse_type()?;
        let rparen = self.expect(Tok::Rparen, ")")?;
        Ok(Expr::Cast(CastExpr {
            op_pos: start,
            operand: Box::new(operand),
            to,
            end_pos: rparen.offset + 1,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(sql: &str) -> Command {
        Parser::new(sql).parse_command().expect(sql)
    }

    #[test]
    fn backtick_quoted_identifier_strips_delimiters_and_sets_quoted() {
        let cmd = parse_one("SELECT `id` FROM `t`;");
        match cmd {
            Command::Select(sel) => {
                match &sel.columns[0].expr {
                    Some(Expr::Identifier(id)) => {
                        assert_eq!(id.name, "id");
                        assert!(id.quoted);
                        assert_eq!(id.end(), id.pos() + "`id`".len());
                    }
                    other => panic!("expected identifier, got {other:?}"),
                }
                let from = sel.from.unwrap();
                assert_eq!(from.name.unwrap().name, "t");
            }
            other => panic!("expected select, got {other:?}"),
        }
    }

    #[test]
    fn quoted_identifier_spelling_a_keyword_is_not_treated_as_one() {
        let expr = Parser::new("`SELECT`").parse_expr(0).unwrap();
        match expr {
            Expr::Identifier(id) => {
                assert_eq!(id.name, "SELECT");
                assert!(id.quoted);
            }
            other => panic!("expected identifier, got {other:?}"),
        }
    }

    #[test]
    fn parses_simple_select() {
        let cmd = parse_one("SELECT a, b FROM t WHERE a = 1;");
        match cmd {
            Command::Select(sel) => {
                assert_eq!(sel.columns.len(), 2);
                assert!(sel.where_clause.is_some());
            }
            _ => panic!("expected select"),
        }
    }

    #[test]
    fn parses_select_star() {
        let cmd = parse_one("SELECT * FROM t;");
        match cmd {
            Command::Select(sel) => assert!(sel.columns[0].star),
            _ => panic!("expected select"),
        }
    }

    #[test]
    fn parses_insert_values() {
        let cmd = parse_one("INSERT INTO t (a, b) VALUES (1, 'x');");
        match cmd {
            Command::Insert(ins) => {
                assert_eq!(ins.columns.len(), 2);
                assert_eq!(ins.values.len(), 2);
                assert!(!ins.default_values());
            }
            _ => panic!("expected insert"),
        }
    }

    #[test]
    fn parses_insert_default_values() {
        let cmd = parse_one("INSERT INTO t DEFAULT VALUES;");
        match cmd {
            Command::Insert(ins) => assert!(ins.default_values()),
            _ => panic!("expected insert"),
        }
    }

    #[test]
    fn parses_update_with_where() {
        let cmd = parse_one("UPDATE t SET a = 1, b = 2 WHERE id = 3;");
        match cmd {
            Command::Update(upd) => assert_eq!(upd.set.len(), 2),
            _ => panic!("expected update"),
        }
    }

    #[test]
    fn parses_delete() {
        let cmd = parse_one("DELETE FROM t WHERE id = 1;");
        match cmd {
            Command::Delete(del) => assert!(del.where_clause.is_some()),
            _ => panic!("expected delete"),
        }
    }

    #[test]
    fn parses_create_table_with_constraints() {
        let cmd = parse_one(
            "CREATE TABLE t (id INT PRIMARY KEY, name VARCHAR(10) NOT NULL, UNIQUE (name));",
        );
        match cmd {
            Command::CreateTable(ct) => {
                assert_eq!(ct.columns.len(), 2);
                assert!(ct.columns[0].primary_key);
                assert!(ct.columns[1].not_null);
                assert_eq!(ct.table_constraints.len(), 1);
            }
            _ => panic!("expected create table"),
        }
    }

    #[test]
    fn parses_create_index() {
        let cmd = parse_one("CREATE UNIQUE INDEX idx ON t (a, b DESC);");
        match cmd {
            Command::CreateIndex(ci) => {
                assert!(ci.unique);
                assert_eq!(ci.columns.len(), 2);
                assert_eq!(ci.columns[1].direction, OrderDirection::Desc);
            }
            _ => panic!("expected create index"),
        }
    }

    #[test]
    fn parses_transaction_begin_immediate() {
        let cmd = parse_one("BEGIN IMMEDIATE TRANSACTION;");
        match cmd {
            Command::Transaction(t) => {
                assert_eq!(t.op, Tok::Begin);
                assert_eq!(t.mode, Some(TransactionMode::Immediate));
            }
            _ => panic!("expected transaction"),
        }
    }

    #[test]
    fn parses_show_tables() {
        let cmd = parse_one("SHOW TABLES;");
        match cmd {
            Command::Show(s) => assert_eq!(s.kind, Tok::Tables),
            _ => panic!("expected show"),
        }
    }

    #[test]
    fn comment_only_input_parses_as_comment_command() {
        let cmd = parse_one("-- just a comment");
        match cmd {
            Command::Comment(c) => assert_eq!(c.content(), " just a comment"),
            _ => panic!("expected comment"),
        }
    }

    #[test]
    fn is_null_postfix_span_is_well_ordered() {
        let cmd = parse_one("SELECT a FROM t WHERE a IS NOT NULL;");
        if let Command::Select(sel) = cmd {
            let expr = sel.where_clause.unwrap();
            assert!(expr.pos() <= expr.end());
        } else {
            panic!("expected select");
        }
    }

    #[test]
    fn join_chain_is_left_associative_via_prior() {
        let cmd = parse_one("SELECT * FROM a JOIN b ON a.id = b.id LEFT JOIN c ON b.id = c.id;");
        if let Command::Select(sel) = cmd {
            let from = sel.from.unwrap();
            assert_eq!(from.join_type, join_type::LEFT);
            assert!(from.prior.is_some());
        } else {
            panic!("expected select");
        }
    }

    #[test]
    fn case_expression_parses_blocks_and_else() {
        let cmd = parse_one("SELECT CASE WHEN a = 1 THEN 'x' ELSE 'y' END FROM t;");
        if let Command::Select(sel) = cmd {
            match &sel.columns[0].expr {
                Some(Expr::Condition(cond)) => {
                    assert_eq!(cond.blocks.len(), 1);
                    assert!(cond.else_branch.is_some());
                }
                _ => panic!("expected condition"),
            }
        } else {
            panic!("expected select");
        }
    }

    #[test]
    fn cast_expression_spans_through_closing_paren() {
        let expr = Parser::new("CAST(a AS INT)").parse_expr(0).unwrap();
        if let Expr::Cast(cast) = &expr {
            assert_eq!(cast.end_pos, expr.end());
            assert_eq!(cast.end_pos, 14);
        } else {
            panic!("expected cast");
        }
    }

    #[test]
    fn in_list_parses_as_binary_with_expr_list_rhs() {
        let expr = Parser::new("a IN (1, 2, 3)").parse_expr(0).unwrap();
        match expr {
            Expr::Binary(b) => {
                assert_eq!(b.op, Tok::In);
                match *b.rhs {
                    Expr::List(list) => assert_eq!(list.items.len(), 3),
                    _ => panic!("expected list"),
                }
            }
            _ => panic!("expected binary"),
        }
    }

    #[test]
    fn like_binds_tighter_than_arithmetic_in_practice() {
        // `a + b LIKE 'c'` must parse as `a + (b LIKE 'c')` given this
        // dialect's (confirmed, if unusual) priority table.
        let expr = Parser::new("a + b LIKE 'c'").parse_expr(0).unwrap();
        match expr {
            Expr::Binary(outer) => {
                assert_eq!(outer.op, Tok::Plus);
                match *outer.rhs {
                    Expr::Binary(inner) => assert_eq!(inner.op, Tok::Like),
                    _ => panic!("expected nested LIKE"),
                }
            }
            _ => panic!("expected binary"),
        }
    }

    #[test]
    fn like_rejects_non_string_literal_rhs() {
        assert!(Parser::new("a LIKE b").parse_expr(0).is_err());
    }

    #[test]
    fn in_subquery_parses_as_binary_with_subquery_rhs() {
        let expr = Parser::new("id IN (SELECT a FROM t)").parse_expr(0).unwrap();
        match expr {
            Expr::Binary(b) => {
                assert_eq!(b.op, Tok::In);
                assert!(matches!(*b.rhs, Expr::Subquery(_)));
            }
            _ => panic!("expected binary"),
        }
    }

    #[test]
    fn scalar_subquery_in_parens_is_a_subquery_expr() {
        let expr = Parser::new("(SELECT a FROM t)").parse_expr(0).unwrap();
        assert!(matches!(expr, Expr::Subquery(_)));
    }

    #[test]
    fn bare_null_column_option_is_accepted() {
        let cmd = parse_one("CREATE TABLE t (id INT NULL);");
        if let Command::CreateTable(ct) = cmd {
            assert!(!ct.columns[0].not_null);
        } else {
            panic!("expected create table");
        }
    }

    #[test]
    fn function_call_with_distinct_and_star_arg() {
        let expr = Parser::new("COUNT(DISTINCT *)").parse_expr(0).unwrap();
        match expr {
            Expr::Call(call) => {
                assert!(call.distinct);
                assert_eq!(call.args.len(), 1);
            }
            _ => panic!("expected call"),
        }
    }

    #[test]
    fn call_with_zero_args_end_does_not_panic() {
        let expr = Parser::new("NOW()").parse_expr(0).unwrap();
        assert_eq!(expr.end(), 5);
    }

    fn binary_op(expr: &Expr) -> Tok {
        match expr {
            Expr::Binary(b) => b.op,
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn addition_is_left_associative() {
        // `1 + 2 + 3` parses as `(1 + 2) + 3`.
        let expr = Parser::new("1 + 2 + 3").parse_expr(0).unwrap();
        let Expr::Binary(outer) = &expr else {
            panic!("expected binary");
        };
        assert_eq!(outer.op, Tok::Plus);
        assert!(matches!(*outer.lhs, Expr::Binary(_)));
        assert!(matches!(*outer.rhs, Expr::Literal(_)));
    }

    #[test]
    fn and_binds_tighter_than_or_in_practice() {
        // `1 AND 2 OR 3` parses as `(1 AND 2) OR 3`.
        let expr = Parser::new("1 AND 2 OR 3").parse_expr(0).unwrap();
        let Expr::Binary(outer) = &expr else {
            panic!("expected binary");
        };
        assert_eq!(outer.op, Tok::Or);
        assert_eq!(binary_op(&outer.lhs), Tok::And);
    }

    #[test]
    fn not_chains_right_associatively() {
        // `NOT NOT NOT x` parses as `NOT (NOT (NOT x))`.
        let expr = Parser::new("NOT NOT NOT id").parse_expr(0).unwrap();
        let mut cur = &expr;
        for _ in 0..3 {
            match cur {
                Expr::Unary(u) => {
                    assert_eq!(u.op, Tok::Not);
                    assert!(!u.postfix);
                    cur = &u.operand;
                }
                other => panic!("expected unary NOT, got {other:?}"),
            }
        }
        assert!(matches!(cur, Expr::Identifier(_)));
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        // `1 + 2 * 3` parses as `1 + (2 * 3)`.
        let expr = Parser::new("1 + 2 * 3").parse_expr(0).unwrap();
        let Expr::Binary(outer) = &expr else {
            panic!("expected binary");
        };
        assert_eq!(outer.op, Tok::Plus);
        assert_eq!(binary_op(&outer.rhs), Tok::Star);
    }

    #[test]
    fn in_binds_looser_than_addition() {
        // `1 + id IN (1,2)` parses as `(1 + id) IN (1,2)`.
        let expr = Parser::new("1 + id IN (1,2)").parse_expr(0).unwrap();
        let Expr::Binary(outer) = &expr else {
            panic!("expected binary");
        };
        assert_eq!(outer.op, Tok::In);
        assert_eq!(binary_op(&outer.lhs), Tok::Plus);
    }

    #[test]
    fn is_not_null_chains_onto_its_own_result() {
        // `(x IS NOT NULL) IS NOT NULL` accepted and nests correctly.
        let expr = Parser::new("x IS NOT NULL IS NOT NULL")
            .parse_expr(0)
            .unwrap();
        let Expr::Unary(outer) = &expr else {
            panic!("expected unary");
        };
        assert_eq!(outer.op, Tok::IsNotNull);
        assert!(matches!(*outer.operand, Expr::Unary(_)));
    }
}
