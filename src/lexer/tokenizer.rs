//! The scanner itself: one rune of lookahead over a `&str`, no buffering
//! beyond what UTF-8 slicing already gives us for free.

use super::token::{keyword, Tok};

/// One `(offset, token, literal)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted {
    pub offset: usize,
    pub tok: Tok,
    pub literal: String,
}

/// Hand-written scanner over a source string.
///
/// `next()` never panics. A malformed construct yields `Tok::Illegal` and
/// records a reason retrievable through [`Lexer::error`]; every later call
/// keeps returning `Tok::Eof` once the input is exhausted.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    error: Option<String>,
}

type Scan = Result<(Tok, String), String>;

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            error: None,
        }
    }

    /// The most recent lexical error, if the last token was `Tok::Illegal`.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Produces the next token. Returns `(last_offset, Tok::Eof, "")` for
    /// every call once the input is exhausted.
    pub fn next(&mut self) -> Emitted {
        loop {
            let start = self.pos;
            let Some(c) = self.peek() else {
                return self.eof(start);
            };
            if c.is_whitespace() {
                self.bump();
                continue;
            }
            let scan = match c {
                '`' => self.read_quoted_identifier(),
                '\'' | '"' => self.read_string(c),
                '/' => self.read_slash_prefix(),
                '-' => self.read_minus_prefix(),
                '=' => self.read_equal_postfix(Tok::Eq, Tok::Eq, "="),
                '<' => self.read_less_prefix(),
                '>' => self.read_equal_postfix(Tok::Gt, Tok::Ge, ">"),
                '+' => self.read_single(Tok::Plus, c),
                '*' => self.read_single(Tok::Star, c),
                '(' => self.read_single(Tok::Lparen, c),
                ')' => self.read_single(Tok::Rparen, c),
                '.' => self.read_single(Tok::Dot, c),
                ',' => self.read_single(Tok::Comma, c),
                ';' => self.read_single(Tok::Semi, c),
                c if c.is_alphabetic() => self.read_id_or_keyword(),
                c if c.is_ascii_digit() => self.read_number(),
                _ => Err("Illegal token rune".to_string()),
            };
            return self.finish(start, scan);
        }
    }

    fn finish(&mut self, start: usize, scan: Scan) -> Emitted {
        match scan {
            Ok((tok, literal)) => {
                self.error = None;
                Emitted {
                    offset: start,
                    tok,
                    literal,
                }
            }
            Err(msg) => {
                self.error = Some(msg);
                Emitted {
                    offset: self.pos,
                    tok: Tok::Illegal,
                    literal: String::new(),
                }
            }
        }
    }

    fn eof(&mut self, start: usize) -> Emitted {
        self.error = None;
        Emitted {
            offset: start,
            tok: Tok::Eof,
            literal: String::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn read_single(&mut self, tok: Tok, c: char) -> Scan {
        self.bump();
        Ok((tok, c.to_string()))
    }

    fn read_id_or_keyword(&mut self) -> Scan {
        let (tok, literal) = self.read_identifier_body(false)?;
        match keyword(&literal) {
            Some(kw) => Ok((kw, literal)),
            None => Ok((tok, literal)),
        }
    }

    fn read_quoted_identifier(&mut self) -> Scan {
        self.bump(); // opening backtick
        if self.peek().is_none() {
            return Err("Bad quoted identifier, no body".to_string());
        }
        self.read_identifier_body(true)
    }

    /// Shared by bare and back-tick quoted identifiers. `quoted` selects the
    /// closing-backtick loop; both require the first rune to be a letter.
    fn read_identifier_body(&mut self, quoted: bool) -> Scan {
        let mut lit = String::new();
        if quoted {
            lit.push('`');
        }

        let Some(first) = self.peek() else {
            return Err("Unexpected EOF in identifier".to_string());
        };
        if !first.is_alphabetic() {
            return Err("Bad identifier, should start with a letter".to_string());
        }

        if quoted {
            self.bump();
            lit.push(first);
            loop {
                match self.bump() {
                    None => return Err("Unterminated quoted identifier".to_string()),
                    Some('`') => {
                        lit.push('`');
                        break;
                    }
                    Some(c) if c.is_alphanumeric() => lit.push(c),
                    Some(_) => return Err("Illegal identifier character".to_string()),
                }
            }
        } else {
            lit.push(first);
            self.bump();
            while let Some(c) = self.peek() {
                if !c.is_alphanumeric() {
                    break;
                }
                lit.push(c);
                self.bump();
            }
        }
        Ok((Tok::Id, lit))
    }

    fn read_string(&mut self, quote: char) -> Scan {
        self.bump();
        let mut lit = String::new();
        lit.push(quote);
        loop {
            match self.peek() {
                None => return Err("Unexpected EOF in string literal".to_string()),
                Some(c) if is_newline(c) => {
                    return Err("Unexpected new line in string literal".to_string())
                }
                Some(c) => {
                    self.bump();
                    lit.push(c);
                    if c == quote {
                        break;
                    }
                }
            }
        }
        Ok((Tok::StringLiteral, lit))
    }

    fn read_slash_prefix(&mut self) -> Scan {
        self.bump(); // '/'
        if self.peek() != Some('*') {
            return Ok((Tok::Slash, "/".to_string()));
        }
        self.bump(); // '*'

        let mut lit = String::from("/*");
        loop {
            match self.bump() {
                None => return Err(r#"Unexpected "*/" in end of comment"#.to_string()),
                Some(c) if is_newline(c) => {
                    return Err("New line in /* */ block is not allowed".to_string())
                }
                Some(c) => {
                    lit.push(c);
                    if c == '*' {
                        match self.peek() {
                            None => return Err(r#"Unexpected "*/" in end of comment"#.to_string()),
                            Some('/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                        }
                    }
                }
            }
        }
        lit.push_str("*/");
        Ok((Tok::Comment, lit))
    }

    fn read_minus_prefix(&mut self) -> Scan {
        self.bump(); // '-'
        if self.peek() != Some('-') {
            return Ok((Tok::Minus, "-".to_string()));
        }
        self.bump(); // second '-'

        let mut lit = String::from("--");
        loop {
            match self.bump() {
                None => return Err(r#"Unexpected "--" in end of comment"#.to_string()),
                Some(c) => {
                    lit.push(c);
                    if c == '-' {
                        match self.peek() {
                            None => return Err(r#"Unexpected "--" in end of comment"#.to_string()),
                            Some('-') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                        }
                    }
                }
            }
        }
        lit.push_str("--");
        Ok((Tok::Comment, lit))
    }

    fn read_less_prefix(&mut self) -> Scan {
        self.bump(); // '<'
        match self.peek() {
            None => Err(r#"Bad "<" prefix token"#.to_string()),
            Some('=') => {
                self.bump();
                Ok((Tok::Le, "<=".to_string()))
            }
            Some('>') => {
                self.bump();
                Ok((Tok::Ne, "<>".to_string()))
            }
            Some(_) => Ok((Tok::Lt, "<".to_string())),
        }
    }

    /// `=`/`==` and `>`/`>=` share this shape: an optional trailing `=`
    /// promotes the unary prefix token to the binary one.
    fn read_equal_postfix(&mut self, unary: Tok, binary: Tok, prefix: &str) -> Scan {
        self.bump();
        match self.peek() {
            None => Err(format!(r#"Bad "{prefix}" prefix token"#)),
            Some('=') => {
                self.bump();
                Ok((binary, format!("{prefix}=")))
            }
            Some(_) => Ok((unary, prefix.to_string())),
        }
    }

    fn read_number(&mut self) -> Scan {
        let mut lit = String::new();
        let mut has_dot = false;
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_digit() => {
                    lit.push(c);
                    self.bump();
                }
                Some('.') => {
                    if has_dot {
                        return Err("Bad floating number literal".to_string());
                    }
                    has_dot = true;
                    lit.push('.');
                    self.bump();
                }
                Some(c) if c.is_alphabetic() => {
                    return Err("Bad floating number literal".to_string())
                }
                _ => break,
            }
        }
        Ok((
            if has_dot {
                Tok::FloatLiteral
            } else {
                Tok::IntLiteral
            },
            lit,
        ))
    }
}

fn is_newline(c: char) -> bool {
    c == '\r' || c == '\n'
}
