//! Lexer: turns source text into a one-token lookahead stream.
//!
//! The [`Lexer`] scans a single token ahead: [`Lexer::peek`] yields the lookahead without moving,
//! [`Lexer::next`] scans past it and returns the freshly scanned token. All tokens carry the
//! [`Span`] of their lexeme in the input text.

prelude!();

use parse::kw;

#[cfg(test)]
mod test;

/// A span in the input text.
#[readonly::make]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Span's start (inclusive).
    pub start: usize,
    /// Span's end (exclusive).
    pub end: usize,
}
impl Span {
    /// Constructor.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Span { start, end }
    }
    /// Extracts the relevant line of the input, and the previous/next line if any.
    ///
    /// Produces `(prev_line, row, col, line, next_line)` where `row` and `col` start at `0`. A
    /// span at the end of a newline-terminated input lands on a virtual `<EOI>` line after the
    /// last one.
    pub fn pretty_of(self, text: &str) -> (Option<String>, usize, usize, String, Option<String>) {
        if text.is_empty() {
            assert_eq!(self.start, 0);
            assert_eq!(self.end, 0);
            return (None, 0, 0, "<EOI>".into(), None);
        }
        let mut lines = text.lines().enumerate();

        let mut count = self.start;
        let mut prev_line = None;
        let mut last_row = 0;

        while let Some((row, line)) = lines.next() {
            if line.len() >= count {
                let (line, next) = {
                    match lines.next().map(|(_, s)| s.to_string()) {
                        Some(next) if next.is_empty() => (line.into(), None),
                        Some(next) => (line.into(), Some(next)),
                        None if text.ends_with('\n') => (line.into(), None),
                        None => (format!("{}<EOI>", line), None),
                    }
                };
                return (prev_line.map(String::from), row, count, line, next);
            }

            count -= line.len() + 1;
            prev_line = Some(line);
            last_row = row;
        }

        // End-of-input span on a newline-terminated text.
        (prev_line.map(String::from), last_row + 1, 0, "<EOI>".into(), None)
    }
}
impl From<(usize, usize)> for Span {
    fn from((start, end): (usize, usize)) -> Self {
        Self::new(start, end)
    }
}

/// Wraps something with a span.
#[derive(Debug, Clone, Copy)]
pub struct Spn<T> {
    /// Value wrapped.
    pub inner: T,
    /// Span.
    pub span: Span,
}
impl<T> Spn<T> {
    /// Constructor.
    pub fn new(inner: T, span: impl Into<Span>) -> Self {
        let span = span.into();
        Self { inner, span }
    }
}
impl<T> Deref for Spn<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.inner
    }
}

/// Token kinds.
///
/// Integer literals carry their decimal value; identifier and keyword lexemes are recovered from
/// the token's [`Span`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// An identifier: `[A-Za-z_][A-Za-z0-9_]*`, minus the keywords.
    Ident,
    /// An integer literal: `[0-9_]+`, underscores ignored.
    Int(usize),
    /// `=`.
    Assign,
    /// `!`.
    Not,
    /// `&&`.
    And,
    /// `||`.
    Or,
    /// `{`.
    LCurl,
    /// `}`.
    RCurl,
    /// `(`.
    LParen,
    /// `)`.
    RParen,
    /// `[`.
    LSquare,
    /// `]`.
    RSquare,
    /// `.`.
    Dot,
    /// `false` keyword.
    False,
    /// `true` keyword.
    True,
    /// `grid` keyword.
    Grid,
    /// `property` keyword.
    Property,
    /// `function` keyword.
    Function,
    /// `if` keyword.
    If,
    /// `else` keyword.
    Else,
    /// `for` keyword.
    For,
    /// `in` keyword.
    In,
    /// `return` keyword.
    Return,
    /// End of input.
    Eof,
}
impl fmt::Display for TokenKind {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ident => "'identifier'",
            Self::Int(_) => "'integer'",
            Self::Assign => "`=`",
            Self::Not => "`!`",
            Self::And => "`&&`",
            Self::Or => "`||`",
            Self::LCurl => "`{`",
            Self::RCurl => "`}`",
            Self::LParen => "`(`",
            Self::RParen => "`)`",
            Self::LSquare => "`[`",
            Self::RSquare => "`]`",
            Self::Dot => "`.`",
            Self::False => "`false`",
            Self::True => "`true`",
            Self::Grid => "`grid`",
            Self::Property => "`property`",
            Self::Function => "`function`",
            Self::If => "`if`",
            Self::Else => "`else`",
            Self::For => "`for`",
            Self::In => "`in`",
            Self::Return => "`return`",
            Self::Eof => "'end of input'",
        };
        s.fmt(fmt)
    }
}

/// A token: a kind and the span of its lexeme.
#[derive(Debug, Clone, Copy)]
pub struct Token {
    /// Kind of the token.
    pub kind: TokenKind,
    /// Span of the token's lexeme in the input.
    pub span: Span,
}
impl Token {
    /// Constructor.
    pub fn new(kind: TokenKind, span: impl Into<Span>) -> Self {
        Self {
            kind,
            span: span.into(),
        }
    }
}

/// True for the characters that may start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}
/// True for the characters that may continue an identifier.
fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Single-pass tokenizer over some input text.
///
/// # Examples
///
/// ```rust
/// # use slang::lexer::{Lexer, TokenKind};
/// let mut lexer = Lexer::new("grid pieces[8]").unwrap();
/// assert_eq!(lexer.peek().kind, TokenKind::Grid);
/// assert_eq!(lexer.next().unwrap().kind, TokenKind::Ident);
/// assert_eq!(lexer.next().unwrap().kind, TokenKind::LSquare);
/// assert_eq!(lexer.next().unwrap().kind, TokenKind::Int(8));
/// assert_eq!(lexer.next().unwrap().kind, TokenKind::RSquare);
/// assert_eq!(lexer.next().unwrap().kind, TokenKind::Eof);
/// assert_eq!(lexer.next().unwrap().kind, TokenKind::Eof);
/// ```
pub struct Lexer<'txt> {
    /// Text to lex.
    txt: &'txt str,
    /// Position in the text.
    cursor: usize,
    /// Current (lookahead) token.
    token: Token,
}
impl<'txt> Lexer<'txt> {
    /// Constructor, scans the first token.
    pub fn new(txt: &'txt str) -> PRes<Self> {
        let mut lexer = Self {
            txt,
            cursor: 0,
            token: Token::new(TokenKind::Eof, (0, 0)),
        };
        lexer.token = lexer.scan()?;
        Ok(lexer)
    }

    /// The text being lexed.
    pub fn txt(&self) -> &'txt str {
        self.txt
    }

    /// The current token, without advancing.
    pub fn peek(&self) -> Token {
        self.token
    }

    /// The lexeme of a token (or any span) in the input.
    pub fn lexeme(&self, span: Span) -> &'txt str {
        &self.txt[span.start..span.end]
    }

    /// Scans past the current token, returns the freshly scanned one.
    pub fn next(&mut self) -> PRes<Token> {
        self.token = self.scan()?;
        Ok(self.token)
    }

    /// The character under the cursor, if any.
    fn peek_char(&self) -> Option<char> {
        self.txt[self.cursor..].chars().next()
    }

    /// Consumes one character.
    fn bump(&mut self, c: char) {
        self.cursor += c.len_utf8()
    }

    /// Consumes whitespace: spaces, tabs, carriage returns and newlines.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            match c {
                ' ' | '\t' | '\r' | '\n' => self.bump(c),
                _ => break,
            }
        }
    }

    /// Fails over the span from `start` to the current cursor.
    fn fail(&self, start: usize, msg: impl Into<String>) -> PError {
        PError::new(Error::Msg(msg.into()), (start, self.cursor))
    }

    /// Scans one token.
    fn scan(&mut self) -> PRes<Token> {
        self.skip_whitespace();
        let start = self.cursor;

        let c = match self.peek_char() {
            None => return Ok(Token::new(TokenKind::Eof, (start, start))),
            Some(c) => c,
        };

        let kind = match c {
            '=' => {
                self.bump(c);
                TokenKind::Assign
            }
            '!' => {
                self.bump(c);
                TokenKind::Not
            }
            '{' => {
                self.bump(c);
                TokenKind::LCurl
            }
            '}' => {
                self.bump(c);
                TokenKind::RCurl
            }
            '(' => {
                self.bump(c);
                TokenKind::LParen
            }
            ')' => {
                self.bump(c);
                TokenKind::RParen
            }
            '[' => {
                self.bump(c);
                TokenKind::LSquare
            }
            ']' => {
                self.bump(c);
                TokenKind::RSquare
            }
            '.' => {
                self.bump(c);
                TokenKind::Dot
            }
            '&' => {
                self.bump(c);
                if self.peek_char() == Some('&') {
                    self.bump('&');
                    TokenKind::And
                } else {
                    bail!(self.fail(start, "expected `&&` instead of `&`"))
                }
            }
            '|' => {
                self.bump(c);
                if self.peek_char() == Some('|') {
                    self.bump('|');
                    TokenKind::Or
                } else {
                    bail!(self.fail(start, "expected `||` instead of `|`"))
                }
            }
            c if is_ident_start(c) => {
                while let Some(c) = self.peek_char() {
                    if !is_ident_char(c) {
                        break;
                    }
                    self.bump(c)
                }
                let lexeme = &self.txt[start..self.cursor];
                kw::lookup(lexeme).unwrap_or(TokenKind::Ident)
            }
            c if c.is_ascii_digit() => {
                let mut val: usize = 0;
                while let Some(c) = self.peek_char() {
                    if !c.is_ascii_digit() && c != '_' {
                        break;
                    }
                    self.bump(c);
                    if c != '_' {
                        val = val
                            .checked_mul(10)
                            .and_then(|v| v.checked_add(c as usize - '0' as usize))
                            .ok_or_else(|| self.fail(start, "integer literal too large"))?;
                    }
                }
                TokenKind::Int(val)
            }
            c => {
                self.bump(c);
                bail!(self.fail(start, format!("unknown character `{}`", c)))
            }
        };

        Ok(Token::new(kind, (start, self.cursor)))
    }
}
