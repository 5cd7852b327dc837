//! Lexer tests.

use crate::prelude::{lexer::*, *};

/// All token kinds of the input, including the final `Eof`.
fn kinds(input: &str) -> Vec<TokenKind> {
    let mut lexer = Lexer::new(input).unwrap();
    let mut kinds = vec![lexer.peek().kind];
    while lexer.peek().kind != TokenKind::Eof {
        kinds.push(lexer.next().unwrap().kind)
    }
    kinds
}

/// The rendered error of an input whose lexing fails.
fn lex_err(input: &str) -> String {
    let mut lexer = Lexer::new(input).unwrap();
    loop {
        match lexer.next() {
            Ok(tok) if tok.kind == TokenKind::Eof => panic!("lexing `{}` did not fail", input),
            Ok(_) => continue,
            Err(e) => return e.into_error(input).to_string(),
        }
    }
}

#[test]
fn keywords_and_punctuation() {
    use TokenKind::*;
    assert_eq!(
        kinds("grid board[2] function is_sat { return board[0] && !board[1] }"),
        vec![
            Grid, Ident, LSquare, Int(2), RSquare, Function, Ident, LCurl, Return, Ident,
            LSquare, Int(0), RSquare, And, Not, Ident, LSquare, Int(1), RSquare, RCurl, Eof,
        ],
    );
    assert_eq!(
        kinds("property p { a b } if else for i in 3 . = ( ) true false ||"),
        vec![
            Property, Ident, LCurl, Ident, Ident, RCurl, If, Else, For, Ident, In, Int(3), Dot,
            Assign, LParen, RParen, True, False, Or, Eof,
        ],
    );
}

#[test]
fn keywords_match_exactly() {
    use TokenKind::*;
    // Keywords embedded in longer identifiers are identifiers.
    assert_eq!(
        kinds("iff forx in_ _return grid_0"),
        vec![Ident, Ident, Ident, Ident, Ident, Eof],
    );
}

#[test]
fn integers() {
    use TokenKind::*;
    // Underscores are ignored, the rest reads as decimal.
    assert_eq!(
        kinds("1_000 42 0 0_1_2"),
        vec![Int(1000), Int(42), Int(0), Int(12), Eof],
    );
}

#[test]
fn spans() {
    let input = "  foo\nbar";
    let mut lexer = Lexer::new(input).unwrap();
    let tok = lexer.peek();
    assert_eq!((tok.span.start, tok.span.end), (2, 5));
    assert_eq!(lexer.lexeme(tok.span), "foo");
    let tok = lexer.next().unwrap();
    assert_eq!((tok.span.start, tok.span.end), (6, 9));
    assert_eq!(lexer.lexeme(tok.span), "bar");
    let tok = lexer.next().unwrap();
    assert_eq!(tok.kind, TokenKind::Eof);
    assert_eq!((tok.span.start, tok.span.end), (9, 9));
}

#[test]
fn unpaired_operators() {
    assert_eq!(lex_err("a & b"), "line 1: expected `&&` instead of `&`");
    assert_eq!(lex_err("a\n| b"), "line 2: expected `||` instead of `|`");
}

#[test]
fn unknown_character() {
    assert_eq!(lex_err("a # b"), "line 1: unknown character `#`");
}
