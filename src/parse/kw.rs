//! Keywords of the language.

#![allow(non_upper_case_globals)]

crate::prelude!();

use lexer::TokenKind;

macro_rules! build_keywords {
    {
        $(
            $(#[$kw_meta:meta])*
            $kw_ident:ident : $kw_str:expr => $kw_kind:expr
        ),*
        $(,)?
    } => {
        $(
            $(#[$kw_meta])*
            pub const $kw_ident: &str = $kw_str;
        )*

        lazy_static::lazy_static! {
            /// Map from keyword lexemes to their token kinds.
            pub static ref all: Map<&'static str, TokenKind> = {
                let mut map = Map::new();
                $(
                    let prev = map.insert($kw_str, $kw_kind);
                    if prev.is_some() {
                        panic!("[internal] keyword `{}` is defined twice", $kw_str)
                    }
                )*
                map
            };
        }
    };
}

build_keywords! {
    /// `false` constant.
    cst_false: "false" => TokenKind::False,
    /// `true` constant.
    cst_true: "true" => TokenKind::True,
    /// Grid declaration keyword.
    grid: "grid" => TokenKind::Grid,
    /// Property declaration keyword.
    property: "property" => TokenKind::Property,
    /// Function declaration keyword.
    function: "function" => TokenKind::Function,
    /// Conditional keyword.
    cnd_if: "if" => TokenKind::If,
    /// Conditional's alternative keyword.
    cnd_else: "else" => TokenKind::Else,
    /// Loop keyword.
    loop_for: "for" => TokenKind::For,
    /// Loop range keyword.
    loop_in: "in" => TokenKind::In,
    /// Return keyword.
    ret: "return" => TokenKind::Return,
}

/// Token kind of a keyword, if the input is one.
///
/// # Examples
///
/// ```rust
/// # use slang::{lexer::TokenKind, parse::kw};
/// assert_eq!(kw::lookup("grid"), Some(TokenKind::Grid));
/// assert_eq!(kw::lookup("gridlock"), None);
/// ```
pub fn lookup(ident: &str) -> Option<TokenKind> {
    all.get(ident).copied()
}
