//! # Lexer - Tokenizing Markup Source
//!
//! First stage of parsing: breaking markup into tokens with the [Logos]
//! lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte of the input appears in exactly one token. Nothing is skipped,
//! and input Logos cannot classify is kept as [`TokenKind::Text`]:
//!
//! ```
//! use marginalia_markup::lexer::lex;
//!
//! let input = "<p>a < b</p>";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! Tokens are context-free. The lexer does not know whether `<span>` is an
//! anchor or a styling wrapper; that is decided once attributes are read.

use std::ops::Range;

use logos::Logos;

/// Token kinds produced by the Logos lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<name ...>` or `<name ... />`
    #[regex(r"<[A-Za-z][A-Za-z0-9]*[^<>]*>")]
    OpenTag,

    /// `</name>`
    #[regex(r"</[A-Za-z][A-Za-z0-9]*[ \t\r\n]*>")]
    CloseTag,

    /// Run of character data (entities still encoded)
    #[regex(r"[^<]+")]
    Text,

    /// A `<` that does not start a tag
    #[token("<")]
    Lt,
}

/// A lexed token with its kind, text slice and byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Range<usize>,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        // Unrecognised input is kept as text
        let kind = result.unwrap_or(TokenKind::Text);
        tokens.push(Token {
            kind,
            text: lexer.slice(),
            span: lexer.span(),
        });
    }

    tokens
}
