//! Logos-based lexer for type and function signatures.

use logos::Logos;
use text_size::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.inner.span().start as u32);
        let kind = match result {
            Ok(t) => t.into(),
            Err(()) => TokenKind::Error,
        };
        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Const,
    Volatile,
    Operator,
    Ident,
    Integer,
    Float,
    String,
    Char,
    Ellipsis,
    ColonColon,
    AmpAmp,
    Amp,
    Star,
    Lt,
    Gt,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Eq,
    Punct,
    /// Input the lexer could not recognize.
    Error,
}

/// Logos token enum - maps to TokenKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum LogosToken {
    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("const")]
    Const,

    #[token("volatile")]
    Volatile,

    #[token("operator")]
    Operator,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+[uUlL]*")]
    #[regex(r"0[xX][0-9a-fA-F]+[uUlL]*")]
    #[regex(r"0[bB][01]+[uUlL]*")]
    Integer,

    #[regex(r"[0-9]*\.[0-9]+([eE][+-]?[0-9]+)?[fF]?")]
    #[regex(r"[0-9]+\.([eE][+-]?[0-9]+)?[fF]?")]
    Float,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    #[regex(r"'([^'\\]|\\.)+'")]
    Char,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("...")]
    Ellipsis,

    #[token("::")]
    ColonColon,

    #[token("&&")]
    AmpAmp,

    #[token("&")]
    Amp,

    #[token("*")]
    Star,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token(",")]
    Comma,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("=")]
    Eq,

    /// Any other operator character (`+`, `-`, `!`, `|`, ...).
    #[regex(r"[-+!~/%^|?.:]")]
    Punct,
}

impl From<LogosToken> for TokenKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            Const => TokenKind::Const,
            Volatile => TokenKind::Volatile,
            Operator => TokenKind::Operator,
            Ident => TokenKind::Ident,
            Integer => TokenKind::Integer,
            Float => TokenKind::Float,
            String => TokenKind::String,
            Char => TokenKind::Char,
            Ellipsis => TokenKind::Ellipsis,
            ColonColon => TokenKind::ColonColon,
            AmpAmp => TokenKind::AmpAmp,
            Amp => TokenKind::Amp,
            Star => TokenKind::Star,
            Lt => TokenKind::Lt,
            Gt => TokenKind::Gt,
            Comma => TokenKind::Comma,
            LParen => TokenKind::LParen,
            RParen => TokenKind::RParen,
            LBracket => TokenKind::LBracket,
            RBracket => TokenKind::RBracket,
            LBrace => TokenKind::LBrace,
            RBrace => TokenKind::RBrace,
            Eq => TokenKind::Eq,
            Punct => TokenKind::Punct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lex_const_ref() {
        assert_eq!(
            kinds("const QList<int>&"),
            vec![
                TokenKind::Const,
                TokenKind::Ident,
                TokenKind::Lt,
                TokenKind::Ident,
                TokenKind::Gt,
                TokenKind::Amp,
            ]
        );
    }

    #[test]
    fn test_lex_qualified_name_and_rvalue() {
        assert_eq!(
            kinds("ns::Foo&&"),
            vec![
                TokenKind::Ident,
                TokenKind::ColonColon,
                TokenKind::Ident,
                TokenKind::AmpAmp,
            ]
        );
    }

    #[test]
    fn test_lex_literals() {
        assert_eq!(
            kinds("0x1F 2.5f 'a' \"s\""),
            vec![
                TokenKind::Integer,
                TokenKind::Float,
                TokenKind::Char,
                TokenKind::String,
            ]
        );
    }

    #[test]
    fn test_offsets_track_whitespace() {
        let tokens = tokenize("int  x");
        assert_eq!(tokens[1].text, "x");
        assert_eq!(tokens[1].offset, TextSize::new(5));
    }
}
