//! Signature parsing: literal type and function signatures.
//!
//! Binding specifications refer to declarations by writing their signatures
//! as text (`foo(const Bar&, int)`), and added functions are declared the same
//! way. This module lexes those strings with logos and parses them into the
//! declaration model's [`TypeSpec`](crate::decl::TypeSpec) and
//! [`FunctionDecl`](crate::decl::FunctionDecl).

mod lexer;
mod parser;

use text_size::TextSize;
use thiserror::Error;

pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use parser::{parse_function, parse_type};

/// A signature that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (at offset {offset:?})")]
pub struct SignatureError {
    /// Human-readable error message
    pub message: String,
    /// Byte offset of the offending token
    pub offset: TextSize,
}

impl SignatureError {
    pub fn new(message: impl Into<String>, offset: TextSize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// Parse a function signature and render its normalized form
/// (`name(type,type)` with an optional `const` suffix).
pub fn normalize_signature(text: &str) -> Result<String, SignatureError> {
    Ok(parse_function(text)?.signature())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_signature_whitespace() {
        assert_eq!(
            normalize_signature("foo( const Bar & , int )").unwrap(),
            "foo(const Bar&,int)"
        );
        assert_eq!(
            normalize_signature("foo(const Bar&, int)").unwrap(),
            normalize_signature("void foo(const Bar &b,int n = 2)").unwrap()
        );
    }
}
