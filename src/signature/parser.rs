//! Recursive descent parser for type and function signatures.

use text_size::TextSize;

use super::SignatureError;
use super::lexer::{Lexer, Token, TokenKind};
use crate::decl::{
    Access, ArgumentDecl, ArrayDim, FunctionDecl, FunctionModifiers, ReferenceKind, TypeSpec,
};

/// Words that combine into a single builtin type name (`unsigned long long`).
const BUILTIN_PREFIXES: &[&str] = &["unsigned", "signed", "short", "long"];
const BUILTIN_WORDS: &[&str] = &["unsigned", "signed", "short", "long", "int", "char", "double"];

/// Parse a type signature such as `const QList<int>&` or `int[3]`.
pub fn parse_type(input: &str) -> Result<TypeSpec, SignatureError> {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens, input.len());
    let ty = parser.parse_type()?;
    parser.finish()?;
    Ok(ty)
}

/// Parse a function signature such as `virtual int f(const Foo& a, int b = 0) const`.
pub fn parse_function(input: &str) -> Result<FunctionDecl, SignatureError> {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens, input.len());
    let function = parser.parse_function()?;
    parser.finish()?;
    Ok(function)
}

/// The parser state
struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
    end: TextSize,
}

impl<'t, 'a> Parser<'t, 'a> {
    fn new(tokens: &'t [Token<'a>], len: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            end: TextSize::new(len as u32),
        }
    }

    // =========================================================================
    // TOKEN HELPERS
    // =========================================================================

    fn nth(&self, n: usize) -> Option<&Token<'a>> {
        self.tokens.get(self.pos + n)
    }

    fn kind(&self) -> Option<TokenKind> {
        self.nth(0).map(|t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.kind() == Some(kind)
    }

    fn at_word(&self, word: &str) -> bool {
        self.nth(0)
            .is_some_and(|t| t.kind == TokenKind::Ident && t.text == word)
    }

    fn at_punct(&self, text: &str) -> bool {
        self.nth(0)
            .is_some_and(|t| t.kind == TokenKind::Punct && t.text == text)
    }

    fn bump(&mut self) -> Option<&Token<'a>> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<&'a str, SignatureError> {
        match self.nth(0) {
            Some(t) if t.kind == kind => {
                let text = t.text;
                self.pos += 1;
                Ok(text)
            }
            _ => Err(self.error(format!("expected {what}"))),
        }
    }

    fn error(&self, message: impl Into<String>) -> SignatureError {
        let offset = self.nth(0).map(|t| t.offset).unwrap_or(self.end);
        SignatureError::new(message, offset)
    }

    fn finish(&self) -> Result<(), SignatureError> {
        if self.pos < self.tokens.len() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(())
    }

    // =========================================================================
    // TYPES
    // =========================================================================

    fn parse_type(&mut self) -> Result<TypeSpec, SignatureError> {
        let mut spec = TypeSpec::default();
        loop {
            match self.kind() {
                Some(TokenKind::Const) => spec.is_const = true,
                Some(TokenKind::Volatile) => spec.is_volatile = true,
                _ => break,
            }
            self.bump();
        }

        spec.name = self.parse_type_name()?;
        if self.at(TokenKind::Lt) {
            spec.instantiations = self.parse_template_args()?;
        }

        loop {
            match self.kind() {
                // `T const` binds to the pointee; `T* const` is ignored.
                Some(TokenKind::Const) => {
                    if spec.indirections == 0 {
                        spec.is_const = true;
                    }
                }
                Some(TokenKind::Volatile) => spec.is_volatile = true,
                Some(TokenKind::Star) => spec.indirections += 1,
                Some(TokenKind::Amp) => spec.reference = ReferenceKind::LValue,
                Some(TokenKind::AmpAmp) => spec.reference = ReferenceKind::RValue,
                _ => break,
            }
            self.bump();
        }

        self.parse_array_dims(&mut spec)?;
        Ok(spec)
    }

    fn parse_type_name(&mut self) -> Result<String, SignatureError> {
        if self.at(TokenKind::ColonColon) {
            self.bump();
        }
        if self.at(TokenKind::Ellipsis) {
            self.bump();
            return Ok("...".to_string());
        }

        let first = self.expect(TokenKind::Ident, "type name")?;
        let mut name = first.to_string();

        if BUILTIN_PREFIXES.contains(&first) {
            while let Some(t) = self.nth(0) {
                if t.kind != TokenKind::Ident || !BUILTIN_WORDS.contains(&t.text) {
                    break;
                }
                name.push(' ');
                name.push_str(t.text);
                self.pos += 1;
            }
            return Ok(name);
        }

        while self.at(TokenKind::ColonColon)
            && self.nth(1).is_some_and(|t| t.kind == TokenKind::Ident)
        {
            self.bump();
            name.push_str("::");
            name.push_str(self.expect(TokenKind::Ident, "name")?);
        }
        Ok(name)
    }

    fn parse_template_args(&mut self) -> Result<Vec<TypeSpec>, SignatureError> {
        self.expect(TokenKind::Lt, "`<`")?;
        let mut args = Vec::new();
        if self.at(TokenKind::Gt) {
            self.bump();
            return Ok(args);
        }
        loop {
            let arg = if self.at(TokenKind::Integer) {
                let text = self.expect(TokenKind::Integer, "integer")?;
                TypeSpec::named(text)
            } else if self.at_punct("-") && self.nth(1).is_some_and(|t| t.kind == TokenKind::Integer)
            {
                self.bump();
                let text = self.expect(TokenKind::Integer, "integer")?;
                TypeSpec::named(format!("-{text}"))
            } else {
                self.parse_type()?
            };
            args.push(arg);
            if self.at(TokenKind::Comma) {
                self.bump();
                continue;
            }
            self.expect(TokenKind::Gt, "`>`")?;
            return Ok(args);
        }
    }

    fn parse_array_dims(&mut self, spec: &mut TypeSpec) -> Result<(), SignatureError> {
        while self.at(TokenKind::LBracket) {
            self.bump();
            if self.at(TokenKind::RBracket) {
                self.bump();
                spec.array_dims.push(ArrayDim::Unspecified);
                continue;
            }
            let mut text = String::new();
            while let Some(t) = self.nth(0) {
                if t.kind == TokenKind::RBracket {
                    break;
                }
                text.push_str(t.text);
                self.pos += 1;
            }
            self.expect(TokenKind::RBracket, "`]`")?;
            spec.array_dims.push(ArrayDim::Sized(text));
        }
        Ok(())
    }

    // =========================================================================
    // FUNCTIONS
    // =========================================================================

    fn parse_function(&mut self) -> Result<FunctionDecl, SignatureError> {
        let mut modifiers = FunctionModifiers::default();
        loop {
            if self.at_word("static") {
                modifiers.is_static = true;
            } else if self.at_word("virtual") {
                modifiers.is_virtual = true;
            } else if self.at_word("explicit") {
                modifiers.is_explicit = true;
            } else if self.at_word("inline") || self.at_word("constexpr") {
                // no semantic effect
            } else {
                break;
            }
            self.bump();
        }

        let (name, return_type) = if self.at(TokenKind::Operator) {
            self.parse_operator(None)?
        } else if self.at_punct("~") {
            self.bump();
            let name = self.expect(TokenKind::Ident, "destructor name")?;
            (format!("~{name}"), None)
        } else {
            let ty = self.parse_type()?;
            if self.at(TokenKind::LParen) {
                // No return type: constructor or bare added-function name.
                (crate::base::simple_name(&ty.name).to_string(), None)
            } else if self.at(TokenKind::Operator) {
                self.parse_operator(Some(ty))?
            } else {
                let mut name = self.expect(TokenKind::Ident, "function name")?.to_string();
                while self.at(TokenKind::ColonColon) {
                    self.bump();
                    if self.at(TokenKind::Operator) {
                        let operator = self.parse_operator(Some(ty))?;
                        return self.finish_function(operator, modifiers);
                    }
                    name = self.expect(TokenKind::Ident, "function name")?.to_string();
                }
                (name, Some(ty))
            }
        };

        self.finish_function((name, return_type), modifiers)
    }

    fn finish_function(
        &mut self,
        (name, return_type): (String, Option<TypeSpec>),
        mut modifiers: FunctionModifiers,
    ) -> Result<FunctionDecl, SignatureError> {
        self.expect(TokenKind::LParen, "`(`")?;
        let arguments = self.parse_arguments()?;
        self.expect(TokenKind::RParen, "`)`")?;

        loop {
            match self.kind() {
                Some(TokenKind::Const) => {
                    self.bump();
                    modifiers.is_const = true;
                }
                Some(TokenKind::Amp) | Some(TokenKind::AmpAmp) => {
                    self.bump();
                }
                Some(TokenKind::Ident) if self.at_word("override") => {
                    self.bump();
                    modifiers.is_override = true;
                }
                Some(TokenKind::Ident) if self.at_word("final") => {
                    self.bump();
                    modifiers.is_final = true;
                }
                Some(TokenKind::Ident) if self.at_word("noexcept") => {
                    self.bump();
                    if self.at(TokenKind::LParen) {
                        self.skip_balanced()?;
                    }
                }
                Some(TokenKind::Eq) => {
                    self.bump();
                    match self.nth(0) {
                        Some(t) if t.kind == TokenKind::Integer && t.text == "0" => {
                            modifiers.is_abstract = true;
                            modifiers.is_virtual = true;
                        }
                        Some(t) if t.kind == TokenKind::Ident && t.text == "delete" => {
                            modifiers.is_deleted = true;
                        }
                        Some(t) if t.kind == TokenKind::Ident && t.text == "default" => {}
                        _ => return Err(self.error("expected `0`, `delete` or `default`")),
                    }
                    self.bump();
                }
                _ => break,
            }
        }

        Ok(FunctionDecl {
            name,
            return_type,
            arguments,
            access: Access::Public,
            modifiers,
        })
    }

    /// Parse `operator<sym>` or a conversion operator `operator T`.
    fn parse_operator(
        &mut self,
        return_type: Option<TypeSpec>,
    ) -> Result<(String, Option<TypeSpec>), SignatureError> {
        self.expect(TokenKind::Operator, "`operator`")?;

        let pair = |p: &Self, open: TokenKind, close: TokenKind| {
            p.at(open) && p.nth(1).is_some_and(|t| t.kind == close)
        };
        if pair(self, TokenKind::LParen, TokenKind::RParen) {
            self.pos += 2;
            return Ok(("operator()".to_string(), return_type.or_else(|| Some(TypeSpec::void()))));
        }
        if pair(self, TokenKind::LBracket, TokenKind::RBracket) {
            self.pos += 2;
            return Ok(("operator[]".to_string(), return_type.or_else(|| Some(TypeSpec::void()))));
        }

        if self.at_word("new") || self.at_word("delete") {
            let word = self.expect(TokenKind::Ident, "operator name")?;
            return Ok((format!("operator {word}"), return_type));
        }

        if self.at(TokenKind::Ident) || self.at(TokenKind::Const) {
            // Conversion operator: the target type is the return type.
            let target = self.parse_type()?;
            return Ok((format!("operator {target}"), Some(target)));
        }

        let mut symbol = String::new();
        while let Some(t) = self.nth(0) {
            if t.kind == TokenKind::LParen {
                break;
            }
            match t.kind {
                TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::Eq
                | TokenKind::Amp
                | TokenKind::AmpAmp
                | TokenKind::Star
                | TokenKind::Punct
                | TokenKind::Comma => symbol.push_str(t.text),
                _ => return Err(self.error("unexpected token in operator name")),
            }
            self.pos += 1;
        }
        if symbol.is_empty() {
            return Err(self.error("expected operator symbol"));
        }
        Ok((
            format!("operator{symbol}"),
            return_type.or_else(|| Some(TypeSpec::void())),
        ))
    }

    fn parse_arguments(&mut self) -> Result<Vec<ArgumentDecl>, SignatureError> {
        let mut arguments = Vec::new();
        if self.at(TokenKind::RParen) {
            return Ok(arguments);
        }
        if self.at_word("void") && self.nth(1).is_some_and(|t| t.kind == TokenKind::RParen) {
            self.bump();
            return Ok(arguments);
        }

        loop {
            let mut ty = self.parse_type()?;
            let mut name = String::new();
            if self.at(TokenKind::Ident) {
                name = self.expect(TokenKind::Ident, "argument name")?.to_string();
                self.parse_array_dims(&mut ty)?;
            }
            let default_value = if self.at(TokenKind::Eq) {
                self.bump();
                Some(self.parse_default_value()?)
            } else {
                None
            };
            arguments.push(ArgumentDecl {
                name,
                ty,
                default_value,
            });

            if self.at(TokenKind::Comma) {
                self.bump();
                continue;
            }
            return Ok(arguments);
        }
    }

    /// Collect the raw text of a default value up to the next top-level
    /// `,` or `)`.
    fn parse_default_value(&mut self) -> Result<String, SignatureError> {
        let mut text = String::new();
        let mut depth = 0usize;
        let mut previous_word = false;
        while let Some(t) = self.nth(0) {
            match t.kind {
                TokenKind::Comma | TokenKind::RParen if depth == 0 => break,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace | TokenKind::Lt => {
                    depth += 1
                }
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace | TokenKind::Gt => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            let word = matches!(
                t.kind,
                TokenKind::Ident | TokenKind::Integer | TokenKind::Float | TokenKind::Const
            );
            if word && previous_word {
                text.push(' ');
            }
            text.push_str(t.text);
            previous_word = word;
            self.pos += 1;
        }
        if text.is_empty() {
            return Err(self.error("expected default value"));
        }
        Ok(text)
    }

    fn skip_balanced(&mut self) -> Result<(), SignatureError> {
        self.expect(TokenKind::LParen, "`(`")?;
        let mut depth = 1usize;
        while let Some(t) = self.bump() {
            match t.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
        Err(self.error("unbalanced parentheses"))
    }
}
