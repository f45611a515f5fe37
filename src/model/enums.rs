//! Enums and enumerator value evaluation.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::{ClassId, EnumId, TypeEntryId};
use crate::decl::{Access, EnumDecl};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetaEnumValue {
    pub name: SmolStr,
    pub value: i64,
    /// Initializer text as declared.
    pub source: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetaEnum {
    pub id: EnumId,
    pub entry: TypeEntryId,
    /// Qualified name.
    pub name: Arc<str>,
    pub enclosing: Option<ClassId>,
    pub values: Vec<MetaEnumValue>,
    pub is_scoped: bool,
    pub flags: Option<TypeEntryId>,
    pub access: Access,
}

impl MetaEnum {
    pub fn value(&self, name: &str) -> Option<i64> {
        self.values.iter().find(|v| v.name == name).map(|v| v.value)
    }
}

/// Evaluate enumerator values.
///
/// Initializers may be integer literals (decimal, hex, octal, binary, with
/// `u`/`l` suffixes), character literals, or references to earlier
/// enumerators, optionally negated. Anything else is reported by name in the
/// second element and takes the next implicit value.
pub fn evaluate_enum_values(decl: &EnumDecl) -> (Vec<MetaEnumValue>, Vec<String>) {
    let mut values: Vec<MetaEnumValue> = Vec::with_capacity(decl.values.len());
    let mut failures = Vec::new();
    let mut next = 0i64;

    for value in &decl.values {
        let evaluated = match &value.value {
            None => next,
            Some(text) => match evaluate(text, &values) {
                Some(v) => v,
                None => {
                    failures.push(value.name.clone());
                    next
                }
            },
        };
        values.push(MetaEnumValue {
            name: SmolStr::new(&value.name),
            value: evaluated,
            source: value.value.clone(),
        });
        next = evaluated.wrapping_add(1);
    }
    (values, failures)
}

fn evaluate(text: &str, earlier: &[MetaEnumValue]) -> Option<i64> {
    let text = text.trim();
    let text = text
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .map(str::trim)
        .unwrap_or(text);
    if let Some(rest) = text.strip_prefix('-') {
        return evaluate(rest, earlier).map(i64::wrapping_neg);
    }
    if let Some(rest) = text.strip_prefix('+') {
        return evaluate(rest, earlier);
    }
    if let Some(v) = parse_integer_literal(text).or_else(|| parse_char_literal(text)) {
        return Some(v);
    }
    let name = crate::base::simple_name(text);
    earlier.iter().rev().find(|v| v.name == name).map(|v| v.value)
}

/// Parse an integer literal with an optional radix prefix and suffixes.
pub fn parse_integer_literal(text: &str) -> Option<i64> {
    let digits = text.trim_end_matches(['u', 'U', 'l', 'L']);
    if digits.is_empty() || !digits.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let (radix, body) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, hex)
    } else if let Some(bin) = digits
        .strip_prefix("0b")
        .or_else(|| digits.strip_prefix("0B"))
    {
        (2, bin)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };
    let body = body.replace('\'', "");
    u64::from_str_radix(&body, radix).ok().map(|v| v as i64)
}

fn parse_char_literal(text: &str) -> Option<i64> {
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut chars = inner.chars();
    let c = match chars.next()? {
        '\\' => match chars.next()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            _ => return None,
        },
        c => c,
    };
    if chars.next().is_some() {
        return None;
    }
    Some(c as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("42", Some(42))]
    #[case("0x1F", Some(31))]
    #[case("0b101", Some(5))]
    #[case("017", Some(15))]
    #[case("10u", Some(10))]
    #[case("0xFFFFFFFFul", Some(0xFFFF_FFFF))]
    #[case("0", Some(0))]
    #[case("abc", None)]
    fn test_integer_literals(#[case] text: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_integer_literal(text), expected);
    }

    #[test]
    fn test_implicit_increment_and_references() {
        let decl = EnumDecl::new("Color")
            .with_value("Red", None)
            .with_value("Green", Some("5"))
            .with_value("Blue", None)
            .with_value("Alias", Some("Color::Green"))
            .with_value("Neg", Some("-Blue"))
            .with_value("Letter", Some("'A'"));
        let (values, failures) = evaluate_enum_values(&decl);
        assert!(failures.is_empty());
        let got: Vec<i64> = values.iter().map(|v| v.value).collect();
        assert_eq!(got, vec![0, 5, 6, 5, -6, 65]);
    }

    #[test]
    fn test_unsupported_expression_is_reported() {
        let decl = EnumDecl::new("Flags")
            .with_value("A", Some("1"))
            .with_value("B", Some("1 << 3"));
        let (values, failures) = evaluate_enum_values(&decl);
        assert_eq!(failures, vec!["B".to_string()]);
        assert_eq!(values[1].value, 2);
    }
}
