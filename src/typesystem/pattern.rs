//! Name patterns used by rejection rules.

use regex::Regex;

use crate::decl::is_operator_name;
use crate::error::SpecError;

/// A name matcher: `*` matches anything, plain names and operator names
/// (`operator[]`, `operator()`) match exactly, and anything else with
/// regular-expression syntax is an anchored regex.
#[derive(Clone, Debug)]
pub enum Pattern {
    Any,
    Exact(String),
    Regex(Regex),
}

impl Pattern {
    pub fn new(text: &str) -> Result<Self, SpecError> {
        if text == "*" {
            return Ok(Pattern::Any);
        }
        if is_operator_name(text) || !has_regex_syntax(text) {
            return Ok(Pattern::Exact(text.to_string()));
        }
        Regex::new(&format!("^(?:{text})$"))
            .map(Pattern::Regex)
            .map_err(|e| SpecError::invalid_pattern(text, e.to_string()))
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Pattern::Any => true,
            Pattern::Exact(text) => text == name,
            Pattern::Regex(re) => re.is_match(name),
        }
    }
}

fn has_regex_syntax(text: &str) -> bool {
    text.contains(['.', '*', '+', '?', '[', ']', '(', ')', '{', '}', '|', '^', '$', '\\'])
}
