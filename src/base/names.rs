//! Qualified name helpers.
//!
//! Names are native-language qualified names such as `ns::Outer::Inner`.
//! Template argument lists may themselves contain separators
//! (`Box<ns::T>`), so every split here skips over `<...>` brackets.

/// Separator between scope segments.
pub const SCOPE_SEPARATOR: &str = "::";

/// Find the byte offset of the last top-level `::` in `name`.
fn last_separator(name: &str) -> Option<usize> {
    let bytes = name.as_bytes();
    let mut depth = 0usize;
    let mut found = None;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && i + 1 < bytes.len() && bytes[i + 1] == b':' => {
                found = Some(i);
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    found
}

/// The enclosing scope of a qualified name (`a::b::C` -> `a::b`).
pub fn parent_scope(name: &str) -> Option<&str> {
    last_separator(name).map(|idx| &name[..idx])
}

/// The last segment of a qualified name (`a::b::C` -> `C`).
pub fn simple_name(name: &str) -> &str {
    match last_separator(name) {
        Some(idx) => &name[idx + SCOPE_SEPARATOR.len()..],
        None => name,
    }
}

/// Join a scope and a name. An empty scope yields the name unchanged.
pub fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{scope}{SCOPE_SEPARATOR}{name}")
    }
}

/// Split a qualified name into its top-level segments.
pub fn split_scope(name: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = name;
    while let Some(idx) = last_separator(rest) {
        parts.push(&rest[idx + SCOPE_SEPARATOR.len()..]);
        rest = &rest[..idx];
    }
    parts.push(rest);
    parts.reverse();
    parts
}

/// Remove a trailing template argument list (`Box<int>` -> `Box`).
pub fn strip_template_args(name: &str) -> &str {
    match name.find('<') {
        Some(idx) => name[..idx].trim_end(),
        None => name,
    }
}

/// Iterator over a scope and all of its enclosing scopes, ending with the
/// global scope (`""`).
#[derive(Clone, Debug)]
pub struct ScopeChain<'a> {
    next: Option<&'a str>,
}

impl<'a> Iterator for ScopeChain<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = if current.is_empty() {
            None
        } else {
            Some(parent_scope(current).unwrap_or(""))
        };
        Some(current)
    }
}

/// Walk from `scope` outward to the global scope.
pub fn scope_chain(scope: &str) -> ScopeChain<'_> {
    ScopeChain { next: Some(scope) }
}
