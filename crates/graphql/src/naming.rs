//! Graph field naming.

/// Field name for a model method: `Account` + `login` gives `AccountLogin`.
pub fn field_name(model: &str, method: &str) -> String {
    format!("{model}{}", upper_first(method))
}

pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether `name` is a legal GraphQL name (`/[_A-Za-z][_0-9A-Za-z]*/`) that
/// a schema may define. Names starting with `__` are reserved for
/// introspection.
pub fn is_valid_name(name: &str) -> bool {
    if name.starts_with("__") {
        return false;
    }
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
