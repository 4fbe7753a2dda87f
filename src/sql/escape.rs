//! Escaping of identifiers and string literals embedded in statements.

/// Quote an object name, doubling embedded double quotes.
///
/// Dotted names such as `db.schema` are quoted once as a whole, never per segment.
pub fn escape_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a string literal, doubling embedded single quotes.
pub fn escape_string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Inverse of [`escape_string_literal`].
///
/// Returns `None` when `literal` is not wrapped in single quotes.
pub fn unescape_string_literal(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('\'')?.strip_suffix('\'')?;
    Some(inner.replace("''", "'"))
}
