//! WITH clause builder
//!
//! Renders a map of named parameters as `WITH ('key' = 'value', ...)`. Values of a
//! few keys are platform keywords (`KAFKA`, `PLAIN`, `TRUE`) and are emitted bare;
//! everything else is a quoted string literal.

use serde_json::{Map, Value};
use std::fmt;

/// Keys whose values are emitted without quotes
pub const UNQUOTED_KEYS: &[&str] = &[
    "type",
    "kafka.sasl.hash_function",
    "tls.disabled",
    "tls.verify_server_hostname",
];

/// Whether values of `key` are emitted as bare keywords
pub fn is_unquoted_key(key: &str) -> bool {
    UNQUOTED_KEYS.contains(&key)
}

/// Text form of a parameter value
///
/// Strings are used verbatim, numbers in canonical decimal and booleans lowercase.
/// Arrays and objects fall back to their JSON text.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Render a boolean the way keyword-valued flags expect it (`TRUE` / `FALSE`)
pub fn keyword_bool(value: bool) -> Value {
    Value::String(if value { "TRUE" } else { "FALSE" }.to_string())
}

/// Named parameters for a statement's WITH clause
///
/// Entries keep insertion order. `Value::Null` marks an absent parameter; it is kept
/// in the map but never emitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WithClause {
    parameters: Map<String, Value>,
}

impl WithClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(parameters: Map<String, Value>) -> Self {
        Self { parameters }
    }

    /// Set `key`, replacing any previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Set `key` only when `value` is present
    pub fn set_opt<V: Into<Value>>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.parameters.insert(key.to_string(), value.into());
        }
        self
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Merge `other` on top of this clause; its values win
    pub fn extend(&mut self, other: &WithClause) -> &mut Self {
        for (key, value) in &other.parameters {
            self.parameters.insert(key.clone(), value.clone());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.parameters.get(key).filter(|v| !v.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove `key`, keeping the order of the remaining entries
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.parameters.shift_remove(key)
    }

    pub fn parameters(&self) -> &Map<String, Value> {
        &self.parameters
    }

    /// Number of entries that would be emitted
    pub fn len(&self) -> usize {
        self.parameters.values().filter(|v| !v.is_null()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render as `WITH (...)`, or an empty string when nothing is emitted
    pub fn to_sql(&self) -> String {
        let fragments: Vec<String> = self
            .parameters
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| render_entry(key, value))
            .collect();

        if fragments.is_empty() {
            return String::new();
        }
        format!("WITH ({})", fragments.join(", "))
    }

    /// Append ` WITH (...)` to `sql` when the clause is not empty
    pub fn append_to(&self, sql: &mut String) {
        let clause = self.to_sql();
        if !clause.is_empty() {
            sql.push(' ');
            sql.push_str(&clause);
        }
    }
}

fn render_entry(key: &str, value: &Value) -> String {
    let text = render_value(value);
    if is_unquoted_key(key) {
        format!("'{}' = {}", key, text)
    } else {
        format!("'{}' = '{}'", key, text.replace('\'', "''"))
    }
}

impl fmt::Display for WithClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

impl From<Map<String, Value>> for WithClause {
    fn from(parameters: Map<String, Value>) -> Self {
        Self::from_map(parameters)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for WithClause {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut clause = WithClause::new();
        for (key, value) in iter {
            clause.set(key, value);
        }
        clause
    }
}
