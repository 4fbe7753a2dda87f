//! Property-based tests using proptest
//!
//! These tests check WITH clause rendering and literal escaping over randomized
//! parameter maps and strings.

use deltastream_sdk::sql::{
    escape_identifier, escape_string_literal, is_unquoted_key, statement, unescape_string_literal,
    WithClause, UNQUOTED_KEYS,
};
use deltastream_sdk::ResourceKind;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Dotted parameter keys such as `kafka.sasl.username`
fn arb_key() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{0,8}(\\.[a-z_]{1,8}){0,2}"
}

/// Values without `=` so fragments can be counted in the output
fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z0-9 ',./:-]{0,16}".prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
    ]
}

/// Parameter map where `None` marks an absent entry
fn arb_parameters() -> impl Strategy<Value = BTreeMap<String, Option<Value>>> {
    prop::collection::btree_map(arb_key(), prop::option::of(arb_value()), 0..20)
}

fn build(parameters: &BTreeMap<String, Option<Value>>) -> WithClause {
    let mut clause = WithClause::new();
    for (key, value) in parameters {
        clause.set(key.as_str(), value.clone().unwrap_or(Value::Null));
    }
    clause
}

proptest! {
    /// Absent entries are never emitted and every present one is
    #[test]
    fn absent_keys_are_omitted(parameters in arb_parameters()) {
        let sql = build(&parameters).to_sql();
        let present = parameters.values().filter(|v| v.is_some()).count();

        prop_assert_eq!(sql.matches(" = ").count(), present);
        for (key, value) in &parameters {
            let fragment = format!("'{}' =", key);
            prop_assert_eq!(sql.contains(&fragment), value.is_some());
        }
    }

    #[test]
    fn string_literals_round_trip(s in ".*") {
        let literal = escape_string_literal(&s);
        prop_assert!(literal.starts_with('\''));
        prop_assert!(literal.ends_with('\''));
        prop_assert_eq!(unescape_string_literal(&literal), Some(s));
    }

    #[test]
    fn identifiers_round_trip(name in ".*") {
        let quoted = escape_identifier(&name);
        let inner = &quoted[1..quoted.len() - 1];
        prop_assert_eq!(inner.replace("\"\"", "\""), name);
    }

    #[test]
    fn keyword_keys_render_bare(
        key in prop::sample::select(UNQUOTED_KEYS),
        value in "[A-Z][A-Z0-9_]{0,12}",
    ) {
        let clause = WithClause::new().with(key, value.as_str());
        prop_assert_eq!(clause.to_sql(), format!("WITH ('{}' = {})", key, value));
    }

    #[test]
    fn other_keys_render_quoted(
        key in arb_key().prop_filter("keyword key", |k| !is_unquoted_key(k)),
        value in "[a-zA-Z0-9 ']{0,16}",
    ) {
        let clause = WithClause::new().with(key.as_str(), value.as_str());
        prop_assert_eq!(
            clause.to_sql(),
            format!("WITH ('{}' = {})", key, escape_string_literal(&value))
        );
    }

    #[test]
    fn rendering_is_idempotent(parameters in arb_parameters()) {
        let clause = build(&parameters);
        prop_assert_eq!(clause.to_sql(), clause.to_sql());
        prop_assert_eq!(clause.clone().to_sql(), clause.to_sql());
    }

    /// A clause with nothing present leaves the statement without WITH
    #[test]
    fn all_absent_means_no_with(keys in prop::collection::vec(arb_key(), 0..10)) {
        let mut clause = WithClause::new();
        for key in &keys {
            clause.set(key.as_str(), Value::Null);
        }

        prop_assert_eq!(clause.to_sql(), "");
        prop_assert!(clause.is_empty());
        let sql = statement::create(ResourceKind::Stream, "s", &clause, None);
        prop_assert_eq!(sql, "CREATE STREAM \"s\"");
    }
}

#[test]
fn test_mixed_value_types() {
    let clause = WithClause::new()
        .with("bootstrap.servers", "localhost:9092")
        .with("auth.type", "PLAIN")
        .with("port", 9092);

    assert_eq!(
        clause.to_sql(),
        "WITH ('bootstrap.servers' = 'localhost:9092', 'auth.type' = 'PLAIN', 'port' = '9092')"
    );
    assert_eq!(clause.to_sql().matches("WITH (").count(), 1);
}

#[test]
fn test_embedded_quotes_are_doubled() {
    let clause = WithClause::new().with("password", "pass'word");
    assert_eq!(clause.to_sql(), "WITH ('password' = 'pass''word')");
}

#[test]
fn test_type_value_is_bare() {
    let clause = WithClause::new().with("type", "KAFKA");
    assert_eq!(clause.to_sql(), "WITH ('type' = KAFKA)");
}

#[test]
fn test_generic_booleans_are_lowercase() {
    let clause = WithClause::new()
        .with("auto.suspend", true)
        .with("tls.disabled", json!("TRUE"));
    assert_eq!(
        clause.to_sql(),
        "WITH ('auto.suspend' = 'true', 'tls.disabled' = TRUE)"
    );
}
