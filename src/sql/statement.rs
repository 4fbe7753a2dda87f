//! Statement assembly
//!
//! Pure functions producing the statement text for every manager operation. None
//! of them add the `;` terminator; that happens when the statement is sent.

use super::clause::WithClause;
use super::escape::{escape_identifier, escape_string_literal};
use crate::resources::ResourceKind;
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::Value;
use std::io;

/// `LIST <PLURAL> [WHERE k = 'v' AND ...]`
pub fn list(kind: ResourceKind, filters: &[(&str, &str)]) -> String {
    let mut sql = format!("LIST {}", kind.plural());
    if !filters.is_empty() {
        let conditions: Vec<String> = filters
            .iter()
            .map(|(column, value)| format!("{} = {}", column, escape_string_literal(value)))
            .collect();
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql
}

/// `DESCRIBE <KIND> "name"`
pub fn describe(kind: ResourceKind, name: &str) -> String {
    format!("DESCRIBE {} {}", kind.describe_keyword(), escape_identifier(name))
}

/// `CREATE <KIND> "name" [WITH (...)] [COMMENT '...']`
pub fn create(kind: ResourceKind, name: &str, clause: &WithClause, comment: Option<&str>) -> String {
    let mut sql = format!("CREATE {} {}", kind.keyword(), escape_identifier(name));
    clause.append_to(&mut sql);
    append_comment(&mut sql, comment);
    sql
}

/// `ALTER <KIND> "name" SET COMMENT '...'`
pub fn set_comment(kind: ResourceKind, name: &str, comment: &str) -> String {
    format!(
        "ALTER {} {} SET COMMENT {}",
        kind.keyword(),
        escape_identifier(name),
        escape_string_literal(comment)
    )
}

/// `UPDATE <KIND> "name" WITH (...)`
pub fn update(kind: ResourceKind, name: &str, clause: &WithClause) -> String {
    let mut sql = format!("UPDATE {} {}", kind.keyword(), escape_identifier(name));
    clause.append_to(&mut sql);
    sql
}

/// `DROP <KIND> "name"`
pub fn drop(kind: ResourceKind, name: &str) -> String {
    format!("DROP {} {}", kind.keyword(), escape_identifier(name))
}

/// `START <KIND> "name"`
pub fn start(kind: ResourceKind, name: &str) -> String {
    format!("START {} {}", kind.keyword(), escape_identifier(name))
}

/// `STOP <KIND> "name"`
pub fn stop(kind: ResourceKind, name: &str) -> String {
    format!("STOP {} {}", kind.keyword(), escape_identifier(name))
}

/// `INSERT INTO ENTITY "name" IN STORE "store" VALUE('<json>') [WITH (...)]`
pub fn insert_entity_value(entity: &str, store: &str, value: &Value, clause: &WithClause) -> String {
    let mut sql = format!(
        "INSERT INTO ENTITY {} IN STORE {} VALUE({})",
        escape_identifier(entity),
        escape_identifier(store),
        escape_string_literal(&json_text(value))
    );
    clause.append_to(&mut sql);
    sql
}

/// ` IN STORE "store"` suffix, or nothing
pub fn in_store(store: Option<&str>) -> String {
    store
        .map(|s| format!(" IN STORE {}", escape_identifier(s)))
        .unwrap_or_default()
}

pub(crate) fn append_comment(sql: &mut String, comment: Option<&str>) {
    if let Some(comment) = comment {
        sql.push_str(" COMMENT ");
        sql.push_str(&escape_string_literal(comment));
    }
}

/// JSON text of a value to insert
///
/// A string is taken to be JSON already and is used verbatim. Anything else is
/// encoded with `", "` and `": "` separators, keeping key order.
pub fn json_text(value: &Value) -> String {
    if let Value::String(raw) = value {
        return raw.clone();
    }

    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    match value.serialize(&mut ser) {
        Ok(()) => String::from_utf8(buf).unwrap_or_else(|_| value.to_string()),
        Err(_) => value.to_string(),
    }
}

/// Compact JSON with a space after `,` and `:`
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}
