//! Record materialization
//!
//! A [`Record`] is built from a result row through a static table of
//! [`FieldSpec`]s: each entry lists the column names it answers to and the setter
//! that coerces the raw value. Column names are compared after
//! [`normalize_key`], so `CreatedAt`, `created_at` and `Created At` are the same column.

use super::coerce;
use crate::connection::Row;
use crate::resources::ResourceKind;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// What happens to columns no field claims
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownFields {
    /// Discard them
    Drop,
    /// Keep every column except the shared audit fields in the record's `parameters`
    Retain,
}

/// One entry of a record's field table
pub struct FieldSpec<R> {
    /// Accepted column names, already normalized
    pub synonyms: &'static [&'static str],
    pub apply: fn(&mut R, &Value),
}

impl<R> FieldSpec<R> {
    pub fn matches(&self, normalized: &str) -> bool {
        self.synonyms.contains(&normalized)
    }
}

/// Mutable view of the fields every record shares
pub struct BaseMut<'a> {
    pub name: &'a mut String,
    pub created_at: &'a mut Option<DateTime<Utc>>,
    pub updated_at: &'a mut Option<DateTime<Utc>>,
    pub owner: &'a mut Option<String>,
    pub comment: &'a mut Option<String>,
}

/// A typed record materialized from a result row
pub trait Record: Default + Sized + 'static {
    const KIND: ResourceKind;
    const UNKNOWN_FIELDS: UnknownFields;

    /// Record-specific field table
    fn fields() -> &'static [FieldSpec<Self>];

    fn base_mut(&mut self) -> BaseMut<'_>;

    fn name(&self) -> &str;

    /// Side-bag for retained columns
    fn extras_mut(&mut self) -> Option<&mut Map<String, Value>> {
        None
    }

    /// Build a record from one row. Never fails; unreadable values stay absent.
    fn from_row(row: &Row) -> Self {
        let mut record = Self::default();

        for (column, value) in row {
            let key = normalize_key(column);

            let claimed = match Self::fields().iter().find(|spec| spec.matches(&key)) {
                Some(spec) => {
                    (spec.apply)(&mut record, value);
                    true
                }
                None => {
                    if apply_base(record.base_mut(), &key, value) {
                        continue;
                    }
                    false
                }
            };

            match Self::UNKNOWN_FIELDS {
                UnknownFields::Retain => {
                    if let Some(extras) = record.extras_mut() {
                        extras.insert(column.clone(), value.clone());
                    }
                }
                UnknownFields::Drop => {
                    if !claimed {
                        tracing::trace!("{}: dropping column {}", Self::KIND, column);
                    }
                }
            }
        }

        record
    }
}

/// Lowercase and strip `_`, `-` and spaces
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Look up a column by any spelling of its name
pub fn lookup<'a>(row: &'a Row, name: &str) -> Option<&'a Value> {
    let wanted = normalize_key(name);
    row.iter()
        .find(|(column, _)| normalize_key(column) == wanted)
        .map(|(_, value)| value)
}

const NAME: &[&str] = &["name", "relationname", "objectname"];
const CREATED_AT: &[&str] = &["createdon", "createdat"];
const UPDATED_AT: &[&str] = &["updatedon", "updatedat", "modifiedat"];
const OWNER: &[&str] = &["owner"];
const COMMENT: &[&str] = &["comment"];

fn apply_base(base: BaseMut<'_>, key: &str, value: &Value) -> bool {
    if NAME.contains(&key) {
        if let Some(name) = coerce::string(value) {
            *base.name = name;
        }
    } else if CREATED_AT.contains(&key) {
        *base.created_at = coerce::datetime(value);
    } else if UPDATED_AT.contains(&key) {
        *base.updated_at = coerce::datetime(value);
    } else if OWNER.contains(&key) {
        *base.owner = coerce::string(value);
    } else if COMMENT.contains(&key) {
        *base.comment = coerce::non_empty_string(value);
    } else {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("CreatedAt"), "createdat");
        assert_eq!(normalize_key("created_at"), "createdat");
        assert_eq!(normalize_key("Is Default"), "isdefault");
        assert_eq!(normalize_key("auto-suspend"), "autosuspend");
    }

    #[test]
    fn test_lookup_ignores_spelling() {
        let mut row = Row::new();
        row.insert("Topic_Name".into(), Value::String("orders".into()));
        assert_eq!(lookup(&row, "topic name"), Some(&Value::String("orders".into())));
        assert_eq!(lookup(&row, "name"), None);
    }

    fn materialize<R: Record>(row: &Row) -> R {
        R::from_row(row)
    }

    #[test]
    fn test_from_row_through_generic_record() {
        let mut row = Row::new();
        row.insert("Name".into(), Value::String("orders".into()));
        row.insert("Owner".into(), Value::String("alice".into()));
        row.insert("Is Default".into(), Value::Bool(true));

        let db: crate::models::Database = materialize(&row);
        assert_eq!(db.name, "orders");
        assert_eq!(db.owner.as_deref(), Some("alice"));
        assert_eq!(db.is_default, Some(true));

        let entity: crate::models::Entity = materialize(&row);
        assert_eq!(entity.name, "orders");
        assert!(entity.parameters.contains_key("Is Default"));
        assert!(!entity.parameters.contains_key("Name"));
    }
}
