use super::base::{BaseMut, FieldSpec, Record, UnknownFields};
use super::coerce;
use crate::error::{Result, SdkError};
use crate::resources::ResourceKind;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Database {
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub owner: Option<String>,
    pub comment: Option<String>,
    pub is_default: Option<bool>,
}

static DATABASE_FIELDS: &[FieldSpec<Database>] = &[FieldSpec {
    synonyms: &["isdefault", "default"],
    apply: |r, v| r.is_default = coerce::boolean(v),
}];

impl Record for Database {
    const KIND: ResourceKind = ResourceKind::Database;
    const UNKNOWN_FIELDS: UnknownFields = UnknownFields::Drop;

    fn fields() -> &'static [FieldSpec<Self>] {
        DATABASE_FIELDS
    }

    fn base_mut(&mut self) -> BaseMut<'_> {
        BaseMut {
            name: &mut self.name,
            created_at: &mut self.created_at,
            updated_at: &mut self.updated_at,
            owner: &mut self.owner,
            comment: &mut self.comment,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Parameters for `CREATE DATABASE`; databases take no WITH clause
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatabaseCreateParams {
    pub name: String,
    pub comment: Option<String>,
}

impl DatabaseCreateParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
        }
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SdkError::invalid("database name must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn row(value: Value) -> crate::connection::Row {
        match value {
            Value::Object(map) => map,
            _ => Default::default(),
        }
    }

    #[test]
    fn test_from_row_complete() {
        let database = Database::from_row(&row(json!({
            "Name": "test_database",
            "IsDefault": false,
            "Owner": "test_user",
            "CreatedAt": "2024-01-01 00:00:00.000",
            "Path": ["test_database"],
        })));

        assert_eq!(database.name, "test_database");
        assert_eq!(database.owner.as_deref(), Some("test_user"));
        assert_eq!(database.is_default, Some(false));
        assert!(database.created_at.is_some());
    }

    #[test]
    fn test_is_default_from_text() {
        let database = Database::from_row(&row(json!({"Name": "db", "is_default": "True"})));
        assert_eq!(database.is_default, Some(true));
    }

    #[test]
    fn test_from_row_minimal() {
        let database = Database::from_row(&row(json!({"Name": "minimal_db"})));
        assert_eq!(database.name, "minimal_db");
        assert!(database.owner.is_none());
        assert!(database.is_default.is_none());
    }
}
