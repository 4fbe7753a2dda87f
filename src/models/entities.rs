//! Entities are store-side objects: Kafka topics, Kinesis streams, Snowflake
//! databases and schemas, Databricks catalogs. Their shape depends on the store, so
//! everything beyond the shared fields is kept as reported.

use super::base::{BaseMut, FieldSpec, Record, UnknownFields};
use super::coerce;
use crate::error::{Result, SdkError};
use crate::resources::ResourceKind;
use crate::sql::WithClause;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Entity {
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub owner: Option<String>,
    pub comment: Option<String>,
    /// Whether the entity holds data rather than other entities
    pub is_leaf: Option<bool>,
    pub parameters: Map<String, Value>,
}

static ENTITY_FIELDS: &[FieldSpec<Entity>] = &[FieldSpec {
    synonyms: &["isleaf", "leaf"],
    apply: |r, v| r.is_leaf = coerce::boolean(v),
}];

impl Record for Entity {
    const KIND: ResourceKind = ResourceKind::Entity;
    const UNKNOWN_FIELDS: UnknownFields = UnknownFields::Retain;

    fn fields() -> &'static [FieldSpec<Self>] {
        ENTITY_FIELDS
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

    fn extras_mut(&mut self) -> Option<&mut Map<String, Value>> {
        Some(&mut self.parameters)
    }
}

/// Parameters for `CREATE ENTITY`
///
/// The name may be dotted (`DB.SCHEMA`) to address a nested entity; it is still
/// quoted as one identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityCreateParams {
    pub name: String,
    /// Store to create the entity in; the session's store when absent
    pub store: Option<String>,
    /// Store-specific settings (`topic.partitions`, `kinesis.shards`, ...)
    pub parameters: WithClause,
    pub comment: Option<String>,
}

impl EntityCreateParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn in_store(mut self, store: impl Into<String>) -> Self {
        self.store = Some(store.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.set(key, value);
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SdkError::invalid("entity name must not be empty"));
        }
        if self.store.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(SdkError::invalid("store name must not be empty"));
        }
        Ok(())
    }
}

/// Changes for an existing entity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityUpdateParams {
    pub store: Option<String>,
    pub parameters: WithClause,
}

impl EntityUpdateParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_store(mut self, store: impl Into<String>) -> Self {
        self.store = Some(store.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.set(key, value);
        self
    }
}
