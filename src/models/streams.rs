//! Stream records and parameters.

use super::base::{BaseMut, FieldSpec, Record, UnknownFields};
use super::coerce;
use crate::error::{Result, SdkError};
use crate::resources::ResourceKind;
use crate::sql::{escape_identifier, WithClause};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stream {
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub owner: Option<String>,
    pub comment: Option<String>,
    /// Relation type as reported by the platform (`STREAM`, `CHANGELOG`, ...)
    pub stream_type: Option<String>,
    pub state: Option<String>,
    pub store: Option<String>,
    pub topic: Option<String>,
    pub key_format: Option<String>,
    pub value_format: Option<String>,
}

static STREAM_FIELDS: &[FieldSpec<Stream>] = &[
    FieldSpec {
        synonyms: &["type", "streamtype", "relationtype"],
        apply: |r, v| r.stream_type = coerce::string(v),
    },
    FieldSpec {
        synonyms: &["state", "status"],
        apply: |r, v| r.state = coerce::string(v),
    },
    FieldSpec {
        synonyms: &["store", "storename"],
        apply: |r, v| r.store = coerce::string(v),
    },
    FieldSpec {
        synonyms: &["topic", "topicname"],
        apply: |r, v| r.topic = coerce::string(v),
    },
    FieldSpec {
        synonyms: &["keyformat"],
        apply: |r, v| r.key_format = coerce::string(v),
    },
    FieldSpec {
        synonyms: &["valueformat"],
        apply: |r, v| r.value_format = coerce::string(v),
    },
];

impl Record for Stream {
    const KIND: ResourceKind = ResourceKind::Stream;
    const UNKNOWN_FIELDS: UnknownFields = UnknownFields::Drop;

    fn fields() -> &'static [FieldSpec<Self>] {
        STREAM_FIELDS
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

/// A column of a stream created with an explicit schema
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: String,
    pub not_null: bool,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            not_null: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub(crate) fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", escape_identifier(&self.name), self.data_type);
        if self.not_null {
            sql.push_str(" NOT NULL");
        }
        sql
    }
}

/// Parameters for `CREATE STREAM`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamCreateParams {
    pub name: String,
    pub store: Option<String>,
    pub topic: Option<String>,
    pub value_format: Option<String>,
    pub key_format: Option<String>,
    /// Column holding the record timestamp
    pub timestamp: Option<String>,
    pub topic_partitions: Option<u32>,
    pub topic_replicas: Option<u32>,
    /// Passthrough parameters, applied last
    pub parameters: WithClause,
    pub comment: Option<String>,
}

impl StreamCreateParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn store(mut self, store: impl Into<String>) -> Self {
        self.store = Some(store.into());
        self
    }

    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn value_format(mut self, format: impl Into<String>) -> Self {
        self.value_format = Some(format.into());
        self
    }

    pub fn key_format(mut self, format: impl Into<String>) -> Self {
        self.key_format = Some(format.into());
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.parameters.set(key, value);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SdkError::invalid("stream name must not be empty"));
        }
        if self.topic_partitions == Some(0) {
            return Err(SdkError::invalid("topic.partitions must be at least 1"));
        }
        if self.topic_replicas == Some(0) {
            return Err(SdkError::invalid("topic.replicas must be at least 1"));
        }
        Ok(())
    }

    pub fn to_with_clause(&self) -> WithClause {
        let mut clause = WithClause::new();
        clause
            .set_opt("store", self.store.as_deref())
            .set_opt("topic", self.topic.as_deref())
            .set_opt("value.format", self.value_format.as_deref())
            .set_opt("key.format", self.key_format.as_deref())
            .set_opt("timestamp", self.timestamp.as_deref())
            .set_opt("topic.partitions", self.topic_partitions)
            .set_opt("topic.replicas", self.topic_replicas)
            .extend(&self.parameters);
        clause
    }
}

/// Changes for an existing stream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamUpdateParams {
    pub comment: Option<String>,
    pub parameters: WithClause,
}

impl StreamUpdateParams {
    pub fn comment(comment: impl Into<String>) -> Self {
        Self {
            comment: Some(comment.into()),
            ..Default::default()
        }
    }

    pub fn to_with_clause(&self) -> WithClause {
        self.parameters.clone()
    }
}
