use super::base::{BaseMut, FieldSpec, Record, UnknownFields};
use super::coerce;
use crate::error::{Result, SdkError};
use crate::resources::ResourceKind;
use crate::sql::WithClause;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaRegistry {
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub owner: Option<String>,
    pub comment: Option<String>,
    pub registry_type: Option<String>,
    pub url: Option<String>,
    pub state: Option<String>,
    pub parameters: Map<String, Value>,
}

static SCHEMA_REGISTRY_FIELDS: &[FieldSpec<SchemaRegistry>] = &[
    FieldSpec {
        synonyms: &["type", "registrytype"],
        apply: |r, v| r.registry_type = coerce::string(v),
    },
    FieldSpec {
        synonyms: &["url", "uris"],
        apply: |r, v| r.url = coerce::string(v),
    },
    FieldSpec {
        synonyms: &["state", "status"],
        apply: |r, v| r.state = coerce::string(v),
    },
];

impl Record for SchemaRegistry {
    const KIND: ResourceKind = ResourceKind::SchemaRegistry;
    const UNKNOWN_FIELDS: UnknownFields = UnknownFields::Retain;

    fn fields() -> &'static [FieldSpec<Self>] {
        SCHEMA_REGISTRY_FIELDS
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

/// Parameters for `CREATE SCHEMA_REGISTRY`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaRegistryCreateParams {
    pub name: String,
    /// `CONFLUENT`, `CONFLUENT_CLOUD`, ...; emitted bare as `type`
    pub registry_type: Option<String>,
    pub url: String,
    pub auth_type: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub comment: Option<String>,
}

impl SchemaRegistryCreateParams {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn registry_type(mut self, registry_type: impl Into<String>) -> Self {
        self.registry_type = Some(registry_type.into());
        self
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn auth_type(mut self, auth_type: impl Into<String>) -> Self {
        self.auth_type = Some(auth_type.into());
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SdkError::invalid("schema registry name must not be empty"));
        }
        if self.url.trim().is_empty() {
            return Err(SdkError::invalid(format!(
                "schema registry '{}' requires a url",
                self.name
            )));
        }
        if self.username.is_some() != self.password.is_some() {
            return Err(SdkError::invalid(
                "schema registry username and password must be given together",
            ));
        }
        Ok(())
    }

    pub fn to_with_clause(&self) -> WithClause {
        let mut clause = WithClause::new();
        clause
            .set_opt("type", self.registry_type.as_deref())
            .set("url", self.url.as_str())
            .set_opt("auth.type", self.auth_type.as_deref())
            .set_opt("username", self.username.as_deref())
            .set_opt("password", self.password.as_deref());
        clause
    }
}

/// Changes for an existing schema registry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaRegistryUpdateParams {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub comment: Option<String>,
}

impl SchemaRegistryUpdateParams {
    pub fn to_with_clause(&self) -> WithClause {
        let mut clause = WithClause::new();
        clause
            .set_opt("url", self.url.as_deref())
            .set_opt("username", self.username.as_deref())
            .set_opt("password", self.password.as_deref());
        clause
    }
}
