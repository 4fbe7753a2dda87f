//! Store records and parameters
//!
//! Store configuration is a flat key/value namespace (`uris`, `kafka.sasl.username`,
//! `tls.disabled`, ...). [`StoreCreateParams`] keeps it as a [`WithClause`] and offers
//! typed helpers that write the documented keys; [`STORE_PARAMETERS`] lists those keys
//! and which store types require them.

use super::base::{normalize_key, BaseMut, FieldSpec, Record, UnknownFields};
use super::coerce;
use crate::error::{Result, SdkError};
use crate::resources::ResourceKind;
use crate::sql::{keyword_bool, WithClause};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Store {
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub owner: Option<String>,
    pub comment: Option<String>,
    pub store_type: Option<String>,
    pub status: Option<String>,
    pub is_default: Option<bool>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub database_name: Option<String>,
    pub schema_name: Option<String>,
    /// Every reported column except name and audit fields, as returned
    pub parameters: Map<String, Value>,
}

impl Store {
    /// Reported column by any spelling of its name
    pub fn get(&self, key: &str) -> Option<&Value> {
        let wanted = normalize_key(key);
        self.parameters
            .iter()
            .find(|(column, _)| normalize_key(column) == wanted)
            .map(|(_, value)| value)
            .filter(|value| !value.is_null())
    }
}

static STORE_FIELDS: &[FieldSpec<Store>] = &[
    FieldSpec {
        synonyms: &["type", "storetype"],
        apply: |r, v| r.store_type = coerce::string(v),
    },
    FieldSpec {
        synonyms: &["status", "state"],
        apply: |r, v| r.status = coerce::string(v),
    },
    FieldSpec {
        synonyms: &["isdefault", "default"],
        apply: |r, v| r.is_default = coerce::boolean(v),
    },
    FieldSpec {
        synonyms: &["region"],
        apply: |r, v| r.region = coerce::string(v),
    },
    FieldSpec {
        synonyms: &["endpoint"],
        apply: |r, v| r.endpoint = coerce::string(v),
    },
    FieldSpec {
        synonyms: &["database", "databasename"],
        apply: |r, v| r.database_name = coerce::string(v),
    },
    FieldSpec {
        synonyms: &["schema", "schemaname"],
        apply: |r, v| r.schema_name = coerce::string(v),
    },
];

impl Record for Store {
    const KIND: ResourceKind = ResourceKind::Store;
    const UNKNOWN_FIELDS: UnknownFields = UnknownFields::Retain;

    fn fields() -> &'static [FieldSpec<Self>] {
        STORE_FIELDS
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

/// Store type discriminator, emitted as the bare `type` keyword
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreType {
    Kafka,
    Kinesis,
    S3,
    Snowflake,
    Databricks,
    Postgresql,
    Clickhouse,
    IcebergGlue,
    IcebergRest,
    Other(String),
}

impl StoreType {
    pub fn as_str(&self) -> &str {
        match self {
            StoreType::Kafka => "KAFKA",
            StoreType::Kinesis => "KINESIS",
            StoreType::S3 => "S3",
            StoreType::Snowflake => "SNOWFLAKE",
            StoreType::Databricks => "DATABRICKS",
            StoreType::Postgresql => "POSTGRESQL",
            StoreType::Clickhouse => "CLICKHOUSE",
            StoreType::IcebergGlue => "ICEBERG_GLUE",
            StoreType::IcebergRest => "ICEBERG_REST",
            StoreType::Other(s) => s,
        }
    }
}

impl From<&str> for StoreType {
    fn from(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "KAFKA" => StoreType::Kafka,
            "KINESIS" => StoreType::Kinesis,
            "S3" => StoreType::S3,
            "SNOWFLAKE" => StoreType::Snowflake,
            "DATABRICKS" => StoreType::Databricks,
            "POSTGRESQL" => StoreType::Postgresql,
            "CLICKHOUSE" => StoreType::Clickhouse,
            "ICEBERG_GLUE" => StoreType::IcebergGlue,
            "ICEBERG_REST" => StoreType::IcebergRest,
            other => StoreType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SASL settings of a Kafka store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KafkaAuth {
    None,
    Plain { username: String, password: String },
    Sha256 { username: String, password: String },
    Sha512 { username: String, password: String },
    AwsMskIam { region: String, iam_role_arn: String },
}

impl KafkaAuth {
    /// Value of `kafka.sasl.hash_function`
    pub fn hash_function(&self) -> &'static str {
        match self {
            KafkaAuth::None => "NONE",
            KafkaAuth::Plain { .. } => "PLAIN",
            KafkaAuth::Sha256 { .. } => "SHA256",
            KafkaAuth::Sha512 { .. } => "SHA512",
            KafkaAuth::AwsMskIam { .. } => "AWS_MSK_IAM",
        }
    }

    fn apply(&self, clause: &mut WithClause) {
        clause.set("kafka.sasl.hash_function", self.hash_function());
        match self {
            KafkaAuth::None => {}
            KafkaAuth::Plain { username, password }
            | KafkaAuth::Sha256 { username, password }
            | KafkaAuth::Sha512 { username, password } => {
                clause
                    .set("kafka.sasl.username", username.as_str())
                    .set("kafka.sasl.password", password.as_str());
            }
            KafkaAuth::AwsMskIam {
                region,
                iam_role_arn,
            } => {
                clause
                    .set("kafka.msk.aws_region", region.as_str())
                    .set("kafka.msk.iam_role_arn", iam_role_arn.as_str());
            }
        }
    }
}

/// A documented store parameter
#[derive(Debug, Clone, Copy)]
pub struct StoreParameter {
    pub key: &'static str,
    pub description: &'static str,
    /// Store types that cannot be created without it
    pub required_for: &'static [&'static str],
}

const URIS_REQUIRED: &[&str] = &[
    "KAFKA",
    "KINESIS",
    "S3",
    "SNOWFLAKE",
    "DATABRICKS",
    "POSTGRESQL",
    "CLICKHOUSE",
    "ICEBERG_REST",
];

macro_rules! param {
    ($key:expr, $desc:expr) => {
        StoreParameter {
            key: $key,
            description: $desc,
            required_for: &[],
        }
    };
    ($key:expr, $desc:expr, $required:expr) => {
        StoreParameter {
            key: $key,
            description: $desc,
            required_for: $required,
        }
    };
}

/// Documented store parameter keys
pub static STORE_PARAMETERS: &[StoreParameter] = &[
    param!("uris", "Comma-separated host:port list or endpoint URL", URIS_REQUIRED),
    param!("tls.disabled", "Disable TLS (TRUE/FALSE, default FALSE)"),
    param!("tls.verify_server_hostname", "Verify the server hostname (TRUE/FALSE, default TRUE)"),
    param!("tls.ca_cert_file", "CA certificate file, prefix with @ to upload"),
    param!("tls.cipher_suites", "Comma-separated cipher suites"),
    param!("tls.protocols", "Comma-separated TLS protocols"),
    param!("tls.client.cert_file", "Client certificate file"),
    param!("tls.client.key_file", "Client key file"),
    param!("schema_registry.name", "Associated schema registry"),
    param!("properties.file", "YAML file carrying the remaining parameters"),
    param!("kafka.sasl.hash_function", "NONE, PLAIN, SHA256, SHA512 or AWS_MSK_IAM"),
    param!("kafka.sasl.username", "SASL username"),
    param!("kafka.sasl.password", "SASL password"),
    param!("kafka.msk.aws_region", "MSK region for AWS_MSK_IAM"),
    param!("kafka.msk.iam_role_arn", "MSK IAM role for AWS_MSK_IAM"),
    param!("kinesis.iam_role_arn", "Kinesis IAM role"),
    param!("kinesis.access_key_id", "Kinesis static access key"),
    param!("kinesis.secret_access_key", "Kinesis static secret key"),
    param!("clickhouse.username", "ClickHouse username"),
    param!("clickhouse.password", "ClickHouse password"),
    param!("databricks.app_token", "Databricks app token", &["DATABRICKS"]),
    param!("databricks.warehouse_id", "Databricks SQL warehouse", &["DATABRICKS"]),
    param!("databricks.warehouse_port", "Databricks warehouse port (default 443)"),
    param!("databricks.cloud.s3.bucket", "Staging bucket", &["DATABRICKS"]),
    param!("databricks.cloud.region", "Cloud region, e.g. 'AWS us-east-1'", &["DATABRICKS"]),
    param!("iceberg.rest.client_id", "REST catalog client id"),
    param!("iceberg.rest.client_secret", "REST catalog client secret"),
    param!("iceberg.rest.client_scope", "REST catalog scope"),
    param!("iceberg.catalog.id", "Catalog id"),
    param!("iceberg.warehouse.default_path", "Glue warehouse default path"),
    param!("postgres.username", "PostgreSQL username"),
    param!("postgres.password", "PostgreSQL password"),
    param!("snowflake.account_id", "Snowflake account", &["SNOWFLAKE"]),
    param!("snowflake.cloud.region", "Cloud region, e.g. 'AWS us-east-1'", &["SNOWFLAKE"]),
    param!("snowflake.role_name", "Snowflake role", &["SNOWFLAKE"]),
    param!("snowflake.username", "Snowflake user", &["SNOWFLAKE"]),
    param!("snowflake.warehouse_name", "Snowflake warehouse", &["SNOWFLAKE"]),
    param!("snowflake.client.key_file", "Private key file, prefix with @", &["SNOWFLAKE"]),
    param!("snowflake.client.key_passphrase", "Private key passphrase"),
    param!("aws.iam_role_arn", "IAM role to assume"),
    param!("aws.iam_external_id", "External id, required with aws.iam_role_arn"),
    param!("aws.access_key_id", "AWS static access key"),
    param!("aws.secret_access_key", "AWS static secret key"),
    param!("aws.region", "AWS region", &["ICEBERG_GLUE"]),
];

/// Documentation entry for `key`, if it is a documented store parameter
pub fn store_parameter(key: &str) -> Option<&'static StoreParameter> {
    STORE_PARAMETERS.iter().find(|p| p.key == key)
}

/// Parameters for `CREATE STORE`
#[derive(Debug, Clone, PartialEq)]
pub struct StoreCreateParams {
    pub name: String,
    pub store_type: StoreType,
    pub parameters: WithClause,
    pub comment: Option<String>,
}

impl StoreCreateParams {
    pub fn new(name: impl Into<String>, store_type: impl Into<StoreType>) -> Self {
        Self {
            name: name.into(),
            store_type: store_type.into(),
            parameters: WithClause::new(),
            comment: None,
        }
    }

    fn with_uris(name: impl Into<String>, store_type: StoreType, uris: impl Into<String>) -> Self {
        Self::new(name, store_type).text("uris", uris)
    }

    pub fn kafka(name: impl Into<String>, uris: impl Into<String>) -> Self {
        Self::with_uris(name, StoreType::Kafka, uris)
    }

    pub fn kinesis(name: impl Into<String>, uris: impl Into<String>) -> Self {
        Self::with_uris(name, StoreType::Kinesis, uris)
    }

    pub fn s3(name: impl Into<String>, uris: impl Into<String>) -> Self {
        Self::with_uris(name, StoreType::S3, uris)
    }

    pub fn snowflake(
        name: impl Into<String>,
        uris: impl Into<String>,
        account_id: impl Into<String>,
        cloud_region: impl Into<String>,
    ) -> Self {
        Self::with_uris(name, StoreType::Snowflake, uris)
            .text("snowflake.account_id", account_id)
            .text("snowflake.cloud.region", cloud_region)
    }

    /// Snowflake user, role, warehouse and key-pair file
    pub fn snowflake_user(
        self,
        role_name: impl Into<String>,
        username: impl Into<String>,
        warehouse_name: impl Into<String>,
        client_key_file: impl Into<String>,
    ) -> Self {
        self.text("snowflake.role_name", role_name)
            .text("snowflake.username", username)
            .text("snowflake.warehouse_name", warehouse_name)
            .text("snowflake.client.key_file", client_key_file)
    }

    pub fn databricks(
        name: impl Into<String>,
        uris: impl Into<String>,
        app_token: impl Into<String>,
        warehouse_id: impl Into<String>,
    ) -> Self {
        Self::with_uris(name, StoreType::Databricks, uris)
            .text("databricks.app_token", app_token)
            .text("databricks.warehouse_id", warehouse_id)
    }

    /// Staging bucket and region of a Databricks store
    pub fn databricks_cloud(self, s3_bucket: impl Into<String>, region: impl Into<String>) -> Self {
        self.text("databricks.cloud.s3.bucket", s3_bucket)
            .text("databricks.cloud.region", region)
    }

    pub fn databricks_warehouse_port(self, port: u16) -> Self {
        // documented as a string parameter
        self.param("databricks.warehouse_port", port.to_string())
    }

    pub fn postgresql(
        name: impl Into<String>,
        uris: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::with_uris(name, StoreType::Postgresql, uris)
            .text("postgres.username", username)
            .text("postgres.password", password)
    }

    pub fn clickhouse(
        name: impl Into<String>,
        uris: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::with_uris(name, StoreType::Clickhouse, uris)
            .text("clickhouse.username", username)
            .text("clickhouse.password", password)
    }

    pub fn iceberg_glue(
        name: impl Into<String>,
        aws_region: impl Into<String>,
        warehouse_default_path: impl Into<String>,
    ) -> Self {
        Self::new(name, StoreType::IcebergGlue)
            .text("aws.region", aws_region)
            .text("iceberg.warehouse.default_path", warehouse_default_path)
    }

    pub fn iceberg_rest(
        name: impl Into<String>,
        uris: impl Into<String>,
        catalog_id: impl Into<String>,
    ) -> Self {
        Self::with_uris(name, StoreType::IcebergRest, uris)
            .text("iceberg.catalog.id", catalog_id)
    }

    /// OAuth client of an Iceberg REST catalog
    pub fn iceberg_rest_client(
        self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        scope: Option<&str>,
    ) -> Self {
        let mut params = self
            .text("iceberg.rest.client_id", client_id)
            .text("iceberg.rest.client_secret", client_secret);
        params.parameters.set_opt("iceberg.rest.client_scope", scope);
        params
    }

    pub fn kafka_auth(mut self, auth: KafkaAuth) -> Self {
        auth.apply(&mut self.parameters);
        self
    }

    pub fn kinesis_access_keys(self, access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        self.text("kinesis.access_key_id", access_key_id)
            .text("kinesis.secret_access_key", secret_access_key)
    }

    pub fn kinesis_iam_role(self, role_arn: impl Into<String>) -> Self {
        self.text("kinesis.iam_role_arn", role_arn)
    }

    pub fn aws_access_keys(self, access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        self.text("aws.access_key_id", access_key_id)
            .text("aws.secret_access_key", secret_access_key)
    }

    pub fn aws_iam_role(self, role_arn: impl Into<String>, external_id: impl Into<String>) -> Self {
        self.text("aws.iam_role_arn", role_arn)
            .text("aws.iam_external_id", external_id)
    }

    pub fn tls_disabled(self, disabled: bool) -> Self {
        self.param("tls.disabled", keyword_bool(disabled))
    }

    pub fn tls_verify_server_hostname(self, verify: bool) -> Self {
        self.param("tls.verify_server_hostname", keyword_bool(verify))
    }

    pub fn tls_ca_cert_file(self, path: impl Into<String>) -> Self {
        self.text("tls.ca_cert_file", path)
    }

    pub fn tls_cipher_suites(self, suites: impl Into<String>) -> Self {
        self.text("tls.cipher_suites", suites)
    }

    pub fn tls_protocols(self, protocols: impl Into<String>) -> Self {
        self.text("tls.protocols", protocols)
    }

    pub fn tls_client_cert(self, cert_file: impl Into<String>, key_file: impl Into<String>) -> Self {
        self.text("tls.client.cert_file", cert_file)
            .text("tls.client.key_file", key_file)
    }

    pub fn schema_registry(self, name: impl Into<String>) -> Self {
        self.text("schema_registry.name", name)
    }

    pub fn properties_file(self, path: impl Into<String>) -> Self {
        self.text("properties.file", path)
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    fn text(mut self, key: &str, value: impl Into<String>) -> Self {
        self.parameters.set(key, Value::String(value.into()));
        self
    }

    /// Set any parameter, documented or not
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.set(key, value);
        self
    }

    /// Check the parameters required for this store type
    ///
    /// Skipped entirely when `properties.file` is given, since the file is read
    /// server-side.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SdkError::invalid("store name must not be empty"));
        }
        if self.parameters.contains("properties.file") {
            return Ok(());
        }

        let store_type = self.store_type.as_str();
        let mut missing: Vec<&str> = STORE_PARAMETERS
            .iter()
            .filter(|p| p.required_for.contains(&store_type))
            .map(|p| p.key)
            .filter(|key| !self.parameters.contains(key))
            .collect();

        if let Some(hash) = self.parameters.get("kafka.sasl.hash_function") {
            let hash = crate::sql::render_value(hash).to_uppercase();
            let needed: &[&str] = match hash.as_str() {
                "PLAIN" | "SHA256" | "SHA512" => &["kafka.sasl.username", "kafka.sasl.password"],
                "AWS_MSK_IAM" => &["kafka.msk.aws_region", "kafka.msk.iam_role_arn"],
                _ => &[],
            };
            missing.extend(needed.iter().filter(|key| !self.parameters.contains(key)));
        }

        if self.parameters.contains("aws.iam_role_arn") && !self.parameters.contains("aws.iam_external_id") {
            missing.push("aws.iam_external_id");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SdkError::invalid(format!(
                "{} store '{}' is missing required parameters: {}",
                store_type,
                self.name,
                missing.join(", ")
            )))
        }
    }

    /// `type` first, then the parameters in the order they were set
    pub fn to_with_clause(&self) -> WithClause {
        let mut clause = WithClause::new();
        clause.set("type", self.store_type.as_str());
        for (key, value) in self.parameters.parameters() {
            if key != "type" {
                clause.set(key.clone(), value.clone());
            }
        }
        clause
    }
}

/// Changes for an existing store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreUpdateParams {
    pub parameters: WithClause,
    pub comment: Option<String>,
}

impl StoreUpdateParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.set(key, value);
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn to_with_clause(&self) -> WithClause {
        self.parameters.clone()
    }
}
