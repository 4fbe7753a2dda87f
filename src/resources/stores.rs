use super::base::ResourceManager;
use crate::connection::Row;
use crate::error::Result;
use crate::models::base::lookup;
use crate::models::coerce;
use crate::models::{KafkaAuth, Store, StoreCreateParams, StoreType, StoreUpdateParams};
use crate::sql::escape::escape_identifier;
use crate::sql::statement;
use serde_json::Value;

pub type StoreManager = ResourceManager<Store>;

impl ResourceManager<Store> {
    pub async fn create(&self, params: StoreCreateParams) -> Result<Store> {
        params.validate()?;
        let sql = statement::create(
            self.kind(),
            &params.name,
            &params.to_with_clause(),
            params.comment.as_deref(),
        );
        self.create_with(&params.name, &sql).await
    }

    pub async fn create_kafka_store(
        &self,
        name: &str,
        uris: &str,
        auth: KafkaAuth,
        schema_registry: Option<&str>,
    ) -> Result<Store> {
        let mut params = StoreCreateParams::kafka(name, uris).kafka_auth(auth);
        if let Some(registry) = schema_registry {
            params = params.schema_registry(registry);
        }
        self.create(params).await
    }

    /// Kinesis store authenticated with static keys, an IAM role, or neither
    pub async fn create_kinesis_store(
        &self,
        name: &str,
        uris: &str,
        access_keys: Option<(&str, &str)>,
        iam_role_arn: Option<&str>,
    ) -> Result<Store> {
        let mut params = StoreCreateParams::kinesis(name, uris);
        if let Some((key_id, secret)) = access_keys {
            params = params.kinesis_access_keys(key_id, secret);
        }
        if let Some(role) = iam_role_arn {
            params = params.kinesis_iam_role(role);
        }
        self.create(params).await
    }

    /// S3 store; `iam_role` is the role ARN and its external id
    pub async fn create_s3_store(
        &self,
        name: &str,
        uris: &str,
        access_keys: Option<(&str, &str)>,
        iam_role: Option<(&str, &str)>,
    ) -> Result<Store> {
        let mut params = StoreCreateParams::s3(name, uris);
        if let Some((key_id, secret)) = access_keys {
            params = params.aws_access_keys(key_id, secret);
        }
        if let Some((role, external_id)) = iam_role {
            params = params.aws_iam_role(role, external_id);
        }
        self.create(params).await
    }

    pub async fn list_by_type(&self, store_type: &StoreType) -> Result<Vec<Store>> {
        self.list_with(&statement::list(self.kind(), &[("type", store_type.as_str())]))
            .await
    }

    pub async fn update(&self, name: &str, params: StoreUpdateParams) -> Result<Store> {
        self.apply_update(name, &params.to_with_clause(), params.comment.as_deref())
            .await
    }

    /// `TEST STORE`; the first result row, or `{"status": "unknown"}` when none came back
    pub async fn test_connection(&self, name: &str) -> Result<Row> {
        let rows = self
            .query_rows(&format!("TEST STORE {}", escape_identifier(name)))
            .await?;

        Ok(rows.into_iter().next().unwrap_or_else(|| {
            let mut row = Row::new();
            row.insert("status".to_string(), Value::String("unknown".to_string()));
            row
        }))
    }

    /// Topic names available in the store
    pub async fn get_topics(&self, name: &str) -> Result<Vec<String>> {
        let rows = self
            .query_rows(&format!("LIST TOPICS FROM STORE {}", escape_identifier(name)))
            .await?;

        Ok(rows
            .iter()
            .map(|row| {
                lookup(row, "topic_name")
                    .or_else(|| lookup(row, "name"))
                    .and_then(coerce::string)
                    .unwrap_or_default()
            })
            .collect())
    }
}
