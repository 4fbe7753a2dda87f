use super::base::ResourceManager;
use crate::error::Result;
use crate::models::{SchemaRegistry, SchemaRegistryCreateParams, SchemaRegistryUpdateParams};
use crate::sql::statement;

pub type SchemaRegistryManager = ResourceManager<SchemaRegistry>;

impl ResourceManager<SchemaRegistry> {
    pub async fn create(&self, params: SchemaRegistryCreateParams) -> Result<SchemaRegistry> {
        params.validate()?;
        let sql = statement::create(
            self.kind(),
            &params.name,
            &params.to_with_clause(),
            params.comment.as_deref(),
        );
        self.create_with(&params.name, &sql).await
    }

    pub async fn update(&self, name: &str, params: SchemaRegistryUpdateParams) -> Result<SchemaRegistry> {
        self.apply_update(name, &params.to_with_clause(), params.comment.as_deref())
            .await
    }
}
