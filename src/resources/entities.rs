use super::base::ResourceManager;
use crate::error::{Result, SdkError};
use crate::models::{Entity, EntityCreateParams, EntityUpdateParams};
use crate::sql::escape::escape_identifier;
use crate::sql::{statement, WithClause};
use serde_json::Value;

pub type EntityManager = ResourceManager<Entity>;

impl ResourceManager<Entity> {
    /// `CREATE ENTITY "name" [IN STORE "store"] [WITH (...)] [COMMENT '...']`
    pub async fn create(&self, params: EntityCreateParams) -> Result<Entity> {
        params.validate()?;
        let mut sql = format!(
            "CREATE ENTITY {}{}",
            escape_identifier(&params.name),
            statement::in_store(params.store.as_deref())
        );
        params.parameters.append_to(&mut sql);
        statement::append_comment(&mut sql, params.comment.as_deref());

        self.execute(&sql).await?;
        tracing::info!("Created {} '{}'", self.kind(), params.name);
        self.get_in_store(&params.name, params.store.as_deref()).await
    }

    /// Entities of one store, or of the session's store when `store` is absent
    pub async fn list_in_store(&self, store: Option<&str>) -> Result<Vec<Entity>> {
        let sql = format!("LIST ENTITIES{}", statement::in_store(store));
        self.list_with(&sql).await
    }

    pub async fn get_in_store(&self, name: &str, store: Option<&str>) -> Result<Entity> {
        let sql = format!("{}{}", statement::describe(self.kind(), name), statement::in_store(store));
        self.get_with(name, &sql).await
    }

    pub async fn update(&self, name: &str, params: EntityUpdateParams) -> Result<Entity> {
        if params.parameters.is_empty() {
            return Err(SdkError::invalid(format!("nothing to update for entity '{}'", name)));
        }

        let mut sql = format!(
            "UPDATE ENTITY {}{}",
            escape_identifier(name),
            statement::in_store(params.store.as_deref())
        );
        params.parameters.append_to(&mut sql);

        self.execute(&sql).await?;
        tracing::info!("Updated {} '{}'", self.kind(), name);
        self.get_in_store(name, params.store.as_deref()).await
    }

    pub async fn delete_in_store(&self, name: &str, store: Option<&str>) -> Result<()> {
        let sql = format!("{}{}", statement::drop(self.kind(), name), statement::in_store(store));
        self.execute(&sql).await?;
        tracing::info!("Dropped {} '{}'", self.kind(), name);
        Ok(())
    }

    /// Insert records one statement at a time
    ///
    /// Stops at the first failure; values already inserted stay inserted.
    pub async fn insert_values(&self, name: &str, values: &[Value], store: &str, with_params: &WithClause) -> Result<()> {
        for (i, value) in values.iter().enumerate() {
            let sql = statement::insert_entity_value(name, store, value, with_params);
            self.execute(&sql).await.inspect_err(|_| {
                tracing::warn!("Insert into entity '{}' stopped at value {} of {}", name, i + 1, values.len());
            })?;
        }
        tracing::info!("Inserted {} values into entity '{}'", values.len(), name);
        Ok(())
    }
}
