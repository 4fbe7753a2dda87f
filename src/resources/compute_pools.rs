use super::base::ResourceManager;
use crate::error::Result;
use crate::models::{ComputePool, ComputePoolCreateParams, ComputePoolUpdateParams};
use crate::sql::statement;

pub type ComputePoolManager = ResourceManager<ComputePool>;

impl ResourceManager<ComputePool> {
    pub async fn create(&self, params: ComputePoolCreateParams) -> Result<ComputePool> {
        params.validate()?;
        let sql = statement::create(
            self.kind(),
            &params.name,
            &params.to_with_clause(),
            params.comment.as_deref(),
        );
        self.create_with(&params.name, &sql).await
    }

    pub async fn update(&self, name: &str, params: ComputePoolUpdateParams) -> Result<ComputePool> {
        params.validate()?;
        self.apply_update(name, &params.to_with_clause(), params.comment.as_deref())
            .await
    }

    pub async fn start(&self, name: &str) -> Result<()> {
        self.start_resource(name).await
    }

    pub async fn stop(&self, name: &str) -> Result<()> {
        self.stop_resource(name).await
    }
}
