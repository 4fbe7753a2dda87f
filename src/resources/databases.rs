use super::base::ResourceManager;
use crate::error::Result;
use crate::models::{Database, DatabaseCreateParams};
use crate::sql::{statement, WithClause};

pub type DatabaseManager = ResourceManager<Database>;

impl ResourceManager<Database> {
    pub async fn create(&self, params: DatabaseCreateParams) -> Result<Database> {
        params.validate()?;
        let sql = statement::create(
            self.kind(),
            &params.name,
            &WithClause::new(),
            params.comment.as_deref(),
        );
        self.create_with(&params.name, &sql).await
    }

    /// Databases only carry a comment
    pub async fn update(&self, name: &str, comment: &str) -> Result<Database> {
        self.apply_update(name, &WithClause::new(), Some(comment)).await
    }
}
