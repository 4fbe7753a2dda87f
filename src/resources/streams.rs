use super::base::ResourceManager;
use crate::error::{Result, SdkError};
use crate::models::{ColumnDef, Stream, StreamCreateParams, StreamUpdateParams};
use crate::sql::escape::escape_identifier;
use crate::sql::statement;

pub type StreamManager = ResourceManager<Stream>;

impl ResourceManager<Stream> {
    /// `CREATE STREAM` backed by an existing topic
    pub async fn create(&self, params: StreamCreateParams) -> Result<Stream> {
        params.validate()?;
        let sql = statement::create(
            self.kind(),
            &params.name,
            &params.to_with_clause(),
            params.comment.as_deref(),
        );
        self.create_with(&params.name, &sql).await
    }

    /// `CREATE STREAM "name" ("col" TYPE, ...) WITH (...)`
    pub async fn create_with_schema(&self, columns: &[ColumnDef], params: StreamCreateParams) -> Result<Stream> {
        params.validate()?;
        if columns.is_empty() {
            return Err(SdkError::invalid(format!(
                "stream '{}' needs at least one column",
                params.name
            )));
        }

        let column_list: Vec<String> = columns.iter().map(ColumnDef::to_sql).collect();
        let mut sql = format!(
            "CREATE STREAM {} ({})",
            escape_identifier(&params.name),
            column_list.join(", ")
        );
        params.to_with_clause().append_to(&mut sql);
        statement::append_comment(&mut sql, params.comment.as_deref());

        self.create_with(&params.name, &sql).await
    }

    /// `CREATE STREAM "name" WITH (...) AS <select>`
    ///
    /// A comment is applied with a separate `ALTER` once the stream exists.
    pub async fn create_from_select(&self, select: &str, params: StreamCreateParams) -> Result<Stream> {
        params.validate()?;
        let select = select.trim().trim_end_matches(';');
        if select.is_empty() {
            return Err(SdkError::invalid(format!(
                "stream '{}' needs a query to select from",
                params.name
            )));
        }

        let mut sql = format!("CREATE STREAM {}", escape_identifier(&params.name));
        params.to_with_clause().append_to(&mut sql);
        sql.push_str(" AS ");
        sql.push_str(select);

        self.execute(&sql).await?;
        tracing::info!("Created {} '{}' from query", self.kind(), params.name);

        if let Some(comment) = params.comment.as_deref() {
            self.execute(&statement::set_comment(self.kind(), &params.name, comment))
                .await?;
        }
        self.get(&params.name).await
    }

    pub async fn update(&self, name: &str, params: StreamUpdateParams) -> Result<Stream> {
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
