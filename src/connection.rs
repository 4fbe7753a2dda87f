//! Connection seam
//!
//! The SDK never talks to the network itself. A [`Connection`] runs statements on
//! its behalf: `exec` for statements without results, `query` for statements that
//! return rows.

use crate::error::{Result, SdkError};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::{Map, Value};
use std::fmt;

/// Maximum length of a statement written to the log
const MAX_LOG_STATEMENT_LENGTH: usize = 200;

/// One result row keyed by column name
pub type Row = Map<String, Value>;

/// Runs statements against the platform
#[async_trait]
pub trait Connection: Send + Sync {
    /// Run a statement that returns no rows
    async fn exec(&self, statement: &str) -> anyhow::Result<()>;

    /// Run a statement and stream back its rows
    async fn query(&self, statement: &str) -> anyhow::Result<Rows>;
}

/// Lazily streamed query result
///
/// Each item is one row's values, in the same order as [`columns`](Rows::columns).
/// Iterating again requires issuing the query again.
pub struct Rows {
    columns: Vec<String>,
    rows: BoxStream<'static, anyhow::Result<Vec<Value>>>,
}

impl Rows {
    pub fn new(columns: Vec<String>, rows: BoxStream<'static, anyhow::Result<Vec<Value>>>) -> Self {
        Self { columns, rows }
    }

    /// Rows that are already in memory
    pub fn from_values(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self::new(columns, stream::iter(rows.into_iter().map(Ok)).boxed())
    }

    pub fn empty() -> Self {
        Self::from_values(Vec::new(), Vec::new())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Drain the stream into rows keyed by column name
    ///
    /// Values beyond the last column are ignored; missing trailing values leave the
    /// column out of the row.
    pub async fn collect_rows(self) -> anyhow::Result<Vec<Row>> {
        let Rows { columns, mut rows } = self;
        let mut out = Vec::new();

        while let Some(values) = rows.next().await {
            let row: Row = columns.iter().cloned().zip(values?).collect();
            out.push(row);
        }

        Ok(out)
    }
}

impl fmt::Debug for Rows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rows")
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

/// Append the statement terminator unless it is already there
pub fn terminate(statement: &str) -> String {
    let trimmed = statement.trim_end();
    if trimmed.ends_with(';') {
        trimmed.to_string()
    } else {
        format!("{};", trimmed)
    }
}

/// Shorten a statement for logging
///
/// Statements can carry credentials in their WITH clause; only the head is logged.
pub(crate) fn sanitize_for_log(statement: &str) -> String {
    let mut single_line: String = statement
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    if let Some(idx) = single_line.find(" WITH (") {
        single_line.truncate(idx);
        single_line.push_str(" WITH (...)");
    }

    if single_line.len() <= MAX_LOG_STATEMENT_LENGTH {
        return single_line;
    }

    let cut = single_line
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|i| *i <= MAX_LOG_STATEMENT_LENGTH)
        .last()
        .unwrap_or(0);
    format!(
        "{}... [truncated, {} bytes total]",
        &single_line[..cut],
        single_line.len()
    )
}

/// Run `statement` through `connection.exec`, terminating and classifying errors
pub(crate) async fn execute(connection: &dyn Connection, statement: &str) -> Result<()> {
    let sql = terminate(statement);
    tracing::debug!("EXEC {}", sanitize_for_log(&sql));

    connection.exec(&sql).await.map_err(|e| {
        tracing::error!("Statement failed: {} - {:#}", sanitize_for_log(&sql), e);
        SdkError::from_remote(&sql, e)
    })
}

/// Run `statement` through `connection.query` and collect the rows
pub(crate) async fn query(connection: &dyn Connection, statement: &str) -> Result<Vec<Row>> {
    let sql = terminate(statement);
    tracing::debug!("QUERY {}", sanitize_for_log(&sql));

    let result = match connection.query(&sql).await {
        Ok(rows) => rows.collect_rows().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(rows) => {
            tracing::debug!("QUERY returned {} rows", rows.len());
            Ok(rows)
        }
        Err(e) => {
            tracing::error!("Query failed: {} - {:#}", sanitize_for_log(&sql), e);
            Err(SdkError::from_remote(&sql, e))
        }
    }
}
