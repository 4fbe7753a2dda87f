//! Generic resource manager
//!
//! One [`ResourceManager`] per record type. The operations every kind shares
//! (list, get, exists, delete) live here; kind-specific create/update/lifecycle
//! operations are inherent impls on the concrete instantiation in each module.

use super::registry::ResourceKind;
use crate::connection::{self, Connection, Row};
use crate::error::{Result, SdkError};
use crate::models::base::{normalize_key, Record};
use crate::sql::{statement, WithClause};
use serde_json::{Map, Value};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Manages the remote objects of one record type
pub struct ResourceManager<R: Record> {
    connection: Arc<dyn Connection>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Clone for ResourceManager<R> {
    fn clone(&self) -> Self {
        Self {
            connection: Arc::clone(&self.connection),
            _record: PhantomData,
        }
    }
}

impl<R: Record> fmt::Debug for ResourceManager<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceManager")
            .field("kind", &R::KIND)
            .finish_non_exhaustive()
    }
}

impl<R: Record> ResourceManager<R> {
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        Self {
            connection,
            _record: PhantomData,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        R::KIND
    }

    pub(crate) async fn execute(&self, sql: &str) -> Result<()> {
        connection::execute(self.connection.as_ref(), sql).await
    }

    pub(crate) async fn query_rows(&self, sql: &str) -> Result<Vec<Row>> {
        connection::query(self.connection.as_ref(), sql).await
    }

    /// All objects of this kind visible in the session
    pub async fn list(&self) -> Result<Vec<R>> {
        self.list_with(&statement::list(R::KIND, &[])).await
    }

    pub(crate) async fn list_with(&self, sql: &str) -> Result<Vec<R>> {
        let rows = self.query_rows(sql).await?;
        Ok(rows.iter().map(R::from_row).collect())
    }

    /// Describe one object
    ///
    /// Fails with [`SdkError::ResourceNotFound`] when the describe returns no rows.
    pub async fn get(&self, name: &str) -> Result<R> {
        self.get_with(name, &statement::describe(R::KIND, name)).await
    }

    pub(crate) async fn get_with(&self, name: &str, sql: &str) -> Result<R> {
        let rows = fold_property_rows(self.query_rows(sql).await?);
        match rows.first() {
            Some(row) => Ok(R::from_row(row)),
            None => Err(SdkError::not_found(R::KIND, name)),
        }
    }

    /// Whether an object named exactly `name` is listed
    pub async fn exists(&self, name: &str) -> Result<bool> {
        let records = self.list().await?;
        Ok(records.iter().any(|r| r.name() == name))
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        self.execute(&statement::drop(R::KIND, name)).await?;
        tracing::info!("Dropped {} '{}'", R::KIND, name);
        Ok(())
    }

    /// Run a CREATE statement and read the new object back
    pub(crate) async fn create_with(&self, name: &str, sql: &str) -> Result<R> {
        self.execute(sql).await?;
        tracing::info!("Created {} '{}'", R::KIND, name);
        self.get(name).await
    }

    /// Apply parameter and comment changes, then read the object back
    ///
    /// Parameters go first as `UPDATE`, the comment second as `ALTER ... SET COMMENT`.
    pub(crate) async fn apply_update(&self, name: &str, clause: &WithClause, comment: Option<&str>) -> Result<R> {
        self.apply_changes(name, clause, comment).await?;
        self.get(name).await
    }

    pub(crate) async fn apply_changes(&self, name: &str, clause: &WithClause, comment: Option<&str>) -> Result<()> {
        if clause.is_empty() && comment.is_none() {
            return Err(SdkError::invalid(format!(
                "nothing to update for {} '{}'",
                R::KIND,
                name
            )));
        }

        if !clause.is_empty() {
            self.execute(&statement::update(R::KIND, name, clause)).await?;
        }
        if let Some(comment) = comment {
            self.execute(&statement::set_comment(R::KIND, name, comment)).await?;
        }

        tracing::info!("Updated {} '{}'", R::KIND, name);
        Ok(())
    }

    pub(crate) async fn start_resource(&self, name: &str) -> Result<()> {
        self.require_startable()?;
        self.execute(&statement::start(R::KIND, name)).await?;
        tracing::info!("Started {} '{}'", R::KIND, name);
        Ok(())
    }

    pub(crate) async fn stop_resource(&self, name: &str) -> Result<()> {
        self.require_startable()?;
        self.execute(&statement::stop(R::KIND, name)).await?;
        tracing::info!("Stopped {} '{}'", R::KIND, name);
        Ok(())
    }

    fn require_startable(&self) -> Result<()> {
        if R::KIND.is_startable() {
            Ok(())
        } else {
            Err(SdkError::invalid(format!("{} cannot be started or stopped", R::KIND)))
        }
    }
}

/// Fold a property/value describe result into one row
///
/// Some describes answer with one row per property (`property`/`value` or
/// `key`/`value` columns). Any other shape is returned unchanged.
pub fn fold_property_rows(rows: Vec<Row>) -> Vec<Row> {
    let Some(first) = rows.first() else {
        return rows;
    };
    let Some((key_column, value_column)) = property_columns(first) else {
        return rows;
    };

    let mut folded = Map::new();
    for row in &rows {
        let key = match row.get(&key_column) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => continue,
            Some(other) => other.to_string(),
        };
        let value = row.get(&value_column).cloned().unwrap_or(Value::Null);
        folded.insert(key, value);
    }
    vec![folded]
}

fn property_columns(row: &Row) -> Option<(String, String)> {
    if row.len() != 2 {
        return None;
    }
    let mut key_column = None;
    let mut value_column = None;
    for column in row.keys() {
        match normalize_key(column).as_str() {
            "property" | "key" => key_column = Some(column.clone()),
            "value" => value_column = Some(column.clone()),
            _ => {}
        }
    }
    Some((key_column?, value_column?))
}
