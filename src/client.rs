//! DeltaStream client
//!
//! Owns the connection handle and configuration, hands out one manager per
//! resource kind, and offers raw statement execution plus session helpers.

use crate::config::ClientConfig;
use crate::connection::{self, Connection, Row};
use crate::error::Result;
use crate::models::{Database, Record};
use crate::resources::{
    ComputePoolManager, DatabaseManager, EntityManager, ResourceKind, SchemaRegistryManager,
    StoreManager, StreamManager,
};
use crate::sql::escape::escape_identifier;
use crate::sql::statement;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

pub struct DeltaStreamClient {
    connection: Arc<dyn Connection>,
    config: ClientConfig,
    /// Last database switched to or discovered; never held across an await
    current_database: RwLock<Option<String>>,
    streams: StreamManager,
    stores: StoreManager,
    databases: DatabaseManager,
    compute_pools: ComputePoolManager,
    entities: EntityManager,
    schema_registries: SchemaRegistryManager,
}

impl fmt::Debug for DeltaStreamClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeltaStreamClient")
            .field("config", &self.config)
            .field("current_database", &self.cached_database())
            .finish_non_exhaustive()
    }
}

impl DeltaStreamClient {
    /// Client over `connection` with default settings
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        Self::build(connection, ClientConfig::default())
    }

    /// Client over `connection`; fails if `config` does not validate
    pub fn with_config(connection: Arc<dyn Connection>, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(connection, config))
    }

    fn build(connection: Arc<dyn Connection>, config: ClientConfig) -> Self {
        Self {
            streams: StreamManager::new(Arc::clone(&connection)),
            stores: StoreManager::new(Arc::clone(&connection)),
            databases: DatabaseManager::new(Arc::clone(&connection)),
            compute_pools: ComputePoolManager::new(Arc::clone(&connection)),
            entities: EntityManager::new(Arc::clone(&connection)),
            schema_registries: SchemaRegistryManager::new(Arc::clone(&connection)),
            current_database: RwLock::new(None),
            connection,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn connection(&self) -> Arc<dyn Connection> {
        Arc::clone(&self.connection)
    }

    pub fn streams(&self) -> &StreamManager {
        &self.streams
    }

    pub fn stores(&self) -> &StoreManager {
        &self.stores
    }

    pub fn databases(&self) -> &DatabaseManager {
        &self.databases
    }

    pub fn compute_pools(&self) -> &ComputePoolManager {
        &self.compute_pools
    }

    pub fn entities(&self) -> &EntityManager {
        &self.entities
    }

    pub fn schema_registries(&self) -> &SchemaRegistryManager {
        &self.schema_registries
    }

    /// Run a statement that returns no rows
    pub async fn execute_sql(&self, sql: &str) -> Result<()> {
        connection::execute(self.connection.as_ref(), sql).await
    }

    /// Run a statement and collect its rows
    pub async fn query_sql(&self, sql: &str) -> Result<Vec<Row>> {
        connection::query(self.connection.as_ref(), sql).await
    }

    pub async fn use_database(&self, name: &str) -> Result<()> {
        self.execute_sql(&format!("USE DATABASE {}", escape_identifier(name)))
            .await?;
        self.set_cached_database(Some(name.to_string()));
        tracing::info!("Using database '{}'", name);
        Ok(())
    }

    pub async fn use_schema(&self, name: &str) -> Result<()> {
        self.execute_sql(&format!("USE SCHEMA {}", escape_identifier(name)))
            .await?;
        tracing::info!("Using schema '{}'", name);
        Ok(())
    }

    pub async fn use_store(&self, name: &str) -> Result<()> {
        self.execute_sql(&format!("USE STORE {}", escape_identifier(name)))
            .await?;
        tracing::info!("Using store '{}'", name);
        Ok(())
    }

    /// Session database
    ///
    /// Answered from the last [`use_database`](Self::use_database) when there was one;
    /// otherwise lists databases and picks the default one (or the first listed).
    /// `None` when no database is visible.
    pub async fn current_database(&self) -> Result<Option<String>> {
        if let Some(name) = self.cached_database() {
            return Ok(Some(name));
        }

        let rows = self
            .query_sql(&statement::list(ResourceKind::Database, &[]))
            .await?;
        let databases: Vec<Database> = rows.iter().map(Database::from_row).collect();

        let chosen = databases
            .iter()
            .find(|db| db.is_default == Some(true))
            .or_else(|| databases.first())
            .map(|db| db.name.clone());

        if let Some(name) = &chosen {
            self.set_cached_database(Some(name.clone()));
        }
        Ok(chosen)
    }

    /// Whether the platform answers a trivial statement
    pub async fn test_connection(&self) -> bool {
        match self.query_sql(&statement::list(ResourceKind::Database, &[])).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Connection test failed: {}", e);
                false
            }
        }
    }

    /// Switch to the database, schema and store named in the configuration
    pub async fn initialize(&self) -> Result<()> {
        if let Some(database) = self.config.database_name.as_deref() {
            self.use_database(database).await?;
        }
        if let Some(schema) = self.config.schema_name.as_deref() {
            self.use_schema(schema).await?;
        }
        if let Some(store) = self.config.store_name.as_deref() {
            self.use_store(store).await?;
        }
        Ok(())
    }

    fn cached_database(&self) -> Option<String> {
        self.current_database
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_cached_database(&self, name: Option<String>) {
        *self
            .current_database
            .write()
            .unwrap_or_else(PoisonError::into_inner) = name;
    }
}
