//! Resource managers
//!
//! Each manager is a [`ResourceManager`] over one record type sharing the client's
//! connection.

pub mod base;
pub mod compute_pools;
pub mod databases;
pub mod entities;
pub mod registry;
pub mod schema_registries;
pub mod stores;
pub mod streams;

pub use base::{fold_property_rows, ResourceManager};
pub use compute_pools::ComputePoolManager;
pub use databases::DatabaseManager;
pub use entities::EntityManager;
pub use registry::{ResourceDef, ResourceKind};
pub use schema_registries::SchemaRegistryManager;
pub use stores::StoreManager;
pub use streams::StreamManager;
