//! Typed records and parameter objects for every resource kind

pub mod base;
pub mod coerce;
pub mod compute_pools;
pub mod databases;
pub mod entities;
pub mod schema_registries;
pub mod stores;
pub mod streams;

pub use base::{FieldSpec, Record, UnknownFields};
pub use compute_pools::{ComputePool, ComputePoolCreateParams, ComputePoolUpdateParams};
pub use databases::{Database, DatabaseCreateParams};
pub use entities::{Entity, EntityCreateParams, EntityUpdateParams};
pub use schema_registries::{SchemaRegistry, SchemaRegistryCreateParams, SchemaRegistryUpdateParams};
pub use stores::{
    store_parameter, KafkaAuth, Store, StoreCreateParams, StoreParameter, StoreType, StoreUpdateParams,
    STORE_PARAMETERS,
};
pub use streams::{ColumnDef, Stream, StreamCreateParams, StreamUpdateParams};
