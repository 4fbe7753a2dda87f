//! Resource Registry - statement keywords per resource kind
//!
//! Every kind of remotely managed object has a fixed set of keywords used when
//! building statements. They live in one static table so managers never spell a
//! keyword themselves.

use serde::Serialize;
use std::fmt;

/// Category of remotely managed object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResourceKind {
    Stream,
    Store,
    Database,
    ComputePool,
    Entity,
    SchemaRegistry,
}

/// Keywords and capabilities of a resource kind
#[derive(Debug, Clone)]
pub struct ResourceDef {
    pub display_name: &'static str,
    /// Keyword after CREATE / DROP / ALTER / UPDATE
    pub keyword: &'static str,
    /// Keyword after LIST
    pub plural: &'static str,
    /// Keyword after DESCRIBE
    pub describe_keyword: &'static str,
    /// Whether START / STOP apply
    pub startable: bool,
}

static REGISTRY: [ResourceDef; 6] = [
    ResourceDef {
        display_name: "Stream",
        keyword: "STREAM",
        plural: "STREAMS",
        describe_keyword: "RELATION",
        startable: true,
    },
    ResourceDef {
        display_name: "Store",
        keyword: "STORE",
        plural: "STORES",
        describe_keyword: "STORE",
        startable: false,
    },
    ResourceDef {
        display_name: "Database",
        keyword: "DATABASE",
        plural: "DATABASES",
        describe_keyword: "DATABASE",
        startable: false,
    },
    ResourceDef {
        display_name: "Compute pool",
        keyword: "COMPUTE_POOL",
        plural: "COMPUTE_POOLS",
        describe_keyword: "COMPUTE_POOL",
        startable: true,
    },
    ResourceDef {
        display_name: "Entity",
        keyword: "ENTITY",
        plural: "ENTITIES",
        describe_keyword: "ENTITY",
        startable: false,
    },
    ResourceDef {
        display_name: "Schema registry",
        keyword: "SCHEMA_REGISTRY",
        plural: "SCHEMA_REGISTRIES",
        describe_keyword: "SCHEMA_REGISTRY",
        startable: false,
    },
];

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Stream,
        ResourceKind::Store,
        ResourceKind::Database,
        ResourceKind::ComputePool,
        ResourceKind::Entity,
        ResourceKind::SchemaRegistry,
    ];

    /// Get the definition for this kind
    pub fn def(self) -> &'static ResourceDef {
        let idx = match self {
            ResourceKind::Stream => 0,
            ResourceKind::Store => 1,
            ResourceKind::Database => 2,
            ResourceKind::ComputePool => 3,
            ResourceKind::Entity => 4,
            ResourceKind::SchemaRegistry => 5,
        };
        &REGISTRY[idx]
    }

    pub fn keyword(self) -> &'static str {
        self.def().keyword
    }

    pub fn plural(self) -> &'static str {
        self.def().plural
    }

    pub fn describe_keyword(self) -> &'static str {
        self.def().describe_keyword
    }

    pub fn is_startable(self) -> bool {
        self.def().startable
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.def().display_name)
    }
}
