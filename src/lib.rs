//! deltastream-sdk - typed resource management for the DeltaStream platform
//!
//! The crate turns typed parameter objects into platform statements and result
//! rows back into typed records. Running the statements is left to a
//! [`Connection`] supplied by the application.
//!
//! - [`client`] - [`DeltaStreamClient`], the entry point
//! - [`resources`] - one manager per resource kind
//! - [`models`] - records and parameter objects
//! - [`sql`] - escaping, WITH clauses and statement text
//! - [`connection`] - the statement execution seam
//! - [`config`] / [`logging`] - client settings and optional file logging

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod logging;
pub mod models;
pub mod resources;
pub mod sql;

pub use client::DeltaStreamClient;
pub use config::ClientConfig;
pub use connection::{Connection, Row, Rows};
pub use error::{Result, SdkError};
pub use logging::LogLevel;
pub use resources::ResourceKind;
pub use sql::WithClause;
