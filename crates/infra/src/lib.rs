//! Infrastructure layer: data access and configuration.

pub mod config;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use store::{InMemoryResourceStore, PostgresResourceStore, ResourceStore, StoreError};
