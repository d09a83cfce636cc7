//! Data access for agenda resources.
//!
//! One generic store contract, two backends: in-memory (tests/dev) and
//! Postgres. Handlers only ever see `Arc<dyn ResourceStore<E>>`.

pub mod in_memory;
pub mod postgres;

use serde_json::Value as JsonValue;
use thiserror::Error;

use agenda_core::{Entity, ListQuery, QueryError, RecordId, SortKey};

pub use in_memory::InMemoryResourceStore;
pub use postgres::PostgresResourceStore;

/// Data-access failure.
///
/// Handlers collapse these into one status per operation; the variants
/// show up in logs.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error(transparent)]
    InvalidQuery(#[from] QueryError),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("backend error in {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn backend(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            operation,
            message: message.into(),
        }
    }
}

/// Persistence contract for one resource type.
#[async_trait::async_trait]
pub trait ResourceStore<E: Entity>: Send + Sync {
    /// Persist a new record; the store assigns the id.
    async fn create(&self, entity: E) -> Result<E, StoreError>;

    async fn get_by_id(&self, id: RecordId) -> Result<E, StoreError>;

    /// Filtered, projected, ordered and paginated read.
    ///
    /// Rows are JSON objects so a `fields` projection can drop columns.
    async fn list(&self, query: &ListQuery) -> Result<Vec<JsonValue>, StoreError>;

    /// Replace every non-id field of an existing record.
    async fn update_by_id(&self, entity: &E) -> Result<(), StoreError>;

    async fn delete_by_id(&self, id: RecordId) -> Result<(), StoreError>;
}

/// Check every field a query names against the schema and resolve its sort keys.
pub(crate) fn resolve_query<E: Entity>(query: &ListQuery) -> Result<Vec<SortKey>, StoreError> {
    let named = query
        .filters
        .keys()
        .chain(query.fields.iter())
        .chain(query.sort_by.iter());
    for field in named {
        if !E::has_field(field) {
            return Err(StoreError::UnknownField(field.clone()));
        }
    }
    Ok(query.sort_keys()?)
}
