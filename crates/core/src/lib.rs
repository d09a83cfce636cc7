//! `agenda-core`: building blocks shared by every agenda resource.
//!
//! This crate contains **pure** primitives (no HTTP, no storage): identifiers,
//! the entity trait, fixed-locale timestamps and the list-query model.

pub mod entity;
pub mod error;
pub mod id;
pub mod query;
pub mod timestamp;

pub use entity::{Audit, Column, Entity, ID_FIELD};
pub use error::{DomainError, DomainResult, QueryError};
pub use id::RecordId;
pub use query::{ListParams, ListQuery, SortDirection, SortKey};
