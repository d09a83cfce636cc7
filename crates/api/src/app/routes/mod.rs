//! Route table.
//!
//! Built explicitly at startup from the mounted resources. The same table
//! that lists the routes also produces the axum [`Router`], so what
//! `entries()` reports is exactly what is served.

use std::sync::Arc;

use axum::{http::Method, Router};

use agenda_core::Entity;
use agenda_infra::ResourceStore;

use crate::app::services::AppServices;

pub mod resource;
pub mod system;

/// The five operations every resource exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    GetAll,
    GetOne,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Create,
        Operation::GetAll,
        Operation::GetOne,
        Operation::Update,
        Operation::Delete,
    ];

    pub fn method(&self) -> Method {
        match self {
            Operation::Create => Method::POST,
            Operation::GetAll | Operation::GetOne => Method::GET,
            Operation::Update => Method::PUT,
            Operation::Delete => Method::DELETE,
        }
    }

    /// Path relative to the resource root.
    pub fn path(&self) -> &'static str {
        match self {
            Operation::Create | Operation::GetAll => "/",
            Operation::GetOne | Operation::Update | Operation::Delete => "/:id",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Create => "Post",
            Operation::GetAll => "GetAll",
            Operation::GetOne => "GetOne",
            Operation::Update => "Put",
            Operation::Delete => "Delete",
        }
    }
}

/// One served route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub method: Method,
    /// Full path, prefix included (e.g. `/v1/contacto/:id`).
    pub path: String,
    pub resource: &'static str,
    pub operation: Operation,
}

pub struct RouteTable {
    prefix: String,
    entries: Vec<RouteEntry>,
    resources: Router,
}

impl RouteTable {
    /// `prefix` is empty or `/segment[/...]` without a trailing slash.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entries: Vec::new(),
            resources: Router::new(),
        }
    }

    /// Register the five operations of `E` under `/<prefix>/<E::RESOURCE>`.
    pub fn mount<E: Entity>(mut self, store: Arc<dyn ResourceStore<E>>) -> Self {
        let root = format!("{}/{}", self.prefix, E::RESOURCE);
        for operation in Operation::ALL {
            let path = match operation.path() {
                "/" => root.clone(),
                rel => format!("{root}{rel}"),
            };
            self.entries.push(RouteEntry {
                method: operation.method(),
                path,
                resource: E::RESOURCE,
                operation,
            });
        }
        self.resources = self
            .resources
            .nest(&format!("/{}", E::RESOURCE), resource::router::<E>(store));
        self
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn into_router(self) -> Router {
        if self.prefix.is_empty() {
            self.resources
        } else {
            Router::new().nest(&self.prefix, self.resources)
        }
    }
}

/// Route table for every agenda resource.
pub fn route_table(services: &AppServices, prefix: &str) -> RouteTable {
    RouteTable::new(prefix)
        .mount(services.contactos.clone())
        .mount(services.telefonos.clone())
        .mount(services.correos.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_resource_gets_five_routes() {
        let table = route_table(&AppServices::in_memory(), "/v1");
        assert_eq!(table.entries().len(), 15);
        for resource in ["contacto", "telefono", "correo"] {
            let ops: HashSet<Operation> = table
                .entries()
                .iter()
                .filter(|e| e.resource == resource)
                .map(|e| e.operation)
                .collect();
            assert_eq!(ops.len(), 5, "{resource}");
        }
    }

    #[test]
    fn method_and_path_pairs_are_unique() {
        let table = route_table(&AppServices::in_memory(), "/v1");
        let pairs: HashSet<(Method, String)> = table
            .entries()
            .iter()
            .map(|e| (e.method.clone(), e.path.clone()))
            .collect();
        assert_eq!(pairs.len(), table.entries().len());
    }

    #[test]
    fn paths_carry_the_prefix() {
        let table = route_table(&AppServices::in_memory(), "/v1");
        let update = table
            .entries()
            .iter()
            .find(|e| e.resource == "contacto" && e.operation == Operation::Update)
            .unwrap();
        assert_eq!(update.method, Method::PUT);
        assert_eq!(update.path, "/v1/contacto/:id");

        let list = table
            .entries()
            .iter()
            .find(|e| e.resource == "correo" && e.operation == Operation::GetAll)
            .unwrap();
        assert_eq!(list.path, "/v1/correo");
    }

    #[test]
    fn empty_prefix_mounts_at_root() {
        let table = route_table(&AppServices::in_memory(), "");
        assert!(table.entries().iter().any(|e| e.path == "/telefono/:id"));
        let _router = table.into_router();
    }
}
