//! Generic CRUD handlers, instantiated once per resource type.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Extension, Path, Query},
    http::StatusCode,
    routing::{delete, get, post, put, MethodRouter},
    Router,
};

use agenda_core::{timestamp, Entity, ListParams, ListQuery, RecordId};
use agenda_infra::ResourceStore;

use crate::app::routes::Operation;
use crate::app::{dto, errors};

type Store<E> = Arc<dyn ResourceStore<E>>;

/// Router for one resource, relative to its root (`/` and `/:id`).
pub fn router<E: Entity>(store: Store<E>) -> Router {
    Operation::ALL
        .into_iter()
        .fold(Router::new(), |router, op| router.route(op.path(), method_router::<E>(op)))
        .layer(Extension(store))
}

fn method_router<E: Entity>(op: Operation) -> MethodRouter {
    match op {
        Operation::Create => post(create::<E>),
        Operation::GetAll => get(get_all::<E>),
        Operation::GetOne => get(get_one::<E>),
        Operation::Update => put(update::<E>),
        Operation::Delete => delete(delete_one::<E>),
    }
}

pub async fn create<E: Entity>(
    Extension(store): Extension<Store<E>>,
    body: Bytes,
) -> axum::response::Response {
    let mut entity: E = match serde_json::from_slice(&body) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!(resource = E::RESOURCE, error = %e, "create: invalid body");
            return errors::failure(StatusCode::BAD_REQUEST, errors::POST_INVALID_BODY);
        }
    };

    entity.set_id(RecordId::UNASSIGNED);
    entity.audit_mut().stamp_created(&timestamp::now_bogota());

    match store.create(entity).await {
        Ok(created) => dto::respond(StatusCode::CREATED, "Registro Exitoso", created),
        Err(e) => {
            tracing::error!(resource = E::RESOURCE, error = %e, "create failed");
            errors::failure(StatusCode::BAD_REQUEST, errors::POST_FAILED)
        }
    }
}

pub async fn get_one<E: Entity>(
    Extension(store): Extension<Store<E>>,
    Path(raw_id): Path<String>,
) -> axum::response::Response {
    let id = match RecordId::parse_path(&raw_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(resource = E::RESOURCE, error = %e, "get_one: invalid id");
            return errors::failure(StatusCode::NOT_FOUND, errors::GET_ONE_FAILED);
        }
    };

    match store.get_by_id(id).await {
        Ok(entity) => dto::respond(StatusCode::OK, "Request successful", entity),
        Err(e) => {
            tracing::error!(resource = E::RESOURCE, %id, error = %e, "get_one failed");
            errors::failure(StatusCode::NOT_FOUND, errors::GET_ONE_FAILED)
        }
    }
}

pub async fn get_all<E: Entity>(
    Extension(store): Extension<Store<E>>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> axum::response::Response {
    let params = match pairs {
        Ok(Query(pairs)) => ListParams::from_pairs(pairs),
        Err(e) => {
            tracing::error!(resource = E::RESOURCE, error = %e, "get_all: unreadable query string");
            return errors::failure(StatusCode::BAD_REQUEST, errors::GET_ALL_FAILED);
        }
    };

    // Malformed filters are rejected before the store is touched.
    let query = match ListQuery::parse(&params) {
        Ok(q) => q,
        Err(e) => {
            tracing::error!(resource = E::RESOURCE, error = %e, "get_all: invalid query");
            return errors::failure(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    match store.list(&query).await {
        Ok(rows) => dto::respond(StatusCode::OK, "Request successful", rows),
        Err(e) => {
            tracing::error!(resource = E::RESOURCE, error = %e, "get_all failed");
            errors::failure(StatusCode::NOT_FOUND, errors::GET_ALL_FAILED)
        }
    }
}

pub async fn update<E: Entity>(
    Extension(store): Extension<Store<E>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> axum::response::Response {
    let id = match RecordId::parse_path(&raw_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(resource = E::RESOURCE, error = %e, "update: invalid id");
            return errors::failure(StatusCode::BAD_REQUEST, errors::PUT_FAILED);
        }
    };

    let mut entity: E = match serde_json::from_slice(&body) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!(resource = E::RESOURCE, %id, error = %e, "update: invalid body");
            return errors::failure(StatusCode::BAD_REQUEST, errors::PUT_FAILED);
        }
    };
    // The path id always wins over one in the body.
    entity.set_id(id);

    let supplied = entity.audit().fecha_creacion.trim().to_string();
    let fecha_creacion = if supplied.is_empty() {
        // Omitted: keep the stored creation stamp.
        match store.get_by_id(id).await {
            Ok(current) => current.audit().fecha_creacion.clone(),
            Err(e) => {
                tracing::error!(resource = E::RESOURCE, %id, error = %e, "update: lookup failed");
                return errors::failure(StatusCode::BAD_REQUEST, errors::PUT_FAILED);
            }
        }
    } else {
        match timestamp::correct(&supplied) {
            Ok(corrected) => corrected,
            Err(e) => {
                tracing::error!(resource = E::RESOURCE, %id, error = %e, "update: bad creation timestamp");
                return errors::failure(StatusCode::BAD_REQUEST, errors::PUT_FAILED);
            }
        }
    };
    entity.audit_mut().fecha_creacion = fecha_creacion;
    entity.audit_mut().stamp_modified(&timestamp::now_bogota());

    match store.update_by_id(&entity).await {
        Ok(()) => dto::respond(StatusCode::OK, "Update successful", entity),
        Err(e) => {
            tracing::error!(resource = E::RESOURCE, %id, error = %e, "update failed");
            errors::failure(StatusCode::BAD_REQUEST, errors::PUT_FAILED)
        }
    }
}

pub async fn delete_one<E: Entity>(
    Extension(store): Extension<Store<E>>,
    Path(raw_id): Path<String>,
) -> axum::response::Response {
    let id = match RecordId::parse_path(&raw_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(resource = E::RESOURCE, error = %e, "delete: invalid id");
            return errors::failure(StatusCode::NOT_FOUND, errors::DELETE_FAILED);
        }
    };

    match store.delete_by_id(id).await {
        Ok(()) => dto::respond(StatusCode::OK, "Delete successful", dto::Deleted { id }),
        Err(e) => {
            tracing::error!(resource = E::RESOURCE, %id, error = %e, "delete failed");
            errors::failure(StatusCode::NOT_FOUND, errors::DELETE_FAILED)
        }
    }
}
