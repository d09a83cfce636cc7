//! Postgres-backed resource store.
//!
//! SQL is generated from the entity's static schema ([`Entity::COLUMNS`]):
//! identifiers only ever come from that schema, every value is bound.
//! Rows are rendered with `jsonb_build_object` so decoding goes through the
//! same serde path as the HTTP body.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | RowNotFound | `NotFound` |
//! | Database (any code) | `Backend` (message includes the SQLSTATE) |
//! | PoolClosed / Io / other | `Backend` |

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use agenda_core::{Column, Entity, ListQuery, RecordId};

use super::{resolve_query, ResourceStore, StoreError};

/// Postgres store for one resource table.
///
/// Cheap to clone; the pool is shared.
#[derive(Debug)]
pub struct PostgresResourceStore<E> {
    pool: Arc<PgPool>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for PostgresResourceStore<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> PostgresResourceStore<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
            _entity: PhantomData,
        }
    }

    /// Create the resource table if it does not exist yet.
    #[instrument(skip(self), fields(table = E::TABLE), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(&create_table_sql::<E>())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl<E: Entity> ResourceStore<E> for PostgresResourceStore<E> {
    #[instrument(skip(self, entity), fields(table = E::TABLE), err)]
    async fn create(&self, entity: E) -> Result<E, StoreError> {
        let cols = data_columns::<E>();
        let sql = format!(
            "INSERT INTO {table} ({names}) SELECT {names} FROM jsonb_to_record($1::jsonb) AS r({defs}) RETURNING {object}",
            table = E::TABLE,
            names = column_names(&cols),
            defs = record_definition(&cols),
            object = build_object(E::COLUMNS.iter()),
        );

        let row: JsonValue = sqlx::query_scalar(&sql)
            .bind(to_record::<E>(&entity)?)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("create", e))?;

        Ok(serde_json::from_value(row)?)
    }

    #[instrument(skip(self), fields(table = E::TABLE), err)]
    async fn get_by_id(&self, id: RecordId) -> Result<E, StoreError> {
        let sql = format!(
            "SELECT {object} FROM {table} WHERE {id} = $1",
            object = build_object(E::COLUMNS.iter()),
            table = E::TABLE,
            id = id_column::<E>(),
        );

        let row: Option<JsonValue> = sqlx::query_scalar(&sql)
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_by_id", e))?;

        match row {
            Some(row) => Ok(serde_json::from_value(row)?),
            None => Err(StoreError::NotFound),
        }
    }

    #[instrument(skip(self, query), fields(table = E::TABLE), err)]
    async fn list(&self, query: &ListQuery) -> Result<Vec<JsonValue>, StoreError> {
        let mut qb = list_query::<E>(query)?;
        qb.build_query_scalar::<JsonValue>()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", e))
    }

    #[instrument(skip(self, entity), fields(table = E::TABLE, id = %entity.id()), err)]
    async fn update_by_id(&self, entity: &E) -> Result<(), StoreError> {
        let cols = data_columns::<E>();
        let assignments = cols
            .iter()
            .map(|c| format!("{0} = r.{0}", c.column))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {table} SET {assignments} FROM jsonb_to_record($1::jsonb) AS r({defs}) WHERE {table}.{id} = $2",
            table = E::TABLE,
            defs = record_definition(&cols),
            id = id_column::<E>(),
        );

        let result = sqlx::query(&sql)
            .bind(to_record::<E>(entity)?)
            .bind(entity.id().get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_by_id", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(table = E::TABLE), err)]
    async fn delete_by_id(&self, id: RecordId) -> Result<(), StoreError> {
        let sql = format!(
            "DELETE FROM {table} WHERE {id} = $1",
            table = E::TABLE,
            id = id_column::<E>(),
        );

        let result = sqlx::query(&sql)
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_by_id", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

/// `SELECT` for a collection read: equality filters on the text rendering,
/// the requested sort keys then `id ASC`, and bound `LIMIT`/`OFFSET`.
fn list_query<E: Entity>(query: &ListQuery) -> Result<QueryBuilder<'static, Postgres>, StoreError> {
    let sort_keys = resolve_query::<E>(query)?;

    let projection: Vec<&'static Column> = if query.fields.is_empty() {
        E::COLUMNS.iter().collect()
    } else {
        query
            .fields
            .iter()
            .map(|f| column::<E>(f))
            .collect::<Result<Vec<_>, StoreError>>()?
    };

    let mut qb: QueryBuilder<'static, Postgres> = QueryBuilder::new("SELECT ");
    qb.push(build_object(projection.into_iter()));
    qb.push(" FROM ");
    qb.push(E::TABLE);

    for (i, (field, value)) in query.filters.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        qb.push(column::<E>(field)?.column);
        qb.push("::text = ");
        qb.push_bind(value.clone());
    }

    qb.push(" ORDER BY ");
    for key in &sort_keys {
        qb.push(column::<E>(&key.field)?.column);
        qb.push(" ");
        qb.push(key.direction.as_sql());
        qb.push(", ");
    }
    qb.push(id_column::<E>());
    qb.push(" ASC");

    if let Some(limit) = query.limit {
        qb.push(" LIMIT ");
        qb.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    }
    qb.push(" OFFSET ");
    qb.push_bind(i64::try_from(query.offset).unwrap_or(i64::MAX));

    Ok(qb)
}

fn id_column<E: Entity>() -> &'static str {
    E::COLUMNS[0].column
}

fn data_columns<E: Entity>() -> Vec<&'static Column> {
    E::COLUMNS.iter().skip(1).collect()
}

fn column<E: Entity>(field: &str) -> Result<&'static Column, StoreError> {
    E::column_for(field).ok_or_else(|| StoreError::UnknownField(field.to_string()))
}

fn column_names(cols: &[&Column]) -> String {
    cols.iter().map(|c| c.column).collect::<Vec<_>>().join(", ")
}

/// Column list for `jsonb_to_record(...) AS r(<defs>)`.
fn record_definition(cols: &[&Column]) -> String {
    cols.iter()
        .map(|c| format!("{} {}", c.column, c.sql_type))
        .collect::<Vec<_>>()
        .join(", ")
}

fn build_object<'a>(cols: impl Iterator<Item = &'a Column>) -> String {
    let pairs = cols
        .map(|c| format!("'{}', {}", c.field, c.column))
        .collect::<Vec<_>>()
        .join(", ");
    format!("jsonb_build_object({pairs})")
}

fn create_table_sql<E: Entity>() -> String {
    let defs = E::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if i == 0 {
                format!("{} BIGSERIAL PRIMARY KEY", c.column)
            } else {
                format!("{} {}", c.column, c.sql_type)
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE IF NOT EXISTS {} ({defs})", E::TABLE)
}

/// Serialize an entity keyed by column name, without the id.
fn to_record<E: Entity>(entity: &E) -> Result<JsonValue, StoreError> {
    let JsonValue::Object(mut fields) = serde_json::to_value(entity)? else {
        return Err(StoreError::backend("serialize", "record did not serialize to an object"));
    };
    let record = data_columns::<E>()
        .into_iter()
        .map(|c| (c.column.to_string(), fields.remove(c.field).unwrap_or(JsonValue::Null)))
        .collect::<Map<_, _>>();
    Ok(JsonValue::Object(record))
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.to_string()).unwrap_or_default();
            StoreError::backend(operation, format!("[{code}] {}", db_err.message()))
        }
        other => StoreError::backend(operation, other.to_string()),
    }
}
