use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::RwLock;

use serde_json::{Map, Value as JsonValue};

use agenda_core::{Entity, ListQuery, RecordId, SortDirection, SortKey};

use super::{resolve_query, ResourceStore, StoreError};

/// In-memory store for tests/dev.
///
/// Records are kept in id order, which is also the listing order when no
/// sort key is given.
#[derive(Debug)]
pub struct InMemoryResourceStore<E> {
    inner: RwLock<Inner<E>>,
}

#[derive(Debug)]
struct Inner<E> {
    last_id: i64,
    records: BTreeMap<i64, E>,
}

impl<E> InMemoryResourceStore<E> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                last_id: 0,
                records: BTreeMap::new(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|i| i.records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> Default for InMemoryResourceStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl<E: Entity> ResourceStore<E> for InMemoryResourceStore<E> {
    async fn create(&self, mut entity: E) -> Result<E, StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::backend("create", "lock poisoned"))?;
        inner.last_id += 1;
        let id = inner.last_id;
        entity.set_id(RecordId::new(id));
        inner.records.insert(id, entity.clone());
        Ok(entity)
    }

    async fn get_by_id(&self, id: RecordId) -> Result<E, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::backend("get_by_id", "lock poisoned"))?;
        inner.records.get(&id.get()).cloned().ok_or(StoreError::NotFound)
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<JsonValue>, StoreError> {
        let sort_keys = resolve_query::<E>(query)?;

        let mut rows = {
            let inner = self
                .inner
                .read()
                .map_err(|_| StoreError::backend("list", "lock poisoned"))?;
            inner
                .records
                .values()
                .map(to_object)
                .collect::<Result<Vec<_>, _>>()?
        };

        rows.retain(|row| {
            query
                .filters
                .iter()
                .all(|(field, expected)| row.get(field).and_then(as_text).as_deref() == Some(expected.as_str()))
        });

        // Stable sort: ties keep id order.
        if !sort_keys.is_empty() {
            rows.sort_by(|a, b| compare_rows(a, b, &sort_keys));
        }

        Ok(rows
            .into_iter()
            .skip(query.offset)
            .take(query.limit.unwrap_or(usize::MAX))
            .map(|row| project(row, &query.fields))
            .collect())
    }

    async fn update_by_id(&self, entity: &E) -> Result<(), StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::backend("update_by_id", "lock poisoned"))?;
        match inner.records.get_mut(&entity.id().get()) {
            Some(slot) => {
                *slot = entity.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete_by_id(&self, id: RecordId) -> Result<(), StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::backend("delete_by_id", "lock poisoned"))?;
        inner
            .records
            .remove(&id.get())
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

fn to_object<E: Entity>(entity: &E) -> Result<Map<String, JsonValue>, StoreError> {
    match serde_json::to_value(entity)? {
        JsonValue::Object(map) => Ok(map),
        other => Err(StoreError::backend(
            "list",
            format!("record did not serialize to an object: {other}"),
        )),
    }
}

/// Textual rendering used for equality filters (matches `column::text` in SQL).
fn as_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn compare_rows(a: &Map<String, JsonValue>, b: &Map<String, JsonValue>, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let ord = compare_values(
            a.get(&key.field).unwrap_or(&JsonValue::Null),
            b.get(&key.field).unwrap_or(&JsonValue::Null),
        );
        let ord = match key.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Nulls sort last ascending, like Postgres.
fn compare_values(a: &JsonValue, b: &JsonValue) -> Ordering {
    match (a, b) {
        (JsonValue::Null, JsonValue::Null) => Ordering::Equal,
        (JsonValue::Null, _) => Ordering::Greater,
        (_, JsonValue::Null) => Ordering::Less,
        (JsonValue::Number(x), JsonValue::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
        },
        (JsonValue::String(x), JsonValue::String(y)) => x.cmp(y),
        (JsonValue::Bool(x), JsonValue::Bool(y)) => x.cmp(y),
        (x, y) => x.to_string().cmp(&y.to_string()),
    }
}

fn project(row: Map<String, JsonValue>, fields: &[String]) -> JsonValue {
    if fields.is_empty() {
        return JsonValue::Object(row);
    }
    let mut row = row;
    let projected = fields
        .iter()
        .map(|f| (f.clone(), row.remove(f).unwrap_or(JsonValue::Null)))
        .collect::<Map<_, _>>();
    JsonValue::Object(projected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenda_core::ListParams;
    use agenda_directory::Contacto;

    fn contacto(nombres: &str, apellidos: &str) -> Contacto {
        Contacto {
            nombres: nombres.to_string(),
            apellidos: apellidos.to_string(),
            ..Contacto::default()
        }
    }

    async fn seeded() -> InMemoryResourceStore<Contacto> {
        let store = InMemoryResourceStore::new();
        for (n, a) in [("Alice", "Zea"), ("Bruno", "Arias"), ("Alice", "Mora"), ("Carla", "Arias")] {
            store.create(contacto(n, a)).await.unwrap();
        }
        store
    }

    fn query(params: ListParams) -> ListQuery {
        ListQuery::parse(&params).unwrap()
    }

    fn ids(rows: &[JsonValue]) -> Vec<i64> {
        rows.iter().map(|r| r["Id"].as_i64().unwrap()).collect()
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids_and_ignores_caller_id() {
        let store = InMemoryResourceStore::new();
        let mut c = contacto("Ana", "");
        c.id = RecordId::new(99);
        let first = store.create(c).await.unwrap();
        let second = store.create(contacto("Beto", "")).await.unwrap();
        assert_eq!(first.id, RecordId::new(1));
        assert_eq!(second.id, RecordId::new(2));
        assert_eq!(store.get_by_id(RecordId::new(1)).await.unwrap().nombres, "Ana");
    }

    #[tokio::test]
    async fn get_missing_record_is_not_found() {
        let store = InMemoryResourceStore::<Contacto>::new();
        assert!(matches!(
            store.get_by_id(RecordId::new(1)).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn update_replaces_existing_and_rejects_missing() {
        let store = seeded().await;
        let mut c = store.get_by_id(RecordId::new(2)).await.unwrap();
        c.nombres = "Bruna".into();
        store.update_by_id(&c).await.unwrap();
        assert_eq!(store.get_by_id(RecordId::new(2)).await.unwrap().nombres, "Bruna");

        c.id = RecordId::new(50);
        assert!(matches!(store.update_by_id(&c).await, Err(StoreError::NotFound)));
        assert_eq!(store.len(), 4);
    }

    #[tokio::test]
    async fn delete_missing_leaves_store_unchanged() {
        let store = seeded().await;
        assert!(matches!(
            store.delete_by_id(RecordId::new(42)).await,
            Err(StoreError::NotFound)
        ));
        assert_eq!(store.len(), 4);

        store.delete_by_id(RecordId::new(1)).await.unwrap();
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn list_paginates_in_id_order() {
        let store = seeded().await;
        let rows = store
            .list(&query(ListParams {
                limit: Some("2".into()),
                offset: Some("1".into()),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(ids(&rows), vec![2, 3]);
    }

    #[tokio::test]
    async fn list_filters_by_exact_match() {
        let store = seeded().await;
        let rows = store
            .list(&query(ListParams {
                query: Some("Nombres:Alice".into()),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(ids(&rows), vec![1, 3]);

        let rows = store
            .list(&query(ListParams {
                query: Some("Nombres:Ali".into()),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn list_filters_non_string_fields_by_their_text() {
        let store = seeded().await;
        let rows = store
            .list(&query(ListParams {
                query: Some("Id:2,Activo:false".into()),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(ids(&rows), vec![2]);
    }

    #[tokio::test]
    async fn list_sorts_by_multiple_keys() {
        let store = seeded().await;
        let rows = store
            .list(&query(ListParams {
                sortby: Some("Apellidos,Nombres".into()),
                order: Some("asc,desc".into()),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(ids(&rows), vec![4, 2, 3, 1]);
    }

    #[tokio::test]
    async fn list_projects_requested_fields() {
        let store = seeded().await;
        let rows = store
            .list(&query(ListParams {
                fields: Some("Id,Nombres".into()),
                limit: Some("1".into()),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(rows, vec![serde_json::json!({"Id": 1, "Nombres": "Alice"})]);
    }

    #[tokio::test]
    async fn list_without_limit_returns_everything() {
        let store = seeded().await;
        let rows = store
            .list(&query(ListParams {
                limit: Some("0".into()),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn nulls_sort_after_values() {
        assert_eq!(compare_values(&JsonValue::Null, &serde_json::json!("a")), Ordering::Greater);
        assert_eq!(compare_values(&serde_json::json!(2), &serde_json::json!(10)), Ordering::Less);
    }
}
