//! List query: filters, projection, ordering and pagination for collection reads.
//!
//! Every parameter is parsed independently; a missing or empty one never
//! affects the others. The resulting [`ListQuery`] is handed to the data-access
//! layer as an opaque description.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Page size applied when `limit` is absent or not an integer.
pub const DEFAULT_LIMIT: i64 = 10;

/// Raw query-string parameters of a collection read.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    pub fields: Option<String>,
    pub sortby: Option<String>,
    pub order: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub query: Option<String>,
}

impl ListParams {
    /// Build from raw query-string pairs. A repeated key keeps its first
    /// value; unknown keys are ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = ListParams::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "fields" => &mut params.fields,
                "sortby" => &mut params.sortby,
                "order" => &mut params.order,
                "limit" => &mut params.limit,
                "offset" => &mut params.offset,
                "query" => &mut params.query,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl core::str::FromStr for SortDirection {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(QueryError::InvalidOrder(other.to_string())),
        }
    }
}

/// A resolved sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

/// Parsed collection query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Exact-match equality filters (field -> value).
    pub filters: BTreeMap<String, String>,
    /// Projection; empty means "every field".
    pub fields: Vec<String>,
    pub sort_by: Vec<String>,
    pub order: Vec<String>,
    /// `None` means no limit.
    pub limit: Option<usize>,
    pub offset: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filters: BTreeMap::new(),
            fields: Vec::new(),
            sort_by: Vec::new(),
            order: Vec::new(),
            limit: Some(DEFAULT_LIMIT as usize),
            offset: 0,
        }
    }
}

impl ListQuery {
    /// Parse raw parameters.
    ///
    /// Only a malformed `query` entry (no `:` separator) is an error; bad
    /// `limit`/`offset` values fall back to their defaults.
    pub fn parse(params: &ListParams) -> Result<Self, QueryError> {
        let mut q = ListQuery::default();

        if let Some(v) = non_empty(&params.fields) {
            q.fields = split_list(v);
        }
        if let Some(v) = non_empty(&params.limit) {
            if let Ok(limit) = v.trim().parse::<i64>() {
                q.limit = usize::try_from(limit).ok().filter(|l| *l > 0);
            }
        }
        if let Some(v) = non_empty(&params.offset) {
            if let Ok(offset) = v.trim().parse::<i64>() {
                q.offset = usize::try_from(offset).unwrap_or(0);
            }
        }
        if let Some(v) = non_empty(&params.sortby) {
            q.sort_by = split_list(v);
        }
        if let Some(v) = non_empty(&params.order) {
            q.order = split_list(v);
        }
        if let Some(v) = non_empty(&params.query) {
            q.filters = parse_filters(v)?;
        }

        Ok(q)
    }

    /// Resolve `sortby`/`order` into sort keys.
    ///
    /// Directions pair up one-to-one, or a single direction applies to every
    /// key. Keys without any direction sort ascending.
    pub fn sort_keys(&self) -> Result<Vec<SortKey>, QueryError> {
        if self.sort_by.is_empty() {
            if !self.order.is_empty() {
                return Err(QueryError::UnusedOrder);
            }
            return Ok(Vec::new());
        }

        let directions: Vec<SortDirection> = match self.order.len() {
            0 => vec![SortDirection::Asc; self.sort_by.len()],
            1 => vec![self.order[0].parse::<SortDirection>()?; self.sort_by.len()],
            n if n == self.sort_by.len() => self
                .order
                .iter()
                .map(|o| o.parse::<SortDirection>())
                .collect::<Result<Vec<_>, QueryError>>()?,
            n => {
                return Err(QueryError::SizeMismatch {
                    sort_by: self.sort_by.len(),
                    order: n,
                })
            }
        };

        Ok(self
            .sort_by
            .iter()
            .zip(directions)
            .map(|(field, direction)| SortKey {
                field: field.clone(),
                direction,
            })
            .collect())
    }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

fn split_list(v: &str) -> Vec<String> {
    v.split(',').map(|s| s.trim().to_string()).collect()
}

fn parse_filters(v: &str) -> Result<BTreeMap<String, String>, QueryError> {
    let mut filters = BTreeMap::new();
    for cond in v.split(',') {
        let (key, value) = cond
            .split_once(':')
            .ok_or_else(|| QueryError::MalformedFilter(cond.to_string()))?;
        filters.insert(key.to_string(), value.to_string());
    }
    Ok(filters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn params() -> ListParams {
        ListParams::default()
    }

    #[test]
    fn repeated_pairs_keep_the_first_value() {
        let p = ListParams::from_pairs([
            ("limit", "1"),
            ("limit", "2"),
            ("sortby", "Nombres"),
            ("page", "3"),
        ]);
        assert_eq!(p.limit.as_deref(), Some("1"));
        assert_eq!(p.sortby.as_deref(), Some("Nombres"));
        assert_eq!(p.offset, None);
    }

    #[test]
    fn defaults_when_nothing_is_given() {
        let q = ListQuery::parse(&params()).unwrap();
        assert_eq!(q.limit, Some(10));
        assert_eq!(q.offset, 0);
        assert!(q.filters.is_empty());
        assert!(q.fields.is_empty());
        assert!(q.sort_keys().unwrap().is_empty());
    }

    #[test]
    fn parses_every_parameter_independently() {
        let q = ListQuery::parse(&ListParams {
            fields: Some("Id,Nombres".into()),
            sortby: Some("Nombres".into()),
            order: Some("desc".into()),
            limit: Some("2".into()),
            offset: Some("1".into()),
            query: Some("Nombres:Alice,Activo:true".into()),
        })
        .unwrap();

        assert_eq!(q.fields, vec!["Id", "Nombres"]);
        assert_eq!(q.limit, Some(2));
        assert_eq!(q.offset, 1);
        assert_eq!(q.filters.get("Nombres").map(String::as_str), Some("Alice"));
        assert_eq!(q.filters.get("Activo").map(String::as_str), Some("true"));
        assert_eq!(
            q.sort_keys().unwrap(),
            vec![SortKey {
                field: "Nombres".into(),
                direction: SortDirection::Desc
            }]
        );
    }

    #[test]
    fn non_integer_limit_and_offset_fall_back_to_defaults() {
        let q = ListQuery::parse(&ListParams {
            limit: Some("ten".into()),
            offset: Some("x".into()),
            ..params()
        })
        .unwrap();
        assert_eq!(q.limit, Some(10));
        assert_eq!(q.offset, 0);
    }

    #[test]
    fn zero_or_negative_limit_means_unbounded() {
        for raw in ["0", "-1"] {
            let q = ListQuery::parse(&ListParams {
                limit: Some(raw.into()),
                ..params()
            })
            .unwrap();
            assert_eq!(q.limit, None, "limit={raw}");
        }
    }

    #[test]
    fn filter_value_keeps_everything_after_the_first_colon() {
        let q = ListQuery::parse(&ListParams {
            query: Some("FechaCreacion:2024-01-01 10:00".into()),
            ..params()
        })
        .unwrap();
        assert_eq!(
            q.filters.get("FechaCreacion").map(String::as_str),
            Some("2024-01-01 10:00")
        );
    }

    #[test]
    fn filter_without_separator_is_rejected() {
        let err = ListQuery::parse(&ListParams {
            query: Some("badformat".into()),
            ..params()
        })
        .unwrap_err();
        assert_eq!(err, QueryError::MalformedFilter("badformat".into()));
        assert_eq!(err.to_string(), "Error: invalid query key/value pair");
    }

    #[test]
    fn one_bad_entry_rejects_the_whole_filter_list() {
        let res = ListQuery::parse(&ListParams {
            query: Some("Nombres:Ana,oops".into()),
            ..params()
        });
        assert!(matches!(res, Err(QueryError::MalformedFilter(_))));
    }

    #[test]
    fn single_order_applies_to_every_sort_key() {
        let q = ListQuery::parse(&ListParams {
            sortby: Some("Apellidos,Nombres".into()),
            order: Some("desc".into()),
            ..params()
        })
        .unwrap();
        let keys = q.sort_keys().unwrap();
        assert_eq!(keys.len(), 2);
        assert!(keys.iter().all(|k| k.direction == SortDirection::Desc));
    }

    #[test]
    fn order_rules_reject_mismatches() {
        let mismatch = ListQuery {
            sort_by: vec!["A".into(), "B".into(), "C".into()],
            order: vec!["asc".into(), "desc".into()],
            ..ListQuery::default()
        };
        assert!(matches!(mismatch.sort_keys(), Err(QueryError::SizeMismatch { .. })));

        let unused = ListQuery {
            order: vec!["asc".into()],
            ..ListQuery::default()
        };
        assert_eq!(unused.sort_keys(), Err(QueryError::UnusedOrder));

        let invalid = ListQuery {
            sort_by: vec!["A".into()],
            order: vec!["up".into()],
            ..ListQuery::default()
        };
        assert!(matches!(invalid.sort_keys(), Err(QueryError::InvalidOrder(_))));
    }

    proptest! {
        #[test]
        fn well_formed_filters_always_parse(
            pairs in proptest::collection::btree_map("[A-Za-z]{1,8}", "[A-Za-z0-9 :]{0,8}", 1..5)
        ) {
            let raw = pairs
                .iter()
                .map(|(k, v)| format!("{k}:{v}"))
                .collect::<Vec<_>>()
                .join(",");
            let q = ListQuery::parse(&ListParams { query: Some(raw), ..ListParams::default() }).unwrap();
            prop_assert_eq!(q.filters, pairs);
        }

        #[test]
        fn limit_is_never_zero(raw in "-?[0-9]{1,6}") {
            let q = ListQuery::parse(&ListParams { limit: Some(raw), ..ListParams::default() }).unwrap();
            prop_assert!(q.limit.map_or(true, |l| l > 0));
        }
    }
}
