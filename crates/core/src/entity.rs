//! Entity trait: identity + the schema a resource exposes over HTTP and storage.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::id::RecordId;

/// JSON name of the identifier field every resource carries.
pub const ID_FIELD: &str = "Id";

/// One field of a resource schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Field name in the JSON representation (e.g. `Nombres`).
    pub field: &'static str,
    /// Column name in the relational table (e.g. `nombres`).
    pub column: &'static str,
    /// Bare SQL type of the column (`TEXT`, `BIGINT`, ...).
    pub sql_type: &'static str,
}

impl Column {
    pub const fn new(field: &'static str, column: &'static str, sql_type: &'static str) -> Self {
        Self {
            field,
            column,
            sql_type,
        }
    }
}

/// Creation/modification stamps shared by every resource.
///
/// Both are fixed-locale strings (see [`crate::timestamp`]).
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Audit {
    pub fecha_creacion: String,
    pub fecha_modificacion: String,
}

impl Audit {
    /// Stamp both fields with the same instant.
    pub fn stamp_created(&mut self, now: &str) {
        self.fecha_creacion = now.to_string();
        self.fecha_modificacion = now.to_string();
    }

    pub fn stamp_modified(&mut self, now: &str) {
        self.fecha_modificacion = now.to_string();
    }
}

/// A CRUD resource.
///
/// Implementors describe their schema statically; handlers and stores are
/// written once against this trait.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// URL segment under the API prefix (e.g. `contacto`).
    const RESOURCE: &'static str;

    /// Relational table name.
    const TABLE: &'static str;

    /// Schema. The first entry is always the `Id` column.
    const COLUMNS: &'static [Column];

    fn id(&self) -> RecordId;

    fn set_id(&mut self, id: RecordId);

    fn audit(&self) -> &Audit;

    fn audit_mut(&mut self) -> &mut Audit;

    /// Whether `field` names a JSON field of this resource.
    fn has_field(field: &str) -> bool {
        Self::COLUMNS.iter().any(|c| c.field == field)
    }

    fn column_for(field: &str) -> Option<&'static Column> {
        Self::COLUMNS.iter().find(|c| c.field == field)
    }
}
