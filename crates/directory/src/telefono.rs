use serde::{Deserialize, Serialize};

use agenda_core::{Audit, Column, Entity, RecordId};

/// A phone number, optionally attached to a contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Telefono {
    pub id: RecordId,
    pub numero: String,
    /// Free-form kind (`movil`, `fijo`, ...).
    pub tipo: String,
    pub contacto_id: Option<RecordId>,
    pub activo: bool,
    #[serde(flatten)]
    pub audit: Audit,
}

impl Entity for Telefono {
    const RESOURCE: &'static str = "telefono";
    const TABLE: &'static str = "telefono";
    const COLUMNS: &'static [Column] = &[
        Column::new("Id", "id", "BIGINT"),
        Column::new("Numero", "numero", "TEXT"),
        Column::new("Tipo", "tipo", "TEXT"),
        Column::new("ContactoId", "contacto_id", "BIGINT"),
        Column::new("Activo", "activo", "BOOLEAN"),
        Column::new("FechaCreacion", "fecha_creacion", "TEXT"),
        Column::new("FechaModificacion", "fecha_modificacion", "TEXT"),
    ];

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_matches_serialized_shape() {
        let v = serde_json::to_value(Telefono::default()).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), Telefono::COLUMNS.len());
        assert!(obj.keys().all(|k| Telefono::has_field(k)));
    }

    #[test]
    fn contact_reference_is_a_bare_id() {
        let t: Telefono = serde_json::from_str(r#"{"Numero":"3001234567","ContactoId":4}"#).unwrap();
        assert_eq!(t.contacto_id, Some(RecordId::new(4)));
    }
}
