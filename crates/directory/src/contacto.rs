use serde::{Deserialize, Serialize};

use agenda_core::{Audit, Column, Entity, RecordId};

/// A contact record.
///
/// Every business field is optional on input so partial bodies decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Contacto {
    pub id: RecordId,
    pub nombres: String,
    pub apellidos: String,
    pub alias: Option<String>,
    pub activo: bool,
    #[serde(flatten)]
    pub audit: Audit,
}

impl Entity for Contacto {
    const RESOURCE: &'static str = "contacto";
    const TABLE: &'static str = "contacto";
    const COLUMNS: &'static [Column] = &[
        Column::new("Id", "id", "BIGINT"),
        Column::new("Nombres", "nombres", "TEXT"),
        Column::new("Apellidos", "apellidos", "TEXT"),
        Column::new("Alias", "alias", "TEXT"),
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
    fn partial_body_decodes_with_defaults() {
        let c: Contacto = serde_json::from_str(r#"{"Nombres":"Ana"}"#).unwrap();
        assert_eq!(c.nombres, "Ana");
        assert_eq!(c.id, RecordId::UNASSIGNED);
        assert!(c.audit.fecha_creacion.is_empty());
    }

    #[test]
    fn serializes_with_flat_pascal_case_fields() {
        let mut c = Contacto {
            id: RecordId::new(3),
            nombres: "Ana".into(),
            ..Contacto::default()
        };
        c.audit.stamp_created("t0");

        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["Id"], 3);
        assert_eq!(v["Nombres"], "Ana");
        assert_eq!(v["FechaCreacion"], "t0");
        assert_eq!(v["FechaModificacion"], "t0");
        assert!(v.get("Audit").is_none());
    }

    #[test]
    fn schema_starts_with_id_and_covers_every_serialized_field() {
        assert_eq!(Contacto::COLUMNS[0].field, agenda_core::ID_FIELD);
        let v = serde_json::to_value(Contacto::default()).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), Contacto::COLUMNS.len());
        for key in obj.keys() {
            assert!(Contacto::has_field(key), "missing column for {key}");
        }
    }
}
