use serde::{Deserialize, Serialize};

use agenda_core::{Audit, Column, Entity, RecordId};

/// An email address, optionally attached to a contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Correo {
    pub id: RecordId,
    pub direccion: String,
    pub contacto_id: Option<RecordId>,
    pub activo: bool,
    #[serde(flatten)]
    pub audit: Audit,
}

impl Entity for Correo {
    const RESOURCE: &'static str = "correo";
    const TABLE: &'static str = "correo";
    const COLUMNS: &'static [Column] = &[
        Column::new("Id", "id", "BIGINT"),
        Column::new("Direccion", "direccion", "TEXT"),
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
