use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use agenda_core::Entity;
use agenda_directory::{Contacto, Correo, Telefono};
use agenda_infra::{AppConfig, InMemoryResourceStore, PostgresResourceStore, ResourceStore};

/// One store per resource, shared by every request.
#[derive(Clone)]
pub struct AppServices {
    pub contactos: Arc<dyn ResourceStore<Contacto>>,
    pub telefonos: Arc<dyn ResourceStore<Telefono>>,
    pub correos: Arc<dyn ResourceStore<Correo>>,
}

impl AppServices {
    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        Self {
            contactos: Arc::new(InMemoryResourceStore::<Contacto>::new()),
            telefonos: Arc::new(InMemoryResourceStore::<Telefono>::new()),
            correos: Arc::new(InMemoryResourceStore::<Correo>::new()),
        }
    }

    /// Postgres wiring: one pool shared by the three tables, created if missing.
    pub async fn postgres(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("failed to connect to Postgres")?;

        Ok(Self {
            contactos: Arc::new(postgres_store::<Contacto>(&pool).await?),
            telefonos: Arc::new(postgres_store::<Telefono>(&pool).await?),
            correos: Arc::new(postgres_store::<Correo>(&pool).await?),
        })
    }
}

async fn postgres_store<E: Entity>(pool: &sqlx::PgPool) -> anyhow::Result<PostgresResourceStore<E>> {
    let store = PostgresResourceStore::<E>::new(pool.clone());
    store
        .ensure_schema()
        .await
        .with_context(|| format!("failed to prepare table {}", E::TABLE))?;
    Ok(store)
}

/// Pick the backend from configuration: Postgres when `DATABASE_URL` is set.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match &config.database_url {
        Some(url) => {
            tracing::info!(max_connections = config.db_max_connections, "using Postgres stores");
            AppServices::postgres(url, config.db_max_connections).await
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory stores");
            Ok(AppServices::in_memory())
        }
    }
}
