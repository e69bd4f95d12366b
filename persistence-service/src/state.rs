use crate::config::{BackendSettings, ConfigError};
use crate::error::ApiError;
use crate::models::storage::{
    MemoryBackend, PostgresBackend, StorageBackend, StorageError, SupabaseBackend,
};
use std::sync::Arc;
use tracing::info;

pub type Backend = Arc<dyn StorageBackend + Send + Sync>;

/// Shared handler state. A misconfigured store keeps the service up and fails each request.
#[derive(Clone)]
pub enum Store {
    Ready(Backend),
    Misconfigured(ConfigError),
}

impl Store {
    pub async fn connect(settings: Result<BackendSettings, ConfigError>) -> Result<Self, StorageError> {
        let backend: Backend = match settings {
            Ok(BackendSettings::Supabase { url, service_key }) => {
                info!("Using Supabase backend at {}", url);
                Arc::new(SupabaseBackend::new(&url, &service_key)?)
            }
            Ok(BackendSettings::Postgres { database_url }) => {
                info!("Using PostgreSQL backend");
                Arc::new(PostgresBackend::new(&database_url).await?)
            }
            Ok(BackendSettings::Memory) => {
                info!("Using in-memory backend");
                Arc::new(MemoryBackend::new())
            }
            Err(e) => return Ok(Store::Misconfigured(e)),
        };

        Ok(Store::Ready(backend))
    }

    pub fn backend(&self) -> Result<&Backend, ApiError> {
        match self {
            Store::Ready(backend) => Ok(backend),
            Store::Misconfigured(e) => Err(ApiError::Config(e.clone())),
        }
    }
}
