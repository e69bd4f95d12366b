use std::{env, fmt::Display, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing SUPABASE_URL or SUPABASE_SERVICE_ROLE_KEY in environment variables.")]
    MissingSupabase,
    #[error("Missing DATABASE_URL in environment variables.")]
    MissingDatabaseUrl,
    #[error("Unknown BACKEND_TYPE '{0}'. Use supabase, postgres or memory.")]
    UnknownBackend(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendSettings {
    Supabase { url: String, service_key: String },
    Postgres { database_url: String },
    Memory,
}

pub struct Config {
    pub port: u16,
    /// Resolved lazily into a backend; a missing value is reported by every endpoint.
    pub backend: Result<BackendSettings, ConfigError>,
}

impl Config {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: try_load(&lookup, "PORT", 7002),
            backend: backend_settings(&lookup),
        }
    }
}

fn backend_settings(
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<BackendSettings, ConfigError> {
    let backend_type = non_empty(lookup, "BACKEND_TYPE").unwrap_or_else(|| "supabase".to_string());

    match backend_type.to_lowercase().as_str() {
        "supabase" => match (
            non_empty(lookup, "SUPABASE_URL"),
            non_empty(lookup, "SUPABASE_SERVICE_ROLE_KEY"),
        ) {
            (Some(url), Some(service_key)) => Ok(BackendSettings::Supabase { url, service_key }),
            _ => Err(ConfigError::MissingSupabase),
        },
        "postgres" | "postgresql" => non_empty(lookup, "DATABASE_URL")
            .map(|database_url| BackendSettings::Postgres { database_url })
            .ok_or(ConfigError::MissingDatabaseUrl),
        "memory" => Ok(BackendSettings::Memory),
        other => Err(ConfigError::UnknownBackend(other.to_string())),
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn try_load<T: FromStr + Display>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T
where
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value '{raw}': {e}, using default: {default}");
            default
        }),
        None => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}
