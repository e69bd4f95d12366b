use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub catalog_base_url: String,
    pub covers_base_url: String,
    pub trending_user: String,
    pub default_subject: String,
    /// Whether pages carry the charting library; without it no subject chart is built.
    pub chart_enabled: bool,
}

impl Config {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: try_load(&lookup, "PORT", 7003),
            catalog_base_url: try_load(&lookup, "CATALOG_BASE_URL", "https://openlibrary.org".to_string()),
            covers_base_url: try_load(
                &lookup,
                "COVERS_BASE_URL",
                "https://covers.openlibrary.org".to_string(),
            ),
            trending_user: try_load(&lookup, "TRENDING_USER", "mekBot".to_string()),
            default_subject: try_load(&lookup, "DEFAULT_SUBJECT", "history".to_string()),
            chart_enabled: try_load(&lookup, "CHART_ENABLED", true),
        }
    }
}

fn try_load<T: FromStr + Display>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T
where
    T::Err: Display,
{
    match lookup(key).filter(|raw| !raw.trim().is_empty()) {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.port, 7003);
        assert_eq!(config.catalog_base_url, "https://openlibrary.org");
        assert_eq!(config.trending_user, "mekBot");
        assert_eq!(config.default_subject, "history");
        assert!(config.chart_enabled);
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let config = Config::from_lookup(|key| match key {
            "CHART_ENABLED" => Some("false".to_string()),
            "PORT" => Some("eighty".to_string()),
            "DEFAULT_SUBJECT" => Some(" fantasy ".to_string()),
            _ => None,
        });
        assert!(!config.chart_enabled);
        assert_eq!(config.port, 7003);
        assert_eq!(config.default_subject, "fantasy");
    }
}
