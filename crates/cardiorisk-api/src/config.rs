use std::env;

pub const DEFAULT_MODEL_ID: &str = "random_forest_tuned";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,cardiorisk_api=debug";

/// Settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub model_id: String,
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            model_id: DEFAULT_MODEL_ID.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unparsable or blank values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            port: non_blank("PORT")
                .and_then(|raw| raw.trim().parse::<u16>().ok())
                .unwrap_or(defaults.port),
            model_id: non_blank("CARDIORISK_MODEL_ID")
                .map(|raw| raw.trim().to_string())
                .unwrap_or(defaults.model_id),
            log_filter: non_blank("RUST_LOG").unwrap_or(defaults.log_filter),
        }
    }
}
