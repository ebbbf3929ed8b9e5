use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Remote prediction API settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    /// Base URL of a running cardiorisk-api
    #[serde(default)]
    pub url: Option<String>,

    /// Model name sent with remote requests
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Default output format (table or json)
    #[serde(default)]
    pub format: Option<String>,
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self, String> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), String> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(&config_path, content).map_err(|e| format!("Failed to write config file: {}", e))
    }

    /// Get the config file path
    pub fn get_config_path() -> Result<PathBuf, String> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| "Could not determine config directory".to_string())?;

        Ok(config_dir.join("cardiorisk").join("config.toml"))
    }

    /// Merge with environment variables (env vars take precedence)
    pub fn merge_with_env(self) -> Self {
        self.merge_with(|key| std::env::var(key).ok())
    }

    fn merge_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CARDIORISK_API_URL") {
            self.api.url = Some(url);
        }

        if let Some(model) = lookup("CARDIORISK_MODEL") {
            self.api.model = Some(model);
        }

        self
    }

    /// Set a configuration value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "api.url" => {
                self.api.url = Some(value.trim_end_matches('/').to_string());
            }
            "api.model" => {
                self.api.model = Some(value.to_string());
            }
            "output.format" => match value.trim().to_ascii_lowercase().as_str() {
                format @ ("table" | "json") => self.output.format = Some(format.to_string()),
                _ => return Err("output.format must be table or json".to_string()),
            },
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }

    /// Get a configuration value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "api.url" => self.api.url.clone(),
            "api.model" => self.api.model.clone(),
            "output.format" => self.output.format.clone(),
            _ => None,
        }
    }
}
