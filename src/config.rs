use crate::github::{ApiError, ClientConfig, DEFAULT_API_BASE};
use crate::theme::{Theme, ThemeParseError};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub user_agent: String,
    /// Unset keeps the HTTP client's own default.
    pub timeout_secs: Option<u64>,
    pub log_level: String,
    pub default_theme: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            user_agent: format!("ghfolio/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: None,
            log_level: "info".to_string(),
            default_theme: Theme::default().name().to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid api_base_url: {0}")]
    BaseUrl(#[from] ApiError),
    #[error("invalid default_theme: {0}")]
    Theme(#[from] ThemeParseError),
}

impl AppConfig {
    /// Defaults, then `path` if given, then `GHFOLIO_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, AppConfigError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("api_base_url", defaults.api_base_url.clone())?
            .set_default("user_agent", defaults.user_agent.clone())?
            .set_default("log_level", defaults.log_level.clone())?
            .set_default("default_theme", defaults.default_theme.clone())?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("GHFOLIO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let built = builder.build()?;
        Ok(built.try_deserialize::<AppConfig>()?)
    }

    pub fn client_config(&self) -> Result<ClientConfig, AppConfigError> {
        let mut config =
            ClientConfig::try_from_url(&self.api_base_url)?.with_user_agent(self.user_agent.clone());
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn theme(&self) -> Result<Theme, AppConfigError> {
        Ok(self.default_theme.parse()?)
    }
}
