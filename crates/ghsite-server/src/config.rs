use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level application configuration, read from `ghsite.toml`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub listing: ListingConfig,
}

/// The repository served at `/`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub repo: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// `Cache-Control: max-age` for rendered pages, in seconds.
    #[serde(default = "default_page_max_age")]
    pub page_max_age: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            page_max_age: default_page_max_age(),
        }
    }
}

/// GitHub endpoints. Unset fields use the public github.com hosts.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GitHubConfig {
    pub api_base_url: Option<String>,
    pub raw_base_url: Option<String>,
    pub git_base_url: Option<String>,
    /// Normally supplied through `GITHUB_TOKEN` instead.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ListingConfig {
    /// Render each article's body under its link in directory listings.
    #[serde(default)]
    pub excerpts: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("site.owner and site.repo must both be set")]
    MissingSite,
    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(&'static str, String),
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    8080
}

fn default_page_max_age() -> u64 {
    60
}

impl AppConfig {
    /// Apply `GITHUB_TOKEN`, `GHSITE_HOST` and `GHSITE_PORT` on top of
    /// the file values.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(token) = var("GITHUB_TOKEN").filter(|t| !t.is_empty()) {
            self.github.token = Some(token);
        }
        if let Some(host) = var("GHSITE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("GHSITE_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue("GHSITE_PORT", port))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.owner.trim().is_empty() || self.site.repo.trim().is_empty() {
            return Err(ConfigError::MissingSite);
        }
        Ok(())
    }
}

/// Load config from file, falling back to defaults if missing or invalid.
pub fn load_config(path: &Path) -> AppConfig {
    let Ok(contents) = std::fs::read_to_string(path) else {
        tracing::info!("no config at {}, using defaults", path.display());
        return AppConfig::default();
    };

    match toml::from_str::<AppConfig>(&contents) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(
                "failed to parse config at {}, using defaults: {e}",
                path.display()
            );
            AppConfig::default()
        }
    }
}
