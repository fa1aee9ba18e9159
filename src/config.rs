//! Configuration: API base URL resolution
//!
//! Priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable `DFCHECK_API_URL`
//! 3. TOML config file (`~/.config/dfcheck/config.toml`, key `api_url`)
//! 4. Compiled default (fallback)

use serde::Deserialize;
use std::path::PathBuf;

/// Fallback when no source supplies a base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

const ENV_API_URL: &str = "DFCHECK_API_URL";

/// Optional TOML config file contents
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub api_url: Option<String>,
}

/// Resolved client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the detection service, no trailing slash
    pub api_url: String,
}

impl Config {
    /// Resolve the base URL following the priority order above
    pub fn resolve(cli_arg: Option<&str>) -> Self {
        let api_url = cli_arg
            .map(str::to_owned)
            .or_else(|| std::env::var(ENV_API_URL).ok())
            .or_else(|| load_toml_config().and_then(|c| c.api_url))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self {
            api_url: normalize_api_url(&api_url),
        }
    }

    /// Build a config directly from a known base URL (used by tests)
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_api_url(&api_url.into()),
        }
    }
}

/// Endpoint paths are joined with a leading slash, so the base must not
/// carry a trailing one
fn normalize_api_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("dfcheck").join("config.toml"))
}

fn load_toml_config() -> Option<TomlConfig> {
    let path = config_file_path()?;
    let content = std::fs::read_to_string(&path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Ignoring unparseable config file"
            );
            None
        }
    }
}
