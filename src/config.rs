//! Application configuration.
//!
//! Loaded from a TOML file (every section defaults sensibly, so a missing or
//! empty file is valid) with one environment override: `MEDIA_ALLOWED_PATHS`,
//! a comma-separated list of base directories that replaces the configured
//! allow-list entirely when set non-empty.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the media allow-list.
pub const MEDIA_ALLOWED_PATHS_ENV: &str = "MEDIA_ALLOWED_PATHS";

/// Built-in allow-list used when neither config nor environment supplies one.
pub const DEFAULT_ALLOWED_PATHS: &[&str] =
    &["/media", "/mnt/media", "/data/media", "/storage/media"];

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub media: MediaConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            db_path: PathBuf::from("./data/chanstream.db"),
        }
    }
}

/// Local media serving settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Base directories from which local files may be served.
    /// Empty means the built-in defaults apply.
    pub allowed_paths: Vec<String>,
}

impl MediaConfig {
    /// Apply the `MEDIA_ALLOWED_PATHS` override, if set.
    ///
    /// A value with at least one non-empty entry replaces the configured
    /// list entirely; an unset or blank value leaves it untouched.
    pub fn apply_env(&mut self) {
        let Ok(raw) = std::env::var(MEDIA_ALLOWED_PATHS_ENV) else {
            return;
        };

        let paths: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        if !paths.is_empty() {
            self.allowed_paths = paths;
        }
    }
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config.media.apply_env();
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return the default config.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./chanstream.toml",
        "~/.config/chanstream/config.toml",
        "/etc/chanstream/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // No file found; defaults plus environment override.
    let mut config = Config::default();
    config.media.apply_env();
    Ok(config)
}

/// Validate configuration.
fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    // Nonexistent allowed paths are legal (volumes mounted later), but worth
    // surfacing at startup.
    for path in &config.media.allowed_paths {
        if !Path::new(path.trim()).exists() {
            tracing::warn!("Allowed media path does not exist yet: {}", path.trim());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert!(config.media.allowed_paths.is_empty());
    }

    #[test]
    fn parse_partial_toml() {
        let config: Config = toml::from_str("[server]\nport = 9090\n").unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(config.media.allowed_paths.is_empty());
    }

    #[test]
    fn parse_media_section() {
        let config: Config = toml::from_str(
            "[media]\nallowed_paths = [\"/srv/media\", \"/mnt/nas\"]\n",
        )
        .unwrap();
        assert_eq!(config.media.allowed_paths, vec!["/srv/media", "/mnt/nas"]);
    }

    #[test]
    fn zero_port_rejected() {
        let config: Config = toml::from_str("[server]\nport = 0\n").unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn load_missing_file_fails() {
        assert!(load_config(Path::new("/nonexistent/chanstream.toml")).is_err());
    }
}
