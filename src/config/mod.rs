pub mod settings;

pub use settings::{Config, ConfigError};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Failed to get config directory")?
        .join("tavily-tools");

    Ok(config_dir.join("config.toml"))
}

/// Load configuration: defaults, then the optional config file, then `.env`
/// and the process environment.
///
/// The config file is never created implicitly.
pub fn load() -> Result<Config> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env file"),
        Err(e) if e.not_found() => tracing::debug!("no .env file found"),
        Err(e) => return Err(e).context("Failed to read .env file"),
    }

    let mut config = match config_path() {
        Ok(path) if path.exists() => load_file(&path)?,
        _ => Config::default(),
    };
    config.apply_env(|key| std::env::var(key).ok());
    Ok(config)
}

/// Load a TOML config file. Missing keys take their defaults.
pub fn load_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}
