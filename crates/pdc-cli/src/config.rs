//! Configuration file management for pdc.
//!
//! Provides a TOML-based config file at `~/.config/pdc/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use pdc_core::config::GeminiConfig;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub gemini: GeminiSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GeminiSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the pdc config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/pdc` or `~/.config/pdc`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("pdc");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("pdc")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// The file holds an API key, so it is made owner-only on Unix.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolution
// -----------------------------------------------------------------------

/// Resolve the generation service configuration.
///
/// - API key: `cli_api_key` > `GEMINI_API_KEY` > `API_KEY` > `gemini.api_key` > none
/// - Model: `PDC_GEMINI_MODEL` > `gemini.model` > [`GeminiConfig::DEFAULT_MODEL`]
/// - Base URL: `PDC_GEMINI_BASE_URL` > `gemini.base_url` > [`GeminiConfig::DEFAULT_BASE_URL`]
///
/// A missing key is not an error here; generation reports it per row.
pub fn resolve_gemini(cli_api_key: Option<&str>) -> Result<GeminiConfig> {
    let file = match load_config() {
        Ok(cfg) => cfg.gemini,
        Err(_) if !config_path().exists() => GeminiSection::default(),
        Err(e) => return Err(e),
    };

    let api_key = cli_api_key
        .filter(|k| !k.trim().is_empty())
        .map(str::to_owned)
        .or_else(GeminiConfig::env_api_key)
        .or(file.api_key);
    let model = GeminiConfig::env_model()
        .or(file.model)
        .unwrap_or_else(|| GeminiConfig::DEFAULT_MODEL.to_owned());
    let base_url = GeminiConfig::env_base_url()
        .or(file.base_url)
        .unwrap_or_else(|| GeminiConfig::DEFAULT_BASE_URL.to_owned());

    Ok(GeminiConfig::new(api_key)
        .with_model(model)
        .with_base_url(base_url))
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
