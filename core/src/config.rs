use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

pub const SERVICE_PATH: &str = "/gestao-tarefas";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const API_URL_ENV: &str = "TASKDESK_API_URL";

const CONFIG_DIR_NAME: &str = ".taskdesk";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Resolves the base URL: explicit override, then `config.json` in `base_dir`
    /// (default `~/.taskdesk`), then `DEFAULT_BASE_URL`.
    pub fn load(base_dir: Option<PathBuf>, override_url: Option<&str>) -> Result<Self> {
        if let Some(url) = override_url.map(str::trim).filter(|u| !u.is_empty()) {
            return Ok(Self::new(url));
        }

        let path = config_dir(base_dir)?.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ClientConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(Self::new(&config.base_url))
    }
}

/// Directory for the config file and the TUI log. Created on demand.
pub fn config_dir(base_dir: Option<PathBuf>) -> Result<PathBuf> {
    let path = match base_dir {
        Some(dir) => dir,
        None => {
            let home_dir = dirs::home_dir()
                .ok_or_else(|| anyhow!("Could not determine home directory"))?;
            home_dir.join(CONFIG_DIR_NAME)
        }
    };
    fs::create_dir_all(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{"base_url": "http://file:1"}"#).unwrap();

        let config =
            ClientConfig::load(Some(dir.path().to_path_buf()), Some("http://flag:2/")).unwrap();
        assert_eq!(config.base_url, "http://flag:2");
    }

    #[test]
    fn test_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{"base_url": "http://file:1/api/"}"#,
        )
        .unwrap();

        let config = ClientConfig::load(Some(dir.path().to_path_buf()), None).unwrap();
        assert_eq!(config.base_url, "http://file:1/api");
    }

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load(Some(dir.path().to_path_buf()), Some("  ")).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "not json").unwrap();
        assert!(ClientConfig::load(Some(dir.path().to_path_buf()), None).is_err());
    }
}
