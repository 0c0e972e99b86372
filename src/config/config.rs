use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{API_URL_ENV, CONFIG_FILE, CONFIG_PATH_ENV, DEFAULT_API_URL, TOKEN_ENV};
use crate::error::{KanbanError, KanbanResult};
use crate::logging::log_error;
use crate::models::User;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub access_token: Option<String>,
    pub user: Option<User>,
    #[serde(default)]
    pub default_project_id: Option<u64>,
}

pub fn config_path() -> KanbanResult<PathBuf> {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }

    let home_dir = dirs::home_dir()
        .ok_or_else(|| KanbanError::ConfigError("Could not find home directory".to_string()))?;
    Ok(home_dir.join(CONFIG_FILE))
}

pub fn load_config() -> Config {
    match config_path() {
        Ok(path) => load_config_from(&path),
        Err(e) => {
            log_error(&format!("Falling back to default config: {}", e));
            Config::default()
        }
    }
}

/// Reads a config file, treating a missing or unreadable file as empty.
pub fn load_config_from(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }

    match fs::read_to_string(path) {
        Ok(config_str) => serde_json::from_str(&config_str).unwrap_or_else(|e| {
            log_error(&format!("Ignoring malformed config {}: {}", path.display(), e));
            Config::default()
        }),
        Err(e) => {
            log_error(&format!("Failed to read config {}: {}", path.display(), e));
            Config::default()
        }
    }
}

pub fn save_config(config: &Config) -> KanbanResult<()> {
    save_config_to(config, &config_path()?)
}

pub fn save_config_to(config: &Config, path: &Path) -> KanbanResult<()> {
    let config_str = serde_json::to_string_pretty(config)?;
    fs::write(path, config_str)?;
    Ok(())
}

pub fn get_api_url() -> String {
    if let Ok(url) = env::var(API_URL_ENV) {
        return url;
    }

    load_config()
        .api_url
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

pub fn get_access_token() -> KanbanResult<String> {
    // First check environment variable
    if let Ok(token) = env::var(TOKEN_ENV) {
        return Ok(token);
    }

    // Then check config file
    load_config()
        .access_token
        .ok_or(KanbanError::NotAuthenticated)
}
