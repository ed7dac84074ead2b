use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, TallyError};
use crate::models::SortKey;

/// Environment variable naming a database file that overrides the
/// configured data directory.
pub const DB_ENV: &str = "TALLY_DB";

pub const DB_FILE: &str = "tally.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default, deserialize_with = "lenient_sort_key")]
    pub default_sort: SortKey,
}

// An unrecognized sort name falls back to storage order instead of failing
// the whole file, which would also discard `data_dir`.
fn lenient_sort_key<'de, D>(deserializer: D) -> std::result::Result<SortKey, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let value = match value {
        serde_json::Value::String(name) => serde_json::Value::String(name.trim().to_lowercase()),
        other => other,
    };
    Ok(serde_json::from_value(value).unwrap_or_default())
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            default_sort: SortKey::default(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("tally")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("tally")
}

fn read_settings(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

fn write_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| TallyError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn load_settings() -> Settings {
    read_settings(&settings_path())
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    write_settings(&settings_path(), settings)
}

pub fn get_data_dir() -> PathBuf {
    PathBuf::from(&load_settings().data_dir)
}

fn resolve_db_path_from(env_value: Option<String>, data_dir: &Path) -> Result<PathBuf> {
    match env_value {
        Some(value) if value.trim().is_empty() => {
            Err(TallyError::Validation(format!("{DB_ENV} is set but empty")))
        }
        Some(value) => Ok(PathBuf::from(shellexpand_path(&value))),
        None => Ok(data_dir.join(DB_FILE)),
    }
}

/// Database file to operate on: `$TALLY_DB` when set, otherwise
/// `<data_dir>/tally.db`.
pub fn resolve_db_path() -> Result<PathBuf> {
    resolve_db_path_from(std::env::var(DB_ENV).ok(), &get_data_dir())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}
