use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TxnError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_db_path")]
    pub db_path: String,
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            log_file: None,
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("txnproc")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_db_path() -> String {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("txnproc")
        .join("txnproc.db")
        .to_string_lossy()
        .to_string()
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

/// Missing or unreadable files fall back to defaults.
pub fn load_settings_from(path: &Path) -> Settings {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_default()
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(&settings_path(), settings)
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| TxnError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }
    PathBuf::from(path)
}

/// `--db` wins over the settings file.
pub fn resolve_db_path(cli_db: Option<&str>, settings: &Settings) -> PathBuf {
    expand_path(cli_db.unwrap_or(&settings.db_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            db_path: "/tmp/test.db".to_string(),
            log_file: Some("/tmp/txnproc.log".to_string()),
        };
        save_settings_to(&path, &settings).unwrap();
        let loaded = load_settings_from(&path);
        assert_eq!(loaded.db_path, "/tmp/test.db");
        assert_eq!(loaded.log_file.as_deref(), Some("/tmp/txnproc.log"));
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings_from(&dir.path().join("nope.json"));
        assert!(s.db_path.ends_with("txnproc.db"));
        assert!(s.log_file.is_none());
    }

    #[test]
    fn test_load_returns_defaults_when_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(load_settings_from(&path).db_path.ends_with("txnproc.db"));
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let s: Settings = serde_json::from_str(r#"{"log_file": "/tmp/x.log"}"#).unwrap();
        assert!(s.db_path.ends_with("txnproc.db"));
        assert_eq!(s.log_file.as_deref(), Some("/tmp/x.log"));
    }

    #[test]
    fn test_resolve_db_path_prefers_cli() {
        let settings = Settings {
            db_path: "/from/settings.db".to_string(),
            log_file: None,
        };
        assert_eq!(resolve_db_path(Some("/cli.db"), &settings), PathBuf::from("/cli.db"));
        assert_eq!(resolve_db_path(None, &settings), PathBuf::from("/from/settings.db"));
    }

    #[test]
    fn test_expand_path_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/data/t.db"), home.join("data/t.db"));
        }
        assert_eq!(expand_path("rel/t.db"), PathBuf::from("rel/t.db"));
    }
}
