//! Persisted user defaults
//!
//! A JSON key-value store at `~/.laravel-installer/config.json`. Created
//! lazily on first write. No locking: this is a single-user CLI and the last
//! writer wins.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// The per-user store under the home directory.
    pub fn from_home() -> Result<Self> {
        let home = dirs::home_dir().context("Could not determine the home directory")?;
        Ok(Self::at(home.join(".laravel-installer").join("config.json")))
    }

    /// A store at an explicit path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// All persisted values; an absent file reads as empty.
    pub fn all(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.all().ok()?.get(key).cloned()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key)?.as_str().map(str::to_string)
    }

    /// Read-modify-write a single key.
    pub fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut config = self.all()?;
        config.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(&Value::Object(config))?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    /// Remove the store entirely.
    pub fn flush(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("Failed to delete {}", self.path.display()))?;
        }
        Ok(())
    }
}

/// The persisted default option values read at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Defaults {
    pub git: bool,
    pub branch: Option<String>,
    pub organization: Option<String>,
    pub starter_kit: Option<String>,
    pub pest: bool,
    pub force: bool,
    pub database: Option<String>,
    pub package_manager: Option<String>,
}

impl Defaults {
    /// A corrupt or hand-edited store never blocks startup; it just reads as
    /// no saved defaults.
    pub fn load(store: &ConfigStore) -> Self {
        store
            .all()
            .ok()
            .and_then(|config| serde_json::from_value(Value::Object(config)).ok())
            .unwrap_or_default()
    }
}
