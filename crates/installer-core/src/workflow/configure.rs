//! The `configure` workflow: persist default options for future `new` runs

use crate::config_store::ConfigStore;
use anyhow::Result;
use serde_json::json;

/// Raw flags for the `configure` command.
#[derive(Debug, Clone, Default)]
pub struct ConfigureInput {
    pub git: bool,
    pub branch: Option<String>,
    pub organization: Option<String>,
    pub starter_kit: Option<String>,
    pub pest: bool,
    pub force: bool,
    pub database: Option<String>,
    pub package_manager: Option<String>,
    pub reset: bool,
}

pub fn run(store: &ConfigStore, input: &ConfigureInput) -> Result<i32> {
    if input.reset {
        store.flush()?;
        cliclack::log::success("Cleared your saved defaults")?;
        return Ok(0);
    }

    store.set("git", json!(input.git))?;
    store.set("branch", json!(input.branch))?;
    store.set("organization", json!(input.organization))?;
    store.set("starter-kit", json!(input.starter_kit))?;
    store.set("pest", json!(input.pest))?;
    store.set("force", json!(input.force))?;
    store.set("database", json!(input.database))?;
    store.set("package-manager", json!(input.package_manager))?;

    cliclack::log::success("Saved your defaults for the laravel new command")?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_store::Defaults;

    #[test]
    fn saved_defaults_round_trip_through_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::at(dir.path().join("config.json"));

        let input = ConfigureInput {
            git: true,
            branch: Some("trunk".to_string()),
            pest: true,
            database: Some("pgsql".to_string()),
            ..ConfigureInput::default()
        };
        assert_eq!(run(&store, &input).unwrap(), 0);

        let defaults = Defaults::load(&store);
        assert!(defaults.git);
        assert_eq!(defaults.branch.as_deref(), Some("trunk"));
        assert!(defaults.pest);
        assert_eq!(defaults.database.as_deref(), Some("pgsql"));
    }

    #[test]
    fn reset_flushes_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::at(dir.path().join("config.json"));
        store.set("git", json!(true)).unwrap();

        let input = ConfigureInput {
            reset: true,
            ..ConfigureInput::default()
        };
        assert_eq!(run(&store, &input).unwrap(), 0);
        assert!(!store.path().exists());
    }
}
