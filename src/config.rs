use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File};
use log::debug;
use serde::{Deserialize, Serialize};

/// Settings file read by [`Settings::load`]
pub const DEFAULT_CONFIG_FILE: &str = "config.json";
/// Prefix of environment overrides, e.g. `NEWSDESK_DATABASE__PATH`
pub const ENV_PREFIX: &str = "NEWSDESK";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite database file
    pub path: PathBuf,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/newsdesk.db"),
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

impl Settings {
    /// Loads `config.json` when present, then `NEWSDESK_*` environment overrides
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        Self::build(path, environment())
    }

    fn build(path: &Path, environment: Environment) -> Result<Self> {
        let settings: Self = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(environment)
            .build()
            .with_context(|| format!("Failed to load settings from {}", path.display()))?
            .try_deserialize()
            .with_context(|| format!("Invalid settings in {}", path.display()))?;

        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn env_from(vars: &[(&str, &str)]) -> Environment {
        let mut source = ::config::Map::new();
        for (key, value) in vars {
            source.insert(key.to_string(), value.to_string());
        }
        environment().source(Some(source))
    }

    #[test]
    fn test_reads_settings_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "database": { "path": "/var/lib/newsdesk/news.db" } }"#)?;

        let settings = Settings::build(&path, env_from(&[]))?;
        assert_eq!(settings.database.path, PathBuf::from("/var/lib/newsdesk/news.db"));
        Ok(())
    }

    #[test]
    fn test_missing_file_uses_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let settings = Settings::build(&dir.path().join("absent.json"), env_from(&[]))?;
        assert_eq!(settings, Settings::default());
        Ok(())
    }

    #[test]
    fn test_empty_object_fills_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");
        fs::write(&path, "{}")?;

        assert_eq!(Settings::build(&path, env_from(&[]))?, Settings::default());
        Ok(())
    }

    #[test]
    fn test_environment_overrides_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "database": { "path": "from-file.db" } }"#)?;

        let settings = Settings::build(
            &path,
            env_from(&[("NEWSDESK_DATABASE__PATH", "/tmp/from-env.db"), ("OTHER_VAR", "x")]),
        )?;
        assert_eq!(settings.database.path, PathBuf::from("/tmp/from-env.db"));
        Ok(())
    }

    #[test]
    fn test_malformed_file_is_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");
        fs::write(&path, "not json")?;

        assert!(Settings::build(&path, env_from(&[])).is_err());
        Ok(())
    }
}
