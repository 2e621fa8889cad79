use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::render::OutputMode;
use crate::shortcuts::Shortcut;

pub const CONFIG_FILE_NAME: &str = ".sqlsh_config.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    #[default]
    Postgres,
    #[serde(alias = "mariadb")]
    MySql,
    Sqlite,
}

impl Driver {
    pub fn default_port(self) -> u16 {
        match self {
            Self::Postgres => 5432,
            Self::MySql => 3306,
            Self::Sqlite => 0,
        }
    }
}

/// Connection settings plus client preferences, read from a JSON file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub driver: Driver,
    pub hostname: String,
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
    /// Database name, or the file path for SQLite.
    pub database: String,
    /// Full connection url. Takes precedence over the fields above.
    pub url: Option<String>,
    pub format: Option<OutputMode>,
    /// Appended after the built-in shortcuts.
    pub shortcuts: Vec<Shortcut>,
}

impl Configuration {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("cannot parse {}: {e}", path.display())))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), driver = ?config.driver, "configuration loaded");
        Ok(config)
    }

    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("could not find home directory".to_string()))?;
        Ok(home.join(CONFIG_FILE_NAME))
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.driver.default_port())
    }

    fn validate(&self) -> Result<()> {
        if self.shortcuts.iter().any(|sc| sc.name.trim().is_empty()) {
            return Err(Error::Config("shortcut `name` must not be empty".to_string()));
        }
        if self.url.is_some() {
            return Ok(());
        }
        if self.database.is_empty() {
            return Err(Error::Config("`database` is required".to_string()));
        }
        if self.driver != Driver::Sqlite && self.hostname.is_empty() {
            return Err(Error::Config("`hostname` is required".to_string()));
        }
        Ok(())
    }
}
