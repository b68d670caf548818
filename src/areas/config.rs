//! Key/value configuration files
//!
//! Two scopes share one TOML layout (`[user]\nname = "..."`):
//! - **Repository**: `.twig/config`
//! - **Global**: `$TWIG_CONFIG_GLOBAL` if set, otherwise `~/.twigconfig`
//!
//! A missing file reads as an empty configuration.

use crate::artifacts::config::config_key::ConfigKey;
use crate::errors::{Error, IoResultExt, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const GLOBAL_CONFIG_ENV: &str = "TWIG_CONFIG_GLOBAL";
const GLOBAL_CONFIG_FILE: &str = ".twigconfig";

type Sections = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigScope {
    #[default]
    Repository,
    Global,
}

#[derive(Debug, Clone)]
pub struct Config {
    path: Box<Path>,
    sections: Sections,
}

impl Config {
    pub fn load(path: Box<Path>) -> Result<Self> {
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(Error::io(&path, err)),
        };

        let sections = toml::from_str::<Sections>(&contents).map_err(|err| {
            Error::Format(format!("cannot parse config {}: {err}", path.display()))
        })?;

        Ok(Config { path, sections })
    }

    /// Location of the global configuration file
    pub fn global_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(GLOBAL_CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }

        dirs::home_dir()
            .map(|home| home.join(GLOBAL_CONFIG_FILE))
            .ok_or_else(|| Error::NotFound("home directory not found".into()))
    }

    pub fn load_global() -> Result<Self> {
        Self::load(Self::global_path()?.into_boxed_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &ConfigKey) -> Option<&str> {
        self.sections
            .get(key.section())
            .and_then(|section| section.get(key.name()))
            .map(String::as_str)
    }

    pub fn set(&mut self, key: &ConfigKey, value: impl Into<String>) {
        self.sections
            .entry(key.section().to_string())
            .or_default()
            .insert(key.name().to_string(), value.into());
    }

    /// Remove `key`; returns whether it was set
    pub fn unset(&mut self, key: &ConfigKey) -> bool {
        let Some(section) = self.sections.get_mut(key.section()) else {
            return false;
        };

        let removed = section.remove(key.name()).is_some();
        if section.is_empty() {
            self.sections.remove(key.section());
        }

        removed
    }

    /// `(section.key, value)` pairs in sorted order
    pub fn entries(&self) -> Vec<(String, String)> {
        self.sections
            .iter()
            .flat_map(|(section, keys)| {
                keys.iter()
                    .map(move |(key, value)| (format!("{section}.{key}"), value.clone()))
            })
            .collect()
    }

    /// Write atomically through a temp file next to the target
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).at_path(parent)?;
        }

        let contents = toml::to_string_pretty(&self.sections)
            .map_err(|err| Error::Format(format!("cannot encode config: {err}")))?;

        let mut temp_path = self.path.as_os_str().to_owned();
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);

        std::fs::write(&temp_path, contents).at_path(&temp_path)?;
        std::fs::rename(&temp_path, &self.path).at_path(&self.path)?;

        tracing::debug!(path = %self.path.display(), "saved config");
        Ok(())
    }
}
