use crate::areas::config::ConfigScope;
use crate::areas::repository::Repository;
use crate::artifacts::config::config_key::ConfigKey;
use crate::errors::Error;
use anyhow::Context;

impl Repository {
    /// Print the value of `key`
    ///
    /// Without an explicit scope the repository value wins over the global one.
    pub fn config_get(&self, key: &str, scope: Option<ConfigScope>) -> anyhow::Result<String> {
        let key = ConfigKey::try_parse(key)?;

        let value = match scope {
            Some(scope) => self
                .load_config(scope)?
                .get(&key)
                .map(str::to_string),
            None => self.config_value(&key)?,
        }
        .ok_or_else(|| Error::NotFound(format!("config key '{key}' is not set")))?;

        writeln!(self.writer(), "{value}")?;

        Ok(value)
    }

    pub fn config_set(&self, key: &str, value: &str, scope: ConfigScope) -> anyhow::Result<()> {
        let key = ConfigKey::try_parse(key)?;

        let mut config = self.load_config(scope)?;
        config.set(&key, value);
        config
            .save()
            .with_context(|| format!("Unable to write {}", config.path().display()))?;

        Ok(())
    }

    /// Remove every key in `keys`; keys that were not set are skipped
    pub fn config_unset(&self, keys: &[String], scope: ConfigScope) -> anyhow::Result<()> {
        let keys = keys
            .iter()
            .map(|key| ConfigKey::try_parse(key))
            .collect::<Result<Vec<_>, _>>()?;

        let mut config = self.load_config(scope)?;
        for key in &keys {
            if !config.unset(key) {
                tracing::debug!(%key, "config key was not set");
            }
        }
        config
            .save()
            .with_context(|| format!("Unable to write {}", config.path().display()))?;

        Ok(())
    }

    pub fn config_list(&self, scope: ConfigScope) -> anyhow::Result<Vec<(String, String)>> {
        let config = self.load_config(scope)?;

        let entries = config.entries();
        for (key, value) in &entries {
            writeln!(self.writer(), "{key}={value}")?;
        }

        Ok(entries)
    }
}
