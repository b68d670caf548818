use crate::errors::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigKey {
    UserName,
    UserEmail,
    CoreEditor,
    InitDefaultBranch,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::UserName,
        ConfigKey::UserEmail,
        ConfigKey::CoreEditor,
        ConfigKey::InitDefaultBranch,
    ];

    pub fn try_parse(key: &str) -> Result<Self> {
        let (section, name) = key.split_once('.').ok_or_else(|| {
            Error::Validation(format!("key does not contain a section: {key}"))
        })?;

        Self::ALL
            .into_iter()
            .find(|candidate| candidate.section() == section && candidate.name() == name)
            .ok_or_else(|| {
                if Self::ALL.iter().any(|candidate| candidate.section() == section) {
                    Error::Validation(format!("unknown key '{name}' in section '{section}'"))
                } else {
                    Error::Validation(format!("unknown config section '{section}'"))
                }
            })
    }

    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::UserName | ConfigKey::UserEmail => "user",
            ConfigKey::CoreEditor => "core",
            ConfigKey::InitDefaultBranch => "init",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::UserName => "name",
            ConfigKey::UserEmail => "email",
            ConfigKey::CoreEditor => "editor",
            ConfigKey::InitDefaultBranch => "defaultBranch",
        }
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.section(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_key_from_its_display_form() {
        for key in ConfigKey::ALL {
            assert_eq!(ConfigKey::try_parse(&key.to_string()).unwrap(), key);
        }
    }

    #[test]
    fn rejects_unknown_sections_and_keys() {
        for bad in ["user", "user.phone", "remote.url", "init.defaultbranch", ""] {
            assert!(
                matches!(ConfigKey::try_parse(bad), Err(Error::Validation(_))),
                "{bad}"
            );
        }
    }
}
