use crate::artifacts::branch::{HEADS_REF_PREFIX, INVALID_BRANCH_NAME_REGEX};
use crate::errors::{Error, Result};

/// Validated, single-segment branch name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(Error::Validation("branch name cannot be empty".into()));
        }
        if name.contains('/') {
            return Err(Error::Validation(format!(
                "nested branch names are not supported: '{name}'"
            )));
        }

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .map_err(|e| Error::Validation(format!("invalid branch name regex: {e}")))?;

        if re.is_match(&name) {
            Err(Error::Validation(format!("invalid branch name: '{name}'")))
        } else {
            Ok(Self(name))
        }
    }

    /// Parse the target of a symbolic ref such as `refs/heads/main`
    pub fn try_parse_ref_path(ref_path: &str) -> Result<Self> {
        let name = ref_path.strip_prefix(HEADS_REF_PREFIX).ok_or_else(|| {
            Error::Format(format!(
                "symbolic ref must start with '{HEADS_REF_PREFIX}', got '{ref_path}'"
            ))
        })?;

        Self::try_parse(name)
    }

    pub fn ref_path(&self) -> String {
        format!("{HEADS_REF_PREFIX}{}", self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
