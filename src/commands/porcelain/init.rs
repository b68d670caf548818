use crate::areas::config::Config;
use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::config::config_key::ConfigKey;
use anyhow::Context;
use std::fs;

const DEFAULT_BRANCH: &str = "master";

#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub quiet: bool,
}

impl Repository {
    /// Create the metadata directory layout; existing data is kept
    pub fn init(&self, options: &InitOptions) -> anyhow::Result<()> {
        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .twig/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .twig/refs/heads directory")?;

        // the default branch gets its ref file with the first commit
        if !self.refs().head_path().exists() {
            let default_branch = Self::default_branch_name()?;
            self.refs()
                .set_head_branch(&default_branch)
                .context("Failed to create initial HEAD reference")?;
        }

        if !self.config_path().exists() {
            fs::write(self.config_path(), b"").context("Failed to create .twig/config file")?;
        }

        if !self.index_path().exists() {
            Index::new(self.index_path().into_boxed_path())
                .save()
                .context("Failed to create .twig/index file")?;
        }

        if !options.quiet {
            writeln!(
                self.writer(),
                "Initialized empty twig repository in {}",
                self.metadata_path().display()
            )?;
        }

        Ok(())
    }

    fn default_branch_name() -> anyhow::Result<BranchName> {
        let configured = match Config::load_global() {
            Ok(config) => config
                .get(&ConfigKey::InitDefaultBranch)
                .map(str::to_string),
            Err(err) if err.is_not_found() => None,
            Err(err) => return Err(err).context("Failed to read global config"),
        };

        BranchName::try_parse(configured.unwrap_or_else(|| DEFAULT_BRANCH.to_string()))
            .context("Invalid init.defaultBranch")
    }
}
