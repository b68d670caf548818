use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::errors::Error;
use anyhow::Context;

#[derive(Debug, Clone, Default)]
pub struct SwitchOptions {
    /// Create the branch at HEAD when it does not exist
    pub create: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    AlreadyOn(BranchName),
    Switched(BranchName),
}

impl Repository {
    /// Check out `branch_name`, rewriting tracked files and the index
    ///
    /// Untracked files are left alone. Local edits to tracked files are
    /// overwritten without warning.
    pub fn switch(&self, branch_name: &str, options: &SwitchOptions) -> anyhow::Result<SwitchOutcome> {
        let branch_name = BranchName::try_parse(branch_name)?;

        if !self.refs().branch_exists(&branch_name) {
            if !options.create {
                return Err(Error::NotFound(format!(
                    "branch '{branch_name}' does not exist (use -c to create it)"
                ))
                .into());
            }
            self.create_branch(branch_name.as_ref())?;
        }

        if self.refs().is_current_branch(&branch_name) {
            writeln!(self.writer(), "Already on '{branch_name}'")?;
            return Ok(SwitchOutcome::AlreadyOn(branch_name));
        }

        let target_oid = self
            .refs()
            .read_branch(&branch_name)?
            .ok_or_else(|| Error::NotFound(format!("branch '{branch_name}' not found")))?;
        let target_commit = self
            .database()
            .load_commit(&target_oid)
            .with_context(|| format!("Unable to read the tip of '{branch_name}'"))?;

        let mut index = self.load_index().context("Unable to load the index")?;
        Migration::new(self, &mut index)
            .apply(target_commit.tree_oid())
            .with_context(|| format!("Unable to check out '{branch_name}'"))?;

        self.refs().set_head_branch(&branch_name)?;
        writeln!(self.writer(), "Switched to branch '{branch_name}'")?;

        Ok(SwitchOutcome::Switched(branch_name))
    }
}
