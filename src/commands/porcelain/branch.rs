use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::Error;
use colored::Colorize;

impl Repository {
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let branches = self.refs().list_branches()?;

        if branches.is_empty() {
            writeln!(self.writer(), "No branches yet")?;
            return Ok(branches);
        }

        let current = self.refs().current_branch();
        for branch in &branches {
            if current.as_ref() == Some(branch) {
                writeln!(self.writer(), "* {}", branch.as_ref().green())?;
            } else {
                writeln!(self.writer(), "  {branch}")?;
            }
        }

        Ok(branches)
    }

    /// Create `branch_name` at the current HEAD commit
    pub fn create_branch(&self, branch_name: &str) -> anyhow::Result<BranchName> {
        let branch_name = BranchName::try_parse(branch_name)?;

        let source_oid = self
            .refs()
            .read_head()?
            .ok_or_else(|| Error::Validation("no commits exist yet".into()))?;

        self.refs().create_branch(&branch_name, &source_oid)?;
        writeln!(self.writer(), "Created branch '{branch_name}'")?;

        Ok(branch_name)
    }

    pub fn delete_branch(&self, branch_name: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(branch_name)?;

        let oid = self.refs().delete_branch(&branch_name)?;
        writeln!(
            self.writer(),
            "Deleted branch {branch_name} (was {}).",
            oid.to_short_oid()
        )?;

        Ok(())
    }

    pub fn rename_branch(&self, old_name: &str, new_name: &str) -> anyhow::Result<()> {
        let old_name = BranchName::try_parse(old_name)?;
        let new_name = BranchName::try_parse(new_name)?;

        self.refs().rename_branch(&old_name, &new_name)?;
        writeln!(
            self.writer(),
            "Renamed branch '{old_name}' to '{new_name}'"
        )?;

        Ok(())
    }
}
