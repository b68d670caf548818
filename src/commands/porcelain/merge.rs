use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::log::rev_list::is_ancestor;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Error;
use anyhow::Context;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    AlreadyUpToDate,
    /// `from` is `None` when the current branch had no commits
    FastForward {
        from: Option<ObjectId>,
        to: ObjectId,
    },
}

impl Repository {
    /// Fast-forward the current branch to `branch_name`
    ///
    /// Diverged histories are refused before anything is touched.
    pub fn merge(&self, branch_name: &str) -> anyhow::Result<MergeOutcome> {
        let target_name = BranchName::try_parse(branch_name)?;

        if self.refs().is_current_branch(&target_name) {
            return Err(Error::Validation(format!(
                "cannot merge branch '{target_name}' into itself"
            ))
            .into());
        }

        let target_oid = self
            .refs()
            .read_branch(&target_name)?
            .ok_or_else(|| Error::NotFound(format!("branch '{target_name}' not found")))?;
        let current_oid = self.refs().read_head()?;

        if current_oid.as_ref() == Some(&target_oid) {
            writeln!(self.writer(), "Already up to date.")?;
            return Ok(MergeOutcome::AlreadyUpToDate);
        }

        if let Some(current_oid) = &current_oid
            && !is_ancestor(self.database(), current_oid, &target_oid)?
        {
            return Err(Error::Conflict(format!(
                "branch '{target_name}' has diverged, cannot fast-forward"
            ))
            .into());
        }

        let target_commit = self.database().load_commit(&target_oid)?;
        let mut index = self.load_index().context("Unable to load the index")?;
        Migration::new(self, &mut index)
            .apply(target_commit.tree_oid())
            .with_context(|| format!("Unable to check out the tree of '{target_name}'"))?;

        self.refs().update_head(&target_oid)?;

        let current_name = self
            .refs()
            .current_branch()
            .map(|name| name.to_string())
            .unwrap_or_else(|| "HEAD".to_string());
        writeln!(
            self.writer(),
            "Fast-forward merge from '{current_name}' to '{target_name}'"
        )?;

        Ok(MergeOutcome::FastForward {
            from: current_oid,
            to: target_oid,
        })
    }
}
