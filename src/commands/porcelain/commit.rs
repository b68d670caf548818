use crate::areas::repository::Repository;
use crate::artifacts::config::config_key::ConfigKey;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;

#[derive(Debug, Clone)]
pub struct CommitOptions {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    NothingToCommit,
    Committed(ObjectId),
}

impl Repository {
    pub fn commit(&self, options: &CommitOptions) -> anyhow::Result<CommitOutcome> {
        let index = self.load_index().context("Unable to load the index")?;

        if index.is_empty() {
            writeln!(self.writer(), "nothing to commit, working tree clean")?;
            return Ok(CommitOutcome::NothingToCommit);
        }

        let mut store_tree = |tree: &Tree| self.database().store(tree);
        let root = Tree::build(
            index.entries().map(|entry| (entry.path.as_str(), entry.oid.clone())),
            &mut store_tree,
        )
        .context("Unable to build the commit tree")?;
        let tree_oid = self.database().store(&root)?;

        let parent = self.refs().read_head()?;
        let is_root = match parent {
            Some(_) => "",
            None => "(root-commit) ",
        };

        let author = Author::resolve(
            self.config_value(&ConfigKey::UserName)?,
            self.config_value(&ConfigKey::UserEmail)?,
        )?;
        let message = options.message.clone();

        let commit = Commit::new(parent.into_iter().collect(), tree_oid, author, message);
        let commit_oid = self.database().store(&commit)?;
        self.refs().update_head(&commit_oid)?;

        let branch = self
            .refs()
            .current_branch()
            .map(|name| name.to_string())
            .unwrap_or_else(|| "detached HEAD".to_string());

        writeln!(
            self.writer(),
            "[{} {}{}] {}",
            branch,
            is_root,
            commit_oid.to_short_oid(),
            commit.short_message()
        )?;

        Ok(CommitOutcome::Committed(commit_oid))
    }
}
