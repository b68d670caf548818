//! References (HEAD and branches)
//!
//! ## File Format
//!
//! - `HEAD` holds either `ref: refs/heads/<branch>` (on a branch) or a bare
//!   40-character hash (detached)
//! - `refs/heads/<branch>` holds the hash of the branch tip
//!
//! Every file ends with a newline. A branch exists exactly when its ref file
//! does, so a fresh repository has a HEAD pointing at a branch with no file
//! yet ("no commits yet").

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, IoResultExt, Result};
use derive_new::new;
use std::path::Path;
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Where HEAD points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    Symbolic(BranchName),
    Detached(ObjectId),
}

/// HEAD and branch refs under the metadata directory
#[derive(Debug, new)]
pub struct Refs {
    path: Box<Path>,
}

impl Refs {
    pub fn read_head_state(&self) -> Result<Head> {
        let head_path = self.head_path();
        let content = match std::fs::read_to_string(&head_path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound("HEAD not found".into()));
            }
            Err(err) => return Err(Error::io(&head_path, err)),
        };
        let content = content.trim();

        let re = regex::Regex::new(SYMREF_REGEX)
            .map_err(|e| Error::Format(format!("invalid symref regex: {e}")))?;
        match re.captures(content) {
            Some(symref) => Ok(Head::Symbolic(BranchName::try_parse_ref_path(&symref[1])?)),
            None => Ok(Head::Detached(ObjectId::try_parse(content)?)),
        }
    }

    /// Checked-out branch; `None` when detached or HEAD cannot be read
    pub fn current_branch(&self) -> Option<BranchName> {
        match self.read_head_state() {
            Ok(Head::Symbolic(name)) => Some(name),
            Ok(Head::Detached(_)) => None,
            Err(err) => {
                tracing::debug!(%err, "cannot resolve current branch");
                None
            }
        }
    }

    pub fn is_current_branch(&self, name: &BranchName) -> bool {
        self.current_branch().as_ref() == Some(name)
    }

    /// Commit HEAD resolves to; `None` while the current branch has no commits
    pub fn read_head(&self) -> Result<Option<ObjectId>> {
        match self.read_head_state()? {
            Head::Symbolic(name) => self.read_branch(&name),
            Head::Detached(oid) => Ok(Some(oid)),
        }
    }

    /// Move the current branch (or a detached HEAD) to `oid`
    pub fn update_head(&self, oid: &ObjectId) -> Result<()> {
        match self.read_head_state()? {
            Head::Symbolic(name) => {
                tracing::info!(branch = %name, %oid, "updating branch");
                self.update_ref_file(&self.branch_path(&name), &format!("{oid}\n"))
            }
            Head::Detached(_) => {
                tracing::info!(%oid, "updating detached HEAD");
                self.update_ref_file(&self.head_path(), &format!("{oid}\n"))
            }
        }
    }

    /// Point HEAD at `name`, whether or not the branch has commits
    pub fn set_head_branch(&self, name: &BranchName) -> Result<()> {
        tracing::info!(branch = %name, "pointing HEAD at branch");
        self.update_ref_file(&self.head_path(), &format!("ref: {}\n", name.ref_path()))
    }

    pub fn branch_exists(&self, name: &BranchName) -> bool {
        self.branch_path(name).is_file()
    }

    /// Tip of `name`; `None` when the branch has no ref file
    pub fn read_branch(&self, name: &BranchName) -> Result<Option<ObjectId>> {
        let branch_path = self.branch_path(name);

        match std::fs::read_to_string(&branch_path) {
            Ok(content) => Ok(Some(ObjectId::try_parse(content.trim())?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::io(&branch_path, err)),
        }
    }

    pub fn create_branch(&self, name: &BranchName, source_oid: &ObjectId) -> Result<()> {
        if self.branch_exists(name) {
            return Err(Error::Conflict(format!("a branch named '{name}' already exists")));
        }

        tracing::info!(branch = %name, oid = %source_oid, "creating branch");
        self.update_ref_file(&self.branch_path(name), &format!("{source_oid}\n"))
    }

    /// Delete `name` and return the commit it pointed at
    pub fn delete_branch(&self, name: &BranchName) -> Result<ObjectId> {
        if self.is_current_branch(name) {
            return Err(Error::Conflict(format!(
                "cannot delete branch '{name}' checked out at the current worktree"
            )));
        }

        let oid = self
            .read_branch(name)?
            .ok_or_else(|| Error::NotFound(format!("branch '{name}' not found")))?;

        let branch_path = self.branch_path(name);
        std::fs::remove_file(&branch_path).at_path(&branch_path)?;
        tracing::info!(branch = %name, %oid, "deleted branch");

        Ok(oid)
    }

    /// Rename `old` to `new`, carrying HEAD along when `old` is checked out
    ///
    /// If HEAD cannot be rewritten the ref file is moved back.
    pub fn rename_branch(&self, old: &BranchName, new: &BranchName) -> Result<()> {
        if old == new {
            return Err(Error::Validation(format!(
                "branch '{old}' cannot be renamed to itself"
            )));
        }
        if !self.branch_exists(old) {
            return Err(Error::NotFound(format!("branch '{old}' not found")));
        }
        if self.branch_exists(new) {
            return Err(Error::Conflict(format!("a branch named '{new}' already exists")));
        }

        let old_path = self.branch_path(old);
        let new_path = self.branch_path(new);
        let was_current = self.is_current_branch(old);

        std::fs::rename(&old_path, &new_path).at_path(&new_path)?;

        if was_current && let Err(err) = self.set_head_branch(new) {
            if let Err(rollback) = std::fs::rename(&new_path, &old_path) {
                tracing::warn!(%rollback, "failed to restore branch '{old}' after rename");
            }
            return Err(err);
        }

        tracing::info!(%old, %new, "renamed branch");
        Ok(())
    }

    /// Branch names in sorted order; empty when there are none
    pub fn list_branches(&self) -> Result<Vec<BranchName>> {
        let heads_path = self.heads_path();
        if !heads_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut branches = WalkDir::new(&heads_path)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| BranchName::try_parse(entry.file_name().to_string_lossy()).ok())
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    pub fn update_ref_file(&self, path: &Path, raw_ref: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).at_path(parent)?;
        }

        std::fs::write(path, raw_ref).at_path(path)
    }

    pub fn branch_path(&self, name: &BranchName) -> Box<Path> {
        self.heads_path().join(name.as_ref()).into_boxed_path()
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;

    fn branch(name: &str) -> BranchName {
        BranchName::try_parse(name).unwrap()
    }

    fn oid(seed: &str) -> ObjectId {
        ObjectId::hash_bytes(seed.as_bytes())
    }

    fn refs_on(dir: &TempDir, current: &str) -> Refs {
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());
        refs.set_head_branch(&branch(current)).unwrap();
        refs
    }

    #[test]
    fn unborn_branch_has_no_head_commit() {
        let dir = TempDir::new().unwrap();
        let refs = refs_on(&dir, "master");

        assert_eq!(refs.read_head().unwrap(), None);
        assert_eq!(refs.current_branch(), Some(branch("master")));
        assert!(refs.list_branches().unwrap().is_empty());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("HEAD")).unwrap(),
            "ref: refs/heads/master\n"
        );
    }

    #[test]
    fn update_head_writes_through_the_branch() {
        let dir = TempDir::new().unwrap();
        let refs = refs_on(&dir, "master");

        refs.update_head(&oid("c1")).unwrap();

        assert_eq!(refs.read_head().unwrap(), Some(oid("c1")));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("refs/heads/master")).unwrap(),
            format!("{}\n", oid("c1"))
        );
    }

    #[test]
    fn detached_head_is_updated_in_place() {
        let dir = TempDir::new().unwrap();
        let refs = refs_on(&dir, "master");
        refs.update_ref_file(&refs.head_path(), &format!("{}\n", oid("c1")))
            .unwrap();

        refs.update_head(&oid("c2")).unwrap();

        assert_eq!(refs.current_branch(), None);
        assert_eq!(refs.read_head_state().unwrap(), Head::Detached(oid("c2")));
        assert!(!refs.branch_exists(&branch("master")));
    }

    #[test]
    fn branch_lifecycle_errors() {
        let dir = TempDir::new().unwrap();
        let refs = refs_on(&dir, "master");
        refs.update_head(&oid("c1")).unwrap();

        refs.create_branch(&branch("topic"), &oid("c1")).unwrap();
        assert!(matches!(
            refs.create_branch(&branch("topic"), &oid("c1")),
            Err(Error::Conflict(_))
        ));
        assert!(matches!(
            refs.delete_branch(&branch("master")),
            Err(Error::Conflict(_))
        ));
        assert!(refs.delete_branch(&branch("ghost")).unwrap_err().is_not_found());

        assert_eq!(refs.delete_branch(&branch("topic")).unwrap(), oid("c1"));
        assert_eq!(refs.list_branches().unwrap(), vec![branch("master")]);
    }

    #[test]
    fn renaming_the_current_branch_moves_head() {
        let dir = TempDir::new().unwrap();
        let refs = refs_on(&dir, "master");
        refs.update_head(&oid("c1")).unwrap();
        refs.create_branch(&branch("other"), &oid("c1")).unwrap();

        assert!(matches!(
            refs.rename_branch(&branch("master"), &branch("master")),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            refs.rename_branch(&branch("master"), &branch("other")),
            Err(Error::Conflict(_))
        ));
        assert!(
            refs.rename_branch(&branch("ghost"), &branch("new"))
                .unwrap_err()
                .is_not_found()
        );

        refs.rename_branch(&branch("master"), &branch("main")).unwrap();

        assert_eq!(refs.current_branch(), Some(branch("main")));
        assert_eq!(refs.read_head().unwrap(), Some(oid("c1")));
        assert_eq!(
            refs.list_branches().unwrap(),
            vec![branch("main"), branch("other")]
        );
    }
}
