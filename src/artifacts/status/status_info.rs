use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::{ChangeType, FileChange, FileChangeType};
use crate::errors::Result;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};

/// `path -> blob id` view of one snapshot
pub type FileSet = BTreeMap<String, ObjectId>;
pub type ChangeSet = BTreeMap<String, FileChangeType>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusInfo {
    /// Paths with a change on at least one axis, sorted
    pub changes: BTreeMap<String, FileChange>,
    /// Paths present only in the working tree, sorted
    pub untracked: BTreeSet<String>,
}

impl StatusInfo {
    /// Three-way comparison of HEAD tree, index and working tree
    pub fn compare(head: &FileSet, index: &FileSet, workspace: &FileSet) -> Self {
        let mut status = StatusInfo::default();
        let paths = head
            .keys()
            .chain(index.keys())
            .chain(workspace.keys())
            .collect::<BTreeSet<_>>();

        for path in paths {
            let (in_head, in_index, in_workspace) =
                (head.get(path), index.get(path), workspace.get(path));

            if in_head.is_none() && in_index.is_none() {
                status.untracked.insert(path.clone());
                continue;
            }

            let change = FileChange {
                index_change: ChangeType::classify(in_head, in_index),
                workspace_change: ChangeType::classify(in_index, in_workspace),
            };
            if !change.is_unmodified() {
                status.changes.insert(path.clone(), change);
            }
        }

        status
    }

    pub fn is_clean(&self) -> bool {
        self.changes.is_empty() && self.untracked.is_empty()
    }

    /// Changes staged for the next commit
    pub fn index_changeset(&self) -> ChangeSet {
        self.changes
            .iter()
            .filter(|(_, change)| change.index_change != ChangeType::Unmodified)
            .map(|(path, change)| (path.clone(), FileChangeType::Index(change.index_change)))
            .collect()
    }

    /// Working tree edits to tracked files that are not staged
    pub fn workspace_changeset(&self) -> ChangeSet {
        self.changes
            .iter()
            .filter(|(_, change)| {
                matches!(
                    change.workspace_change,
                    ChangeType::Modified | ChangeType::Deleted
                )
            })
            .map(|(path, change)| {
                (
                    path.clone(),
                    FileChangeType::Workspace(change.workspace_change),
                )
            })
            .collect()
    }

    /// Untracked paths plus files present on disk but dropped from the index
    pub fn untracked_files(&self) -> BTreeSet<String> {
        self.changes
            .iter()
            .filter(|(_, change)| change.workspace_change == ChangeType::Added)
            .map(|(path, _)| path.clone())
            .chain(self.untracked.iter().cloned())
            .collect()
    }
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl Status<'_> {
    /// Read-only status of the repository
    pub fn initialize(&self) -> Result<StatusInfo> {
        let head_tree = self.load_head_tree()?;
        let index = self
            .repository
            .load_index()?
            .entries()
            .map(|entry| (entry.path.clone(), entry.oid.clone()))
            .collect::<FileSet>();
        let workspace = self.scan_workspace()?;

        Ok(StatusInfo::compare(&head_tree, &index, &workspace))
    }

    fn load_head_tree(&self) -> Result<FileSet> {
        match self.repository.refs().read_head()? {
            Some(head_oid) => {
                let commit = self.repository.database().load_commit(&head_oid)?;
                self.repository.database().flatten_tree(commit.tree_oid())
            }
            None => Ok(FileSet::new()),
        }
    }

    fn scan_workspace(&self) -> Result<FileSet> {
        let workspace = self.repository.workspace();

        workspace
            .list_files(None)?
            .into_iter()
            .map(|path| {
                let oid = workspace.parse_blob(&path)?.object_id();
                Ok((path, oid))
            })
            .collect()
    }
}
