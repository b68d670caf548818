//! Moving the working tree and index to another commit's tree
//!
//! 1. Every path staged in the index is deleted from the working tree, and
//!    directories left empty are pruned. Untracked files stay.
//! 2. The target tree is written out recursively.
//! 3. The index is replaced with the target tree's files.
//!
//! There is no conflict detection: local edits to tracked files are lost, and
//! a failure halfway leaves a mix of both trees on disk.

use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use derive_new::new;

#[derive(new)]
pub struct Migration<'r> {
    repository: &'r Repository,
    index: &'r mut Index,
}

impl Migration<'_> {
    /// Replace tracked content with the tree `target_tree` and save the index
    pub fn apply(&mut self, target_tree: &ObjectId) -> Result<()> {
        let workspace = self.repository.workspace();
        let database = self.repository.database();

        // read everything up front so a bad object fails before any deletion
        let mut target_files = database.flatten_tree(target_tree)?;
        target_files.retain(|path, _| !Workspace::is_metadata_path(path));

        workspace.remove_files(self.index.paths())?;
        tracing::info!(tree = %target_tree, files = target_files.len(), "materializing tree");
        self.materialize(target_tree, "")?;

        self.index.replace_all(target_files);
        self.index.save()
    }

    fn materialize(&self, tree_oid: &ObjectId, prefix: &str) -> Result<()> {
        let workspace = self.repository.workspace();
        let tree = self.repository.database().load_tree(tree_oid)?;

        for entry in tree.entries() {
            let path = if prefix.is_empty() {
                entry.name.clone()
            } else {
                format!("{prefix}/{}", entry.name)
            };

            if Workspace::is_metadata_path(&path) {
                tracing::warn!(%path, "refusing to write into the metadata directory");
                continue;
            }

            if entry.is_tree() {
                workspace.make_directory(&path)?;
                self.materialize(&entry.oid, &path)?;
            } else {
                let blob = self.repository.database().load_blob(&entry.oid)?;
                workspace.write_file(&path, blob.content())?;
            }
        }

        Ok(())
    }
}
