//! Index (staging area)
//!
//! Tracks which blob is staged for each path in the next commit. The whole
//! map is loaded and saved at once; saves go through a temp file that is
//! renamed over the index file.
//!
//! ## Data Structures
//!
//! - `entries`: Maps file paths to their index entries
//! - `children`: Maps directory paths to the files below them, so a file
//!   replacing a directory (or the reverse) can drop the stale side

use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, IoResultExt, Result};
use fake::rand;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

#[derive(Serialize)]
struct SnapshotRef<'i> {
    entries: &'i BTreeMap<String, IndexEntry>,
}

#[derive(Deserialize)]
struct Snapshot {
    #[serde(default)]
    entries: BTreeMap<String, IndexEntry>,
}

#[derive(Debug, Clone)]
pub struct Index {
    path: Box<Path>,
    entries: BTreeMap<String, IndexEntry>,
    children: BTreeMap<String, BTreeSet<String>>,
}

impl Index {
    /// An empty index that will be saved at `path`
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            children: BTreeMap::new(),
        }
    }

    /// Load the snapshot stored at `path`
    pub fn load(path: Box<Path>) -> Result<Self> {
        let content = match std::fs::read(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound(format!(
                    "index file {} not found",
                    path.display()
                )));
            }
            Err(err) => return Err(Error::io(&path, err)),
        };

        let snapshot: Snapshot = serde_json::from_slice(&content)
            .map_err(|err| Error::Format(format!("corrupt index {}: {err}", path.display())))?;

        let mut index = Index::new(path);
        for entry in snapshot.entries.into_values() {
            index.store_entry(entry);
        }

        Ok(index)
    }

    pub fn save(&self) -> Result<()> {
        let snapshot = SnapshotRef {
            entries: &self.entries,
        };
        let content = serde_json::to_vec_pretty(&snapshot)
            .map_err(|err| Error::Format(format!("cannot encode index: {err}")))?;

        let parent = self.path.parent().unwrap_or(Path::new("."));
        let temp_path = parent.join(format!("index-{}.tmp", rand::random::<u32>()));
        std::fs::write(&temp_path, content).at_path(&temp_path)?;
        std::fs::rename(&temp_path, &self.path).at_path(&self.path)?;

        tracing::debug!(entries = self.entries.len(), "saved index");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stage `oid` for `path`
    ///
    /// Overwrites an existing entry. A file entry sitting where one of the
    /// new path's directories goes is dropped, as are entries below `path`.
    pub fn add_entry(&mut self, path: impl Into<String>, oid: ObjectId) {
        let entry = IndexEntry::new(path.into(), oid);

        self.discard_conflicts(&entry);
        self.store_entry(entry);
    }

    /// Drop `path` and anything staged below it
    pub fn remove(&mut self, path: &str) {
        self.remove_entry(path);
        self.remove_children(path);
    }

    /// Replace the whole content with `files`
    pub fn replace_all(&mut self, files: BTreeMap<String, ObjectId>) {
        self.entries.clear();
        self.children.clear();

        for (path, oid) in files {
            self.store_entry(IndexEntry::new(path, oid));
        }
    }

    pub fn entry_by_path(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn is_directly_tracked(&self, path: &str) -> bool {
        self.entries.contains_key(path) || self.children.contains_key(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Staged files below the directory `dir` (`""` for the whole index)
    pub fn paths_under(&self, dir: &str) -> Vec<String> {
        if dir.is_empty() {
            return self.entries.keys().cloned().collect();
        }

        self.children
            .get(dir)
            .map(|children| children.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn discard_conflicts(&mut self, entry: &IndexEntry) {
        for parent in entry.parent_dirs() {
            self.remove_entry(parent);
        }
        self.remove_children(&entry.path);
    }

    fn store_entry(&mut self, entry: IndexEntry) {
        for parent in entry.parent_dirs() {
            self.children
                .entry(parent.to_string())
                .or_default()
                .insert(entry.path.clone());
        }

        self.entries.insert(entry.path.clone(), entry);
    }

    fn remove_children(&mut self, path: &str) {
        if let Some(children) = self.children.remove(path) {
            for child in children {
                self.remove_entry(&child);
            }
        }
    }

    fn remove_entry(&mut self, path: &str) {
        let Some(entry) = self.entries.remove(path) else {
            return;
        };

        for parent in entry.parent_dirs() {
            if let Some(children) = self.children.get_mut(parent) {
                children.remove(path);
                if children.is_empty() {
                    self.children.remove(parent);
                }
            }
        }
    }
}
