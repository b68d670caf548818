use crate::artifacts::objects::blob::Blob;
use crate::errors::{Error, IoResultExt, Result};
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Name of the metadata directory at the repository root
pub const METADATA_DIR: &str = ".twig";

/// Working tree rooted at the repository directory
///
/// Paths crossing this boundary are repository relative and `/`-separated.
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn absolute(&self, file_path: &str) -> PathBuf {
        self.path.join(file_path)
    }

    /// Repository-relative form of an absolute path inside the working tree
    pub fn relative_path(&self, path: &Path) -> Result<String> {
        let relative = path.strip_prefix(self.path.as_ref()).map_err(|_| {
            Error::Validation(format!(
                "'{}' is outside repository at '{}'",
                path.display(),
                self.path.display()
            ))
        })?;

        Ok(Self::to_slash_path(relative))
    }

    fn to_slash_path(path: &Path) -> String {
        path.components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Whether a repository-relative path lies inside the metadata directory
    pub fn is_metadata_path(file_path: &str) -> bool {
        file_path.split('/').next() == Some(METADATA_DIR)
    }

    /// Files under `root` (the whole tree when `None`), sorted
    ///
    /// Nothing inside the metadata directory is ever listed, even when it is
    /// named as `root`. A file given as `root` lists just itself.
    pub fn list_files(&self, root: Option<&Path>) -> Result<Vec<String>> {
        let root = root.unwrap_or(&self.path);

        if root.is_file() {
            let file = self.relative_path(root)?;
            if Self::is_metadata_path(&file) {
                tracing::debug!(path = %file, "skipping metadata file");
                return Ok(Vec::new());
            }
            return Ok(vec![file]);
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry| entry.file_name() != METADATA_DIR);

        for entry in walker {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(root).to_path_buf();
                Error::io(path, err.into())
            })?;

            if entry.file_type().is_file() {
                let file = self.relative_path(entry.path())?;
                if !Self::is_metadata_path(&file) {
                    files.push(file);
                }
            }
        }
        files.sort();

        Ok(files)
    }

    pub fn exists(&self, file_path: &str) -> bool {
        self.absolute(file_path).is_file()
    }

    pub fn read_file(&self, file_path: &str) -> Result<Bytes> {
        let path = self.absolute(file_path);
        std::fs::read(&path).map(Bytes::from).at_path(&path)
    }

    pub fn parse_blob(&self, file_path: &str) -> Result<Blob> {
        Ok(Blob::new(self.read_file(file_path)?))
    }

    /// Overwrite `file_path` with `data`, creating parent directories
    ///
    /// Files standing where a parent directory belongs, and a directory at the
    /// file's own location, are removed first.
    pub fn write_file(&self, file_path: &str, data: &[u8]) -> Result<()> {
        if let Some((parent, _)) = file_path.rsplit_once('/') {
            self.make_directory(parent)?;
        }

        let path = self.absolute(file_path);
        if path.is_dir() {
            std::fs::remove_dir_all(&path).at_path(&path)?;
        }

        std::fs::write(&path, data).at_path(&path)
    }

    pub fn make_directory(&self, dir_path: &str) -> Result<()> {
        let mut current = self.path.to_path_buf();

        for segment in dir_path.split('/').filter(|segment| !segment.is_empty()) {
            current.push(segment);

            if current.is_file() {
                std::fs::remove_file(&current).at_path(&current)?;
            }
            if !current.is_dir() {
                std::fs::create_dir(&current).at_path(&current)?;
            }
        }

        Ok(())
    }

    /// Delete tracked files and then the directories they leave empty
    ///
    /// Missing files are skipped. The repository root and the metadata
    /// directory are never removed.
    pub fn remove_files<'p>(&self, file_paths: impl IntoIterator<Item = &'p str>) -> Result<()> {
        let mut parents = Vec::new();

        for file_path in file_paths {
            if Self::is_metadata_path(file_path) {
                continue;
            }

            let path = self.absolute(file_path);
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(Error::io(&path, err)),
            }

            if let Some((parent, _)) = file_path.rsplit_once('/') {
                parents.push(parent.to_string());
            }
        }

        // deepest first so children go before their parents
        parents.sort_by_key(|parent| (std::cmp::Reverse(parent.matches('/').count()), parent.clone()));
        parents.dedup();
        for parent in parents {
            self.prune_empty_dirs(&parent)?;
        }

        Ok(())
    }

    fn prune_empty_dirs(&self, dir_path: &str) -> Result<()> {
        let mut current = Some(dir_path);

        while let Some(dir) = current {
            let path = self.absolute(dir);
            let is_empty = match std::fs::read_dir(&path) {
                Ok(mut entries) => entries.next().is_none(),
                Err(_) => false,
            };
            if !is_empty {
                break;
            }

            std::fs::remove_dir(&path).at_path(&path)?;
            current = dir.rsplit_once('/').map(|(parent, _)| parent);
        }

        Ok(())
    }
}
