use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::errors::Error;
use anyhow::Context;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    pub verbose: bool,
}

impl Repository {
    /// Stage files and directories
    ///
    /// Relative paths are taken from the current directory. Staged entries
    /// below an added directory whose files are gone from disk are dropped.
    pub fn add(&self, paths: &[PathBuf], options: &AddOptions) -> anyhow::Result<()> {
        let mut index = self.load_index().context("Unable to load the index")?;
        let current_dir = std::env::current_dir().context("Unable to read current directory")?;

        for path in paths {
            let absolute_path = Self::resolve_pathspec(&current_dir, path)?;
            let relative_root = self.workspace().relative_path(&absolute_path)?;

            let files = self.workspace().list_files(Some(&absolute_path))?;

            // removing_deleted_files
            for staged in index.paths_under(&relative_root) {
                if !self.workspace().exists(&staged) {
                    tracing::debug!(path = %staged, "unstaging deleted file");
                    index.remove(&staged);
                }
            }

            for file in files {
                Self::check_storable_path(&file)?;

                let blob = self.workspace().parse_blob(&file)?;
                let blob_id = self
                    .database()
                    .store(&blob)
                    .with_context(|| format!("Unable to store blob for {file}"))?;
                debug_assert_eq!(blob_id, blob.object_id());

                if options.verbose {
                    writeln!(self.writer(), "add '{file}'")?;
                }
                index.add_entry(file, blob_id);
            }
        }

        index.save().context("Unable to write the index")?;

        Ok(())
    }

    /// Tree entries are tab and line delimited, so names must not contain either
    fn check_storable_path(file: &str) -> anyhow::Result<()> {
        if file.contains(['\t', '\n', '\r']) {
            return Err(Error::Validation(format!(
                "path '{}' contains a tab or line break",
                file.escape_debug()
            ))
            .into());
        }

        Ok(())
    }

    fn resolve_pathspec(current_dir: &Path, path: &Path) -> anyhow::Result<PathBuf> {
        let joined = current_dir.join(path);

        joined.canonicalize().map_err(|_| {
            Error::NotFound(format!(
                "pathspec '{}' did not match any files",
                path.display()
            ))
            .into()
        })
    }
}
