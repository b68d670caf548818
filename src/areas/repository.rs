use crate::areas::config::{Config, ConfigScope};
use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::{METADATA_DIR, Workspace};
use crate::artifacts::config::config_key::ConfigKey;
use crate::artifacts::status::status_info::Status;
use crate::errors::{Error, IoResultExt, Result};
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

/// Repository root plus the areas living in its metadata directory
///
/// User-facing command output goes through `writer`.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    /// Repository rooted at `path`, which must exist
    ///
    /// Nothing is checked or created inside the metadata directory; see
    /// [`Repository::open`] for opening an existing repository.
    pub fn new(path: &Path, writer: Box<dyn std::io::Write>) -> Result<Self> {
        let path = path.canonicalize().at_path(path)?;
        let metadata_path = path.join(METADATA_DIR);

        Ok(Repository {
            database: Database::new(metadata_path.join("objects").into_boxed_path()),
            workspace: Workspace::new(path.clone().into_boxed_path()),
            refs: Refs::new(metadata_path.into_boxed_path()),
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
        })
    }

    /// Open the repository containing `start`
    pub fn open(start: &Path, writer: Box<dyn std::io::Write>) -> Result<Self> {
        let root = Self::discover(start)?;
        tracing::debug!(root = %root.display(), "opened repository");

        Self::new(&root, writer)
    }

    /// Nearest ancestor of `start` (itself included) holding a metadata directory
    pub fn discover(start: &Path) -> Result<PathBuf> {
        let start = start.canonicalize().at_path(start)?;
        let mut current = start.as_path();

        loop {
            if current.join(METADATA_DIR).is_dir() {
                return Ok(current.to_path_buf());
            }

            match current.parent() {
                Some(parent) if parent != current => current = parent,
                _ => {
                    return Err(Error::NotFound(format!(
                        "not a twig repository (or any of the parent directories): {}",
                        start.display()
                    )));
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.path.join(METADATA_DIR)
    }

    pub fn index_path(&self) -> PathBuf {
        self.metadata_path().join("index")
    }

    pub fn config_path(&self) -> PathBuf {
        self.metadata_path().join("config")
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn load_index(&self) -> Result<Index> {
        Index::load(self.index_path().into_boxed_path())
    }

    pub fn status(&'_ self) -> Status<'_> {
        Status::new(self)
    }

    pub fn load_config(&self, scope: ConfigScope) -> Result<Config> {
        match scope {
            ConfigScope::Repository => Config::load(self.config_path().into_boxed_path()),
            ConfigScope::Global => Config::load_global(),
        }
    }

    /// Repository value for `key`, falling back to the global one
    pub fn config_value(&self, key: &ConfigKey) -> Result<Option<String>> {
        if let Some(value) = self.load_config(ConfigScope::Repository)?.get(key) {
            return Ok(Some(value.to_string()));
        }

        match Config::load_global() {
            Ok(global) => Ok(global.get(key).map(str::to_string)),
            // no home directory means no global scope
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}
