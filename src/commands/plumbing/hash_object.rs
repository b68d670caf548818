use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::IoResultExt;
use anyhow::Context;
use std::path::Path;

impl Repository {
    /// Print the blob id of `object_path`, storing the blob when `write` is set
    pub fn hash_object(&self, object_path: &Path, write: bool) -> anyhow::Result<ObjectId> {
        let current_dir = std::env::current_dir().context("Unable to read current directory")?;
        let absolute_path = current_dir
            .join(object_path)
            .canonicalize()
            .at_path(object_path)?;
        let relative_path = self.workspace().relative_path(&absolute_path)?;

        let object = self.workspace().parse_blob(&relative_path)?;
        let object_id = object.object_id();

        writeln!(self.writer(), "{object_id}")?;

        if write {
            self.database().store(&object)?;
        }

        Ok(object_id)
    }
}
