use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{Error, IoResultExt, Result};
use bytes::Bytes;
use fake::rand;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write-once object store keyed by object id
///
/// Objects live uncompressed under `objects/<2 hex>/<38 hex>`.
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.object_path(object_id).is_file()
    }

    /// Persist an object and return its id
    ///
    /// Storing an object that is already present returns its id without
    /// touching the filesystem.
    pub fn store(&self, object: &impl Object) -> Result<ObjectId> {
        let object_content = object.serialize();
        let object_id = ObjectId::hash_bytes(&object_content);

        if self.contains(&object_id) {
            tracing::debug!(oid = %object_id, "object already stored");
            return Ok(object_id);
        }

        let object_path = self.object_path(&object_id);
        let object_dir = object_path
            .parent()
            .ok_or_else(|| Error::NotFound(format!("invalid object path {}", object_path.display())))?;
        std::fs::create_dir_all(object_dir).at_path(object_dir)?;

        self.write_object(&object_path, object_content)?;
        tracing::debug!(oid = %object_id, kind = %object.object_type(), "stored object");

        Ok(object_id)
    }

    pub fn load(&self, object_id: &ObjectId) -> Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());

        match std::fs::read(&object_path) {
            Ok(content) => Ok(Bytes::from(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(format!("object {object_id} not found")))
            }
            Err(err) => Err(Error::io(object_path, err)),
        }
    }

    pub fn object_type(&self, object_id: &ObjectId) -> Result<ObjectType> {
        let content = self.load(object_id)?;
        let (object_type, _, _) = ObjectType::split_header(&content)?;

        Ok(object_type)
    }

    pub fn parse_object(&self, object_id: &ObjectId) -> Result<ObjectBox> {
        ObjectBox::parse(&self.load(object_id)?)
    }

    pub fn load_blob(&self, object_id: &ObjectId) -> Result<Blob> {
        Blob::deserialize(&self.load(object_id)?)
    }

    pub fn load_tree(&self, object_id: &ObjectId) -> Result<Tree> {
        let content = self.load(object_id)?;
        // a headerless file would otherwise be read as bare tree content
        ObjectType::Tree.expect_header(&content)?;

        Tree::deserialize(&content)
    }

    pub fn load_commit(&self, object_id: &ObjectId) -> Result<Commit> {
        Commit::deserialize(&self.load(object_id)?)
    }

    /// Walk a tree recursively into `path -> blob id`
    ///
    /// Paths use `/` separators. Entry names that already contain `/` are
    /// taken as they are.
    pub fn flatten_tree(&self, tree_oid: &ObjectId) -> Result<BTreeMap<String, ObjectId>> {
        let mut files = BTreeMap::new();
        self.flatten_into(tree_oid, "", &mut files)?;

        Ok(files)
    }

    fn flatten_into(
        &self,
        tree_oid: &ObjectId,
        prefix: &str,
        files: &mut BTreeMap<String, ObjectId>,
    ) -> Result<()> {
        for entry in self.load_tree(tree_oid)?.into_entries() {
            let is_tree = entry.is_tree();
            let path = if prefix.is_empty() {
                entry.name
            } else {
                format!("{prefix}/{}", entry.name)
            };

            if is_tree {
                self.flatten_into(&entry.oid, &path, files)?;
            } else {
                files.insert(path, entry.oid);
            }
        }

        Ok(())
    }

    fn write_object(&self, object_path: &Path, object_content: Bytes) -> Result<()> {
        let object_dir = object_path
            .parent()
            .ok_or_else(|| Error::NotFound(format!("invalid object path {}", object_path.display())))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .at_path(&temp_object_path)?;
        file.write_all(&object_content).at_path(&temp_object_path)?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, object_path).at_path(object_path)?;

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }

    pub fn object_path(&self, object_id: &ObjectId) -> PathBuf {
        self.path.join(object_id.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::commit::Author;
    use crate::artifacts::objects::object::Packable;
    use crate::artifacts::objects::tree::EntryKind;
    use assert_fs::TempDir;

    fn database(dir: &TempDir) -> Database {
        Database::new(dir.path().join("objects").into_boxed_path())
    }

    #[test]
    fn stores_with_two_level_fan_out() {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);
        let blob = Blob::new(Bytes::from_static(b"Hello World"));

        let oid = db.store(&blob).unwrap();

        let on_disk = std::fs::read(
            dir.path()
                .join("objects/5e/1c309dae7f45e0f39b1bf3ac3cd9db12e7d689"),
        )
        .unwrap();
        assert_eq!(on_disk, blob.serialize().to_vec());
        assert_eq!(db.load_blob(&oid).unwrap(), blob);
    }

    #[test]
    fn storing_twice_does_not_rewrite() {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);
        let blob = Blob::new(Bytes::from_static(b"same"));

        let first = db.store(&blob).unwrap();
        let path = db.object_path(&first);
        std::fs::write(&path, b"sentinel").unwrap();

        let second = db.store(&blob).unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read(&path).unwrap(), b"sentinel");
        let shard = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(shard, 1);
    }

    #[test]
    fn missing_and_mistyped_objects_are_reported() {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);
        let blob_oid = db.store(&Blob::new(Bytes::from_static(b"x"))).unwrap();
        let missing = ObjectId::hash_bytes(b"nowhere");

        assert!(db.contains(&blob_oid));
        assert!(!db.contains(&missing));
        assert!(db.load_blob(&missing).unwrap_err().is_not_found());
        assert!(matches!(db.load_tree(&blob_oid), Err(Error::Format(_))));
        assert!(matches!(db.load_commit(&blob_oid), Err(Error::Format(_))));
        assert_eq!(db.object_type(&blob_oid).unwrap(), ObjectType::Blob);
    }

    #[test]
    fn flattens_nested_and_flat_trees() {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);
        let a = db.store(&Blob::new(Bytes::from_static(b"a"))).unwrap();
        let b = db.store(&Blob::new(Bytes::from_static(b"b"))).unwrap();

        let mut inner = Tree::default();
        inner.add_entry("b.txt", b.clone(), EntryKind::Blob);
        let inner_oid = db.store(&inner).unwrap();

        let mut root = Tree::default();
        root.add_entry("a.txt", a.clone(), EntryKind::Blob);
        root.add_entry("dir", inner_oid, EntryKind::Tree);
        root.add_entry("flat/c.txt", a.clone(), EntryKind::Blob);
        let root_oid = db.store(&root).unwrap();

        let files = db.flatten_tree(&root_oid).unwrap();

        assert_eq!(
            files.into_iter().collect::<Vec<_>>(),
            vec![
                ("a.txt".to_string(), a.clone()),
                ("dir/b.txt".to_string(), b),
                ("flat/c.txt".to_string(), a),
            ]
        );
    }

    #[test]
    fn parses_commits_through_the_union() {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);
        let tree_oid = db.store(&Tree::default()).unwrap();
        let commit = Commit::new(
            vec![],
            tree_oid,
            Author::new("A".into(), "a@example.com".into()),
            "msg".into(),
        );
        let oid = db.store(&commit).unwrap();

        match db.parse_object(&oid).unwrap() {
            ObjectBox::Commit(parsed) => {
                assert_eq!(parsed.object_id(), oid);
                assert_eq!(parsed.message(), "msg");
            }
            other => panic!("unexpected object {other:?}"),
        }
    }
}
