//! Tree object
//!
//! Trees represent directory snapshots. They contain entries for files (blobs)
//! and subdirectories (other trees), along with their names.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <kind> <hash>\t<name>\n`
//!
//! Entries keep insertion order. A `name -> position` map sits next to the
//! entry vector so lookups and in-place replacement stay O(1).

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};

/// What a tree entry points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Blob,
    Tree,
}

impl EntryKind {
    pub fn mode(&self) -> &'static str {
        match self {
            EntryKind::Blob => "100644",
            EntryKind::Tree => "040000",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Blob => "blob",
            EntryKind::Tree => "tree",
        }
    }

    fn from_mode(mode: &str) -> Result<Self> {
        match mode {
            "100644" => Ok(EntryKind::Blob),
            "040000" => Ok(EntryKind::Tree),
            _ => Err(Error::Format(format!("unknown tree entry mode '{mode}'"))),
        }
    }

    fn from_kind(kind: &str) -> Result<Self> {
        match kind {
            "blob" => Ok(EntryKind::Blob),
            "tree" => Ok(EntryKind::Tree),
            _ => Err(Error::Format(format!("unknown tree entry kind '{kind}'"))),
        }
    }
}

impl From<EntryKind> for ObjectType {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Blob => ObjectType::Blob,
            EntryKind::Tree => ObjectType::Tree,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub oid: ObjectId,
    pub kind: EntryKind,
}

impl TreeEntry {
    pub fn is_tree(&self) -> bool {
        self.kind == EntryKind::Tree
    }

    fn line(&self) -> String {
        format!(
            "{} {} {}\t{}",
            self.kind.mode(),
            self.kind.as_str(),
            self.oid,
            self.name
        )
    }
}

/// Directory listing object
#[derive(Debug, Clone, Default)]
pub struct Tree {
    entries: Vec<TreeEntry>,
    positions: HashMap<String, usize>,
}

/// Staged path waiting to be placed in a tree level
enum Pending<'p> {
    File(ObjectId),
    Directory(Vec<(&'p str, ObjectId)>),
}

impl Tree {
    /// Build nested trees from repository-relative `path -> oid` pairs
    ///
    /// Every subtree is handed to `store` before its parent is assembled, so
    /// child ids are known when the parent is serialized. The returned root
    /// tree is not stored. Names within a level are inserted in byte order.
    pub fn build<'p, F>(
        paths: impl IntoIterator<Item = (&'p str, ObjectId)>,
        store: &mut F,
    ) -> Result<Self>
    where
        F: FnMut(&Tree) -> Result<ObjectId>,
    {
        let mut level: BTreeMap<&'p str, Pending<'p>> = BTreeMap::new();

        for (path, oid) in paths {
            match path.split_once('/') {
                Some((dir, rest)) => {
                    let pending = level
                        .entry(dir)
                        .or_insert_with(|| Pending::Directory(Vec::new()));
                    // a directory replaces a file of the same name
                    if let Pending::File(_) = pending {
                        *pending = Pending::Directory(Vec::new());
                    }
                    if let Pending::Directory(children) = pending {
                        children.push((rest, oid));
                    }
                }
                None => {
                    level.entry(path).or_insert(Pending::File(oid));
                }
            }
        }

        let mut tree = Tree::default();
        for (name, pending) in level {
            match pending {
                Pending::File(oid) => tree.add_entry(name, oid, EntryKind::Blob),
                Pending::Directory(children) => {
                    let subtree = Tree::build(children, store)?;
                    let oid = store(&subtree)?;
                    tree.add_entry(name, oid, EntryKind::Tree);
                }
            }
        }

        Ok(tree)
    }

    /// Insert an entry, or replace the oid and kind of an existing one in place
    pub fn add_entry(&mut self, name: impl Into<String>, oid: ObjectId, kind: EntryKind) {
        let name = name.into();

        match self.positions.get(&name) {
            Some(&position) => {
                let entry = &mut self.entries[position];
                entry.oid = oid;
                entry.kind = kind;
            }
            None => {
                self.positions.insert(name.clone(), self.entries.len());
                self.entries.push(TreeEntry { name, oid, kind });
            }
        }
    }

    pub fn get_entry(&self, name: &str) -> Option<&TreeEntry> {
        self.positions
            .get(name)
            .and_then(|&position| self.entries.get(position))
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> impl Iterator<Item = TreeEntry> {
        self.entries.into_iter()
    }

    fn parse_line(line: &str) -> Result<TreeEntry> {
        let (meta, name) = line
            .split_once('\t')
            .ok_or_else(|| Error::Format(format!("tree entry without name: '{line}'")))?;

        let meta = meta.split(' ').collect::<Vec<_>>();
        let [mode, kind, hash] = meta.as_slice() else {
            return Err(Error::Format(format!(
                "tree entry needs mode, kind and hash: '{line}'"
            )));
        };

        let kind = EntryKind::from_kind(kind)?;
        if EntryKind::from_mode(mode)? != kind {
            return Err(Error::Format(format!(
                "tree entry mode {mode} does not match kind {}",
                kind.as_str()
            )));
        }

        Ok(TreeEntry {
            name: name.to_string(),
            oid: ObjectId::try_parse(hash)?,
            kind,
        })
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Tree {}

impl Packable for Tree {
    fn serialize(&self) -> Bytes {
        let content = self
            .entries
            .iter()
            .map(|entry| format!("{}\n", entry.line()))
            .collect::<String>();

        let mut tree_bytes = format!("{} {}\0", self.object_type(), content.len()).into_bytes();
        tree_bytes.extend_from_slice(content.as_bytes());

        Bytes::from(tree_bytes)
    }
}

impl Unpackable for Tree {
    fn deserialize(data: &[u8]) -> Result<Self> {
        // headerless input is accepted as bare content
        let content = if data.contains(&0) {
            ObjectType::Tree.expect_header(data)?
        } else {
            data
        };
        let content = std::str::from_utf8(content)
            .map_err(|_| Error::Format("tree content is not valid UTF-8".into()))?;

        let mut tree = Tree::default();
        // names may end in '\r', so only '\n' separates entries
        for line in content.split('\n').filter(|line| !line.is_empty()) {
            let entry = Self::parse_line(line)?;
            tree.add_entry(entry.name, entry.oid, entry.kind);
        }

        Ok(tree)
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(TreeEntry::line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::blob::Blob;
    use proptest::prelude::*;

    fn oid(seed: &str) -> ObjectId {
        Blob::new(Bytes::copy_from_slice(seed.as_bytes())).object_id()
    }

    #[test]
    fn serializes_one_line_per_entry_in_insertion_order() {
        let mut tree = Tree::default();
        tree.add_entry("zeta.txt", oid("z"), EntryKind::Blob);
        tree.add_entry("alpha", oid("a"), EntryKind::Tree);

        let serialized = tree.serialize();
        let content = ObjectType::Tree.expect_header(&serialized).unwrap();
        let expected = format!(
            "100644 blob {}\tzeta.txt\n040000 tree {}\talpha\n",
            oid("z"),
            oid("a")
        );

        assert_eq!(content, expected.as_bytes());
    }

    #[test]
    fn accepts_headerless_content() {
        let raw = format!("100644 blob {}\tREADME\n", oid("readme"));
        let tree = Tree::deserialize(raw.as_bytes()).unwrap();

        assert_eq!(tree.size(), 1);
        assert_eq!(tree.get_entry("README").unwrap().oid, oid("readme"));
    }

    #[test]
    fn keeps_carriage_returns_in_names() {
        let mut tree = Tree::default();
        tree.add_entry("notes\r", oid("n"), EntryKind::Blob);

        let parsed = Tree::deserialize(&tree.serialize()).unwrap();

        assert_eq!(parsed.get_entry("notes\r").unwrap().oid, oid("n"));
        assert!(parsed.get_entry("notes").is_none());
    }

    #[test]
    fn rejects_malformed_lines() {
        let hash = oid("x");
        let bad_lines = [
            format!("100644 blob {hash} README\n"),
            format!("100644 {hash}\tREADME\n"),
            format!("100755 blob {hash}\tREADME\n"),
            format!("100644 link {hash}\tREADME\n"),
            "100644 blob nothex\tREADME\n".to_string(),
            format!("040000 blob {hash}\tREADME\n"),
        ];

        for line in bad_lines {
            assert!(Tree::deserialize(line.as_bytes()).is_err(), "{line}");
        }
        assert!(Tree::deserialize(b"blob 0\0").is_err());
    }

    #[test]
    fn builds_nested_trees_children_first() {
        let paths = vec![
            ("b.txt", oid("b")),
            ("src/main.rs", oid("main")),
            ("src/lib/mod.rs", oid("mod")),
            ("a.txt", oid("a")),
        ];
        let mut stored = Vec::new();
        let root = Tree::build(paths, &mut |tree: &Tree| {
            stored.push(tree.clone());
            Ok(tree.object_id())
        })
        .unwrap();

        let names = root.entries().map(|e| e.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["a.txt", "b.txt", "src"]);
        assert!(root.get_entry("src").unwrap().is_tree());

        // src/lib is stored before src
        assert_eq!(stored.len(), 2);
        assert!(stored[0].get_entry("mod.rs").is_some());
        assert_eq!(
            root.get_entry("src").unwrap().oid,
            stored[1].object_id()
        );
        assert_eq!(
            stored[1].get_entry("lib").unwrap().oid,
            stored[0].object_id()
        );
    }

    proptest! {
        #[test]
        fn upsert_keeps_names_unique(names in proptest::collection::vec("[a-e]{1,2}", 1..40)) {
            let mut tree = Tree::default();
            let mut latest = HashMap::new();

            for (i, name) in names.iter().enumerate() {
                let before = tree.size();
                let existed = tree.get_entry(name).is_some();
                let id = oid(&format!("{name}{i}"));
                let kind = if i % 2 == 0 { EntryKind::Blob } else { EntryKind::Tree };

                tree.add_entry(name.clone(), id.clone(), kind);
                latest.insert(name.clone(), (id, kind));

                prop_assert_eq!(tree.size(), if existed { before } else { before + 1 });
            }

            prop_assert_eq!(tree.size(), latest.len());
            for (name, (id, kind)) in &latest {
                let entry = tree.get_entry(name).unwrap();
                prop_assert_eq!(&entry.oid, id);
                prop_assert_eq!(entry.kind, *kind);
            }

            let parsed = Tree::deserialize(&tree.serialize()).unwrap();
            prop_assert_eq!(parsed.object_id(), tree.object_id());
        }
    }
}
