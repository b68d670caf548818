//! Index entry representation
//!
//! Each entry maps a repository-relative path (always `/`-separated) to the
//! id of the blob staged for it.

use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct IndexEntry {
    pub path: String,
    #[serde(rename = "hash")]
    pub oid: ObjectId,
}

impl IndexEntry {
    /// Every ancestor directory of the entry, outermost first
    ///
    /// `a/b/c.txt` yields `["a", "a/b"]`.
    pub fn parent_dirs(&self) -> Vec<&str> {
        self.path
            .match_indices('/')
            .map(|(position, _)| &self.path[..position])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(path: &str) -> IndexEntry {
        IndexEntry::new(
            path.to_string(),
            ObjectId::try_parse("e69de29bb2d1d6434b8b29ae775ad8c2e48c5391").unwrap(),
        )
    }

    #[test]
    fn lists_parents_outermost_first() {
        assert_eq!(entry("a/b/c.txt").parent_dirs(), vec!["a", "a/b"]);
        assert!(entry("top.txt").parent_dirs().is_empty());
    }

    #[test]
    fn serializes_hash_under_its_wire_name() {
        let json = serde_json::to_string(&entry("a.txt")).unwrap();

        assert_eq!(
            json,
            r#"{"path":"a.txt","hash":"e69de29bb2d1d6434b8b29ae775ad8c2e48c5391"}"#
        );
    }
}
