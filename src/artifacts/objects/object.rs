use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::Result;
use bytes::Bytes;
use std::path::PathBuf;

pub trait Packable {
    /// Full header-prefixed serialization
    fn serialize(&self) -> Bytes;
}

pub trait Unpackable {
    fn deserialize(data: &[u8]) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn display(&self) -> String;

    fn object_id(&self) -> ObjectId {
        ObjectId::hash_bytes(&self.serialize())
    }

    fn object_path(&self) -> PathBuf {
        self.object_id().to_path()
    }
}

/// Closed set of object variants as read back from the database
#[derive(Debug, Clone)]
pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
}

impl ObjectBox {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let (object_type, _, _) = ObjectType::split_header(data)?;

        Ok(match object_type {
            ObjectType::Blob => ObjectBox::Blob(Box::new(Blob::deserialize(data)?)),
            ObjectType::Tree => ObjectBox::Tree(Box::new(Tree::deserialize(data)?)),
            ObjectType::Commit => ObjectBox::Commit(Box::new(Commit::deserialize(data)?)),
        })
    }

    pub fn as_object(&self) -> &dyn Object {
        match self {
            ObjectBox::Blob(blob) => blob.as_ref(),
            ObjectBox::Tree(tree) => tree.as_ref(),
            ObjectBox::Commit(commit) => commit.as_ref(),
        }
    }
}
