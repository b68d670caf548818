//! Blob object
//!
//! Blobs store file content. They contain only the raw file data, without
//! any metadata like filename (those are stored in trees).
//!
//! ## Format
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::Result;
use bytes::Bytes;
use derive_new::new;

/// File content, identified by the hash of its serialized form
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Content length in bytes
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

impl Packable for Blob {
    fn serialize(&self) -> Bytes {
        let header = format!("{} {}\0", self.object_type(), self.content.len());

        let mut blob_bytes = Vec::with_capacity(header.len() + self.content.len());
        blob_bytes.extend_from_slice(header.as_bytes());
        blob_bytes.extend_from_slice(&self.content);

        Bytes::from(blob_bytes)
    }
}

impl Unpackable for Blob {
    fn deserialize(data: &[u8]) -> Result<Self> {
        let content = ObjectType::Blob.expect_header(data)?;
        Ok(Self::new(Bytes::copy_from_slice(content)))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}
