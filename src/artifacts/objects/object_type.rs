use crate::errors::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }

    /// Split `"<type> <len>\0<content>"` into its type, declared length and content.
    ///
    /// Fails when the NUL separator is missing or the header is not
    /// `<type> <decimal>`.
    pub fn split_header(data: &[u8]) -> Result<(ObjectType, usize, &[u8])> {
        let nul = data
            .iter()
            .position(|byte| *byte == 0)
            .ok_or_else(|| Error::Format("missing NUL separator after header".into()))?;

        let header = std::str::from_utf8(&data[..nul])
            .map_err(|_| Error::Format("header is not valid UTF-8".into()))?;
        let (object_type, size) = header
            .split_once(' ')
            .ok_or_else(|| Error::Format(format!("unparsable header '{header}'")))?;

        let object_type = ObjectType::try_from(object_type)?;
        let size = size
            .parse::<usize>()
            .map_err(|_| Error::Format(format!("invalid size in header '{header}'")))?;

        Ok((object_type, size, &data[nul + 1..]))
    }

    /// Like [`ObjectType::split_header`], but also checks the type and the
    /// declared length against the content.
    pub fn expect_header(self, data: &[u8]) -> Result<&[u8]> {
        let (object_type, size, content) = Self::split_header(data)?;

        if object_type != self {
            return Err(Error::Format(format!(
                "expected {} object, found {}",
                self, object_type
            )));
        }
        if size != content.len() {
            return Err(Error::Format(format!(
                "{} size mismatch: header declares {}, content has {}",
                self,
                size,
                content.len()
            )));
        }

        Ok(content)
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            _ => Err(Error::Format(format!("unknown object type '{value}'"))),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
