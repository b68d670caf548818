//! Commit object
//!
//! Commits represent snapshots of the repository at specific points in time.
//! They contain:
//! - A tree object ID (directory snapshot)
//! - Parent commit ID(s) (for history)
//! - Author and committer information
//! - Commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};

const SIGNATURE_REGEX: &str = r"^(.*) <([^<>]*)> (-?\d+) ([+-]\d{4})$";

pub const AUTHOR_NAME_ENV: &str = "TWIG_AUTHOR_NAME";
pub const AUTHOR_EMAIL_ENV: &str = "TWIG_AUTHOR_EMAIL";
pub const AUTHOR_DATE_ENV: &str = "TWIG_AUTHOR_DATE";

/// Author or committer information
///
/// Contains name, email, and timestamp with timezone information.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: DateTime<FixedOffset>,
}

impl Author {
    /// Create a new author stamped with the current local time
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(name: String, email: String, timestamp: DateTime<FixedOffset>) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    /// Identity for a new commit
    ///
    /// `TWIG_AUTHOR_NAME` and `TWIG_AUTHOR_EMAIL` take precedence over the
    /// configured values passed in. `TWIG_AUTHOR_DATE` overrides the current
    /// time when it parses as `%Y-%m-%d %H:%M:%S %z` or RFC 2822.
    pub fn resolve(configured_name: Option<String>, configured_email: Option<String>) -> Result<Self> {
        let name = std::env::var(AUTHOR_NAME_ENV).ok().or(configured_name);
        let email = std::env::var(AUTHOR_EMAIL_ENV).ok().or(configured_email);

        let (Some(name), Some(email)) = (name, email) else {
            return Err(Error::Validation(
                "user identity not set; run `twig config set user.name <name>` and \
                 `twig config set user.email <email>`"
                    .into(),
            ));
        };

        match std::env::var(AUTHOR_DATE_ENV) {
            Ok(date) => match Self::parse_date(&date) {
                Some(timestamp) => Ok(Author::new_with_timestamp(name, email, timestamp)),
                None => {
                    tracing::warn!(%date, "ignoring unparsable {AUTHOR_DATE_ENV}");
                    Ok(Author::new(name, email))
                }
            },
            Err(_) => Ok(Author::new(name, email)),
        }
    }

    fn parse_date(date: &str) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S %z")
            .or_else(|_| DateTime::parse_from_rfc2822(date))
            .ok()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// "Name <email@example.com>"
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// Signature line body: "Name <email> epoch ±HHMM"
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    /// Format timestamp in human-readable form
    ///
    /// String like "Mon Jan 1 12:34:56 2024 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }
}

impl TryFrom<&str> for Author {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        let re = regex::Regex::new(SIGNATURE_REGEX)
            .map_err(|e| Error::Format(format!("invalid signature regex: {e}")))?;
        let captures = re
            .captures(value)
            .ok_or_else(|| Error::Format(format!("malformed signature '{value}'")))?;

        let epoch = captures[3]
            .parse::<i64>()
            .map_err(|_| Error::Format(format!("invalid timestamp in '{value}'")))?;
        let offset = &captures[4];
        let hours = offset[1..3].parse::<i32>().unwrap_or_default();
        let minutes = offset[3..5].parse::<i32>().unwrap_or_default();
        let seconds = (hours * 3600 + minutes * 60) * if offset.starts_with('-') { -1 } else { 1 };

        let offset = FixedOffset::east_opt(seconds)
            .ok_or_else(|| Error::Format(format!("invalid timezone in '{value}'")))?;
        let timestamp = DateTime::from_timestamp(epoch, 0)
            .ok_or_else(|| Error::Format(format!("invalid timestamp in '{value}'")))?
            .with_timezone(&offset);

        Ok(Author {
            name: captures[1].to_string(),
            email: captures[2].to_string(),
            timestamp,
        })
    }
}

/// Snapshot with metadata
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Empty for a root commit
    parents: Vec<ObjectId>,
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    /// Create a commit whose committer is its author
    pub fn new(parents: Vec<ObjectId>, tree_oid: ObjectId, author: Author, message: String) -> Self {
        Commit {
            parents,
            tree_oid,
            committer: author.clone(),
            author,
            message,
        }
    }

    /// First line of the message, as shown by `log --oneline`
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn committer(&self) -> &Author {
        &self.committer
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.author.timestamp()
    }

    fn content(&self) -> String {
        let mut lines = vec![format!("tree {}", self.tree_oid)];
        for parent in &self.parents {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines.push(String::new());
        lines.push(self.message.clone());

        lines.join("\n")
    }

    fn header_value<'l>(line: Option<&'l str>, key: &str) -> Result<&'l str> {
        line.and_then(|line| line.strip_prefix(key))
            .and_then(|rest| rest.strip_prefix(' '))
            .ok_or_else(|| Error::Format(format!("commit is missing its {key} line")))
    }
}

impl Packable for Commit {
    fn serialize(&self) -> Bytes {
        let content = self.content();

        let mut commit_bytes = format!("{} {}\0", self.object_type(), content.len()).into_bytes();
        commit_bytes.extend_from_slice(content.as_bytes());

        Bytes::from(commit_bytes)
    }
}

impl Unpackable for Commit {
    fn deserialize(data: &[u8]) -> Result<Self> {
        let content = ObjectType::Commit.expect_header(data)?;
        let content = std::str::from_utf8(content)
            .map_err(|_| Error::Format("commit content is not valid UTF-8".into()))?;

        let (headers, message) = content
            .split_once("\n\n")
            .ok_or_else(|| Error::Format("commit has no message separator".into()))?;
        let mut lines = headers.lines().peekable();

        let tree_oid = ObjectId::try_parse(Self::header_value(lines.next(), "tree")?)?;

        let mut parents = Vec::new();
        while let Some(line) = lines.next_if(|line| line.starts_with("parent ")) {
            parents.push(ObjectId::try_parse(Self::header_value(Some(line), "parent")?)?);
        }

        let author = Author::try_from(Self::header_value(lines.next(), "author")?)?;
        let committer = Author::try_from(Self::header_value(lines.next(), "committer")?)?;

        if let Some(extra) = lines.next() {
            return Err(Error::Format(format!("unexpected commit header '{extra}'")));
        }

        Ok(Commit {
            parents,
            tree_oid,
            author,
            committer,
            message: message.to_string(),
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        self.content()
    }
}
