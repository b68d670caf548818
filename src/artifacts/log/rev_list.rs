use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use derive_new::new;

/// First-parent history starting at a commit
#[derive(Clone, new)]
pub struct RevList<'d> {
    database: &'d Database,
    start: Option<ObjectId>,
}

impl<'d> IntoIterator for RevList<'d> {
    type Item = Result<(ObjectId, Commit)>;
    type IntoIter = RevListIntoIter<'d>;

    fn into_iter(self) -> Self::IntoIter {
        RevListIntoIter {
            database: self.database,
            current_commit_oid: self.start,
        }
    }
}

#[derive(Clone)]
pub struct RevListIntoIter<'d> {
    database: &'d Database,
    current_commit_oid: Option<ObjectId>,
}

impl Iterator for RevListIntoIter<'_> {
    type Item = Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit_oid = self.current_commit_oid.take()?;

        match self.database.load_commit(&commit_oid) {
            Ok(commit) => {
                self.current_commit_oid = commit.parent().cloned();
                Some(Ok((commit_oid, commit)))
            }
            // the walk stops at the first unreadable commit
            Err(err) => Some(Err(err)),
        }
    }
}

/// Whether `candidate` is reachable from `descendant` through first parents
///
/// A commit counts as its own ancestor.
pub fn is_ancestor(database: &Database, candidate: &ObjectId, descendant: &ObjectId) -> Result<bool> {
    for entry in RevList::new(database, Some(descendant.clone())) {
        let (oid, _) = entry?;
        if &oid == candidate {
            return Ok(true);
        }
    }

    Ok(false)
}
