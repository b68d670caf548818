use crate::areas::repository::Repository;
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Error;

impl Repository {
    /// Print the entries of a tree, or of a commit's root tree
    pub fn ls_tree(&self, object_id: &str) -> anyhow::Result<()> {
        let oid = ObjectId::try_parse(object_id)?;

        let tree = match self.database().parse_object(&oid)? {
            ObjectBox::Commit(commit) => self.database().load_tree(commit.tree_oid())?,
            ObjectBox::Tree(tree) => *tree,
            ObjectBox::Blob(_) => {
                return Err(Error::Format(format!("object {oid} is not a tree")).into());
            }
        };

        for entry in tree.entries() {
            writeln!(
                self.writer(),
                "{} {} {}\t{}",
                entry.kind.mode(),
                entry.kind.as_str(),
                entry.oid,
                entry.name
            )?;
        }

        Ok(())
    }
}
