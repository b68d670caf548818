use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;

const LABEL_WIDTH: usize = 8;

/// How a path changed between two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub enum ChangeType {
    #[default]
    Unmodified,
    Added,
    Modified,
    Deleted,
}

impl ChangeType {
    pub fn classify(before: Option<&ObjectId>, after: Option<&ObjectId>) -> Self {
        match (before, after) {
            (None, Some(_)) => ChangeType::Added,
            (Some(_), None) => ChangeType::Deleted,
            (Some(before), Some(after)) if before != after => ChangeType::Modified,
            _ => ChangeType::Unmodified,
        }
    }

    /// Short-format status letter
    pub fn code(&self) -> char {
        match self {
            ChangeType::Unmodified => ' ',
            ChangeType::Added => 'A',
            ChangeType::Modified => 'M',
            ChangeType::Deleted => 'D',
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChangeType::Unmodified => "",
            ChangeType::Added => "new file:   ",
            ChangeType::Modified => "modified:   ",
            ChangeType::Deleted => "deleted:    ",
        }
    }
}

/// Which side of the index a change is reported for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChangeType {
    Index(ChangeType),
    Workspace(ChangeType),
}

impl std::fmt::Display for FileChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let colored_str = match self {
            FileChangeType::Index(change) => change.label().green(),
            FileChangeType::Workspace(change) => change.label().red(),
        };
        write!(f, "{:>width$}{}", "", colored_str, width = LABEL_WIDTH)
    }
}

/// Change of one path on both axes: HEAD to index, index to working tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileChange {
    pub index_change: ChangeType,
    pub workspace_change: ChangeType,
}

impl FileChange {
    pub fn is_unmodified(&self) -> bool {
        self.index_change == ChangeType::Unmodified
            && self.workspace_change == ChangeType::Unmodified
    }
}

impl std::fmt::Display for FileChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}",
            self.index_change.code(),
            self.workspace_change.code()
        )
    }
}
