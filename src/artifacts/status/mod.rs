//! Working tree status inspection
//!
//! Compares three snapshots of the repository: the tree of the HEAD commit,
//! the index, and the files on disk.
//!
//! ## Components
//!
//! - `file_change`: Change kinds and their display forms
//! - `status_info`: The comparison itself and its result
//!
//! ## Classification
//!
//! Every path gets two change kinds. The index axis compares HEAD with the
//! index, the workspace axis compares the index with the working tree:
//!
//! | before  | after   | change     |
//! |---------|---------|------------|
//! | absent  | present | Added      |
//! | present | absent  | Deleted    |
//! | differs | differs | Modified   |
//! | same    | same    | Unmodified |
//!
//! A path known only to the working tree is untracked.

pub mod file_change;
pub mod status_info;
