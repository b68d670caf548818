//! Command implementations
//!
//! - `plumbing`: low-level object commands (cat-file, hash-object, ls-tree)
//! - `porcelain`: user-facing workflows (add, commit, log, branch, ...)

pub mod plumbing;
pub mod porcelain;
