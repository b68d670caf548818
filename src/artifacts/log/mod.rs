//! Commit history traversal
//!
//! History is walked along first parents only, newest commit first. The same
//! walk answers ancestry questions for fast-forward merges.

pub mod rev_list;
