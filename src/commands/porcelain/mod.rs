//! Porcelain commands
//!
//! User-facing workflows composed from the areas and artifacts. Each command
//! is an `impl Repository` block writing its output through the repository
//! writer; options come in as plain structs defined next to the command.
//!
//! - `init`: create the metadata directory
//! - `add`: stage files
//! - `commit`: record the index as a commit
//! - `status`: compare HEAD, index and working tree
//! - `log`: first-parent history
//! - `branch`: list, create, delete and rename branches
//! - `switch`: check out another branch
//! - `merge`: fast-forward the current branch
//! - `config`: read and write configuration

pub mod add;
pub mod branch;
pub mod commit;
pub mod config;
pub mod init;
pub mod log;
pub mod merge;
pub mod status;
pub mod switch;
