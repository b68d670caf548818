//! Storage areas of a repository
//!
//! - `config`: repository and global configuration files
//! - `database`: content-addressed object store
//! - `index`: staging area
//! - `refs`: HEAD and branch refs
//! - `repository`: the root type tying the areas together
//! - `workspace`: working tree file operations

pub mod config;
pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
