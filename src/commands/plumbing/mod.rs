//! Plumbing commands
//!
//! Direct access to the object database, mostly for scripting and debugging:
//!
//! - `cat-file`: print an object's type, size or content
//! - `hash-object`: compute a file's blob id and optionally store it
//! - `ls-tree`: list the entries of a tree

pub mod cat_file;
pub mod hash_object;
pub mod ls_tree;
