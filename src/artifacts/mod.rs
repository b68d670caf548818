//! Data structures and algorithms operating on the areas
//!
//! - `branch`: branch name validation
//! - `checkout`: moving the working tree and index to another tree
//! - `config`: recognized configuration keys
//! - `index`: index entries
//! - `log`: first-parent history walks and ancestry
//! - `objects`: blob, tree and commit objects
//! - `status`: three-way status classification

pub mod branch;
pub mod checkout;
pub mod config;
pub mod index;
pub mod log;
pub mod objects;
pub mod status;
